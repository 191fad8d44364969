use walker_shared::{
    CameraPose, ControllerSettings, GroundState, InputEvent, MeshSource, MoveKey, Orientation,
    PlayerCapsule, Simulation, SpatialIndex, Vec3,
};

const DT: f32 = 1.0 / 60.0;

fn floor(y: f32) -> MeshSource {
    MeshSource::world_space(
        vec![
            [-50.0, y, -50.0],
            [50.0, y, -50.0],
            [50.0, y, 50.0],
            [-50.0, y, 50.0],
        ],
        vec![0, 2, 1, 0, 3, 2],
    )
}

/// Vertical wall in the plane `x = at`.
fn wall(at: f32) -> MeshSource {
    MeshSource::world_space(
        vec![
            [at, -20.0, -50.0],
            [at, -20.0, 50.0],
            [at, 20.0, 50.0],
            [at, 20.0, -50.0],
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
}

fn sim_with(settings: ControllerSettings, meshes: &[MeshSource]) -> Simulation {
    let mut sim = Simulation::new(settings.validated().expect("valid settings"));
    sim.install_world(SpatialIndex::from_meshes(meshes).expect("valid geometry"));
    sim
}

fn capsule_bottom(sim: &Simulation) -> f32 {
    let s = sim.settings();
    PlayerCapsule::from_eye(
        sim.pose().position,
        s.eye_height,
        s.player_height,
        s.player_radius,
    )
    .bottom()
}

fn settle(sim: &mut Simulation) {
    for _ in 0..180 {
        sim.tick(DT);
    }
}

#[test]
fn dropped_camera_settles_on_the_floor() {
    let mut sim = sim_with(ControllerSettings::full_collision(), &[floor(0.0)]);
    sim.set_pose(CameraPose::new(Vec3::new(1.0, 4.0, -3.0), Orientation::default()));

    settle(&mut sim);

    assert_eq!(sim.ground_state(), GroundState::Grounded);
    assert_eq!(sim.velocity().y, 0.0);
    assert!(
        capsule_bottom(&sim).abs() < 0.02,
        "capsule bottom at {}",
        capsule_bottom(&sim)
    );
}

#[test]
fn walking_into_a_wall_slides_along_it() {
    let settings = ControllerSettings {
        gravity: 0.0,
        ..ControllerSettings::full_collision()
    };
    let radius = settings.player_radius;
    let step = settings.player_speed * DT;
    let mut sim = sim_with(settings, &[wall(5.0)]);
    sim.set_pose(CameraPose::new(Vec3::new(4.6, 2.0, 0.0), Orientation::default()));

    sim.handle_input(InputEvent::KeyDown(MoveKey::Forward));
    sim.handle_input(InputEvent::KeyDown(MoveKey::Right));
    sim.tick(DT);

    // Into-the-wall component removed, tangential kept.
    assert!(sim.velocity().x.abs() < 1.0e-3, "vx = {}", sim.velocity().x);
    assert!((sim.velocity().z + step).abs() < 1.0e-4);

    for _ in 0..29 {
        sim.tick(DT);
    }
    let pos = sim.pose().position;
    assert!((pos.x - (5.0 - radius)).abs() < 1.0e-2, "x = {}", pos.x);
    assert!((pos.z + 30.0 * step).abs() < 1.0e-3, "z = {}", pos.z);
    assert_eq!(sim.ground_state(), GroundState::Airborne);
}

#[test]
fn jump_only_from_the_ground() {
    let mut sim = sim_with(ControllerSettings::full_collision(), &[floor(0.0)]);
    let impulse = sim.settings().jump_impulse.expect("jump enabled");

    // Airborne: request is dropped.
    sim.set_pose(CameraPose::new(Vec3::new(1.0, 6.0, -3.0), Orientation::default()));
    sim.handle_input(InputEvent::JumpPressed);
    sim.tick(DT);
    assert!(sim.velocity().y < 0.0);

    settle(&mut sim);
    assert!(sim.ground_state().is_grounded());

    sim.handle_input(InputEvent::JumpPressed);
    sim.tick(DT);
    assert_eq!(sim.velocity().y, impulse);
    assert_eq!(sim.ground_state(), GroundState::Airborne);

    let before = sim.pose().position.y;
    sim.tick(DT);
    assert!(sim.pose().position.y > before);
}

#[test]
fn falling_out_of_the_world_respawns_on_the_next_step() {
    let mut sim = sim_with(ControllerSettings::full_collision(), &[floor(0.0)]);
    let respawn = sim.settings().respawn_point();

    sim.set_pose(CameraPose::new(
        Vec3::new(30.0, -10.5, 12.0),
        Orientation::new(0.4, 3.0),
    ));
    let pose = sim.tick(DT);

    assert_eq!(pose.position, respawn);
    assert_eq!(pose.orientation, Orientation::default());
    assert_eq!(sim.velocity(), Vec3::zeros());
}

#[test]
fn walking_off_the_edge_falls_and_respawns() {
    let mut sim = sim_with(ControllerSettings::full_collision(), &[floor(0.0)]);
    sim.set_pose(CameraPose::new(Vec3::new(0.0, 1.5, -49.0), Orientation::default()));
    sim.handle_input(InputEvent::KeyDown(MoveKey::Forward));

    let mut respawned = false;
    for _ in 0..600 {
        let pose = sim.tick(DT);
        if pose.position == sim.settings().respawn_point() {
            respawned = true;
            break;
        }
    }
    assert!(respawned);
}

#[test]
fn stale_mouse_motion_is_never_replayed() {
    let mut sim = sim_with(ControllerSettings::full_collision(), &[floor(0.0)]);
    let start = sim.pose().orientation;

    sim.handle_input(InputEvent::MouseMotion { dx: 400.0, dy: -300.0 });
    sim.tick(DT);
    sim.handle_input(InputEvent::CaptureChanged(true));
    sim.tick(DT);

    assert_eq!(sim.pose().orientation, start);

    sim.handle_input(InputEvent::MouseMotion { dx: 0.0, dy: -100_000.0 });
    sim.tick(DT);
    assert_eq!(sim.pose().orientation.pitch, std::f32::consts::FRAC_PI_2);
}

#[test]
fn identical_worlds_produce_identical_trajectories() {
    let meshes = [floor(0.0), wall(3.0)];
    let mut a = sim_with(ControllerSettings::full_collision(), &meshes);
    let mut b = sim_with(ControllerSettings::full_collision(), &meshes);

    for sim in [&mut a, &mut b] {
        sim.handle_input(InputEvent::CaptureChanged(true));
        sim.handle_input(InputEvent::KeyDown(MoveKey::Right));
        sim.handle_input(InputEvent::KeyDown(MoveKey::Forward));
    }
    for frame in 0..240 {
        if frame % 40 == 0 {
            a.handle_input(InputEvent::JumpPressed);
            b.handle_input(InputEvent::JumpPressed);
        }
        assert_eq!(a.tick(DT), b.tick(DT));
        assert_eq!(a.velocity(), b.velocity());
    }
}
