use crate::{
    collision::{self, Contact, GroundState, PlayerCapsule, SpatialIndex, Vec3},
    input::InputState,
    orientation::{CameraPose, Orientation},
    settings::{CollisionMode, ControllerSettings},
};

/// Integrator state that persists across frames.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MovementState {
    /// `x`/`z` hold this frame's displacement (already scaled by `dt`);
    /// `y` is a per-second vertical speed.
    pub velocity: Vec3,
    pub ground: GroundState,
}

/// What happened during one `step_movement()` tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepOutcome {
    pub contact: Option<Contact>,
    pub respawned: bool,
    pub jumped: bool,
}

/// Advance the player by one frame.
///
/// Order of operations:
/// 1. gravity on `velocity.y`
/// 2. forward/right from the full orientation (pitch included, not renormalised)
/// 3. horizontal velocity rebuilt from held keys as `±speed * dt` per key
/// 4. integrate (`x`/`z` added directly, `y` scaled by `dt`)
/// 5. rebuild the capsule below the camera (or clamp to the flat floor)
/// 6. resolve a single contact: ground-like normals ground the player, others slide
/// 7. respawn below the threshold
/// 8. consume the jump request, applying it only when grounded
pub fn step_movement(
    settings: &ControllerSettings,
    index: Option<&SpatialIndex>,
    input: &mut InputState,
    pose: &mut CameraPose,
    state: &mut MovementState,
    dt: f32,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    // 1) Gravity.
    state.velocity.y -= settings.gravity * dt;

    // 2) Camera-space basis.
    let forward = pose.orientation.forward();
    let right = pose.orientation.right();

    // 3) Horizontal velocity from scratch.
    state.velocity.x = 0.0;
    state.velocity.z = 0.0;
    if input.is_captured() || !settings.keys_require_capture {
        let step = settings.player_speed * dt;
        let mut add = |dir: Vec3, amount: f32| {
            state.velocity.x += dir.x * amount;
            state.velocity.z += dir.z * amount;
        };
        if input.forward {
            add(forward, step);
        }
        if input.back {
            add(forward, -step);
        }
        if input.right {
            add(right, step);
        }
        if input.left {
            add(right, -step);
        }
    }

    // 4) Integrate.
    pose.position.x += state.velocity.x;
    pose.position.y += state.velocity.y * dt;
    pose.position.z += state.velocity.z;

    // 5) + 6) Collision.
    state.ground = GroundState::Airborne;
    match settings.collision {
        CollisionMode::Capsule => {
            let capsule = PlayerCapsule::from_eye(
                pose.position,
                settings.eye_height,
                settings.player_height,
                settings.player_radius,
            );
            if let Some(contact) = collision::intersect_or_none(index, &capsule) {
                resolve_contact(settings, &contact, pose, state);
                outcome.contact = Some(contact);
            }
        }
        CollisionMode::FlatFloor { floor_height } => {
            if pose.position.y <= floor_height {
                pose.position.y = floor_height;
                state.velocity.y = state.velocity.y.max(0.0);
                state.ground = GroundState::Grounded;
            }
        }
    }

    // 7) Out-of-world recovery.
    if pose.position.y < settings.respawn_threshold {
        log::info!(
            "player fell below {} at {:?}; respawning",
            settings.respawn_threshold,
            pose.position
        );
        respawn(settings, pose, state);
        outcome.respawned = true;
    }

    // 8) Jump on the input edge, only from the ground.
    if input.take_jump() {
        if let (Some(impulse), GroundState::Grounded) = (settings.jump_impulse, state.ground) {
            state.velocity.y = impulse;
            state.ground = GroundState::Airborne;
            outcome.jumped = true;
        }
    }

    outcome
}

/// Ground-like normals snap the player up and ground them; anything steeper
/// removes the into-surface velocity component and pushes out along the normal.
fn resolve_contact(
    settings: &ControllerSettings,
    contact: &Contact,
    pose: &mut CameraPose,
    state: &mut MovementState,
) {
    if contact.normal.y > settings.ground_normal_min_y {
        state.ground = GroundState::Grounded;
        state.velocity.y = 0.0;
        pose.position.y += contact.depth;
    } else {
        let n = contact.normal;
        state.velocity -= n * n.dot(&state.velocity);
        pose.position += contact.mtv();
    }
}

/// Teleport to the configured respawn pose with zero velocity.
pub fn respawn(settings: &ControllerSettings, pose: &mut CameraPose, state: &mut MovementState) {
    pose.position = settings.respawn_point();
    pose.orientation = Orientation::new(settings.respawn_pitch, settings.respawn_yaw);
    *state = MovementState::default();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, MoveKey};
    use approx::assert_abs_diff_eq;

    const DT: f32 = 1.0 / 60.0;

    fn weightless() -> ControllerSettings {
        ControllerSettings {
            gravity: 0.0,
            ..ControllerSettings::full_collision()
        }
    }

    fn pose_at(y: f32) -> CameraPose {
        CameraPose::new(Vec3::new(0.0, y, 0.0), Orientation::default())
    }

    fn held(keys: &[MoveKey]) -> InputState {
        let mut input = InputState::default();
        for &key in keys {
            input.apply(InputEvent::KeyDown(key));
        }
        input
    }

    #[test]
    fn rest_without_gravity_is_idempotent() {
        let settings = weightless();
        let mut pose = pose_at(3.0);
        let mut state = MovementState::default();
        let mut input = InputState::default();
        for _ in 0..120 {
            step_movement(&settings, None, &mut input, &mut pose, &mut state, DT);
        }
        assert_eq!(pose, pose_at(3.0));
        assert_eq!(state.velocity, Vec3::zeros());
    }

    #[test]
    fn opposing_keys_cancel() {
        let settings = weightless();
        let mut pose = pose_at(3.0);
        let mut state = MovementState::default();
        let mut input = held(&[MoveKey::Forward, MoveKey::Back, MoveKey::Left, MoveKey::Right]);
        step_movement(&settings, None, &mut input, &mut pose, &mut state, DT);
        assert_abs_diff_eq!(state.velocity.x, 0.0, epsilon = 1.0e-7);
        assert_abs_diff_eq!(state.velocity.z, 0.0, epsilon = 1.0e-7);
    }

    #[test]
    fn diagonal_is_not_normalised() {
        let settings = weightless();
        let mut pose = pose_at(3.0);
        let mut state = MovementState::default();
        let mut input = held(&[MoveKey::Forward, MoveKey::Right]);
        step_movement(&settings, None, &mut input, &mut pose, &mut state, DT);

        let planar = (state.velocity.x.powi(2) + state.velocity.z.powi(2)).sqrt();
        assert_abs_diff_eq!(
            planar,
            settings.player_speed * std::f32::consts::SQRT_2 * DT,
            epsilon = 1.0e-6
        );
        assert_abs_diff_eq!(pose.position.x, settings.player_speed * DT, epsilon = 1.0e-6);
        assert_abs_diff_eq!(pose.position.z, -settings.player_speed * DT, epsilon = 1.0e-6);
    }

    #[test]
    fn looking_up_slows_forward_motion() {
        let settings = weightless();
        let mut pose = pose_at(3.0);
        pose.orientation = Orientation::new(1.0, 0.0);
        let mut state = MovementState::default();
        let mut input = held(&[MoveKey::Forward]);
        step_movement(&settings, None, &mut input, &mut pose, &mut state, DT);
        assert_abs_diff_eq!(
            state.velocity.z,
            -settings.player_speed * DT * (1.0f32).cos(),
            epsilon = 1.0e-6
        );
        // Looking up never lifts the player off the ground plane directly.
        assert_eq!(state.velocity.y, 0.0);
    }

    #[test]
    fn vertical_velocity_is_scaled_by_dt_at_integration() {
        let settings = ControllerSettings::full_collision();
        let mut pose = pose_at(3.0);
        let mut state = MovementState::default();
        let mut input = InputState::default();
        step_movement(&settings, None, &mut input, &mut pose, &mut state, DT);
        assert_abs_diff_eq!(state.velocity.y, -settings.gravity * DT, epsilon = 1.0e-6);
        assert_abs_diff_eq!(
            pose.position.y,
            3.0 - settings.gravity * DT * DT,
            epsilon = 1.0e-6
        );
        assert_eq!(state.ground, GroundState::Airborne);
    }

    #[test]
    fn falling_below_threshold_respawns() {
        let settings = ControllerSettings::full_collision();
        let mut pose = pose_at(-10.5);
        pose.orientation = Orientation::new(0.3, 2.0);
        let mut state = MovementState {
            velocity: Vec3::new(0.0, -55.0, 0.0),
            ground: GroundState::Airborne,
        };
        let mut input = InputState::default();
        let outcome = step_movement(&settings, None, &mut input, &mut pose, &mut state, DT);

        assert!(outcome.respawned);
        assert_eq!(pose.position, settings.respawn_point());
        assert_eq!(pose.orientation, Orientation::default());
        assert_eq!(state, MovementState::default());
    }

    #[test]
    fn respawn_keeps_pitch_in_range() {
        let settings = ControllerSettings {
            respawn_pitch: 3.0,
            respawn_yaw: 7.0,
            ..ControllerSettings::full_collision()
        };
        let mut pose = pose_at(-20.0);
        let mut state = MovementState::default();
        respawn(&settings, &mut pose, &mut state);
        assert_eq!(pose.orientation.pitch, std::f32::consts::FRAC_PI_2);
        assert_eq!(pose.orientation.yaw, 7.0);
    }

    #[test]
    fn nearly_vertical_normals_slide() {
        let settings = ControllerSettings::full_collision();
        let normal = Vec3::new(-1.0, 5.0e-4, 0.0).normalize();
        let contact = Contact { normal, depth: 0.1 };
        let mut pose = pose_at(3.0);
        let mut state = MovementState {
            velocity: Vec3::new(0.08, -2.0, 0.0),
            ground: GroundState::Airborne,
        };
        resolve_contact(&settings, &contact, &mut pose, &mut state);

        assert_eq!(state.ground, GroundState::Airborne);
        assert_abs_diff_eq!(state.velocity.dot(&normal), 0.0, epsilon = 1.0e-6);
        assert!(state.velocity.y < 0.0);
        assert_abs_diff_eq!(pose.position.x, -0.1, epsilon = 1.0e-5);
    }

    #[test]
    fn upward_normals_ground() {
        let settings = ControllerSettings::full_collision();
        let contact = Contact {
            normal: Vec3::new(0.0, 0.8, 0.6),
            depth: 0.05,
        };
        let mut pose = pose_at(3.0);
        let mut state = MovementState {
            velocity: Vec3::new(0.0, -4.0, 0.08),
            ground: GroundState::Airborne,
        };
        resolve_contact(&settings, &contact, &mut pose, &mut state);

        assert!(state.ground.is_grounded());
        assert_eq!(state.velocity.y, 0.0);
        assert_abs_diff_eq!(pose.position.y, 3.05, epsilon = 1.0e-6);
        assert_eq!(pose.position.z, 0.0);
    }

    #[test]
    fn flat_floor_clamps_and_grounds() {
        let settings = ControllerSettings::flat_floor();
        let CollisionMode::FlatFloor { floor_height } = settings.collision else {
            unreachable!("flat floor profile");
        };
        let mut pose = pose_at(floor_height + 0.001);
        let mut state = MovementState::default();
        let mut input = InputState::default();
        step_movement(&settings, None, &mut input, &mut pose, &mut state, DT);
        assert_eq!(pose.position.y, floor_height);
        assert_eq!(state.velocity.y, 0.0);
        assert!(state.ground.is_grounded());
    }

    #[test]
    fn flat_floor_ignores_keys_without_capture() {
        let settings = ControllerSettings::flat_floor();
        let mut pose = pose_at(5.0);
        let mut state = MovementState::default();
        let mut input = held(&[MoveKey::Forward]);
        step_movement(&settings, None, &mut input, &mut pose, &mut state, DT);
        assert_eq!((pose.position.x, pose.position.z), (0.0, 0.0));
        assert!(input.is_held(MoveKey::Forward));

        input.apply(InputEvent::CaptureChanged(true));
        step_movement(&settings, None, &mut input, &mut pose, &mut state, DT);
        assert!(pose.position.z < 0.0);
    }

    #[test]
    fn jump_while_airborne_is_a_noop() {
        let settings = ControllerSettings::full_collision();
        let mut pose = pose_at(5.0);
        let mut state = MovementState::default();
        let mut input = InputState::default();
        input.apply(InputEvent::JumpPressed);
        let outcome = step_movement(&settings, None, &mut input, &mut pose, &mut state, DT);
        assert!(!outcome.jumped);
        assert!(state.velocity.y < 0.0);
        // The request is consumed, not buffered until landing.
        assert!(!input.take_jump());
    }
}
