//! Debug/performance tooling for native dev builds.
//!
//! Frame-time diagnostics via `iyes_perf_ui`, plus a readout of the controller
//! state and the collision world bounds drawn as a gizmo. `F3` toggles both.

use bevy::diagnostic::{EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use iyes_perf_ui::prelude::*;

use crate::player::PlayerSimulation;

const TOGGLE_KEY: KeyCode = KeyCode::F3;

#[derive(Component)]
struct ControllerReadout;

#[derive(Resource)]
struct DebugOverlay(bool);

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        PerfUiPlugin,
    ));
    app.insert_resource(DebugOverlay(true));

    app.add_systems(Startup, spawn_debug_ui);
    app.add_systems(
        Update,
        (
            toggle_overlay,
            (update_readout, draw_world_bounds).run_if(|o: Res<DebugOverlay>| o.0),
        ),
    );
}

fn spawn_debug_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
    commands.spawn((
        ControllerReadout,
        Text::default(),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(8.0),
            left: Val::Px(8.0),
            ..default()
        },
    ));
}

fn toggle_overlay(
    keys: Res<ButtonInput<KeyCode>>,
    mut overlay: ResMut<DebugOverlay>,
    mut readout: Query<&mut Visibility, With<ControllerReadout>>,
) {
    if !keys.just_pressed(TOGGLE_KEY) {
        return;
    }
    overlay.0 = !overlay.0;
    for mut visibility in &mut readout {
        *visibility = if overlay.0 {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

fn update_readout(
    sim: Res<PlayerSimulation>,
    mut readout: Single<&mut Text, With<ControllerReadout>>,
) {
    let pose = sim.pose();
    let p = pose.position;
    let v = sim.velocity();
    let contact = match sim.last_step().contact {
        Some(c) => format!(
            "contact n ({:.2} {:.2} {:.2}) depth {:.3}",
            c.normal.x, c.normal.y, c.normal.z, c.depth
        ),
        None => "no contact".to_string(),
    };
    readout.0 = format!(
        "pos {:>7.2} {:>7.2} {:>7.2}\nvel {:>7.3} {:>7.3} {:>7.3}\n{:?}  pitch {:.2} yaw {:.2}\n{contact}{}\nready {}  captured {}",
        p.x,
        p.y,
        p.z,
        v.x,
        v.y,
        v.z,
        sim.ground_state(),
        pose.orientation.pitch,
        pose.orientation.yaw,
        if sim.last_step().respawned { "  (respawned)" } else { "" },
        sim.is_world_ready(),
        sim.input().is_captured(),
    );
}

fn draw_world_bounds(mut gizmos: Gizmos, sim: Res<PlayerSimulation>) {
    let Some(bounds) = sim.spatial_index().and_then(|index| index.bounds()) else {
        return;
    };
    let (min, max) = (bounds.mins, bounds.maxs);
    let center = Vec3::new(
        (min.x + max.x) * 0.5,
        (min.y + max.y) * 0.5,
        (min.z + max.z) * 0.5,
    );
    let size = Vec3::new(max.x - min.x, max.y - min.y, max.z - min.z);
    gizmos.cuboid(
        Transform::from_translation(center).with_scale(size),
        Color::srgb(1.0, 1.0, 0.2),
    );
}
