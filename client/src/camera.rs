use bevy::{core_pipeline::tonemapping::Tonemapping, prelude::*, transform::TransformSystems};
use walker_shared::CameraPose;

use crate::player::PlayerSimulation;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
    app.add_systems(PostUpdate, apply_pose.before(TransformSystems::Propagate));
}

const FIELD_OF_VIEW_DEG: f32 = 75.0;

/// The first-person camera; its transform is owned by the simulation.
#[derive(Component)]
pub struct PlayerCamera;

fn add_camera(mut commands: Commands, sim: Res<PlayerSimulation>) {
    commands.spawn((
        PlayerCamera,
        Camera3d::default(),
        Tonemapping::AcesFitted,
        Projection::from(PerspectiveProjection {
            fov: FIELD_OF_VIEW_DEG.to_radians(),
            near: 0.1,
            ..default()
        }),
        pose_transform(&sim.pose()),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            falloff: FogFalloff::Linear {
                start: 60.0,
                end: 400.0,
            },
            ..default()
        },
    ));
}

fn pose_transform(pose: &CameraPose) -> Transform {
    let p = pose.position;
    Transform::from_xyz(p.x, p.y, p.z).with_rotation(Quat::from_euler(
        EulerRot::YXZ,
        pose.orientation.yaw,
        pose.orientation.pitch,
        0.0,
    ))
}

fn apply_pose(
    sim: Res<PlayerSimulation>,
    mut camera: Single<&mut Transform, With<PlayerCamera>>,
) {
    **camera = pose_transform(&sim.pose());
}
