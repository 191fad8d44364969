//! Scene loading and collision world construction.
//!
//! The glTF scene is spawned at startup. Once it and its dependencies are
//! loaded and instanced, every matching mesh is flattened into world space, the
//! spatial index is built and handed to the simulation. That hand-over is the
//! readiness event that enables movement.

use bevy::{
    asset::LoadState,
    mesh::{Indices, PrimitiveTopology, VertexAttributeValues},
    prelude::*,
};
use walker_shared::{MeshSource, SpatialIndex, nalgebra::Matrix4};

use crate::{config::ViewerConfig, player::PlayerSimulation};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, setup);
    app.add_systems(
        Update,
        build_collision_world.run_if(resource_exists::<PendingScene>),
    );
}

/// Present until the collision world has been installed.
#[derive(Resource)]
struct PendingScene {
    root: Entity,
    handle: Handle<Scene>,
}

fn setup(mut commands: Commands, asset_server: Res<AssetServer>, config: Res<ViewerConfig>) {
    info!("loading scene {}", config.scene);
    let handle = asset_server.load(GltfAssetLabel::Scene(0).from_asset(config.scene.clone()));
    let root = commands
        .spawn((Name::new("WorldScene"), SceneRoot(handle.clone())))
        .id();
    commands.insert_resource(PendingScene { root, handle });

    commands.spawn((
        DirectionalLight {
            illuminance: light_consts::lux::OVERCAST_DAY,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 12.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn build_collision_world(
    mut commands: Commands,
    pending: Res<PendingScene>,
    asset_server: Res<AssetServer>,
    config: Res<ViewerConfig>,
    mut sim: ResMut<PlayerSimulation>,
    children: Query<&Children>,
    meshes_q: Query<(&Mesh3d, &GlobalTransform, Option<&Name>, Option<&ChildOf>)>,
    names: Query<&Name>,
    meshes: Res<Assets<Mesh>>,
) {
    if let LoadState::Failed(err) = asset_server.load_state(&pending.handle) {
        error!("scene {} failed to load: {err}; walking without collision", config.scene);
        sim.mark_world_ready();
        commands.remove_resource::<PendingScene>();
        return;
    }
    // Wait for the assets and for the scene instance to be spawned under the root.
    if !asset_server.is_loaded_with_dependencies(&pending.handle)
        || children.get(pending.root).is_err()
    {
        return;
    }
    commands.remove_resource::<PendingScene>();

    if !sim.settings().uses_spatial_index() {
        info!("scene ready; profile does not use mesh collision");
        sim.mark_world_ready();
        return;
    }

    let filter = config.collider_filter.as_deref().map(str::to_lowercase);
    let matches_filter = |name: Option<&Name>, parent: Option<&ChildOf>| {
        let Some(filter) = filter.as_deref() else {
            return true;
        };
        let hit = |n: &Name| n.as_str().to_lowercase().contains(filter);
        name.is_some_and(hit) || parent.and_then(|p| names.get(p.parent()).ok()).is_some_and(hit)
    };

    let mut sources = Vec::new();
    let mut skipped = 0usize;
    for entity in children.iter_descendants(pending.root) {
        let Ok((mesh3d, transform, name, parent)) = meshes_q.get(entity) else {
            continue;
        };
        if !matches_filter(name, parent) {
            continue;
        }
        match meshes.get(&mesh3d.0).and_then(|mesh| mesh_source(mesh, transform)) {
            Some(source) => sources.push(source),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!("{skipped} meshes had no usable triangle data and were not collidable");
    }

    match SpatialIndex::from_meshes(&sources) {
        Ok(index) => {
            info!(
                "collision world built from {} meshes ({} triangles)",
                sources.len(),
                index.triangle_count()
            );
            sim.install_world(index);
        }
        Err(err) => {
            error!("invalid collision geometry: {err}; walking without collision");
            sim.mark_world_ready();
        }
    }
}

/// Positions, triangle indices and world transform of a triangle-list mesh.
fn mesh_source(mesh: &Mesh, transform: &GlobalTransform) -> Option<MeshSource> {
    if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
        return None;
    }
    let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute(Mesh::ATTRIBUTE_POSITION)
    else {
        return None;
    };
    let indices = match mesh.indices() {
        Some(Indices::U16(values)) => values.iter().map(|&i| u32::from(i)).collect(),
        Some(Indices::U32(values)) => values.clone(),
        None => (0..positions.len() as u32).collect(),
    };
    let matrix = Mat4::from(transform.affine());
    Some(MeshSource {
        positions: positions.clone(),
        indices,
        transform: Matrix4::from_column_slice(&matrix.to_cols_array()),
    })
}
