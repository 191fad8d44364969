//! Owns the movement core and advances it once per rendered frame.

use bevy::prelude::*;
use walker_shared::Simulation;

use crate::{AppSystems, config::ViewerConfig};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(PreStartup, init_simulation);
    app.add_systems(Update, tick.in_set(AppSystems::Tick));
}

/// The simulation context lives in a single resource; input systems run before
/// [`tick`] in the same schedule, so nothing else touches it concurrently.
#[derive(Resource, Deref, DerefMut)]
pub struct PlayerSimulation(pub Simulation);

fn init_simulation(mut commands: Commands, config: Res<ViewerConfig>) {
    let settings = config.settings.clone();
    info!(
        "starting controller: gravity {}, speed {}, {:?}",
        settings.gravity, settings.player_speed, settings.collision
    );
    commands.insert_resource(PlayerSimulation(Simulation::new(settings)));
}

fn tick(time: Res<Time>, mut sim: ResMut<PlayerSimulation>) {
    sim.tick(time.delta_secs());
}
