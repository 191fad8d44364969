pub mod collision;
pub mod constants;
pub mod geometry;
pub mod input;
pub mod movement;
pub mod orientation;
pub mod settings;
pub mod simulation;

pub use collision::{Contact, GroundState, PlayerCapsule, SpatialIndex, Vec3};
pub use geometry::{GeometryError, MeshSource, WorldGeometry};
pub use input::{InputEvent, InputState, MoveKey};
pub use movement::{MovementState, StepOutcome, step_movement};
pub use nalgebra;
pub use orientation::{CameraPose, Orientation};
pub use settings::{CollisionMode, ControllerSettings, SettingsError};
pub use simulation::Simulation;
