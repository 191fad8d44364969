//! Default tuning values for the two controller profiles.
//!
//! Distances are in world units (meters), time in seconds. These only seed
//! [`crate::ControllerSettings`]; the simulation reads everything through the settings.

/// Gravity magnitude for the capsule-collision profile (units / s^2, positive).
pub const GRAVITY: f32 = 30.0;

/// Walking speed for the capsule-collision profile (units / s).
pub const PLAYER_SPEED: f32 = 5.0;

/// Gravity magnitude for the flat-floor profile.
pub const FLAT_FLOOR_GRAVITY: f32 = 9.8;

/// Walking speed for the flat-floor profile.
pub const FLAT_FLOOR_SPEED: f32 = 10.0;

/// Length of the capsule segment (bottom sphere center to top sphere center).
pub const PLAYER_HEIGHT: f32 = 1.0;

/// Capsule radius.
pub const PLAYER_RADIUS: f32 = 0.35;

/// Distance from the camera down to the capsule segment start.
pub const EYE_HEIGHT: f32 = 1.0;

/// Radians of rotation per unit of mouse delta.
pub const MOUSE_SENSITIVITY: f32 = 0.002;

/// Upward velocity applied on a grounded jump (units / s).
pub const JUMP_IMPULSE: f32 = 10.0;

/// Falling below this height triggers a respawn.
pub const RESPAWN_THRESHOLD: f32 = -10.0;

/// Respawn camera position.
pub const RESPAWN_POSITION: [f32; 3] = [0.0, 2.0, 5.0];

/// Camera height above the floor plane in the flat-floor profile.
pub const FLAT_FLOOR_HEIGHT: f32 = 1.7;

/// A contact normal with a vertical component above this value counts as ground.
/// Slightly above zero so walls with numerically noisy normals still slide.
pub const GROUND_NORMAL_MIN_Y: f32 = 1.0e-3;
