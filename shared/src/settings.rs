/*!
Controller settings and the two built-in profiles.

All tunables of the movement core live here so they can be loaded from data
(TOML via serde) instead of being hardwired. Two profiles exist:

- `full_collision`: capsule-vs-mesh collision, jumping enabled.
- `flat_floor`: no spatial index queries; the camera is clamped to a fixed floor
  height. Different gravity and speed, no jumping.

Settings should be passed through [`ControllerSettings::validated`] before they
reach a [`crate::Simulation`].
*/

use serde::Deserialize;
use thiserror::Error;

use crate::collision::Vec3;
use crate::constants::{
    EYE_HEIGHT, FLAT_FLOOR_GRAVITY, FLAT_FLOOR_HEIGHT, FLAT_FLOOR_SPEED, GRAVITY,
    GROUND_NORMAL_MIN_Y, JUMP_IMPULSE, MOUSE_SENSITIVITY, PLAYER_HEIGHT, PLAYER_RADIUS,
    PLAYER_SPEED, RESPAWN_POSITION, RESPAWN_THRESHOLD,
};

/// How the controller keeps the player out of the world.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum CollisionMode {
    /// Capsule queries against the spatial index.
    Capsule,
    /// Clamp the camera to `floor_height`; the spatial index is never queried.
    FlatFloor { floor_height: f32 },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Downward acceleration magnitude (units / s^2).
    pub gravity: f32,
    /// Horizontal speed per held key (units / s).
    pub player_speed: f32,
    /// Capsule segment length.
    pub player_height: f32,
    pub player_radius: f32,
    /// Camera height above the capsule segment start.
    pub eye_height: f32,
    pub mouse_sensitivity: f32,
    /// `None` disables jumping.
    pub jump_impulse: Option<f32>,
    pub respawn_threshold: f32,
    pub respawn_position: [f32; 3],
    pub respawn_yaw: f32,
    pub respawn_pitch: f32,
    /// Contacts whose normal has `y` above this are treated as ground.
    pub ground_normal_min_y: f32,
    pub collision: CollisionMode,
    /// Ignore held movement keys while pointer capture is inactive.
    pub keys_require_capture: bool,
    /// Optional upper bound for a frame's `dt`. Unset by default.
    pub max_frame_dt: Option<f32>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::full_collision()
    }
}

impl ControllerSettings {
    pub fn full_collision() -> Self {
        Self {
            gravity: GRAVITY,
            player_speed: PLAYER_SPEED,
            player_height: PLAYER_HEIGHT,
            player_radius: PLAYER_RADIUS,
            eye_height: EYE_HEIGHT,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            jump_impulse: Some(JUMP_IMPULSE),
            respawn_threshold: RESPAWN_THRESHOLD,
            respawn_position: RESPAWN_POSITION,
            respawn_yaw: 0.0,
            respawn_pitch: 0.0,
            ground_normal_min_y: GROUND_NORMAL_MIN_Y,
            collision: CollisionMode::Capsule,
            keys_require_capture: false,
            max_frame_dt: None,
        }
    }

    pub fn flat_floor() -> Self {
        Self {
            gravity: FLAT_FLOOR_GRAVITY,
            player_speed: FLAT_FLOOR_SPEED,
            jump_impulse: None,
            collision: CollisionMode::FlatFloor {
                floor_height: FLAT_FLOOR_HEIGHT,
            },
            keys_require_capture: true,
            ..Self::full_collision()
        }
    }

    /// Look up a built-in profile by its config name.
    pub fn profile(name: &str) -> Result<Self, SettingsError> {
        match name {
            "full_collision" => Ok(Self::full_collision()),
            "flat_floor" => Ok(Self::flat_floor()),
            other => Err(SettingsError::UnknownProfile(other.to_string())),
        }
    }

    #[inline]
    pub fn respawn_point(&self) -> Vec3 {
        Vec3::from(self.respawn_position)
    }

    /// Whether this profile runs capsule queries (and therefore needs a spatial index).
    #[inline]
    pub fn uses_spatial_index(&self) -> bool {
        matches!(self.collision, CollisionMode::Capsule)
    }

    /// Check that the values describe a usable controller.
    pub fn validated(self) -> Result<Self, SettingsError> {
        positive("player_height", self.player_height)?;
        positive("player_radius", self.player_radius)?;
        non_negative("gravity", self.gravity)?;
        non_negative("player_speed", self.player_speed)?;
        non_negative("mouse_sensitivity", self.mouse_sensitivity)?;

        let span = self.player_height + self.player_radius;
        if !self.eye_height.is_finite() || self.eye_height < 0.0 || self.eye_height > span {
            return Err(SettingsError::EyeOutsideCapsule {
                eye_height: self.eye_height,
                span,
            });
        }
        if let Some(impulse) = self.jump_impulse {
            positive("jump_impulse", impulse)?;
        }
        if let Some(max_dt) = self.max_frame_dt {
            positive("max_frame_dt", max_dt)?;
        }
        if !self.respawn_threshold.is_finite()
            || !self.respawn_position.iter().all(|c| c.is_finite())
            || !self.respawn_yaw.is_finite()
            || !self.respawn_pitch.is_finite()
        {
            return Err(SettingsError::NonFinite("respawn"));
        }
        if self.respawn_position[1] < self.respawn_threshold {
            return Err(SettingsError::RespawnBelowThreshold);
        }
        Ok(self)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("unknown controller profile `{0}` (expected `full_collision` or `flat_floor`)")]
    UnknownProfile(String),
    #[error("`{name}` must be positive and finite, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("`{name}` must be non-negative and finite, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("eye height {eye_height} lies outside the capsule span 0..={span}")]
    EyeOutsideCapsule { eye_height: f32, span: f32 },
    #[error("`{0}` contains a non-finite value")]
    NonFinite(&'static str),
    #[error("respawn position lies below the respawn threshold")]
    RespawnBelowThreshold,
}

fn positive(name: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::Negative { name, value })
    }
}
