//! Viewer configuration loaded from `config/walker.toml`.
//!
//! The file picks a controller profile and optionally overrides individual
//! fields. Env vars take precedence over the file for quick tuning.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bevy::prelude::*;
use serde::Deserialize;
use walker_shared::{CollisionMode, ControllerSettings};

pub(super) fn plugin(app: &mut App) {
    let config = match load_default() {
        Ok(config) => config,
        Err(err) => {
            error!("failed to load viewer config, using defaults: {err:#}");
            ViewerConfig::default()
        }
    };
    app.insert_resource(config);
}

/// Resolved configuration used by the rest of the client.
#[derive(Resource, Debug, Clone)]
pub struct ViewerConfig {
    pub settings: ControllerSettings,
    /// Asset path of the glTF scene.
    pub scene: String,
    /// Only meshes whose node (or parent node) name contains this are collidable.
    pub collider_filter: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            settings: ControllerSettings::full_collision(),
            scene: DEFAULT_SCENE.to_string(),
            collider_filter: None,
        }
    }
}

const DEFAULT_SCENE: &str = "donner.glb";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    profile: Option<String>,
    scene: Option<String>,
    collider_filter: Option<String>,
    controller: ControllerOverrides,
}

/// Per-field overrides applied on top of the chosen profile.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ControllerOverrides {
    gravity: Option<f32>,
    player_speed: Option<f32>,
    player_height: Option<f32>,
    player_radius: Option<f32>,
    eye_height: Option<f32>,
    mouse_sensitivity: Option<f32>,
    jump_impulse: Option<f32>,
    disable_jump: bool,
    respawn_threshold: Option<f32>,
    respawn_position: Option<[f32; 3]>,
    respawn_yaw: Option<f32>,
    respawn_pitch: Option<f32>,
    ground_normal_min_y: Option<f32>,
    floor_height: Option<f32>,
    keys_require_capture: Option<bool>,
    max_frame_dt: Option<f32>,
}

impl ControllerOverrides {
    fn apply(self, s: &mut ControllerSettings) {
        macro_rules! set {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = self.$field { s.$field = v; })*
            };
        }
        set!(
            gravity,
            player_speed,
            player_height,
            player_radius,
            eye_height,
            mouse_sensitivity,
            respawn_threshold,
            respawn_position,
            respawn_yaw,
            respawn_pitch,
            ground_normal_min_y,
            keys_require_capture,
        );
        if self.jump_impulse.is_some() {
            s.jump_impulse = self.jump_impulse;
        }
        if self.disable_jump {
            s.jump_impulse = None;
        }
        if self.max_frame_dt.is_some() {
            s.max_frame_dt = self.max_frame_dt;
        }
        if let (Some(height), CollisionMode::FlatFloor { floor_height }) =
            (self.floor_height, &mut s.collision)
        {
            *floor_height = height;
        }
    }
}

fn config_path() -> PathBuf {
    let here = Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../config");
    let dir = if ws.is_dir() { ws } else { here.join("config") };
    dir.join("walker.toml")
}

/// Load `config/walker.toml` (if present) and apply env overrides.
pub fn load_default() -> Result<ViewerConfig> {
    let path = config_path();
    let file = if path.is_file() {
        let txt =
            std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        info!("loading viewer config from {}", path.display());
        toml::from_str::<ConfigFile>(&txt).context("parse walker TOML")?
    } else {
        ConfigFile::default()
    };
    resolve(file, |key| std::env::var(key).ok())
}

fn resolve(mut file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<ViewerConfig> {
    if let Some(profile) = env("WALKER_PROFILE") {
        file.profile = Some(profile);
    }
    if let Some(scene) = env("WALKER_SCENE") {
        file.scene = Some(scene);
    }

    let profile = file.profile.as_deref().unwrap_or("full_collision");
    let mut settings = ControllerSettings::profile(profile)?;
    file.controller.apply(&mut settings);

    if let Some(sens) = env("WALKER_MOUSE_SENS") {
        settings.mouse_sensitivity = sens
            .parse()
            .with_context(|| format!("WALKER_MOUSE_SENS={sens} is not a number"))?;
    }

    Ok(ViewerConfig {
        settings: settings.validated().context("invalid controller settings")?,
        scene: file.scene.unwrap_or_else(|| DEFAULT_SCENE.to_string()),
        collider_filter: file.collider_filter.filter(|f| !f.is_empty()),
    })
}
