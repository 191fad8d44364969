//! The simulation context owned by the host frame loop.
//!
//! Holds everything the first-person core needs between frames: settings, input,
//! camera pose, movement state and (once the world has loaded) the spatial index.

use crate::{
    collision::{GroundState, SpatialIndex, Vec3},
    input::{InputEvent, InputState},
    movement::{self, MovementState, StepOutcome},
    orientation::{CameraPose, Orientation},
    settings::ControllerSettings,
};

pub struct Simulation {
    settings: ControllerSettings,
    input: InputState,
    pose: CameraPose,
    movement: MovementState,
    index: Option<SpatialIndex>,
    world_ready: bool,
    last_step: StepOutcome,
}

impl Simulation {
    /// Start at the respawn pose. Every profile stays frozen until the host
    /// reports the world as loaded ([`Self::install_world`] or
    /// [`Self::mark_world_ready`]).
    pub fn new(settings: ControllerSettings) -> Self {
        let pose = CameraPose::new(
            settings.respawn_point(),
            Orientation::new(settings.respawn_pitch, settings.respawn_yaw),
        );
        Self {
            settings,
            input: InputState::default(),
            pose,
            movement: MovementState::default(),
            index: None,
            world_ready: false,
            last_step: StepOutcome::default(),
        }
    }

    /// Hand over the built spatial index. This is the readiness event that
    /// enables movement.
    pub fn install_world(&mut self, index: SpatialIndex) {
        log::info!(
            "world installed ({} collision triangles); movement enabled",
            index.triangle_count()
        );
        self.index = Some(index);
        self.world_ready = true;
    }

    /// Mark the world as loaded without collision geometry (every query misses).
    pub fn mark_world_ready(&mut self) {
        self.world_ready = true;
    }

    #[inline]
    pub fn handle_input(&mut self, event: InputEvent) {
        self.input.apply(event);
    }

    /// Advance one frame and return the pose for the render boundary.
    ///
    /// Before the world is ready the pose stays frozen; look motion is still
    /// drained every frame so nothing piles up while loading. A step that
    /// produces a non-finite pose is rolled back.
    pub fn tick(&mut self, dt: f32) -> CameraPose {
        if !self.world_ready {
            self.input.take_look_delta();
            return self.pose;
        }

        let mut dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if let Some(max_dt) = self.settings.max_frame_dt {
            dt = dt.min(max_dt);
        }

        if self.input.is_captured() {
            let (dx, dy) = self.input.take_look_delta();
            self.pose
                .orientation
                .apply_look(dx, dy, self.settings.mouse_sensitivity);
        }

        let before = self.pose;
        let outcome = movement::step_movement(
            &self.settings,
            self.index.as_ref(),
            &mut self.input,
            &mut self.pose,
            &mut self.movement,
            dt,
        );

        if !self.pose.is_finite() || !self.movement.velocity.iter().all(|v| v.is_finite()) {
            log::warn!("movement step produced a non-finite pose; freezing camera");
            self.pose = before;
            self.movement.velocity = Vec3::zeros();
        } else if outcome.jumped {
            log::debug!("jump from {:?}", self.pose.position);
        }
        self.last_step = outcome;

        self.pose
    }

    /// Downstream UI gate: world loaded and pointer captured.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.world_ready && self.input.is_captured()
    }

    #[inline]
    pub fn is_world_ready(&self) -> bool {
        self.world_ready
    }

    #[inline]
    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    /// Place the camera directly (spawn points, tests).
    pub fn set_pose(&mut self, pose: CameraPose) {
        self.pose = pose;
    }

    /// Contact, respawn and jump flags of the most recent step.
    #[inline]
    pub fn last_step(&self) -> StepOutcome {
        self.last_step
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.movement.velocity
    }

    #[inline]
    pub fn ground_state(&self) -> GroundState {
        self.movement.ground
    }

    #[inline]
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    #[inline]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[inline]
    pub fn spatial_index(&self) -> Option<&SpatialIndex> {
        self.index.as_ref()
    }
}
