//! Input state for the first-person controller.
//!
//! The host translates its native events into [`InputEvent`]s and applies them
//! as they arrive. The simulation drains the pending mouse delta and jump request
//! once per tick, so any number of events between two frames coalesce into a
//! single update.

/// The four planar movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
}

/// Host-neutral input event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(MoveKey),
    KeyUp(MoveKey),
    /// Jump key pressed (an edge, not a held state).
    JumpPressed,
    /// Relative pointer motion in device units.
    MouseMotion { dx: f32, dy: f32 },
    /// Exclusive pointer capture entered (`true`) or exited (`false`).
    CaptureChanged(bool),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pending_look: (f32, f32),
    jump_requested: bool,
    captured: bool,
}

impl InputState {
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => *self.key_mut(key) = true,
            InputEvent::KeyUp(key) => *self.key_mut(key) = false,
            InputEvent::JumpPressed => self.jump_requested = true,
            InputEvent::MouseMotion { dx, dy } => self.accumulate_look(dx, dy),
            InputEvent::CaptureChanged(captured) => self.set_captured(captured),
        }
    }

    /// Accumulate mouse-look delta. Motion outside capture mode is discarded.
    pub fn accumulate_look(&mut self, dx: f32, dy: f32) {
        if !self.captured || !dx.is_finite() || !dy.is_finite() {
            return;
        }
        self.pending_look.0 += dx;
        self.pending_look.1 += dy;
    }

    /// Enter or leave capture mode. Leaving drops any undrained look delta.
    pub fn set_captured(&mut self, captured: bool) {
        if self.captured && !captured {
            self.pending_look = (0.0, 0.0);
        }
        self.captured = captured;
    }

    #[inline]
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    #[inline]
    pub fn is_held(&self, key: MoveKey) -> bool {
        match key {
            MoveKey::Forward => self.forward,
            MoveKey::Back => self.back,
            MoveKey::Left => self.left,
            MoveKey::Right => self.right,
        }
    }

    /// Drain the accumulated look delta.
    #[inline]
    pub fn take_look_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.pending_look)
    }

    /// Drain the jump request.
    #[inline]
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_requested)
    }

    fn key_mut(&mut self, key: MoveKey) -> &mut bool {
        match key {
            MoveKey::Forward => &mut self.forward,
            MoveKey::Back => &mut self.back,
            MoveKey::Left => &mut self.left,
            MoveKey::Right => &mut self.right,
        }
    }
}
