use bevy::{input::mouse::AccumulatedMouseMotion, prelude::*};
use leafwing_input_manager::prelude::*;
use walker_shared::{InputEvent, MoveKey};

use crate::{AppSystems, player::PlayerSimulation};

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    Forward,
    Back,
    Left,
    Right,
    Jump,
    /// Request pointer capture.
    Capture,
    /// Leave pointer capture.
    Release,
}

impl InputAction {
    const MOVES: [(InputAction, MoveKey); 4] = [
        (InputAction::Forward, MoveKey::Forward),
        (InputAction::Back, MoveKey::Back),
        (InputAction::Left, MoveKey::Left),
        (InputAction::Right, MoveKey::Right),
    ];
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let mut input_map = InputMap::<InputAction>::default();
    input_map
        .insert(InputAction::Forward, KeyCode::KeyW)
        .insert(InputAction::Forward, KeyCode::ArrowUp)
        .insert(InputAction::Back, KeyCode::KeyS)
        .insert(InputAction::Back, KeyCode::ArrowDown)
        .insert(InputAction::Left, KeyCode::KeyA)
        .insert(InputAction::Left, KeyCode::ArrowLeft)
        .insert(InputAction::Right, KeyCode::KeyD)
        .insert(InputAction::Right, KeyCode::ArrowRight)
        .insert(InputAction::Jump, KeyCode::Space)
        .insert(InputAction::Release, KeyCode::Escape);
    input_map.insert(InputAction::Capture, MouseButton::Left);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());

    app.add_systems(
        Update,
        (forward_actions, forward_mouse_motion).in_set(AppSystems::RecordInput),
    );
}

/// Turn action edges into key and jump events.
fn forward_actions(actions: Res<ActionState<InputAction>>, mut sim: ResMut<PlayerSimulation>) {
    for (action, key) in InputAction::MOVES {
        if actions.just_pressed(&action) {
            sim.handle_input(InputEvent::KeyDown(key));
        }
        if actions.just_released(&action) {
            sim.handle_input(InputEvent::KeyUp(key));
        }
    }
    if actions.just_pressed(&InputAction::Jump) {
        sim.handle_input(InputEvent::JumpPressed);
    }
}

fn forward_mouse_motion(motion: Res<AccumulatedMouseMotion>, mut sim: ResMut<PlayerSimulation>) {
    if motion.delta == Vec2::ZERO {
        return;
    }
    sim.handle_input(InputEvent::MouseMotion {
        dx: motion.delta.x,
        dy: motion.delta.y,
    });
}
