use bevy::{
    prelude::*,
    window::{CursorGrabMode, CursorOptions, PrimaryWindow, WindowFocused},
};
use leafwing_input_manager::prelude::ActionState;
use walker_shared::InputEvent;

use crate::{AppSystems, input::InputAction, player::PlayerSimulation};

const CROSSHAIR_SIZE: f32 = 6.0;

#[derive(Component)]
struct Crosshair;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_crosshair);

    app.add_systems(
        Update,
        (grab_cursor, release_on_focus_lost, sync_capture)
            .chain()
            .in_set(AppSystems::RecordInput),
    );

    app.add_systems(PostUpdate, show_crosshair);
}

fn set_grab(cursor: &mut CursorOptions, grabbed: bool) {
    if grabbed {
        #[cfg(not(target_family = "wasm"))]
        {
            cursor.grab_mode = CursorGrabMode::Locked;
        }
        #[cfg(target_family = "wasm")]
        {
            cursor.grab_mode = CursorGrabMode::Confined;
        }
        cursor.visible = false;
    } else {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    }
}

fn is_grabbed(cursor: &CursorOptions) -> bool {
    cursor.grab_mode != CursorGrabMode::None
}

/// Left click captures the pointer, Escape lets it go.
fn grab_cursor(
    actions: Res<ActionState<InputAction>>,
    mut cursor_query: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let Ok(mut cursor) = cursor_query.single_mut() else {
        return;
    };

    if actions.just_pressed(&InputAction::Release) && is_grabbed(&cursor) {
        set_grab(&mut cursor, false);
    } else if actions.just_pressed(&InputAction::Capture) && !is_grabbed(&cursor) {
        set_grab(&mut cursor, true);
    }
}

fn release_on_focus_lost(
    mut messages: MessageReader<WindowFocused>,
    mut cursor_query: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    for message in messages.read() {
        if message.focused {
            continue;
        }
        if let Ok(mut cursor) = cursor_query.single_mut() {
            set_grab(&mut cursor, false);
        }
    }
}

/// Forward capture transitions to the simulation. Compared against the window
/// state every frame so an OS-side release is picked up too.
fn sync_capture(
    cursor_query: Query<&CursorOptions, With<PrimaryWindow>>,
    mut sim: ResMut<PlayerSimulation>,
) {
    let grabbed = cursor_query.single().is_ok_and(is_grabbed);
    if grabbed != sim.input().is_captured() {
        debug!("pointer capture {}", if grabbed { "entered" } else { "left" });
        sim.handle_input(InputEvent::CaptureChanged(grabbed));
    }
}

fn spawn_crosshair(mut commands: Commands) {
    commands.spawn((
        Name::new("Crosshair"),
        Crosshair,
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(50.0),
            top: Val::Percent(50.0),
            width: Val::Px(CROSSHAIR_SIZE),
            height: Val::Px(CROSSHAIR_SIZE),
            margin: UiRect {
                left: Val::Px(-CROSSHAIR_SIZE / 2.0),
                top: Val::Px(-CROSSHAIR_SIZE / 2.0),
                ..default()
            },
            ..default()
        },
        BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.85)),
        Visibility::Hidden,
    ));
}

fn show_crosshair(
    sim: Res<PlayerSimulation>,
    mut crosshair: Query<&mut Visibility, With<Crosshair>>,
) {
    let desired = if sim.is_active() {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut visibility in &mut crosshair {
        visibility.set_if_neq(desired);
    }
}
