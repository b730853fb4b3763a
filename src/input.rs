//! Keyboard input handling.
//!
//! Enter advances the intro screens, Escape asks to restart, digit keys answer rounds.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::navigation::{ActiveRound, GameCommand, Screen};
use crate::resolver::{Answer, RoundResolver};
use crate::round::{ImageKind, RoundKind};
use crate::state::GameState;
use crate::ui::RestartDialog;

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(Update, handle_input)
            ;
    }
}

const PICK_KEYS: [KeyCode; 3] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];

/// Keys pressed this frame that mean something to the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Keys {
    escape: bool,
    enter: bool,
    /// Zero-based index of the digit key, `Digit1` being 0.
    digit: Option<usize>,
}

impl Keys {
    fn read(keyboard: &ButtonInput<KeyCode>) -> Self {
        Self {
            escape: keyboard.just_pressed(KeyCode::Escape),
            enter: keyboard.just_pressed(KeyCode::Enter),
            digit: PICK_KEYS.iter().position(|&k| keyboard.just_pressed(k)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum KeyAction {
    OpenRestartDialog,
    Command(GameCommand),
}

fn handle_input(
    mut commands: MessageWriter<GameCommand>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut contexts: EguiContexts,
    mut dialog: ResMut<RestartDialog>,
    screen: Res<State<Screen>>,
    game: Res<GameState>,
    active_round: Res<ActiveRound>,
) {
    if contexts.ctx_mut().is_ok_and(|ctx| ctx.wants_keyboard_input()) {
        return;
    }
    let keys = Keys::read(&keyboard);
    match key_action(keys, *screen.get(), dialog.open, &game, &active_round) {
        Some(KeyAction::OpenRestartDialog) => dialog.open = true,
        Some(KeyAction::Command(command)) => {
            commands.write(command);
        }
        None => {}
    }
}

fn key_action(
    keys: Keys,
    screen: Screen,
    dialog_open: bool,
    game: &GameState,
    active_round: &ActiveRound,
) -> Option<KeyAction> {
    if dialog_open {
        return None;
    }
    if keys.escape && screen.can_restart() {
        return Some(KeyAction::OpenRestartDialog);
    }
    if keys.enter && matches!(screen, Screen::Welcome | Screen::Greeting) {
        return Some(KeyAction::Command(GameCommand::Advance));
    }

    let Screen::Game(index) = screen else { return None };
    // selections still belong to the previous round until the screen is entered
    if active_round.index != index {
        return None;
    }
    let round = game.round(index)?;
    let answer = answer_for_key(&round.kind, &active_round.resolver, keys.digit?)?;
    Some(KeyAction::Command(GameCommand::Answer { round: index, answer }))
}

/// 1 = photo, 2 = painting on binary rounds, applied to the first option still open.
/// 1..3 pick an option on one-of-three rounds.
fn answer_for_key(kind: &RoundKind, resolver: &RoundResolver, key: usize) -> Option<Answer> {
    match kind {
        RoundKind::OneOfTwo(_) | RoundKind::TwoOfTwo(_) => {
            let kind = match key {
                0 => ImageKind::Photo,
                1 => ImageKind::Painting,
                _ => return None,
            };
            Some(Answer::Classify { option: resolver.first_unselected()?, kind })
        }
        RoundKind::OneOfThree { options, .. } => (key < options.len()).then_some(Answer::Pick { option: key }),
    }
}
