//! UI systems using bevy_egui.
//!
//! Renders the header bar, one central panel per screen, and the restart/error dialogs.
//! UI components emit `GameCommand`s rather than directly mutating game state.

mod dialogs;
mod game;
mod header;
mod screens;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

use crate::navigation::Screen;
use crate::scoring::AnswerBadge;

pub use dialogs::RestartDialog;

pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<RestartDialog>()
            .add_systems(EguiPrimaryContextPass, (
                install_image_loaders,
                header::header_system,
                (
                    screens::welcome_system.run_if(in_state(Screen::Welcome)),
                    screens::greeting_system.run_if(in_state(Screen::Greeting)),
                    screens::rules_system.run_if(in_state(Screen::Rules)),
                    game::game_system.run_if(Screen::is_game),
                    screens::stats_system.run_if(in_state(Screen::Stats)),
                ),
                dialogs::RestartDialog::update.run_if(dialogs::RestartDialog::is_open),
                dialogs::fetch_error_notice.run_if(dialogs::fetch_failed),
            ).chain())
            ;
    }
}

/// Option images are remote URLs; egui needs the http fetcher and the image decoders.
fn install_image_loaders(mut contexts: EguiContexts, mut installed: Local<bool>) {
    if *installed {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else { return };
    add_image_loaders(ctx);
    *installed = true;
    debug!("Installed egui image loaders");
}

fn add_image_loaders(ctx: &egui::Context) {
    egui_extras::install_image_loaders(ctx);
}

const COLOR_CORRECT: egui::Color32 = egui::Color32::from_rgb(120, 200, 120);
const COLOR_FAST: egui::Color32 = egui::Color32::from_rgb(90, 170, 240);
const COLOR_SLOW: egui::Color32 = egui::Color32::from_rgb(230, 180, 70);
const COLOR_WRONG: egui::Color32 = egui::Color32::from_rgb(220, 80, 80);
const COLOR_UNKNOWN: egui::Color32 = egui::Color32::from_rgb(110, 110, 120);

/// One glyph per round: played rounds coloured by outcome, the rest greyed out.
fn progress_strip(ui: &mut egui::Ui, badges: &[AnswerBadge]) {
    ui.horizontal(|ui| {
        for badge in badges {
            let (glyph, color, hint) = match badge {
                AnswerBadge::Wrong => ("✖", COLOR_WRONG, "wrong"),
                AnswerBadge::Fast => ("⚡", COLOR_FAST, "fast"),
                AnswerBadge::Correct => ("●", COLOR_CORRECT, "correct"),
                AnswerBadge::Slow => ("🐢", COLOR_SLOW, "slow"),
                AnswerBadge::Unknown => ("○", COLOR_UNKNOWN, "not played"),
            };
            ui.label(egui::RichText::new(glyph).size(20.0).color(color))
                .on_hover_text(hint);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_egui::egui::load::{LoadError, SizeHint};

    #[test]
    fn option_images_have_a_loader() {
        let ctx = egui::Context::default();
        ctx.include_bytes("bytes://option.png", vec![0u8; 8]);
        assert!(matches!(
            ctx.try_load_image("bytes://option.png", SizeHint::default()),
            Err(LoadError::NoImageLoaders)
        ));

        add_image_loaders(&ctx);
        assert!(!matches!(
            ctx.try_load_image("bytes://option.png", SizeHint::default()),
            Err(LoadError::NoImageLoaders)
        ));
    }
}
