//! Header bar: back button, and on game screens the countdown and remaining lives.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::GameConfig;
use crate::countdown::RoundClock;
use crate::navigation::Screen;
use crate::state::GameState;
use super::RestartDialog;

const COLOR_TIMER: egui::Color32 = egui::Color32::WHITE;
const COLOR_TIMER_URGENT: egui::Color32 = egui::Color32::from_rgb(240, 60, 60);

pub fn header_system(
    mut contexts: EguiContexts,
    mut dialog: ResMut<RestartDialog>,
    screen: Res<State<Screen>>,
    config: Res<GameConfig>,
    game: Res<GameState>,
    round_clock: Res<RoundClock>,
) {
    let screen = *screen.get();
    if !screen.can_restart() {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else { return };

    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("⬅ Back").clicked() {
                dialog.open = true;
            }

            let Screen::Game(_) = screen else { return };
            ui.separator();

            let countdown = &round_clock.countdown;
            let color = if config.is_urgent(countdown.remaining_ms()) {
                COLOR_TIMER_URGENT
            } else {
                COLOR_TIMER
            };
            ui.label(egui::RichText::new(format!("{:>2}", countdown.remaining_secs()))
                .monospace()
                .size(28.0)
                .color(color));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                for slot in 0..config.lives_count {
                    let heart = if slot < game.lives() { "♥" } else { "♡" };
                    ui.label(egui::RichText::new(heart).size(22.0).color(COLOR_TIMER_URGENT));
                }
            });
        });
    });
}
