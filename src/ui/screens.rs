//! Static screens: welcome, greeting, rules and stats.
//!
//! Each screen is one central panel; buttons emit `GameCommand`s.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::GameConfig;
use crate::navigation::GameCommand;
use crate::scoring::{AnswerBadge, ScoreBreakdown, total_score, INCOMPLETE_SCORE};
use crate::source::RoundPool;
use crate::state::GameState;
use super::progress_strip;

const CARD_ROUNDING: u8 = 6;
const CARD_INNER_MARGIN: i8 = 16;
const COLOR_CARD: egui::Color32 = egui::Color32::from_rgb(45, 55, 72);
const COLOR_HINT: egui::Color32 = egui::Color32::from_rgb(160, 170, 180);
const COLOR_VALUE: egui::Color32 = egui::Color32::from_rgb(140, 200, 200);

pub fn welcome_system(mut commands: MessageWriter<GameCommand>, mut contexts: EguiContexts) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(160.0);
            ui.label(egui::RichText::new("PIXEL HUNTER").size(56.0).strong());
            ui.add_space(8.0);
            ui.label(egui::RichText::new("Photo or painting? Trust your eyes.").color(COLOR_HINT));
            ui.add_space(32.0);
            if ui.button(egui::RichText::new("✱").size(40.0)).clicked() {
                commands.write(GameCommand::Advance);
            }
        });
    });
}

pub fn greeting_system(mut commands: MessageWriter<GameCommand>, mut contexts: EguiContexts) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            card(ui, "Hello, Hunter!", |ui| {
                ui.label("Your task is simple: tell a photograph from a painting.");
                ui.add_space(4.0);
                ui.label("It is harder than it looks. Painters have learned to imitate \
                    photographs so well that the difference is almost invisible.");
                ui.add_space(4.0);
                ui.label(egui::RichText::new("Are you up for it?").italics().color(COLOR_HINT));
            });
            ui.add_space(24.0);
            if ui.button(egui::RichText::new("Continue ➡").size(20.0)).clicked() {
                commands.write(GameCommand::Advance);
            }
        });
    });
}

pub fn rules_system(
    mut commands: MessageWriter<GameCommand>,
    mut contexts: EguiContexts,
    config: Res<GameConfig>,
    pool: Res<RoundPool>,
    mut player_name: Local<String>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            card(ui, "Rules", |ui| {
                ui.label(format!(
                    "Guess {} times whether each image is a photo or a painting.",
                    config.games_count
                ));
                ui.label("Some rounds show one image, some two, some ask you to pick one out of three.");
                ui.label(format!(
                    "You have {} seconds per answer and may make {} mistakes.",
                    config.time_to_answer_secs(),
                    config.lives_count
                ));
                ui.label(format!(
                    "Answers under {}s earn a bonus, answers over {}s cost points.",
                    config.fast_answer_secs, config.slow_answer_secs
                ));
            });
            ui.add_space(24.0);

            let mut submitted = false;
            ui.horizontal(|ui| {
                let edit = ui.add(egui::TextEdit::singleline(&mut *player_name)
                    .hint_text("Your name")
                    .desired_width(240.0));
                submitted |= edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                let ready = *pool == RoundPool::Ready && !player_name.trim().is_empty();
                submitted |= ui.add_enabled(ready, egui::Button::new("Go!")).clicked();
                if *pool == RoundPool::Loading {
                    ui.spinner();
                    ui.label("Loading rounds...");
                }
            });
            if submitted {
                commands.write(GameCommand::Start { player_name: player_name.trim().to_string() });
            }
        });
    });
}

pub fn stats_system(
    mut contexts: EguiContexts,
    config: Res<GameConfig>,
    game: Res<GameState>,
) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let answers = game.answers();
    let total = total_score(answers, game.lives(), &config);
    let breakdown = ScoreBreakdown::new(answers, game.lives(), &config);

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            let title = if total == INCOMPLETE_SCORE { "Defeat" } else { "Victory!" };
            ui.label(egui::RichText::new(title).size(40.0).strong());
            if !game.player_name.is_empty() {
                ui.label(egui::RichText::new(&game.player_name).color(COLOR_HINT));
            }
            ui.add_space(16.0);

            card(ui, "Results", |ui| {
                progress_strip(ui, &AnswerBadge::strip(answers, &config));
                ui.add_space(8.0);
                ui.separator();
                if total == INCOMPLETE_SCORE {
                    stat_row(ui, "Total", "FAIL".to_string());
                    return;
                }
                stat_row(ui, "Correct answers", format!(
                    "{} × {} = {}", breakdown.correct, config.correct_points, breakdown.correct_points
                ));
                stat_row(ui, "Speed bonus", format!(
                    "{} × {} = {}", breakdown.fast, config.speed_bonus, breakdown.speed_points
                ));
                stat_row(ui, "Lives bonus", format!(
                    "{} × {} = {}", breakdown.lives, config.life_bonus, breakdown.lives_points
                ));
                stat_row(ui, "Slow penalty", format!(
                    "{} × {} = {}", breakdown.slow, config.slow_penalty, breakdown.slow_points
                ));
                ui.separator();
                stat_row(ui, "Total", total.to_string());
            });
        });
    });
}

// ── Shared frame helpers ────────────────────────────────────────────────────

fn card(ui: &mut egui::Ui, title: &str, content: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::NONE
        .fill(COLOR_CARD)
        .corner_radius(egui::CornerRadius::same(CARD_ROUNDING))
        .inner_margin(egui::Margin::same(CARD_INNER_MARGIN))
        .show(ui, |ui| {
            ui.set_max_width(560.0);
            ui.heading(egui::RichText::new(title).color(egui::Color32::WHITE).strong());
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(6.0);
            content(ui);
        });
}

fn stat_row(ui: &mut egui::Ui, label: &str, value: String) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.strong(egui::RichText::new(value).color(COLOR_VALUE));
        });
    });
}
