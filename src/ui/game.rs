//! Game screen: question, option images and the answer controls for each round layout.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::config::GameConfig;
use crate::layout::fit_into_frame;
use crate::navigation::{ActiveRound, GameCommand, Screen};
use crate::resolver::Answer;
use crate::round::{ImageKind, RoundKind, RoundOption};
use crate::scoring::AnswerBadge;
use crate::state::GameState;
use super::{RestartDialog, progress_strip};

const FRAME_ONE_OF_TWO: Vec2 = Vec2::new(705.0, 455.0);
const FRAME_TWO_OF_TWO: Vec2 = Vec2::new(468.0, 458.0);
const FRAME_ONE_OF_THREE: Vec2 = Vec2::new(304.0, 455.0);
const COLOR_OPTION: egui::Color32 = egui::Color32::from_rgb(56, 68, 82);
const COLOR_PICKED: egui::Color32 = egui::Color32::from_rgb(200, 200, 140);

pub fn game_system(
    mut commands: MessageWriter<GameCommand>,
    mut contexts: EguiContexts,
    screen: Res<State<Screen>>,
    config: Res<GameConfig>,
    game: Res<GameState>,
    active_round: Res<ActiveRound>,
    dialog: Res<RestartDialog>,
) {
    let Screen::Game(index) = *screen.get() else { return };
    let Some(round) = game.round(index) else { return };
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let resolver = &active_round.resolver;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(16.0);
            ui.label(egui::RichText::new(&round.question).size(22.0));
            ui.add_space(16.0);

            // Controls stay visible but inert behind the restart dialog.
            ui.add_enabled_ui(!dialog.open, |ui| ui.horizontal(|ui| {
                match &round.kind {
                    RoundKind::OneOfTwo(option) => {
                        if let Some(kind) = binary_option(ui, option, FRAME_ONE_OF_TWO, resolver.selection(0)) {
                            commands.write(GameCommand::Answer { round: index, answer: Answer::Classify { option: 0, kind } });
                        }
                    }
                    RoundKind::TwoOfTwo(options) => {
                        for (i, option) in options.iter().enumerate() {
                            if let Some(kind) = binary_option(ui, option, FRAME_TWO_OF_TWO, resolver.selection(i)) {
                                commands.write(GameCommand::Answer { round: index, answer: Answer::Classify { option: i, kind } });
                            }
                        }
                    }
                    RoundKind::OneOfThree { options, .. } => {
                        for (i, option) in options.iter().enumerate() {
                            if pick_option(ui, option, resolver.picked() == Some(i)) {
                                commands.write(GameCommand::Answer { round: index, answer: Answer::Pick { option: i } });
                            }
                        }
                    }
                }
            }));

            ui.add_space(24.0);
            progress_strip(ui, &AnswerBadge::strip(game.answers(), &config));
        });
    });
}

fn option_image(option: &RoundOption, frame: Vec2) -> egui::Image<'_> {
    let size = fit_into_frame(frame, Vec2::new(option.image.width, option.image.height));
    egui::Image::from_uri(&option.image.url).fit_to_exact_size(egui::vec2(size.x, size.y))
}

/// Image with photo/painting toggles underneath. Returns the kind clicked this frame.
fn binary_option(
    ui: &mut egui::Ui,
    option: &RoundOption,
    frame: Vec2,
    selected: Option<ImageKind>,
) -> Option<ImageKind> {
    let mut clicked = None;
    egui::Frame::NONE
        .fill(COLOR_OPTION)
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add(option_image(option, frame));
                ui.horizontal(|ui| {
                    for kind in [ImageKind::Photo, ImageKind::Painting] {
                        if ui.selectable_label(selected == Some(kind), kind.label()).clicked() {
                            clicked = Some(kind);
                        }
                    }
                });
            });
        });
    clicked
}

/// Clickable image for one-of-three rounds. Returns true when clicked this frame.
fn pick_option(ui: &mut egui::Ui, option: &RoundOption, picked: bool) -> bool {
    let fill = if picked { COLOR_PICKED } else { COLOR_OPTION };
    egui::Frame::NONE
        .fill(fill)
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            ui.add(option_image(option, FRAME_ONE_OF_THREE).sense(egui::Sense::click()))
                .clicked()
        })
        .inner
}
