//! Modal windows: restart confirmation and the round-source error notice.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::navigation::GameCommand;
use crate::source::RoundPool;

#[derive(Resource, Default)]
pub struct RestartDialog {
    pub open: bool,
}
impl RestartDialog {
    pub fn is_open(dialog: Res<RestartDialog>) -> bool {
        dialog.open
    }

    /// Confirming restarts the session; cancelling returns to the screen with its timer as it was.
    pub fn update(
        mut commands: MessageWriter<GameCommand>,
        mut contexts: EguiContexts,
        mut dialog: ResMut<RestartDialog>,
    ) {
        let Ok(ctx) = contexts.ctx_mut() else { return };

        egui::Window::new("Restart")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Are you sure you want to start over?");
                ui.label(egui::RichText::new("Your progress will be lost.").italics());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let choice = if ui.button("Ok").clicked() {
                        Some(true)
                    } else if ui.button("Cancel").clicked() {
                        Some(false)
                    } else {
                        None
                    };
                    if let Some(command) = choice.and_then(|confirmed| dialog.close(confirmed)) {
                        commands.write(command);
                    }
                });
            });
    }

    /// Closes the dialog. Only a confirmation produces a command.
    pub fn close(&mut self, confirmed: bool) -> Option<GameCommand> {
        self.open = false;
        confirmed.then_some(GameCommand::Restart)
    }
}

pub fn fetch_failed(pool: Res<RoundPool>) -> bool {
    matches!(*pool, RoundPool::Failed(_))
}

pub fn fetch_error_notice(mut contexts: EguiContexts, pool: Res<RoundPool>) {
    let Ok(ctx) = contexts.ctx_mut() else { return };
    let RoundPool::Failed(reason) = &*pool else { return };

    egui::Window::new("Something went wrong")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
        .show(ctx, |ui| {
            ui.label("The rounds could not be loaded. Please reload the page later.");
            ui.label(egui::RichText::new(reason).small().weak());
        });
}
