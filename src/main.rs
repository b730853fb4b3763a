//! Pixel Hunter - tell photographs from paintings against the clock.
//!
//! Built with Bevy 0.18 and bevy_egui. A session is a fixed chain of screens
//! (welcome, greeting, rules, ten game rounds, stats) driven by `GameCommand` messages.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

mod config;
mod countdown;
mod input;
mod layout;
mod navigation;
mod resolver;
mod round;
mod scoring;
mod source;
mod state;
mod ui;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Pixel Hunter".into(),
                    resolution: (1280, 720).into(),
                    ..default()
                }),
                ..default()
            })
            // Disable asset meta files as WASM version requests them and fails when they are not found.
            .set(AssetPlugin {
                meta_check: bevy::asset::AssetMetaCheck::Never,
                ..default()
            })
        )
        .add_plugins(EguiPlugin::default())
        .add_plugins((
            config::ConfigPlugin,
            navigation::NavigationPlugin,
            countdown::CountdownPlugin,
            source::SourcePlugin,
            input::InputPlugin,
            ui::UiPlugin,
        ))
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}
