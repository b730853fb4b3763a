//! Per-round countdown.
//!
//! `CountdownTimer` is the pure clock: it only moves when `tick()` is called. The
//! `RoundClock` resource drives it from Bevy's frame time while a game screen is active
//! and turns expiry into a `GameCommand::TimeUp` tagged with the round on screen. The
//! clock does not run while the restart dialog is open.

use bevy::prelude::*;
use std::time::Duration;

use crate::config::GameConfig;
use crate::navigation::{ActiveRound, GameCommand, Screen};
use crate::ui::RestartDialog;

pub struct CountdownPlugin;
impl Plugin for CountdownPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<RoundClock>()
            .init_resource::<RestartDialog>()
            // The restart dialog is modal: the round is frozen until it closes.
            .add_systems(Update, RoundClock::drive
                .run_if(Screen::is_game)
                .run_if(not(RestartDialog::is_open))
                .before(GameCommand::process))
            ;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Time left, clock still running.
    Running(u32),
    /// This tick reached zero; the round must resolve as a timeout.
    Expired,
    /// The timer was already stopped, nothing happened.
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimer {
    budget_ms: u32,
    step_ms: u32,
    remaining_ms: u32,
    active: bool,
}

impl CountdownTimer {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            budget_ms: config.time_to_answer_ms,
            step_ms: config.tick_ms,
            remaining_ms: config.time_to_answer_ms,
            active: true,
        }
    }

    /// A timer that never ran, used outside of game screens.
    pub fn stopped(config: &GameConfig) -> Self {
        Self { active: false, ..Self::new(config) }
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_ms / 1_000
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whole seconds used out of the budget, frozen once the timer stops.
    pub fn elapsed_secs(&self) -> u32 {
        (self.budget_ms - self.remaining_ms) / 1_000
    }

    pub fn tick(&mut self) -> Tick {
        if !self.active {
            return Tick::Stopped;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(self.step_ms);
        if self.remaining_ms == 0 {
            self.active = false;
            Tick::Expired
        } else {
            Tick::Running(self.remaining_ms)
        }
    }

    pub fn stop(&mut self) {
        self.active = false;
    }
}

/// The live countdown of the current game screen plus the frame-time clock that ticks it.
#[derive(Resource)]
pub struct RoundClock {
    pub countdown: CountdownTimer,
    clock: Timer,
}

impl FromWorld for RoundClock {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource_or_init::<GameConfig>();
        RoundClock::idle(&config)
    }
}

impl RoundClock {
    pub fn idle(config: &GameConfig) -> Self {
        Self {
            countdown: CountdownTimer::stopped(config),
            clock: Timer::new(Duration::from_millis(config.tick_ms as u64), TimerMode::Repeating),
        }
    }

    /// Replaces the countdown with a fresh one. Called on every game-screen entry.
    pub fn restart(&mut self, config: &GameConfig) {
        *self = Self::idle(config);
        self.countdown = CountdownTimer::new(config);
    }

    pub fn stop(&mut self) {
        self.countdown.stop();
    }

    fn drive(
        time: Res<Time>,
        mut round_clock: ResMut<RoundClock>,
        active_round: Res<ActiveRound>,
        mut commands: MessageWriter<GameCommand>,
    ) {
        if !round_clock.countdown.is_active() {
            return;
        }
        round_clock.clock.tick(time.delta());
        for _ in 0..round_clock.clock.times_finished_this_tick() {
            if round_clock.countdown.tick() == Tick::Expired {
                debug!("Countdown of round {} expired", active_round.index);
                commands.write(GameCommand::TimeUp { round: active_round.index });
                break;
            }
        }
    }
}
