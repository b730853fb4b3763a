//! Core session state shared by every screen.
//!
//! `GameState` is the single mutable resource of a session: player name, lives, the drawn
//! rounds and the append-only answer history.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::round::Round;

/// Outcome of one resolved round. Field names follow the results endpoint payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    #[serde(rename = "isOK")]
    pub is_correct: bool,
    #[serde(rename = "time")]
    pub elapsed_secs: u32,
}

impl AnswerRecord {
    pub fn new(is_correct: bool, elapsed_secs: u32) -> Self {
        Self { is_correct, elapsed_secs }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct GameState {
    pub player_name: String,
    lives: u32,
    initial_lives: u32,
    rounds: Vec<Round>,
    answers: Vec<AnswerRecord>,
    is_game_over: bool,
}

impl FromWorld for GameState {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource_or_init::<GameConfig>();
        GameState::new(&config)
    }
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            player_name: String::new(),
            lives: config.lives_count,
            initial_lives: config.lives_count,
            rounds: Vec::new(),
            answers: Vec::new(),
            is_game_over: false,
        }
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn round(&self, index: usize) -> Option<&Round> {
        self.rounds.get(index)
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn has_rounds(&self) -> bool {
        !self.rounds.is_empty()
    }

    /// Installs the rounds drawn for this session. Only the first call has any effect.
    pub fn set_rounds(&mut self, rounds: Vec<Round>) {
        if self.rounds.is_empty() {
            self.rounds = rounds;
        }
    }

    /// Restores lives and clears the history. Rounds and the player name are kept.
    pub fn reset(&mut self) {
        self.lives = self.initial_lives;
        self.answers.clear();
        self.is_game_over = false;
    }

    /// Appends a record. The history never grows past the number of rounds; extra records
    /// are dropped with a warning.
    pub fn add_answer(&mut self, record: AnswerRecord) {
        if self.answers.len() < self.rounds.len() {
            self.answers.push(record);
        } else {
            warn!("Dropping answer beyond the last round: {:?}", record);
        }
    }

    /// Takes a life. A wrong answer with no lives left ends the game instead.
    pub fn minus_live(&mut self) {
        if self.lives == 0 {
            self.is_game_over = true;
        } else {
            self.lives -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::fixtures;
    use crate::round::ImageKind;

    fn state_with_rounds(count: usize) -> GameState {
        let mut state = GameState::new(&GameConfig::default());
        state.set_rounds(vec![fixtures::one_of_two(ImageKind::Photo); count]);
        state
    }

    #[test]
    fn game_over_fires_on_fourth_wrong_answer() {
        let mut state = state_with_rounds(10);
        let mut seen = Vec::new();
        for _ in 0..4 {
            state.minus_live();
            seen.push((state.lives(), state.is_game_over()));
        }
        assert_eq!(seen, vec![(2, false), (1, false), (0, false), (0, true)]);
    }

    #[test]
    fn lives_never_increase_or_go_negative() {
        let mut state = state_with_rounds(10);
        let mut previous = state.lives();
        for _ in 0..10 {
            state.minus_live();
            assert!(state.lives() <= previous);
            previous = state.lives();
        }
        assert_eq!(state.lives(), 0);
        assert!(state.is_game_over());
    }

    #[test]
    fn reset_restores_session_but_keeps_rounds() {
        let mut state = state_with_rounds(10);
        state.player_name = "Ann".into();
        state.add_answer(AnswerRecord::new(false, 30));
        for _ in 0..4 {
            state.minus_live();
        }
        state.reset();
        assert_eq!(state.lives(), 3);
        assert!(state.answers().is_empty());
        assert!(!state.is_game_over());
        assert_eq!(state.rounds().len(), 10);
        assert_eq!(state.player_name, "Ann");
    }

    #[test]
    fn rounds_are_drawn_once() {
        let mut state = state_with_rounds(2);
        state.set_rounds(vec![fixtures::one_of_two(ImageKind::Painting); 5]);
        assert_eq!(state.rounds().len(), 2);
    }

    #[test]
    fn answers_never_outnumber_rounds() {
        let mut state = state_with_rounds(2);
        for _ in 0..3 {
            state.add_answer(AnswerRecord::new(true, 12));
        }
        assert_eq!(state.answers().len(), 2);
    }

    #[test]
    fn answer_record_wire_names() {
        let json = serde_json::to_string(&AnswerRecord::new(true, 30)).unwrap();
        assert_eq!(json, r#"{"isOK":true,"time":30}"#);
    }
}
