//! Score computation over an answer history.

use crate::config::GameConfig;
use crate::state::AnswerRecord;

/// Score reported for a session that did not answer every round.
pub const INCOMPLETE_SCORE: i32 = -1;

pub fn correct_count(answers: &[AnswerRecord]) -> usize {
    answers.iter().filter(|a| a.is_correct).count()
}

pub fn fast_count(answers: &[AnswerRecord], config: &GameConfig) -> usize {
    answers.iter().filter(|a| a.elapsed_secs < config.fast_answer_secs).count()
}

pub fn slow_count(answers: &[AnswerRecord], config: &GameConfig) -> usize {
    answers.iter().filter(|a| a.elapsed_secs > config.slow_answer_secs).count()
}

/// Total score, or `INCOMPLETE_SCORE` while fewer than `games_count` answers exist.
pub fn total_score(answers: &[AnswerRecord], lives: u32, config: &GameConfig) -> i32 {
    if answers.len() < config.games_count {
        return INCOMPLETE_SCORE;
    }
    ScoreBreakdown::new(answers, lives, config).total
}

/// Per-category figures shown on the stats screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub correct: usize,
    pub correct_points: i32,
    pub fast: usize,
    pub speed_points: i32,
    pub lives: u32,
    pub lives_points: i32,
    pub slow: usize,
    pub slow_points: i32,
    pub total: i32,
}

impl ScoreBreakdown {
    pub fn new(answers: &[AnswerRecord], lives: u32, config: &GameConfig) -> Self {
        let correct = correct_count(answers);
        let fast = fast_count(answers, config);
        let slow = slow_count(answers, config);
        let correct_points = correct as i32 * config.correct_points;
        let speed_points = fast as i32 * config.speed_bonus;
        let lives_points = lives as i32 * config.life_bonus;
        let slow_points = -(slow as i32 * config.slow_penalty);
        Self {
            correct,
            correct_points,
            fast,
            speed_points,
            lives,
            lives_points,
            slow,
            slow_points,
            total: correct_points + speed_points + lives_points + slow_points,
        }
    }
}

/// How a single round looks in the progress strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerBadge {
    Wrong,
    Fast,
    Correct,
    Slow,
    Unknown,
}

impl AnswerBadge {
    pub fn of(record: &AnswerRecord, config: &GameConfig) -> Self {
        if !record.is_correct {
            AnswerBadge::Wrong
        } else if record.elapsed_secs < config.fast_answer_secs {
            AnswerBadge::Fast
        } else if record.elapsed_secs > config.slow_answer_secs {
            AnswerBadge::Slow
        } else {
            AnswerBadge::Correct
        }
    }

    /// One badge per round; rounds not yet played are `Unknown`.
    pub fn strip(answers: &[AnswerRecord], config: &GameConfig) -> Vec<AnswerBadge> {
        (0..config.games_count)
            .map(|i| answers.get(i).map_or(AnswerBadge::Unknown, |a| AnswerBadge::of(a, config)))
            .collect()
    }
}
