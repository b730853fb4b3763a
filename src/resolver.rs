//! Answer validation for the three round layouts.
//!
//! A `RoundResolver` collects the player's selections for one round and reports the
//! verdict exactly once, on the submission that completes the round.

use thiserror::Error;

use crate::round::{ImageKind, Round, RoundKind};

/// A single player input on a game screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// Photo/painting choice for one option of a binary round.
    Classify { option: usize, kind: ImageKind },
    /// Click on one option of a one-of-three round.
    Pick { option: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Selection recorded, round still waiting for more input.
    Pending,
    /// This submission completed the round.
    Resolved { is_correct: bool },
    /// The round was already resolved; nothing changed.
    Ignored,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("option {option} does not exist in a round of {len} options")]
    OptionOutOfRange { option: usize, len: usize },
    #[error("a {answer} answer does not fit a {layout} round")]
    LayoutMismatch { answer: &'static str, layout: &'static str },
}

fn layout_name(kind: &RoundKind) -> &'static str {
    match kind {
        RoundKind::OneOfTwo(_) => "one-of-two",
        RoundKind::TwoOfTwo(_) => "two-of-two",
        RoundKind::OneOfThree { .. } => "one-of-three",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundResolver {
    selections: Vec<Option<ImageKind>>,
    picked: Option<usize>,
    verdict: Option<bool>,
}

impl RoundResolver {
    pub fn new(round: &Round) -> Self {
        Self {
            selections: vec![None; round.options().len()],
            picked: None,
            verdict: None,
        }
    }

    pub fn selection(&self, option: usize) -> Option<ImageKind> {
        self.selections.get(option).copied().flatten()
    }

    pub fn picked(&self) -> Option<usize> {
        self.picked
    }

    pub fn is_complete(&self) -> bool {
        self.verdict.is_some()
    }

    /// Marks the round as failed by timeout. No-op once a verdict exists.
    pub fn expire(&mut self) {
        self.verdict.get_or_insert(false);
    }

    /// First option of a binary round that has no choice yet.
    pub fn first_unselected(&self) -> Option<usize> {
        self.selections.iter().position(Option::is_none)
    }

    pub fn submit(&mut self, round: &Round, answer: Answer) -> Result<Submission, ResolveError> {
        if self.verdict.is_some() {
            return Ok(Submission::Ignored);
        }
        let len = round.options().len();
        if self.selections.len() != len {
            self.selections = vec![None; len];
        }

        let verdict = match (&round.kind, answer) {
            (RoundKind::OneOfTwo(_) | RoundKind::TwoOfTwo(_), Answer::Classify { option, kind }) => {
                let slot = self
                    .selections
                    .get_mut(option)
                    .ok_or(ResolveError::OptionOutOfRange { option, len })?;
                *slot = Some(kind);
                self.binary_verdict(round)
            }
            (RoundKind::OneOfThree { options, target }, Answer::Pick { option }) => {
                let chosen = options
                    .get(option)
                    .ok_or(ResolveError::OptionOutOfRange { option, len })?;
                self.picked = Some(option);
                Some(chosen.kind == *target)
            }
            (kind, answer) => {
                return Err(ResolveError::LayoutMismatch {
                    answer: match answer {
                        Answer::Classify { .. } => "classify",
                        Answer::Pick { .. } => "pick",
                    },
                    layout: layout_name(kind),
                });
            }
        };

        self.verdict = verdict;
        Ok(match verdict {
            Some(is_correct) => Submission::Resolved { is_correct },
            None => Submission::Pending,
        })
    }

    /// `None` until every option has a choice, then whether all choices are right.
    fn binary_verdict(&self, round: &Round) -> Option<bool> {
        let mut all_correct = true;
        for (selection, option) in self.selections.iter().zip(round.options()) {
            all_correct &= (*selection)? == option.kind;
        }
        Some(all_correct)
    }
}
