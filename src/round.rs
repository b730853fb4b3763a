//! Round data model and its wire format.
//!
//! `RawRound` mirrors the JSON served by the round source. It is converted into a `Round`
//! once, at load time, so that malformed data fails loudly before any screen sees it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Photo,
    Painting,
}

impl ImageKind {
    pub fn label(self) -> &'static str {
        match self {
            ImageKind::Photo => "Photo",
            ImageKind::Painting => "Painting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundOption {
    pub image: ImageRef,
    pub kind: ImageKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoundKind {
    /// One image, classified as photo or painting.
    OneOfTwo(RoundOption),
    /// Two images, each classified independently.
    TwoOfTwo([RoundOption; 2]),
    /// Three images, the player picks the one whose kind equals `target`.
    OneOfThree { options: [RoundOption; 3], target: ImageKind },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub question: String,
    pub kind: RoundKind,
}

impl Round {
    pub fn options(&self) -> &[RoundOption] {
        match &self.kind {
            RoundKind::OneOfTwo(option) => std::slice::from_ref(option),
            RoundKind::TwoOfTwo(options) => options,
            RoundKind::OneOfThree { options, .. } => options,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unknown round type '{0}'")]
    UnknownType(String),
    #[error("round type '{kind}' expects {expected} options, got {actual}")]
    OptionCount { kind: &'static str, expected: usize, actual: usize },
    #[error("correct option {index} is out of range for {len} options")]
    CorrectOptionOutOfRange { index: usize, len: usize },
    #[error("cannot determine the target kind from question '{0}'")]
    UndeterminedTarget(String),
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRound {
    #[serde(rename = "type")]
    pub kind: String,
    pub question: String,
    pub answers: Vec<RawOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOption {
    pub image: ImageRef,
    #[serde(rename = "type")]
    pub kind: ImageKind,
}

const PAINTING_MARKERS: &[&str] = &["рисунок", "painting", "picture"];
const PHOTO_MARKERS: &[&str] = &["фото", "photo"];

/// Derives the kind to look for in a one-of-three round from its question text.
/// Exactly one family of marker words must be present.
fn target_from_question(question: &str) -> Option<ImageKind> {
    let lowered = question.to_lowercase();
    let painting = PAINTING_MARKERS.iter().any(|m| lowered.contains(m));
    let photo = PHOTO_MARKERS.iter().any(|m| lowered.contains(m));
    match (painting, photo) {
        (true, false) => Some(ImageKind::Painting),
        (false, true) => Some(ImageKind::Photo),
        _ => None,
    }
}

fn into_options<const N: usize>(
    kind: &'static str,
    answers: Vec<RawOption>,
) -> Result<[RoundOption; N], ConfigurationError> {
    let actual = answers.len();
    let options: Vec<RoundOption> = answers
        .into_iter()
        .map(|raw| RoundOption { image: raw.image, kind: raw.kind })
        .collect();
    options
        .try_into()
        .map_err(|_| ConfigurationError::OptionCount { kind, expected: N, actual })
}

impl TryFrom<RawRound> for Round {
    type Error = ConfigurationError;

    fn try_from(raw: RawRound) -> Result<Self, Self::Error> {
        let kind = match raw.kind.as_str() {
            "tinder-like" => {
                let [option] = into_options::<1>("tinder-like", raw.answers)?;
                RoundKind::OneOfTwo(option)
            }
            "two-of-two" => RoundKind::TwoOfTwo(into_options::<2>("two-of-two", raw.answers)?),
            "one-of-three" => {
                let options = into_options::<3>("one-of-three", raw.answers)?;
                let target = match raw.correct_option {
                    Some(index) => options
                        .get(index)
                        .map(|option| option.kind)
                        .ok_or(ConfigurationError::CorrectOptionOutOfRange { index, len: 3 })?,
                    None => target_from_question(&raw.question)
                        .ok_or_else(|| ConfigurationError::UndeterminedTarget(raw.question.clone()))?,
                };
                RoundKind::OneOfThree { options, target }
            }
            other => return Err(ConfigurationError::UnknownType(other.to_string())),
        };
        Ok(Round { question: raw.question, kind })
    }
}
