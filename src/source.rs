//! Round source and results sink.
//!
//! Rounds are fetched once at startup on the async task pool, validated, sampled and
//! installed into `GameState`. Results are posted fire-and-forget when the stats screen
//! is entered.

use bevy::prelude::*;
use bevy::tasks::{block_on, poll_once, AsyncComputeTaskPool, Task};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;

use crate::config::GameConfig;
use crate::navigation::Screen;
use crate::round::{ConfigurationError, RawRound, Round};
use crate::state::{AnswerRecord, GameState};

pub struct SourcePlugin;
impl Plugin for SourcePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<RoundPool>()
            .init_resource::<PendingFetch>()
            .init_resource::<PendingSubmit>()
            .add_systems(Startup, PendingFetch::start)
            .add_systems(Update, (PendingFetch::poll, PendingSubmit::poll))
            .add_systems(OnEnter(Screen::Stats), PendingSubmit::start)
            ;
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("cannot read round source: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(target_arch = "wasm32")]
    #[error("round request failed: {0}")]
    Http(#[from] gloo_net::Error),
    #[error("round source is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed round: {0}")]
    Malformed(#[from] ConfigurationError),
    #[error("round source has {available} rounds, {needed} needed")]
    TooFewRounds { available: usize, needed: usize },
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("cannot serialize results: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(target_arch = "wasm32")]
    #[error("results request failed: {0}")]
    Http(#[from] gloo_net::Error),
    #[cfg(target_arch = "wasm32")]
    #[error("results endpoint answered {0}")]
    Status(u16),
}

/// Load status of the round pool, read by the rules screen and the error notice.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub enum RoundPool {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

// ============================================================================
// Parsing and sampling
// ============================================================================

/// Parses the wire payload and validates every round in it.
pub fn parse_rounds(bytes: &[u8]) -> Result<Vec<Round>, FetchError> {
    let raw: Vec<RawRound> = serde_json::from_slice(bytes)?;
    let rounds = raw
        .into_iter()
        .map(Round::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rounds)
}

/// Draws `count` distinct rounds from the pool, in random order.
pub fn sample_rounds(pool: Vec<Round>, count: usize, seed: u64) -> Result<Vec<Round>, FetchError> {
    if pool.len() < count {
        return Err(FetchError::TooFewRounds { available: pool.len(), needed: count });
    }
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(pool.choose_multiple(&mut rng, count).cloned().collect())
}

#[cfg(not(target_arch = "wasm32"))]
fn session_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(42)
}

#[cfg(target_arch = "wasm32")]
fn session_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_bytes(source: String) -> Result<Vec<u8>, FetchError> {
    Ok(std::fs::read(source)?)
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(source: String) -> Result<Vec<u8>, FetchError> {
    let response = gloo_net::http::Request::get(&source).send().await?;
    Ok(response.binary().await?)
}

async fn fetch_rounds(source: String, count: usize, seed: u64) -> Result<Vec<Round>, FetchError> {
    let bytes = fetch_bytes(source).await?;
    sample_rounds(parse_rounds(&bytes)?, count, seed)
}

// ============================================================================
// Fetch task
// ============================================================================

/// Holds the startup fetch task until it completes.
#[derive(Resource, Default)]
pub struct PendingFetch {
    task: Option<Task<Result<Vec<Round>, FetchError>>>,
}
impl PendingFetch {
    fn start(mut pending: ResMut<PendingFetch>, config: Res<GameConfig>) {
        let source = config.rounds_source.clone();
        let count = config.games_count;
        info!("Fetching rounds from {}", source);
        let task_pool = AsyncComputeTaskPool::get();
        pending.task = Some(task_pool.spawn(fetch_rounds(source, count, session_seed())));
    }

    fn poll(
        mut pending: ResMut<PendingFetch>,
        mut pool: ResMut<RoundPool>,
        mut game: ResMut<GameState>,
    ) {
        let Some(task) = &mut pending.task else { return };
        let Some(result) = block_on(poll_once(task)) else { return };
        match result {
            Ok(rounds) => {
                info!("Loaded {} rounds", rounds.len());
                game.set_rounds(rounds);
                *pool = RoundPool::Ready;
            }
            Err(e) => {
                error!("Failed to load rounds: {}", e);
                *pool = RoundPool::Failed(e.to_string());
            }
        }
        pending.task = None;
    }
}

// ============================================================================
// Results sink
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ResultsPayload {
    pub answers: Vec<AnswerRecord>,
    pub lives: u32,
}

impl ResultsPayload {
    pub fn from_state(game: &GameState) -> Self {
        Self { answers: game.answers().to_vec(), lives: game.lives() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn submit_results(_endpoint: String, payload: ResultsPayload) -> Result<(), SubmitError> {
    let body = serde_json::to_string(&payload)?;
    info!(target: "pixel_hunter::results", "{}", body);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
async fn submit_results(endpoint: String, payload: ResultsPayload) -> Result<(), SubmitError> {
    let response = gloo_net::http::Request::post(&endpoint)
        .json(&payload)?
        .send()
        .await?;
    if !response.ok() {
        return Err(SubmitError::Status(response.status()));
    }
    Ok(())
}

/// Fire-and-forget results upload. Failures are only logged.
#[derive(Resource, Default)]
pub struct PendingSubmit {
    task: Option<Task<Result<(), SubmitError>>>,
}
impl PendingSubmit {
    fn start(mut pending: ResMut<PendingSubmit>, config: Res<GameConfig>, game: Res<GameState>) {
        let payload = ResultsPayload::from_state(&game);
        let task_pool = AsyncComputeTaskPool::get();
        pending.task = Some(task_pool.spawn(submit_results(config.results_endpoint.clone(), payload)));
    }

    fn poll(mut pending: ResMut<PendingSubmit>) {
        let Some(task) = &mut pending.task else { return };
        let Some(result) = block_on(poll_once(task)) else { return };
        match result {
            Ok(()) => debug!("Results submitted"),
            Err(e) => warn!("Failed to submit results: {}", e),
        }
        pending.task = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::fixtures;
    use crate::round::ImageKind::{Painting, Photo};

    fn pool(size: usize) -> Vec<Round> {
        (0..size)
            .map(|i| {
                let mut round = fixtures::one_of_two(if i % 2 == 0 { Photo } else { Painting });
                round.question = format!("round {i}");
                round
            })
            .collect()
    }

    #[test]
    fn samples_without_replacement() {
        let rounds = sample_rounds(pool(25), 10, 7).unwrap();
        assert_eq!(rounds.len(), 10);
        let mut questions: Vec<&str> = rounds.iter().map(|r| r.question.as_str()).collect();
        questions.sort();
        questions.dedup();
        assert_eq!(questions.len(), 10);
    }

    #[test]
    fn same_seed_same_draw() {
        assert_eq!(sample_rounds(pool(25), 10, 99).unwrap(), sample_rounds(pool(25), 10, 99).unwrap());
    }

    #[test]
    fn small_pool_is_a_fetch_failure() {
        assert!(matches!(
            sample_rounds(pool(4), 10, 1),
            Err(FetchError::TooFewRounds { available: 4, needed: 10 })
        ));
    }

    #[test]
    fn bundled_pool_is_playable() {
        let rounds = parse_rounds(include_bytes!("../assets/rounds.json")).unwrap();
        assert!(rounds.len() >= GameConfig::default().games_count);
    }

    #[test]
    fn malformed_payload_fails_loudly() {
        assert!(matches!(parse_rounds(b"{\"not\": \"a list\"}"), Err(FetchError::Json(_))));
        let bad = br#"[{"type": "five-of-five", "question": "?", "answers": []}]"#;
        assert!(matches!(parse_rounds(bad), Err(FetchError::Malformed(_))));
    }

    #[test]
    fn results_payload_shape() {
        let config = GameConfig::default();
        let mut game = GameState::new(&config);
        game.set_rounds(pool(10));
        game.add_answer(AnswerRecord::new(true, 8));
        game.minus_live();
        let json = serde_json::to_string(&ResultsPayload::from_state(&game)).unwrap();
        assert_eq!(json, r#"{"answers":[{"isOK":true,"time":8}],"lives":2}"#);
    }
}
