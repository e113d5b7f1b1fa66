//! Domain models: questions, difficulty tiers, lifeline usage, game state,
//! and the question-source error taxonomy.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Number of answer choices per question. The whole game assumes four.
pub const CHOICE_COUNT: usize = 4;

/// Difficulty tier of a question / ladder level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}
impl Default for Difficulty {
  fn default() -> Self { Difficulty::Easy }
}

/// Where did a question come from?
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestionOrigin {
  Bank,       // built-in fallback bank or user-provided TOML bank
  Generated,  // generated via OpenAI
}
impl Default for QuestionOrigin {
  fn default() -> Self { QuestionOrigin::Bank }
}

/// Immutable question record. The fixed-size `choices` array carries the
/// four-choice invariant; `correct_index` must be in 0..=3 (validated at
/// every ingestion point: TOML bank entries and OpenAI responses).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
  pub id: String,
  pub category: String,
  pub difficulty: Difficulty,
  pub prompt: String,
  pub choices: [String; CHOICE_COUNT],
  #[serde(rename = "correctIndex")]
  pub correct_index: usize,
  #[serde(default)]
  pub origin: QuestionOrigin,
}

/// One-time-use lifelines. Flags are monotonic: once set they stay set for
/// the rest of the game, even when the lifeline produced nothing (switch
/// with no fresh question still counts as spent).
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifelineUsage {
  pub fifty_fifty: bool,
  pub audience: bool,
  pub switch: bool,
}

/// The mutable aggregate owned and mutated exclusively by the game engine.
/// Created fresh per game and replaced wholesale on reset.
#[derive(Clone, Debug)]
pub struct GameState {
  pub level: u32,
  pub questions: Vec<Question>,
  pub current_question_index: usize,
  pub seen_question_ids: HashSet<String>,
  pub eliminated_choices: Vec<usize>,
  pub locked_choice: Option<usize>,
  pub answered: bool,
  pub correct: Option<bool>,
  pub poll_results: Option<[u32; CHOICE_COUNT]>,
  pub used_lifelines: LifelineUsage,
  pub remaining_time: u32,
  pub last_safe_level: u32,
  pub winnings: u64,
  pub game_over: bool,
  pub info_message: Option<String>,
  pub selected_categories: Vec<String>,
}

impl GameState {
  /// Fresh state at level 1. The first question is marked seen immediately
  /// so a switch can never hand it back.
  pub fn new(questions: Vec<Question>, categories: Vec<String>, initial_time: u32) -> Self {
    let mut seen = HashSet::new();
    if let Some(q) = questions.first() {
      seen.insert(q.id.clone());
    }
    Self {
      level: 1,
      questions,
      current_question_index: 0,
      seen_question_ids: seen,
      eliminated_choices: Vec::new(),
      locked_choice: None,
      answered: false,
      correct: None,
      poll_results: None,
      used_lifelines: LifelineUsage::default(),
      remaining_time: initial_time,
      last_safe_level: 0,
      winnings: 0,
      game_over: false,
      info_message: None,
      selected_categories: categories,
    }
  }

  pub fn current_question(&self) -> &Question {
    &self.questions[self.current_question_index]
  }
}

/// Failure modes of the question source. Network and schema failures are
/// recoverable (the caller falls back to the local bank); only an exhausted
/// bank is surfaced to the player, and only at game start.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
  #[error("no question source configured")]
  NotConfigured,
  #[error("request failed: {0}")]
  Request(#[from] reqwest::Error),
  #[error("OpenAI HTTP {status}: {message}")]
  Http { status: u16, message: String },
  #[error("malformed response: {0}")]
  Parse(String),
  #[error("schema violation: {0}")]
  Schema(String),
  #[error("question bank exhausted: needed {needed}, have {available}")]
  BankExhausted { needed: usize, available: usize },
}
