//! Game configuration: money ladder, checkpoints, timers, categories, LLM
//! prompts, and an optional extra question bank — loadable from TOML.
//!
//! Everything has complete built-in defaults so the server runs with no
//! config file at all. An unreadable or invalid file is logged and ignored.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{Difficulty, Question, QuestionOrigin, CHOICE_COUNT};

/// One rung of the money ladder.
#[derive(Clone, Debug, Deserialize)]
pub struct LadderEntry {
  pub level: u32,
  pub amount: u64,
}

/// Countdown seconds per difficulty tier.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
  pub easy: u32,
  pub medium: u32,
  pub hard: u32,
}
impl Default for TimerConfig {
  fn default() -> Self {
    Self { easy: 30, medium: 45, hard: 60 }
  }
}

/// Prompts used by the OpenAI question generator. Override in TOML to tune
/// tone or constraints; `{count}` and `{categories}` are filled at call time.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub generation_system: String,
  pub generation_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      generation_system: "You are a quiz question generator for a ladder-style trivia game. \
        Generate questions in the exact JSON format requested."
        .into(),
      generation_user_template: r#"Generate {count} unique ladder-quiz style questions.

Categories to choose from: {categories}

Difficulty distribution:
- Questions 1-5: easy
- Questions 6-10: medium
- Questions 11-15: hard

Return ONLY valid JSON in this exact format:
{"questions": [{"id": "unique-id-1", "category": "chosen category", "difficulty": "easy|medium|hard", "prompt": "Clear, concise question text?", "choices": ["Option A", "Option B", "Option C", "Option D"], "correctIndex": 0}]}

Requirements:
- Each question must have exactly 4 choices
- correctIndex must be 0, 1, 2, or 3
- Questions should be factual and have one clear correct answer
- Avoid ambiguous or opinion-based questions
- Make questions challenging but fair for the difficulty level
- Ensure good variety across the selected categories"#
        .into(),
    }
  }
}

/// Question entry accepted in TOML configuration. Validated into a
/// `Question` on load; invalid entries are skipped with an error log.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  #[serde(default)] pub id: Option<String>,
  pub category: String,
  #[serde(default)] pub difficulty: Difficulty,
  pub prompt: String,
  pub choices: Vec<String>,
  pub correct_index: usize,
}

impl QuestionCfg {
  pub fn into_question(self) -> Result<Question, String> {
    if self.choices.len() != CHOICE_COUNT {
      return Err(format!("expected {} choices, got {}", CHOICE_COUNT, self.choices.len()));
    }
    if self.correct_index >= CHOICE_COUNT {
      return Err(format!("correct_index {} out of range", self.correct_index));
    }
    if self.prompt.trim().is_empty() {
      return Err("empty prompt".into());
    }
    let choices: [String; CHOICE_COUNT] = match self.choices.try_into() {
      Ok(c) => c,
      Err(_) => unreachable!("length checked above"),
    };
    Ok(Question {
      id: self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
      category: self.category,
      difficulty: self.difficulty,
      prompt: self.prompt.trim().to_string(),
      choices,
      correct_index: self.correct_index,
      origin: QuestionOrigin::Bank,
    })
  }
}

/// Process-wide game configuration, loaded once at startup.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
  pub ladder: Vec<LadderEntry>,
  pub checkpoints: Vec<u32>,
  pub max_level: u32,
  pub timer: TimerConfig,
  pub categories: Vec<String>,
  pub prompts: Prompts,
  pub questions: Vec<QuestionCfg>,
}

impl Default for GameConfig {
  fn default() -> Self {
    let amounts: [u64; 15] = [
      100, 200, 300, 500, 1_000, // checkpoint at 5
      2_000, 4_000, 8_000, 16_000, 32_000, // checkpoint at 10
      64_000, 125_000, 250_000, 500_000, 1_000_000,
    ];
    let ladder = amounts
      .iter()
      .enumerate()
      .map(|(i, &amount)| LadderEntry { level: i as u32 + 1, amount })
      .collect();
    Self {
      ladder,
      checkpoints: vec![5, 10],
      max_level: 15,
      timer: TimerConfig::default(),
      categories: vec![
        "General Knowledge".into(),
        "Science".into(),
        "Geography".into(),
        "Movies".into(),
        "Sports".into(),
        "History".into(),
        "Music".into(),
        "Technology".into(),
        "Physics".into(),
        "Literature".into(),
        "Mathematics".into(),
        "Chemistry".into(),
        "World History".into(),
      ],
      prompts: Prompts::default(),
      questions: Vec::new(),
    }
  }
}

impl GameConfig {
  /// Prize for a given level; level 0 (nothing banked yet) and unknown
  /// levels pay nothing.
  pub fn prize_for_level(&self, level: u32) -> u64 {
    self
      .ladder
      .iter()
      .find(|e| e.level == level)
      .map(|e| e.amount)
      .unwrap_or(0)
  }

  /// Highest checkpoint at or below `level`, 0 when none was passed.
  pub fn last_safe_level(&self, level: u32) -> u32 {
    self
      .checkpoints
      .iter()
      .copied()
      .filter(|&c| c <= level)
      .max()
      .unwrap_or(0)
  }

  pub fn is_checkpoint(&self, level: u32) -> bool {
    self.checkpoints.contains(&level)
  }

  /// Levels 1-5 are easy, 6-10 medium, 11-15 hard.
  pub fn difficulty_for_level(&self, level: u32) -> Difficulty {
    if level <= 5 {
      Difficulty::Easy
    } else if level <= 10 {
      Difficulty::Medium
    } else {
      Difficulty::Hard
    }
  }

  /// Countdown duration for the tier the level belongs to.
  pub fn time_for_level(&self, level: u32) -> u32 {
    match self.difficulty_for_level(level) {
      Difficulty::Easy => self.timer.easy,
      Difficulty::Medium => self.timer.medium,
      Difficulty::Hard => self.timer.hard,
    }
  }

  /// Sanity checks applied to loaded files: amounts strictly increasing,
  /// one entry per level 1..=max_level, checkpoints inside the ladder.
  pub fn validate(&self) -> Result<(), String> {
    if self.ladder.len() != self.max_level as usize {
      return Err(format!(
        "ladder has {} entries, expected {}",
        self.ladder.len(),
        self.max_level
      ));
    }
    for (i, e) in self.ladder.iter().enumerate() {
      if e.level != i as u32 + 1 {
        return Err(format!("ladder entry {} has level {}", i, e.level));
      }
      if i > 0 && e.amount <= self.ladder[i - 1].amount {
        return Err(format!("ladder amounts not strictly increasing at level {}", e.level));
      }
    }
    for &c in &self.checkpoints {
      if c == 0 || c > self.max_level {
        return Err(format!("checkpoint {} outside 1..={}", c, self.max_level));
      }
    }
    if self.timer.easy == 0 || self.timer.medium == 0 || self.timer.hard == 0 {
      return Err("timer durations must be non-zero".into());
    }
    Ok(())
  }
}

/// Attempt to load `GameConfig` from GAME_CONFIG_PATH. On any IO/parsing/
/// validation error, returns None and the caller falls back to defaults.
pub fn load_game_config_from_env() -> Option<GameConfig> {
  let path = std::env::var("GAME_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<GameConfig>(&s) {
      Ok(cfg) => match cfg.validate() {
        Ok(()) => {
          info!(target: "quizladder", %path, "Loaded game config (TOML)");
          Some(cfg)
        }
        Err(e) => {
          error!(target: "quizladder", %path, error = %e, "Invalid game config; using defaults");
          None
        }
      },
      Err(e) => {
        error!(target: "quizladder", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quizladder", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
