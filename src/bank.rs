//! Built-in fallback questions and the local sampler used whenever the
//! OpenAI source is unavailable or fails.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::error;

use crate::config::QuestionCfg;
use crate::domain::{Difficulty, Question, QuestionOrigin};

macro_rules! bank_q {
  ($id:expr, $cat:expr, $diff:expr, $prompt:expr, [$a:expr, $b:expr, $c:expr, $d:expr], $correct:expr) => {
    Question {
      id: $id.into(),
      category: $cat.into(),
      difficulty: $diff,
      prompt: $prompt.into(),
      choices: [$a.into(), $b.into(), $c.into(), $d.into()],
      correct_index: $correct,
      origin: QuestionOrigin::Bank,
    }
  };
}

/// Minimal set of built-in questions that guarantee the game is playable
/// even without external config or OpenAI. Size must stay >= max_level so a
/// fallback start can always fill a full ladder.
pub fn builtin_questions() -> Vec<Question> {
  use Difficulty::{Easy, Hard, Medium};
  vec![
    bank_q!("fallback-1", "General Knowledge", Easy, "What is the capital of France?",
      ["London", "Berlin", "Paris", "Madrid"], 2),
    bank_q!("fallback-2", "Science", Easy, "What is H2O commonly known as?",
      ["Oxygen", "Hydrogen", "Water", "Carbon Dioxide"], 2),
    bank_q!("fallback-3", "Geography", Easy, "Which continent is Egypt in?",
      ["Asia", "Africa", "Europe", "South America"], 1),
    bank_q!("fallback-4", "Movies", Easy, "Who directed the movie \"Jaws\"?",
      ["George Lucas", "Steven Spielberg", "Martin Scorsese", "Francis Ford Coppola"], 1),
    bank_q!("fallback-5", "Sports", Medium, "In which sport would you perform a slam dunk?",
      ["Tennis", "Basketball", "Football", "Baseball"], 1),
    bank_q!("fallback-6", "History", Medium, "In which year did World War II end?",
      ["1944", "1945", "1946", "1947"], 1),
    bank_q!("fallback-7", "Science", Medium, "What is the chemical symbol for gold?",
      ["Go", "Gd", "Au", "Ag"], 2),
    bank_q!("fallback-8", "Technology", Medium, "Who co-founded Microsoft along with Bill Gates?",
      ["Steve Jobs", "Paul Allen", "Larry Page", "Mark Zuckerberg"], 1),
    bank_q!("fallback-9", "Literature", Hard, "Who wrote the novel \"1984\"?",
      ["Aldous Huxley", "Ray Bradbury", "George Orwell", "Kurt Vonnegut"], 2),
    bank_q!("fallback-10", "Science", Hard, "What is the speed of light in a vacuum?",
      ["299,792,458 m/s", "300,000,000 m/s", "299,800,000 m/s", "298,000,000 m/s"], 0),
    bank_q!("fallback-11", "Geography", Hard, "What is the smallest country in the world?",
      ["Monaco", "San Marino", "Vatican City", "Liechtenstein"], 2),
    bank_q!("fallback-12", "History", Hard, "Which ancient wonder of the world was located in Alexandria?",
      ["Hanging Gardens", "Lighthouse of Alexandria", "Colossus of Rhodes", "Temple of Artemis"], 1),
    bank_q!("fallback-13", "Mathematics", Hard, "What is the value of \u{03c0} (pi) to the first 4 decimal places?",
      ["3.1415", "3.1416", "3.1417", "3.1414"], 1),
    bank_q!("fallback-14", "Physics", Hard, "What is the name of the theoretical boundary around a black hole?",
      ["Event Horizon", "Photon Sphere", "Ergosphere", "Singularity"], 0),
    bank_q!("fallback-15", "World History", Hard, "Which empire was ruled by Cyrus the Great?",
      ["Roman Empire", "Persian Empire", "Ottoman Empire", "Byzantine Empire"], 1),
  ]
}

/// Static question bank: built-ins plus validated TOML extras.
#[derive(Clone, Debug)]
pub struct QuestionBank {
  questions: Vec<Question>,
}

impl QuestionBank {
  /// Config-provided entries are inserted first and win id collisions;
  /// invalid entries are skipped with an error log, never fatal.
  pub fn new(extra: Vec<QuestionCfg>) -> Self {
    let mut questions: Vec<Question> = Vec::new();
    for cfg in extra {
      match cfg.into_question() {
        Ok(q) => {
          if questions.iter().any(|e| e.id == q.id) {
            error!(target: "game", id = %q.id, "Skipping bank item: duplicate id");
            continue;
          }
          questions.push(q);
        }
        Err(e) => error!(target: "game", error = %e, "Skipping bank item: invalid question"),
      }
    }
    for q in builtin_questions() {
      if !questions.iter().any(|e| e.id == q.id) {
        questions.push(q);
      }
    }
    Self { questions }
  }

  pub fn len(&self) -> usize {
    self.questions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.questions.is_empty()
  }

  pub fn count_by_origin(&self, origin: QuestionOrigin) -> usize {
    self.questions.iter().filter(|q| q.origin == origin).count()
  }

  /// Unbiased sample of `count` distinct questions. Filters by category
  /// first; if the filtered pool is too small, widens to the entire bank.
  /// Returns min(count, bank size) questions, never a duplicate id.
  pub fn sample(&self, categories: &[String], count: usize, rng: &mut impl Rng) -> Vec<Question> {
    let mut pool: Vec<Question> = self
      .questions
      .iter()
      .filter(|q| categories.contains(&q.category))
      .cloned()
      .collect();
    if pool.len() < count {
      pool = self.questions.clone();
    }
    pool.shuffle(rng);
    pool.truncate(count);
    pool
  }
}
