//! The game engine: a synchronous state machine owning one `GameState`.
//!
//! Every operation validates its preconditions, mutates state, and returns
//! the list of `Effect`s the session loop must carry out (notifications to
//! push, timer start/stop, the async replacement fetch). User-error calls
//! (locking with no selection, re-using a spent lifeline, acting after game
//! over) return an empty effect list and change nothing.
//!
//! Timer discipline: `timer_epoch` is bumped on every start, stop, lock-in,
//! termination, and reset. `tick()` ignores any epoch that is not current,
//! so a tick message already queued behind a cancellation can never mutate
//! a superseded state.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{error, info};

use crate::config::GameConfig;
use crate::domain::{GameState, Question, CHOICE_COUNT};

/// Seconds a transient info notice stays on screen before auto-clearing.
pub const INFO_CLEAR_SECS: u64 = 3;

/// What the session loop must do after an engine operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
  /// Push a fresh state snapshot to the presentation layer.
  State,
  TimerTick { remaining: u32, total: u32 },
  AnswerResolved { correct: bool, locked_choice: usize, correct_index: usize },
  GameEnded { title: String, winnings: u64 },
  PollResults { percentages: [u32; CHOICE_COUNT] },
  /// Spawn a 1 s tick task; its ticks must carry `epoch` back into `tick()`.
  StartTimer { epoch: u64 },
  /// Abort the tick task, if any.
  StopTimer,
  /// Run the async question-source call and feed the result to `apply_switch`.
  FetchReplacement { categories: Vec<String> },
  /// Schedule `clear_info()` after the given delay.
  ClearInfoAfter { seconds: u64 },
}

pub struct GameEngine {
  config: Arc<GameConfig>,
  game: Option<GameState>,
  /// Ephemeral selection, kept apart from the committed `locked_choice`.
  provisional: Option<usize>,
  /// A switch fetch is in flight; cleared before applying its result so a
  /// stale response arriving after the game moved on is discarded.
  switch_pending: bool,
  timer_epoch: u64,
  rng: StdRng,
}

impl GameEngine {
  pub fn new(config: Arc<GameConfig>) -> Self {
    Self::from_rng(config, StdRng::from_entropy())
  }

  /// Deterministic engine for tests.
  pub fn with_seed(config: Arc<GameConfig>, seed: u64) -> Self {
    Self::from_rng(config, StdRng::seed_from_u64(seed))
  }

  fn from_rng(config: Arc<GameConfig>, rng: StdRng) -> Self {
    Self { config, game: None, provisional: None, switch_pending: false, timer_epoch: 0, rng }
  }

  pub fn game(&self) -> Option<&GameState> {
    self.game.as_ref()
  }

  pub fn provisional(&self) -> Option<usize> {
    self.provisional
  }

  pub fn timer_epoch(&self) -> u64 {
    self.timer_epoch
  }

  /// Begin a fresh game at level 1. `questions` must hold at least
  /// `max_level` entries (the source contract guarantees this).
  pub fn start(&mut self, questions: Vec<Question>, categories: Vec<String>) -> Vec<Effect> {
    if questions.len() < self.config.max_level as usize {
      error!(target: "game", got = questions.len(), need = self.config.max_level, "Refusing to start: not enough questions");
      return vec![];
    }
    let initial_time = self.config.time_for_level(1);
    self.game = Some(GameState::new(questions, categories, initial_time));
    self.provisional = None;
    self.switch_pending = false;
    self.timer_epoch += 1;
    info!(target: "game", epoch = self.timer_epoch, "Game started");
    vec![Effect::State, Effect::StartTimer { epoch: self.timer_epoch }]
  }

  /// Record a provisional (not locked) choice.
  pub fn select_choice(&mut self, index: usize) -> Vec<Effect> {
    let Some(g) = self.game.as_ref() else { return vec![] };
    if g.answered || g.game_over || index >= CHOICE_COUNT {
      return vec![];
    }
    self.provisional = Some(index);
    vec![Effect::State]
  }

  /// Commit the provisional choice. Incorrect answers terminate the game
  /// right here, banking the prize of the last checkpoint passed *before*
  /// the current level; the current level's prize is never banked on
  /// failure.
  pub fn lock_in(&mut self) -> Vec<Effect> {
    let Some(choice) = self.provisional else { return vec![] };
    let Some(g) = self.game.as_mut() else { return vec![] };
    if g.answered || g.game_over {
      return vec![];
    }
    g.locked_choice = Some(choice);
    g.answered = true;
    let correct_index = g.questions[g.current_question_index].correct_index;
    let correct = choice == correct_index;
    g.correct = Some(correct);
    self.timer_epoch += 1;

    let mut effects = vec![
      Effect::StopTimer,
      Effect::AnswerResolved { correct, locked_choice: choice, correct_index },
    ];
    if !correct {
      g.game_over = true;
      let safe = self.config.last_safe_level(g.level.saturating_sub(1));
      g.winnings = self.config.prize_for_level(safe);
      info!(target: "game", level = g.level, winnings = g.winnings, "Wrong answer, game over");
      effects.push(Effect::GameEnded { title: "Game Over!".into(), winnings: g.winnings });
    }
    effects.push(Effect::State);
    effects
  }

  /// Advance after a correct answer, once the presentation delay elapsed.
  /// Banks the level's prize, updates the safe level, and either finishes
  /// the game at the top of the ladder or resets the per-question fields
  /// and restarts the timer for the next level.
  pub fn next_question(&mut self) -> Vec<Effect> {
    let Some(g) = self.game.as_mut() else { return vec![] };
    if g.game_over || !g.answered || g.correct != Some(true) {
      return vec![];
    }
    g.winnings = self.config.prize_for_level(g.level);
    g.last_safe_level = self.config.last_safe_level(g.level);

    if g.level >= self.config.max_level {
      g.game_over = true;
      info!(target: "game", winnings = g.winnings, "Top of the ladder reached");
      return vec![
        Effect::GameEnded { title: "Congratulations! You're a MILLIONAIRE!".into(), winnings: g.winnings },
        Effect::State,
      ];
    }

    g.level += 1;
    g.answered = false;
    g.correct = None;
    g.locked_choice = None;
    g.eliminated_choices.clear();
    g.poll_results = None;
    g.info_message = None;
    self.provisional = None;
    g.current_question_index += 1;
    g.seen_question_ids.insert(g.questions[g.current_question_index].id.clone());
    g.remaining_time = self.config.time_for_level(g.level);
    self.timer_epoch += 1;
    vec![Effect::State, Effect::StartTimer { epoch: self.timer_epoch }]
  }

  /// One second elapsed on the timer task tagged with `epoch`. Stale
  /// epochs are dropped. Expiry is treated as a wrong answer.
  pub fn tick(&mut self, epoch: u64) -> Vec<Effect> {
    if epoch != self.timer_epoch {
      return vec![];
    }
    let Some(g) = self.game.as_mut() else { return vec![] };
    if g.answered || g.game_over {
      return vec![];
    }
    g.remaining_time = g.remaining_time.saturating_sub(1);
    if g.remaining_time == 0 {
      g.answered = true;
      g.correct = Some(false);
      g.game_over = true;
      let safe = self.config.last_safe_level(g.level.saturating_sub(1));
      g.winnings = self.config.prize_for_level(safe);
      self.timer_epoch += 1;
      info!(target: "game", level = g.level, winnings = g.winnings, "Time expired, game over");
      return vec![
        Effect::StopTimer,
        Effect::GameEnded { title: "Time's up! Game Over!".into(), winnings: g.winnings },
        Effect::State,
      ];
    }
    let total = self.config.time_for_level(g.level);
    vec![Effect::TimerTick { remaining: g.remaining_time, total }]
  }

  /// Voluntary early termination. Banks the last passed checkpoint, not
  /// the current level's value: money is only secured at checkpoints.
  pub fn walk_away(&mut self) -> Vec<Effect> {
    let Some(g) = self.game.as_mut() else { return vec![] };
    if g.game_over || g.answered {
      return vec![];
    }
    g.game_over = true;
    let safe = self.config.last_safe_level(g.level.saturating_sub(1));
    g.winnings = self.config.prize_for_level(safe);
    self.timer_epoch += 1;
    info!(target: "game", level = g.level, winnings = g.winnings, "Player walked away");
    vec![
      Effect::StopTimer,
      Effect::GameEnded { title: "You walked away with:".into(), winnings: g.winnings },
      Effect::State,
    ]
  }

  /// Eliminate two of the three incorrect choices, uniformly at random.
  pub fn use_fifty_fifty(&mut self) -> Vec<Effect> {
    let Some(g) = self.game.as_mut() else { return vec![] };
    if g.used_lifelines.fifty_fifty || g.answered || g.game_over {
      return vec![];
    }
    g.used_lifelines.fifty_fifty = true;
    let correct_index = g.questions[g.current_question_index].correct_index;
    let mut incorrect: Vec<usize> = (0..CHOICE_COUNT).filter(|&i| i != correct_index).collect();
    incorrect.shuffle(&mut self.rng);
    incorrect.truncate(2);
    g.eliminated_choices = incorrect;
    vec![Effect::State]
  }

  /// Synthetic audience poll. The correct choice gets a base share in
  /// [40, 70); eliminated choices get exactly 0; the rest of the pool is
  /// spread over the remaining choices with a floor of 5, and any leftover
  /// goes to one random eligible choice. Values are rounded to integers
  /// and the rounding error is deliberately not corrected, so the total
  /// may drift a point or two around 100.
  pub fn use_audience_poll(&mut self) -> Vec<Effect> {
    let Some(g) = self.game.as_mut() else { return vec![] };
    if g.used_lifelines.audience || g.answered || g.game_over {
      return vec![];
    }
    g.used_lifelines.audience = true;
    let correct_index = g.questions[g.current_question_index].correct_index;

    let mut results = [0.0f64; CHOICE_COUNT];
    let correct_share = self.rng.gen_range(40.0..70.0);
    results[correct_index] = correct_share;

    let mut remaining = 100.0 - correct_share;
    for i in 0..CHOICE_COUNT {
      if i == correct_index || remaining <= 0.0 {
        continue;
      }
      if g.eliminated_choices.contains(&i) {
        results[i] = 0.0;
      } else {
        let portion = self.rng.gen::<f64>() * remaining * 0.6;
        results[i] = portion.max(5.0);
        remaining -= results[i];
      }
    }

    if remaining > 0.0 {
      let eligible: Vec<usize> = (0..CHOICE_COUNT)
        .filter(|i| *i != correct_index && !g.eliminated_choices.contains(i))
        .collect();
      if let Some(&i) = eligible.choose(&mut self.rng) {
        results[i] += remaining;
      } else {
        results[correct_index] += remaining;
      }
    }

    let rounded = results.map(|r| r.round() as u32);
    g.poll_results = Some(rounded);
    vec![Effect::State, Effect::PollResults { percentages: rounded }]
  }

  /// Request a replacement for the current question. The lifeline is
  /// marked spent *before* the fetch resolves, so a rapid second tap while
  /// the call is in flight is a plain no-op.
  pub fn use_switch_question(&mut self) -> Vec<Effect> {
    let Some(g) = self.game.as_mut() else { return vec![] };
    if g.used_lifelines.switch || g.answered || g.game_over {
      return vec![];
    }
    g.used_lifelines.switch = true;
    self.switch_pending = true;
    vec![Effect::State, Effect::FetchReplacement { categories: g.selected_categories.clone() }]
  }

  /// Apply the result of the replacement fetch. A fresh (unseen) question
  /// replaces the current one and clears fifty-fifty eliminations and the
  /// provisional choice; anything else surfaces a transient notice. The
  /// lifeline stays spent either way. Results arriving after the question
  /// ended its active life (lock-in, time-up, walk-away, reset) are
  /// discarded.
  pub fn apply_switch(&mut self, replacement: Option<Question>) -> Vec<Effect> {
    if !self.switch_pending {
      return vec![];
    }
    self.switch_pending = false;
    let Some(g) = self.game.as_mut() else { return vec![] };
    if g.answered || g.game_over {
      return vec![];
    }
    if let Some(q) = replacement {
      if !g.seen_question_ids.contains(&q.id) {
        info!(target: "game", id = %q.id, "Switched to replacement question");
        g.seen_question_ids.insert(q.id.clone());
        g.questions[g.current_question_index] = q;
        g.eliminated_choices.clear();
        self.provisional = None;
        return vec![Effect::State];
      }
      info!(target: "game", id = %q.id, "Replacement already seen, keeping current question");
    }
    g.info_message = Some("No alternative question available".into());
    vec![Effect::State, Effect::ClearInfoAfter { seconds: INFO_CLEAR_SECS }]
  }

  /// Expire the transient info notice.
  pub fn clear_info(&mut self) -> Vec<Effect> {
    let Some(g) = self.game.as_mut() else { return vec![] };
    if g.info_message.take().is_some() {
      vec![Effect::State]
    } else {
      vec![]
    }
  }

  /// Drop the whole game and return to the pre-game screen.
  pub fn reset(&mut self) -> Vec<Effect> {
    self.timer_epoch += 1;
    self.game = None;
    self.provisional = None;
    self.switch_pending = false;
    vec![Effect::StopTimer, Effect::State]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Difficulty, QuestionOrigin};

  fn question(id: &str, correct_index: usize) -> Question {
    Question {
      id: id.into(),
      category: "Science".into(),
      difficulty: Difficulty::Easy,
      prompt: format!("prompt {id}"),
      choices: ["a".into(), "b".into(), "c".into(), "d".into()],
      correct_index,
      origin: QuestionOrigin::Bank,
    }
  }

  fn ladder_questions() -> Vec<Question> {
    (0..15).map(|i| question(&format!("q{i}"), i % 4)).collect()
  }

  fn engine() -> GameEngine {
    GameEngine::with_seed(Arc::new(GameConfig::default()), 7)
  }

  fn started() -> GameEngine {
    let mut e = engine();
    let fx = e.start(ladder_questions(), vec!["Science".into()]);
    assert!(fx.contains(&Effect::State));
    e
  }

  /// Answer the current question correctly and advance one level.
  fn answer_correct(e: &mut GameEngine) {
    let correct = e.game().unwrap().current_question().correct_index;
    assert!(!e.select_choice(correct).is_empty());
    assert!(!e.lock_in().is_empty());
    assert!(!e.next_question().is_empty());
  }

  fn answer_wrong(e: &mut GameEngine) -> Vec<Effect> {
    let correct = e.game().unwrap().current_question().correct_index;
    let wrong = (correct + 1) % CHOICE_COUNT;
    e.select_choice(wrong);
    e.lock_in()
  }

  #[test]
  fn start_requires_full_ladder() {
    let mut e = engine();
    let fx = e.start(ladder_questions()[..10].to_vec(), vec![]);
    assert!(fx.is_empty());
    assert!(e.game().is_none());
  }

  #[test]
  fn lock_in_without_selection_is_noop() {
    let mut e = started();
    assert!(e.lock_in().is_empty());
    assert!(!e.game().unwrap().answered);
  }

  #[test]
  fn select_after_answer_is_noop() {
    let mut e = started();
    e.select_choice(0);
    e.lock_in();
    assert!(e.select_choice(1).is_empty());
  }

  #[test]
  fn select_out_of_range_is_noop() {
    let mut e = started();
    assert!(e.select_choice(CHOICE_COUNT).is_empty());
  }

  #[test]
  fn failing_level_one_wins_nothing() {
    let mut e = started();
    let fx = answer_wrong(&mut e);
    let g = e.game().unwrap();
    assert!(g.game_over);
    assert_eq!(g.winnings, 0);
    assert!(fx.iter().any(|f| matches!(f, Effect::GameEnded { winnings: 0, .. })));
  }

  #[test]
  fn failing_level_six_keeps_the_first_checkpoint() {
    let mut e = started();
    for _ in 0..5 {
      answer_correct(&mut e);
    }
    assert_eq!(e.game().unwrap().level, 6);
    assert_eq!(e.game().unwrap().last_safe_level, 5);
    answer_wrong(&mut e);
    let g = e.game().unwrap();
    assert!(g.game_over);
    assert_eq!(g.winnings, 1_000);
  }

  #[test]
  fn walking_away_banks_the_last_checkpoint_only() {
    let mut e = started();
    for _ in 0..10 {
      answer_correct(&mut e);
    }
    assert_eq!(e.game().unwrap().level, 11);
    let fx = e.walk_away();
    let g = e.game().unwrap();
    assert!(g.game_over);
    assert_eq!(g.winnings, 32_000);
    assert!(fx.iter().any(|f| matches!(f, Effect::GameEnded { winnings: 32_000, .. })));
  }

  #[test]
  fn walk_away_after_answering_is_noop() {
    let mut e = started();
    e.select_choice(e.game().unwrap().current_question().correct_index);
    e.lock_in();
    assert!(e.walk_away().is_empty());
  }

  #[test]
  fn answering_level_fifteen_wins_the_million() {
    let mut e = started();
    for _ in 0..14 {
      answer_correct(&mut e);
    }
    assert_eq!(e.game().unwrap().level, 15);
    let correct = e.game().unwrap().current_question().correct_index;
    e.select_choice(correct);
    e.lock_in();
    let fx = e.next_question();
    let g = e.game().unwrap();
    assert!(g.game_over);
    assert_eq!(g.winnings, 1_000_000);
    assert!(fx.iter().any(|f| matches!(f, Effect::GameEnded { winnings: 1_000_000, .. })));
  }

  #[test]
  fn next_question_unreachable_after_wrong_answer() {
    let mut e = started();
    answer_wrong(&mut e);
    assert!(e.next_question().is_empty());
  }

  #[test]
  fn advancing_resets_per_question_fields() {
    let mut e = started();
    e.use_fifty_fifty();
    e.use_audience_poll();
    answer_correct(&mut e);
    let g = e.game().unwrap();
    assert!(!g.answered);
    assert_eq!(g.correct, None);
    assert_eq!(g.locked_choice, None);
    assert!(g.eliminated_choices.is_empty());
    assert!(g.poll_results.is_none());
    assert_eq!(e.provisional(), None);
    assert_eq!(g.remaining_time, 30);
    // Lifeline usage persists across questions.
    assert!(g.used_lifelines.fifty_fifty && g.used_lifelines.audience);
  }

  #[test]
  fn fifty_fifty_eliminates_two_incorrect_choices() {
    for seed in 0..20 {
      let mut e = GameEngine::with_seed(Arc::new(GameConfig::default()), seed);
      e.start(ladder_questions(), vec![]);
      e.use_fifty_fifty();
      let g = e.game().unwrap();
      let correct = g.current_question().correct_index;
      assert_eq!(g.eliminated_choices.len(), 2);
      assert_ne!(g.eliminated_choices[0], g.eliminated_choices[1]);
      assert!(g.eliminated_choices.iter().all(|&i| i != correct && i < CHOICE_COUNT));
    }
  }

  #[test]
  fn fifty_fifty_is_single_use() {
    let mut e = started();
    assert!(!e.use_fifty_fifty().is_empty());
    let before = e.game().unwrap().eliminated_choices.clone();
    assert!(e.use_fifty_fifty().is_empty());
    assert_eq!(e.game().unwrap().eliminated_choices, before);
  }

  #[test]
  fn audience_poll_shape() {
    for seed in 0..20 {
      let mut e = GameEngine::with_seed(Arc::new(GameConfig::default()), seed);
      e.start(ladder_questions(), vec![]);
      let fx = e.use_audience_poll();
      let g = e.game().unwrap();
      let correct = g.current_question().correct_index;
      let poll = g.poll_results.expect("poll set");
      assert!(poll[correct] >= 40, "correct share below base range: {poll:?}");
      // Rounding error is accepted: the sum hovers around 100.
      let sum: u32 = poll.iter().sum();
      assert!((95..=105).contains(&sum), "sum way off: {poll:?}");
      assert!(fx.iter().any(|f| matches!(f, Effect::PollResults { .. })));
    }
  }

  #[test]
  fn audience_poll_zeroes_eliminated_choices() {
    for seed in 0..20 {
      let mut e = GameEngine::with_seed(Arc::new(GameConfig::default()), seed);
      e.start(ladder_questions(), vec![]);
      e.use_fifty_fifty();
      e.use_audience_poll();
      let g = e.game().unwrap();
      let poll = g.poll_results.unwrap();
      for &i in &g.eliminated_choices {
        assert_eq!(poll[i], 0);
      }
    }
  }

  #[test]
  fn audience_poll_is_single_use() {
    let mut e = started();
    assert!(!e.use_audience_poll().is_empty());
    assert!(e.use_audience_poll().is_empty());
  }

  #[test]
  fn ticks_count_down_and_expiry_terminates() {
    let mut e = started();
    let epoch = e.timer_epoch();
    let fx = e.tick(epoch);
    assert!(fx.iter().any(|f| matches!(f, Effect::TimerTick { remaining: 29, total: 30 })));
    for _ in 0..28 {
      e.tick(epoch);
    }
    let fx = e.tick(epoch);
    let g = e.game().unwrap();
    assert!(g.answered && g.game_over);
    assert_eq!(g.correct, Some(false));
    assert_eq!(g.winnings, 0);
    assert!(fx.iter().any(|f| matches!(f, Effect::GameEnded { .. })));
  }

  #[test]
  fn stale_tick_after_lock_in_is_dropped() {
    let mut e = started();
    let epoch = e.timer_epoch();
    e.select_choice(0);
    e.lock_in();
    let before = e.game().unwrap().remaining_time;
    assert!(e.tick(epoch).is_empty());
    assert_eq!(e.game().unwrap().remaining_time, before);
  }

  #[test]
  fn each_level_gets_a_new_timer_epoch() {
    let mut e = started();
    let first = e.timer_epoch();
    answer_correct(&mut e);
    assert!(e.timer_epoch() > first);
    assert!(e.tick(first).is_empty());
  }

  #[test]
  fn switch_marks_used_before_fetch_resolves() {
    let mut e = started();
    let fx = e.use_switch_question();
    assert!(e.game().unwrap().used_lifelines.switch);
    assert!(fx.iter().any(|f| matches!(f, Effect::FetchReplacement { .. })));
    // Double-tap while the fetch is in flight.
    assert!(e.use_switch_question().is_empty());
  }

  #[test]
  fn switch_applies_fresh_replacement() {
    let mut e = started();
    e.use_fifty_fifty();
    e.select_choice(0);
    e.use_switch_question();
    let fx = e.apply_switch(Some(question("fresh", 1)));
    assert_eq!(fx, vec![Effect::State]);
    let g = e.game().unwrap();
    assert_eq!(g.current_question().id, "fresh");
    assert!(g.eliminated_choices.is_empty());
    assert!(g.seen_question_ids.contains("fresh"));
    assert_eq!(e.provisional(), None);
  }

  #[test]
  fn switch_rejects_already_seen_replacement() {
    let mut e = started();
    e.use_switch_question();
    let fx = e.apply_switch(Some(question("q0", 1)));
    let g = e.game().unwrap();
    assert_eq!(g.current_question().id, "q0");
    assert!(g.used_lifelines.switch);
    assert_eq!(g.info_message.as_deref(), Some("No alternative question available"));
    assert!(fx.iter().any(|f| matches!(f, Effect::ClearInfoAfter { .. })));
  }

  #[test]
  fn switch_failure_surfaces_notice_and_stays_spent() {
    let mut e = started();
    e.use_switch_question();
    let fx = e.apply_switch(None);
    assert!(fx.iter().any(|f| matches!(f, Effect::ClearInfoAfter { .. })));
    assert!(e.game().unwrap().used_lifelines.switch);
    assert!(e.clear_info().contains(&Effect::State));
    assert!(e.game().unwrap().info_message.is_none());
  }

  #[test]
  fn stale_switch_result_after_walk_away_is_discarded() {
    let mut e = started();
    e.use_switch_question();
    e.walk_away();
    let fx = e.apply_switch(Some(question("fresh", 1)));
    assert!(fx.is_empty());
    assert_eq!(e.game().unwrap().current_question().id, "q0");
  }

  #[test]
  fn unsolicited_switch_result_is_discarded() {
    let mut e = started();
    assert!(e.apply_switch(Some(question("fresh", 1))).is_empty());
    assert_eq!(e.game().unwrap().current_question().id, "q0");
  }

  #[test]
  fn lifelines_are_noops_after_game_over() {
    let mut e = started();
    answer_wrong(&mut e);
    assert!(e.use_fifty_fifty().is_empty());
    assert!(e.use_audience_poll().is_empty());
    assert!(e.use_switch_question().is_empty());
    assert!(e.select_choice(0).is_empty());
  }

  #[test]
  fn reset_discards_the_game() {
    let mut e = started();
    let epoch = e.timer_epoch();
    let fx = e.reset();
    assert!(fx.contains(&Effect::StopTimer));
    assert!(e.game().is_none());
    assert!(e.tick(epoch).is_empty());
  }

  #[test]
  fn timer_duration_follows_the_tier() {
    let mut e = started();
    for _ in 0..5 {
      answer_correct(&mut e);
    }
    // Level 6 is the first medium question.
    assert_eq!(e.game().unwrap().remaining_time, 45);
    for _ in 0..5 {
      answer_correct(&mut e);
    }
    assert_eq!(e.game().unwrap().remaining_time, 60);
  }

  #[test]
  fn advancing_marks_the_new_question_seen() {
    let mut e = started();
    answer_correct(&mut e);
    let g = e.game().unwrap();
    assert!(g.seen_question_ids.contains("q0"));
    assert!(g.seen_question_ids.contains("q1"));
  }
}
