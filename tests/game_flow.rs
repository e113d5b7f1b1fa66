//! Full-game scenarios driven through the engine's public API, the same way
//! the WebSocket session drives it.

use std::sync::Arc;

use quizladder_backend::bank::QuestionBank;
use quizladder_backend::config::GameConfig;
use quizladder_backend::domain::{Difficulty, Question, QuestionOrigin, CHOICE_COUNT};
use quizladder_backend::engine::{Effect, GameEngine};

fn question(id: &str, correct_index: usize) -> Question {
    Question {
        id: id.into(),
        category: "General Knowledge".into(),
        difficulty: Difficulty::Easy,
        prompt: format!("prompt {id}"),
        choices: ["a".into(), "b".into(), "c".into(), "d".into()],
        correct_index,
        origin: QuestionOrigin::Bank,
    }
}

fn ladder_questions() -> Vec<Question> {
    (0..15).map(|i| question(&format!("q{i}"), (i * 3) % 4)).collect()
}

fn started_engine(seed: u64) -> GameEngine {
    let mut e = GameEngine::with_seed(Arc::new(GameConfig::default()), seed);
    let fx = e.start(ladder_questions(), vec!["General Knowledge".into()]);
    assert!(fx.iter().any(|f| matches!(f, Effect::StartTimer { .. })));
    e
}

/// Answer the current question correctly and advance.
fn climb_one(e: &mut GameEngine) {
    let correct = e.game().unwrap().current_question().correct_index;
    e.select_choice(correct);
    e.lock_in();
    e.next_question();
}

fn fail_current(e: &mut GameEngine) {
    let correct = e.game().unwrap().current_question().correct_index;
    e.select_choice((correct + 1) % CHOICE_COUNT);
    e.lock_in();
}

#[test]
fn winning_run_climbs_the_whole_ladder() {
    let mut e = started_engine(1);
    let cfg = GameConfig::default();

    for level in 1..15 {
        assert_eq!(e.game().unwrap().level, level);
        climb_one(&mut e);
        let g = e.game().unwrap();
        assert_eq!(g.winnings, cfg.prize_for_level(level));
        assert_eq!(g.last_safe_level, cfg.last_safe_level(level));
    }

    // Final question.
    let correct = e.game().unwrap().current_question().correct_index;
    e.select_choice(correct);
    e.lock_in();
    let fx = e.next_question();
    let g = e.game().unwrap();
    assert!(g.game_over);
    assert_eq!(g.winnings, 1_000_000);
    assert!(fx
        .iter()
        .any(|f| matches!(f, Effect::GameEnded { winnings: 1_000_000, .. })));
}

#[test]
fn failure_winnings_follow_the_checkpoints() {
    let cfg = GameConfig::default();
    for fail_at in 1..=15u32 {
        let mut e = started_engine(fail_at as u64);
        for _ in 1..fail_at {
            climb_one(&mut e);
        }
        assert_eq!(e.game().unwrap().level, fail_at);
        fail_current(&mut e);
        let g = e.game().unwrap();
        assert!(g.game_over, "failing level {fail_at} must end the game");
        let expected = cfg.prize_for_level(cfg.last_safe_level(fail_at - 1));
        assert_eq!(g.winnings, expected, "failed at level {fail_at}");
    }
}

#[test]
fn walk_away_winnings_follow_the_checkpoints() {
    let cfg = GameConfig::default();
    for walk_at in 1..=15u32 {
        let mut e = started_engine(100 + walk_at as u64);
        for _ in 1..walk_at {
            climb_one(&mut e);
        }
        e.walk_away();
        let g = e.game().unwrap();
        let expected = cfg.prize_for_level(cfg.last_safe_level(walk_at - 1));
        assert_eq!(g.winnings, expected, "walked away at level {walk_at}");
    }
}

#[test]
fn timer_expiry_mid_ladder_keeps_the_checkpoint() {
    let mut e = started_engine(2);
    for _ in 0..6 {
        climb_one(&mut e);
    }
    // Level 7, medium tier: 45 seconds on the clock.
    assert_eq!(e.game().unwrap().level, 7);
    assert_eq!(e.game().unwrap().remaining_time, 45);
    let epoch = e.timer_epoch();
    let mut ended = false;
    for _ in 0..45 {
        let fx = e.tick(epoch);
        if fx.iter().any(|f| matches!(f, Effect::GameEnded { .. })) {
            ended = true;
            break;
        }
    }
    assert!(ended, "45 ticks must exhaust a 45 second timer");
    let g = e.game().unwrap();
    assert!(g.game_over);
    assert_eq!(g.winnings, 1_000);
    // The terminating tick invalidated the epoch; nothing else may fire.
    assert!(e.tick(epoch).is_empty());
}

#[test]
fn all_three_lifelines_in_one_game() {
    let mut e = started_engine(3);

    e.use_fifty_fifty();
    let eliminated = e.game().unwrap().eliminated_choices.clone();
    assert_eq!(eliminated.len(), 2);

    e.use_audience_poll();
    let poll = e.game().unwrap().poll_results.expect("poll results");
    for &i in &eliminated {
        assert_eq!(poll[i], 0, "eliminated choice must poll at zero");
    }

    e.use_switch_question();
    let fx = e.apply_switch(Some(question("replacement", 2)));
    assert!(fx.contains(&Effect::State));
    let g = e.game().unwrap();
    assert_eq!(g.current_question().id, "replacement");
    // Fifty-fifty eliminations do not carry over to the switched question.
    assert!(g.eliminated_choices.is_empty());

    let usage = g.used_lifelines;
    assert!(usage.fifty_fifty && usage.audience && usage.switch);
    assert!(e.use_fifty_fifty().is_empty());
    assert!(e.use_audience_poll().is_empty());
    assert!(e.use_switch_question().is_empty());
}

#[test]
fn switched_question_still_counts_toward_the_ladder() {
    let mut e = started_engine(4);
    e.use_switch_question();
    e.apply_switch(Some(question("replacement", 0)));
    e.select_choice(0);
    e.lock_in();
    e.next_question();
    let g = e.game().unwrap();
    assert_eq!(g.level, 2);
    assert_eq!(g.winnings, 100);
    assert_eq!(g.current_question().id, "q1");
}

#[test]
fn reset_returns_to_pregame_and_allows_a_new_start() {
    let mut e = started_engine(5);
    climb_one(&mut e);
    e.reset();
    assert!(e.game().is_none());

    let fx = e.start(ladder_questions(), vec![]);
    assert!(fx.iter().any(|f| matches!(f, Effect::StartTimer { .. })));
    let g = e.game().unwrap();
    assert_eq!(g.level, 1);
    assert_eq!(g.winnings, 0);
    assert!(!g.used_lifelines.fifty_fifty);
}

#[test]
fn bank_sample_can_seed_a_full_game() {
    let bank = QuestionBank::new(vec![]);
    let mut rng = rand::thread_rng();
    let questions = bank.sample(&["Science".into(), "History".into()], 15, &mut rng);
    assert_eq!(questions.len(), 15);

    let mut e = GameEngine::with_seed(Arc::new(GameConfig::default()), 6);
    let fx = e.start(questions, vec!["Science".into(), "History".into()]);
    assert!(!fx.is_empty());
    assert_eq!(e.game().unwrap().level, 1);
}

#[test]
fn timer_epochs_never_leak_across_levels() {
    let mut e = started_engine(7);
    let mut epochs = vec![e.timer_epoch()];
    for _ in 0..5 {
        climb_one(&mut e);
        epochs.push(e.timer_epoch());
    }
    for window in epochs.windows(2) {
        assert!(window[1] > window[0], "epochs must be strictly increasing");
    }
    // Every stale epoch is inert.
    for &old in &epochs[..epochs.len() - 1] {
        assert!(e.tick(old).is_empty());
    }
}
