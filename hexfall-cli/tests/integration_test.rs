//! Integration tests for the HEXFALL solver
//!
//! Tests the full stack: problem parsing, the game engine, the strategies
//! and the session runner

use std::sync::Arc;

use hexfall_core::{games_from_problem, Game, PhraseBook, Problem};
use hexfall_search::{
    ChantConfig, LookaheadStrategy, Player, RandomStrategy, SearchConfig, Session, StopReason, Strategy,
    StrategyKind,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn single_cell_problem(width: i32, height: i32, source_length: u32, seeds: &[u64]) -> Problem {
    let json = format!(
        r#"{{
            "id": 1,
            "units": [{{"members": [{{"x": 0, "y": 0}}], "pivot": {{"x": 0, "y": 0}}}}],
            "width": {width},
            "height": {height},
            "filled": [],
            "sourceLength": {source_length},
            "sourceSeeds": {seeds:?}
        }}"#
    );
    Problem::from_json(&json).unwrap()
}

/// Two templates, a partly filled floor, two seeds
const MIXED_PROBLEM: &str = r#"{
    "id": 42,
    "units": [
        {"members": [{"x": 0, "y": 0}, {"x": 1, "y": 0}], "pivot": {"x": 0, "y": 0}},
        {"members": [{"x": 0, "y": 0}, {"x": 0, "y": 1}, {"x": 1, "y": 1}], "pivot": {"x": 0, "y": 1}}
    ],
    "width": 6,
    "height": 8,
    "filled": [{"x": 0, "y": 7}, {"x": 1, "y": 7}, {"x": 2, "y": 7}, {"x": 4, "y": 7}, {"x": 5, "y": 7}],
    "sourceLength": 6,
    "sourceSeeds": [0, 17]
}"#;

fn first_game(problem: &Problem) -> Game {
    let (_, game) = games_from_problem(problem, Arc::new(PhraseBook::default()))
        .into_iter()
        .next()
        .unwrap();
    game.unwrap()
}

// ============================================================================
// PROBLEM -> GAME
// ============================================================================

#[test]
fn test_problem_yields_game_per_seed() {
    let problem = Problem::from_json(MIXED_PROBLEM).unwrap();
    let games = games_from_problem(&problem, Arc::new(PhraseBook::default()));
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].0, 0);
    assert_eq!(games[1].0, 17);
    for (seed, game) in &games {
        let game = game.as_ref().unwrap();
        assert_eq!(game.seed(), *seed);
        assert_eq!(game.board().filled_count(), 5);
        assert!(!game.is_done());
    }
}

#[test]
fn test_fork_leaves_original_untouched() {
    let original = first_game(&Problem::from_json(MIXED_PROBLEM).unwrap());
    let mut fork = original.fork();
    fork.play("lll").unwrap();

    assert_eq!(original.commands(), "");
    assert!(original.previous_positions().len() <= 1);
    assert_ne!(fork.unit(), original.unit());
    assert_eq!(original.board().filled_count(), 5);
}

// ============================================================================
// STRATEGIES END TO END
// ============================================================================

#[test]
fn test_random_finishes_small_board() {
    let problem = single_cell_problem(3, 3, 4, &[0]);
    let mut strategy = RandomStrategy::new(first_game(&problem), Some(1));
    let report = Session::new().with_max_steps(500).run("random", &mut strategy);
    assert_eq!(report.stop, StopReason::Done);
    assert!(report.done);
    assert!(report.final_score > 0);
}

#[test]
fn test_lookahead_keeps_single_column() {
    let problem = single_cell_problem(1, 5, 1, &[0]);
    let mut strategy = LookaheadStrategy::new(first_game(&problem));
    let report = Session::new().run("lookahead", &mut strategy);

    assert!(report.done);
    // Every move before the locking one stays in the column
    let history = strategy.current_game().history();
    let (_, before_lock) = history.split_last().unwrap();
    assert_eq!(before_lock.len(), 4);
    assert!(before_lock.iter().all(|d| d.is_descent()));
    for pair in before_lock.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn test_every_strategy_plays_mixed_problem() {
    let problem = Problem::from_json(MIXED_PROBLEM).unwrap();
    let game = first_game(&problem);
    let config = SearchConfig::default()
        .with_seed(3)
        .with_tree_depth(2)
        .with_replay("lll")
        .with_chant(ChantConfig {
            width: 12,
            rollout_depth: 2,
            ..ChantConfig::default()
        });

    for kind in StrategyKind::ALL {
        let mut player = Player::new(kind, game.fork(), &config);
        let report = Session::new().with_max_steps(60).run(kind.name(), &mut player);
        assert_eq!(report.strategy, kind.name());
        assert!(report.steps > 0, "{} made no move", kind);
        assert!(report.final_score >= 0);
        assert!(!matches!(report.stop, StopReason::Error(_)), "{} errored", kind);
    }
}

#[test]
fn test_final_commands_score_like_played_commands() {
    let problem = single_cell_problem(10, 20, 5, &[0]);
    let phrases = Arc::new(PhraseBook::new(&["ia! ia!"]).unwrap());
    let (_, game) = games_from_problem(&problem, phrases).into_iter().next().unwrap();
    let game = game.unwrap();

    // Two occurrences of the phrase sharing their middle "ia!"
    let config = SearchConfig::default().with_replay("aaplaaplaap");
    let mut player = Player::new(StrategyKind::Replay, game.fork(), &config);
    let report = Session::new().run("replay", &mut player);

    assert_eq!(report.final_commands, "ia! ia! ia!");
    assert_eq!(report.score, 1 + 328);
    assert_eq!(report.final_score, report.score);

    let mut replayed = game.fork();
    replayed.play(&report.final_commands).unwrap();
    assert_eq!(replayed.score(), report.score);
    assert_eq!(replayed.final_score(), report.final_score);
}

#[test]
fn test_report_json_shape() {
    let problem = single_cell_problem(4, 4, 2, &[0]);
    let mut player = Player::new(StrategyKind::Lookahead, first_game(&problem), &SearchConfig::default());
    let report = Session::new().run("lookahead", &mut player);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["strategy"], "lookahead");
    assert_eq!(json["stop"]["reason"], "done");
    assert!(json["final_commands"].is_string());
}
