//! Strategy comparison benchmark
//!
//! Compares:
//! 1. Time per committed move
//! 2. Final score over a full game
//! 3. Throughput (moves per second)

use std::sync::Arc;
use std::time::Instant;

use hexfall_core::{Board, Cell, Game, PhraseBook, Unit};
use hexfall_search::{Player, SearchConfig, Session, StrategyKind};

// ============================================================================
// TEST POSITIONS
// ============================================================================

fn templates() -> Arc<Vec<Unit>> {
    Arc::new(vec![
        Unit::new(vec![Cell::new(0, 0)], Cell::new(0, 0)),
        Unit::new(vec![Cell::new(0, 0), Cell::new(1, 0)], Cell::new(0, 0)),
        Unit::new(vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)], Cell::new(0, 1)),
    ])
}

/// An empty 10x15 board
fn position_empty() -> Game {
    let board = Board::new(10, 15, &[]).expect("valid board");
    Game::new(board, templates(), Arc::new(PhraseBook::default()), 17, 30).expect("spawnable")
}

/// Bottom rows mostly filled, one hole per row
fn position_stacked() -> Game {
    let filled: Vec<Cell> = (10..15)
        .flat_map(|y| (0..10).filter(move |&x| x != y % 10).map(move |x| Cell::new(x, y)))
        .collect();
    let board = Board::new(10, 15, &filled).expect("valid board");
    Game::new(board, templates(), Arc::new(PhraseBook::default()), 17, 30).expect("spawnable")
}

// ============================================================================
// BENCHMARK STRUCTURES
// ============================================================================

#[derive(Clone, Debug)]
struct BenchmarkResult {
    strategy: String,
    position: String,
    moves: usize,
    final_score: i64,
    total_time_ms: f64,
}

impl BenchmarkResult {
    fn moves_per_second(&self) -> f64 {
        self.moves as f64 * 1000.0 / self.total_time_ms.max(f64::EPSILON)
    }

    fn to_table_row(&self) -> String {
        format!(
            "| {:<13} | {:<8} | {:>6} | {:>7} | {:>9.0}ms | {:>9.0} |",
            self.strategy,
            self.position,
            self.moves,
            self.final_score,
            self.total_time_ms,
            self.moves_per_second()
        )
    }
}

// ============================================================================
// BENCHMARK: Full games
// ============================================================================

fn benchmark_games(initial: &Game, position_name: &str, config: &SearchConfig) -> Vec<BenchmarkResult> {
    println!("\n=== FULL GAME BENCHMARK: {} ===", position_name);
    let kinds = [
        StrategyKind::Random,
        StrategyKind::Lookahead,
        StrategyKind::Tree,
        StrategyKind::MonteCarlo,
        StrategyKind::ChantRollout,
    ];

    kinds
        .iter()
        .map(|&kind| {
            print!("  {} ... ", kind);
            let mut player = Player::new(kind, initial.fork(), config);
            let start = Instant::now();
            let report = Session::new().with_max_steps(2000).run(kind.name(), &mut player);
            let elapsed = start.elapsed().as_secs_f64() * 1000.0;
            println!("{} moves, score {} ({:.0}ms)", report.steps, report.final_score, elapsed);

            BenchmarkResult {
                strategy: kind.to_string(),
                position: position_name.to_string(),
                moves: report.steps,
                final_score: report.final_score,
                total_time_ms: elapsed,
            }
        })
        .collect()
}

// ============================================================================
// BENCHMARK: Tree depth scaling
// ============================================================================

fn benchmark_tree_depths(initial: &Game) {
    println!("\n=== TREE DEPTH SCALING ===");
    let mut previous: Option<f64> = None;
    for depth in [2, 3, 4, 5] {
        let config = SearchConfig::default().with_tree_depth(depth);
        let mut player = Player::new(StrategyKind::Tree, initial.fork(), &config);
        let start = Instant::now();
        let report = Session::new().with_max_steps(50).run("tree", &mut player);
        let per_move = start.elapsed().as_secs_f64() * 1000.0 / report.steps.max(1) as f64;
        match previous {
            Some(prev) => println!("  depth {}: {:.2}ms/move ({:.1}x)", depth, per_move, per_move / prev),
            None => println!("  depth {}: {:.2}ms/move", depth, per_move),
        }
        previous = Some(per_move);
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    println!("\n=== HEXFALL: strategy comparison ===");

    let config = SearchConfig::default().with_seed(7);
    let empty = position_empty();
    let stacked = position_stacked();

    let mut results = benchmark_games(&empty, "empty", &config);
    results.extend(benchmark_games(&stacked, "stacked", &config));
    benchmark_tree_depths(&empty);

    println!("\n| Strategy      | Position | Moves  | Score   | Total       | Moves/sec |");
    println!("|---------------|----------|--------|---------|-------------|-----------|");
    for result in &results {
        println!("{}", result.to_table_row());
    }

    if let Some(best) = results.iter().max_by_key(|r| r.final_score) {
        println!("\nBest: {} on {} with {}", best.strategy, best.position, best.final_score);
    }
}
