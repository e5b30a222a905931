//! Move-selection scenarios played out on k-in-a-row rules.

use std::time::Duration;

use engine_core::{Board, Move, Player, RulesOracle};
use games_lines::LineRules;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::config::MctsConfig;
use crate::rollout::RolloutPolicy;
use crate::search::{choose_move, Decision, MctsSearch};
use crate::stats::SessionStats;

const LONG: Duration = Duration::from_secs(60);

fn board(s: &str) -> Board {
    s.parse().unwrap()
}

fn rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

#[test]
fn test_immediate_win_skips_search() {
    let rules = LineRules::tictactoe();
    let mut session = SessionStats::new();
    let b = board("1 1 0\n0 0 0\n0 0 0");

    let result = choose_move(
        &rules,
        &mut session,
        MctsConfig::default(),
        b,
        Player::One,
        None,
        LONG,
        &mut rng(1),
    )
    .unwrap();

    assert_eq!(result.mv, Move::new(0, 2));
    assert_eq!(result.decision, Decision::ImmediateWin);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.rollouts, 0);
    assert!(session.ngrams.is_empty());
}

#[test]
fn test_blocks_opponent_win() {
    let rules = LineRules::tictactoe();
    let mut session = SessionStats::new();
    let b = board("1 0 0\n2 2 0\n0 0 1");

    let result = choose_move(
        &rules,
        &mut session,
        MctsConfig::default(),
        b,
        Player::One,
        Some(Move::new(1, 1)),
        LONG,
        &mut rng(2),
    )
    .unwrap();

    assert_eq!(result.mv, Move::new(1, 2));
    assert_eq!(result.decision, Decision::Block);
    assert_eq!(result.iterations, 0);
}

#[test]
fn test_single_legal_move_is_forced() {
    let rules = LineRules::tictactoe();
    let mut session = SessionStats::new();
    let b = board("1 2 0\n2 1 3");

    for budget in [Duration::ZERO, LONG] {
        let result = choose_move(
            &rules,
            &mut session,
            MctsConfig::default(),
            b.clone(),
            Player::One,
            None,
            budget,
            &mut rng(3),
        )
        .unwrap();

        assert_eq!(result.mv, Move::new(0, 2));
        assert_eq!(result.decision, Decision::Forced);
        assert_eq!(result.iterations, 0);
    }
}

#[test]
fn test_zero_budget_completes_an_iteration() {
    let rules = LineRules::new(4);
    let mut session = SessionStats::new();
    let b = Board::new(4, 4).unwrap();

    let result = choose_move(
        &rules,
        &mut session,
        MctsConfig::default(),
        b.clone(),
        Player::One,
        None,
        Duration::ZERO,
        &mut rng(4),
    )
    .unwrap();

    assert_eq!(result.decision, Decision::Search);
    assert!(result.iterations >= 1);
    assert!(rules.legal_moves(&b).contains(&result.mv));
}

#[test]
fn test_search_finds_win_without_shortcuts() {
    let rules = LineRules::tictactoe();
    let mut session = SessionStats::new();
    let b = board("1 1 0\n2 2 0\n0 0 0");
    let config = MctsConfig::plain_uct()
        .with_immediate_checks(false)
        .with_max_iterations(2000);

    let result = choose_move(
        &rules,
        &mut session,
        config,
        b,
        Player::One,
        Some(Move::new(1, 1)),
        LONG,
        &mut rng(5),
    )
    .unwrap();

    assert_eq!(result.decision, Decision::Search);
    assert_eq!(result.mv, Move::new(0, 2));
    assert!(result.value > 0.9);
}

#[test]
fn test_visit_counts_match_iterations() {
    let rules = LineRules::new(3);
    let mut session = SessionStats::new();
    let b = Board::new(4, 4).unwrap();
    let config = MctsConfig::default().with_max_iterations(150);
    let mut search = MctsSearch::new(&rules, &mut session, config, b, Player::One, None).unwrap();

    let result = search.run(LONG, &mut rng(6)).unwrap();
    assert_eq!(result.iterations, 150);

    let tree = search.tree();
    assert_eq!(tree.get(tree.root()).visits, 150);

    // Every iteration stops at exactly one node, so the visits that did not
    // continue into a child add up to the iteration count.
    let mut stopped_here = 0;
    for node in tree.arena() {
        let through_children: u32 = node.children.iter().map(|&c| tree.get(c).visits).sum();
        assert!(node.visits >= through_children);
        stopped_here += node.visits - through_children;
    }
    assert_eq!(stopped_here, 150);
}

#[test]
fn test_single_iteration_values_alternate() {
    let rules = LineRules::tictactoe();
    let mut session = SessionStats::new();
    let b = Board::new(3, 3).unwrap();
    let config = MctsConfig::default().with_max_iterations(1);
    let mut search = MctsSearch::new(&rules, &mut session, config, b, Player::One, None).unwrap();

    search.run(LONG, &mut rng(7)).unwrap();

    let tree = search.tree();
    let root = tree.get(tree.root());
    let child = tree.get(root.children[0]);
    assert_eq!(root.visits, 1);
    assert_eq!(child.visits, 1);
    assert!((root.value - (1.0 - child.value)).abs() < 1e-12);
}

#[test]
fn test_rave_counts_each_simulated_move_once() {
    let rules = LineRules::tictactoe();
    let mut session = SessionStats::new();
    let b = Board::new(3, 3).unwrap();
    let config = MctsConfig::with_rave().with_max_iterations(1);
    let mut search = MctsSearch::new(&rules, &mut session, config, b, Player::One, None).unwrap();

    search.run(LONG, &mut rng(8)).unwrap();

    let tree = search.tree();
    let root = tree.get(tree.root());
    let child = tree.get(root.children[0]);

    assert!(root.rave.values().all(|stats| stats.visits == 1));
    // The child's move plus every rollout move
    assert_eq!(root.rave.len(), child.rave.len() + 1);
    assert!(child.rave.values().all(|stats| stats.visits == 1));
}

#[test]
fn test_ngram_total_matches_rollout_transitions() {
    let rules = LineRules::new(3);
    let config = MctsConfig::full();
    let policy = RolloutPolicy::new(&rules, &config, Player::Two);
    let mut session = SessionStats::new();
    let mut rng = rng(9);

    let start = Board::new(4, 4).unwrap();
    let mut expected = 0u64;
    for i in 0..40 {
        let last = if i % 2 == 0 { None } else { Some(Move::new(3, 3)) };
        let b = match last {
            Some(mv) => start.with_move(mv, Player::One).unwrap(),
            None => start.clone(),
        };
        let playout = policy
            .run(&b, Player::Two, last, &mut session, &mut rng)
            .unwrap();
        expected += playout.transitions(last) as u64;
    }

    assert_eq!(session.ngrams.total_transitions(), expected);
}

#[test]
fn test_same_seed_same_move() {
    let rules = LineRules::new(3);
    let b = board("0 0 0 0\n0 1 0 0\n0 0 2 0\n0 0 0 0");
    let config = MctsConfig::default().with_max_iterations(300);

    let run = |seed: u64| {
        let mut session = SessionStats::new();
        let mut search = MctsSearch::new(
            &rules,
            &mut session,
            config.clone(),
            b.clone(),
            Player::One,
            Some(Move::new(2, 2)),
        )
        .unwrap();
        let result = search.run(LONG, &mut rng(seed)).unwrap();
        let stats = search.tree().stats();
        (result.mv, result.rollouts, stats.total_nodes, stats.root_visits)
    };

    assert_eq!(run(10), run(10));
}

#[test]
fn test_session_statistics_carry_into_next_search() {
    let rules = LineRules::new(3);
    let mut session = SessionStats::new();
    let b = Board::new(4, 4).unwrap();
    let config = MctsConfig::default().with_max_iterations(100);

    choose_move(
        &rules,
        &mut session,
        config.clone(),
        b.clone(),
        Player::One,
        None,
        LONG,
        &mut rng(11),
    )
    .unwrap();
    let first = session.ngrams.total_transitions();
    assert!(first > 0);
    assert!(!session.replies.is_empty());

    let b = b.with_move(Move::new(0, 0), Player::One).unwrap();
    choose_move(
        &rules,
        &mut session,
        config,
        b,
        Player::Two,
        Some(Move::new(0, 0)),
        LONG,
        &mut rng(12),
    )
    .unwrap();
    assert!(session.ngrams.total_transitions() > first);

    session.reset();
    assert!(session.ngrams.is_empty());
    assert!(session.replies.is_empty());
}

#[test]
fn test_every_variant_returns_a_legal_move() {
    let rules = LineRules::new(3);
    let b = board("1 0 0 2\n0 3 0 0\n0 0 2 0\n1 0 0 0");
    let legal = rules.legal_moves(&b);

    for config in [
        MctsConfig::plain_uct(),
        MctsConfig::with_rave(),
        MctsConfig::with_lgrf(),
        MctsConfig::full(),
        MctsConfig::full().think_hard(),
    ] {
        let mut session = SessionStats::new();
        let result = choose_move(
            &rules,
            &mut session,
            config.with_max_iterations(120),
            b.clone(),
            Player::One,
            Some(Move::new(2, 2)),
            LONG,
            &mut rng(13),
        )
        .unwrap();
        assert!(legal.contains(&result.mv));
    }
}
