//! Move selection: shortcuts, the time-bounded search loop, final pick.
//!
//! One call to [`MctsSearch::run`] performs:
//! 1. Shortcuts: an immediate win, else a block of the opponent's immediate
//!    win, else the only legal move. None of these run the search.
//! 2. Search: Selection -> Expansion -> Rollout -> Backpropagation, repeated
//!    until the stop rule fires. Iterations are never interrupted, so the
//!    elapsed time may exceed the budget by one iteration's cost.
//! 3. Decision: the root child chosen by `select_best_child` with the
//!    decision-time exploration constant.

use std::time::{Duration, Instant};

use engine_core::game_utils::outcome_value;
use engine_core::{Board, BoardError, Cell, Move, Player, RulesOracle};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::rollout::RolloutPolicy;
use crate::stats::SessionStats;
use crate::tree::SearchTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Board error: {0}")]
    Board(#[from] BoardError),
}

/// How the returned move was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The move wins on the spot
    ImmediateWin,
    /// The move occupies the cell the opponent would win on
    Block,
    /// Only one legal move was available
    Forced,
    /// Chosen by tree search
    Search,
    /// The search left the root without children; first legal move returned
    Fallback,
}

/// Result of one move decision.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chosen move, legal on the input board
    pub mv: Move,

    pub decision: Decision,

    /// Completed search iterations (0 for shortcuts)
    pub iterations: u32,

    /// Rollouts played (0 for shortcuts)
    pub rollouts: u32,

    /// Estimated value of `mv` for the acting player. 1.0 for an immediate
    /// win, 0.5 when nothing was searched.
    pub value: f64,

    /// Deepest selection depth reached by any iteration
    pub max_depth: u32,

    pub elapsed: Duration,
}

/// Counters for the search loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub iterations: u32,
    pub rollouts: u32,
    pub max_depth: u32,
    /// Whether any iteration reached the target selection depth
    pub target_reached: bool,
}

/// MCTS search state for one move decision.
pub struct MctsSearch<'a, R: RulesOracle> {
    tree: SearchTree,
    rules: &'a R,
    session: &'a mut SessionStats,
    config: MctsConfig,
    player: Player,
    /// Selection depth that satisfies the stop rule for this position
    target_depth: u32,
    stats: SearchStats,
}

impl<'a, R: RulesOracle> MctsSearch<'a, R> {
    /// Create a search for `player` to move on `board`.
    ///
    /// `last_move` is the opponent's most recent move, if known. It must be
    /// a cell holding an opponent stone.
    pub fn new(
        rules: &'a R,
        session: &'a mut SessionStats,
        config: MctsConfig,
        board: Board,
        player: Player,
        last_move: Option<Move>,
    ) -> Result<Self, SearchError> {
        if let Some(mv) = last_move {
            match board.cell(mv) {
                Some(Cell::Stone(owner)) if owner == player.opponent() => {}
                other => {
                    return Err(SearchError::InvalidState(format!(
                        "last move {mv} is not an opponent stone (found {other:?})"
                    )))
                }
            }
        }

        Ok(Self {
            tree: SearchTree::new(board, player, last_move),
            rules,
            session,
            target_depth: config.effective_target_depth(),
            config,
            player,
            stats: SearchStats::default(),
        })
    }

    /// Choose a move, searching for at most roughly `budget`.
    pub fn run(
        &mut self,
        budget: Duration,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchResult, SearchError> {
        let start = Instant::now();
        let root_state = self.tree.get(self.tree.root()).state.clone();

        let legal = self.rules.legal_moves(&root_state);
        if legal.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        if self.config.immediate_checks {
            if let Some(mv) = self.find_winning_move(&root_state, &legal, self.player)? {
                debug!(%mv, player = %self.player, "Immediate win");
                return Ok(self.finish(mv, Decision::ImmediateWin, 1.0, start));
            }
            let opponent = self.player.opponent();
            if let Some(mv) = self.find_winning_move(&root_state, &legal, opponent)? {
                debug!(%mv, player = %self.player, "Blocking opponent win");
                return Ok(self.finish(mv, Decision::Block, 0.5, start));
            }
        }

        if legal.len() == 1 {
            let only = legal[0];
            debug!(mv = %only, "Single legal move");
            return Ok(self.finish(only, Decision::Forced, 0.5, start));
        }

        // No selection path is longer than the number of legal moves. An
        // unbounded target leaves only the clock.
        self.target_depth = match self.config.effective_target_depth() {
            u32::MAX => 0,
            depth => depth.min(u32::try_from(legal.len()).unwrap_or(u32::MAX)),
        };

        let budget_secs = budget.as_secs_f64();
        let hard_limit_secs = budget_secs * self.config.overrun_factor.max(1.0);

        loop {
            self.iterate(rng)?;

            if let Some(max) = self.config.max_iterations {
                if self.stats.iterations >= max {
                    break;
                }
            }

            let elapsed = start.elapsed().as_secs_f64();
            if elapsed >= budget_secs && self.stats.target_reached {
                break;
            }
            if elapsed >= hard_limit_secs {
                warn!(
                    iterations = self.stats.iterations,
                    max_depth = self.stats.max_depth,
                    target_depth = self.target_depth,
                    "Search hit its overrun ceiling before reaching target depth"
                );
                break;
            }
        }

        let root = self.tree.root();
        let (mv, decision, value) = match self.tree.select_best_child(
            root,
            self.config.decision_exploration,
            self.config.scoring,
        ) {
            Some(child_id) => {
                let child = self.tree.get(child_id);
                let mv = child.mv.ok_or_else(|| {
                    SearchError::InvalidState("root child without a move".to_string())
                })?;
                (mv, Decision::Search, child.mean_value())
            }
            None => {
                warn!("Search left the root without children, using first legal move");
                (legal[0], Decision::Fallback, 0.5)
            }
        };

        let result = self.finish(mv, decision, value, start);
        let tree_stats = self.tree.stats();
        debug!(
            %mv,
            iterations = result.iterations,
            rollouts = result.rollouts,
            nodes = tree_stats.total_nodes,
            max_depth = result.max_depth,
            target_depth = self.target_depth,
            value = result.value,
            root_value = self.root_value(self.player),
            elapsed_ms = result.elapsed.as_millis() as u64,
            "Search complete"
        );

        Ok(result)
    }

    /// One iteration: select (expanding at most one node), simulate,
    /// backpropagate.
    fn iterate(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        let (leaf_id, depth, dead_end) = self.select()?;
        let uses_rave = self.config.scoring.uses_rave();
        let leaf = self.tree.get(leaf_id);

        self.stats.max_depth = self.stats.max_depth.max(depth);
        // A path ending in a finished game cannot be extended to the target.
        if depth >= self.target_depth || leaf.is_terminal || dead_end {
            self.stats.target_reached = true;
        }

        // Value scored for the player who moved into the leaf.
        let leaf_value = if leaf.is_terminal {
            // The move into a terminal node won the game for its mover.
            if uses_rave {
                self.tree.update_rave(leaf_id, &[], 1.0);
            }
            1.0
        } else {
            let board = leaf.state.clone();
            let to_move = leaf.to_move;
            let mover = leaf.mover();
            let last_move = leaf.mv;
            let rollouts = self.config.rollouts_per_leaf.max(1);

            let policy = RolloutPolicy::new(self.rules, &self.config, self.player);
            let mut total = 0.0;
            for _ in 0..rollouts {
                let playout = policy.run(&board, to_move, last_move, &mut *self.session, rng)?;
                self.stats.rollouts += 1;

                let value = playout.outcome(mover);
                if uses_rave {
                    self.tree.update_rave(leaf_id, &playout.moves, value);
                }
                total += value;
            }
            total / rollouts as f64
        };

        self.tree.backpropagate(leaf_id, leaf_value);
        if self.config.use_last_good_reply {
            self.tree.update_good_replies(leaf_id, leaf_value);
        }
        self.stats.iterations += 1;

        trace!(
            leaf = leaf_id.0,
            depth,
            value = leaf_value,
            "MCTS iteration complete"
        );

        Ok(())
    }

    /// Tree policy. Returns the node reached, its selection depth, and
    /// whether selection stopped at a node with no legal moves.
    fn select(&mut self) -> Result<(NodeId, u32, bool), SearchError> {
        let mut current = self.tree.root();
        let mut depth = 0u32;

        while !self.tree.get(current).is_terminal && depth < self.config.depth_cap {
            if !self.tree.is_fully_expanded(current, self.rules) {
                if let Some(child) = self.tree.expand(current, self.rules)? {
                    return Ok((child, depth + 1, false));
                }
            }

            let reply = if self.config.use_last_good_reply {
                self.tree.good_reply_child(current)
            } else {
                None
            };
            let next = reply.or_else(|| {
                self.tree.select_best_child(
                    current,
                    self.config.exploration_constant,
                    self.config.scoring,
                )
            });

            match next {
                Some(child) => current = child,
                // Fully expanded with no children: nothing is legal here.
                None => return Ok((current, depth, true)),
            }
            depth += 1;
        }

        Ok((current, depth, false))
    }

    fn find_winning_move(
        &self,
        board: &Board,
        legal: &[Move],
        player: Player,
    ) -> Result<Option<Move>, SearchError> {
        for &mv in legal {
            let next = board.with_move(mv, player)?;
            if self.rules.check_win(&next, mv, player) {
                return Ok(Some(mv));
            }
        }
        Ok(None)
    }

    fn finish(&self, mv: Move, decision: Decision, value: f64, start: Instant) -> SearchResult {
        SearchResult {
            mv,
            decision,
            iterations: self.stats.iterations,
            rollouts: self.stats.rollouts,
            value,
            max_depth: self.stats.max_depth,
            elapsed: start.elapsed(),
        }
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Value the finished search assigns to `perspective`, from the root's
    /// visit statistics. 0.5 before any iteration.
    pub fn root_value(&self, perspective: Player) -> f64 {
        let root = self.tree.get(self.tree.root());
        if root.visits == 0 {
            return outcome_value(None, perspective);
        }
        // The root is scored for the player who did not move at it.
        if perspective == root.mover() {
            root.mean_value()
        } else {
            1.0 - root.mean_value()
        }
    }
}

/// Convenience function to run a single move decision.
#[allow(clippy::too_many_arguments)]
pub fn choose_move<R: RulesOracle>(
    rules: &R,
    session: &mut SessionStats,
    config: MctsConfig,
    board: Board,
    player: Player,
    last_move: Option<Move>,
    budget: Duration,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    let mut search = MctsSearch::new(rules, session, config, board, player, last_move)?;
    search.run(budget, rng)
}
