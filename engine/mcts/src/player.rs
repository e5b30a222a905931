//! Timer-driven MCTS player.
//!
//! Owns the session statistics for one game and turns the remaining clock
//! into a per-move budget before each search.

use std::time::Duration;

use engine_core::game_utils::per_move_budget;
use engine_core::{Board, Move, Player, RulesOracle, Timer};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::config::MctsConfig;
use crate::search::{choose_move, SearchError, SearchResult};
use crate::stats::SessionStats;

/// Default divisor in `remaining / (rows * time_divisor)`.
pub const DEFAULT_TIME_DIVISOR: u32 = 10;

/// MCTS player for one side of a game.
pub struct MctsPlayer<R: RulesOracle> {
    rules: R,
    player: Player,
    config: MctsConfig,
    /// Persists across this game's move decisions
    session: SessionStats,
    time_divisor: u32,
    rng: ChaCha20Rng,
}

impl<R: RulesOracle> std::fmt::Debug for MctsPlayer<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MctsPlayer")
            .field("player", &self.player)
            .field("config", &self.config)
            .field("time_divisor", &self.time_divisor)
            .field("known_replies", &self.session.replies.len())
            .field("ngram_transitions", &self.session.ngrams.total_transitions())
            .finish()
    }
}

impl<R: RulesOracle> MctsPlayer<R> {
    /// Create a player seeded from OS entropy.
    pub fn new(rules: R, player: Player) -> Self {
        Self::with_rng(rules, player, ChaCha20Rng::from_entropy())
    }

    /// Create with a specific seed for determinism (used in tests)
    pub fn with_seed(rules: R, player: Player, seed: u64) -> Self {
        Self::with_rng(rules, player, ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(rules: R, player: Player, rng: ChaCha20Rng) -> Self {
        Self {
            rules,
            player,
            config: MctsConfig::default(),
            session: SessionStats::new(),
            time_divisor: DEFAULT_TIME_DIVISOR,
            rng,
        }
    }

    /// Set the MCTS configuration
    pub fn with_config(mut self, config: MctsConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the divisor used to split the remaining clock. Zero is treated as one.
    pub fn with_time_divisor(mut self, divisor: u32) -> Self {
        self.time_divisor = divisor.max(1);
        self
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn time_divisor(&self) -> u32 {
        self.time_divisor
    }

    pub fn session(&self) -> &SessionStats {
        &self.session
    }

    /// Forget everything learned in the previous game.
    pub fn new_game(&mut self) {
        debug!(player = %self.player, "Resetting session statistics");
        self.session.reset();
    }

    /// Per-move budget: `remaining / (rows * time_divisor)`.
    pub fn move_budget(&self, board: &Board, remaining: Duration) -> Duration {
        let moves_estimate = (board.rows() as u32).saturating_mul(self.time_divisor);
        per_move_budget(remaining, moves_estimate)
    }

    /// Choose a move, budgeting from the player's remaining clock time.
    pub fn get_move(
        &mut self,
        board: &Board,
        last_move: Option<Move>,
        timer: &dyn Timer,
    ) -> Result<SearchResult, SearchError> {
        let remaining = timer.remaining(self.player);
        let budget = self.move_budget(board, remaining);
        debug!(
            player = %self.player,
            remaining_ms = remaining.as_millis() as u64,
            budget_ms = budget.as_millis() as u64,
            "Move budget"
        );
        self.get_move_with_budget(board, last_move, budget)
    }

    /// Choose a move with an explicit time budget.
    pub fn get_move_with_budget(
        &mut self,
        board: &Board,
        last_move: Option<Move>,
        budget: Duration,
    ) -> Result<SearchResult, SearchError> {
        choose_move(
            &self.rules,
            &mut self.session,
            self.config.clone(),
            board.clone(),
            self.player,
            last_move,
            budget,
            &mut self.rng,
        )
    }
}
