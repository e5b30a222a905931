//! MCTS configuration parameters.

/// How a parent scores its children during selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringStrategy {
    /// Plain UCB1: mean value plus exploration bonus.
    Uct,

    /// UCB1 blended with the parent's RAVE estimate for the child's move:
    /// `score = (1 - β) * uct + β * rave`, where
    /// `β = rv / (v + rv + 1 + 4 * bias² * v * rv)`.
    ///
    /// With `bias = 0.0` this is `rv / (v + rv + 1)`.
    UctRave { bias: f64 },
}

impl ScoringStrategy {
    /// Weight given to the RAVE estimate for a child with `visits` real visits
    /// and `rave_visits` AMAF visits.
    #[inline]
    pub fn rave_weight(&self, visits: u32, rave_visits: u32) -> f64 {
        match *self {
            ScoringStrategy::Uct => 0.0,
            ScoringStrategy::UctRave { bias } => {
                let v = visits as f64;
                let rv = rave_visits as f64;
                rv / (v + rv + 1.0 + 4.0 * bias * bias * v * rv)
            }
        }
    }

    pub fn uses_rave(&self) -> bool {
        matches!(self, ScoringStrategy::UctRave { .. })
    }
}

impl Default for ScoringStrategy {
    fn default() -> Self {
        ScoringStrategy::UctRave { bias: 0.0 }
    }
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Exploration constant for UCB1 inside the tree.
    pub exploration_constant: f64,

    /// Exploration constant used when picking the final root child.
    /// Lower values favor exploitation at decision time.
    pub decision_exploration: f64,

    /// Child scoring strategy (UCT only, or UCT blended with RAVE).
    pub scoring: ScoringStrategy,

    /// Selection depth at least one iteration must reach before the search
    /// may stop on time.
    pub target_depth: u32,

    /// Maximum ply depth the tree policy descends before rolling out.
    pub depth_cap: u32,

    /// Independent rollouts per leaf; their outcomes are averaged.
    pub rollouts_per_leaf: u32,

    /// Probability of a uniform random rollout move instead of the N-gram
    /// greedy choice.
    pub epsilon: f64,

    /// Use last-good-reply memory (in tree and in rollouts).
    pub use_last_good_reply: bool,

    /// Use the N-gram weighted rollout policy. When off, rollouts fall back
    /// to uniform random moves.
    pub use_ngram: bool,

    /// Truncate rollouts after this many plies; a truncated rollout is a draw.
    pub max_rollout_plies: Option<u32>,

    /// Stop after this many iterations regardless of the clock.
    pub max_iterations: Option<u32>,

    /// Last-resort ceiling on search time as a multiple of the budget. Only
    /// reached if no iteration gets to the target depth in time.
    pub overrun_factor: f64,

    /// Check for immediate wins and forced blocks before searching.
    pub immediate_checks: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_constant: 1.41,
            decision_exploration: 0.7,
            scoring: ScoringStrategy::default(),
            target_depth: 3,
            depth_cap: 3,
            rollouts_per_leaf: 1,
            epsilon: 0.1,
            use_last_good_reply: true,
            use_ngram: true,
            max_rollout_plies: None,
            max_iterations: None,
            overrun_factor: 2.0,
            immediate_checks: true,
        }
    }
}

impl MctsConfig {
    /// Plain UCT with uniform random rollouts.
    pub fn plain_uct() -> Self {
        Self {
            scoring: ScoringStrategy::Uct,
            use_last_good_reply: false,
            use_ngram: false,
            ..Self::default()
        }
    }

    /// UCT blended with RAVE, uniform random rollouts.
    pub fn with_rave() -> Self {
        Self {
            scoring: ScoringStrategy::default(),
            ..Self::plain_uct()
        }
    }

    /// RAVE plus last-good-reply with forgetting.
    pub fn with_lgrf() -> Self {
        Self {
            use_last_good_reply: true,
            ..Self::with_rave()
        }
    }

    /// RAVE, LGRF-1 and the N-gram rollout policy.
    pub fn full() -> Self {
        Self::default()
    }

    /// Create a fast, clock-independent config for testing.
    pub fn for_testing() -> Self {
        Self {
            max_iterations: Some(200),
            ..Self::default()
        }
    }

    /// Builder pattern: remove the depth cap and target ("think hard" pass).
    pub fn think_hard(mut self) -> Self {
        self.depth_cap = u32::MAX;
        self.target_depth = u32::MAX;
        self
    }

    /// Builder pattern: set the in-tree exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Builder pattern: set the decision-time exploration constant.
    pub fn with_decision_exploration(mut self, c: f64) -> Self {
        self.decision_exploration = c;
        self
    }

    /// Builder pattern: set the scoring strategy.
    pub fn with_scoring(mut self, scoring: ScoringStrategy) -> Self {
        self.scoring = scoring;
        self
    }

    /// Builder pattern: set depth cap and target depth.
    pub fn with_depth(mut self, depth_cap: u32, target_depth: u32) -> Self {
        self.depth_cap = depth_cap;
        self.target_depth = target_depth;
        self
    }

    /// Builder pattern: set the overrun ceiling (clamped to at least 1).
    pub fn with_overrun_factor(mut self, factor: f64) -> Self {
        self.overrun_factor = factor.max(1.0);
        self
    }

    /// Builder pattern: set rollouts per leaf.
    pub fn with_rollouts_per_leaf(mut self, n: u32) -> Self {
        self.rollouts_per_leaf = n;
        self
    }

    /// Builder pattern: set the rollout epsilon.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Builder pattern: cap the number of iterations.
    pub fn with_max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Builder pattern: truncate rollouts.
    pub fn with_max_rollout_plies(mut self, n: u32) -> Self {
        self.max_rollout_plies = Some(n);
        self
    }

    /// Builder pattern: enable or disable the win/block shortcuts.
    pub fn with_immediate_checks(mut self, enabled: bool) -> Self {
        self.immediate_checks = enabled;
        self
    }

    /// Depth an iteration must reach for the time limit to apply.
    #[inline]
    pub fn effective_target_depth(&self) -> u32 {
        self.target_depth.min(self.depth_cap)
    }
}
