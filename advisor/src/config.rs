//! Configuration for the advisor binary
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use engine_core::{Move, Player};
use mcts::{MctsConfig, ScoringStrategy};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

/// Search presets accepted by `--variant`.
pub const VARIANTS: &[&str] = &["plain_uct", "rave", "lgrf", "full"];

// Default value functions that read from central config
fn default_log_level() -> String {
    std::env::var("ADVISOR_LOG_LEVEL").unwrap_or_else(|_| CENTRAL_CONFIG.common.log_level.clone())
}

fn default_variant() -> String {
    std::env::var("ADVISOR_VARIANT").unwrap_or_else(|_| CENTRAL_CONFIG.search.variant.clone())
}

fn default_line_length() -> usize {
    std::env::var("ADVISOR_LINE_LENGTH")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(CENTRAL_CONFIG.rules.line_length)
}

fn default_budget_ms() -> u64 {
    std::env::var("ADVISOR_BUDGET_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(CENTRAL_CONFIG.timing.default_budget_ms)
}

fn default_time_divisor() -> u32 {
    std::env::var("ADVISOR_TIME_DIVISOR")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(CENTRAL_CONFIG.timing.time_divisor)
}

fn default_depth_cap() -> u32 {
    CENTRAL_CONFIG.search.depth_cap
}

fn default_target_depth() -> u32 {
    CENTRAL_CONFIG.search.target_depth
}

fn default_rollouts_per_leaf() -> u32 {
    CENTRAL_CONFIG.search.rollouts_per_leaf
}

fn default_epsilon() -> f64 {
    CENTRAL_CONFIG.search.epsilon
}

fn default_max_iterations() -> u32 {
    CENTRAL_CONFIG.search.max_iterations
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "advisor")]
#[command(about = "ringfork advisor - pick one move for a board snapshot")]
#[command(
    long_about = "Reads a board snapshot (rows of cell codes: 0 empty, 1 player one,
2 player two, 3 blocked), runs the MCTS move selector once and prints
the chosen move as `row col`.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Board file to read; stdin when omitted or `-`
    pub board: Option<PathBuf>,

    /// Player to move (1 or 2)
    #[arg(long, default_value_t = 1)]
    pub player: u8,

    /// Opponent's last move as `row,col`
    #[arg(long)]
    pub last_move: Option<String>,

    /// Remaining clock time; the budget becomes remaining / (rows * time_divisor)
    #[arg(long)]
    pub remaining_ms: Option<u64>,

    /// Per-move budget when no remaining time is given
    #[arg(long, default_value_t = default_budget_ms())]
    pub budget_ms: u64,

    #[arg(long, default_value_t = default_time_divisor())]
    pub time_divisor: u32,

    /// Search preset: plain_uct, rave, lgrf or full
    #[arg(long, default_value_t = default_variant())]
    pub variant: String,

    /// Remove the depth cap and target depth
    #[arg(long)]
    pub think_hard: bool,

    #[arg(long, default_value_t = default_depth_cap())]
    pub depth_cap: u32,

    #[arg(long, default_value_t = default_target_depth())]
    pub target_depth: u32,

    #[arg(long, default_value_t = default_rollouts_per_leaf())]
    pub rollouts_per_leaf: u32,

    /// Probability of a uniform random rollout move
    #[arg(long, default_value_t = default_epsilon())]
    pub epsilon: f64,

    /// Stop after this many iterations (0 = time only)
    #[arg(long, default_value_t = default_max_iterations())]
    pub max_iterations: u32,

    /// RNG seed; OS entropy when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stones in a row needed to win
    #[arg(long, default_value_t = default_line_length())]
    pub line_length: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.player()?;
        self.last_move()?;

        if !VARIANTS.contains(&self.variant.as_str()) {
            return Err(anyhow!(
                "unknown variant '{}', expected one of {}",
                self.variant,
                VARIANTS.join(", ")
            ));
        }

        if self.line_length == 0 {
            return Err(anyhow!("line_length must be greater than 0"));
        }

        if self.time_divisor == 0 {
            return Err(anyhow!("time_divisor must be greater than 0"));
        }

        if self.rollouts_per_leaf == 0 {
            return Err(anyhow!("rollouts_per_leaf must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(anyhow!("epsilon must be between 0 and 1"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    pub fn player(&self) -> Result<Player> {
        Player::from_code(self.player)
            .ok_or_else(|| anyhow!("player must be 1 or 2, got {}", self.player))
    }

    /// Parse `--last-move row,col`.
    pub fn last_move(&self) -> Result<Option<Move>> {
        let Some(raw) = &self.last_move else {
            return Ok(None);
        };

        let (row, col) = raw
            .split_once(',')
            .ok_or_else(|| anyhow!("last_move must look like `row,col`, got '{}'", raw))?;
        let row = row
            .trim()
            .parse()
            .with_context(|| format!("invalid last_move row in '{}'", raw))?;
        let col = col
            .trim()
            .parse()
            .with_context(|| format!("invalid last_move column in '{}'", raw))?;

        Ok(Some(Move::new(row, col)))
    }

    /// CLI seed, falling back to `common.seed` from config.toml.
    pub fn seed(&self) -> Option<u64> {
        self.seed.or(CENTRAL_CONFIG.common.seed)
    }

    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.remaining_ms.map(Duration::from_millis)
    }

    /// Build the search configuration from the preset and overrides.
    pub fn mcts_config(&self) -> Result<MctsConfig> {
        let search = &CENTRAL_CONFIG.search;

        let base = match self.variant.as_str() {
            "plain_uct" => MctsConfig::plain_uct(),
            "rave" => MctsConfig::with_rave(),
            "lgrf" => MctsConfig::with_lgrf(),
            "full" => MctsConfig::full(),
            other => return Err(anyhow!("unknown variant '{}'", other)),
        };

        let scoring = if base.scoring.uses_rave() {
            ScoringStrategy::UctRave {
                bias: search.rave_bias,
            }
        } else {
            ScoringStrategy::Uct
        };

        let mut config = base
            .with_scoring(scoring)
            .with_exploration(search.exploration_constant)
            .with_decision_exploration(search.decision_exploration)
            .with_depth(self.depth_cap, self.target_depth)
            .with_rollouts_per_leaf(self.rollouts_per_leaf)
            .with_epsilon(self.epsilon)
            .with_immediate_checks(search.immediate_checks)
            .with_overrun_factor(CENTRAL_CONFIG.timing.overrun_factor);

        if self.max_iterations > 0 {
            config = config.with_max_iterations(self.max_iterations);
        }
        if search.max_rollout_plies > 0 {
            config = config.with_max_rollout_plies(search.max_rollout_plies);
        }
        if self.think_hard {
            config = config.think_hard();
        }

        Ok(config)
    }
}
