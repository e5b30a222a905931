//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_variant() -> String {
    defaults::variant().into()
}
fn d_exploration() -> f64 {
    defaults::exploration_constant()
}
fn d_decision_exploration() -> f64 {
    defaults::decision_exploration()
}
fn d_rave_bias() -> f64 {
    defaults::rave_bias()
}
fn d_target_depth() -> u32 {
    defaults::target_depth()
}
fn d_depth_cap() -> u32 {
    defaults::depth_cap()
}
fn d_rollouts_per_leaf() -> u32 {
    defaults::rollouts_per_leaf()
}
fn d_epsilon() -> f64 {
    defaults::epsilon()
}
fn d_max_rollout_plies() -> u32 {
    defaults::max_rollout_plies()
}
fn d_max_iterations() -> u32 {
    defaults::max_iterations()
}
fn d_immediate_checks() -> bool {
    defaults::immediate_checks()
}
fn d_time_divisor() -> u32 {
    defaults::time_divisor()
}
fn d_overrun_factor() -> f64 {
    defaults::overrun_factor()
}
fn d_default_budget_ms() -> u64 {
    defaults::default_budget_ms()
}
fn d_line_length() -> usize {
    defaults::line_length()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub rules: RulesConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// RNG seed. None seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            seed: None,
        }
    }
}

/// Search parameters (mirrors the MCTS config)
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Refinement preset: plain_uct, rave, lgrf or full
    #[serde(default = "d_variant")]
    pub variant: String,
    #[serde(default = "d_exploration")]
    pub exploration_constant: f64,
    #[serde(default = "d_decision_exploration")]
    pub decision_exploration: f64,
    #[serde(default = "d_rave_bias")]
    pub rave_bias: f64,
    #[serde(default = "d_target_depth")]
    pub target_depth: u32,
    #[serde(default = "d_depth_cap")]
    pub depth_cap: u32,
    #[serde(default = "d_rollouts_per_leaf")]
    pub rollouts_per_leaf: u32,
    #[serde(default = "d_epsilon")]
    pub epsilon: f64,
    /// 0 = unlimited
    #[serde(default = "d_max_rollout_plies")]
    pub max_rollout_plies: u32,
    /// 0 = unlimited
    #[serde(default = "d_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "d_immediate_checks")]
    pub immediate_checks: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            variant: defaults::variant().into(),
            exploration_constant: defaults::exploration_constant(),
            decision_exploration: defaults::decision_exploration(),
            rave_bias: defaults::rave_bias(),
            target_depth: defaults::target_depth(),
            depth_cap: defaults::depth_cap(),
            rollouts_per_leaf: defaults::rollouts_per_leaf(),
            epsilon: defaults::epsilon(),
            max_rollout_plies: defaults::max_rollout_plies(),
            max_iterations: defaults::max_iterations(),
            immediate_checks: defaults::immediate_checks(),
        }
    }
}

/// Clock handling
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TimingConfig {
    #[serde(default = "d_time_divisor")]
    pub time_divisor: u32,
    #[serde(default = "d_overrun_factor")]
    pub overrun_factor: f64,
    #[serde(default = "d_default_budget_ms")]
    pub default_budget_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            time_divisor: defaults::time_divisor(),
            overrun_factor: defaults::overrun_factor(),
            default_budget_ms: defaults::default_budget_ms(),
        }
    }
}

/// Rules used by the bundled tools
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RulesConfig {
    #[serde(default = "d_line_length")]
    pub line_length: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            line_length: defaults::line_length(),
        }
    }
}
