//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time, so
//! the documented file and the binary can never disagree.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    search: SearchDefaults,
    timing: TimingDefaults,
    rules: RulesDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct SearchDefaults {
    variant: String,
    exploration_constant: f64,
    decision_exploration: f64,
    rave_bias: f64,
    target_depth: u32,
    depth_cap: u32,
    rollouts_per_leaf: u32,
    epsilon: f64,
    max_rollout_plies: u32,
    max_iterations: u32,
    immediate_checks: bool,
}

#[derive(Debug, Deserialize)]
struct TimingDefaults {
    time_divisor: u32,
    overrun_factor: f64,
    default_budget_ms: u64,
}

#[derive(Debug, Deserialize)]
struct RulesDefaults {
    line_length: usize,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Search
pub fn variant() -> &'static str {
    &DEFAULTS.search.variant
}
pub fn exploration_constant() -> f64 {
    DEFAULTS.search.exploration_constant
}
pub fn decision_exploration() -> f64 {
    DEFAULTS.search.decision_exploration
}
pub fn rave_bias() -> f64 {
    DEFAULTS.search.rave_bias
}
pub fn target_depth() -> u32 {
    DEFAULTS.search.target_depth
}
pub fn depth_cap() -> u32 {
    DEFAULTS.search.depth_cap
}
pub fn rollouts_per_leaf() -> u32 {
    DEFAULTS.search.rollouts_per_leaf
}
pub fn epsilon() -> f64 {
    DEFAULTS.search.epsilon
}
pub fn max_rollout_plies() -> u32 {
    DEFAULTS.search.max_rollout_plies
}
pub fn max_iterations() -> u32 {
    DEFAULTS.search.max_iterations
}
pub fn immediate_checks() -> bool {
    DEFAULTS.search.immediate_checks
}

// Timing
pub fn time_divisor() -> u32 {
    DEFAULTS.timing.time_divisor
}
pub fn overrun_factor() -> f64 {
    DEFAULTS.timing.overrun_factor
}
pub fn default_budget_ms() -> u64 {
    DEFAULTS.timing.default_budget_ms
}

// Rules
pub fn line_length() -> usize {
    DEFAULTS.rules.line_length
}
