//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a crate directory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by RINGFORK_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var("RINGFORK_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from RINGFORK_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "RINGFORK_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// Unreadable or malformed files fall back to the built-in defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, f64, bool, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = v,
            Ok(Err(_)) => warn!("Ignoring unparseable {}", $key),
            Err(_) => {}
        }
    };
    // Optional parseable field (Option<u64>, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = Some(v),
            Ok(Err(_)) => warn!("Ignoring unparseable {}", $key),
            Err(_) => {}
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: RINGFORK_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "RINGFORK_COMMON_LOG_LEVEL");
    env_override!(config, common.seed, "RINGFORK_COMMON_SEED", optional_parse);

    // Search
    env_override!(config, search.variant, "RINGFORK_SEARCH_VARIANT");
    env_override!(
        config,
        search.exploration_constant,
        "RINGFORK_SEARCH_EXPLORATION_CONSTANT",
        parse
    );
    env_override!(
        config,
        search.decision_exploration,
        "RINGFORK_SEARCH_DECISION_EXPLORATION",
        parse
    );
    env_override!(config, search.rave_bias, "RINGFORK_SEARCH_RAVE_BIAS", parse);
    env_override!(
        config,
        search.target_depth,
        "RINGFORK_SEARCH_TARGET_DEPTH",
        parse
    );
    env_override!(config, search.depth_cap, "RINGFORK_SEARCH_DEPTH_CAP", parse);
    env_override!(
        config,
        search.rollouts_per_leaf,
        "RINGFORK_SEARCH_ROLLOUTS_PER_LEAF",
        parse
    );
    env_override!(config, search.epsilon, "RINGFORK_SEARCH_EPSILON", parse);
    env_override!(
        config,
        search.max_rollout_plies,
        "RINGFORK_SEARCH_MAX_ROLLOUT_PLIES",
        parse
    );
    env_override!(
        config,
        search.max_iterations,
        "RINGFORK_SEARCH_MAX_ITERATIONS",
        parse
    );
    env_override!(
        config,
        search.immediate_checks,
        "RINGFORK_SEARCH_IMMEDIATE_CHECKS",
        parse
    );

    // Timing
    env_override!(
        config,
        timing.time_divisor,
        "RINGFORK_TIMING_TIME_DIVISOR",
        parse
    );
    env_override!(
        config,
        timing.overrun_factor,
        "RINGFORK_TIMING_OVERRUN_FACTOR",
        parse
    );
    env_override!(
        config,
        timing.default_budget_ms,
        "RINGFORK_TIMING_DEFAULT_BUDGET_MS",
        parse
    );

    // Rules
    env_override!(
        config,
        rules.line_length,
        "RINGFORK_RULES_LINE_LENGTH",
        parse
    );

    config
}
