//! Tests for the configuration module.

use std::io::Write;

use super::*;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.common.seed, None);
    assert_eq!(config.search.variant, "full");
    assert_eq!(config.timing.time_divisor, 10);
    assert_eq!(config.rules.line_length, 4);
}

#[test]
fn test_search_defaults() {
    let config = CentralConfig::default();
    assert!((config.search.exploration_constant - 1.41).abs() < f64::EPSILON);
    assert!((config.search.decision_exploration - 0.7).abs() < f64::EPSILON);
    assert!(config.search.rave_bias.abs() < f64::EPSILON);
    assert_eq!(config.search.target_depth, 3);
    assert_eq!(config.search.depth_cap, 3);
    assert_eq!(config.search.rollouts_per_leaf, 1);
    assert!((config.search.epsilon - 0.1).abs() < f64::EPSILON);
    assert_eq!(config.search.max_rollout_plies, 0);
    assert_eq!(config.search.max_iterations, 0);
    assert!(config.search.immediate_checks);
}

#[test]
fn test_timing_defaults() {
    let config = CentralConfig::default();
    assert!((config.timing.overrun_factor - 2.0).abs() < f64::EPSILON);
    assert_eq!(config.timing.default_budget_ms, 1000);
}

#[test]
fn test_ringfork_env_overrides() {
    std::env::set_var("RINGFORK_SEARCH_DEPTH_CAP", "6");
    std::env::set_var("RINGFORK_COMMON_SEED", "1234");
    std::env::set_var("RINGFORK_TIMING_OVERRUN_FACTOR", "3.5");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.search.depth_cap, 6);
    assert_eq!(config.common.seed, Some(1234));
    assert!((config.timing.overrun_factor - 3.5).abs() < f64::EPSILON);

    std::env::remove_var("RINGFORK_SEARCH_DEPTH_CAP");
    std::env::remove_var("RINGFORK_COMMON_SEED");
    std::env::remove_var("RINGFORK_TIMING_OVERRUN_FACTOR");
}

#[test]
fn test_unparseable_env_override_is_ignored() {
    std::env::set_var("RINGFORK_SEARCH_ROLLOUTS_PER_LEAF", "lots");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.search.rollouts_per_leaf, 1);

    std::env::remove_var("RINGFORK_SEARCH_ROLLOUTS_PER_LEAF");
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
log_level = "debug"
seed = 7

[search]
variant = "rave"
depth_cap = 5
epsilon = 0.25

[timing]
time_divisor = 8
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.log_level, "debug");
    assert_eq!(config.common.seed, Some(7));
    assert_eq!(config.search.variant, "rave");
    assert_eq!(config.search.depth_cap, 5);
    assert!((config.search.epsilon - 0.25).abs() < f64::EPSILON);
    assert_eq!(config.timing.time_divisor, 8);
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[search]
rollouts_per_leaf = 4
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.search.rollouts_per_leaf, 4);
    assert_eq!(config.search.target_depth, 3); // Default
    assert_eq!(config.common.log_level, "info"); // Default
    assert_eq!(config.rules.line_length, 4); // Default
}

#[test]
fn test_load_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[rules]\nline_length = 5\n\n[search]\nmax_iterations = 500").unwrap();

    let config = load_from_path(file.path());
    assert_eq!(config.rules.line_length, 5);
    assert_eq!(config.search.max_iterations, 500);
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[search\nthis is not toml").unwrap();

    let config = load_from_path(file.path());
    assert_eq!(config.search.variant, "full");
    assert_eq!(config.search.target_depth, 3);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_from_path(&dir.path().join("absent.toml"));
    assert_eq!(config.timing.time_divisor, 10);
}

#[test]
fn test_config_clone() {
    let config = CentralConfig::default();
    let cloned = config.clone();
    assert_eq!(config.search.variant, cloned.search.variant);
    assert_eq!(config.rules.line_length, cloned.rules.line_length);
}
