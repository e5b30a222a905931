//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! across the ringfork tools.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`RINGFORK_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (`config.defaults.toml`, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! RINGFORK_<SECTION>_<KEY>=value
//!
//! Examples:
//!     RINGFORK_COMMON_LOG_LEVEL=debug
//!     RINGFORK_COMMON_SEED=42
//!     RINGFORK_SEARCH_VARIANT=rave
//!     RINGFORK_SEARCH_DEPTH_CAP=5
//!     RINGFORK_TIMING_TIME_DIVISOR=8
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;

#[cfg(test)]
mod tests;
