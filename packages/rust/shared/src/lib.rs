//! Shared types, error model, and configuration for catchlog.
//!
//! This crate is the foundation depended on by the reporter and the CLI.
//! It provides:
//! - [`CatchlogError`]: the unified error type
//! - Domain types ([`ClusterSummary`], [`Catchword`], [`PipelineSnapshot`])
//! - Configuration ([`AppConfig`], [`OutputConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, OutputConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{CatchlogError, Result};
pub use types::{Catchword, ClusterSummary, PipelineSnapshot, SLAB_SIZE, TopicSnapshot};
