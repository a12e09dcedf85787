//! Configuration loading and management for the Payroll Run Computation Engine.
//!
//! This module provides functionality to load the engine configuration from a
//! YAML file: batching limits for large runs and the rules applied when a run
//! is created.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll.yaml").unwrap().into_config();
//! println!("max concurrency: {}", config.batching.max_concurrency);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BatchConfig, DEFAULT_MAX_CONCURRENCY, DEFAULT_UPDATE_CHUNK_SIZE, EngineConfig, RunPolicy,
};
