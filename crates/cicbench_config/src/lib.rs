//! Parsing and validation of `bench.toml` testbench configuration files.
//!
//! This crate reads the bench configuration and produces a strongly-typed
//! [`BenchConfig`], then resolves it into a [`ResolvedBench`] with parsed
//! clock frequency, filter orders, and an absolute stimulus fixture path.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{find_bench_root, load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{
    resolve_bench, ResolvedBench, ResolvedLoopback, ResolvedScenario, ResolvedStimulus,
    ResolvedSweep,
};
pub use types::*;
