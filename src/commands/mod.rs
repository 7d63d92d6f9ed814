//! CLI command implementations.
//!
//! - **compare**: load each rater's results, analyze, print and export
//! - **init**: write a default `.concordance.toml`

pub mod compare;
pub mod init;

pub use compare::{run_compare, CompareConfig};
pub use init::{init_config, init_config_at};
