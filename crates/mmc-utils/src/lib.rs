//! Utilities shared by the tools built on the meta-model compiler.

mod config;

pub use config::{Analysis, Config, Package, CONFIG_FILE};
