//! # trellis-core
//!
//! Core library for the Trellis CLI providing:
//! - The shared error taxonomy used by every crate
//! - Immutable CLI configuration built from defaults, files and environment
//! - Path helpers for the user home and package locations

pub mod config;
pub mod error;
pub mod utils;

pub use config::{CliConfig, ConfigLoader, DEFAULT_REGISTRY, MIRROR_REGISTRY};
pub use error::{Error, Result};
pub use utils::{format_path, get_home_dir};

/// Current CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
