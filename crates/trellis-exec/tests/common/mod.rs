//! Common test infrastructure for trellis-exec tests
//!
//! # Modules
//!
//! - `constants`: Package names, versions and manifest content
//! - `mock_registry`: Wiremock registry serving metadata and tarballs
//! - `loaders`: Command loaders that record instead of spawning processes

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod constants;
pub mod loaders;
pub mod mock_registry;

pub use constants::*;
pub use loaders::*;
pub use mock_registry::*;
