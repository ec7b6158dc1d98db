//! Common test infrastructure for trellis-package tests
//!
//! # Modules
//!
//! - `constants`: Package names, versions and fixture content
//! - `mock_registry`: Wiremock helpers serving registry metadata and tarballs
//! - `fakes`: In-memory version sources and counting installers

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod constants;
pub mod fakes;
pub mod mock_registry;

pub use constants::*;
pub use fakes::*;
pub use mock_registry::*;
