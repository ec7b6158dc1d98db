//! Common test infrastructure for trellis-init tests
//!
//! # Modules
//!
//! - `prompter`: Scripted answers for the interactive flow
//! - `mock_api`: Wiremock catalogue and registry endpoints

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_api;
pub mod prompter;

pub use mock_api::*;
pub use prompter::*;
