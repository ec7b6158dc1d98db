//! Command implementations

pub mod exec;
pub mod prepare;
pub mod version;
