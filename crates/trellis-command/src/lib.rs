//! Command lifecycle for Trellis CLI
//!
//! Provides:
//! - The [`Command`] trait every dispatched command implements
//! - [`CommandRunner`], driving a command through its ordered stages
//! - Positional/options argument splitting
//! - Plugin loading: resolving an installed package's entry point to a runnable command

pub mod args;
pub mod lifecycle;
pub mod loader;
pub mod plugin;

pub use args::{split_args, CommandArgs, CommandOptions};
pub use lifecycle::{Command, CommandRunner, LifecycleStage};
pub use loader::{CommandLoader, ExternalCommand, LoadRequest, ProcessLoader};
pub use plugin::PluginArgs;
