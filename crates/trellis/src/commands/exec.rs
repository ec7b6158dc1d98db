//! Dispatch of registry-backed commands

use anyhow::Result;
use serde_json::Value;
use tracing::debug;
use trellis_core::CliConfig;
use trellis_exec::{DispatchOutcome, Dispatcher};

use crate::output;

pub async fn run(config: CliConfig, command: &str, argv: Vec<Value>) -> Result<()> {
    let dispatcher = Dispatcher::new(config)?;

    match dispatcher.run(command, argv).await? {
        DispatchOutcome::NotMapped => {
            debug!("'{}' is handled by the CLI itself", command);
        }
        DispatchOutcome::Unavailable => {
            output::warning(&format!("Command '{}' is not available", command));
        }
        DispatchOutcome::Executed { package, version } => {
            debug!("{} ran {}@{}", command, package, version);
        }
    }

    Ok(())
}
