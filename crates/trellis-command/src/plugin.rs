//! Plugin-side argument handling
//!
//! A plugin executable is started by the host as
//! `<entry> [positionals...] --options <json>`. [`PluginArgs`] parses that
//! command line back into the argument list a [`crate::CommandRunner`]
//! expects.

use clap::Parser;
use serde_json::Value;
use trellis_core::{Error, Result};

/// Command line of a plugin process
#[derive(Debug, Clone, Parser)]
#[command(about = "Trellis command plugin", disable_version_flag = true)]
pub struct PluginArgs {
    /// Positional arguments forwarded by the host
    pub positionals: Vec<String>,

    /// Parsed flags as a JSON object
    #[arg(long, default_value = "{}")]
    pub options: String,
}

impl PluginArgs {
    /// Rebuild the argument list, options object last
    pub fn into_argv(self) -> Result<Vec<Value>> {
        let options: Value = serde_json::from_str(&self.options)?;
        if !options.is_object() {
            return Err(Error::invalid_arguments(format!(
                "--options must be a JSON object, got {}",
                self.options
            )));
        }

        let mut argv: Vec<Value> = self.positionals.into_iter().map(Value::String).collect();
        argv.push(options);
        Ok(argv)
    }
}
