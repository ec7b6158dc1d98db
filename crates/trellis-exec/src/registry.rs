//! Command name to package mapping

use std::collections::BTreeMap;

/// Package implementing the `init` command
pub const INIT_PACKAGE: &str = "@trellis-cli/init";

/// Package the CLI itself is published as
pub const CORE_PACKAGE: &str = "@trellis-cli/core";

/// Fixed table of dynamically dispatched commands
///
/// Commands without an entry are built into the CLI.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: BTreeMap<String, String>,
}

impl CommandRegistry {
    /// The commands shipped as registry packages
    pub fn builtin() -> Self {
        Self::from_entries([("init", INIT_PACKAGE)])
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            commands: entries
                .into_iter()
                .map(|(name, package)| (name.to_string(), package.to_string()))
                .collect(),
        }
    }

    /// Package mapped to a command, if any
    pub fn lookup(&self, command: &str) -> Option<&str> {
        self.commands.get(command).map(String::as_str)
    }

    /// Mapped command names, sorted
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
