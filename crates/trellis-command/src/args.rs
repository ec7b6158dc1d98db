//! Command argument splitting
//!
//! A command receives its arguments as a list whose last element, when it
//! is an object, carries the parsed flags. Everything before it is
//! positional.

use serde_json::{Map, Value};
use trellis_core::{Error, Result};

/// Parsed flags of a command invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOptions(Map<String, Value>);

impl CommandOptions {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Boolean flag, `false` when absent or not a boolean
    pub fn flag(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Compact JSON rendering
    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

/// Positional arguments plus options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandArgs {
    pub positionals: Vec<String>,
    pub options: CommandOptions,
}

impl CommandArgs {
    /// Positional argument at `index`
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    /// Rebuild the list form, options last
    pub fn to_argv(&self) -> Vec<Value> {
        let mut argv: Vec<Value> = self
            .positionals
            .iter()
            .cloned()
            .map(Value::String)
            .collect();
        argv.push(Value::Object(self.options.as_map().clone()));
        argv
    }
}

/// Split an argument list into positionals and trailing options
///
/// An empty list is rejected. When the last element is not an object every
/// element is positional and the options are empty.
pub fn split_args(mut argv: Vec<Value>) -> Result<CommandArgs> {
    if argv.is_empty() {
        return Err(Error::invalid_arguments("argument list must not be empty"));
    }

    let options = match argv.last() {
        Some(Value::Object(_)) => match argv.pop() {
            Some(Value::Object(map)) => CommandOptions::new(map),
            _ => CommandOptions::default(),
        },
        _ => CommandOptions::default(),
    };

    let positionals = argv.into_iter().map(positional_string).collect();
    Ok(CommandArgs {
        positionals,
        options,
    })
}

fn positional_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
