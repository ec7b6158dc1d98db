//! Interactive prompts
//!
//! The init flow talks to the user only through [`Prompter`], so tests can
//! script the answers.

use dialoguer::{Confirm, Input, Select};
use trellis_core::{Error, Result};

/// Validation callback for free-text input
pub type Validator<'a> = &'a dyn Fn(&str) -> std::result::Result<(), String>;

/// Source of interactive answers
pub trait Prompter: Send + Sync {
    /// Yes/no question
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    /// Pick one of `items`, returning its index
    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize>;

    /// Free text, re-asked until `validate` accepts it
    fn input(&mut self, prompt: &str, default: Option<&str>, validate: Validator<'_>)
        -> Result<String>;
}

/// Terminal prompts backed by dialoguer
#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(Error::prompt)
    }

    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize> {
        Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
            .map_err(Error::prompt)
    }

    fn input(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        validate: Validator<'_>,
    ) -> Result<String> {
        let mut input = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .validate_with(|value: &String| validate(value));
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(Error::prompt)
    }
}
