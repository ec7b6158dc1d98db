//! Scripted prompter

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use trellis_core::{Error, Result};
use trellis_init::Prompter;
use trellis_init::prompt::Validator;

#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Confirm(bool),
    Select(usize),
    Input(&'static str),
}

/// Replays answers in order and records every prompt shown
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: Arc<Mutex<VecDeque<Answer>>>,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into())),
            asked: Arc::default(),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }

    fn next(&self, prompt: &str) -> Result<Answer> {
        self.asked.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::prompt(format!("no scripted answer for '{}'", prompt)))
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool> {
        match self.next(prompt)? {
            Answer::Confirm(value) => Ok(value),
            other => Err(Error::prompt(format!("expected confirm, scripted {:?}", other))),
        }
    }

    fn select(&mut self, prompt: &str, _items: &[String], _default: usize) -> Result<usize> {
        match self.next(prompt)? {
            Answer::Select(index) => Ok(index),
            other => Err(Error::prompt(format!("expected select, scripted {:?}", other))),
        }
    }

    fn input(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        validate: Validator<'_>,
    ) -> Result<String> {
        let value = match self.next(prompt)? {
            Answer::Input("") => default.unwrap_or_default().to_string(),
            Answer::Input(value) => value.to_string(),
            other => return Err(Error::prompt(format!("expected input, scripted {:?}", other))),
        };
        validate(value.as_str()).map_err(Error::prompt)?;
        Ok(value)
    }
}
