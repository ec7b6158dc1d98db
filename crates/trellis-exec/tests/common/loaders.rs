//! Recording command loader
//!
//! Captures every load request and the arguments each loaded command was
//! initialized with, then reports which lifecycle methods ran.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use trellis_command::{Command, CommandArgs, CommandLoader, LoadRequest};
use trellis_core::Result;

#[derive(Debug, Default)]
pub struct LoadLog {
    pub requests: Vec<LoadRequest>,
    pub inits: Vec<CommandArgs>,
    pub execs: usize,
}

#[derive(Debug, Default, Clone)]
pub struct RecordingLoader {
    log: Arc<Mutex<LoadLog>>,
}

impl RecordingLoader {
    pub fn requests(&self) -> Vec<LoadRequest> {
        self.log.lock().unwrap().requests.clone()
    }

    pub fn inits(&self) -> Vec<CommandArgs> {
        self.log.lock().unwrap().inits.clone()
    }

    pub fn execs(&self) -> usize {
        self.log.lock().unwrap().execs
    }
}

impl CommandLoader for RecordingLoader {
    fn load(&self, request: &LoadRequest) -> Result<Box<dyn Command>> {
        self.log.lock().unwrap().requests.push(request.clone());
        Ok(Box::new(RecordingCommand {
            name: request.command_name.clone(),
            log: self.log.clone(),
        }))
    }
}

struct RecordingCommand {
    name: String,
    log: Arc<Mutex<LoadLog>>,
}

#[async_trait]
impl Command for RecordingCommand {
    fn name(&self) -> &str {
        &self.name
    }

    async fn init(&mut self, args: &CommandArgs) -> Result<()> {
        self.log.lock().unwrap().inits.push(args.clone());
        Ok(())
    }

    async fn exec(&mut self) -> Result<()> {
        self.log.lock().unwrap().execs += 1;
        Ok(())
    }
}
