use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};
use crate::process::{CommandOutput, CommandRunner, CommandSpec};

type Hook = Box<dyn Fn(&Path)>;

/// Mock runner for testing without spawning processes
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<(CommandSpec, PathBuf)>>,
    failing: HashSet<String>,
    missing: HashSet<String>,
    hooks: HashMap<String, Hook>,
    outputs: HashMap<String, CommandOutput>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every command whose rendered line equals `command` exit non-zero
    pub fn fail_on(mut self, command: impl Into<String>) -> Self {
        self.failing.insert(command.into());
        self
    }

    /// Report `program` as absent from PATH
    pub fn without_program(mut self, program: impl Into<String>) -> Self {
        self.missing.insert(program.into());
        self
    }

    /// Run `hook` with the working directory when `command` is invoked
    pub fn on_run(mut self, command: impl Into<String>, hook: impl Fn(&Path) + 'static) -> Self {
        self.hooks.insert(command.into(), Box::new(hook));
        self
    }

    /// Reply to `command` with the given output when it succeeds
    pub fn with_output(
        mut self,
        command: impl Into<String>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        self.outputs.insert(
            command.into(),
            CommandOutput {
                stdout: stdout.into(),
                stderr: stderr.into(),
            },
        );
        self
    }

    /// Rendered command lines in invocation order
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(spec, _)| spec.to_string())
            .collect()
    }

    /// Working directories in invocation order
    pub fn directories(&self) -> Vec<PathBuf> {
        self.calls
            .borrow()
            .iter()
            .map(|(_, cwd)| cwd.clone())
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec, cwd: &Path) -> Result<CommandOutput> {
        let line = spec.to_string();
        self.calls
            .borrow_mut()
            .push((spec.clone(), cwd.to_path_buf()));

        if let Some(hook) = self.hooks.get(&line) {
            hook(cwd);
        }

        if self.failing.contains(&line) {
            return Err(ReleaseError::CommandFailed {
                command: line,
                status: "exit status: 1".to_string(),
                stdout: String::new(),
                stderr: "scripted failure".to_string(),
            });
        }

        Ok(self.outputs.get(&line).cloned().unwrap_or_default())
    }

    fn ensure_available(&self, program: &str) -> Result<()> {
        if self.missing.contains(program) {
            Err(ReleaseError::ToolNotFound {
                program: program.to_string(),
            })
        } else {
            Ok(())
        }
    }
}
