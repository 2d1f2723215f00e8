//! External command execution
//!
//! Every external tool (analyzer, doc generator, package manager) is run
//! through the [CommandRunner] trait so a failed step can halt the release
//! and so orchestration can be tested without the Flutter toolchain.
//!
//! - [SystemRunner]: spawns real processes and checks their exit status
//! - [mock::RecordingRunner]: records invocations and replays scripted results

pub mod mock;

pub use mock::RecordingRunner;

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ReleaseError, Result};

/// A program plus its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a shell-style command line into program and arguments.
    ///
    /// Quoting follows POSIX shell rules; no shell is ever spawned.
    pub fn parse(command_line: &str) -> Result<Self> {
        let words = shlex::split(command_line).ok_or_else(|| {
            ReleaseError::config(format!("Unbalanced quoting in command '{}'", command_line))
        })?;

        let mut words = words.into_iter();
        let program = words
            .next()
            .ok_or_else(|| ReleaseError::config("Command must not be empty"))?;

        Ok(CommandSpec {
            program,
            args: words.collect(),
        })
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured output of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs external commands to completion.
///
/// Implementations must return `Err(ReleaseError::CommandFailed)` for any
/// non-zero exit so callers can fail fast with `?`.
pub trait CommandRunner {
    /// Run `spec` with `cwd` as working directory, blocking until it exits
    fn run(&self, spec: &CommandSpec, cwd: &Path) -> Result<CommandOutput>;

    /// Ensure `program` can be spawned
    fn ensure_available(&self, program: &str) -> Result<()>;
}

/// Runner backed by `std::process::Command`
#[derive(Debug, Default, Clone)]
pub struct SystemRunner {
    verbose: bool,
}

impl SystemRunner {
    pub fn new(verbose: bool) -> Self {
        SystemRunner { verbose }
    }

    /// Resolve a program on PATH
    pub fn locate(program: &str) -> Result<PathBuf> {
        which::which(program).map_err(|_| ReleaseError::ToolNotFound {
            program: program.to_string(),
        })
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec, cwd: &Path) -> Result<CommandOutput> {
        if self.verbose {
            crate::ui::display_command(spec);
        }

        let output = Command::new(&spec.program)
            .args(&spec.args)
            .current_dir(cwd)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ReleaseError::ToolNotFound {
                        program: spec.program.clone(),
                    }
                } else {
                    ReleaseError::Io(e)
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ReleaseError::CommandFailed {
                command: spec.to_string(),
                status: output.status.to_string(),
                stdout,
                stderr,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }

    fn ensure_available(&self, program: &str) -> Result<()> {
        Self::locate(program).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_arguments() {
        let spec = CommandSpec::parse("flutter analyze --no-pub --no-current-package lib").unwrap();
        assert_eq!(spec.program, "flutter");
        assert_eq!(
            spec.args,
            vec!["analyze", "--no-pub", "--no-current-package", "lib"]
        );
    }

    #[test]
    fn test_parse_respects_quotes() {
        let spec = CommandSpec::parse(r#"dartdoc --output "my docs""#).unwrap();
        assert_eq!(spec.args, vec!["--output", "my docs"]);
    }

    #[test]
    fn test_parse_rejects_empty_and_unbalanced() {
        assert!(CommandSpec::parse("").is_err());
        assert!(CommandSpec::parse("dart 'pub").is_err());
    }

    #[test]
    fn test_display_joins_words() {
        let spec = CommandSpec::new("dart", ["pub", "publish", "--dry-run"]);
        assert_eq!(spec.to_string(), "dart pub publish --dry-run");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_non_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::new(false);
        let spec = CommandSpec::new("sh", ["-c", "echo out; echo err >&2; exit 3"]);

        let err = runner.run(&spec, dir.path()).unwrap_err();
        match err {
            ReleaseError::CommandFailed {
                command,
                stdout,
                stderr,
                ..
            } => {
                assert!(command.starts_with("sh -c"));
                assert_eq!(stdout.trim(), "out");
                assert_eq!(stderr.trim(), "err");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_runs_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let runner = SystemRunner::new(false);

        let output = runner
            .run(&CommandSpec::new("ls", Vec::<String>::new()), dir.path())
            .unwrap();
        assert!(output.stdout.contains("marker.txt"));
    }

    #[test]
    fn test_missing_program_is_tool_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::new(false);
        let spec = CommandSpec::new("definitely-not-a-real-tool-4821", Vec::<String>::new());

        assert!(matches!(
            runner.run(&spec, dir.path()),
            Err(ReleaseError::ToolNotFound { .. })
        ));
        assert!(runner
            .ensure_available("definitely-not-a-real-tool-4821")
            .is_err());
    }
}
