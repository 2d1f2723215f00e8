//! Publish dry run.
//!
//! The doc generator writes to `docs/` (served from the repository) while
//! the package manager expects `doc/`. The directory is exposed under the
//! packaging name only for the duration of the dry run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::ReleaseContext;
use crate::error::{ReleaseError, Result};
use crate::process::{CommandOutput, CommandRunner};

/// A directory temporarily moved to another name.
///
/// The original name is restored by [RenamedDir::restore] or, failing that,
/// when the guard is dropped.
#[derive(Debug)]
pub struct RenamedDir {
    original: PathBuf,
    renamed: PathBuf,
    restored: bool,
}

impl RenamedDir {
    /// Move `original` to `renamed`. Refuses to clobber an existing `renamed`.
    pub fn rename(original: impl Into<PathBuf>, renamed: impl Into<PathBuf>) -> Result<Self> {
        let original = original.into();
        let renamed = renamed.into();

        if renamed.exists() {
            return Err(ReleaseError::docs(format!(
                "Cannot rename {} to {}: target already exists",
                original.display(),
                renamed.display()
            )));
        }

        fs::rename(&original, &renamed)?;

        Ok(RenamedDir {
            original,
            renamed,
            restored: false,
        })
    }

    /// Current location of the directory
    pub fn path(&self) -> &Path {
        &self.renamed
    }

    /// Move the directory back, reporting any failure
    pub fn restore(mut self) -> Result<()> {
        self.restored = true;
        fs::rename(&self.renamed, &self.original)?;
        Ok(())
    }
}

impl Drop for RenamedDir {
    fn drop(&mut self) {
        if !self.restored {
            if let Err(e) = fs::rename(&self.renamed, &self.original) {
                crate::ui::display_error(&format!(
                    "Could not restore {} to {}: {}",
                    self.renamed.display(),
                    self.original.display(),
                    e
                ));
            }
        }
    }
}

/// Outcome of the publish dry run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// The package manager's validation report
    pub output: CommandOutput,
    /// Set when there was no docs directory to expose
    pub warning: Option<BoundaryWarning>,
}

/// Run the package manager's publish dry run with docs under the packaging name.
pub fn publish_dry_run(
    ctx: &ReleaseContext,
    config: &Config,
    runner: &dyn CommandRunner,
) -> Result<PublishReport> {
    let spec = config.publish.dry_run_spec()?;
    let docs = ctx.resolve(Path::new(&config.docs.output_dir));

    if !docs.is_dir() {
        let output = runner.run(&spec, &ctx.root)?;
        return Ok(PublishReport {
            output,
            warning: Some(BoundaryWarning::DocsDirectoryMissing {
                dir: config.docs.output_dir.clone(),
            }),
        });
    }

    let guard = RenamedDir::rename(docs, ctx.resolve(Path::new(&config.docs.publish_dir)))?;
    let output = runner.run(&spec, &ctx.root)?;
    guard.restore()?;

    Ok(PublishReport {
        output,
        warning: None,
    })
}
