use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::ReleaseContext;
use crate::error::Result;
use crate::git::Repository;
use crate::process::CommandRunner;
use crate::tagger;

/// Checks run before any file is touched.
///
/// Hard failures (missing tool, existing tag) are returned as errors; softer
/// conditions come back as warnings for the caller to confirm.
pub fn preflight(
    ctx: &ReleaseContext,
    config: &Config,
    repo: &dyn Repository,
    runner: &dyn CommandRunner,
    include_publish: bool,
) -> Result<Vec<BoundaryWarning>> {
    for spec in &config.command_specs(include_publish)? {
        runner.ensure_available(&spec.program)?;
    }

    tagger::ensure_tag_absent(repo, &tagger::release_tag(ctx, config))?;

    let mut warnings = Vec::new();

    let dirty = repo.dirty_paths()?;
    if !dirty.is_empty() {
        warnings.push(BoundaryWarning::DirtyWorkingTree { paths: dirty });
    }

    if ctx.token.is_regression() {
        warnings.push(BoundaryWarning::VersionNotIncreasing {
            old: ctx.old_version().to_string(),
            new: ctx.new_version().to_string(),
        });
    }

    Ok(warnings)
}
