//! Main release workflow orchestration logic
//!
//! Runs the stages in fixed order: bump, docs, tag, publish dry run. Any
//! failing stage stops the run; later stages never execute.

use crate::boundary::BoundaryWarning;
use crate::bump::{self, BumpReport};
use crate::config::Config;
use crate::docs::{self, DocsReport};
use crate::domain::ReleaseContext;
use crate::error::Result;
use crate::git::Repository;
use crate::preflight;
use crate::process::CommandRunner;
use crate::publish::{self, PublishReport};
use crate::tagger;
use crate::ui;

use super::plan::{build_plan, ReleasePlan};

/// Switches for a release run
///
/// Mirrors the CLI flags in a form usable without clap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOptions {
    /// Skip confirmation prompts
    pub force: bool,

    /// Preview mode - validate and print the plan only
    pub dry_run: bool,

    /// Push commits and the tag to the remote
    pub push: bool,

    /// Run the publish dry run stage
    pub publish: bool,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        ReleaseOptions {
            force: false,
            dry_run: false,
            push: true,
            publish: true,
        }
    }
}

/// Result of a completed release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseReport {
    pub bump: BumpReport,
    pub docs: DocsReport,
    pub tag: String,
    /// `None` when the publish stage was skipped
    pub publish: Option<PublishReport>,
    pub warnings: Vec<BoundaryWarning>,
}

/// How a release run ended without error
#[derive(Debug)]
pub enum ReleaseOutcome {
    Released(ReleaseReport),
    Planned(ReleasePlan),
    Cancelled,
}

/// Main release workflow
///
/// `confirm` is asked before continuing past boundary warnings and before
/// the first change is made, unless `force` or `dry_run` is set.
pub fn run_release(
    ctx: &ReleaseContext,
    config: &Config,
    repo: &dyn Repository,
    runner: &dyn CommandRunner,
    options: &ReleaseOptions,
    confirm: &mut dyn FnMut(&str) -> Result<bool>,
) -> Result<ReleaseOutcome> {
    let interactive = !options.force && !options.dry_run;

    let mut warnings = preflight::preflight(ctx, config, repo, runner, options.publish)?;
    for warning in &warnings {
        ui::display_boundary_warning(warning);
    }
    if interactive
        && warnings.iter().any(BoundaryWarning::needs_confirmation)
        && !confirm("Continue anyway?")?
    {
        return Ok(ReleaseOutcome::Cancelled);
    }

    if options.dry_run {
        return Ok(ReleaseOutcome::Planned(build_plan(ctx, config, options)?));
    }

    ui::display_release_header(ctx.old_version(), ctx.new_version());
    if interactive
        && !confirm(&format!(
            "Bump, tag and {}release {}?",
            if options.push { "push " } else { "" },
            ctx.new_version()
        ))?
    {
        return Ok(ReleaseOutcome::Cancelled);
    }

    ui::display_status(&format!(
        "Bumping version {} -> {}",
        ctx.old_version(),
        ctx.new_version()
    ));
    let bump = bump::bump_versions(ctx, config, repo, options.push)?;
    for (path, occurrences) in &bump.files {
        ui::display_success(&format!(
            "Updated {} ({} occurrence(s))",
            path.display(),
            occurrences
        ));
    }

    ui::display_status("Generating docs");
    let docs = docs::generate_docs(ctx, config, runner, repo, options.push)?;
    ui::display_command_output(&docs.analysis);
    if docs.commit.is_none() {
        ui::display_status("Docs unchanged, nothing to commit");
    } else {
        ui::display_success(&format!("Committed {}", config.docs.output_dir));
    }

    let tag = tagger::add_tag(ctx, config, repo, options.push)?;
    ui::display_success(&format!("Created tag {}", tag));

    let publish = if options.publish {
        ui::display_status("Running publish dry run");
        let report = publish::publish_dry_run(ctx, config, runner)?;
        ui::display_command_output(&report.output);
        if let Some(warning) = &report.warning {
            ui::display_boundary_warning(warning);
            warnings.push(warning.clone());
        }
        ui::display_success("Publish dry run passed");
        Some(report)
    } else {
        None
    };

    Ok(ReleaseOutcome::Released(ReleaseReport {
        bump,
        docs,
        tag,
        publish,
        warnings,
    }))
}
