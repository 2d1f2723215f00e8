use std::fmt;

use crate::bump::{self, FileEdit};
use crate::config::Config;
use crate::domain::ReleaseContext;
use crate::error::Result;
use crate::process::CommandSpec;
use crate::tagger;

use super::orchestration::ReleaseOptions;

/// One externally visible action of a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    Stage(Vec<String>),
    Commit(String),
    PushBranch(String),
    Run(CommandSpec),
    Tag { name: String, message: String },
    PushTag { remote: String, tag: String },
    Rename { from: String, to: String },
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStep::Stage(paths) => write!(f, "stage {}", paths.join(" ")),
            PlanStep::Commit(message) => write!(f, "commit \"{}\"", message),
            PlanStep::PushBranch(remote) => write!(f, "push current branch to {}", remote),
            PlanStep::Run(spec) => write!(f, "run `{}`", spec),
            PlanStep::Tag { name, message } => {
                write!(f, "create annotated tag {} (\"{}\")", name, message)
            }
            PlanStep::PushTag { remote, tag } => write!(f, "push tag {} to {}", tag, remote),
            PlanStep::Rename { from, to } => write!(f, "rename {} -> {}", from, to),
        }
    }
}

/// Everything a release would do, with file edits already validated
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    pub edits: Vec<FileEdit>,
    pub steps: Vec<PlanStep>,
}

/// Build the plan for a release. Fails exactly when a real run would fail
/// its version-substring preconditions.
pub fn build_plan(
    ctx: &ReleaseContext,
    config: &Config,
    options: &ReleaseOptions,
) -> Result<ReleasePlan> {
    let edits = bump::plan(ctx, &config.targets)?;
    let git = &config.git;
    let mut steps = Vec::new();

    steps.push(PlanStep::Stage(
        edits
            .iter()
            .map(|e| e.relative.display().to_string())
            .collect(),
    ));
    steps.push(PlanStep::Commit(
        git.bump_commit_message.render(ctx.new_version()),
    ));
    if options.push {
        steps.push(PlanStep::PushBranch(git.remote.clone()));
    }

    steps.push(PlanStep::Run(config.docs.analyze_spec()?));
    steps.push(PlanStep::Run(config.docs.generate_spec()?));
    steps.push(PlanStep::Stage(vec![config.docs.output_dir.clone()]));
    steps.push(PlanStep::Commit(git.docs_commit_message.clone()));
    if options.push {
        steps.push(PlanStep::PushBranch(git.remote.clone()));
    }

    let tag = tagger::release_tag(ctx, config);
    steps.push(PlanStep::Tag {
        name: tag.clone(),
        message: git.tag_message.render(ctx.new_version()),
    });
    if options.push {
        steps.push(PlanStep::PushTag {
            remote: git.remote.clone(),
            tag,
        });
    }

    if options.publish {
        let rename = |from: &str, to: &str| PlanStep::Rename {
            from: from.to_string(),
            to: to.to_string(),
        };
        steps.push(rename(&config.docs.output_dir, &config.docs.publish_dir));
        steps.push(PlanStep::Run(config.publish.dry_run_spec()?));
        steps.push(rename(&config.docs.publish_dir, &config.docs.output_dir));
    }

    Ok(ReleasePlan { edits, steps })
}
