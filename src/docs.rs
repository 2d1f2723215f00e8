use std::path::Path;

use crate::config::Config;
use crate::domain::ReleaseContext;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::process::{CommandOutput, CommandRunner};

/// Outcome of the docs stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsReport {
    /// What the analyzer reported
    pub analysis: CommandOutput,
    /// `None` when the generated output matched what was already committed
    pub commit: Option<String>,
}

/// Analyze the library, regenerate docs, then stage and commit the output.
///
/// Every command must exit zero.
pub fn generate_docs(
    ctx: &ReleaseContext,
    config: &Config,
    runner: &dyn CommandRunner,
    repo: &dyn Repository,
    push: bool,
) -> Result<DocsReport> {
    let analysis = runner.run(&config.docs.analyze_spec()?, &ctx.root)?;
    runner.run(&config.docs.generate_spec()?, &ctx.root)?;

    let output_dir = Path::new(&config.docs.output_dir);
    if !ctx.resolve(output_dir).is_dir() {
        return Err(ReleaseError::docs(format!(
            "Documentation generator did not produce '{}'",
            config.docs.output_dir
        )));
    }

    repo.stage_paths(&[output_dir])?;
    let commit = repo.commit(&config.git.docs_commit_message)?;

    if push {
        repo.push_current_branch(&config.git.remote)?;
    }

    Ok(DocsReport { analysis, commit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VersionToken;
    use crate::git::{GitOp, MockRepository};
    use crate::process::RecordingRunner;
    use std::fs;

    fn ctx(root: &Path) -> ReleaseContext {
        ReleaseContext::new(VersionToken::new("1.0.0", "1.0.1").unwrap(), root)
    }

    #[test]
    fn test_runs_analyzer_then_generator_then_commits() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        let runner = RecordingRunner::new().with_output(
            "flutter analyze --no-pub --no-current-package lib",
            "No issues found!",
            "",
        );
        let repo = MockRepository::new();

        let report =
            generate_docs(&ctx(dir.path()), &Config::default(), &runner, &repo, true).unwrap();
        assert_eq!(report.analysis.stdout, "No issues found!");

        assert_eq!(
            runner.commands(),
            vec![
                "flutter analyze --no-pub --no-current-package lib",
                "dartdoc --output docs",
            ]
        );
        assert_eq!(
            repo.ops(),
            vec![
                GitOp::Stage(vec!["docs".to_string()]),
                GitOp::Commit("Update docs".to_string()),
                GitOp::PushBranch("origin".to_string()),
            ]
        );
    }

    #[test]
    fn test_analyzer_failure_halts_before_generation() {
        let dir = tempfile::tempdir().unwrap();
        let runner =
            RecordingRunner::new().fail_on("flutter analyze --no-pub --no-current-package lib");
        let repo = MockRepository::new();

        let err = generate_docs(&ctx(dir.path()), &Config::default(), &runner, &repo, true)
            .unwrap_err();

        assert!(matches!(err, ReleaseError::CommandFailed { .. }));
        assert_eq!(runner.commands().len(), 1);
        assert!(repo.ops().is_empty());
    }

    #[test]
    fn test_missing_output_is_docs_error() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let repo = MockRepository::new();

        let err = generate_docs(&ctx(dir.path()), &Config::default(), &runner, &repo, false)
            .unwrap_err();
        assert!(matches!(err, ReleaseError::Docs(_)));
        assert!(repo.ops().is_empty());
    }
}
