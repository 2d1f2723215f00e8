use crate::config::Config;
use crate::domain::ReleaseContext;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;

/// Tag name for the release, e.g. "v1.2.1"
pub fn release_tag(ctx: &ReleaseContext, config: &Config) -> String {
    config.git.tag_pattern.render(ctx.new_version())
}

/// Fail if the release tag already exists locally
pub fn ensure_tag_absent(repo: &dyn Repository, tag: &str) -> Result<()> {
    if repo.tag_exists(tag)? {
        return Err(ReleaseError::tag(format!(
            "Tag '{}' already exists; was this version already released?",
            tag
        )));
    }
    Ok(())
}

/// Create the annotated release tag on HEAD and push it if asked.
pub fn add_tag(
    ctx: &ReleaseContext,
    config: &Config,
    repo: &dyn Repository,
    push: bool,
) -> Result<String> {
    let tag = release_tag(ctx, config);
    ensure_tag_absent(repo, &tag)?;

    let message = config.git.tag_message.render(ctx.new_version());
    repo.create_annotated_tag(&tag, &message)?;

    if push {
        repo.push_tags(&config.git.remote, &[tag.as_str()])?;
    }

    Ok(tag)
}
