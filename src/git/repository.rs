use crate::error::{ReleaseError, Result};
use git2::{
    Cred, CredentialType, ErrorClass, ErrorCode, IndexAddOption, ObjectType, PushOptions,
    RemoteCallbacks, Repository as Git2Repo, Status, StatusOptions,
};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

/// libgit2 asks again after a rejected credential; give up after one retry.
const MAX_CREDENTIAL_ATTEMPTS: usize = 2;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Root of the working tree
    pub fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| ReleaseError::config("Bare repositories cannot be released"))
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(ReleaseError::remote("HEAD is detached, cannot push branch"));
        }
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::remote("Branch name is not valid UTF-8"))
    }

    fn push(&self, remote_name: &str, refspecs: &[String]) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| ReleaseError::remote(format!("No remote named '{}' found", remote_name)))?;

        let config = self.repo.config()?;
        let rejected: RefCell<Vec<String>> = RefCell::new(Vec::new());
        let attempts = Cell::new(0);
        let refspec_strs: Vec<&str> = refspecs.iter().map(String::as_str).collect();

        let pushed = {
            let mut callbacks = RemoteCallbacks::new();
            callbacks.credentials(|url, username_from_url, allowed_types| {
                let attempt = next_credential_attempt(&attempts, url)?;
                credentials(&config, url, username_from_url, allowed_types, attempt > 0)
            });
            callbacks.push_update_reference(|refname, status| {
                if let Some(status) = status {
                    rejected
                        .borrow_mut()
                        .push(format!("{}: {}", refname, status));
                }
                Ok(())
            });

            let mut push_options = PushOptions::new();
            push_options.remote_callbacks(callbacks);
            remote.push(&refspec_strs, Some(&mut push_options))
        };

        pushed.map_err(|e| match e.class() {
            ErrorClass::Net => ReleaseError::remote(format!("Network error during push: {}", e)),
            ErrorClass::Reference => {
                ReleaseError::remote(format!("Reference error during push: {}", e))
            }
            _ => ReleaseError::remote(format!("Push to '{}' failed: {}", remote_name, e)),
        })?;

        let rejected = rejected.into_inner();
        if !rejected.is_empty() {
            return Err(ReleaseError::remote(format!(
                "Remote '{}' rejected: {}",
                remote_name,
                rejected.join(", ")
            )));
        }

        Ok(())
    }
}

/// Count a credential request, failing once the retry budget is spent.
fn next_credential_attempt(
    attempts: &Cell<usize>,
    url: &str,
) -> std::result::Result<usize, git2::Error> {
    let attempt = attempts.get();
    if attempt >= MAX_CREDENTIAL_ATTEMPTS {
        return Err(git2::Error::new(
            ErrorCode::Auth,
            ErrorClass::Callback,
            format!("authentication to {} failed after {} attempts", url, attempt),
        ));
    }
    attempts.set(attempt + 1);
    Ok(attempt)
}

/// Resolve push credentials from SSH keys, the SSH agent or git credential helpers.
///
/// On a retry the agent is skipped.
fn credentials(
    config: &git2::Config,
    url: &str,
    username_from_url: Option<&str>,
    allowed_types: CredentialType,
    retry: bool,
) -> std::result::Result<Cred, git2::Error> {
    let username = username_from_url.unwrap_or("git");

    if allowed_types.contains(CredentialType::SSH_KEY) {
        if !retry {
            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        if let Some(home) = dirs::home_dir() {
            for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                let path = home.join(".ssh").join(key);
                if path.exists() {
                    if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                        return Ok(cred);
                    }
                }
            }
        }
    }

    if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
        if let Ok(cred) = Cred::credential_helper(config, url, username_from_url) {
            return Ok(cred);
        }
    }

    Cred::default()
}

impl super::Repository for Git2Repository {
    fn stage_paths(&self, paths: &[&Path]) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(paths.iter().copied(), IndexAddOption::DEFAULT, None)?;
        // add_all skips removed files
        index.update_all(paths.iter().copied(), None)?;
        index.write()?;

        Ok(())
    }

    fn commit(&self, message: &str) -> Result<Option<String>> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                None
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(parent) = &parent {
            if parent.tree_id() == tree_id {
                return Ok(None);
            }
        }

        let signature = self.repo.signature()?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        Ok(Some(oid.to_string()))
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(ReleaseError::tag(format!(
                "Cannot look up tag '{}': {}",
                name, e
            ))),
        }
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let target = self.repo.head()?.peel(ObjectType::Commit)?;
        let signature = self.repo.signature()?;

        self.repo
            .tag(name, &target, &signature, message, false)
            .map_err(|e| {
                if e.code() == ErrorCode::Exists {
                    ReleaseError::tag(format!("Tag '{}' already exists", name))
                } else {
                    ReleaseError::tag(format!("Cannot create tag '{}': {}", name, e))
                }
            })?;

        Ok(())
    }

    fn push_current_branch(&self, remote: &str) -> Result<()> {
        let branch = self.current_branch()?;
        self.push(remote, &[format!("refs/heads/{0}:refs/heads/{0}", branch)])
    }

    fn push_tags(&self, remote: &str, tag_names: &[&str]) -> Result<()> {
        let refspecs: Vec<String> = tag_names
            .iter()
            .map(|tag| format!("refs/tags/{0}:refs/tags/{0}", tag))
            .collect();
        self.push(remote, &refspecs)
    }

    fn dirty_paths(&self) -> Result<Vec<String>> {
        let mut options = StatusOptions::new();
        options.include_untracked(true).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;

        Ok(statuses
            .iter()
            .filter(|entry| entry.status() != Status::CURRENT)
            .filter(|entry| !entry.status().contains(Status::IGNORED))
            .filter_map(|entry| entry.path().map(str::to_string))
            .collect())
    }
}
