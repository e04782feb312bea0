use std::path::PathBuf;

use iscp_security::{RedactionInfo, Redactor};

use crate::error::{Result, VcsError};
use crate::remote::RemoteSpec;
use crate::runner::{CommandOutput, CommandRunner, CommandSpec};

/// Everything needed to publish a working directory
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub workdir: PathBuf,
    pub remote: RemoteSpec,
    pub remote_name: String,
    pub branch: String,
    pub commit_message: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// A new repository was created
    pub initialized: bool,
    /// A commit was created (false when the tree was clean)
    pub committed: bool,
    pub remote_added: bool,
    pub public_url: String,
}

/// Drives the git command-line client. Every invocation is checked; the
/// first non-zero exit aborts the sequence.
pub struct GitClient<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> GitClient<R> {
    pub fn new(runner: R) -> Self {
        Self::with_program(runner, "git")
    }

    pub fn with_program(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    /// init (if needed), add, commit (if dirty), set remote, force-push
    pub fn publish(&self, request: &PublishRequest) -> Result<PublishOutcome> {
        let redactor = Redactor::new().with_secret(request.token.as_str());
        let git = |args: &[&str]| self.git(request, &redactor, args);

        let initialized = !request.workdir.join(".git").exists();
        if initialized {
            git(&["init"])?;
            git(&["branch", "-M", &request.branch])?;
            tracing::info!(workdir = %request.workdir.display(), "Initialized git repository");
        }

        git(&["add", "."])?;

        let status = git(&["status", "--porcelain"])?;
        let committed = !status.stdout.trim().is_empty();
        if committed {
            git(&["commit", "-m", &request.commit_message])?;
        } else {
            tracing::info!("Working tree clean, skipping commit");
        }

        let remote_url = request.remote.authenticated_url(&request.token);
        let remotes = git(&["remote"])?;
        let remote_added = !remotes
            .stdout
            .lines()
            .any(|name| name.trim() == request.remote_name);
        if remote_added {
            git(&["remote", "add", &request.remote_name, &remote_url])?;
        } else {
            git(&["remote", "set-url", &request.remote_name, &remote_url])?;
        }

        git(&["push", "-u", &request.remote_name, &request.branch, "--force"])?;

        let public_url = request.remote.public_url();
        tracing::info!(url = %public_url, branch = %request.branch, "Pushed to remote");

        Ok(PublishOutcome {
            initialized,
            committed,
            remote_added,
            public_url,
        })
    }

    fn git(&self, request: &PublishRequest, redactor: &Redactor, args: &[&str]) -> Result<CommandOutput> {
        let spec = CommandSpec::new(self.program.as_str(), &request.workdir).args(args.iter().copied());
        let (command, redactions) = redactor.redact("command", &spec.display());

        tracing::debug!(command = %command, redacted = redacted_count(&redactions), "Running");
        let output = self.runner.run(&spec)?;

        if !output.success() {
            let (stderr, redactions) = redactor.redact("stderr", output.stderr.trim());
            tracing::debug!(redacted = redacted_count(&redactions), "Command failed");
            return Err(VcsError::CommandFailed {
                command,
                code: output.code,
                stderr,
            });
        }

        Ok(output)
    }
}

fn redacted_count(redactions: &[RedactionInfo]) -> usize {
    redactions.iter().map(|r| r.count).sum()
}
