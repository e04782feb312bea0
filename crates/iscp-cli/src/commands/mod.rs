pub mod completions;
pub mod init;
pub mod mask;
pub mod publish;
pub mod run;

use anyhow::{Context as _, Result};
use iscp_config::Config;
use iscp_engine::Publisher;
use iscp_vcs::{GitClient, SystemRunner};
use std::path::PathBuf;

/// Resolved global options
pub struct Context {
    pub workdir: PathBuf,
    pub config_path: Option<PathBuf>,
}

impl Context {
    pub fn new(workdir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self> {
        let workdir = match workdir {
            Some(dir) => std::fs::canonicalize(&dir)
                .with_context(|| format!("Working directory not found: {}", dir.display()))?,
            None => std::env::current_dir()?,
        };
        Ok(Self {
            workdir,
            config_path,
        })
    }

    pub fn load_config(&self) -> Result<Config> {
        let config = match &self.config_path {
            Some(path) => Config::load(&iscp_config::resolve(&self.workdir, path))?,
            None => Config::find_and_load(&self.workdir)?,
        };
        Ok(config)
    }
}

/// Check publish prerequisites (user, token, git binary) before anything
/// is written, so a misconfigured run fails without side effects.
pub fn system_publisher(config: &Config) -> Result<Publisher<SystemRunner>> {
    config.publish.user()?;
    let token = config.publish.token()?;
    let git = SystemRunner::locate("git")?;

    tracing::debug!(git = %git.display(), "Using git");
    Ok(Publisher::new(
        GitClient::with_program(SystemRunner, git.to_string_lossy()),
        token,
    ))
}
