use anyhow::Result;
use iscp_config::{Config, PROJECT_CONFIG_FILE};
use std::path::{Path, PathBuf};

use super::Context;

pub fn handle(ctx: &Context, user: Option<String>) -> Result<()> {
    let (path, config) = write_default(&ctx.workdir, user)?;

    println!("✓ Created {}", path.display());
    println!("  {}", token_hint(&config));

    Ok(())
}

fn token_hint(config: &Config) -> String {
    format!(
        "Export the access token as ${} before 'iscp run'",
        config.publish.token_env
    )
}

fn write_default(workdir: &Path, user: Option<String>) -> Result<(PathBuf, Config)> {
    let path = workdir.join(PROJECT_CONFIG_FILE);
    if path.exists() {
        anyhow::bail!("{} already exists in {}", PROJECT_CONFIG_FILE, workdir.display());
    }

    let mut config = Config::default();
    config.publish.user = user;
    config.save(&path)?;

    Ok((path, config))
}
