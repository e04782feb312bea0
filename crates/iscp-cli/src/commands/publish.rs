use anyhow::Result;
use iscp_engine::Pipeline;

use super::{Context, system_publisher};

pub fn handle(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    let publisher = system_publisher(&config)?;

    let outcome = Pipeline::new(config, &ctx.workdir).publish(&publisher)?;

    if outcome.initialized {
        println!("✓ Initialized repository in {}", ctx.workdir.display());
    }
    if !outcome.committed {
        println!("  No changes to commit");
    }
    println!("✓ Project pushed to repository: {}", outcome.public_url);

    Ok(())
}
