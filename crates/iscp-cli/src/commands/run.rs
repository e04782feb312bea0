use anyhow::Result;
use iscp_engine::{Pipeline, RunReport};

use super::{Context, system_publisher};

pub fn handle(ctx: &Context, skip_publish: bool, json: bool) -> Result<()> {
    let config = ctx.load_config()?;

    let report = if skip_publish {
        Pipeline::new(config, &ctx.workdir).package()?
    } else {
        let publisher = system_publisher(&config)?;
        Pipeline::new(config, &ctx.workdir).run(&publisher)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &RunReport) {
    println!(
        "✓ Masked {} rows ({} emails, {} phones)",
        report.masking.rows, report.masking.emails_masked, report.masking.phones_masked
    );
    for output in &report.outputs {
        println!("✓ Wrote {} ({} bytes)", output.path.display(), output.size_bytes);
    }
    println!("  Archive entries: {}", report.archive_entries.join(", "));

    if let Some(published) = &report.published {
        println!("✓ Project pushed to repository: {}", published.url);
        if !published.committed {
            println!("  No changes to commit; pushed existing history");
        }
    }
}
