use std::path::PathBuf;

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::context::Context;

pub async fn run(ctx: &Context, dir: Option<PathBuf>) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let store = ctx.open_store().await?;
    let artifact = store.export();
    let path = artifact.write_into(&dir)?;

    println!(
        "{}",
        format!(
            "  Wrote {} events to {}",
            artifact.events().len(),
            path.display()
        )
        .green()
    );
    Ok(())
}
