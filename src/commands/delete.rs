use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use super::finish_save;
use crate::context::Context;

pub async fn run(ctx: &Context, id: i64, yes: bool) -> Result<()> {
    ctx.require_admin()?;

    let mut store = ctx.open_store().await?;
    let Some(event) = store.get(id).cloned() else {
        println!("{}", format!("  No event with id {}", id).dimmed());
        return Ok(());
    };

    let confirmed = yes
        || Confirm::new()
            .with_prompt(format!("  Delete \"{}\" on {}?", event.title, event.date))
            .default(false)
            .interact()?;
    if !confirmed {
        return Ok(());
    }

    store.delete(id);
    println!("{}", format!("  Deleted: {}", event.title).red());

    finish_save(&mut store).await
}
