use anyhow::Result;
use owo_colors::OwoColorize;
use parishcal_core::EventDraft;

use super::{EventArgs, finish_save};
use crate::context::Context;

pub async fn run(ctx: &Context, args: EventArgs) -> Result<()> {
    ctx.require_admin()?;

    let mut store = ctx.open_store().await?;
    let event = store.create(args.apply_to(EventDraft::default()))?;

    println!(
        "{}",
        format!(
            "  Created: {} on {} (id {})",
            event.title,
            event.date.format("%a %b %-d, %Y"),
            event.id
        )
        .green()
    );

    finish_save(&mut store).await
}
