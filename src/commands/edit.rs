use anyhow::Result;
use owo_colors::OwoColorize;
use parishcal_core::{CalError, EventDraft};

use super::{EventArgs, finish_save};
use crate::context::Context;

pub async fn run(ctx: &Context, id: i64, args: EventArgs) -> Result<()> {
    ctx.require_admin()?;

    let mut store = ctx.open_store().await?;
    let current = store.get(id).ok_or(CalError::NotFound(id))?;
    let draft = args.apply_to(EventDraft::from(current));

    let event = store.update(id, draft)?;
    println!("{}", format!("  Updated: {}", event.title).yellow());

    finish_save(&mut store).await
}
