use anyhow::Result;
use chrono::Local;
use parishcal_core::grid::{YearMonth, render_month};

use crate::context::Context;
use crate::render::Render;

pub async fn run(ctx: &Context, month: Option<String>) -> Result<()> {
    let month = match month {
        Some(m) => m.parse::<YearMonth>()?,
        None => YearMonth::of(Local::now().date_naive()),
    };

    let store = ctx.open_store().await?;
    let grid = render_month(month, store.events(), &ctx.viewer());

    println!("{}", grid.render());
    Ok(())
}
