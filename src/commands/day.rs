use anyhow::Result;
use parishcal_core::event::parse_date;
use parishcal_core::grid::day_detail;

use crate::context::Context;
use crate::render::Render;

pub async fn run(ctx: &Context, date: &str) -> Result<()> {
    let date = parse_date(date)?;

    let store = ctx.open_store().await?;
    let detail = day_detail(date, store.events(), &ctx.viewer());

    println!("{}", detail.render());
    Ok(())
}
