use anyhow::Result;
use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;

use crate::context::Context;
use crate::render::render_event;

pub async fn run(ctx: &Context) -> Result<()> {
    let today = Local::now().date_naive();
    let store = ctx.open_store().await?;
    let events = store.events().upcoming(today);

    if events.is_empty() {
        println!("{}", "No events scheduled at this time.".dimmed());
        return Ok(());
    }

    let mut current_date: Option<NaiveDate> = None;

    for event in events {
        if current_date != Some(event.date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", format_date_label(event.date, today).bold());
            current_date = Some(event.date);
        }

        for line in render_event(event) {
            println!("{}", line);
        }
    }

    Ok(())
}

/// e.g. "Today", "Tomorrow", "Sunday, March 9"
fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%A, %B %-d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_label() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        assert_eq!(format_date_label(today, today), "Today");
        assert_eq!(format_date_label(today.succ_opt().unwrap(), today), "Tomorrow");
        assert_eq!(
            format_date_label(NaiveDate::from_ymd_opt(2025, 3, 16).unwrap(), today),
            "Sunday, March 16"
        );
    }
}
