//! Terminal rendering for the calendar view models.
//!
//! Extension traits that draw parishcal-core types with owo_colors.
//! Padding is applied before coloring so ANSI codes don't skew columns.

use owo_colors::OwoColorize;
use parishcal_core::grid::{
    Cell, DayCell, DayDetail, EventAction, EventIndicator, MAX_INDICATORS, MonthGrid,
    ParishWeekBanner, WEEKDAY_HEADERS, WeekRow,
};
use parishcal_core::{CalError, Event, EventType};

/// Width of one day column, not counting the separator.
const CELL_WIDTH: usize = 14;

pub trait Render {
    fn render(&self) -> String;
}

/// Color `text` by event type.
fn paint(kind: EventType, text: &str) -> String {
    match kind {
        EventType::Service => text.blue().to_string(),
        EventType::Fellowship => text.green().to_string(),
        EventType::ParishGroups => text.magenta().to_string(),
        EventType::ParishWeek => text.yellow().to_string(),
        EventType::Special => text.cyan().to_string(),
    }
}

/// Pad or truncate to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{}{}", text, " ".repeat(width - count))
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

impl Render for EventIndicator {
    fn render(&self) -> String {
        let text = match self.time {
            Some(t) => format!("{} {}", t.format("%H:%M"), self.label),
            None => self.label.to_string(),
        };
        paint(self.event_type, &fit(&text, CELL_WIDTH))
    }
}

impl Render for ParishWeekBanner {
    fn render(&self) -> String {
        let titles: Vec<_> = self.events.iter().map(|e| e.title.as_str()).collect();
        let text = format!(
            " {}: {} ({} – {}) ",
            self.label(),
            titles.join(", "),
            self.start.format("%b %-d"),
            self.end.format("%b %-d"),
        );
        let width = (CELL_WIDTH + 1) * 7 - 1;
        let bar = format!("{:━^width$}", text, width = width);
        paint(EventType::ParishWeek, &bar).bold().to_string()
    }
}

fn day_number(day: &DayCell) -> String {
    let number = format!("{:>2}", day.date.format("%-d"));
    let marker = if day.has_events { "•" } else { " " };
    let text = fit(&format!("{}{}", number, marker), CELL_WIDTH);
    if day.is_today {
        text.reversed().bold().to_string()
    } else {
        text
    }
}

fn indicator_line(cell: &Cell, index: usize) -> String {
    match cell.as_day().and_then(|day| day.indicators.get(index)) {
        Some(indicator) => indicator.render(),
        None => " ".repeat(CELL_WIDTH),
    }
}

fn overflow_line(cell: &Cell) -> String {
    match cell.as_day().and_then(DayCell::overflow_label) {
        Some(label) => fit(&label, CELL_WIDTH).dimmed().to_string(),
        None => " ".repeat(CELL_WIDTH),
    }
}

impl Render for WeekRow {
    fn render(&self) -> String {
        let join = |parts: Vec<String>| parts.join("│");
        let mut lines = Vec::new();

        lines.push(join(
            self.cells
                .iter()
                .map(|cell| match cell {
                    Cell::Day(day) => day_number(day),
                    Cell::Empty => " ".repeat(CELL_WIDTH),
                })
                .collect(),
        ));

        let deepest = self
            .cells
            .iter()
            .filter_map(Cell::as_day)
            .map(|day| day.indicators.len())
            .max()
            .unwrap_or(0)
            .min(MAX_INDICATORS);
        for index in 0..deepest {
            lines.push(join(
                self.cells.iter().map(|cell| indicator_line(cell, index)).collect(),
            ));
        }

        if self
            .cells
            .iter()
            .filter_map(Cell::as_day)
            .any(|day| day.overflow.is_some())
        {
            lines.push(join(self.cells.iter().map(overflow_line).collect()));
        }

        if let Some(banner) = &self.banner {
            lines.push(banner.render());
        }

        lines.join("\n")
    }
}

impl Render for MonthGrid {
    fn render(&self) -> String {
        let width = (CELL_WIDTH + 1) * 7 - 1;
        let rule = "─".repeat(width).dimmed().to_string();

        let mut lines = vec![
            format!("{:^width$}", self.month.title(), width = width)
                .bold()
                .to_string(),
            WEEKDAY_HEADERS
                .iter()
                .map(|h| fit(h, CELL_WIDTH))
                .collect::<Vec<_>>()
                .join(" ")
                .dimmed()
                .to_string(),
            rule.clone(),
        ];

        for row in &self.rows {
            lines.push(row.render());
            lines.push(rule.clone());
        }

        lines.join("\n")
    }
}

fn render_actions(id: i64, actions: &[EventAction]) -> Option<String> {
    if actions.is_empty() {
        return None;
    }
    let hints: Vec<String> = actions
        .iter()
        .map(|action| match action {
            EventAction::Edit => format!("parishcal edit {}", id),
            EventAction::Delete => format!("parishcal delete {}", id),
        })
        .collect();
    Some(hints.join("  ·  "))
}

/// Multi-line description of one event for the detail and list views.
pub fn render_event(event: &Event) -> Vec<String> {
    let time = if event.time.is_some() {
        event.time_label()
    } else {
        "all day".to_string()
    };

    let mut lines = vec![format!(
        "{} {} {}",
        format!("{:>7}", time),
        event.title.bold(),
        paint(event.event_type, &format!("[{}]", event.event_type.label())),
    )];
    if let Some(location) = &event.location {
        lines.push(format!("        {}", location.dimmed()));
    }
    if let Some(description) = &event.description {
        lines.push(format!("        {}", description));
    }
    lines
}

impl Render for DayDetail {
    fn render(&self) -> String {
        let mut lines = vec![self.heading.bold().to_string()];

        if self.entries.is_empty() {
            lines.push("   No events".dimmed().to_string());
        }

        for entry in &self.entries {
            lines.extend(render_event(&entry.event));
            if let Some(hints) = render_actions(entry.event.id, &entry.actions) {
                lines.push(format!("        {}", hints.dimmed()));
            }
        }

        lines.join("\n")
    }
}

impl Render for CalError {
    fn render(&self) -> String {
        format!("  {} {}", "!".yellow(), self.to_string().yellow())
    }
}
