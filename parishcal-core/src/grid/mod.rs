//! Month grid view model.
//!
//! [`render_month`] is a pure function from a month, the events and the
//! viewer to a declarative grid: Sunday-first rows of seven cells, per-day
//! indicators, and Parish Week banners. Any front end can draw it.

mod day;
mod month;
mod week;

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::collection::EventCollection;
use crate::event::Event;

pub use day::{DayCell, DayDetail, DetailEntry, EventAction, EventIndicator, MAX_INDICATORS, day_detail};
pub use month::YearMonth;
pub use week::{BannerEvent, ParishWeekBanner, banner_for, week_start};

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Who is looking at the calendar, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    /// Admins see edit/delete actions. Display only.
    pub admin: bool,
    pub today: NaiveDate,
}

impl Viewer {
    pub fn public(today: NaiveDate) -> Self {
        Viewer {
            admin: false,
            today,
        }
    }

    pub fn admin(today: NaiveDate) -> Self {
        Viewer { admin: true, today }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Padding before day 1 or after the last day.
    Empty,
    Day(DayCell),
}

impl Cell {
    pub fn as_day(&self) -> Option<&DayCell> {
        match self {
            Cell::Day(day) => Some(day),
            Cell::Empty => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRow {
    /// Always seven cells, Sunday first.
    pub cells: Vec<Cell>,
    pub banner: Option<ParishWeekBanner>,
}

impl WeekRow {
    /// Sunday of the week this row shows.
    pub fn week_start(&self) -> Option<NaiveDate> {
        self.cells
            .iter()
            .find_map(Cell::as_day)
            .map(|day| week_start(day.date))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub rows: Vec<WeekRow>,
}

impl MonthGrid {
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }

    pub fn leading_empty(&self) -> usize {
        self.cells()
            .take_while(|cell| matches!(cell, Cell::Empty))
            .count()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells()
            .filter_map(Cell::as_day)
            .find(|day| day.date == date)
    }

    /// Index of the row holding `date`.
    pub fn row_of(&self, date: NaiveDate) -> Option<usize> {
        self.rows.iter().position(|row| {
            row.cells
                .iter()
                .filter_map(Cell::as_day)
                .any(|day| day.date == date)
        })
    }

    pub fn banners(&self) -> impl Iterator<Item = &ParishWeekBanner> {
        self.rows.iter().filter_map(|row| row.banner.as_ref())
    }
}

/// Lay out `month` with `events` for `viewer`.
pub fn render_month(month: YearMonth, events: &EventCollection, viewer: &Viewer) -> MonthGrid {
    let mut by_date: HashMap<NaiveDate, Vec<&Event>> = HashMap::new();
    for event in events {
        by_date.entry(event.date).or_default().push(event);
    }
    let parish_weeks: Vec<&Event> = events
        .iter()
        .filter(|e| e.event_type.is_parish_week())
        .collect();

    let first = month.first_day();
    let leading = first.weekday().num_days_from_sunday() as usize;

    let mut cells: Vec<Cell> = (0..leading).map(|_| Cell::Empty).collect();
    for date in month.days() {
        let day_events = by_date.get(&date).map(Vec::as_slice).unwrap_or_default();
        cells.push(Cell::Day(DayCell::build(date, day_events, viewer)));
    }
    while cells.len() % 7 != 0 {
        cells.push(Cell::Empty);
    }

    let mut rows = Vec::with_capacity(cells.len() / 7);
    let mut cells = cells.into_iter().peekable();
    while cells.peek().is_some() {
        let mut row = WeekRow {
            cells: cells.by_ref().take(7).collect(),
            banner: None,
        };
        row.banner = row
            .week_start()
            .and_then(|sunday| banner_for(sunday, &parish_weeks));
        rows.push(row);
    }

    MonthGrid { month, rows }
}
