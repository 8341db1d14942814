//! Sunday-anchored weeks and the Parish Week banner.

use chrono::{Datelike, Days, NaiveDate};

use crate::collection::sort_events;
use crate::event::{Event, EventType};

/// The Sunday on or before `date`.
/// Clamped to the earliest representable date.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_sunday())))
        .unwrap_or(NaiveDate::MIN)
}

/// Banner spanning one grid row, marking a Parish Week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParishWeekBanner {
    /// Sunday of the marked week.
    pub start: NaiveDate,
    /// Saturday of the marked week.
    pub end: NaiveDate,
    /// The Parish Week events dated inside the week, sorted.
    pub events: Vec<BannerEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerEvent {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
}

impl ParishWeekBanner {
    pub fn label(&self) -> &'static str {
        EventType::ParishWeek.label()
    }
}

/// Banner for the week starting at `sunday`, if any Parish Week event falls
/// within it. Membership is plain date arithmetic, so events in the
/// neighbouring month still count.
pub fn banner_for(sunday: NaiveDate, parish_weeks: &[&Event]) -> Option<ParishWeekBanner> {
    let saturday = sunday.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);

    let mut in_week: Vec<&Event> = parish_weeks
        .iter()
        .copied()
        .filter(|e| e.event_type.is_parish_week())
        .filter(|e| e.date >= sunday && e.date <= saturday)
        .collect();

    if in_week.is_empty() {
        return None;
    }
    sort_events(&mut in_week);

    Some(ParishWeekBanner {
        start: sunday,
        end: saturday,
        events: in_week
            .into_iter()
            .map(|e| BannerEvent {
                id: e.id,
                title: e.title.clone(),
                date: e.date,
            })
            .collect(),
    })
}
