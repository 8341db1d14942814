//! Per-day view models: grid cells and the day detail view.

use chrono::{NaiveDate, NaiveTime};

use crate::collection::{EventCollection, sort_events};
use crate::event::{Event, EventType};
use crate::grid::Viewer;

/// Individual indicators shown in a grid cell before "+N more".
pub const MAX_INDICATORS: usize = 3;

/// Admin-only affordances attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    Edit,
    Delete,
}

fn actions_for(viewer: &Viewer) -> Vec<EventAction> {
    if viewer.admin {
        vec![EventAction::Edit, EventAction::Delete]
    } else {
        Vec::new()
    }
}

/// One event as shown inside a day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventIndicator {
    pub id: i64,
    pub title: String,
    pub time: Option<NaiveTime>,
    pub event_type: EventType,
    pub label: &'static str,
    pub actions: Vec<EventAction>,
}

impl EventIndicator {
    fn new(event: &Event, viewer: &Viewer) -> Self {
        EventIndicator {
            id: event.id,
            title: event.title.clone(),
            time: event.time,
            event_type: event.event_type,
            label: event.event_type.label(),
            actions: actions_for(viewer),
        }
    }
}

/// A day of the rendered month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_today: bool,
    /// At most [`MAX_INDICATORS`], sorted by time.
    pub indicators: Vec<EventIndicator>,
    /// Number of events beyond the shown indicators.
    pub overflow: Option<usize>,
    /// Whether the day opens a detail view. Counts Parish Week events,
    /// which never appear as indicators.
    pub has_events: bool,
}

impl DayCell {
    pub(crate) fn build(date: NaiveDate, day_events: &[&Event], viewer: &Viewer) -> Self {
        let mut shown: Vec<&Event> = day_events
            .iter()
            .copied()
            .filter(|e| !e.event_type.is_parish_week())
            .collect();
        sort_events(&mut shown);

        let hidden = shown.len().saturating_sub(MAX_INDICATORS);
        let indicators = shown
            .iter()
            .take(MAX_INDICATORS)
            .map(|e| EventIndicator::new(e, viewer))
            .collect();

        DayCell {
            date,
            is_today: date == viewer.today,
            indicators,
            overflow: (hidden > 0).then_some(hidden),
            has_events: !day_events.is_empty(),
        }
    }

    /// "+N more" when some events didn't fit.
    pub fn overflow_label(&self) -> Option<String> {
        self.overflow.map(|n| format!("+{} more", n))
    }
}

/// One entry of the day detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailEntry {
    pub event: Event,
    pub label: &'static str,
    pub actions: Vec<EventAction>,
}

/// Everything happening on one day, untruncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayDetail {
    pub date: NaiveDate,
    /// e.g. "Sunday, March 9, 2025"
    pub heading: String,
    pub entries: Vec<DetailEntry>,
}

/// Detail view for `date`: every event that day, Parish Week included,
/// in the same order as the grid cell.
pub fn day_detail(date: NaiveDate, events: &EventCollection, viewer: &Viewer) -> DayDetail {
    let mut day_events = events.on_date(date);
    sort_events(&mut day_events);

    DayDetail {
        date,
        heading: date.format("%A, %B %-d, %Y").to_string(),
        entries: day_events
            .into_iter()
            .map(|e| DetailEntry {
                event: e.clone(),
                label: e.event_type.label(),
                actions: actions_for(viewer),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventDraft;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn viewer(admin: bool) -> Viewer {
        Viewer {
            admin,
            today: date("2025-03-09"),
        }
    }

    fn make(id: i64, time: Option<&str>, kind: &str) -> Event {
        let mut draft = EventDraft::new(format!("Event {}", id), "2025-03-09").with_type(kind);
        if let Some(t) = time {
            draft = draft.with_time(t);
        }
        draft.into_event(id).unwrap()
    }

    #[test]
    fn test_three_events_no_overflow() {
        let events = [
            make(1, Some("10:00"), "service"),
            make(2, None, "special"),
            make(3, Some("08:00"), "fellowship"),
        ];
        let refs: Vec<&Event> = events.iter().collect();
        let cell = DayCell::build(date("2025-03-09"), &refs, &viewer(false));

        let ids: Vec<_> = cell.indicators.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(cell.overflow, None);
        assert_eq!(cell.overflow_label(), None);
        assert!(cell.is_today);
    }

    #[test]
    fn test_four_events_overflow_by_one() {
        let events = [
            make(1, Some("10:00"), "service"),
            make(2, None, "special"),
            make(3, Some("08:00"), "fellowship"),
            make(4, None, "parishgroups"),
        ];
        let refs: Vec<&Event> = events.iter().collect();
        let cell = DayCell::build(date("2025-03-09"), &refs, &viewer(false));

        assert_eq!(cell.indicators.len(), 3);
        assert_eq!(cell.overflow_label().as_deref(), Some("+1 more"));
        // Untimed events keep collection order; the later one is hidden.
        assert_eq!(cell.indicators[2].id, 2);
    }

    #[test]
    fn test_parish_week_is_not_an_indicator_but_opens_detail() {
        let events = [make(1, None, "parishweek")];
        let refs: Vec<&Event> = events.iter().collect();
        let cell = DayCell::build(date("2025-03-09"), &refs, &viewer(false));

        assert!(cell.indicators.is_empty());
        assert!(cell.has_events);
    }

    #[test]
    fn test_admin_actions_are_display_only() {
        let events = [make(1, Some("10:00"), "service")];
        let refs: Vec<&Event> = events.iter().collect();

        let public = DayCell::build(date("2025-03-09"), &refs, &viewer(false));
        let admin = DayCell::build(date("2025-03-09"), &refs, &viewer(true));

        assert!(public.indicators[0].actions.is_empty());
        assert_eq!(
            admin.indicators[0].actions,
            vec![EventAction::Edit, EventAction::Delete]
        );
    }

    #[test]
    fn test_detail_lists_everything_sorted() {
        let events = EventCollection::from_events([
            make(1, None, "special"),
            make(2, Some("18:00"), "service"),
            make(3, None, "parishweek"),
            make(4, Some("07:00"), "service"),
            make(5, Some("12:00"), "fellowship"),
        ]);

        let detail = day_detail(date("2025-03-09"), &events, &viewer(true));

        let ids: Vec<_> = detail.entries.iter().map(|e| e.event.id).collect();
        assert_eq!(ids, vec![4, 5, 2, 1, 3]);
        assert_eq!(detail.heading, "Sunday, March 9, 2025");
        assert_eq!(detail.entries[4].label, "Parish Week");
    }
}
