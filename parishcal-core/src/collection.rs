//! The event collection and id allocation.

use chrono::NaiveDate;

use crate::error::{CalError, CalResult};
use crate::event::Event;

/// All known events, in insertion order.
///
/// Ids are unique at all times. Storage order carries no meaning;
/// use [`EventCollection::sorted`] or [`sort_events`] before display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCollection {
    events: Vec<Event>,
}

impl EventCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection, keeping the first record for any repeated id.
    pub fn from_events(events: impl IntoIterator<Item = Event>) -> Self {
        let mut collection = EventCollection::new();
        for event in events {
            if collection.contains(event.id) {
                tracing::warn!(id = event.id, title = %event.title, "dropping event with duplicate id");
                continue;
            }
            collection.events.push(event);
        }
        collection
    }

    pub fn from_json(json: &str) -> CalResult<Self> {
        let events: Vec<Event> =
            serde_json::from_str(json).map_err(|e| CalError::Serialization(e.to_string()))?;
        Ok(Self::from_events(events))
    }

    /// Pretty-printed JSON array with two-space indentation.
    pub fn to_json(&self) -> CalResult<String> {
        serde_json::to_string_pretty(&self.events)
            .map_err(|e| CalError::Serialization(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    pub fn contains(&self, id: i64) -> bool {
        self.events.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: i64) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn max_id(&self) -> Option<i64> {
        self.events.iter().map(|e| e.id).max()
    }

    /// Append an event whose id is not yet present.
    pub(crate) fn insert(&mut self, event: Event) -> CalResult<()> {
        if self.contains(event.id) {
            return Err(CalError::validation(
                "id",
                format!("{} is already in use", event.id),
            ));
        }
        self.events.push(event);
        Ok(())
    }

    /// Replace the record with `event.id` in place.
    pub(crate) fn replace(&mut self, event: Event) -> CalResult<()> {
        let slot = self
            .events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or(CalError::NotFound(event.id))?;
        *slot = event;
        Ok(())
    }

    /// Remove the record with `id`, returning it if it existed.
    pub(crate) fn remove(&mut self, id: i64) -> Option<Event> {
        let index = self.events.iter().position(|e| e.id == id)?;
        Some(self.events.remove(index))
    }

    /// Every event on `date`, in collection order.
    pub fn on_date(&self, date: NaiveDate) -> Vec<&Event> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    /// All events sorted by date, then time (untimed last).
    pub fn sorted(&self) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.iter().collect();
        sort_events(&mut events);
        events
    }

    /// Events on or after `from`, sorted.
    pub fn upcoming(&self, from: NaiveDate) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.iter().filter(|e| e.date >= from).collect();
        sort_events(&mut events);
        events
    }
}

impl<'a> IntoIterator for &'a EventCollection {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Stable sort by date, then time ascending with untimed events last.
///
/// Untimed events on the same day keep their relative order, so sorting
/// an already sorted list is a no-op.
pub fn sort_events(events: &mut [&Event]) {
    events.sort_by(|a, b| {
        a.date.cmp(&b.date).then_with(|| match (a.time, b.time) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        })
    });
}

/// Hands out event ids derived from a millisecond clock.
///
/// Ids are strictly increasing even when two events are created within the
/// same millisecond or the clock steps backwards.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: i64,
}

impl IdAllocator {
    /// Start above every id already in `collection`.
    pub fn for_collection(collection: &EventCollection) -> Self {
        IdAllocator {
            last: collection.max_id().unwrap_or(0),
        }
    }

    /// Fails once the id space above the largest known id is used up.
    pub fn next(&mut self, now_ms: i64) -> CalResult<i64> {
        let floor = self.last.checked_add(1).ok_or_else(|| {
            CalError::validation("id", format!("no id left above {}", self.last))
        })?;
        let id = now_ms.max(floor);
        self.last = id;
        Ok(id)
    }

    /// Never hand out anything at or below `id`.
    pub fn observe(&mut self, id: i64) {
        self.last = self.last.max(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventDraft;

    fn event(id: i64, date: &str, time: Option<&str>) -> Event {
        let mut draft = EventDraft::new(format!("Event {}", id), date);
        if let Some(t) = time {
            draft = draft.with_time(t);
        }
        draft.into_event(id).unwrap()
    }

    #[test]
    fn test_from_json_keeps_first_duplicate() {
        let json = r#"[
            {"id": 1, "title": "First", "date": "2025-03-09"},
            {"id": 1, "title": "Second", "date": "2025-03-10"},
            {"id": 2, "title": "Third", "date": "2025-03-11"}
        ]"#;
        let collection = EventCollection::from_json(json).unwrap();

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(1).unwrap().title, "First");
    }

    #[test]
    fn test_json_round_trip() {
        let collection =
            EventCollection::from_events([event(1, "2025-03-09", Some("10:00")), event(2, "2025-03-10", None)]);
        let json = collection.to_json().unwrap();

        assert!(json.starts_with("[\n  {"));
        assert_eq!(EventCollection::from_json(&json).unwrap(), collection);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut collection = EventCollection::from_events([event(1, "2025-03-09", None)]);
        assert!(collection.insert(event(1, "2025-03-10", None)).is_err());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_replace_missing_is_not_found() {
        let mut collection = EventCollection::new();
        assert!(matches!(
            collection.replace(event(9, "2025-03-09", None)),
            Err(CalError::NotFound(9))
        ));
    }

    #[test]
    fn test_sorted_puts_untimed_last_and_is_stable() {
        let collection = EventCollection::from_events([
            event(1, "2025-03-09", None),
            event(2, "2025-03-09", Some("18:00")),
            event(3, "2025-03-08", None),
            event(4, "2025-03-09", None),
            event(5, "2025-03-09", Some("09:30")),
        ]);
        let ids: Vec<_> = collection.sorted().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 5, 2, 1, 4]);

        let mut again = collection.sorted();
        sort_events(&mut again);
        let ids_again: Vec<_> = again.iter().map(|e| e.id).collect();
        assert_eq!(ids_again, ids);
    }

    #[test]
    fn test_upcoming_filters_past() {
        let collection = EventCollection::from_events([
            event(1, "2025-03-01", None),
            event(2, "2025-03-20", None),
            event(3, "2025-03-10", None),
        ]);
        let from = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let ids: Vec<_> = collection.upcoming(from).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_id_allocator_is_monotonic() {
        let collection = EventCollection::from_events([event(5_000, "2025-03-09", None)]);
        let mut ids = IdAllocator::for_collection(&collection);

        assert_eq!(ids.next(1_000).unwrap(), 5_001);
        assert_eq!(ids.next(9_000).unwrap(), 9_000);
        assert_eq!(ids.next(9_000).unwrap(), 9_001);
        assert_eq!(ids.next(8_000).unwrap(), 9_002);
    }

    #[test]
    fn test_id_allocator_exhausted_at_max() {
        let collection = EventCollection::from_events([event(i64::MAX, "2025-03-09", None)]);
        let mut ids = IdAllocator::for_collection(&collection);

        assert!(matches!(
            ids.next(1_000),
            Err(CalError::Validation { field: "id", .. })
        ));
    }
}
