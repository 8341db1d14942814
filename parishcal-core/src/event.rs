//! Calendar event types and their wire format.
//!
//! Events are stored as a JSON array of flat records:
//! `{ id, title, date: "YYYY-MM-DD", time: "HH:MM" | "", location, type, description }`.
//! Optional text fields are written as empty strings, and `type` defaults
//! to `special` when missing.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{CalError, CalResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// What kind of gathering an event is. Drives its label and styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Service,
    Fellowship,
    ParishGroups,
    /// Marks a whole Sunday..Saturday week; rendered as a row banner.
    ParishWeek,
    #[default]
    Special,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Service,
        EventType::Fellowship,
        EventType::ParishGroups,
        EventType::ParishWeek,
        EventType::Special,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EventType::Service => "Worship Service",
            EventType::Fellowship => "Fellowship Meal",
            EventType::ParishGroups => "Parish Groups",
            EventType::ParishWeek => "Parish Week",
            EventType::Special => "Special Event",
        }
    }

    /// Key used on the wire and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            EventType::Service => "service",
            EventType::Fellowship => "fellowship",
            EventType::ParishGroups => "parishgroups",
            EventType::ParishWeek => "parishweek",
            EventType::Special => "special",
        }
    }

    pub fn is_parish_week(&self) -> bool {
        matches!(self, EventType::ParishWeek)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for EventType {
    type Err = CalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        EventType::ALL
            .into_iter()
            .find(|t| t.key() == key)
            .ok_or_else(|| {
                let valid: Vec<_> = EventType::ALL.iter().map(|t| t.key()).collect();
                CalError::validation(
                    "type",
                    format!("'{}' is not one of {}", s, valid.join(", ")),
                )
            })
    }
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventRecord", into = "EventRecord")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub event_type: EventType,
}

impl Event {
    /// "HH:MM", or an empty string for events without a time.
    pub fn time_label(&self) -> String {
        self.time
            .map(|t| t.format(TIME_FORMAT).to_string())
            .unwrap_or_default()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Flat record as it appears in `events.json`.
#[derive(Serialize, Deserialize)]
struct EventRecord {
    id: i64,
    title: String,
    date: String,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(rename = "type", default)]
    event_type: EventType,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<EventRecord> for Event {
    type Error = CalError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        Ok(Event {
            id: record.id,
            title: parse_title(&record.title)?,
            date: parse_date(&record.date)?,
            time: parse_time(record.time.as_deref())?,
            location: non_empty(record.location),
            description: non_empty(record.description),
            event_type: record.event_type,
        })
    }
}

impl From<Event> for EventRecord {
    fn from(event: Event) -> Self {
        EventRecord {
            id: event.id,
            title: event.title,
            date: event.date.format(DATE_FORMAT).to_string(),
            time: Some(
                event
                    .time
                    .map(|t| t.format(TIME_FORMAT).to_string())
                    .unwrap_or_default(),
            ),
            location: Some(event.location.unwrap_or_default()),
            event_type: event.event_type,
            description: Some(event.description.unwrap_or_default()),
        }
    }
}

/// User-entered fields for creating or editing an event.
///
/// Everything is raw text until [`EventDraft::into_event`] validates it,
/// so a rejected draft never touches the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub description: Option<String>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        EventDraft {
            title: Some(title.into()),
            date: Some(date.into()),
            ..Default::default()
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate the draft and build an event carrying `id`.
    pub fn into_event(self, id: i64) -> CalResult<Event> {
        let title = self
            .title
            .ok_or_else(|| CalError::validation("title", "is required"))?;
        let date = self
            .date
            .ok_or_else(|| CalError::validation("date", "is required"))?;
        let event_type = match self.event_type.as_deref().map(str::trim) {
            None | Some("") => EventType::default(),
            Some(s) => s.parse()?,
        };

        Ok(Event {
            id,
            title: parse_title(&title)?,
            date: parse_date(&date)?,
            time: parse_time(self.time.as_deref())?,
            location: non_empty(self.location),
            description: non_empty(self.description),
            event_type,
        })
    }
}

impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        EventDraft {
            title: Some(event.title.clone()),
            date: Some(event.date.format(DATE_FORMAT).to_string()),
            time: event.time.map(|t| t.format(TIME_FORMAT).to_string()),
            location: event.location.clone(),
            event_type: Some(event.event_type.key().to_string()),
            description: event.description.clone(),
        }
    }
}

fn parse_title(title: &str) -> CalResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CalError::validation("title", "must not be empty"));
    }
    Ok(title.to_string())
}

pub fn parse_date(s: &str) -> CalResult<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return Err(CalError::validation("date", "is required"));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| CalError::validation("date", format!("'{}' is not YYYY-MM-DD", s)))
}

fn parse_time(s: Option<&str>) -> CalResult<Option<NaiveTime>> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveTime::parse_from_str(s, TIME_FORMAT)
            .map(Some)
            .map_err(|_| CalError::validation("time", format!("'{}' is not HH:MM", s))),
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
