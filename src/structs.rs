use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One event entry as rendered inside a single calendar cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub title: String,
    pub url: Option<String>,
}

/// Two occurrences are the same event iff title and url match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventIdentity {
    pub title: String,
    pub url: Option<String>,
}

impl From<&RawEvent> for EventIdentity {
    fn from(event: &RawEvent) -> Self {
        Self {
            title: event.title.clone(),
            url: event.url.clone(),
        }
    }
}

/// A calendar day and the events listed on it, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord<E = RawEvent> {
    pub date: NaiveDate,
    pub events: Vec<E>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SingleDay,
    MultiDay,
    RepeatedSingleDay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedEvent {
    pub title: String,
    pub url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Only set when the calendar run spans more than one day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    /// Only set when the calendar run spans more than one day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCalendar {
    /// First day of the month.
    pub date: NaiveDate,
    pub days: Vec<DayRecord<ConsolidatedEvent>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDocument {
    pub months: Vec<MonthCalendar>,
}

impl CalendarDocument {
    pub fn events(&self) -> impl Iterator<Item = &ConsolidatedEvent> {
        self.months
            .iter()
            .flat_map(|month| &month.days)
            .flat_map(|day| &day.events)
    }
}
