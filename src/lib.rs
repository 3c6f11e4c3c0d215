//! Scrapes the Daily Adventures event calendar widget month by month and
//! collapses events repeated in every calendar cell into date ranges.

pub mod consolidate;
pub mod duration;
pub mod error;
pub mod fetch;
mod ics;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod site;
mod structs;
pub mod utils;

pub use consolidate::consolidate;
pub use duration::DurationResolver;
pub use error::{Error, FetchError, ParseError, ParseErrorKind};
pub use parser::parse_month;
pub use structs::{
    CalendarDocument, ConsolidatedEvent, DayRecord, EventIdentity, EventType, MonthCalendar,
    RawEvent,
};
