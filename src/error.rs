use std::fmt;
use std::io;

use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;

/// Why a month's grid markup was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The markup has no table rows at all.
    InvalidFragment,
    MissingAttribute(&'static str),
    MissingElement(&'static str),
    /// The element lacks the class that marks its role in the grid.
    UnexpectedClass(&'static str),
    MissingDayNumber,
    DaySequence { expected: u32, found: u32 },
    EventsFlagMismatch { flagged: bool, found: usize },
    InvalidDate(u32),
    IncompleteMonth { last_day: Option<u32>, days_in_month: u32 },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFragment => write!(f, "markup is not a calendar grid fragment"),
            Self::MissingAttribute(name) => write!(f, "missing attribute `{name}`"),
            Self::MissingElement(what) => write!(f, "missing element {what}"),
            Self::UnexpectedClass(class) => write!(f, "expected class `{class}`"),
            Self::MissingDayNumber => write!(f, "cell carries no day number"),
            Self::DaySequence { expected, found } => {
                write!(f, "expected day {expected}, found day {found}")
            }
            Self::EventsFlagMismatch { flagged, found } => write!(
                f,
                "has-events flag is {flagged} but the cell lists {found} events"
            ),
            Self::InvalidDate(day) => write!(f, "day {day} does not exist in this month"),
            Self::IncompleteMonth {
                last_day: Some(last_day),
                days_in_month,
            } => write!(f, "grid ends at day {last_day} of {days_in_month}"),
            Self::IncompleteMonth {
                last_day: None,
                days_in_month,
            } => write!(f, "grid has no days, expected {days_in_month}"),
        }
    }
}

/// Structural error in a month's grid markup. Fatal to the month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    fragment: Option<String>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            fragment: None,
        }
    }

    pub fn in_fragment(kind: ParseErrorKind, fragment: impl Into<String>) -> Self {
        Self {
            kind,
            fragment: Some(fragment.into()),
        }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Raw markup of the offending cell, when the error is tied to one.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }
}

impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fragment {
            Some(fragment) => write!(f, "failed to parse {}: {}", fragment.trim(), self.kind),
            None => write!(f, "failed to parse month grid: {}", self.kind),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("got response status {0}")]
    Status(StatusCode),

    #[error("unexpected response: {0}")]
    Envelope(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to retrieve month {month}")]
    Fetch {
        month: NaiveDate,
        #[source]
        source: FetchError,
    },

    #[error("failed to parse month {month}")]
    Parse {
        month: NaiveDate,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
