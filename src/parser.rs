use chrono::{Datelike, NaiveDate};
use log::debug;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::error::{ParseError, ParseErrorKind};
use crate::site::SiteConfig;
use crate::utils::{days_in_month, first_of_month};
use crate::{DayRecord, RawEvent};

macro_rules! selector {
    ($query:expr) => {{
        static SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse($query).unwrap());
        &SELECTOR
    }};
}

const DAY_CLASS: &str = "simcal-day";
const DAY_NUMBER_PREFIX: &str = "simcal-day-";
const VOID_CLASS: &str = "simcal-day-void";
const HAS_EVENTS_CLASS: &str = "simcal-day-has-events";
const EVENT_CLASS: &str = "simcal-event";

/// Tracks the day numbers seen so far in a month's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DaySequence {
    NoDaySeen,
    DaySeen(u32),
}

impl DaySequence {
    fn advance(&mut self, day: u32) -> Result<(), ParseErrorKind> {
        let expected = match *self {
            DaySequence::NoDaySeen => 1,
            DaySequence::DaySeen(previous) => previous + 1,
        };

        if day != expected {
            return Err(ParseErrorKind::DaySequence {
                expected,
                found: day,
            });
        }

        *self = DaySequence::DaySeen(day);
        Ok(())
    }

    fn last_day(self) -> Option<u32> {
        match self {
            DaySequence::NoDaySeen => None,
            DaySequence::DaySeen(day) => Some(day),
        }
    }
}

/// Parses one month of the calendar widget's grid (a bare `<tbody>`) into
/// one record per day of `month`.
///
/// Padding cells of adjacent months are skipped. Any structural problem
/// rejects the whole month; errors tied to a cell carry its raw markup.
pub fn parse_month<S: AsRef<str>>(
    markup: S,
    month: NaiveDate,
    site: &SiteConfig,
) -> Result<Vec<DayRecord>, ParseError> {
    let month = first_of_month(month);
    // Table parts are dropped unless parsed in a table context.
    let html = Html::parse_fragment(&format!("<table>{}</table>", markup.as_ref()));

    // Only the outer grid's own rows; event details may embed tables.
    let rows = html
        .select(selector!("table"))
        .next()
        .into_iter()
        .flat_map(|table| child_elements(table, "tbody"))
        .flat_map(|tbody| child_elements(tbody, "tr"))
        .collect::<Vec<_>>();

    if rows.is_empty() {
        return Err(ParseError::in_fragment(
            ParseErrorKind::InvalidFragment,
            markup.as_ref(),
        ));
    }

    let mut sequence = DaySequence::NoDaySeen;
    let mut days = Vec::new();

    for row in rows {
        for cell in child_elements(row, "td") {
            let day = parse_cell(cell, month, &mut sequence, site)
                .map_err(|kind| ParseError::in_fragment(kind, cell.html()))?;

            if let Some(day) = day {
                days.push(day);
            }
        }
    }

    let days_in_month = days_in_month(month);
    if sequence.last_day() != Some(days_in_month) {
        return Err(ParseError::new(ParseErrorKind::IncompleteMonth {
            last_day: sequence.last_day(),
            days_in_month,
        }));
    }

    Ok(days)
}

fn child_elements<'a>(
    element: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

fn classes<'a>(element: &ElementRef<'a>) -> Result<Vec<&'a str>, ParseErrorKind> {
    let class = element
        .value()
        .attr("class")
        .ok_or(ParseErrorKind::MissingAttribute("class"))?;

    Ok(class.split_whitespace().collect())
}

fn parse_cell(
    cell: ElementRef,
    month: NaiveDate,
    sequence: &mut DaySequence,
    site: &SiteConfig,
) -> Result<Option<DayRecord>, ParseErrorKind> {
    let classes = classes(&cell)?;

    if classes.contains(&VOID_CLASS) {
        return Ok(None);
    }

    if !classes.contains(&DAY_CLASS) {
        return Err(ParseErrorKind::UnexpectedClass(DAY_CLASS));
    }

    let day = classes
        .iter()
        .find_map(|class| class.strip_prefix(DAY_NUMBER_PREFIX)?.parse::<u32>().ok())
        .ok_or(ParseErrorKind::MissingDayNumber)?;

    sequence.advance(day)?;

    let date = month
        .with_day(day)
        .ok_or(ParseErrorKind::InvalidDate(day))?;

    debug!("day: {day} date: {date}");

    let items = cell
        .select(selector!("ul.simcal-events > li"))
        .collect::<Vec<_>>();

    let flagged = classes.contains(&HAS_EVENTS_CLASS);
    if flagged == items.is_empty() {
        return Err(ParseErrorKind::EventsFlagMismatch {
            flagged,
            found: items.len(),
        });
    }

    let events = items
        .into_iter()
        .map(|item| parse_event(item, site))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(DayRecord { date, events }))
}

fn parse_event(item: ElementRef, site: &SiteConfig) -> Result<RawEvent, ParseErrorKind> {
    if !classes(&item)?.contains(&EVENT_CLASS) {
        return Err(ParseErrorKind::UnexpectedClass(EVENT_CLASS));
    }

    let title = item
        .select(selector!("span.simcal-event-title"))
        .next()
        .ok_or(ParseErrorKind::MissingElement("span.simcal-event-title"))?
        .text()
        .collect::<String>();

    debug!("  title: {title:?}");

    let mut urls = Vec::new();
    for anchor in item.select(selector!("a")) {
        let href = anchor
            .value()
            .attr("href")
            .ok_or(ParseErrorKind::MissingAttribute("href"))?;

        debug!("  a: {:?} -> {href:?}", anchor.text().collect::<String>());
        urls.push(href);
    }

    let url = urls
        .iter()
        .find(|url| site.is_own_url(url))
        .or_else(|| urls.first())
        .map(|url| url.to_string());

    Ok(RawEvent { title, url })
}
