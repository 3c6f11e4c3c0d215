use chrono::Days;
use ics::{
    escape_text,
    parameters::Value,
    properties::{Description, DtEnd, DtStart, Summary},
};

use crate::{CalendarDocument, ConsolidatedEvent};

const PRODID: &str = "-//da-calendar//Daily Adventures events//CS";

impl CalendarDocument {
    #[must_use]
    pub fn to_ics(&self) -> ics::ICalendar<'_> {
        let mut icalendar = ics::ICalendar::new("2.0", PRODID);

        for event in self.events() {
            icalendar.add_event(event.to_ics());
        }

        icalendar
    }
}

impl ConsolidatedEvent {
    /// All-day event; `DTEND` is the day after the last day.
    #[must_use]
    pub fn to_ics(&self) -> ics::Event<'_> {
        let start = self.start_date.format("%Y%m%d").to_string();
        let end = (self.end_date + Days::new(1)).format("%Y%m%d").to_string();

        // Same-titled courses on one day differ only by their link.
        let id = format!(
            "{}_{}_{}",
            start,
            self.title.replace(' ', "-"),
            self.url.as_deref().unwrap_or_default()
        );

        let mut ics_event = ics::Event::new(escape_text(id), format!("{start}T000000"));

        let mut dtstart = DtStart::new(start);
        dtstart.add(Value::new("DATE"));
        let mut dtend = DtEnd::new(end);
        dtend.add(Value::new("DATE"));

        ics_event.push(dtstart);
        ics_event.push(dtend);
        ics_event.push(Summary::new(escape_text(self.title.as_str())));

        if let Some(url) = &self.url {
            ics_event.push(Description::new(escape_text(url.as_str())));
        }

        ics_event
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{DayRecord, EventType, MonthCalendar};

    use super::*;

    fn course(title: &str, url: Option<&str>) -> ConsolidatedEvent {
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        ConsolidatedEvent {
            title: title.into(),
            url: url.map(Into::into),
            start_date: date,
            end_date: date,
            duration_days: None,
            event_type: None,
        }
    }

    /// Unfolded content lines with the given property prefix.
    fn lines_starting_with(ics: &str, prefix: &str) -> Vec<String> {
        ics.replace("\r\n ", "")
            .lines()
            .filter(|line| line.starts_with(prefix))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn same_title_and_day_with_different_links_get_distinct_uids() {
        let first = course("Kurz lezení", Some("https://daily-adventures.cz/eshop/kurz-a/"));
        let second = course("Kurz lezení", Some("https://daily-adventures.cz/eshop/kurz-b/"));
        let first = first.to_ics().to_string();
        let second = second.to_ics().to_string();

        let first_uid = lines_starting_with(&first, "UID:");
        let second_uid = lines_starting_with(&second, "UID:");

        assert_eq!(first_uid.len(), 1);
        assert_eq!(second_uid.len(), 1);
        assert_ne!(first_uid, second_uid);
    }

    #[test]
    fn text_values_are_escaped() {
        let event = course(
            "Lezení; skály, Praha",
            Some("https://daily-adventures.cz/eshop/?a=1,2;b"),
        );
        let ics = event.to_ics().to_string();

        assert_eq!(
            lines_starting_with(&ics, "SUMMARY:"),
            vec![r"SUMMARY:Lezení\; skály\, Praha"]
        );
        assert_eq!(
            lines_starting_with(&ics, "DESCRIPTION:"),
            vec![r"DESCRIPTION:https://daily-adventures.cz/eshop/?a=1\,2\;b"]
        );
    }

    #[test]
    fn exports_all_day_events() {
        let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let document = CalendarDocument {
            months: vec![MonthCalendar {
                date: march,
                days: vec![DayRecord {
                    date: march,
                    events: vec![ConsolidatedEvent {
                        title: "LAVINOVÝ KURZ - JESENÍKY".into(),
                        url: Some("https://daily-adventures.cz/eshop/lavinovy-kurz/".into()),
                        start_date: march,
                        end_date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
                        duration_days: Some(3),
                        event_type: Some(EventType::MultiDay),
                    }],
                }],
            }],
        };

        let ics = document.to_ics().to_string();

        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("DTSTART;VALUE=DATE:20240301"));
        assert!(ics.contains("DTEND;VALUE=DATE:20240304"));
        assert!(ics.contains("SUMMARY:LAVINOVÝ KURZ - JESENÍKY"));
    }
}
