use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use log::{debug, warn};

use crate::duration::DurationResolver;
use crate::fetch::DetailPageFetcher;
use crate::{ConsolidatedEvent, DayRecord, EventIdentity, EventType};

/// Maximal inclusive interval of consecutive dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRun {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRun {
    pub fn calendar_length(&self) -> u32 {
        u32::try_from((self.end - self.start).num_days() + 1).unwrap_or(u32::MAX)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |date| *date <= end)
    }
}

/// Splits `dates` into maximal runs of consecutive days, in date order.
pub fn date_runs(dates: &[NaiveDate]) -> Vec<DateRun> {
    let mut dates = dates.to_vec();
    dates.sort_unstable();
    dates.dedup();

    let mut runs: Vec<DateRun> = Vec::new();
    for date in dates {
        match runs.last_mut() {
            Some(run) if run.end.succ_opt() == Some(date) => run.end = date,
            _ => runs.push(DateRun {
                start: date,
                end: date,
            }),
        }
    }

    runs
}

/// Decides how a run is emitted from the event's actual duration (if known)
/// and the number of calendar days it covers.
pub fn classify(actual_days: Option<u32>, calendar_length: u32) -> EventType {
    match (actual_days, calendar_length) {
        (Some(1), length) if length > 1 => EventType::RepeatedSingleDay,
        (Some(days), _) if days > 1 => EventType::MultiDay,
        (_, 1) => EventType::SingleDay,
        // Unknown duration spanning several days: assume one long event.
        (_, _) => EventType::MultiDay,
    }
}

fn emissions(identity: &EventIdentity, run: DateRun, event_type: EventType) -> Vec<ConsolidatedEvent> {
    let event = |start_date, end_date, duration_days, event_type| ConsolidatedEvent {
        title: identity.title.clone(),
        url: identity.url.clone(),
        start_date,
        end_date,
        duration_days,
        event_type,
    };

    let length = run.calendar_length();
    match event_type {
        EventType::RepeatedSingleDay => run
            .dates()
            .map(|date| event(date, date, None, Some(event_type)))
            .collect(),
        EventType::MultiDay | EventType::SingleDay => {
            let spans_days = length > 1;
            vec![event(
                run.start,
                run.end,
                spans_days.then_some(length),
                spans_days.then_some(event_type),
            )]
        }
    }
}

/// Collapses per-day occurrences of the same event into date ranges.
///
/// Returns the input days in the same order with their events replaced.
/// A multi-day event is listed only on its first day. Events sharing a day
/// keep the order in which that day listed them.
pub async fn consolidate<F: DetailPageFetcher>(
    days: Vec<DayRecord>,
    resolver: &mut DurationResolver<'_, F>,
) -> Vec<DayRecord<ConsolidatedEvent>> {
    let mut identities: Vec<(EventIdentity, Vec<NaiveDate>)> = Vec::new();
    let mut index: HashMap<EventIdentity, usize> = HashMap::new();
    let mut positions: HashMap<(usize, NaiveDate), usize> = HashMap::new();

    for day in &days {
        for (position, event) in day.events.iter().enumerate() {
            let identity = EventIdentity::from(event);
            let id = *index.entry(identity.clone()).or_insert_with(|| {
                identities.push((identity, Vec::new()));
                identities.len() - 1
            });

            identities[id].1.push(day.date);
            positions.entry((id, day.date)).or_insert(position);
        }
    }

    let mut emitted: HashMap<NaiveDate, Vec<(usize, ConsolidatedEvent)>> = HashMap::new();
    let mut processed: HashSet<(usize, NaiveDate)> = HashSet::new();

    for (id, (identity, dates)) in identities.iter().enumerate() {
        let actual_days = resolver.resolve(identity.url.as_deref()).await;

        for run in date_runs(dates) {
            let event_type = classify(actual_days, run.calendar_length());
            debug!(
                "{:?}: {} - {} ({} days, actual {actual_days:?}) -> {event_type:?}",
                identity.title,
                run.start,
                run.end,
                run.calendar_length()
            );

            for event in emissions(identity, run, event_type) {
                if !processed.insert((id, event.start_date)) {
                    warn!(
                        "Skipping duplicate emission of {:?} on {}",
                        identity.title, event.start_date
                    );
                    continue;
                }

                let position = positions
                    .get(&(id, event.start_date))
                    .copied()
                    .unwrap_or(usize::MAX);

                emitted
                    .entry(event.start_date)
                    .or_default()
                    .push((position, event));
            }
        }
    }

    days.into_iter()
        .map(|day| {
            let mut events = emitted.remove(&day.date).unwrap_or_default();
            events.sort_by_key(|(position, _)| *position);

            DayRecord {
                date: day.date,
                events: events.into_iter().map(|(_, event)| event).collect(),
            }
        })
        .collect()
}
