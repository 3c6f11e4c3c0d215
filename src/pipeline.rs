use chrono::{Datelike, Days, NaiveDate};
use log::info;

use crate::consolidate::consolidate;
use crate::duration::DurationResolver;
use crate::error::{Error, Result};
use crate::fetch::{DetailPageFetcher, MonthGridFetcher};
use crate::parser::parse_month;
use crate::site::SiteConfig;
use crate::utils::MonthRange;
use crate::{CalendarDocument, MonthCalendar};

/// End of the scraped period: half a year ahead, but at least until
/// December of the current year.
pub fn horizon(today: NaiveDate) -> NaiveDate {
    let half_year = today + Days::new(365 / 2);
    let december = today.with_month(12).unwrap_or(half_year);
    half_year.max(december)
}

/// Months from `start`'s month up to the horizon computed from `today`.
pub fn months(start: NaiveDate, today: NaiveDate) -> MonthRange {
    MonthRange::new(start, horizon(today))
}

/// Fetches, parses and consolidates every month, sharing one duration
/// cache across the run. The first failing month aborts the run.
pub async fn build_document<C, M>(client: &C, site: &SiteConfig, months: M) -> Result<CalendarDocument>
where
    C: MonthGridFetcher + DetailPageFetcher,
    M: IntoIterator<Item = NaiveDate>,
{
    let mut resolver = DurationResolver::new(client, site);
    let mut document = CalendarDocument::default();

    for month in months {
        info!("Retrieving events for {month}");

        let markup = client
            .fetch_month_grid(month)
            .await
            .map_err(|source| Error::Fetch { month, source })?;

        let days = parse_month(&markup, month, site).map_err(|source| Error::Parse { month, source })?;
        let days = consolidate(days, &mut resolver).await;

        document.months.push(MonthCalendar { date: month, days });
    }

    info!(
        "Collected {} events, {} detail pages looked up",
        document.events().count(),
        resolver.cache().len()
    );

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn horizon_reaches_december_or_half_a_year() {
        assert_eq!(horizon(date(2024, 3, 9)), date(2024, 12, 9));
        assert_eq!(horizon(date(2024, 10, 18)), date(2025, 4, 18));
        assert_eq!(horizon(date(2024, 12, 31)), date(2025, 7, 1));
    }

    #[test]
    fn months_cover_horizon() {
        let months = months(date(2024, 3, 9), date(2024, 3, 9)).collect::<Vec<_>>();

        assert_eq!(months.len(), 10);
        assert_eq!(months[0], date(2024, 3, 1));
        assert_eq!(months[9], date(2024, 12, 1));
    }
}
