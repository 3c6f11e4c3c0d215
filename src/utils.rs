use std::mem;

use chrono::{Datelike, Days, NaiveDate};

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

pub fn next_month(date: NaiveDate) -> NaiveDate {
    first_of_month(first_of_month(date) + Days::new(32))
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    (next_month(date) - Days::new(1)).day()
}

/// First days of consecutive months, from `start`'s month while before `end`.
pub struct MonthRange(NaiveDate, NaiveDate);

impl MonthRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self(first_of_month(start), end)
    }
}

impl Iterator for MonthRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 < self.1 {
            let next = next_month(self.0);
            Some(mem::replace(&mut self.0, next))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_arithmetic() {
        assert_eq!(first_of_month(date(2024, 3, 17)), date(2024, 3, 1));
        assert_eq!(next_month(date(2024, 1, 31)), date(2024, 2, 1));
        assert_eq!(next_month(date(2024, 12, 5)), date(2025, 1, 1));
        assert_eq!(days_in_month(date(2024, 2, 10)), 29);
        assert_eq!(days_in_month(date(2023, 2, 1)), 28);
        assert_eq!(days_in_month(date(2024, 3, 1)), 31);
        assert_eq!(days_in_month(date(2024, 4, 30)), 30);
    }

    #[test]
    fn month_range_stops_before_end() {
        let months = MonthRange::new(date(2024, 10, 18), date(2025, 1, 1)).collect::<Vec<_>>();
        assert_eq!(
            months,
            vec![date(2024, 10, 1), date(2024, 11, 1), date(2024, 12, 1)]
        );

        let months = MonthRange::new(date(2024, 10, 18), date(2025, 1, 2)).collect::<Vec<_>>();
        assert_eq!(months.last(), Some(&date(2025, 1, 1)));
    }
}
