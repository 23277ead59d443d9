use std::fmt::{Display, Formatter};

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use crate::ValidationError;

/// Closed calendar interval `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: Date,
    to: Date,
}

impl DateRange {
    pub fn new(from: Date, to: Date) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::InvertedDateRange {
                from: iso_date(from),
                to: iso_date(to),
            });
        }
        Ok(Self { from, to })
    }

    /// Range ending at `to` and covering `days` calendar days. Zero counts as one.
    pub fn lookback(to: Date, days: u32) -> Result<Self, ValidationError> {
        let span = i64::from(days.max(1) - 1);
        let from = to
            .checked_sub(Duration::days(span))
            .ok_or(ValidationError::LookbackOutOfRange { days })?;
        Ok(Self { from, to })
    }

    /// Current UTC calendar day.
    pub fn today() -> Date {
        OffsetDateTime::now_utc().date()
    }

    pub const fn from(&self) -> Date {
        self.from
    }

    pub const fn to(&self) -> Date {
        self.to
    }

    /// Every day in the range, oldest first.
    pub fn days(&self) -> impl Iterator<Item = Date> {
        let to = self.to;
        std::iter::successors(Some(self.from), move |day| {
            day.next_day().filter(|next| *next <= to)
        })
    }

    pub fn day_count(&self) -> usize {
        self.days().count()
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", iso_date(self.from), iso_date(self.to))
    }
}

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const DMY_DASHED: &[BorrowedFormatItem<'static>] = format_description!("[day]-[month]-[year]");
const YMD_COMPACT: &[BorrowedFormatItem<'static>] = format_description!("[year][month][day]");

/// `yyyy-mm-dd`
pub fn iso_date(date: Date) -> String {
    render(date, ISO_DATE)
}

/// `dd-mm-yyyy`
pub fn dmy_dashed(date: Date) -> String {
    render(date, DMY_DASHED)
}

/// `yyyymmdd`
pub fn ymd_compact(date: Date) -> String {
    render(date, YMD_COMPACT)
}

// Date-only descriptions always format a `Date`.
fn render(date: Date, format: &[BorrowedFormatItem<'_>]) -> String {
    date.format(format)
        .unwrap_or_else(|_| String::from("<unformattable>"))
}

#[cfg(test)]
mod tests {
    use time::Month;

    use super::*;

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).expect("valid date")
    }

    #[test]
    fn lookback_of_one_day_is_a_single_day() {
        let today = date(2026, Month::October, 14);
        let range = DateRange::lookback(today, 1).expect("range");
        assert_eq!(range.from(), today);
        assert_eq!(range.day_count(), 1);
    }

    #[test]
    fn zero_lookback_is_clamped_to_one_day() {
        let today = date(2026, Month::October, 14);
        let range = DateRange::lookback(today, 0).expect("range");
        assert_eq!(range.from(), today);
    }

    #[test]
    fn days_cross_month_boundaries() {
        let range = DateRange::lookback(date(2026, Month::March, 2), 3).expect("range");
        let days = range.days().map(iso_date).collect::<Vec<_>>();
        assert_eq!(days, vec!["2026-02-28", "2026-03-01", "2026-03-02"]);
    }

    #[test]
    fn rejects_inverted_range() {
        let err = DateRange::new(date(2026, Month::May, 2), date(2026, Month::May, 1))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvertedDateRange { .. }));
    }

    #[test]
    fn renders_source_specific_formats() {
        let day = date(2026, Month::January, 5);
        assert_eq!(iso_date(day), "2026-01-05");
        assert_eq!(dmy_dashed(day), "05-01-2026");
        assert_eq!(ymd_compact(day), "20260105");
    }

    #[test]
    fn formats_pad_day_month_and_year() {
        let day = date(987, Month::December, 31);
        assert_eq!(iso_date(day), "0987-12-31");
        assert_eq!(dmy_dashed(day), "31-12-0987");
        assert_eq!(ymd_compact(day), "09871231");
    }

    #[test]
    fn display_uses_iso_bounds() {
        let range =
            DateRange::new(date(2026, Month::October, 13), date(2026, Month::October, 14)).expect("range");
        assert_eq!(range.to_string(), "2026-10-13 to 2026-10-14");
    }
}
