//! Date window for building event spans.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::error::{SchaukastenError, SchaukastenResult};

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    start: NaiveDate,
    end: NaiveDate,
}

impl Window {
    pub fn new(start: NaiveDate, end: NaiveDate) -> SchaukastenResult<Self> {
        if start > end {
            return Err(SchaukastenError::InvalidWindow(format!(
                "{} is after {}",
                start, end
            )));
        }
        Ok(Window { start, end })
    }

    /// Monday to Sunday of the ISO week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let start = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
        Window {
            start,
            end: start + Duration::days(6),
        }
    }

    /// Monday to Sunday of ISO week `week` in ISO year `year`.
    pub fn iso_week(year: i32, week: u32) -> SchaukastenResult<Self> {
        let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).ok_or_else(|| {
            SchaukastenError::InvalidWindow(format!("{} has no ISO week {}", year, week))
        })?;
        Ok(Self::week_of(monday))
    }

    /// Parse `YYYY-MM-DD` bounds.
    pub fn from_args(from: &str, to: &str) -> SchaukastenResult<Self> {
        Self::new(parse_date(from)?, parse_date(to)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// First instant of the window as a wall-clock value.
    pub fn start_of_day(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Last second of the window as a wall-clock value.
    pub fn end_of_day(&self) -> NaiveDateTime {
        self.end.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// ISO year and week of the window's first day.
    pub fn iso_week_number(&self) -> (i32, u32) {
        let week = self.start.iso_week();
        (week.year(), week.week())
    }
}

fn parse_date(s: &str) -> SchaukastenResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        SchaukastenError::InvalidWindow(format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
    })
}
