use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WEEK_COUNT: u32 = 4;
/// Longest window a request may ask for; anything above falls back to the default.
pub const MAX_WEEK_COUNT: u32 = 52;

/// The period shown in the report: `week_count` weeks from a Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayWindow {
    starting_day: NaiveDate,
    week_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DisplayWindow {
    /// Build a window starting on the Monday of `starting_day`'s week.
    /// `week_count` is clamped to `1..=MAX_WEEK_COUNT`.
    pub fn new(starting_day: NaiveDate, week_count: u32) -> Self {
        Self {
            starting_day: monday_of(starting_day),
            week_count: week_count.clamp(1, MAX_WEEK_COUNT),
        }
    }

    /// Derive the window from raw request parameters.
    ///
    /// A missing, empty or unparseable `week_start` falls back to the Monday
    /// around the first of `today`'s month. A missing or invalid
    /// `week_count`, or one above [`MAX_WEEK_COUNT`], falls back to
    /// [`DEFAULT_WEEK_COUNT`].
    pub fn resolve(week_start: Option<&str>, week_count: Option<&str>, today: NaiveDate) -> Self {
        let starting_day = week_start
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .map(monday_of)
            .unwrap_or_else(|| default_starting_day(today));

        let week_count = week_count
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|count| (1..=MAX_WEEK_COUNT).contains(count))
            .unwrap_or(DEFAULT_WEEK_COUNT);

        Self {
            starting_day,
            week_count,
        }
    }

    pub fn starting_day(&self) -> NaiveDate {
        self.starting_day
    }

    pub fn week_count(&self) -> u32 {
        self.week_count
    }

    pub fn day_count(&self) -> u32 {
        self.week_count.saturating_mul(7)
    }

    /// Composite cache key for everything scoped to this window.
    pub fn fingerprint(&self) -> String {
        format!("{}__{}", self.starting_day.format("%Y-%m-%d"), self.week_count)
    }

    /// The window's weeks in order. Weeks that would run past the last
    /// representable date are left out.
    pub fn weeks(&self) -> Vec<Week> {
        (0..u64::from(self.week_count))
            .map_while(|i| {
                let start = self.starting_day.checked_add_days(Days::new(i * 7))?;
                let end = start.checked_add_days(Days::new(6))?;
                Some(Week { start, end })
            })
            .collect()
    }

    /// Start of the window week containing `day`, if any.
    pub fn week_containing(&self, day: NaiveDate) -> Option<NaiveDate> {
        if day < self.starting_day {
            return None;
        }
        let index = (day - self.starting_day).num_days() / 7;
        if index >= self.week_count as i64 {
            return None;
        }
        self.starting_day.checked_add_days(Days::new(index as u64 * 7))
    }

    /// The starting day moved by whole weeks, or `None` outside chrono's range.
    pub fn shifted_by_weeks(&self, weeks: i64) -> Option<NaiveDate> {
        let days = Days::new(weeks.unsigned_abs().checked_mul(7)?);
        if weeks >= 0 {
            self.starting_day.checked_add_days(days)
        } else {
            self.starting_day.checked_sub_days(days)
        }
    }
}

pub fn monday_of(day: NaiveDate) -> NaiveDate {
    day.checked_sub_days(Days::new(day.weekday().num_days_from_monday() as u64))
        .unwrap_or(day)
}

/// Monday of the week holding the 1st of the month, unless the 1st falls on a
/// weekend, in which case the first Monday of the month.
pub fn default_starting_day(today: NaiveDate) -> NaiveDate {
    let first = today.with_day(1).unwrap_or(today);
    match first.weekday() {
        Weekday::Sat => first + Days::new(2),
        Weekday::Sun => first + Days::new(1),
        _ => monday_of(first),
    }
}
