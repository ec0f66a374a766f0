//! Calendar-window math for report periods.

use chrono::{Datelike, Duration, NaiveDate};

/// One report period: a calendar month identified as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportPeriod {
    year: i32,
    month: u32,
}

impl ReportPeriod {
    /// Builds a period; `None` unless `month` is 1–12 and the year is in a
    /// range chrono can represent as dates.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// Parses a `"YYYY-MM"` label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let (y, m) = label.split_once('-')?;
        if y.len() != 4 || m.len() != 2 {
            return None;
        }
        Self::new(y.parse().ok()?, m.parse().ok()?)
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The `YYYY-MM` label used as the persistence key and series tag.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// The immediately preceding calendar month.
    #[must_use]
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The same calendar month one year earlier.
    #[must_use]
    pub fn year_ago(&self) -> Self {
        Self {
            year: self.year - 1,
            month: self.month,
        }
    }

    /// The period `n` months before this one (`n = 0` is this period).
    #[must_use]
    pub fn months_back(&self, n: u32) -> Self {
        #[allow(clippy::cast_possible_wrap)]
        let total = self.year * 12 + (self.month as i32 - 1) - n as i32;
        #[allow(clippy::cast_sign_loss)]
        Self {
            year: total.div_euclid(12),
            month: (total.rem_euclid(12) + 1) as u32,
        }
    }

    /// First calendar day of the month.
    ///
    /// # Panics
    ///
    /// Never panics: construction guarantees a representable date.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("validated at construction")
    }

    /// Last calendar day of the month.
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day() - Duration::days(1)
    }

    fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Every calendar day of the month, ascending.
    #[must_use]
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days = Vec::with_capacity(31);
        let mut day = self.first_day();
        let last = self.last_day();
        while day <= last {
            days.push(day);
            day += Duration::days(1);
        }
        days
    }

    /// True when `date` falls inside this calendar month.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
