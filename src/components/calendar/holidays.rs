use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt::Debug;

/// Source of non-bookable days besides weekends
pub trait HolidaySource: Debug + Send + Sync {
    /// Whether the given date is a holiday
    fn is_holiday(&self, date: &NaiveDate) -> bool;
}

/// No holidays at all. Used when nothing else is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidaySource for NoHolidays {
    fn is_holiday(&self, _date: &NaiveDate) -> bool {
        false
    }
}

/// Fixed list of holiday dates, typically read from the config file
#[derive(Debug, Clone, Default)]
pub struct StaticHolidays {
    dates: BTreeSet<NaiveDate>,
}

impl StaticHolidays {
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }
}

impl HolidaySource for StaticHolidays {
    fn is_holiday(&self, date: &NaiveDate) -> bool {
        self.dates.contains(date)
    }
}
