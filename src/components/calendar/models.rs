use crate::error::{config_error, Error};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How taps on the calendar change the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// One date at a time
    Single,
    /// Any number of discrete dates, toggled on tap
    #[default]
    Multiple,
    /// A contiguous range between two tapped dates
    Range,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SelectionMode::Single => "single",
            SelectionMode::Multiple => "multiple",
            SelectionMode::Range => "range",
        };
        f.write_str(name)
    }
}

impl FromStr for SelectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(SelectionMode::Single),
            "multiple" | "multi" => Ok(SelectionMode::Multiple),
            "range" => Ok(SelectionMode::Range),
            other => Err(config_error(&format!("Unknown selection mode: {}", other))),
        }
    }
}

/// Dates picked on the booking calendar.
///
/// Dates are distinct. In `Single` mode there is at most one; in `Range` mode
/// a completed range is chronological and the anchor is cleared. `Multiple`
/// keeps tap order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub(crate) mode: SelectionMode,
    pub(crate) dates: Vec<NaiveDate>,
    pub(crate) range_anchor: Option<NaiveDate>,
}

impl SelectionState {
    /// Empty selection in the given mode
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            dates: Vec::new(),
            range_anchor: None,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// First endpoint of a range still waiting for its second tap
    pub fn range_anchor(&self) -> Option<NaiveDate> {
        self.range_anchor
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.dates.contains(date)
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Same mode, nothing selected
    pub fn cleared(&self) -> Self {
        Self::new(self.mode)
    }
}

/// One day of the booking window as shown on the calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub is_selected: bool,
    pub is_range_anchor: bool,
    pub is_in_range: bool,
}

impl CalendarDay {
    /// Whether a tap on this day can change the selection
    pub fn is_selectable(&self) -> bool {
        !self.is_weekend && !self.is_holiday
    }

    /// Day of month, as printed in the calendar grid
    pub fn display(&self) -> u32 {
        self.date.day()
    }
}
