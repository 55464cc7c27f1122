use super::holidays::{HolidaySource, NoHolidays};
use super::models::{CalendarDay, SelectionMode, SelectionState};
use crate::utils::time::{days_inclusive, is_weekend, one_month_after};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

/// Booking window and selection rules for a given day.
///
/// The window runs from `today` through the same day next month. Weekends
/// and holidays inside it cannot be selected.
#[derive(Debug, Clone)]
pub struct DateRangeSelector {
    today: NaiveDate,
    holidays: Arc<dyn HolidaySource>,
}

impl DateRangeSelector {
    /// Selector without any holidays
    pub fn new(today: NaiveDate) -> Self {
        Self::with_holidays(today, Arc::new(NoHolidays))
    }

    /// Selector that also blocks the days reported by `holidays`
    pub fn with_holidays(today: NaiveDate, holidays: Arc<dyn HolidaySource>) -> Self {
        Self { today, holidays }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Last day of the booking window, inclusive
    pub fn window_end(&self) -> NaiveDate {
        one_month_after(&self.today)
    }

    pub fn in_window(&self, date: &NaiveDate) -> bool {
        *date >= self.today && *date <= self.window_end()
    }

    /// Whether a tap on `date` may change the selection
    pub fn is_selectable(&self, date: &NaiveDate) -> bool {
        self.in_window(date) && !is_weekend(date) && !self.holidays.is_holiday(date)
    }

    /// Calendar days of the window, flagged against the current selection
    pub fn generate_window(&self, state: &SelectionState) -> Vec<CalendarDay> {
        let in_range_mode = state.mode == SelectionMode::Range;

        days_inclusive(self.today, self.window_end())
            .map(|date| {
                let is_selected = state.contains(&date);
                CalendarDay {
                    date,
                    is_weekend: is_weekend(&date),
                    is_holiday: self.holidays.is_holiday(&date),
                    is_selected,
                    is_range_anchor: state.range_anchor == Some(date),
                    is_in_range: in_range_mode && is_selected,
                }
            })
            .collect()
    }

    /// Apply a tap on `date` and return the new selection
    pub fn select_date(&self, date: NaiveDate, state: &SelectionState) -> SelectionState {
        if !self.is_selectable(&date) {
            debug!("Ignoring tap on non-selectable date {}", date);
            return state.clone();
        }

        match state.mode {
            SelectionMode::Single => SelectionState {
                mode: SelectionMode::Single,
                dates: vec![date],
                range_anchor: None,
            },
            SelectionMode::Multiple => {
                let mut dates = state.dates.clone();
                if let Some(pos) = dates.iter().position(|d| *d == date) {
                    dates.remove(pos);
                } else {
                    dates.push(date);
                }
                SelectionState {
                    mode: SelectionMode::Multiple,
                    dates,
                    range_anchor: None,
                }
            }
            SelectionMode::Range => match state.range_anchor {
                None => SelectionState {
                    mode: SelectionMode::Range,
                    dates: vec![date],
                    range_anchor: Some(date),
                },
                Some(anchor) => SelectionState {
                    mode: SelectionMode::Range,
                    dates: self.expand_range(anchor, date),
                    range_anchor: None,
                },
            },
        }
    }

    /// Switch selection mode, carrying over what the new mode allows
    pub fn set_mode(&self, mode: SelectionMode, state: &SelectionState) -> SelectionState {
        if mode == state.mode {
            return state.clone();
        }

        match mode {
            SelectionMode::Single => SelectionState {
                mode,
                dates: state.dates.first().copied().into_iter().collect(),
                range_anchor: None,
            },
            SelectionMode::Multiple => SelectionState {
                mode,
                dates: state.dates.clone(),
                range_anchor: None,
            },
            SelectionMode::Range => SelectionState::new(mode),
        }
    }

    /// Selectable days between two endpoints, in either order
    fn expand_range(&self, a: NaiveDate, b: NaiveDate) -> Vec<NaiveDate> {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        days_inclusive(start, end)
            .filter(|date| !is_weekend(date) && !self.holidays.is_holiday(date))
            .collect()
    }
}
