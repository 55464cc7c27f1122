use crate::components::calendar::{CalendarDay, HolidaySource, NoHolidays, SelectionMode};
use crate::components::shifts::{Direction, MatchPhase, ShiftId, ShiftOption};
use crate::config::Config;
use crate::error::BookingResult;
use crate::utils::time::today_in;
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Where the screen takes "today" from
#[derive(Debug, Clone, Copy)]
pub enum Today {
    /// A fixed date, for previews and tests
    Fixed(NaiveDate),
    /// The current date in a timezone
    In(Tz),
}

impl Today {
    pub fn date(&self) -> NaiveDate {
        match self {
            Today::Fixed(date) => *date,
            Today::In(tz) => today_in(tz),
        }
    }
}

/// Settings for one booking screen
#[derive(Debug, Clone)]
pub struct ScreenOptions {
    pub today: Today,
    pub holidays: Arc<dyn HolidaySource>,
    pub request_timeout: Duration,
    pub mode: SelectionMode,
    pub direction: Direction,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            today: Today::In(Tz::UTC),
            holidays: Arc::new(NoHolidays),
            request_timeout: Duration::from_secs(crate::config::DEFAULT_REQUEST_TIMEOUT_SECS),
            mode: SelectionMode::default(),
            direction: Direction::default(),
        }
    }
}

impl ScreenOptions {
    /// Options derived from the loaded configuration
    pub fn from_config(config: &Config) -> BookingResult<Self> {
        let holidays: Arc<dyn HolidaySource> = if config.holidays.is_empty() {
            Arc::new(NoHolidays)
        } else {
            Arc::new(crate::components::calendar::StaticHolidays::new(
                config.holidays.iter().copied(),
            ))
        };

        Ok(Self {
            today: Today::In(config.tz()?),
            holidays,
            request_timeout: config.request_timeout(),
            ..Self::default()
        })
    }
}

/// Everything the booking screen renders
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScreenSnapshot {
    pub phase: MatchPhase,
    pub mode: SelectionMode,
    pub direction: Direction,
    pub calendar: Vec<CalendarDay>,
    pub selected_dates: Vec<NaiveDate>,
    pub range_anchor: Option<NaiveDate>,
    pub shifts: Vec<ShiftOption>,
    pub selected_shift: Option<ShiftId>,
    pub matched_dates: Vec<NaiveDate>,
    /// Non-fatal problem to show the employee, e.g. a failed lookup
    pub last_alert: Option<String>,
}

impl ScreenSnapshot {
    /// No request in flight
    pub fn is_settled(&self) -> bool {
        !matches!(self.phase, MatchPhase::Loading | MatchPhase::Submitting)
    }

    pub fn selected_shift_option(&self) -> Option<&ShiftOption> {
        let id = self.selected_shift.as_ref()?;
        self.shifts.iter().find(|s| &s.shift_id == id)
    }

    /// Confirmation line for the booking, once there is something to book
    pub fn summary(&self) -> Option<String> {
        if self.matched_dates.is_empty() {
            return None;
        }
        let direction = self.direction.label();
        let count = self.matched_dates.len();

        Some(match self.selected_shift_option() {
            Some(shift) => t!(
                "summary.line",
                direction = direction,
                count = count,
                time = shift.shift_time.as_str()
            )
            .to_string(),
            None => t!("summary.no_shift", direction = direction, count = count).to_string(),
        })
    }
}
