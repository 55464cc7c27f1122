use crate::error::{config_error, Error};
use crate::utils::time::join_dates;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Booking direction, sent to the API as `log_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Home to office
    #[default]
    #[serde(alias = "login")]
    In,
    /// Office to home
    #[serde(alias = "logout")]
    Out,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }

    /// Localized name shown in summaries
    pub fn label(&self) -> String {
        match self {
            Direction::In => t!("direction.in").to_string(),
            Direction::Out => t!("direction.out").to_string(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" | "login" => Ok(Direction::In),
            "out" | "logout" => Ok(Direction::Out),
            other => Err(config_error(&format!("Unknown direction: {}", other))),
        }
    }
}

/// Shift identifier as issued by the API. Numeric on current servers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShiftId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftId::Number(n) => write!(f, "{}", n),
            ShiftId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ShiftId {
    fn from(id: i64) -> Self {
        ShiftId::Number(id)
    }
}

impl FromStr for ShiftId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<i64>() {
            Ok(n) => ShiftId::Number(n),
            Err(_) => ShiftId::Text(s.trim().to_string()),
        })
    }
}

/// A shift offered for the selected dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftOption {
    pub shift_id: ShiftId,
    pub shift_time: String,
    pub pickup_type: String,
}

/// Body of `POST /employee/common-shifts/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonShiftsRequest {
    pub dates: Vec<NaiveDate>,
    pub log_type: Direction,
}

/// Reply of `POST /employee/common-shifts/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonShiftsResponse {
    #[serde(default)]
    pub shifts: Vec<ShiftOption>,
    /// Selected dates that have one of the shifts available
    #[serde(default)]
    pub your_dates: Vec<NaiveDate>,
}

/// Body of `POST /employee/create_booking/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub shift_id: ShiftId,
    /// Comma separated YYYY-MM-DD dates
    pub dates: String,
}

impl BookingRequest {
    /// Build a request from the dates the service confirmed
    pub(crate) fn from_matched(shift_id: ShiftId, matched_dates: &[NaiveDate]) -> Self {
        Self {
            shift_id,
            dates: join_dates(matched_dates),
        }
    }
}

/// Result of a shift lookup as held by the matcher
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub shifts: Vec<ShiftOption>,
    pub matched_dates: Vec<NaiveDate>,
}
