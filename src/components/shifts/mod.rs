//! Shift lookup and booking against the GoCab API.

mod api;
mod matcher;
pub mod models;
mod service;

pub use api::{server_message, ApiClient, COMMON_SHIFTS_PATH, CREATE_BOOKING_PATH};
pub use matcher::{LookupTicket, MatchPhase, ShiftMatcher};
pub use models::{
    BookingRequest, CommonShiftsRequest, CommonShiftsResponse, Direction, MatchOutcome, ShiftId,
    ShiftOption,
};
pub use service::ShiftService;
