use super::models::{BookingRequest, CommonShiftsRequest, CommonShiftsResponse};
use crate::error::BookingResult;
use async_trait::async_trait;

/// Authenticated access to the shift and booking endpoints.
///
/// Implementations carry the employee's session; callers never see the token.
#[async_trait]
pub trait ShiftService: Send + Sync {
    /// Shifts shared by all the given dates, and which of the dates have them
    async fn common_shifts(&self, request: &CommonShiftsRequest) -> BookingResult<CommonShiftsResponse>;

    /// Book a shift for the given dates
    async fn create_booking(&self, request: &BookingRequest) -> BookingResult<()>;
}
