use super::models::{
    BookingRequest, CommonShiftsRequest, CommonShiftsResponse, Direction, MatchOutcome, ShiftId,
    ShiftOption,
};
use super::service::ShiftService;
use crate::error::{BookingResult, Error, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where the matcher is in the lookup/booking cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// Nothing selected
    #[default]
    Idle,
    /// Waiting for the shift lookup
    Loading,
    /// Shifts available, the first one preselected
    Ready,
    /// The lookup found no shift for the selection
    NoMatch,
    /// The last lookup failed; new selections retry it
    Failed,
    /// Booking request in flight
    Submitting,
}

/// A lookup that has been issued but not applied yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub seq: u64,
    pub request: CommonShiftsRequest,
}

/// Narrows a date selection to the dates a common shift exists for, and
/// books the chosen shift on exactly those dates.
///
/// Every lookup carries a sequence number. Only the response to the most
/// recently issued lookup is applied, so a slow reply for an older selection
/// can never overwrite a newer one.
pub struct ShiftMatcher {
    service: Arc<dyn ShiftService>,
    timeout: Duration,
    shifts: Vec<ShiftOption>,
    selected_shift: Option<ShiftId>,
    matched_dates: Vec<NaiveDate>,
    phase: MatchPhase,
    phase_before_submit: MatchPhase,
    latest_seq: u64,
}

impl std::fmt::Debug for ShiftMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShiftMatcher")
            .field("phase", &self.phase)
            .field("shift_count", &self.shifts.len())
            .field("selected_shift", &self.selected_shift)
            .field("matched_dates", &self.matched_dates)
            .field("latest_seq", &self.latest_seq)
            .finish()
    }
}

impl ShiftMatcher {
    pub fn new(service: Arc<dyn ShiftService>, timeout: Duration) -> Self {
        Self {
            service,
            timeout,
            shifts: Vec::new(),
            selected_shift: None,
            matched_dates: Vec::new(),
            phase: MatchPhase::Idle,
            phase_before_submit: MatchPhase::Idle,
            latest_seq: 0,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn shifts(&self) -> &[ShiftOption] {
        &self.shifts
    }

    pub fn selected_shift(&self) -> Option<&ShiftId> {
        self.selected_shift.as_ref()
    }

    /// Full details of the selected shift
    pub fn selected_shift_option(&self) -> Option<&ShiftOption> {
        let id = self.selected_shift.as_ref()?;
        self.shifts.iter().find(|s| &s.shift_id == id)
    }

    pub fn matched_dates(&self) -> &[NaiveDate] {
        &self.matched_dates
    }

    /// Sequence number of the most recently issued lookup
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn outcome(&self) -> MatchOutcome {
        MatchOutcome {
            shifts: self.shifts.clone(),
            matched_dates: self.matched_dates.clone(),
        }
    }

    /// Drop shifts and matched dates and supersede any lookup in flight
    pub fn reset(&mut self) {
        self.latest_seq += 1;
        self.clear();
        self.phase = MatchPhase::Idle;
    }

    fn clear(&mut self) {
        self.shifts.clear();
        self.selected_shift = None;
        self.matched_dates.clear();
    }

    /// Issue a lookup for the current selection.
    ///
    /// Returns `None` when nothing is selected; the matcher is cleared and no
    /// request is needed. Any earlier ticket becomes stale either way.
    pub fn begin_refresh(
        &mut self,
        selected_dates: &[NaiveDate],
        direction: Direction,
    ) -> Option<LookupTicket> {
        self.latest_seq += 1;

        if selected_dates.is_empty() {
            debug!("Selection empty, skipping shift lookup");
            self.clear();
            self.phase = MatchPhase::Idle;
            return None;
        }

        // Matched dates belong to the previous selection until the reply lands
        self.matched_dates.clear();
        self.phase = MatchPhase::Loading;
        Some(LookupTicket {
            seq: self.latest_seq,
            request: CommonShiftsRequest {
                dates: selected_dates.to_vec(),
                log_type: direction,
            },
        })
    }

    /// The request for a ticket, detached from the matcher so it can be spawned
    pub fn lookup(
        &self,
        ticket: LookupTicket,
    ) -> impl Future<Output = (u64, BookingResult<CommonShiftsResponse>)> + Send + 'static {
        let service = Arc::clone(&self.service);
        let timeout = self.timeout;

        async move {
            debug!(
                "Looking up shifts #{} for {} date(s), direction {}",
                ticket.seq,
                ticket.request.dates.len(),
                ticket.request.log_type
            );
            let result = with_timeout(timeout, service.common_shifts(&ticket.request)).await;
            (ticket.seq, result)
        }
    }

    /// Apply a lookup response.
    ///
    /// Returns `Ok(false)` when the response belongs to a superseded lookup and
    /// was discarded. A failed current lookup clears all shift state.
    pub fn apply_lookup(
        &mut self,
        seq: u64,
        result: BookingResult<CommonShiftsResponse>,
    ) -> BookingResult<bool> {
        if seq != self.latest_seq {
            debug!("Discarding stale shift lookup #{} (latest is #{})", seq, self.latest_seq);
            return Ok(false);
        }

        match result {
            Ok(response) => {
                self.selected_shift = response.shifts.first().map(|s| s.shift_id.clone());
                self.phase = if response.shifts.is_empty() {
                    MatchPhase::NoMatch
                } else {
                    MatchPhase::Ready
                };
                info!(
                    "Shift lookup #{}: {} shift(s), {} matched date(s)",
                    seq,
                    response.shifts.len(),
                    response.your_dates.len()
                );
                self.shifts = response.shifts;
                self.matched_dates = response.your_dates;
                Ok(true)
            }
            Err(e) => {
                warn!("Shift lookup #{} failed: {}", seq, e);
                self.clear();
                self.phase = MatchPhase::Failed;
                Err(e)
            }
        }
    }

    /// Look up shifts for the selection and apply the response
    pub async fn refresh(
        &mut self,
        selected_dates: &[NaiveDate],
        direction: Direction,
    ) -> BookingResult<MatchOutcome> {
        if let Some(ticket) = self.begin_refresh(selected_dates, direction) {
            let (seq, result) = self.lookup(ticket).await;
            self.apply_lookup(seq, result)?;
        }
        Ok(self.outcome())
    }

    /// Choose one of the offered shifts
    pub fn select_shift(&mut self, shift_id: &ShiftId) -> BookingResult<()> {
        if !self.shifts.iter().any(|s| &s.shift_id == shift_id) {
            return Err(ValidationError::UnknownShift(shift_id.to_string()).into());
        }
        self.selected_shift = Some(shift_id.clone());
        Ok(())
    }

    /// Check the booking preconditions and build the request.
    ///
    /// The request only ever carries dates matched for the current selection,
    /// so nothing can be booked while a lookup is still pending.
    pub fn booking_request(&self, selected_dates: &[NaiveDate]) -> BookingResult<BookingRequest> {
        if selected_dates.is_empty() {
            return Err(ValidationError::NoDatesSelected.into());
        }
        if self.phase == MatchPhase::Loading {
            return Err(ValidationError::NoMatchedDates.into());
        }
        let shift_id = self
            .selected_shift
            .clone()
            .ok_or(ValidationError::NoShiftSelected)?;
        if self.matched_dates.is_empty() {
            return Err(ValidationError::NoMatchedDates.into());
        }
        Ok(BookingRequest::from_matched(shift_id, &self.matched_dates))
    }

    /// Validate and enter the `Submitting` phase
    pub fn start_submission(&mut self, selected_dates: &[NaiveDate]) -> BookingResult<BookingRequest> {
        if self.phase == MatchPhase::Submitting {
            return Err(ValidationError::SubmissionInProgress.into());
        }
        let request = self.booking_request(selected_dates)?;
        self.phase_before_submit = self.phase;
        self.phase = MatchPhase::Submitting;
        Ok(request)
    }

    /// The booking request, detached from the matcher so it can be spawned
    pub fn submission(
        &self,
        request: BookingRequest,
    ) -> impl Future<Output = BookingResult<()>> + Send + 'static {
        let service = Arc::clone(&self.service);
        let timeout = self.timeout;

        async move {
            info!(
                "Submitting booking for shift {} on {}",
                request.shift_id, request.dates
            );
            with_timeout(timeout, service.create_booking(&request)).await
        }
    }

    /// Leave the `Submitting` phase.
    ///
    /// Success resets the matcher; failure restores the previous state so the
    /// booking can be retried.
    pub fn finish_submission(&mut self, result: &BookingResult<()>) {
        match result {
            Ok(()) => {
                info!("Booking confirmed");
                self.reset();
            }
            Err(e) => {
                warn!("Booking failed: {}", e);
                self.phase = self.phase_before_submit;
            }
        }
    }

    /// Book the selected shift on the matched dates
    pub async fn submit(&mut self, selected_dates: &[NaiveDate]) -> BookingResult<()> {
        let request = self.start_submission(selected_dates)?;
        let result = self.submission(request).await;
        self.finish_submission(&result);
        result
    }
}

/// Bound a service call so a hung request cannot stall the screen
async fn with_timeout<T>(
    timeout: Duration,
    call: impl Future<Output = BookingResult<T>>,
) -> BookingResult<T> {
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| Error::Timeout(timeout))?
}
