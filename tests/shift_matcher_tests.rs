mod common;

use common::{date, response, shift, MockShiftService, Reply};
use gocab_booking::components::shifts::{
    BookingRequest, Direction, MatchOutcome, MatchPhase, ShiftId, ShiftMatcher,
};
use gocab_booking::error::{Error, ValidationError};
use std::sync::Arc;
use std::time::Duration;

fn matcher(service: &Arc<MockShiftService>) -> ShiftMatcher {
    ShiftMatcher::new(service.clone(), Duration::from_secs(10))
}

/// An empty selection never reaches the service
#[tokio::test]
async fn test_refresh_empty_selection_is_local() {
    let service = Arc::new(MockShiftService::new());
    let mut matcher = matcher(&service);

    let outcome = matcher.refresh(&[], Direction::In).await.unwrap();

    assert_eq!(outcome, MatchOutcome::default());
    assert!(service.lookups().is_empty());
    assert_eq!(matcher.phase(), MatchPhase::Idle);
    assert!(matcher.selected_shift().is_none());
}

/// An empty selection also clears what an earlier lookup found
#[tokio::test]
async fn test_refresh_empty_selection_clears_previous_shifts() {
    let service = Arc::new(MockShiftService::new());
    let mut matcher = matcher(&service);

    matcher.refresh(&[date(2024, 3, 5)], Direction::In).await.unwrap();
    assert_eq!(matcher.shifts().len(), 1);

    matcher.refresh(&[], Direction::In).await.unwrap();
    assert!(matcher.shifts().is_empty());
    assert!(matcher.matched_dates().is_empty());
    assert!(matcher.selected_shift().is_none());
    assert_eq!(service.lookups().len(), 1);
}

/// The first shift is preselected and the booking uses the matched dates
#[tokio::test]
async fn test_first_shift_selected_and_booked_on_matched_dates() {
    let service = Arc::new(MockShiftService::new());
    service.push_lookup(Reply::Ok(response(
        vec![shift(1, "10:00", "door")],
        vec![date(2024, 3, 5)],
    )));
    let mut matcher = matcher(&service);
    let selected = [date(2024, 3, 5), date(2024, 3, 6)];

    let outcome = matcher.refresh(&selected, Direction::In).await.unwrap();
    assert_eq!(outcome.matched_dates, vec![date(2024, 3, 5)]);
    assert_eq!(matcher.phase(), MatchPhase::Ready);
    assert_eq!(matcher.selected_shift(), Some(&ShiftId::Number(1)));

    let lookup = &service.lookups()[0];
    assert_eq!(lookup.dates, selected.to_vec());
    assert_eq!(lookup.log_type, Direction::In);

    let request = matcher.booking_request(&selected).unwrap();
    assert_eq!(
        request,
        BookingRequest {
            shift_id: ShiftId::Number(1),
            dates: "2024-03-05".to_string(),
        }
    );

    matcher.submit(&selected).await.unwrap();
    assert_eq!(service.bookings(), vec![request]);

    // A successful booking resets the matcher
    assert_eq!(matcher.phase(), MatchPhase::Idle);
    assert!(matcher.shifts().is_empty());
    assert!(matcher.matched_dates().is_empty());
}

/// No shifts back means nothing is preselected
#[tokio::test]
async fn test_no_match() {
    let service = Arc::new(MockShiftService::new());
    service.push_lookup(Reply::Ok(response(vec![], vec![])));
    let mut matcher = matcher(&service);

    let outcome = matcher.refresh(&[date(2024, 3, 5)], Direction::Out).await.unwrap();

    assert!(outcome.shifts.is_empty());
    assert_eq!(matcher.phase(), MatchPhase::NoMatch);
    assert!(matcher.selected_shift().is_none());
    assert_eq!(service.lookups()[0].log_type, Direction::Out);
}

/// Each precondition is checked before anything is sent
#[tokio::test]
async fn test_submit_preconditions() {
    let service = Arc::new(MockShiftService::new());
    service.push_lookup(Reply::Ok(response(vec![], vec![date(2024, 3, 5)])));
    service.push_lookup(Reply::Ok(response(vec![shift(1, "10:00", "door")], vec![])));
    let mut matcher = matcher(&service);

    let err = matcher.submit(&[]).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::NoDatesSelected)));

    // Dates matched but no shift offered
    matcher.refresh(&[date(2024, 3, 5)], Direction::In).await.unwrap();
    let err = matcher.submit(&[date(2024, 3, 5)]).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::NoShiftSelected)));

    // Shift offered but none of the dates matched
    matcher.refresh(&[date(2024, 3, 5)], Direction::In).await.unwrap();
    let err = matcher.submit(&[date(2024, 3, 5)]).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::NoMatchedDates)));
    assert!(err.is_validation());

    assert!(service.bookings().is_empty());
    assert_eq!(matcher.phase(), MatchPhase::Ready);
}

/// A failed lookup after a good one leaves nothing stale behind
#[tokio::test]
async fn test_lookup_failure_clears_previous_shifts() {
    let service = Arc::new(MockShiftService::new());
    service
        .push_lookup(Reply::Ok(response(
            vec![shift(1, "10:00", "door"), shift(2, "12:00", "point")],
            vec![date(2024, 3, 5)],
        )))
        .push_lookup(Reply::Status(500, None));
    let mut matcher = matcher(&service);

    matcher.refresh(&[date(2024, 3, 5)], Direction::In).await.unwrap();
    assert_eq!(matcher.shifts().len(), 2);

    let err = matcher
        .refresh(&[date(2024, 3, 5), date(2024, 3, 6)], Direction::In)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Service { status: 500, .. }));
    assert!(matcher.shifts().is_empty());
    assert!(matcher.matched_dates().is_empty());
    assert!(matcher.selected_shift().is_none());
    assert_eq!(matcher.phase(), MatchPhase::Failed);
}

/// Only the most recently issued lookup is applied
#[tokio::test]
async fn test_stale_lookup_is_discarded() {
    let service = Arc::new(MockShiftService::new());
    let mut matcher = matcher(&service);

    let first = matcher.begin_refresh(&[date(2024, 3, 5)], Direction::In).unwrap();
    let second = matcher
        .begin_refresh(&[date(2024, 3, 5), date(2024, 3, 6)], Direction::In)
        .unwrap();
    assert!(second.seq > first.seq);
    assert_eq!(matcher.latest_seq(), second.seq);

    // The newer response arrives first
    let applied = matcher
        .apply_lookup(
            second.seq,
            Ok(response(vec![shift(2, "12:00", "door")], vec![date(2024, 3, 6)])),
        )
        .unwrap();
    assert!(applied);

    let applied = matcher
        .apply_lookup(
            first.seq,
            Ok(response(vec![shift(1, "10:00", "door")], vec![date(2024, 3, 5)])),
        )
        .unwrap();
    assert!(!applied);

    assert_eq!(matcher.selected_shift(), Some(&ShiftId::Number(2)));
    assert_eq!(matcher.matched_dates(), &[date(2024, 3, 6)]);

    // A stale failure is discarded too
    let applied = matcher.apply_lookup(first.seq, Err(Error::Timeout(Duration::from_secs(10))));
    assert!(matches!(applied, Ok(false)));
    assert_eq!(matcher.shifts().len(), 1);
}

/// Nothing is booked while the lookup for a new selection is pending
#[tokio::test]
async fn test_submit_while_lookup_pending_is_rejected() {
    let service = Arc::new(MockShiftService::new());
    let mut matcher = matcher(&service);

    matcher.refresh(&[date(2024, 3, 5)], Direction::In).await.unwrap();
    assert_eq!(matcher.matched_dates(), &[date(2024, 3, 5)]);

    let ticket = matcher.begin_refresh(&[date(2024, 3, 6)], Direction::In).unwrap();
    assert_eq!(matcher.phase(), MatchPhase::Loading);
    assert!(matcher.matched_dates().is_empty());

    let err = matcher.submit(&[date(2024, 3, 6)]).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::NoMatchedDates)));
    assert!(service.bookings().is_empty());
    assert_eq!(matcher.phase(), MatchPhase::Loading);

    // Once the reply lands the booking goes out for the new date only
    let (seq, result) = matcher.lookup(ticket).await;
    assert!(matcher.apply_lookup(seq, result).unwrap());
    matcher.submit(&[date(2024, 3, 6)]).await.unwrap();

    let bookings = service.bookings();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].dates, "2024-03-06");
}

/// Clearing the selection supersedes a lookup still in flight
#[tokio::test]
async fn test_empty_selection_supersedes_inflight_lookup() {
    let service = Arc::new(MockShiftService::new());
    let mut matcher = matcher(&service);

    let ticket = matcher.begin_refresh(&[date(2024, 3, 5)], Direction::In).unwrap();
    assert!(matcher.begin_refresh(&[], Direction::In).is_none());

    let (seq, result) = matcher.lookup(ticket).await;
    assert!(!matcher.apply_lookup(seq, result).unwrap());
    assert!(matcher.shifts().is_empty());
    assert_eq!(matcher.phase(), MatchPhase::Idle);
}

/// A hung lookup gives up after the timeout
#[tokio::test(start_paused = true)]
async fn test_lookup_timeout() {
    let service = Arc::new(MockShiftService::new());
    service.push_lookup(Reply::Hang);
    let mut matcher = ShiftMatcher::new(service.clone(), Duration::from_secs(10));

    let err = matcher.refresh(&[date(2024, 3, 5)], Direction::In).await.unwrap_err();

    assert!(matches!(err, Error::Timeout(d) if d == Duration::from_secs(10)));
    assert_eq!(matcher.phase(), MatchPhase::Failed);
}

/// A failed booking keeps everything so it can be retried
#[tokio::test]
async fn test_failed_submit_keeps_state() {
    let service = Arc::new(MockShiftService::new());
    service
        .push_booking(Reply::Status(409, Some("Shift is full".to_string())))
        .push_booking(Reply::Ok(()));
    let mut matcher = matcher(&service);
    let selected = [date(2024, 3, 5)];

    matcher.refresh(&selected, Direction::In).await.unwrap();
    let err = matcher.submit(&selected).await.unwrap_err();

    assert_eq!(err.user_message(), "Shift is full");
    assert_eq!(matcher.phase(), MatchPhase::Ready);
    assert_eq!(matcher.selected_shift(), Some(&ShiftId::Number(1)));
    assert_eq!(matcher.matched_dates(), &selected);

    // Retry goes through
    matcher.submit(&selected).await.unwrap();
    assert_eq!(service.bookings().len(), 2);
}

/// Only offered shifts can be chosen
#[tokio::test]
async fn test_select_shift() {
    let service = Arc::new(MockShiftService::new());
    service.push_lookup(Reply::Ok(response(
        vec![shift(1, "10:00", "door"), shift(2, "14:00", "point")],
        vec![date(2024, 3, 5)],
    )));
    let mut matcher = matcher(&service);
    matcher.refresh(&[date(2024, 3, 5)], Direction::In).await.unwrap();

    matcher.select_shift(&ShiftId::Number(2)).unwrap();
    assert_eq!(matcher.selected_shift_option().unwrap().shift_time, "14:00");

    let err = matcher.select_shift(&ShiftId::Number(9)).unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::UnknownShift(_))));
    assert_eq!(matcher.selected_shift(), Some(&ShiftId::Number(2)));
}
