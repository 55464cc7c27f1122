#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use gocab_booking::components::shifts::{
    BookingRequest, CommonShiftsRequest, CommonShiftsResponse, ShiftId, ShiftOption, ShiftService,
};
use gocab_booking::error::{network_error, BookingResult, Error};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// How the mock answers a request
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    /// Non-2xx status with an optional server message
    Status(u16, Option<String>),
    /// Connection level failure
    Network,
    /// Never answers
    Hang,
}

impl<T> Reply<T> {
    async fn resolve(self) -> BookingResult<T> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Status(status, message) => Err(Error::Service { status, message }),
            Reply::Network => Err(network_error("connection refused")),
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// Mock implementation of the shift service for testing
#[derive(Debug, Default)]
pub struct MockShiftService {
    lookup_replies: Mutex<VecDeque<(Duration, Reply<CommonShiftsResponse>)>>,
    booking_replies: Mutex<VecDeque<Reply<()>>>,
    lookups: Mutex<Vec<CommonShiftsRequest>>,
    bookings: Mutex<Vec<BookingRequest>>,
}

impl MockShiftService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer to the next lookup
    pub fn push_lookup(&self, reply: Reply<CommonShiftsResponse>) -> &Self {
        self.push_delayed_lookup(Duration::ZERO, reply)
    }

    /// Queue the answer to the next lookup, sent after `delay`
    pub fn push_delayed_lookup(&self, delay: Duration, reply: Reply<CommonShiftsResponse>) -> &Self {
        self.lookup_replies.lock().unwrap().push_back((delay, reply));
        self
    }

    /// Queue the answer to the next booking
    pub fn push_booking(&self, reply: Reply<()>) -> &Self {
        self.booking_replies.lock().unwrap().push_back(reply);
        self
    }

    /// Lookups received so far
    pub fn lookups(&self) -> Vec<CommonShiftsRequest> {
        self.lookups.lock().unwrap().clone()
    }

    /// Bookings received so far
    pub fn bookings(&self) -> Vec<BookingRequest> {
        self.bookings.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShiftService for MockShiftService {
    async fn common_shifts(&self, request: &CommonShiftsRequest) -> BookingResult<CommonShiftsResponse> {
        self.lookups.lock().unwrap().push(request.clone());

        // Unscripted lookups confirm every date with one morning shift
        let (delay, reply) = self.lookup_replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            (
                Duration::ZERO,
                Reply::Ok(response(vec![shift(1, "10:00", "door")], request.dates.clone())),
            )
        });

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply.resolve().await
    }

    async fn create_booking(&self, request: &BookingRequest) -> BookingResult<()> {
        self.bookings.lock().unwrap().push(request.clone());

        let reply = self
            .booking_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Ok(()));
        reply.resolve().await
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn shift(id: i64, time: &str, pickup: &str) -> ShiftOption {
    ShiftOption {
        shift_id: ShiftId::Number(id),
        shift_time: time.to_string(),
        pickup_type: pickup.to_string(),
    }
}

pub fn response(shifts: Vec<ShiftOption>, your_dates: Vec<NaiveDate>) -> CommonShiftsResponse {
    CommonShiftsResponse { shifts, your_dates }
}
