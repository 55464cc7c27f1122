use super::models::{ScreenOptions, ScreenSnapshot, Today};
use crate::components::calendar::{
    DateRangeSelector, HolidaySource, SelectionMode, SelectionState,
};
use crate::components::shifts::{
    CommonShiftsResponse, Direction, MatchPhase, ShiftId, ShiftMatcher, ShiftService,
};
use crate::error::{component_error, BookingResult, Error, ValidationError};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// The booking screen actor. Owns the selection and the shift matcher and
/// handles UI events one at a time, in arrival order.
pub struct BookingScreenActor {
    today: Today,
    holidays: Arc<dyn HolidaySource>,
    selection: SelectionState,
    direction: Direction,
    matcher: ShiftMatcher,
    lookup_task: Option<JoinHandle<()>>,
    last_alert: Option<String>,
    command_rx: mpsc::Receiver<BookingCommand>,
    self_tx: mpsc::WeakSender<BookingCommand>,
    snapshot_tx: watch::Sender<ScreenSnapshot>,
}

/// Commands that can be sent to the booking screen actor
pub enum BookingCommand {
    SelectDate(NaiveDate, mpsc::Sender<ScreenSnapshot>),
    SetMode(SelectionMode, mpsc::Sender<ScreenSnapshot>),
    SetDirection(Direction, mpsc::Sender<ScreenSnapshot>),
    SelectShift(ShiftId, mpsc::Sender<BookingResult<ScreenSnapshot>>),
    Submit(mpsc::Sender<BookingResult<()>>),
    PullToRefresh(mpsc::Sender<ScreenSnapshot>),
    GetSnapshot(mpsc::Sender<ScreenSnapshot>),
    LookupFinished {
        seq: u64,
        result: BookingResult<CommonShiftsResponse>,
    },
    SubmitFinished {
        result: BookingResult<()>,
        reply: mpsc::Sender<BookingResult<()>>,
    },
    Shutdown,
}

/// Handle for communicating with the booking screen actor
#[derive(Clone)]
pub struct BookingScreenActorHandle {
    command_tx: mpsc::Sender<BookingCommand>,
}

impl BookingScreenActorHandle {
    /// Send a command and wait for its reply
    async fn request<T>(
        &self,
        make: impl FnOnce(mpsc::Sender<T>) -> BookingCommand,
    ) -> BookingResult<T> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(make(response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))
    }

    pub async fn select_date(&self, date: NaiveDate) -> BookingResult<ScreenSnapshot> {
        self.request(|tx| BookingCommand::SelectDate(date, tx)).await
    }

    pub async fn set_mode(&self, mode: SelectionMode) -> BookingResult<ScreenSnapshot> {
        self.request(|tx| BookingCommand::SetMode(mode, tx)).await
    }

    pub async fn set_direction(&self, direction: Direction) -> BookingResult<ScreenSnapshot> {
        self.request(|tx| BookingCommand::SetDirection(direction, tx)).await
    }

    pub async fn select_shift(&self, shift_id: ShiftId) -> BookingResult<ScreenSnapshot> {
        self.request(|tx| BookingCommand::SelectShift(shift_id, tx)).await?
    }

    pub async fn submit(&self) -> BookingResult<()> {
        self.request(BookingCommand::Submit).await?
    }

    pub async fn pull_to_refresh(&self) -> BookingResult<ScreenSnapshot> {
        self.request(BookingCommand::PullToRefresh).await
    }

    pub async fn snapshot(&self) -> BookingResult<ScreenSnapshot> {
        self.request(BookingCommand::GetSnapshot).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BookingResult<()> {
        let _ = self.command_tx.send(BookingCommand::Shutdown).await;
        Ok(())
    }
}

impl BookingScreenActor {
    /// Create a new actor and return its handle and snapshot feed
    pub fn new(
        service: Arc<dyn ShiftService>,
        options: ScreenOptions,
    ) -> (
        Self,
        BookingScreenActorHandle,
        watch::Receiver<ScreenSnapshot>,
    ) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (snapshot_tx, snapshot_rx) = watch::channel(ScreenSnapshot::default());

        let actor = Self {
            today: options.today,
            holidays: options.holidays,
            selection: SelectionState::new(options.mode),
            direction: options.direction,
            matcher: ShiftMatcher::new(service, options.request_timeout),
            lookup_task: None,
            last_alert: None,
            command_rx,
            self_tx: command_tx.downgrade(),
            snapshot_tx,
        };
        actor.publish();

        let handle = BookingScreenActorHandle { command_tx };

        (actor, handle, snapshot_rx)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Booking screen actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                BookingCommand::SelectDate(date, reply) => {
                    let selector = self.selector();
                    let next = selector.select_date(date, &self.selection);
                    self.update_selection(next);
                    let _ = reply.send(self.publish()).await;
                }
                BookingCommand::SetMode(mode, reply) => {
                    let selector = self.selector();
                    let next = selector.set_mode(mode, &self.selection);
                    self.update_selection(next);
                    let _ = reply.send(self.publish()).await;
                }
                BookingCommand::SetDirection(direction, reply) => {
                    if direction != self.direction && !self.is_submitting() {
                        info!("Booking direction changed to {}", direction);
                        self.direction = direction;
                        self.trigger_lookup();
                    }
                    let _ = reply.send(self.publish()).await;
                }
                BookingCommand::SelectShift(shift_id, reply) => {
                    let result = self.choose_shift(&shift_id);
                    let _ = reply.send(result).await;
                }
                BookingCommand::Submit(reply) => {
                    self.start_submit(reply).await;
                }
                BookingCommand::PullToRefresh(reply) => {
                    if !self.is_submitting() {
                        info!("Resetting booking screen");
                        self.reset();
                    }
                    let _ = reply.send(self.publish()).await;
                }
                BookingCommand::GetSnapshot(reply) => {
                    let _ = reply.send(self.snapshot()).await;
                }
                BookingCommand::LookupFinished { seq, result } => {
                    self.finish_lookup(seq, result);
                }
                BookingCommand::SubmitFinished { result, reply } => {
                    self.finish_submit(&result);
                    let _ = reply.send(result).await;
                }
                BookingCommand::Shutdown => {
                    info!("Booking screen actor shutting down");
                    break;
                }
            }
        }

        if let Some(task) = self.lookup_task.take() {
            task.abort();
        }
        info!("Booking screen actor shut down");
    }

    fn selector(&self) -> DateRangeSelector {
        DateRangeSelector::with_holidays(self.today.date(), Arc::clone(&self.holidays))
    }

    fn is_submitting(&self) -> bool {
        self.matcher.phase() == MatchPhase::Submitting
    }

    /// Adopt a new selection, looking up shifts if the dates changed
    fn update_selection(&mut self, next: SelectionState) {
        if self.is_submitting() {
            debug!("Booking in flight, ignoring selection change");
            return;
        }

        let dates_changed = next.dates() != self.selection.dates();
        self.selection = next;
        if dates_changed {
            self.trigger_lookup();
        }
    }

    /// Pick one of the offered shifts once they belong to the current selection
    fn choose_shift(&mut self, shift_id: &ShiftId) -> BookingResult<ScreenSnapshot> {
        match self.matcher.phase() {
            MatchPhase::Submitting => Err(ValidationError::SubmissionInProgress.into()),
            MatchPhase::Loading => Err(ValidationError::NoMatchedDates.into()),
            _ => {
                self.matcher.select_shift(shift_id)?;
                Ok(self.publish())
            }
        }
    }

    /// Supersede any running lookup and start one for the current selection
    fn trigger_lookup(&mut self) {
        if let Some(task) = self.lookup_task.take() {
            task.abort();
        }
        self.last_alert = None;

        let Some(ticket) = self
            .matcher
            .begin_refresh(self.selection.dates(), self.direction)
        else {
            return;
        };

        let lookup = self.matcher.lookup(ticket);
        let self_tx = self.self_tx.clone();
        self.lookup_task = Some(tokio::spawn(async move {
            let (seq, result) = lookup.await;
            if let Some(tx) = self_tx.upgrade() {
                let _ = tx.send(BookingCommand::LookupFinished { seq, result }).await;
            }
        }));
    }

    fn finish_lookup(&mut self, seq: u64, result: BookingResult<CommonShiftsResponse>) {
        match self.matcher.apply_lookup(seq, result) {
            Ok(true) => {
                self.lookup_task = None;
                self.publish();
            }
            Ok(false) => {}
            Err(e) => {
                self.lookup_task = None;
                self.last_alert = Some(match &e {
                    Error::Timeout(_) => e.user_message(),
                    _ => t!("alerts.lookup_failed").to_string(),
                });
                self.publish();
            }
        }
    }

    async fn start_submit(&mut self, reply: mpsc::Sender<BookingResult<()>>) {
        let request = match self.matcher.start_submission(self.selection.dates()) {
            Ok(request) => request,
            Err(e) => {
                debug!("Booking rejected: {}", e);
                let _ = reply.send(Err(e)).await;
                return;
            }
        };
        self.last_alert = None;
        self.publish();

        let submission = self.matcher.submission(request);
        let self_tx = self.self_tx.clone();
        tokio::spawn(async move {
            let result = submission.await;
            match self_tx.upgrade() {
                Some(tx) => {
                    let _ = tx.send(BookingCommand::SubmitFinished { result, reply }).await;
                }
                None => {
                    let _ = reply.send(result).await;
                }
            }
        });
    }

    fn finish_submit(&mut self, result: &BookingResult<()>) {
        self.matcher.finish_submission(result);
        match result {
            Ok(()) => {
                self.selection = self.selection.cleared();
                self.last_alert = None;
            }
            Err(e) => {
                warn!("Booking submission failed: {}", e);
                self.last_alert = Some(e.user_message());
            }
        }
        self.publish();
    }

    fn reset(&mut self) {
        if let Some(task) = self.lookup_task.take() {
            task.abort();
        }
        self.selection = self.selection.cleared();
        self.matcher.reset();
        self.last_alert = None;
    }

    fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot {
            phase: self.matcher.phase(),
            mode: self.selection.mode(),
            direction: self.direction,
            calendar: self.selector().generate_window(&self.selection),
            selected_dates: self.selection.dates().to_vec(),
            range_anchor: self.selection.range_anchor(),
            shifts: self.matcher.shifts().to_vec(),
            selected_shift: self.matcher.selected_shift().cloned(),
            matched_dates: self.matcher.matched_dates().to_vec(),
            last_alert: self.last_alert.clone(),
        }
    }

    /// Push the current state to subscribers and return it
    fn publish(&self) -> ScreenSnapshot {
        let snapshot = self.snapshot();
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }
}
