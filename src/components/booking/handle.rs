use super::actor::{BookingScreenActor, BookingScreenActorHandle};
use super::models::{ScreenOptions, ScreenSnapshot};
use crate::components::calendar::SelectionMode;
use crate::components::shifts::{Direction, ShiftId, ShiftService};
use crate::error::{component_error, BookingResult};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle for interacting with a booking screen
#[derive(Clone)]
pub struct BookingScreenHandle {
    actor_handle: BookingScreenActorHandle,
    snapshot_rx: watch::Receiver<ScreenSnapshot>,
    _actor_task: Arc<JoinHandle<()>>,
}

impl BookingScreenHandle {
    /// Open a booking screen and spawn its actor
    pub fn new(service: Arc<dyn ShiftService>, options: ScreenOptions) -> Self {
        // Create the actor and get its handle
        let (mut actor, handle, snapshot_rx) = BookingScreenActor::new(service, options);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            snapshot_rx,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Tap a day on the calendar
    pub async fn select_date(&self, date: NaiveDate) -> BookingResult<ScreenSnapshot> {
        self.actor_handle.select_date(date).await
    }

    /// Switch between single, multiple and range selection
    pub async fn set_mode(&self, mode: SelectionMode) -> BookingResult<ScreenSnapshot> {
        self.actor_handle.set_mode(mode).await
    }

    pub async fn set_direction(&self, direction: Direction) -> BookingResult<ScreenSnapshot> {
        self.actor_handle.set_direction(direction).await
    }

    /// Pick one of the offered shifts instead of the preselected first one
    pub async fn select_shift(&self, shift_id: ShiftId) -> BookingResult<ScreenSnapshot> {
        self.actor_handle.select_shift(shift_id).await
    }

    /// Book the selected shift on the matched dates.
    ///
    /// Resolves once the server has answered. On success the screen is reset.
    pub async fn submit(&self) -> BookingResult<()> {
        self.actor_handle.submit().await
    }

    /// Clear the selection and any shifts
    pub async fn pull_to_refresh(&self) -> BookingResult<ScreenSnapshot> {
        self.actor_handle.pull_to_refresh().await
    }

    pub async fn snapshot(&self) -> BookingResult<ScreenSnapshot> {
        self.actor_handle.snapshot().await
    }

    /// Feed of snapshots, updated after every state change
    pub fn subscribe(&self) -> watch::Receiver<ScreenSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Wait until no lookup or booking is in flight
    pub async fn wait_until_settled(&self) -> BookingResult<ScreenSnapshot> {
        let mut rx = self.subscribe();
        let snapshot = rx
            .wait_for(|s| s.is_settled())
            .await
            .map_err(|_| component_error("Booking screen closed"))?;
        Ok(snapshot.clone())
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> BookingResult<()> {
        self.actor_handle.shutdown().await
    }
}
