//! The booking screen: one selection, one shift matcher, events in order.

mod actor;
mod handle;
pub mod models;

pub use handle::BookingScreenHandle;
pub use models::{ScreenOptions, ScreenSnapshot, Today};
