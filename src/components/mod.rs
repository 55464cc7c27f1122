// Export components
pub mod booking;
pub mod calendar;
pub mod shifts;

// Re-export the booking screen handle
pub use booking::BookingScreenHandle;
