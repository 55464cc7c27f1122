//! Booking calendar: the selectable date window and the selection modes.

mod holidays;
pub mod models;
mod selector;

pub use holidays::{HolidaySource, NoHolidays, StaticHolidays};
pub use models::{CalendarDay, SelectionMode, SelectionState};
pub use selector::DateRangeSelector;
