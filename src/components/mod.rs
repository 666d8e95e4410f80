// Export components
pub mod booking;
pub mod google_calendar;

// Re-export the handles used by the web layer
pub use booking::BookingHandle;
pub use google_calendar::{CalendarApi, GoogleCalendarClient};
