mod appointments;
mod availability;
mod handle;
pub mod models;
pub mod policy;
pub mod time;

pub use appointments::AppointmentWriter;
pub use availability::AvailabilityChecker;
pub use handle::BookingHandle;
pub use models::{
    AppointmentRequest, Availability, BookedAppointment, DeletedAppointment, UnavailableReason,
};
pub use time::{Clock, SystemClock};
