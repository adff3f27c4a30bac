mod appointment;
mod category;
mod notification;
mod reminder;
mod shared;

pub use appointment::{Appointment, InvalidAppointmentError};
pub use category::Category;
pub use notification::Notification;
pub use reminder::{is_reminder_due, DueReminder, InvalidReminderError, Reminder, MAX_LEAD_MINUTES};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use shared::timezone::parse_timezone;
