pub mod replace_reminders;
pub mod send_due_reminders;
