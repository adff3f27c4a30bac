pub mod create_appointment;
pub mod delete_appointment;
pub mod get_appointments;
pub mod update_appointment;

use appointer_domain::{Appointment, Category, Reminder};

#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentWithReminders {
    pub appointment: Appointment,
    pub reminders: Vec<Reminder>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentDetails {
    pub appointment: Appointment,
    pub category: Option<Category>,
    pub reminders: Vec<Reminder>,
}
