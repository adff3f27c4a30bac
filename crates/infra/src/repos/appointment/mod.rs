mod inmemory;
mod postgres;

use appointer_domain::{Appointment, Reminder, ID};
pub use inmemory::InMemoryAppointmentRepo;
pub use postgres::PostgresAppointmentRepo;

/// `insert` and `save` store the `Appointment` together with its complete set of
/// `Reminder`s in one transaction, so that a changed `Appointment` is never left
/// with the dispatch state of its previous schedule.
#[async_trait::async_trait]
pub trait IAppointmentRepo: Send + Sync {
    async fn insert(
        &self,
        appointment: &Appointment,
        reminders: &[Reminder],
    ) -> anyhow::Result<()>;
    /// Updates the `Appointment` and replaces all of its `Reminder`s with `reminders`
    async fn save(&self, appointment: &Appointment, reminders: &[Reminder]) -> anyhow::Result<()>;
    async fn find(&self, appointment_id: &ID) -> Option<Appointment>;
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Appointment>>;
    /// Deletes the `Appointment` together with all of its `Reminder`s
    async fn delete(&self, appointment_id: &ID) -> Option<Appointment>;
}
