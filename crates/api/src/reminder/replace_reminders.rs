use crate::shared::usecase::UseCase;
use appointer_domain::{InvalidReminderError, Reminder, ID};
use appointer_infra::AppointerContext;
use tracing::error;

/// Replaces every `Reminder` of an `Appointment` with fresh undispatched ones.
///
/// This is the only way a `Reminder` goes back to not being dispatched, so it
/// should be executed whenever the schedule of an `Appointment` changes.
#[derive(Debug)]
pub struct ReplaceRemindersUseCase {
    pub appointment_id: ID,
    pub lead_minutes: Vec<i64>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    InvalidReminder(i64),
    AppointmentNotFound(ID),
    StorageError,
}

impl From<InvalidReminderError> for UseCaseErrors {
    fn from(e: InvalidReminderError) -> Self {
        Self::InvalidReminder(e.lead_minutes())
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ReplaceRemindersUseCase {
    type Response = Vec<Reminder>;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "ReplaceReminders";

    async fn execute(&mut self, ctx: &AppointerContext) -> Result<Self::Response, Self::Errors> {
        let reminders = Reminder::for_appointment(&self.appointment_id, &self.lead_minutes)?;

        if ctx
            .repos
            .appointments
            .find(&self.appointment_id)
            .await
            .is_none()
        {
            return Err(UseCaseErrors::AppointmentNotFound(
                self.appointment_id.clone(),
            ));
        }

        ctx.repos
            .reminders
            .replace_for_appointment(&self.appointment_id, &reminders)
            .await
            .map_err(|e| {
                error!(
                    "Unable to replace reminders of appointment {}. Err: {:?}",
                    self.appointment_id, e
                );
                UseCaseErrors::StorageError
            })?;

        Ok(reminders)
    }
}
