use super::AppointmentWithReminders;
use crate::shared::usecase::UseCase;
use appointer_domain::{parse_timezone, Appointment, InvalidReminderError, Reminder, ID};
use appointer_infra::AppointerContext;
use chrono::{DateTime, Utc};
use tracing::error;

#[derive(Debug)]
pub struct CreateAppointmentUseCase {
    pub user_id: ID,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    /// IANA name of the timezone the appointment was entered in
    pub timezone: String,
    pub category_id: Option<ID>,
    /// Lead minutes of the reminders
    pub reminders: Vec<i64>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    EmptyTitle,
    InvalidTimezone(String),
    InvalidReminder(i64),
    CategoryNotFound(ID),
    StorageError,
}

impl From<InvalidReminderError> for UseCaseErrors {
    fn from(e: InvalidReminderError) -> Self {
        Self::InvalidReminder(e.lead_minutes())
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateAppointmentUseCase {
    type Response = AppointmentWithReminders;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "CreateAppointment";

    async fn execute(&mut self, ctx: &AppointerContext) -> Result<Self::Response, Self::Errors> {
        let timezone = parse_timezone(&self.timezone)
            .ok_or_else(|| UseCaseErrors::InvalidTimezone(self.timezone.clone()))?;

        if let Some(category_id) = &self.category_id {
            if ctx.repos.categories.find(category_id).await.is_none() {
                return Err(UseCaseErrors::CategoryNotFound(category_id.clone()));
            }
        }

        let appointment = Appointment::new(
            self.user_id.clone(),
            &self.title,
            self.scheduled_at,
            timezone,
            self.category_id.clone(),
            ctx.sys.get_timestamp_millis(),
        )
        .map_err(|_| UseCaseErrors::EmptyTitle)?;
        let reminders = Reminder::for_appointment(&appointment.id, &self.reminders)?;

        ctx.repos
            .appointments
            .insert(&appointment, &reminders)
            .await
            .map_err(|e| {
                error!("Unable to insert appointment. Err: {:?}", e);
                UseCaseErrors::StorageError
            })?;

        Ok(AppointmentWithReminders {
            appointment,
            reminders,
        })
    }
}
