use super::AppointmentWithReminders;
use crate::shared::usecase::UseCase;
use appointer_domain::{parse_timezone, InvalidReminderError, Reminder, ID};
use appointer_infra::AppointerContext;
use chrono::{DateTime, Utc};
use tracing::error;

/// Updates an `Appointment` owned by the given user.
///
/// The `Reminder`s are always replaced, with the given lead minutes or else the current
/// ones, so that they are dispatched again for the updated `Appointment`. The
/// `Appointment` and its new `Reminder`s are stored together or not at all.
#[derive(Debug)]
pub struct UpdateAppointmentUseCase {
    pub user_id: ID,
    pub appointment_id: ID,
    pub title: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub timezone: Option<String>,
    pub category_id: Option<ID>,
    pub reminders: Option<Vec<i64>>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    NotFound(ID),
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
impl UseCase for UpdateAppointmentUseCase {
    type Response = AppointmentWithReminders;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "UpdateAppointment";

    async fn execute(&mut self, ctx: &AppointerContext) -> Result<Self::Response, Self::Errors> {
        let mut appointment = match ctx.repos.appointments.find(&self.appointment_id).await {
            Some(appointment) if appointment.user_id == self.user_id => appointment,
            _ => return Err(UseCaseErrors::NotFound(self.appointment_id.clone())),
        };

        if let Some(title) = &self.title {
            appointment
                .set_title(title)
                .map_err(|_| UseCaseErrors::EmptyTitle)?;
        }
        if let Some(scheduled_at) = self.scheduled_at {
            appointment.scheduled_at = scheduled_at;
        }
        if let Some(timezone) = &self.timezone {
            appointment.timezone = parse_timezone(timezone)
                .ok_or_else(|| UseCaseErrors::InvalidTimezone(timezone.clone()))?;
        }
        if let Some(category_id) = &self.category_id {
            if ctx.repos.categories.find(category_id).await.is_none() {
                return Err(UseCaseErrors::CategoryNotFound(category_id.clone()));
            }
            appointment.category_id = Some(category_id.clone());
        }

        let lead_minutes = match &self.reminders {
            Some(lead_minutes) => lead_minutes.clone(),
            None => ctx
                .repos
                .reminders
                .find_by_appointment(&appointment.id)
                .await
                .map_err(|e| {
                    error!(
                        "Unable to find reminders of appointment {}. Err: {:?}",
                        appointment.id, e
                    );
                    UseCaseErrors::StorageError
                })?
                .into_iter()
                .map(|r| r.lead_minutes)
                .collect(),
        };
        let reminders = Reminder::for_appointment(&appointment.id, &lead_minutes)?;

        appointment.updated = ctx.sys.get_timestamp_millis();
        ctx.repos
            .appointments
            .save(&appointment, &reminders)
            .await
            .map_err(|e| {
                error!("Unable to save appointment {}. Err: {:?}", appointment.id, e);
                UseCaseErrors::StorageError
            })?;

        Ok(AppointmentWithReminders {
            appointment,
            reminders,
        })
    }
}
