use crate::shared::usecase::UseCase;
use appointer_domain::{Appointment, ID};
use appointer_infra::AppointerContext;

/// Deletes an `Appointment` owned by the given user. Its `Reminder`s are deleted with it.
#[derive(Debug)]
pub struct DeleteAppointmentUseCase {
    pub user_id: ID,
    pub appointment_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    NotFound(ID),
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteAppointmentUseCase {
    type Response = Appointment;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "DeleteAppointment";

    async fn execute(&mut self, ctx: &AppointerContext) -> Result<Self::Response, Self::Errors> {
        match ctx.repos.appointments.find(&self.appointment_id).await {
            Some(appointment) if appointment.user_id == self.user_id => ctx
                .repos
                .appointments
                .delete(&appointment.id)
                .await
                .ok_or_else(|| UseCaseErrors::NotFound(self.appointment_id.clone())),
            _ => Err(UseCaseErrors::NotFound(self.appointment_id.clone())),
        }
    }
}
