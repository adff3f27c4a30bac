use super::AppointmentDetails;
use crate::shared::usecase::UseCase;
use appointer_domain::ID;
use appointer_infra::AppointerContext;
use tracing::error;

/// Lists the `Appointment`s of a user ordered by when they take place, each with
/// its `Category` and `Reminder`s. Optionally only the ones in a given `Category`.
#[derive(Debug)]
pub struct GetAppointmentsUseCase {
    pub user_id: ID,
    pub category_id: Option<ID>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetAppointmentsUseCase {
    type Response = Vec<AppointmentDetails>;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetAppointments";

    async fn execute(&mut self, ctx: &AppointerContext) -> Result<Self::Response, Self::Errors> {
        let mut appointments = ctx
            .repos
            .appointments
            .find_by_user(&self.user_id)
            .await
            .map_err(|e| {
                error!(
                    "Unable to find appointments of user {}. Err: {:?}",
                    self.user_id, e
                );
                UseCaseErrors::StorageError
            })?;
        if let Some(category_id) = &self.category_id {
            appointments.retain(|a| a.category_id.as_ref() == Some(category_id));
        }

        let categories = ctx.repos.categories.find_all().await.map_err(|e| {
            error!("Unable to find categories. Err: {:?}", e);
            UseCaseErrors::StorageError
        })?;

        let mut details = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            let reminders = ctx
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
                })?;
            let category = appointment
                .category_id
                .as_ref()
                .and_then(|id| categories.iter().find(|c| c.id == *id))
                .cloned();
            details.push(AppointmentDetails {
                appointment,
                category,
                reminders,
            });
        }

        Ok(details)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        appointment::create_appointment::CreateAppointmentUseCase,
        category::create_category::CreateCategoryUseCase, shared::usecase::execute,
    };
    use appointer_domain::Category;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn scheduled_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap()
    }

    async fn create_category(ctx: &AppointerContext, name: &str) -> Category {
        execute(CreateCategoryUseCase { name: name.into() }, ctx)
            .await
            .unwrap()
    }

    async fn create_appointment(
        ctx: &AppointerContext,
        user_id: &ID,
        title: &str,
        scheduled_at: DateTime<Utc>,
        category_id: Option<ID>,
    ) {
        let usecase = CreateAppointmentUseCase {
            user_id: user_id.clone(),
            title: title.into(),
            scheduled_at,
            timezone: "Europe/Oslo".into(),
            category_id,
            reminders: vec![15, 60],
        };
        execute(usecase, ctx).await.unwrap();
    }

    #[actix_web::main]
    #[test]
    async fn lists_appointments_with_category_and_reminders() {
        let ctx = AppointerContext::create_inmemory();
        let user_id = ID::new();
        let health = create_category(&ctx, "Health").await;
        let t = scheduled_at();
        create_appointment(&ctx, &user_id, "Physio", t + Duration::days(1), None).await;
        create_appointment(&ctx, &user_id, "Dentist", t, Some(health.id.clone())).await;
        create_appointment(&ctx, &ID::new(), "Not mine", t, None).await;

        let res = execute(
            GetAppointmentsUseCase {
                user_id: user_id.clone(),
                category_id: None,
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(res.len(), 2);
        assert_eq!(res[0].appointment.title, "Dentist");
        assert_eq!(res[0].category, Some(health));
        let leads: Vec<i64> = res[0].reminders.iter().map(|r| r.lead_minutes).collect();
        assert_eq!(leads, vec![60, 15]);
        assert_eq!(res[1].appointment.title, "Physio");
        assert_eq!(res[1].category, None);
    }

    #[actix_web::main]
    #[test]
    async fn filters_by_category() {
        let ctx = AppointerContext::create_inmemory();
        let user_id = ID::new();
        let work = create_category(&ctx, "Work").await;
        let health = create_category(&ctx, "Health").await;
        let t = scheduled_at();
        create_appointment(&ctx, &user_id, "Standup", t, Some(work.id.clone())).await;
        create_appointment(&ctx, &user_id, "Dentist", t, Some(health.id)).await;
        create_appointment(&ctx, &user_id, "Physio", t, None).await;

        let res = execute(
            GetAppointmentsUseCase {
                user_id: user_id.clone(),
                category_id: Some(work.id.clone()),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].appointment.title, "Standup");
        assert_eq!(res[0].category, Some(work));

        let res = execute(
            GetAppointmentsUseCase {
                user_id,
                category_id: Some(ID::new()),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert!(res.is_empty());
    }
}
