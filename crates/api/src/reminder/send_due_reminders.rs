use crate::shared::usecase::UseCase;
use appointer_domain::DueReminder;
use appointer_infra::{AppointerContext, UserLookupError};
use tracing::{error, info, warn};

/// One sweep of the reminder dispatcher.
///
/// Every due `Reminder` gets one delivery attempt and is marked as dispatched
/// only after the delivery succeeded. A failing `Reminder` is left as it is and
/// will be retried by the next sweep until its `Appointment` falls out of the
/// retention window. A crash between the delivery and the mark can cause the
/// same `Reminder` to be delivered twice.
///
/// Sweeps of the same store never overlap: a sweep waits for the one in
/// progress, including the one run by the `ReminderScheduler`, to finish.
#[derive(Debug, Default)]
pub struct SendDueRemindersUseCase {}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub due: usize,
    pub sent: usize,
    pub lookup_failures: usize,
    pub send_failures: usize,
    pub mark_failures: usize,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    StorageError,
}

#[derive(Debug)]
enum DispatchFailure {
    Lookup,
    Send,
    Mark,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDueRemindersUseCase {
    type Response = SweepReport;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "SendDueReminders";

    async fn execute(&mut self, ctx: &AppointerContext) -> Result<Self::Response, Self::Errors> {
        let _sweep = ctx.dispatch_lease.lock_sweep().await;
        let now = ctx.sys.now();
        let due_reminders = ctx
            .repos
            .reminders
            .find_due(now, ctx.config.reminder_retention)
            .await
            .map_err(|e| {
                error!("Unable to query due reminders. Err: {:?}", e);
                UseCaseErrors::StorageError
            })?;

        let mut report = SweepReport {
            due: due_reminders.len(),
            ..Default::default()
        };

        for reminder in &due_reminders {
            match dispatch(reminder, ctx).await {
                Ok(()) => report.sent += 1,
                Err(DispatchFailure::Lookup) => report.lookup_failures += 1,
                Err(DispatchFailure::Send) => report.send_failures += 1,
                Err(DispatchFailure::Mark) => report.mark_failures += 1,
            }
        }

        if report.due > 0 {
            info!("Reminder sweep finished: {:?}", report);
        }

        Ok(report)
    }
}

async fn dispatch(reminder: &DueReminder, ctx: &AppointerContext) -> Result<(), DispatchFailure> {
    let contact = match ctx.services.users.get_contact(&reminder.user_id).await {
        Ok(contact) => contact,
        Err(UserLookupError::NotFound(user_id)) => {
            warn!(
                "Skipping reminder {}: the user {} was not found",
                reminder.reminder_id, user_id
            );
            return Err(DispatchFailure::Lookup);
        }
        Err(e) => {
            error!(
                "Skipping reminder {}: unable to look up user {}. Err: {:?}",
                reminder.reminder_id, reminder.user_id, e
            );
            return Err(DispatchFailure::Lookup);
        }
    };

    let notification = reminder.notification(&contact.email);
    if let Err(e) = ctx.services.mailer.send(&notification).await {
        error!(
            "Unable to send reminder {} to {}. Err: {:?}",
            reminder.reminder_id, notification.to, e
        );
        return Err(DispatchFailure::Send);
    }

    match ctx
        .repos
        .reminders
        .mark_dispatched(&reminder.reminder_id)
        .await
    {
        Ok(true) => Ok(()),
        Ok(false) => {
            warn!(
                "Reminder {} was sent but replaced or deleted before it could be marked as dispatched",
                reminder.reminder_id
            );
            Ok(())
        }
        Err(e) => {
            error!(
                "Reminder {} was sent but could not be marked as dispatched and may be sent again. Err: {:?}",
                reminder.reminder_id, e
            );
            Err(DispatchFailure::Mark)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        appointment::{
            create_appointment::CreateAppointmentUseCase,
            update_appointment::UpdateAppointmentUseCase,
        },
        shared::usecase::execute,
    };
    use appointer_domain::{Appointment, ID};
    use appointer_domain::Notification;
    use appointer_infra::{
        INotificationSender, ISys, InMemoryNotificationSender, InMemoryUserDirectory, UserContact,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Arc;

    struct StaticTimeSys(DateTime<Utc>);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0.timestamp_millis()
        }
    }

    struct TestContext {
        ctx: AppointerContext,
        mailer: Arc<InMemoryNotificationSender>,
        users: Arc<InMemoryUserDirectory>,
    }

    impl TestContext {
        fn new() -> Self {
            let mut ctx = AppointerContext::create_inmemory();
            let mailer = Arc::new(InMemoryNotificationSender::new());
            let users = Arc::new(InMemoryUserDirectory::new());
            ctx.services.mailer = mailer.clone();
            ctx.services.users = users.clone();
            ctx.config.reminder_retention = Duration::hours(24);
            Self { ctx, mailer, users }
        }

        fn set_now(&mut self, now: DateTime<Utc>) {
            self.ctx.sys = Arc::new(StaticTimeSys(now));
        }

        fn insert_user(&self, email: &str) -> ID {
            let user_id = ID::new();
            self.users.insert(UserContact {
                user_id: user_id.clone(),
                email: email.into(),
            });
            user_id
        }

        async fn create_appointment(
            &self,
            user_id: &ID,
            title: &str,
            scheduled_at: DateTime<Utc>,
            reminders: Vec<i64>,
        ) -> Appointment {
            let usecase = CreateAppointmentUseCase {
                user_id: user_id.clone(),
                title: title.into(),
                scheduled_at,
                timezone: "Europe/Oslo".into(),
                category_id: None,
                reminders,
            };
            execute(usecase, &self.ctx).await.unwrap().appointment
        }

        async fn sweep(&self) -> SweepReport {
            execute(SendDueRemindersUseCase::default(), &self.ctx)
                .await
                .unwrap()
        }
    }

    /// Gives other tasks a chance to run before every delivery
    struct SlowMailer(Arc<InMemoryNotificationSender>);

    #[async_trait::async_trait]
    impl INotificationSender for SlowMailer {
        async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
            tokio::task::yield_now().await;
            self.0.send(notification).await
        }
    }

    fn scheduled_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap()
    }

    #[actix_web::main]
    #[test]
    async fn sends_each_due_reminder_exactly_once() {
        let mut tctx = TestContext::new();
        let user_id = tctx.insert_user("jane@example.com");
        let t = scheduled_at();
        tctx.create_appointment(&user_id, "Dentist", t, vec![15, 60])
            .await;

        tctx.set_now(t - Duration::minutes(16));
        let report = tctx.sweep().await;
        assert_eq!(report.due, 1);
        assert_eq!(report.sent, 1);

        let sent = tctx.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "jane@example.com");
        assert_eq!(sent[0].subject, "Reminder: Dentist");
        assert!(sent[0].body.contains("Monday 2 March 2026 at 15:30"));

        // Nothing new is due
        assert_eq!(tctx.sweep().await, SweepReport::default());

        tctx.set_now(t - Duration::minutes(14));
        let report = tctx.sweep().await;
        assert_eq!(report.due, 1);
        assert_eq!(report.sent, 1);
        assert_eq!(tctx.mailer.sent().len(), 2);

        assert_eq!(tctx.sweep().await, SweepReport::default());
        assert_eq!(tctx.mailer.sent().len(), 2);
    }

    #[actix_web::main]
    #[test]
    async fn failed_delivery_is_retried_on_next_sweep() {
        let mut tctx = TestContext::new();
        let user_id = tctx.insert_user("jane@example.com");
        let t = scheduled_at();
        let appointment = tctx
            .create_appointment(&user_id, "Dentist", t, vec![15])
            .await;
        tctx.set_now(t - Duration::minutes(10));

        tctx.mailer.fail_for("jane@example.com");
        let report = tctx.sweep().await;
        assert_eq!(report.due, 1);
        assert_eq!(report.send_failures, 1);
        assert_eq!(report.sent, 0);
        assert!(tctx.mailer.sent().is_empty());
        let reminders = tctx
            .ctx
            .repos
            .reminders
            .find_by_appointment(&appointment.id)
            .await
            .unwrap();
        assert!(!reminders[0].dispatched);

        tctx.mailer.recover("jane@example.com");
        let report = tctx.sweep().await;
        assert_eq!(report.sent, 1);
        assert_eq!(tctx.mailer.sent().len(), 1);
        let reminders = tctx
            .ctx
            .repos
            .reminders
            .find_by_appointment(&appointment.id)
            .await
            .unwrap();
        assert!(reminders[0].dispatched);
    }

    #[actix_web::main]
    #[test]
    async fn missing_user_does_not_block_other_reminders() {
        let mut tctx = TestContext::new();
        let jane = tctx.insert_user("jane@example.com");
        let bob = tctx.insert_user("bob@example.com");
        let t = scheduled_at();
        tctx.create_appointment(&bob, "Physio", t, vec![30]).await;
        tctx.create_appointment(&jane, "Dentist", t, vec![30]).await;
        tctx.users.remove(&bob);

        tctx.set_now(t - Duration::minutes(5));
        let report = tctx.sweep().await;
        assert_eq!(report.due, 2);
        assert_eq!(report.lookup_failures, 1);
        assert_eq!(report.sent, 1);

        let sent = tctx.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "jane@example.com");

        // Bob's reminder is still pending
        let report = tctx.sweep().await;
        assert_eq!(report.due, 1);
        assert_eq!(report.lookup_failures, 1);
    }

    #[actix_web::main]
    #[test]
    async fn skips_appointments_outside_retention() {
        let mut tctx = TestContext::new();
        let user_id = tctx.insert_user("jane@example.com");
        let t = scheduled_at();
        tctx.create_appointment(&user_id, "Dentist", t, vec![15])
            .await;

        tctx.set_now(t + Duration::days(2));
        assert_eq!(tctx.sweep().await, SweepReport::default());
        assert!(tctx.mailer.sent().is_empty());

        tctx.set_now(t + Duration::hours(23));
        assert_eq!(tctx.sweep().await.sent, 1);
    }

    #[actix_web::main]
    #[test]
    async fn editing_appointment_resends_reminders() {
        let mut tctx = TestContext::new();
        let user_id = tctx.insert_user("jane@example.com");
        let t = scheduled_at();
        let appointment = tctx
            .create_appointment(&user_id, "Dentist", t, vec![15])
            .await;

        tctx.set_now(t - Duration::minutes(10));
        assert_eq!(tctx.sweep().await.sent, 1);

        let usecase = UpdateAppointmentUseCase {
            user_id: user_id.clone(),
            appointment_id: appointment.id.clone(),
            title: Some("Dentist, rescheduled".into()),
            scheduled_at: Some(t + Duration::minutes(5)),
            timezone: None,
            category_id: None,
            reminders: None,
        };
        execute(usecase, &tctx.ctx).await.unwrap();

        let report = tctx.sweep().await;
        assert_eq!(report.sent, 1);
        let sent = tctx.mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].subject, "Reminder: Dentist, rescheduled");
    }

    #[actix_web::main]
    #[test]
    async fn concurrent_sweeps_send_each_reminder_once() {
        let mut tctx = TestContext::new();
        tctx.ctx.services.mailer = Arc::new(SlowMailer(tctx.mailer.clone()));
        let user_id = tctx.insert_user("jane@example.com");
        let t = scheduled_at();
        tctx.create_appointment(&user_id, "Dentist", t, vec![15])
            .await;
        tctx.set_now(t - Duration::minutes(10));

        let (first, second) = tokio::join!(tctx.sweep(), tctx.sweep());

        assert_eq!(first.sent + second.sent, 1);
        assert_eq!(first.due + second.due, 1);
        assert_eq!(tctx.mailer.sent().len(), 1);
    }
}
