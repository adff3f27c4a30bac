mod inmemory;
mod postgres;

use appointer_domain::{DueReminder, Reminder, ID};
use chrono::{DateTime, Duration, Utc};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
pub(crate) use postgres::replace_reminders;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn find_by_appointment(&self, appointment_id: &ID) -> anyhow::Result<Vec<Reminder>>;
    /// Finds the undispatched `Reminder`s whose trigger instant is at or before `now`
    /// and whose `Appointment` is not older than `retention`. Pure read.
    async fn find_due(
        &self,
        now: DateTime<Utc>,
        retention: Duration,
    ) -> anyhow::Result<Vec<DueReminder>>;
    /// Flips `dispatched` from false to true. Returns false if there was no undispatched
    /// `Reminder` with this id, e.g. because it was replaced in the meantime.
    async fn mark_dispatched(&self, reminder_id: &ID) -> anyhow::Result<bool>;
    /// Atomically deletes all the `Reminder`s of the `Appointment` and inserts `reminders`
    async fn replace_for_appointment(
        &self,
        appointment_id: &ID,
        reminders: &[Reminder],
    ) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use crate::{create_contexts, AppointerContext};
    use appointer_domain::{Appointment, DueReminder, Reminder, ID, MAX_LEAD_MINUTES};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn scheduled_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap()
    }

    async fn insert_appointment(
        ctx: &AppointerContext,
        scheduled_at: DateTime<Utc>,
        leads: &[i64],
    ) -> (Appointment, Vec<Reminder>) {
        let appointment = Appointment::new(
            ID::new(),
            "Dentist",
            scheduled_at,
            chrono_tz::Europe::Oslo,
            None,
            0,
        )
        .unwrap();
        let reminders = Reminder::for_appointment(&appointment.id, leads).unwrap();
        ctx.repos
            .appointments
            .insert(&appointment, &reminders)
            .await
            .unwrap();
        (appointment, reminders)
    }

    /// Due reminders of one appointment, other rows may exist in a shared database
    async fn find_due_for(
        ctx: &AppointerContext,
        appointment: &Appointment,
        now: DateTime<Utc>,
        retention: Duration,
    ) -> Vec<DueReminder> {
        ctx.repos
            .reminders
            .find_due(now, retention)
            .await
            .expect("To query due reminders")
            .into_iter()
            .filter(|r| r.appointment_id == appointment.id)
            .collect()
    }

    #[tokio::test]
    async fn finds_reminder_once_its_trigger_has_passed() {
        for ctx in create_contexts().await {
            let t = scheduled_at();
            let retention = Duration::hours(24);
            let (appointment, reminders) = insert_appointment(&ctx, t, &[15]).await;

            let due = find_due_for(&ctx, &appointment, t - Duration::minutes(14), retention).await;
            assert_eq!(due.len(), 1);
            assert_eq!(due[0].reminder_id, reminders[0].id);
            assert_eq!(due[0].appointment_id, appointment.id);
            assert_eq!(due[0].user_id, appointment.user_id);
            assert_eq!(due[0].title, "Dentist");
            assert_eq!(due[0].scheduled_at, t);
            assert_eq!(due[0].timezone, chrono_tz::Europe::Oslo);
            assert_eq!(due[0].lead_minutes, 15);

            let due = find_due_for(&ctx, &appointment, t - Duration::minutes(15), retention).await;
            assert_eq!(due.len(), 1);

            assert!(
                find_due_for(&ctx, &appointment, t - Duration::minutes(16), retention)
                    .await
                    .is_empty()
            );
        }
    }

    #[tokio::test]
    async fn only_returns_reminders_whose_trigger_has_passed() {
        for ctx in create_contexts().await {
            let t = scheduled_at();
            let retention = Duration::hours(24);
            let (appointment, _) = insert_appointment(&ctx, t, &[15, 30]).await;

            let due = find_due_for(&ctx, &appointment, t - Duration::minutes(20), retention).await;
            assert_eq!(due.len(), 1);
            assert_eq!(due[0].lead_minutes, 30);

            let due = find_due_for(&ctx, &appointment, t - Duration::minutes(10), retention).await;
            assert_eq!(due.len(), 2);
        }
    }

    #[tokio::test]
    async fn handles_largest_lead() {
        for ctx in create_contexts().await {
            let t = scheduled_at();
            let (appointment, _) = insert_appointment(&ctx, t, &[MAX_LEAD_MINUTES]).await;

            let due = find_due_for(&ctx, &appointment, t - Duration::days(30), Duration::hours(24))
                .await;
            assert_eq!(due.len(), 1);
            assert_eq!(due[0].lead_minutes, MAX_LEAD_MINUTES);
        }
    }

    #[tokio::test]
    async fn skips_appointments_older_than_retention() {
        for ctx in create_contexts().await {
            let now = scheduled_at();
            let (appointment, _) = insert_appointment(&ctx, now - Duration::days(2), &[15]).await;

            assert!(find_due_for(&ctx, &appointment, now, Duration::hours(24))
                .await
                .is_empty());
            assert_eq!(
                find_due_for(&ctx, &appointment, now, Duration::days(3))
                    .await
                    .len(),
                1
            );
        }
    }

    #[tokio::test]
    async fn dispatched_reminders_are_not_due() {
        for ctx in create_contexts().await {
            let t = scheduled_at();
            let (appointment, reminders) = insert_appointment(&ctx, t, &[15]).await;

            assert!(ctx
                .repos
                .reminders
                .mark_dispatched(&reminders[0].id)
                .await
                .unwrap());
            // Already dispatched
            assert!(!ctx
                .repos
                .reminders
                .mark_dispatched(&reminders[0].id)
                .await
                .unwrap());
            assert!(!ctx.repos.reminders.mark_dispatched(&ID::new()).await.unwrap());

            assert!(find_due_for(&ctx, &appointment, t, Duration::hours(24))
                .await
                .is_empty());
        }
    }

    #[tokio::test]
    async fn replacing_resets_dispatch_state() {
        for ctx in create_contexts().await {
            let t = scheduled_at();
            let (appointment, reminders) = insert_appointment(&ctx, t, &[15, 30]).await;
            for reminder in &reminders {
                ctx.repos
                    .reminders
                    .mark_dispatched(&reminder.id)
                    .await
                    .unwrap();
            }

            let new_reminders = Reminder::for_appointment(&appointment.id, &[15, 30]).unwrap();
            ctx.repos
                .reminders
                .replace_for_appointment(&appointment.id, &new_reminders)
                .await
                .unwrap();

            let stored = ctx
                .repos
                .reminders
                .find_by_appointment(&appointment.id)
                .await
                .unwrap();
            assert_eq!(stored.len(), 2);
            assert!(stored.iter().all(|r| !r.dispatched));
            assert!(stored
                .iter()
                .all(|r| reminders.iter().all(|old| old.id != r.id)));
            assert_eq!(
                find_due_for(&ctx, &appointment, t, Duration::hours(24))
                    .await
                    .len(),
                2
            );
        }
    }
}
