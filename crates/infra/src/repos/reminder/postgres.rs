use super::IReminderRepo;
use appointer_domain::{parse_timezone, DueReminder, Reminder, ID};
use chrono::{DateTime, Duration, Utc};
use sqlx::{types::Uuid, FromRow, PgConnection, PgPool};
use tracing::warn;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    appointment_uid: Uuid,
    lead_minutes: i64,
    dispatched: bool,
}

impl From<ReminderRaw> for Reminder {
    fn from(raw: ReminderRaw) -> Self {
        Reminder {
            id: raw.reminder_uid.into(),
            appointment_id: raw.appointment_uid.into(),
            lead_minutes: raw.lead_minutes,
            dispatched: raw.dispatched,
        }
    }
}

#[derive(Debug, FromRow)]
struct DueReminderRaw {
    reminder_uid: Uuid,
    lead_minutes: i64,
    appointment_uid: Uuid,
    title: String,
    scheduled_at: DateTime<Utc>,
    timezone: String,
    user_uid: Uuid,
}

impl From<DueReminderRaw> for DueReminder {
    fn from(raw: DueReminderRaw) -> Self {
        let timezone = parse_timezone(&raw.timezone).unwrap_or_else(|| {
            warn!(
                "Appointment {} has unknown timezone: {}, using UTC",
                raw.appointment_uid, raw.timezone
            );
            chrono_tz::UTC
        });
        DueReminder {
            reminder_id: raw.reminder_uid.into(),
            lead_minutes: raw.lead_minutes,
            appointment_id: raw.appointment_uid.into(),
            title: raw.title,
            scheduled_at: raw.scheduled_at,
            timezone,
            user_id: raw.user_uid.into(),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn find_by_appointment(&self, appointment_id: &ID) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.appointment_uid = $1
            ORDER BY r.lead_minutes DESC
            "#,
        )
        .bind(appointment_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    async fn find_due(
        &self,
        now: DateTime<Utc>,
        retention: Duration,
    ) -> anyhow::Result<Vec<DueReminder>> {
        let reminders = sqlx::query_as::<_, DueReminderRaw>(
            r#"
            SELECT
                r.reminder_uid,
                r.lead_minutes,
                a.appointment_uid,
                a.title,
                a.scheduled_at,
                a.timezone,
                a.user_uid
            FROM reminders AS r
            INNER JOIN appointments AS a ON a.appointment_uid = r.appointment_uid
            WHERE r.dispatched = FALSE
            AND a.scheduled_at - r.lead_minutes * interval '1 minute' <= $1
            AND a.scheduled_at > $2
            ORDER BY a.appointment_uid, r.lead_minutes DESC
            "#,
        )
        .bind(now)
        .bind(
            now.checked_sub_signed(retention)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    async fn mark_dispatched(&self, reminder_id: &ID) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
                SET dispatched = TRUE
            WHERE reminder_uid = $1 AND dispatched = FALSE
            "#,
        )
        .bind(reminder_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn replace_for_appointment(
        &self,
        appointment_id: &ID,
        reminders: &[Reminder],
    ) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;
        replace_reminders(&mut *tx, appointment_id, reminders).await?;
        tx.commit().await?;
        Ok(())
    }
}

/// Deletes the `Reminder`s of the `Appointment` and inserts `reminders` on the given
/// connection. Callers are responsible for running it inside a transaction.
pub(crate) async fn replace_reminders(
    conn: &mut PgConnection,
    appointment_id: &ID,
    reminders: &[Reminder],
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        DELETE FROM reminders AS r
        WHERE r.appointment_uid = $1
        "#,
    )
    .bind(appointment_id.inner_ref())
    .execute(&mut *conn)
    .await?;

    for reminder in reminders {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, appointment_uid, lead_minutes, dispatched)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(appointment_id.inner_ref())
        .bind(reminder.lead_minutes)
        .bind(reminder.dispatched)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}
