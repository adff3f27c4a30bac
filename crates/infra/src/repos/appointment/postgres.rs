use super::IAppointmentRepo;
use crate::repos::reminder::replace_reminders;
use appointer_domain::{parse_timezone, Appointment, Reminder, ID};
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::{error, warn};

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AppointmentRaw {
    appointment_uid: Uuid,
    user_uid: Uuid,
    title: String,
    scheduled_at: DateTime<Utc>,
    timezone: String,
    category_uid: Option<Uuid>,
    created: i64,
    updated: i64,
}

impl From<AppointmentRaw> for Appointment {
    fn from(raw: AppointmentRaw) -> Self {
        let timezone = parse_timezone(&raw.timezone).unwrap_or_else(|| {
            warn!(
                "Appointment {} has unknown timezone: {}, using UTC",
                raw.appointment_uid, raw.timezone
            );
            chrono_tz::UTC
        });
        Appointment {
            id: raw.appointment_uid.into(),
            user_id: raw.user_uid.into(),
            title: raw.title,
            scheduled_at: raw.scheduled_at,
            timezone,
            category_id: raw.category_uid.map(|id| id.into()),
            created: raw.created,
            updated: raw.updated,
        }
    }
}

#[async_trait::async_trait]
impl IAppointmentRepo for PostgresAppointmentRepo {
    async fn insert(&self, a: &Appointment, reminders: &[Reminder]) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO appointments(
                appointment_uid,
                user_uid,
                title,
                scheduled_at,
                timezone,
                category_uid,
                created,
                updated
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(a.id.inner_ref())
        .bind(a.user_id.inner_ref())
        .bind(&a.title)
        .bind(a.scheduled_at)
        .bind(a.timezone.name())
        .bind(a.category_id.as_ref().map(|id| *id.inner_ref()))
        .bind(a.created)
        .bind(a.updated)
        .execute(&mut *tx)
        .await?;

        replace_reminders(&mut *tx, &a.id, reminders).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn save(&self, a: &Appointment, reminders: &[Reminder]) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE appointments SET
                user_uid = $2,
                title = $3,
                scheduled_at = $4,
                timezone = $5,
                category_uid = $6,
                created = $7,
                updated = $8
            WHERE appointment_uid = $1
            "#,
        )
        .bind(a.id.inner_ref())
        .bind(a.user_id.inner_ref())
        .bind(&a.title)
        .bind(a.scheduled_at)
        .bind(a.timezone.name())
        .bind(a.category_id.as_ref().map(|id| *id.inner_ref()))
        .bind(a.created)
        .bind(a.updated)
        .execute(&mut *tx)
        .await?;

        replace_reminders(&mut *tx, &a.id, reminders).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn find(&self, appointment_id: &ID) -> Option<Appointment> {
        match sqlx::query_as::<_, AppointmentRaw>(
            r#"
            SELECT * FROM appointments AS a
            WHERE a.appointment_uid = $1
            "#,
        )
        .bind(appointment_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(appointment) => appointment.map(|a| a.into()),
            Err(e) => {
                error!("Unable to find appointment {}. Err: {:?}", appointment_id, e);
                None
            }
        }
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, AppointmentRaw>(
            r#"
            SELECT * FROM appointments AS a
            WHERE a.user_uid = $1
            ORDER BY a.scheduled_at
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments.into_iter().map(|a| a.into()).collect())
    }

    async fn delete(&self, appointment_id: &ID) -> Option<Appointment> {
        // Reminders are removed by the ON DELETE CASCADE foreign key
        match sqlx::query_as::<_, AppointmentRaw>(
            r#"
            DELETE FROM appointments AS a
            WHERE a.appointment_uid = $1
            RETURNING *
            "#,
        )
        .bind(appointment_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(appointment) => appointment.map(|a| a.into()),
            Err(e) => {
                error!("Unable to delete appointment {}. Err: {:?}", appointment_id, e);
                None
            }
        }
    }
}
