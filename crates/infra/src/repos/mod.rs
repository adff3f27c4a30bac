mod appointment;
mod category;
mod reminder;
mod shared;

pub use appointment::{IAppointmentRepo, InMemoryAppointmentRepo, PostgresAppointmentRepo};
pub use category::{ICategoryRepo, InMemoryCategoryRepo, PostgresCategoryRepo};
pub use reminder::{IReminderRepo, InMemoryReminderRepo, PostgresReminderRepo};

use appointer_domain::{Appointment, Reminder};
use sqlx::postgres::PgPoolOptions;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub appointments: Arc<dyn IAppointmentRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
    pub categories: Arc<dyn ICategoryRepo>,
}

impl Repos {
    /// Connects to postgres and applies the embedded schema migrations
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB APPLYING MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB APPLYING MIGRATIONS ... [done]");

        Ok(Self {
            appointments: Arc::new(PostgresAppointmentRepo::new(pool.clone())),
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            categories: Arc::new(PostgresCategoryRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        // Appointments and reminders share their tables so that deletes can
        // cascade and the due reminder query can join
        let appointments: Arc<Mutex<Vec<Appointment>>> = Default::default();
        let reminders: Arc<Mutex<Vec<Reminder>>> = Default::default();

        Self {
            appointments: Arc::new(InMemoryAppointmentRepo::new(
                appointments.clone(),
                reminders.clone(),
            )),
            reminders: Arc::new(InMemoryReminderRepo::new(appointments, reminders)),
            categories: Arc::new(InMemoryCategoryRepo::new()),
        }
    }
}
