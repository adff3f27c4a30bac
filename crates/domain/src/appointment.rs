use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// An `Appointment` is something a `User` has scheduled at a specific instant.
/// The instant is stored in UTC, `timezone` is the zone it was entered in
/// and is only used for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: ID,
    /// The external user that owns this `Appointment`
    pub user_id: ID,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    pub timezone: Tz,
    pub category_id: Option<ID>,
    pub created: i64,
    pub updated: i64,
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidAppointmentError {
    #[error("Appointment title cannot be empty")]
    EmptyTitle,
}

fn validate_title(title: &str) -> Result<String, InvalidAppointmentError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(InvalidAppointmentError::EmptyTitle);
    }
    Ok(title.to_string())
}

impl Appointment {
    pub fn new(
        user_id: ID,
        title: &str,
        scheduled_at: DateTime<Utc>,
        timezone: Tz,
        category_id: Option<ID>,
        now_millis: i64,
    ) -> Result<Self, InvalidAppointmentError> {
        Ok(Self {
            id: Default::default(),
            user_id,
            title: validate_title(title)?,
            scheduled_at,
            timezone,
            category_id,
            created: now_millis,
            updated: now_millis,
        })
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), InvalidAppointmentError> {
        self.title = validate_title(title)?;
        Ok(())
    }
}

impl Entity for Appointment {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn it_rejects_empty_titles() {
        let scheduled_at = Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap();
        let res = Appointment::new(ID::new(), "   ", scheduled_at, chrono_tz::UTC, None, 0);
        assert_eq!(res.unwrap_err(), InvalidAppointmentError::EmptyTitle);

        let mut appointment =
            Appointment::new(ID::new(), " Dentist ", scheduled_at, chrono_tz::UTC, None, 0)
                .expect("Valid appointment");
        assert_eq!(appointment.title, "Dentist");
        assert!(appointment.set_title("").is_err());
        assert_eq!(appointment.title, "Dentist");
    }
}
