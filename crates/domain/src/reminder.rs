use crate::{
    notification::Notification,
    shared::entity::{Entity, ID},
};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// A `Reminder` represents a specific number of minutes before an `Appointment`
/// at which the owner of the `Appointment` should be notified.
///
/// `dispatched` starts out as false and is only ever flipped to true by the
/// reminder dispatcher after the notification was delivered. Editing the
/// `Appointment` replaces all of its `Reminder`s, which is the only way
/// a reminder becomes undispatched again.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    /// The `Appointment` this `Reminder` is associated with
    pub appointment_id: ID,
    /// Minutes before the `Appointment` the notification should be sent
    pub lead_minutes: i64,
    /// Whether a notification has been successfully sent for this `Reminder`
    pub dispatched: bool,
}

/// Upper bound for the lead time of a `Reminder`, roughly ten years
pub const MAX_LEAD_MINUTES: i64 = 10 * 366 * 24 * 60;

#[derive(Error, Debug, PartialEq)]
pub enum InvalidReminderError {
    #[error("Reminder lead time must be zero or more minutes, got: {0}")]
    NegativeLead(i64),
    #[error("Reminder lead time cannot be more than ten years, got: {0} minutes")]
    LeadTooLarge(i64),
}

impl InvalidReminderError {
    /// The rejected lead time
    pub fn lead_minutes(&self) -> i64 {
        match self {
            Self::NegativeLead(lead) | Self::LeadTooLarge(lead) => *lead,
        }
    }
}

impl Reminder {
    pub fn new(appointment_id: &ID, lead_minutes: i64) -> Result<Self, InvalidReminderError> {
        if lead_minutes < 0 {
            return Err(InvalidReminderError::NegativeLead(lead_minutes));
        }
        if lead_minutes > MAX_LEAD_MINUTES {
            return Err(InvalidReminderError::LeadTooLarge(lead_minutes));
        }
        Ok(Self {
            id: Default::default(),
            appointment_id: appointment_id.clone(),
            lead_minutes,
            dispatched: false,
        })
    }

    /// Creates one undispatched `Reminder` per distinct lead time, keeping
    /// the order in which the lead times were first given.
    pub fn for_appointment(
        appointment_id: &ID,
        lead_minutes: &[i64],
    ) -> Result<Vec<Self>, InvalidReminderError> {
        let mut reminders: Vec<Self> = Vec::with_capacity(lead_minutes.len());
        for lead in lead_minutes {
            if reminders.iter().any(|r| r.lead_minutes == *lead) {
                continue;
            }
            reminders.push(Self::new(appointment_id, *lead)?);
        }
        Ok(reminders)
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// `None` when the trigger instant is not representable, i.e. it lies before
/// any instant `now` could be
fn trigger_at(scheduled_at: DateTime<Utc>, lead_minutes: i64) -> Option<DateTime<Utc>> {
    Duration::try_minutes(lead_minutes).and_then(|lead| scheduled_at.checked_sub_signed(lead))
}

/// Whether a reminder should be dispatched at `now`.
///
/// It is due when it has not been dispatched, its trigger instant has passed and
/// the appointment is still within the `retention` window. Reminders of appointments
/// older than the window are never sent.
pub fn is_reminder_due(
    scheduled_at: DateTime<Utc>,
    lead_minutes: i64,
    dispatched: bool,
    now: DateTime<Utc>,
    retention: Duration,
) -> bool {
    let triggered = trigger_at(scheduled_at, lead_minutes).map_or(true, |t| t <= now);
    let within_retention = now
        .checked_sub_signed(retention)
        .map_or(true, |oldest| scheduled_at > oldest);
    !dispatched && triggered && within_retention
}

/// A `Reminder` that is ready to be dispatched, joined with the
/// `Appointment` data needed to notify its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct DueReminder {
    pub reminder_id: ID,
    pub lead_minutes: i64,
    pub appointment_id: ID,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
    pub timezone: Tz,
    pub user_id: ID,
}

impl DueReminder {
    pub fn subject(&self) -> String {
        format!("Reminder: {}", self.title)
    }

    /// Scheduled instant formatted for humans in the appointment timezone,
    /// e.g. `Monday 2 March 2026 at 15:30 (CET)`
    pub fn scheduled_at_display(&self) -> String {
        self.scheduled_at
            .with_timezone(&self.timezone)
            .format("%A %-d %B %Y at %H:%M (%Z)")
            .to_string()
    }

    pub fn body(&self) -> String {
        let lead = match self.lead_minutes {
            0 => "This reminder was sent at the time of your appointment.".to_string(),
            1 => "This reminder was sent 1 minute before your appointment.".to_string(),
            minutes => format!(
                "This reminder was sent {} minutes before your appointment.",
                minutes
            ),
        };
        format!(
            "Hi,\n\nYour appointment \"{}\" is scheduled for {}.\n\n{}\n",
            self.title,
            self.scheduled_at_display(),
            lead
        )
    }

    pub fn notification(&self, to: &str) -> Notification {
        Notification {
            to: to.to_string(),
            subject: self.subject(),
            body: self.body(),
        }
    }
}
