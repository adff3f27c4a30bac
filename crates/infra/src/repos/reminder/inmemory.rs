use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use appointer_domain::{is_reminder_due, Appointment, DueReminder, Reminder, ID};
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

pub struct InMemoryReminderRepo {
    appointments: Arc<Mutex<Vec<Appointment>>>,
    reminders: Arc<Mutex<Vec<Reminder>>>,
}

impl InMemoryReminderRepo {
    pub fn new(
        appointments: Arc<Mutex<Vec<Appointment>>>,
        reminders: Arc<Mutex<Vec<Reminder>>>,
    ) -> Self {
        Self {
            appointments,
            reminders,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn find_by_appointment(&self, appointment_id: &ID) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = find_by(&self.reminders, |r| r.appointment_id == *appointment_id);
        reminders.sort_by_key(|r| std::cmp::Reverse(r.lead_minutes));
        Ok(reminders)
    }

    async fn find_due(
        &self,
        now: DateTime<Utc>,
        retention: Duration,
    ) -> anyhow::Result<Vec<DueReminder>> {
        let due = with_both(&self.appointments, &self.reminders, |appointments, reminders| {
            let mut due = Vec::new();
            for a in appointments.iter() {
                for r in reminders.iter().filter(|r| r.appointment_id == a.id) {
                    if is_reminder_due(a.scheduled_at, r.lead_minutes, r.dispatched, now, retention)
                    {
                        due.push(DueReminder {
                            reminder_id: r.id.clone(),
                            lead_minutes: r.lead_minutes,
                            appointment_id: a.id.clone(),
                            title: a.title.clone(),
                            scheduled_at: a.scheduled_at,
                            timezone: a.timezone,
                            user_id: a.user_id.clone(),
                        });
                    }
                }
            }
            due
        });
        Ok(due)
    }

    async fn mark_dispatched(&self, reminder_id: &ID) -> anyhow::Result<bool> {
        let updated = update_many(
            &self.reminders,
            |r| r.id == *reminder_id && !r.dispatched,
            |r| r.dispatched = true,
        );
        Ok(updated > 0)
    }

    async fn replace_for_appointment(
        &self,
        appointment_id: &ID,
        reminders: &[Reminder],
    ) -> anyhow::Result<()> {
        // Both steps under one lock so readers never see a half replaced set
        with_both(&self.appointments, &self.reminders, |_, stored| {
            stored.retain(|r| r.appointment_id != *appointment_id);
            stored.extend(reminders.iter().cloned());
        });
        Ok(())
    }
}
