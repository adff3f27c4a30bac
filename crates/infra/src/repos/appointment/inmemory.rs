use super::IAppointmentRepo;
use crate::repos::shared::inmemory_repo::*;
use appointer_domain::{Appointment, Reminder, ID};
use std::sync::{Arc, Mutex};

pub struct InMemoryAppointmentRepo {
    appointments: Arc<Mutex<Vec<Appointment>>>,
    reminders: Arc<Mutex<Vec<Reminder>>>,
}

impl InMemoryAppointmentRepo {
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
impl IAppointmentRepo for InMemoryAppointmentRepo {
    async fn insert(
        &self,
        appointment: &Appointment,
        reminders: &[Reminder],
    ) -> anyhow::Result<()> {
        with_both(&self.appointments, &self.reminders, |appointments, stored| {
            appointments.push(appointment.clone());
            stored.extend(reminders.iter().cloned());
        });
        Ok(())
    }

    async fn save(&self, appointment: &Appointment, reminders: &[Reminder]) -> anyhow::Result<()> {
        with_both(&self.appointments, &self.reminders, |appointments, stored| {
            for item in appointments.iter_mut().filter(|a| a.id == appointment.id) {
                *item = appointment.clone();
            }
            stored.retain(|r| r.appointment_id != appointment.id);
            stored.extend(reminders.iter().cloned());
        });
        Ok(())
    }

    async fn find(&self, appointment_id: &ID) -> Option<Appointment> {
        find(appointment_id, &self.appointments)
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Appointment>> {
        let mut appointments = find_by(&self.appointments, |a| a.user_id == *user_id);
        appointments.sort_by_key(|a| a.scheduled_at);
        Ok(appointments)
    }

    async fn delete(&self, appointment_id: &ID) -> Option<Appointment> {
        with_both(&self.appointments, &self.reminders, |appointments, reminders| {
            let index = appointments.iter().position(|a| a.id == *appointment_id)?;
            let deleted = appointments.remove(index);
            reminders.retain(|r| r.appointment_id != deleted.id);
            Some(deleted)
        })
    }
}
