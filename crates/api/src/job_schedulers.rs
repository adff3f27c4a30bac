use crate::{reminder::send_due_reminders::SendDueRemindersUseCase, shared::usecase::execute};
use appointer_infra::AppointerContext;
use std::time::Duration;
use thiserror::Error;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::info;

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SchedulerError {
    #[error("A reminder dispatcher is already running for this store")]
    AlreadyRunning,
}

/// Handle to the background task that periodically sends due reminders.
///
/// Sweeps never overlap and a sweep that has started always runs to completion.
/// Dropping the handle stops the dispatcher the same way `stop` does, but without
/// waiting for it.
pub struct ReminderScheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ReminderScheduler {
    /// Starts dispatching reminders with the first sweep at the next whole minute.
    /// Fails if a dispatcher is already running for the store of this context.
    pub fn start(ctx: AppointerContext) -> Result<Self, SchedulerError> {
        let lease = ctx
            .dispatch_lease
            .try_acquire()
            .ok_or(SchedulerError::AlreadyRunning)?;
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let handle = actix_web::rt::spawn(async move {
            let _lease = lease;

            let now = ctx.sys.get_timestamp_millis();
            let secs_to_next_run = get_start_delay(now as usize, 0);
            let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);
            let mut sweep_interval = interval_at(start, ctx.config.reminder_sweep_interval);
            sweep_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(
                "Reminder dispatcher started, first sweep in {} seconds",
                secs_to_next_run
            );

            loop {
                tokio::select! {
                    _ = sweep_interval.tick() => {}
                    _ = shutdown_rx.changed() => break,
                }
                // Errors are logged by the use case, the next tick retries
                let _ = execute(SendDueRemindersUseCase::default(), &ctx).await;
            }

            info!("Reminder dispatcher stopped");
        });

        Ok(Self { shutdown, handle })
    }

    /// Stops the dispatcher and waits for a sweep in progress to finish
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
