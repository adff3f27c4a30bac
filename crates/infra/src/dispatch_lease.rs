use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::{Mutex, MutexGuard};

/// Exclusive right to dispatch reminders from a store.
///
/// Cloned together with the context, so every clone of the same context
/// shares the lease. Two dispatchers on the same store would send every
/// reminder twice, and so would two sweeps running at the same time, which
/// is why every sweep holds `lock_sweep` while it runs.
#[derive(Clone, Default)]
pub struct DispatchLease {
    held: Arc<AtomicBool>,
    sweep: Arc<Mutex<()>>,
}

/// Releases the `DispatchLease` when dropped
pub struct DispatchLeaseGuard {
    held: Arc<AtomicBool>,
}

impl DispatchLease {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns `None` if the lease is already held
    pub fn try_acquire(&self) -> Option<DispatchLeaseGuard> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| DispatchLeaseGuard {
                held: self.held.clone(),
            })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// Waits until no other sweep of this store is running
    pub async fn lock_sweep(&self) -> MutexGuard<'_, ()> {
        self.sweep.lock().await
    }
}

impl Drop for DispatchLeaseGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}
