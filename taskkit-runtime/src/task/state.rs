use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// State shared between a [`Task`](super::Task) and the unit it started.
///
/// The flags are atomics so snapshots never block. Transitions go through
/// `slot`, which also carries a run counter: a unit only ever clears the run
/// it was started for, and a creator only stores a handle for a run that is
/// still live.
pub(crate) struct TaskState<H> {
    running: AtomicBool,
    stop_requested: AtomicBool,
    slot: Mutex<Slot<H>>,
    running_tx: watch::Sender<bool>,
}

struct Slot<H> {
    handle: Option<H>,
    cycle: u64,
    name: String,
}

impl<H: Copy> TaskState<H> {
    pub(crate) fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            slot: Mutex::new(Slot {
                handle: None,
                cycle: 0,
                name: String::new(),
            }),
            running_tx: watch::Sender::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<H>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    pub(crate) fn handle(&self) -> Option<H> {
        self.lock().handle
    }

    /// Name of the current (or last) run.
    pub(crate) fn name(&self) -> String {
        self.lock().name.clone()
    }

    /// Returns false when idle, in which case nothing changes.
    pub(crate) fn request_stop(&self) -> bool {
        let _slot = self.lock();
        if !self.is_running() {
            return false;
        }
        self.stop_requested.store(true, Ordering::Release);
        true
    }

    /// Mark a new run as live. `None` if one already is.
    pub(crate) fn claim(&self, name: &str) -> Option<u64> {
        let mut slot = self.lock();
        if self.is_running() {
            return None;
        }
        slot.cycle = slot.cycle.wrapping_add(1);
        slot.handle = None;
        slot.name.clear();
        slot.name.push_str(name);
        self.stop_requested.store(false, Ordering::Release);
        self.running.store(true, Ordering::Release);
        self.running_tx.send_replace(true);
        Some(slot.cycle)
    }

    /// Record the kernel handle for `cycle` unless that run already ended.
    pub(crate) fn attach(&self, cycle: u64, handle: H) {
        let mut slot = self.lock();
        if slot.cycle == cycle && self.is_running() {
            slot.handle = Some(handle);
        }
    }

    /// End run `cycle`: clear the handle and both flags, wake `stopped()`
    /// waiters. Returns false if `cycle` is not the live run.
    pub(crate) fn release(&self, cycle: u64) -> bool {
        let mut slot = self.lock();
        if slot.cycle != cycle || !self.is_running() {
            return false;
        }
        slot.handle = None;
        self.stop_requested.store(false, Ordering::Release);
        self.running.store(false, Ordering::Release);
        self.running_tx.send_replace(false);
        true
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.running_tx.subscribe()
    }
}
