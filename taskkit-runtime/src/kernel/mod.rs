//! The scheduler a [`Task`](crate::Task) runs on.
//!
//! TaskKit never schedules anything itself. It asks a [`Kernel`] to create a
//! pinned task, to report the tick count, to block the calling task until an
//! absolute tick, and to delete the calling task. On target this is a thin
//! layer over the RTOS (`xTaskCreatePinnedToCore`, `vTaskDelete(NULL)`,
//! `xTaskGetTickCount`, `xTaskDelayUntil`); off target, [`ThreadKernel`]
//! backs every task with an OS thread.

mod builder;
mod host;

pub use builder::ThreadKernelBuilder;
pub use host::{HostTaskId, ThreadKernel};

use crate::error::KernelError;
use crate::task::CoreAffinity;
use std::fmt;

/// Kernel tick counter. Wraps on overflow.
pub type Tick = u32;

/// Entry point handed to [`Kernel::create_pinned`].
///
/// The closure owns everything the new task needs and is called exactly once,
/// on the new task's own execution context. Dropping it without calling it
/// (for instance when creation fails) releases that state.
pub type TaskEntry = Box<dyn FnOnce() + Send + 'static>;

/// Placement and sizing for a task, copied out of a
/// [`TaskConfig`](crate::TaskConfig) for a single create call.
#[derive(Debug, Clone, Copy)]
pub struct SpawnParams<'a> {
    pub name: &'a str,
    /// Stack depth in kernel words, not bytes.
    pub stack_words: u32,
    pub priority: u32,
    pub core: CoreAffinity,
}

pub trait Kernel: Send + Sync + 'static {
    /// Opaque handle identifying a created task.
    type Handle: Copy + Eq + fmt::Debug + Send + Sync + 'static;

    /// Create a task running `entry`, pinned to `params.core`.
    ///
    /// Returns once the task has been accepted for scheduling; it may or may
    /// not have started running.
    fn create_pinned(
        &self,
        entry: TaskEntry,
        params: &SpawnParams<'_>,
    ) -> Result<Self::Handle, KernelError>;

    /// Delete the calling task. Only ever called from a task's own context as
    /// the last thing it does. Real kernels do not return from this.
    fn delete_self(&self);

    fn tick_count(&self) -> Tick;

    /// Advance `previous_wake` by `increment` ticks and block the calling task
    /// until that absolute tick. Returns at once if the wake time already
    /// passed; the anchor still advances.
    fn delay_until(&self, previous_wake: &mut Tick, increment: Tick);

    fn tick_rate_hz(&self) -> u32;

    /// Priorities must be strictly below this ceiling.
    fn max_priorities(&self) -> u32;

    /// Number of cores a task may be pinned to.
    fn core_count(&self) -> u8;

    /// Milliseconds to ticks, rounding down and saturating at [`Tick::MAX`].
    fn ms_to_ticks(&self, ms: u32) -> Tick {
        let ticks = u64::from(ms) * u64::from(self.tick_rate_hz()) / 1000;
        Tick::try_from(ticks).unwrap_or(Tick::MAX)
    }
}

/// Decide whether a task whose last wake was `previous_wake` must block
/// before `wake_time`, given the current tick `now`. Tick overflow is handled
/// the way `xTaskDelayUntil` handles it.
pub fn should_delay(previous_wake: Tick, wake_time: Tick, now: Tick) -> bool {
    if now < previous_wake {
        // Tick count has overflowed since the last wake.
        wake_time < previous_wake && wake_time > now
    } else {
        wake_time < previous_wake || wake_time > now
    }
}
