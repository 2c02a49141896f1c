use super::builder::ThreadKernelBuilder;
use super::{should_delay, Kernel, SpawnParams, TaskEntry, Tick};
use crate::error::KernelError;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Handle of a task created by [`ThreadKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostTaskId(pub u32);

/// A [`Kernel`] that runs every task on its own OS thread.
///
/// Ticks are derived from a monotonic clock started when the kernel is built.
/// Priority and core affinity are validated by the caller but not enforced;
/// the host OS schedules the threads.
pub struct ThreadKernel {
    pub(crate) epoch: Instant,
    pub(crate) tick_rate_hz: u32,
    pub(crate) max_priorities: u32,
    pub(crate) cores: u8,
    pub(crate) next_id: AtomicU32,
}

impl Default for ThreadKernel {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ThreadKernel {
    pub fn builder() -> ThreadKernelBuilder {
        ThreadKernelBuilder::new()
    }

    fn tick_to_instant(&self, tick: u64) -> Instant {
        let hz = u64::from(self.tick_rate_hz);
        // `tick % hz` is below `u32::MAX`, so the nanosecond part cannot overflow.
        let offset = Duration::from_secs(tick / hz)
            + Duration::from_nanos((tick % hz) * 1_000_000_000 / hz);
        self.epoch + offset
    }

    fn elapsed_ticks(&self) -> u64 {
        let nanos = self.epoch.elapsed().as_nanos();
        (nanos * u128::from(self.tick_rate_hz) / 1_000_000_000) as u64
    }
}

impl Kernel for ThreadKernel {
    type Handle = HostTaskId;

    fn create_pinned(
        &self,
        entry: TaskEntry,
        params: &SpawnParams<'_>,
    ) -> Result<HostTaskId, KernelError> {
        let id = HostTaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let stack_bytes = (params.stack_words as usize).saturating_mul(std::mem::size_of::<usize>());

        debug!(
            target: crate::LOG_TAG,
            name = params.name,
            id = id.0,
            stack_bytes,
            priority = params.priority,
            core = %params.core,
            "Spawning host thread"
        );

        thread::Builder::new()
            .name(params.name.to_string())
            .stack_size(stack_bytes)
            .spawn(entry)?;

        Ok(id)
    }

    fn delete_self(&self) {
        debug!(
            target: crate::LOG_TAG,
            thread = thread::current().name().unwrap_or("<unnamed>"),
            "Host task exiting"
        );
    }

    fn tick_count(&self) -> Tick {
        self.elapsed_ticks() as Tick
    }

    fn delay_until(&self, previous_wake: &mut Tick, increment: Tick) {
        let now_full = self.elapsed_ticks();
        let now = now_full as Tick;
        let wake_time = previous_wake.wrapping_add(increment);
        let delay = should_delay(*previous_wake, wake_time, now);
        *previous_wake = wake_time;

        if delay {
            let remaining = u64::from(wake_time.wrapping_sub(now));
            let deadline = self.tick_to_instant(now_full + remaining);
            if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
                thread::sleep(wait);
            }
        }
    }

    fn tick_rate_hz(&self) -> u32 {
        self.tick_rate_hz
    }

    fn max_priorities(&self) -> u32 {
        self.max_priorities
    }

    fn core_count(&self) -> u8 {
        self.cores
    }
}
