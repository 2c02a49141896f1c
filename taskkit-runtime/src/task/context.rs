//! Contexts carried across the create call and the trampolines that consume
//! them on the new task.

use super::state::TaskState;
use crate::kernel::Kernel;
use crate::LOG_TAG;
use std::sync::Arc;
use tracing::{debug, info};

pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;
pub(crate) type LoopBody = Box<dyn FnMut() -> bool + Send + 'static>;

pub(crate) struct StartContext<H> {
    pub(crate) state: Arc<TaskState<H>>,
    pub(crate) cycle: u64,
    pub(crate) job: Job,
}

pub(crate) struct LoopContext<H> {
    pub(crate) state: Arc<TaskState<H>>,
    pub(crate) cycle: u64,
    pub(crate) body: LoopBody,
    pub(crate) period_ms: u32,
}

/// Ends the run if the task unwinds out of user code.
struct ExitGuard<H: Copy> {
    state: Arc<TaskState<H>>,
    cycle: u64,
}

impl<H: Copy> Drop for ExitGuard<H> {
    fn drop(&mut self) {
        if self.state.release(self.cycle) {
            info!(target: LOG_TAG, name = %self.state.name(), "task exited");
        }
    }
}

fn exit<K: Kernel>(kernel: &K, guard: ExitGuard<K::Handle>) {
    drop(guard);
    kernel.delete_self();
}

pub(crate) fn task_entry<K: Kernel>(kernel: Arc<K>, ctx: Box<StartContext<K::Handle>>) {
    let StartContext { state, cycle, job } = *ctx;
    let guard = ExitGuard { state, cycle };

    job();

    exit(&*kernel, guard);
}

pub(crate) fn loop_entry<K: Kernel>(kernel: Arc<K>, ctx: Box<LoopContext<K::Handle>>) {
    let LoopContext {
        state,
        cycle,
        mut body,
        period_ms,
    } = *ctx;
    let guard = ExitGuard { state, cycle };

    // pdMS_TO_TICKS rounds down; never hand delay_until a zero increment.
    let increment = match period_ms {
        0 => 0,
        ms => kernel.ms_to_ticks(ms).max(1),
    };
    let mut last_wake = kernel.tick_count();
    let mut iterations: u64 = 0;

    loop {
        if guard.state.stop_requested() {
            debug!(target: LOG_TAG, iterations, "loop stopping on request");
            break;
        }

        iterations += 1;
        if !body() {
            debug!(target: LOG_TAG, iterations, "loop body finished");
            break;
        }

        if increment > 0 {
            kernel.delay_until(&mut last_wake, increment);
        }
    }

    drop(body);
    exit(&*kernel, guard);
}
