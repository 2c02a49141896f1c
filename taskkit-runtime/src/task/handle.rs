use super::config::TaskConfig;
use super::context::{loop_entry, task_entry, LoopContext, StartContext};
use super::state::TaskState;
use super::validate::{validate_core, validate_priority};
use crate::error::TaskError;
use crate::kernel::{Kernel, SpawnParams, TaskEntry};
use crate::LOG_TAG;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Owner of at most one running kernel task.
///
/// A `Task` starts idle. [`start`](Task::start), [`spawn`](Task::spawn),
/// [`start_loop`](Task::start_loop) and [`run_every`](Task::run_every) create
/// a kernel task and mark the handle running; the handle goes back to idle
/// only when that task finishes, from the task itself. An idle handle can be
/// started again.
///
/// Stopping is cooperative: [`request_stop`](Task::request_stop) sets a flag
/// that a looping task checks before every iteration. A one-shot task always
/// runs to completion.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use taskkit_runtime::{Task, TaskConfig, ThreadKernel};
///
/// let task = Task::new(Arc::new(ThreadKernel::default()));
/// let mut ticks = 0;
/// task.run_every(
///     move || {
///         ticks += 1;
///         ticks < 3
///     },
///     &TaskConfig::default().with_name("ticker"),
///     5,
/// )
/// .expect("start ticker");
/// ```
pub struct Task<K: Kernel> {
    kernel: Arc<K>,
    state: Arc<TaskState<K::Handle>>,
}

impl<K: Kernel> Task<K> {
    pub fn new(kernel: Arc<K>) -> Self {
        Self {
            kernel,
            state: Arc::new(TaskState::new()),
        }
    }

    pub fn kernel(&self) -> &Arc<K> {
        &self.kernel
    }

    /// Run `entry(arg)` once on a new kernel task.
    ///
    /// Returns as soon as the kernel accepted the task; it does not wait for
    /// the task to begin.
    pub fn start<A>(
        &self,
        entry: Option<fn(A)>,
        arg: A,
        config: &TaskConfig,
    ) -> Result<(), TaskError>
    where
        A: Send + 'static,
    {
        let Some(entry) = entry else {
            error!(target: LOG_TAG, "start failed: null function");
            return Err(TaskError::NullFunction);
        };
        self.spawn(move || entry(arg), config)
    }

    /// Closure form of [`start`](Task::start).
    pub fn spawn<F>(&self, f: F, config: &TaskConfig) -> Result<(), TaskError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.launch("start", config, |kernel, state, cycle| {
            let ctx = Box::new(StartContext {
                state,
                cycle,
                job: Box::new(f),
            });
            let entry: TaskEntry = Box::new(move || task_entry(kernel, ctx));
            entry
        })
    }

    /// Call `body` repeatedly on a new kernel task until it returns `false`
    /// or a stop is requested.
    ///
    /// Iterations are anchored to absolute ticks `period_ms` apart, so time
    /// spent in `body` does not accumulate as drift. A period of zero runs
    /// iterations back to back.
    pub fn start_loop<F>(
        &self,
        body: Option<F>,
        config: &TaskConfig,
        period_ms: u32,
    ) -> Result<(), TaskError>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let Some(body) = body else {
            error!(target: LOG_TAG, "start_loop failed: empty loop body");
            return Err(TaskError::EmptyLoopBody);
        };
        self.launch("start_loop", config, |kernel, state, cycle| {
            let ctx = Box::new(LoopContext {
                state,
                cycle,
                body: Box::new(body),
                period_ms,
            });
            let entry: TaskEntry = Box::new(move || loop_entry(kernel, ctx));
            entry
        })
    }

    /// Closure form of [`start_loop`](Task::start_loop).
    pub fn run_every<F>(&self, body: F, config: &TaskConfig, period_ms: u32) -> Result<(), TaskError>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.start_loop(Some(body), config, period_ms)
    }

    fn launch<M>(&self, op: &'static str, config: &TaskConfig, make_entry: M) -> Result<(), TaskError>
    where
        M: FnOnce(Arc<K>, Arc<TaskState<K::Handle>>, u64) -> TaskEntry,
    {
        if self.state.is_running() {
            warn!(target: LOG_TAG, op, name = %config.name, "start called while running");
            return Err(TaskError::AlreadyRunning);
        }

        let ceiling = self.kernel.max_priorities();
        if !validate_priority(config.priority, ceiling) {
            error!(target: LOG_TAG, op, priority = config.priority, ceiling, "start failed: invalid priority");
            return Err(TaskError::InvalidPriority {
                priority: config.priority,
                ceiling,
            });
        }

        let core_count = self.kernel.core_count();
        if !validate_core(config.core, core_count) {
            error!(target: LOG_TAG, op, core = %config.core, core_count, "start failed: invalid core");
            return Err(TaskError::InvalidCore {
                core: config.core,
                core_count,
            });
        }

        let Some(cycle) = self.state.claim(&config.name) else {
            warn!(target: LOG_TAG, op, name = %config.name, "start called while running");
            return Err(TaskError::AlreadyRunning);
        };

        let entry = make_entry(Arc::clone(&self.kernel), Arc::clone(&self.state), cycle);
        let params = SpawnParams {
            name: &config.name,
            stack_words: config.stack_words,
            priority: config.priority,
            core: config.core,
        };

        match self.kernel.create_pinned(entry, &params) {
            Ok(handle) => {
                self.state.attach(cycle, handle);
                if op == "start_loop" {
                    info!(target: LOG_TAG, op, name = %config.name, ?handle, "loop task started");
                } else {
                    info!(target: LOG_TAG, op, name = %config.name, ?handle, "task started");
                }
                Ok(())
            }
            Err(err) => {
                self.state.release(cycle);
                error!(target: LOG_TAG, op, name = %config.name, error = %err, "start failed: kernel rejected task");
                Err(TaskError::Kernel(err))
            }
        }
    }

    /// Snapshot; the task may finish right after this returns `true`.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Kernel handle of the running task, `None` when idle. For diagnostics
    /// and interop only.
    pub fn handle(&self) -> Option<K::Handle> {
        self.state.handle()
    }

    /// Ask a running loop to finish after its current iteration. No effect
    /// when idle; never blocks.
    pub fn request_stop(&self) {
        if self.state.request_stop() {
            info!(target: LOG_TAG, name = %self.state.name(), "stop requested");
        }
    }

    pub fn stop_requested(&self) -> bool {
        self.state.stop_requested()
    }

    /// Resolves once the handle is idle, immediately if it already is.
    pub async fn stopped(&self) {
        let mut running = self.state.subscribe();
        let _ = running.wait_for(|running| !*running).await;
    }
}

impl<K: Kernel> fmt::Debug for Task<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("running", &self.is_running())
            .field("stop_requested", &self.stop_requested())
            .field("handle", &self.handle())
            .finish()
    }
}

impl<K: Kernel> Drop for Task<K> {
    /// The task keeps its own reference to the shared state, so dropping the
    /// handle early is safe; a loop is told to stop, a one-shot job runs on.
    fn drop(&mut self) {
        if self.state.request_stop() {
            warn!(target: LOG_TAG, name = %self.state.name(), "destroying running task");
        }
    }
}
