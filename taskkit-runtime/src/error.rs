use crate::task::CoreAffinity;
use std::io;

/// Reasons a kernel can refuse to create a task.
#[derive(thiserror::Error, Debug)]
pub enum KernelError {
    /// The kernel could not allocate the task's stack or control block.
    #[error("could not allocate required memory")]
    OutOfMemory,

    /// The kernel rejected the request with a native status code.
    #[error("task creation rejected (code {0})")]
    Rejected(i32),

    /// The host thread backing the task could not be spawned.
    #[error("host thread spawn failed: {0}")]
    Spawn(#[from] io::Error),
}

/// Why `start`, `spawn`, `start_loop` or `run_every` did not schedule a task.
///
/// Every variant leaves the [`Task`](crate::Task) idle and immediately
/// reusable.
#[derive(thiserror::Error, Debug)]
pub enum TaskError {
    #[error("start failed: null function")]
    NullFunction,

    #[error("start failed: empty loop body")]
    EmptyLoopBody,

    #[error("start called while running")]
    AlreadyRunning,

    #[error("start failed: invalid priority={priority} (ceiling {ceiling})")]
    InvalidPriority { priority: u32, ceiling: u32 },

    #[error("start failed: invalid core={core} ({core_count} core(s) available)")]
    InvalidCore { core: CoreAffinity, core_count: u8 },

    #[error("start failed: {0}")]
    Kernel(#[from] KernelError),
}

impl TaskError {
    /// True for errors raised before any kernel call was attempted.
    pub fn is_precondition(&self) -> bool {
        !matches!(self, TaskError::Kernel(_))
    }
}
