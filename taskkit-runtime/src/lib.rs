//! TaskKit Runtime - start/stop lifecycle for preemptive kernel tasks
//!
//! A [`Task`] owns at most one running kernel task, created either from a
//! one-shot function or from a loop body re-invoked on a drift-free period.
//! The kernel itself is abstracted behind [`Kernel`]; [`ThreadKernel`] runs
//! tasks on OS threads.

mod config;
mod error;
mod kernel;
mod task;
mod time_unit;

/// `tracing` target of every event this crate emits.
pub const LOG_TAG: &str = "taskkit";

// Re-export public API
pub use self::config::{
    load_toml_config, load_yaml_config, DEFAULT_PERIOD_MS, DEFAULT_PRIORITY, DEFAULT_STACK_WORDS,
    DEFAULT_TASK_NAME, ENV_PREFIX,
};
pub use error::{KernelError, TaskError};
pub use kernel::{
    should_delay, HostTaskId, Kernel, SpawnParams, TaskEntry, ThreadKernel, ThreadKernelBuilder,
    Tick,
};
pub use task::{validate_core, validate_priority, CoreAffinity, LoopSettings, Task, TaskConfig};
pub use time_unit::{parse_period, PeriodParseError};
