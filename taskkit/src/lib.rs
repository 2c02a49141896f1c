//! # TaskKit - start/stop lifecycle for RTOS tasks
//!
//! TaskKit wraps a preemptive kernel's task API in a small handle that owns
//! one task at a time, validates where and how it runs, and gives the task a
//! cooperative way to be told to stop.
//!
//! ## Features
//!
//! - **One-shot tasks**: run a function once on its own kernel task
//! - **Loop tasks**: re-invoke a body on a fixed period until it returns `false`
//! - **Drift-free periods**: wake times are anchored to absolute ticks
//! - **Validation**: priority ceiling and core affinity checked before any kernel call
//! - **Cooperative stop**: `request_stop()` ends a loop before its next iteration
//! - **Config support**: describe tasks in TOML or YAML, override via `TASKKIT_*` env vars
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use taskkit::{Task, TaskConfig, ThreadKernel};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let kernel = Arc::new(ThreadKernel::default());
//! let blink = Task::new(kernel);
//!
//! let mut remaining = 5;
//! blink.run_every(
//!     move || {
//!         remaining -= 1;
//!         remaining > 0
//!     },
//!     &TaskConfig::default().with_name("blink").with_priority(3),
//!     10,
//! )?;
//!
//! blink.stopped().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Create `config/tasks.toml`:
//!
//! ```toml
//! [tasks.blink]
//! name = "blink"
//! priority = 3
//! core = 1          # or "any"
//! stack_words = 4096
//! period = "250ms"
//! ```
//!
//! and load it with [`load_toml_config`] and [`LoopSettings::from_config`].
//! Environment variables with the `TASKKIT_` prefix override file values.
//! Nested keys are separated by a double underscore:
//!
//! ```bash
//! export TASKKIT_TASKS__BLINK__PRIORITY=5
//! export TASKKIT_TASKS__BLINK__STACK_WORDS=8192
//! ```

// Re-export core types
pub use taskkit_runtime::{
    load_toml_config, load_yaml_config, parse_period, CoreAffinity, HostTaskId, Kernel, KernelError,
    LoopSettings, PeriodParseError, SpawnParams, Task, TaskConfig, TaskEntry, TaskError, ThreadKernel,
    ThreadKernelBuilder, Tick, DEFAULT_PERIOD_MS, DEFAULT_PRIORITY, DEFAULT_STACK_WORDS,
    DEFAULT_TASK_NAME, LOG_TAG,
};

// For kernel implementations outside this workspace
pub use taskkit_runtime;
