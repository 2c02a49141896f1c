mod config;
mod context;
mod handle;
mod state;
mod validate;

pub use self::config::{CoreAffinity, LoopSettings, TaskConfig};
pub use handle::Task;
pub use validate::{validate_core, validate_priority};
