use crate::config::{
    DEFAULT_PERIOD_MS, DEFAULT_PRIORITY, DEFAULT_STACK_WORDS, DEFAULT_TASK_NAME,
};
use crate::time_unit::parse_period;
use config::{Config, ConfigError};
use serde::Deserialize;
use std::fmt;

/// Which core a task is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawCore")]
pub enum CoreAffinity {
    /// Let the kernel run the task on any core.
    #[default]
    NoAffinity,
    /// Pin the task to the core with this index.
    Core(u8),
}

impl fmt::Display for CoreAffinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreAffinity::NoAffinity => f.write_str("any"),
            CoreAffinity::Core(index) => write!(f, "{}", index),
        }
    }
}

/// Config files spell "no affinity" as `-1`, `"any"` or `"none"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCore {
    Index(i64),
    Name(String),
}

impl TryFrom<RawCore> for CoreAffinity {
    type Error = String;

    fn try_from(raw: RawCore) -> Result<Self, Self::Error> {
        let index = match raw {
            RawCore::Index(index) => index,
            RawCore::Name(name) => match name.trim().to_lowercase().as_str() {
                "any" | "none" => return Ok(CoreAffinity::NoAffinity),
                other => other
                    .parse::<i64>()
                    .map_err(|_| format!("Invalid core: {}", name))?,
            },
        };
        match index {
            -1 => Ok(CoreAffinity::NoAffinity),
            0..=255 => Ok(CoreAffinity::Core(index as u8)),
            _ => Err(format!("Invalid core: {}", index)),
        }
    }
}

/// How a task should be created.
///
/// Copied into the kernel call on start; the [`Task`](super::Task) keeps only
/// the name for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub name: String,
    /// Stack depth in kernel words.
    #[serde(alias = "stack_size")]
    pub stack_words: u32,
    pub priority: u32,
    pub core: CoreAffinity,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_TASK_NAME.to_string(),
            stack_words: DEFAULT_STACK_WORDS,
            priority: DEFAULT_PRIORITY,
            core: CoreAffinity::NoAffinity,
        }
    }
}

impl TaskConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_stack_words(mut self, stack_words: u32) -> Self {
        self.stack_words = stack_words;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_core(mut self, core: CoreAffinity) -> Self {
        self.core = core;
        self
    }

    /// Read the table at `key`; missing fields take their defaults.
    pub fn from_config(config: &Config, key: &str) -> Result<Self, ConfigError> {
        config.get::<TaskConfig>(key)
    }
}

/// A [`TaskConfig`] plus the period of a looping task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSettings {
    pub task: TaskConfig,
    pub period_ms: u32,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            task: TaskConfig::default(),
            period_ms: DEFAULT_PERIOD_MS,
        }
    }
}

impl LoopSettings {
    /// Read the table at `key`. `period` may be a number of milliseconds or a
    /// shorthand such as `"250ms"` or `"2s"`.
    pub fn from_config(config: &Config, key: &str) -> Result<Self, ConfigError> {
        let task = TaskConfig::from_config(config, key)?;
        let period_ms = match config.get_string(&format!("{}.period", key)) {
            Ok(raw) => parse_period(&raw)
                .map_err(|e| ConfigError::Message(e.to_string()))?,
            Err(ConfigError::NotFound(_)) => DEFAULT_PERIOD_MS,
            Err(e) => return Err(e),
        };
        Ok(Self { task, period_ms })
    }
}
