use config::{Config, ConfigError, Environment, File, FileFormat};
use std::path::Path;

/// Name given to tasks that don't set one.
pub const DEFAULT_TASK_NAME: &str = "TaskKitTask";

/// Stack depth in kernel words; matches the Arduino loop task.
pub const DEFAULT_STACK_WORDS: u32 = 8192;

/// Low, but above the idle task.
pub const DEFAULT_PRIORITY: u32 = 2;

/// Smallest positive period: one millisecond.
pub const DEFAULT_PERIOD_MS: u32 = 1;

/// Prefix for environment overrides, e.g. `TASKKIT_BLINK__PRIORITY=4`.
///
/// The prefix is joined with a single `_`; nested keys are joined with `__`
/// so field names such as `stack_words` keep their underscores.
pub const ENV_PREFIX: &str = "TASKKIT";

fn load(path: &Path, format: FileFormat) -> Result<Config, ConfigError> {
    Config::builder()
        .add_source(File::from(path).format(format))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
}

/// Load task settings from a TOML file, with environment overrides
pub fn load_toml_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    load(path.as_ref(), FileFormat::Toml)
}

/// Load task settings from a YAML file, with environment overrides
pub fn load_yaml_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    load(path.as_ref(), FileFormat::Yaml)
}
