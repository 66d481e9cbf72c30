use config::{ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const TASK_FILE: &str = "tasks.json";
pub const CONFIG_FILE: &str = "task-cli";
pub const ENV_PREFIX: &str = "TASK_CLI";

#[derive(Debug, Deserialize, PartialEq)]
pub struct Settings {
    pub storage: StorageSettings,
    pub log: LogSettings,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StorageSettings {
    pub path: PathBuf,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LogSettings {
    pub level: String,
}

impl Settings {
    /// Loads settings from defaults, an optional `task-cli.toml` in the working
    /// directory and `TASK_CLI_*` environment variables, in increasing order of
    /// precedence. `file_override` wins over all of them.
    pub fn load(file_override: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Self::environment());
        Self::build(builder, file_override)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("storage.path", default_storage_path().to_string_lossy().into_owned())?
            .set_default("log.level", "warn")
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }

    fn build(
        builder: ConfigBuilder<DefaultState>,
        file_override: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let builder = match file_override {
            Some(path) => builder.set_override("storage.path", path.to_string_lossy().into_owned())?,
            None => builder,
        };
        builder.build()?.try_deserialize()
    }
}

/// `tasks.json` next to the running executable.
pub fn default_storage_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(TASK_FILE)))
        .unwrap_or_else(|| PathBuf::from(TASK_FILE))
}
