//! Defaults persistence

mod config;

pub use config::{
    save_defaults, show_defaults, ConfigFile, ConfigStore, DefaultsRecord, FileConfigStore,
    MemoryConfigStore, CONFIG_ENV_VAR, CONFIG_FILE_NAME,
};
