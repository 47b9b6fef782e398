use crate::domain::error::Result;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "testpilot.toml";
pub const ENV_PREFIX: &str = "TESTPILOT_";

/// Simulated latency for each store operation, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreLatency {
    pub get_all_ms: u64,
    pub get_by_id_ms: u64,
    pub create_ms: u64,
    pub update_ms: u64,
    pub delete_ms: u64,
}

impl StoreLatency {
    pub const fn new(get_all_ms: u64, create_ms: u64) -> Self {
        Self {
            get_all_ms,
            get_by_id_ms: 200,
            create_ms,
            update_ms: 300,
            delete_ms: 200,
        }
    }

    pub const fn zero() -> Self {
        Self {
            get_all_ms: 0,
            get_by_id_ms: 0,
            create_ms: 0,
            update_ms: 0,
            delete_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoresConfig {
    pub recordings: StoreLatency,
    pub test_cases: StoreLatency,
    pub executions: StoreLatency,
}

impl Default for StoresConfig {
    fn default() -> Self {
        Self {
            recordings: StoreLatency::new(300, 400),
            test_cases: StoreLatency::new(250, 400),
            executions: StoreLatency::new(300, 500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Time between two simulated actions.
    pub tick_ms: u64,
    /// Number of ticks after which the recording stops on its own.
    pub max_ticks: u32,
}

impl RecorderConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            tick_ms: 2_000,
            max_ticks: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    pub delay_ms: u64,
    pub pass_probability: f64,
    pub suite_delay_ms: u64,
}

impl ExecutionConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn suite_delay(&self) -> Duration {
        Duration::from_millis(self.suite_delay_ms)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2_000,
            pass_probability: 0.7,
            suite_delay_ms: 3_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub log_level: String,
    /// Seed for the simulation random source. Unseeded when absent.
    pub random_seed: Option<u64>,
    pub preferences_path: PathBuf,
    pub stores: StoresConfig,
    pub recorder: RecorderConfig,
    pub execution: ExecutionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            random_seed: None,
            preferences_path: PathBuf::from("testpilot-preferences.json"),
            stores: StoresConfig::default(),
            recorder: RecorderConfig::default(),
            execution: ExecutionConfig::default(),
        }
    }
}

pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Defaults, then the TOML file (if present), then `TESTPILOT_*` env vars.
    /// Nested keys use a double underscore, e.g. `TESTPILOT_RECORDER__TICK_MS`.
    pub fn load(&self) -> Result<AppConfig> {
        let config = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(&self.path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract::<AppConfig>()?;
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}
