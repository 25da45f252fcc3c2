use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

pub const DEFAULT_JOB_DATA_FILE: &str = "data/job_postings.csv";
pub const DEFAULT_SCORE_FILE: &str = "data/acs_scores.csv";

/// Top-level configuration for applications embedding the finder.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub data: DataConfig,
    pub telemetry: TelemetryConfig,
}

/// File locations for the two tabular sources.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub job_data_file: PathBuf,
    pub score_file: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let job_data_file = path_var("APP_JOB_DATA_FILE", DEFAULT_JOB_DATA_FILE)?;
        let score_file = path_var("APP_SCORE_FILE", DEFAULT_SCORE_FILE)?;
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            data: DataConfig {
                job_data_file,
                score_file,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn path_var(name: &'static str, default: &str) -> Result<PathBuf, ConfigError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyVar { name }),
        Ok(value) => Ok(PathBuf::from(value)),
        Err(_) => Ok(PathBuf::from(default)),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyVar { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyVar { name } => {
                write!(f, "environment variable {} is set but empty", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_JOB_DATA_FILE");
        env::remove_var("APP_SCORE_FILE");
        env::remove_var("APP_LOG_LEVEL");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.data.job_data_file, PathBuf::from(DEFAULT_JOB_DATA_FILE));
        assert_eq!(config.data.score_file, PathBuf::from(DEFAULT_SCORE_FILE));
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn load_honors_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("APP_JOB_DATA_FILE", "/srv/exports/postings.csv");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(
            config.data.job_data_file,
            PathBuf::from("/srv/exports/postings.csv")
        );
        reset_env();
    }

    #[test]
    fn empty_path_variable_is_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SCORE_FILE", "   ");
        let error = AppConfig::load().expect_err("empty path rejected");
        match error {
            ConfigError::EmptyVar { name } => assert_eq!(name, "APP_SCORE_FILE"),
        }
        reset_env();
    }
}
