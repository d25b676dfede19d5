//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `SHIELDWATCH_*` environment variables, then command-line overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::refresh::RefreshSettings;

/// Environment variable prefix (e.g. `SHIELDWATCH_BASE_URL`).
pub const ENV_PREFIX: &str = "SHIELDWATCH";

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Dashboard backend base URL.
    pub base_url: String,
    pub refresh_interval_secs: u64,
    /// Trailing window requested from the backend.
    pub window_hours: u32,
    /// Maximum number of recent log entries requested.
    pub log_limit: u32,
    pub request_timeout_secs: u64,
    /// Default tracing filter; `RUST_LOG` takes precedence.
    pub log_level: String,
    /// Where logs are written while the TUI owns the terminal.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub refresh_interval_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Resolve settings from all layers.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("base_url", "http://localhost:8001")?
            .set_default("refresh_interval_secs", 30)?
            .set_default("window_hours", 24)?
            .set_default("log_limit", 50)?
            .set_default("request_timeout_secs", 10)?
            .set_default("log_level", "info")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("base_url", overrides.base_url.clone())?
            .set_override_option("refresh_interval_secs", overrides.refresh_interval_secs)?
            .set_override_option(
                "log_file",
                overrides.log_file.as_ref().map(|p| p.display().to_string()),
            )?
            .build()
            .context("failed to load configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the refresh loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        if self.refresh_interval_secs == 0 {
            bail!("refresh_interval_secs must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        if self.window_hours == 0 {
            bail!("window_hours must be at least 1");
        }
        if self.log_limit == 0 {
            bail!("log_limit must be at least 1");
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn refresh_settings(&self) -> RefreshSettings {
        RefreshSettings {
            window_hours: self.window_hours,
            log_limit: self.log_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::{Mutex, MutexGuard};
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Serializes tests that load settings, since the environment is process-wide.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Holds the env lock and removes the variables it set when dropped.
    struct EnvGuard {
        keys: Vec<&'static str>,
        _lock: MutexGuard<'static, ()>,
    }

    impl EnvGuard {
        fn lock() -> Self {
            Self {
                keys: Vec::new(),
                _lock: ENV_LOCK.lock(),
            }
        }

        fn set(&mut self, key: &'static str, value: &str) {
            std::env::set_var(key, value);
            self.keys.push(key);
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for key in &self.keys {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let _env = EnvGuard::lock();
        let settings = Settings::load(None, &Overrides::default()).unwrap();
        assert_eq!(settings.window_hours, 24);
        assert_eq!(settings.log_limit, 50);
        assert_eq!(settings.refresh_interval(), Duration::from_secs(30));
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
        assert_eq!(settings.refresh_settings(), RefreshSettings::default());
    }

    #[test]
    fn test_file_layer() {
        let _env = EnvGuard::lock();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            base_url = "http://dashboard.internal:8001"
            refresh_interval_secs = 15
            log_file = "/tmp/shieldwatch.log"
            "#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path()), &Overrides::default()).unwrap();
        assert_eq!(settings.base_url, "http://dashboard.internal:8001");
        assert_eq!(settings.refresh_interval_secs, 15);
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/shieldwatch.log")));
        assert_eq!(settings.log_limit, 50);
    }

    #[test]
    fn test_cli_overrides_file() {
        let _env = EnvGuard::lock();
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "refresh_interval_secs = 15").unwrap();

        let overrides = Overrides {
            base_url: Some("http://10.0.0.5:8001".to_string()),
            refresh_interval_secs: Some(5),
            log_file: None,
        };
        let settings = Settings::load(Some(file.path()), &overrides).unwrap();
        assert_eq!(settings.base_url, "http://10.0.0.5:8001");
        assert_eq!(settings.refresh_interval_secs, 5);
    }

    #[test]
    fn test_env_layer_precedence() {
        let mut env = EnvGuard::lock();
        env.set("SHIELDWATCH_BASE_URL", "http://from-env:8001");
        env.set("SHIELDWATCH_LOG_LIMIT", "120");

        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            base_url = "http://from-file:8001"
            log_limit = 20
            window_hours = 6
            "#
        )
        .unwrap();

        // Environment beats the file; untouched keys still come from the file.
        let settings = Settings::load(Some(file.path()), &Overrides::default()).unwrap();
        assert_eq!(settings.base_url, "http://from-env:8001");
        assert_eq!(settings.log_limit, 120);
        assert_eq!(settings.window_hours, 6);

        // Flags beat the environment.
        let overrides = Overrides {
            base_url: Some("http://from-flag:8001".to_string()),
            ..Default::default()
        };
        let settings = Settings::load(Some(file.path()), &overrides).unwrap();
        assert_eq!(settings.base_url, "http://from-flag:8001");
        assert_eq!(settings.log_limit, 120);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let _env = EnvGuard::lock();
        let overrides = Overrides {
            refresh_interval_secs: Some(0),
            ..Default::default()
        };
        let err = Settings::load(None, &overrides).unwrap_err();
        assert!(err.to_string().contains("refresh_interval_secs"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let _env = EnvGuard::lock();
        let result = Settings::load(Some(Path::new("/nonexistent/shieldwatch.toml")), &Overrides::default());
        assert!(result.is_err());
    }
}
