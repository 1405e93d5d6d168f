//! API server configuration.
//!
//! Layered with the `config` crate, later sources win:
//!
//! 1. built-in defaults
//! 2. TOML file: `$BISTRO_CONFIG` if set (must exist), else `./bistro.toml`
//!    when present
//! 3. environment, `BISTRO__` prefix with `__` between keys
//!    (`BISTRO__SERVER__BIND_ADDR=0.0.0.0:8080`)
//!
//! ```toml
//! [server]
//! bind_addr = "127.0.0.1:8080"
//!
//! [database]
//! path = "./bistro.db"
//! max_connections = 5
//!
//! [reconciliation]
//! tolerance_bps = 500
//!
//! [wages]
//! overtime_daily_threshold_minutes = 480
//! overtime_multiplier_bps = 15000
//! change_alert_bps = 2000
//! include_scheduled = false
//!
//! [i18n]
//! default_locale = "en"
//!
//! [log]
//! filter = "info,bistro_api=debug,bistro_db=info"
//! ```

use std::env;
use std::net::SocketAddr;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use bistro_core::validation::validate_tolerance_bps;
use bistro_core::wages::WagePolicy;
use bistro_core::DEFAULT_TOLERANCE_BPS;

use crate::i18n::Locale;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Listen address, `host:port`.
    pub bind_addr: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file, or `:memory:`.
    pub path: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationSettings {
    /// Default tolerance when a request does not pass one.
    pub tolerance_bps: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nSettings {
    pub default_locale: Locale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` overrides it.
    pub filter: String,
}

/// Complete server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub reconciliation: ReconciliationSettings,
    pub wages: WagePolicy,
    pub i18n: I18nSettings,
    pub log: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server: ServerSettings {
                bind_addr: "127.0.0.1:8080".to_string(),
            },
            database: DatabaseSettings {
                path: "./bistro.db".to_string(),
                max_connections: 5,
            },
            reconciliation: ReconciliationSettings {
                tolerance_bps: DEFAULT_TOLERANCE_BPS,
            },
            wages: WagePolicy::default(),
            i18n: I18nSettings {
                default_locale: Locale::En,
            },
            log: LogSettings {
                filter: "info,bistro_api=debug,bistro_db=info,tower_http=info".to_string(),
            },
        }
    }
}

impl Settings {
    /// Loads settings from defaults, the config file and the environment.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(env::var("BISTRO_CONFIG").ok().as_deref())
    }

    /// Like [`Settings::load`] with an explicit config file.
    pub fn load_from(path: Option<&str>) -> Result<Self, SettingsError> {
        let defaults = Settings::default();
        let policy = defaults.wages;

        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name("bistro").required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("server.bind_addr", defaults.server.bind_addr)?
            .set_default("database.path", defaults.database.path)?
            .set_default("database.max_connections", i64::from(defaults.database.max_connections))?
            .set_default("reconciliation.tolerance_bps", defaults.reconciliation.tolerance_bps)?
            .set_default(
                "wages.overtime_daily_threshold_minutes",
                policy.overtime_daily_threshold_minutes,
            )?
            .set_default("wages.overtime_multiplier_bps", policy.overtime_multiplier_bps)?
            .set_default("wages.change_alert_bps", policy.change_alert_bps)?
            .set_default("wages.include_scheduled", policy.include_scheduled)?
            .set_default("i18n.default_locale", defaults.i18n.default_locale.as_str())?
            .set_default("log.filter", defaults.log.filter)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("BISTRO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Checks values the type system cannot.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.bind_addr()?;

        if self.database.path.trim().is_empty() {
            return Err(SettingsError::invalid("database.path", "must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(SettingsError::invalid("database.max_connections", "must be at least 1"));
        }

        validate_tolerance_bps(self.reconciliation.tolerance_bps)
            .map_err(|e| SettingsError::invalid("reconciliation.tolerance_bps", e.to_string()))?;

        if self.wages.overtime_daily_threshold_minutes <= 0 {
            return Err(SettingsError::invalid(
                "wages.overtime_daily_threshold_minutes",
                "must be positive",
            ));
        }
        if self.wages.overtime_multiplier_bps < 10_000 {
            return Err(SettingsError::invalid(
                "wages.overtime_multiplier_bps",
                "must be at least 10000 (x1.0)",
            ));
        }
        if self.wages.change_alert_bps < 0 {
            return Err(SettingsError::invalid("wages.change_alert_bps", "must not be negative"));
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.server
            .bind_addr
            .parse()
            .map_err(|_| SettingsError::invalid("server.bind_addr", "expected host:port"))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl SettingsError {
    fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        SettingsError::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
