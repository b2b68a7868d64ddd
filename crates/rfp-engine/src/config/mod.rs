use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_AUTOSAVE_QUIET_MS: u64 = 500;

/// Deployment stage; unknown values fall back to development.
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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub autosave: AutoSaveConfig,
}

impl AppConfig {
    /// Reads `.env` (when present) and then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            environment: AppEnvironment::from_str(&env_or("APP_ENV", "development")),
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig {
                log_level: env_or("APP_LOG_LEVEL", "info"),
            },
            storage: StorageConfig::from_env(),
            autosave: AutoSaveConfig::from_env()?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Set and non-blank, trimmed.
fn env_present(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = match env_present("APP_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort)?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            host: env_or("APP_HOST", DEFAULT_HOST),
            port,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where responses and global answers are persisted. `None` keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub store_path: Option<PathBuf>,
}

impl StorageConfig {
    fn from_env() -> Self {
        Self {
            store_path: env_present("RFP_STORE_PATH").map(PathBuf::from),
        }
    }
}

/// Debounce window applied to autosaved edits.
#[derive(Debug, Clone, Copy)]
pub struct AutoSaveConfig {
    pub quiet_period_ms: u64,
}

impl AutoSaveConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let quiet_period_ms = match env_present("RFP_AUTOSAVE_QUIET_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidQuietPeriod { value: raw })?,
            None => DEFAULT_AUTOSAVE_QUIET_MS,
        };
        Ok(Self { quiet_period_ms })
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: DEFAULT_AUTOSAVE_QUIET_MS,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidQuietPeriod { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidQuietPeriod { value } => write!(
                f,
                "RFP_AUTOSAVE_QUIET_MS must be a whole number of milliseconds (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidQuietPeriod { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

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
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("RFP_STORE_PATH");
        env::remove_var("RFP_AUTOSAVE_QUIET_MS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.storage.store_path.is_none());
        assert_eq!(config.autosave.quiet_period(), Duration::from_millis(500));
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_storage_and_autosave_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RFP_STORE_PATH", "/tmp/rfp-store.json");
        env::set_var("RFP_AUTOSAVE_QUIET_MS", "250");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.storage.store_path,
            Some(PathBuf::from("/tmp/rfp-store.json"))
        );
        assert_eq!(config.autosave.quiet_period_ms, 250);
        reset_env();
    }

    #[test]
    fn rejects_out_of_range_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "70000");
        let err = AppConfig::load().expect_err("port exceeds u16");
        assert!(matches!(err, ConfigError::InvalidPort));
        reset_env();
    }

    #[test]
    fn blank_store_path_means_memory() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RFP_STORE_PATH", "   ");
        env::set_var("APP_ENV", "PROD");
        let config = AppConfig::load().expect("config loads");
        assert!(config.storage.store_path.is_none());
        assert_eq!(config.environment, AppEnvironment::Production);
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_quiet_period() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RFP_AUTOSAVE_QUIET_MS", "soon");
        let err = AppConfig::load().expect_err("quiet period must be numeric");
        assert!(matches!(err, ConfigError::InvalidQuietPeriod { .. }));
        reset_env();
    }
}
