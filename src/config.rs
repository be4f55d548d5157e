//! Service configuration file support.
//!
//! Reads `storewatch.toml` for the data directory, report policy defaults,
//! and server bind address. Every field has a default so the service runs
//! with no config file at all.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::repository::RepositoryError;
use crate::models::StoreStatus;
use crate::services::ReportPolicy;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorewatchConfig {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Source data settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// Directory holding the three source CSV files.
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
}

/// Report policy settings.
///
/// The defaults mirror the assumptions documented in the report engine:
/// unknown timezone means `America/Chicago`, absence of monitoring data
/// means the store is assumed active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
    #[serde(default = "default_missing_data_status")]
    pub missing_data_status: String,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

fn default_missing_data_status() -> String {
    "active".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
            missing_data_status: default_missing_data_status(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl StorewatchConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: StorewatchConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from the default locations, falling back to
    /// built-in defaults when no file exists.
    ///
    /// Searches for `storewatch.toml` in the current directory, then the
    /// parent directory.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("storewatch.toml"),
            PathBuf::from("../storewatch.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Convert the report settings into a validated [`ReportPolicy`].
    pub fn report_policy(&self) -> Result<ReportPolicy, RepositoryError> {
        let default_timezone = self.report.default_timezone.parse().map_err(|_| {
            RepositoryError::configuration(format!(
                "Unknown default_timezone: {:?}",
                self.report.default_timezone
            ))
        })?;
        let missing_data_status: StoreStatus =
            self.report.missing_data_status.parse().map_err(|e| {
                RepositoryError::configuration(format!("Bad missing_data_status: {}", e))
            })?;
        Ok(ReportPolicy {
            default_timezone,
            missing_data_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorewatchConfig::default();
        assert_eq!(config.data.dir, PathBuf::from("data"));
        assert_eq!(config.server.port, 8080);

        let policy = config.report_policy().unwrap();
        assert_eq!(policy.default_timezone, chrono_tz::America::Chicago);
        assert_eq!(policy.missing_data_status, StoreStatus::Active);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[data]
dir = "/var/lib/storewatch"

[report]
default_timezone = "Asia/Karachi"
missing_data_status = "inactive"

[server]
host = "127.0.0.1"
port = 9090
"#;

        let config: StorewatchConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.data.dir, PathBuf::from("/var/lib/storewatch"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);

        let policy = config.report_policy().unwrap();
        assert_eq!(policy.default_timezone, chrono_tz::Asia::Karachi);
        assert_eq!(policy.missing_data_status, StoreStatus::Inactive);
    }

    #[test]
    fn test_bad_timezone_rejected() {
        let toml = r#"
[report]
default_timezone = "Moon/Tycho"
"#;
        let config: StorewatchConfig = toml::from_str(toml).unwrap();
        assert!(config.report_policy().is_err());
    }
}
