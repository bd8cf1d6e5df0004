//! Centralized configuration management for carbook

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Context, Result};

/// Default base URL of the NHTSA vPIC decode API
pub const DEFAULT_VPIC_URL: &str = "https://vpic.nhtsa.dot.gov";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Managed database (Supabase REST) connection
    pub database: DatabaseConfig,
    /// VIN decode API base URL
    pub vpic_url: String,
    /// File that receives log output
    pub log_file: PathBuf,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// Database service credentials, supplied externally
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: Option<String>,
    /// Anonymous API key
    pub api_key: Option<String>,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds. `None` leaves the transport default in place.
    pub timeout_seconds: Option<u64>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            vpic_url: DEFAULT_VPIC_URL.to_string(),
            log_file: PathBuf::from("carbook.log"),
            http: HttpConfig::default(),
        }
    }
}

fn default_user_agent() -> String {
    format!("carbook/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = DatabaseConfig {
            url: lookup("SUPABASE_URL").filter(|v| !v.is_empty()),
            api_key: lookup("SUPABASE_ANON_KEY").filter(|v| !v.is_empty()),
        };

        let vpic_url = lookup("CARBOOK_VPIC_URL").unwrap_or_else(|| DEFAULT_VPIC_URL.to_string());

        let log_file = lookup("CARBOOK_LOG_FILE")
            .unwrap_or_else(|| "carbook.log".to_string())
            .into();

        let http = HttpConfig {
            timeout_seconds: parse_var(&lookup, "CARBOOK_HTTP_TIMEOUT_SECONDS")?,
            user_agent: lookup("CARBOOK_USER_AGENT").unwrap_or_else(default_user_agent),
        };

        Ok(Config {
            database,
            vpic_url,
            log_file,
            http,
        })
    }

    /// Get HTTP timeout as Duration, if one is configured
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http.timeout_seconds.map(Duration::from_secs)
    }

    /// Build the shared HTTP client used by both API clients
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(&self.http.user_agent);
        if let Some(timeout) = self.http_timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// Check that the database credentials are present and usable
    pub fn validate_database(&self) -> Result<()> {
        let url = self
            .database
            .url
            .as_deref()
            .context("SUPABASE_URL is not set")?;
        reqwest::Url::parse(url).with_context(|| format!("SUPABASE_URL is not a valid URL: {}", url))?;

        if self.database.api_key.is_none() {
            anyhow::bail!("SUPABASE_ANON_KEY is not set");
        }

        Ok(())
    }
}

/// Parse an optional variable as a specific type
fn parse_var<T, F>(lookup: &F, var_name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match lookup(var_name) {
        Some(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.vpic_url, DEFAULT_VPIC_URL);
        assert_eq!(config.log_file, PathBuf::from("carbook.log"));
        assert!(config.http_timeout().is_none());
        assert!(config.http.user_agent.starts_with("carbook/"));
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_config_reads_overrides() {
        let config = config_from(&[
            ("SUPABASE_URL", "https://demo.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("CARBOOK_HTTP_TIMEOUT_SECONDS", "15"),
            ("CARBOOK_VPIC_URL", "http://localhost:9000"),
        ])
        .unwrap();
        assert_eq!(config.http_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.vpic_url, "http://localhost:9000");
        config.validate_database().unwrap();
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        let err = config_from(&[("CARBOOK_HTTP_TIMEOUT_SECONDS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("CARBOOK_HTTP_TIMEOUT_SECONDS"));
    }

    #[test]
    fn test_config_validation() {
        let config = config_from(&[("SUPABASE_URL", "https://demo.supabase.co")]).unwrap();
        let err = config.validate_database().unwrap_err();
        assert!(err.to_string().contains("SUPABASE_ANON_KEY"));

        let config = config_from(&[("SUPABASE_URL", ""), ("SUPABASE_ANON_KEY", "anon")]).unwrap();
        assert!(config.validate_database().is_err());
    }
}
