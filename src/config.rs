use crate::domain::lock::ReentryPolicy;
use crate::error::{CheckoutError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_CSRF_HEADER: &str = "X-CSRFToken";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Settings for submitting purchases.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Overall request timeout. `None` waits for as long as the server takes.
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: u64,
    /// Anti-forgery token the shop expects on unsafe requests.
    pub csrf_token: Option<String>,
    pub csrf_header: String,
    pub user_agent: String,
    pub reentry: ReentryPolicy,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            csrf_token: None,
            csrf_header: DEFAULT_CSRF_HEADER.to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            reentry: ReentryPolicy::default(),
        }
    }
}

impl CheckoutConfig {
    /// Reads a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == Some(0) {
            return Err(CheckoutError::Config(
                "timeout_secs must be positive".to_string(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(CheckoutError::Config(
                "connect_timeout_secs must be positive".to_string(),
            ));
        }
        if self.csrf_header.trim().is_empty() {
            return Err(CheckoutError::Config(
                "csrf_header must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CheckoutConfig::default();
        assert_eq!(config.timeout_secs, None);
        assert_eq!(config.csrf_header, "X-CSRFToken");
        assert_eq!(config.reentry, ReentryPolicy::Allow);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"csrf_token": "abc", "reentry": "reject"}}"#).unwrap();

        let config = CheckoutConfig::load(file.path()).unwrap();
        assert_eq!(config.csrf_token.as_deref(), Some("abc"));
        assert_eq!(config.reentry, ReentryPolicy::Reject);
        assert_eq!(config.connect_timeout_secs, 30);
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"timeout_secs": 0}}"#).unwrap();

        assert!(matches!(
            CheckoutConfig::load(file.path()),
            Err(CheckoutError::Config(_))
        ));
    }

    #[test]
    fn test_load_rejects_zero_connect_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"connect_timeout_secs": 0}}"#).unwrap();

        assert!(matches!(
            CheckoutConfig::load(file.path()),
            Err(CheckoutError::Config(_))
        ));

        let config = CheckoutConfig {
            connect_timeout_secs: 0,
            ..CheckoutConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = CheckoutConfig::load(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(CheckoutError::IoError(_))));
    }
}
