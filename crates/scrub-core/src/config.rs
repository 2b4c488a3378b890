//! Configuration management for comment-scrub

use crate::error::{Result, ScrubError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Values shipped in the config template; treated as "not filled in"
pub const PLACEHOLDER_PREFIX: &str = "YOUR_";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reddit credentials and endpoints
    pub reddit: RedditConfig,
    /// Defaults offered by the interactive prompts
    pub scrub: ScrubDefaults,
    /// Pause and retry policy around mutating calls
    pub throttle: ThrottleConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ScrubError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ScrubError::FileNotFound(_)) => {
                tracing::debug!("No config at {:?}, using defaults", path);
                Ok(Self::default())
            }
            Err(e) => Err(e.with_context(format!("Failed to load {}", path.display()))),
        }
    }

    /// Serialize to pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ScrubError::Toml(e.to_string()))
    }
}

/// Reddit credentials and endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditConfig {
    /// Script app client id
    pub client_id: String,
    /// Script app client secret
    pub client_secret: String,
    /// Account name
    pub username: String,
    /// Account password
    pub password: String,
    /// User agent sent with every request
    pub user_agent: Option<String>,
    /// OAuth token endpoint base
    pub auth_url: String,
    /// Authenticated API base
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            username: String::new(),
            password: String::new(),
            user_agent: None,
            auth_url: "https://www.reddit.com".to_string(),
            api_url: "https://oauth.reddit.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl RedditConfig {
    /// Reject missing or template placeholder credentials
    pub fn validate_credentials(&self) -> Result<()> {
        let fields = [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("username", &self.username),
            ("password", &self.password),
        ];

        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty() || value.starts_with(PLACEHOLDER_PREFIX))
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ScrubError::Config(format!(
                "missing Reddit credentials: {}",
                missing.join(", ")
            )))
        }
    }

    /// User agent, derived from the username when not configured
    pub fn effective_user_agent(&self) -> String {
        match &self.user_agent {
            Some(agent) if !agent.trim().is_empty() => agent.clone(),
            _ => format!(
                "comment-scrub/{} by /u/{}",
                env!("CARGO_PKG_VERSION"),
                self.username
            ),
        }
    }

    /// Copy with secrets masked, for display
    pub fn redacted(&self) -> Self {
        let mask = |s: &str| {
            if s.is_empty() {
                String::new()
            } else {
                "********".to_string()
            }
        };
        Self {
            client_secret: mask(&self.client_secret),
            password: mask(&self.password),
            ..self.clone()
        }
    }
}

/// Defaults for the run prompts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubDefaults {
    /// Text written over qualifying comments
    pub replacement_text: String,
    /// Comments this many days old or younger are left alone
    pub age_threshold_days: u32,
    /// Delete comments after overwriting them
    pub delete_after_edit: bool,
    /// Preview without mutating anything
    pub dry_run: bool,
}

impl Default for ScrubDefaults {
    fn default() -> Self {
        Self {
            replacement_text: "F".to_string(),
            age_threshold_days: 30,
            delete_after_edit: true,
            dry_run: true,
        }
    }
}

/// Pause and retry policy around mutating calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Pause after every edit/delete call, in milliseconds
    pub delay_ms: u64,
    /// Attempts per call (1 = no retry)
    pub max_attempts: u32,
    /// Extra wait per failed attempt, in milliseconds
    pub backoff_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            max_attempts: 1,
            backoff_ms: 1000,
        }
    }
}

impl ThrottleConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Template written by `config init`
pub const CONFIG_TEMPLATE: &str = r#"# comment-scrub configuration
#
# Create a "script" app at https://www.reddit.com/prefs/apps and fill in
# the values below. Environment variables REDDIT_CLIENT_ID,
# REDDIT_CLIENT_SECRET, REDDIT_USERNAME, REDDIT_PASSWORD and
# REDDIT_USER_AGENT override these fields.

[reddit]
client_id = "YOUR_CLIENT_ID"
client_secret = "YOUR_CLIENT_SECRET"
username = "YOUR_USERNAME"
password = "YOUR_PASSWORD"
# user_agent = "comment-scrub by /u/YOUR_USERNAME"

[scrub]
replacement_text = "F"
age_threshold_days = 30
delete_after_edit = true
dry_run = true

[throttle]
delay_ms = 1000
max_attempts = 1
backoff_ms = 1000
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled_reddit() -> RedditConfig {
        RedditConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            username: "someone".to_string(),
            password: "hunter2".to_string(),
            ..RedditConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scrub.replacement_text, "F");
        assert_eq!(config.scrub.age_threshold_days, 30);
        assert!(config.scrub.delete_after_edit);
        assert!(config.scrub.dry_run);
        assert_eq!(config.throttle.delay(), Duration::from_secs(1));
        assert_eq!(config.throttle.max_attempts, 1);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[reddit]"));
        assert!(toml.contains("[scrub]"));
        assert!(toml.contains("[throttle]"));

        let config2: Config = toml::from_str(&toml).unwrap();
        assert_eq!(
            config.scrub.age_threshold_days,
            config2.scrub.age_threshold_days
        );
    }

    #[test]
    fn test_template_parses() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.reddit.client_id, "YOUR_CLIENT_ID");
        assert_eq!(config.reddit.api_url, "https://oauth.reddit.com");
        assert!(config.reddit.validate_credentials().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[scrub]\nage_threshold_days = 90\n").unwrap();
        assert_eq!(config.scrub.age_threshold_days, 90);
        assert_eq!(config.scrub.replacement_text, "F");
        assert_eq!(config.throttle.delay_ms, 1000);
    }

    #[test]
    fn test_validate_credentials() {
        assert!(filled_reddit().validate_credentials().is_ok());

        let mut reddit = filled_reddit();
        reddit.password = String::new();
        reddit.client_id = "YOUR_CLIENT_ID".to_string();
        let err = reddit.validate_credentials().unwrap_err().to_string();
        assert!(err.contains("client_id"));
        assert!(err.contains("password"));
        assert!(!err.contains("username"));
    }

    #[test]
    fn test_effective_user_agent() {
        let mut reddit = filled_reddit();
        assert!(reddit.effective_user_agent().ends_with("by /u/someone"));

        reddit.user_agent = Some("custom agent".to_string());
        assert_eq!(reddit.effective_user_agent(), "custom agent");
    }

    #[test]
    fn test_redacted_masks_secrets() {
        let redacted = filled_reddit().redacted();
        assert_eq!(redacted.password, "********");
        assert_eq!(redacted.client_secret, "********");
        assert_eq!(redacted.username, "someone");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.scrub.replacement_text, "F");
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[reddit\nclient_id = ").unwrap();
        assert!(Config::load_or_default(&path).is_err());
    }
}
