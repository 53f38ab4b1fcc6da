//! Sheets client configuration

use qc_config::{RemoteConfig, SubmissionMode};
use secrecy::Secret;

/// Sheets client configuration
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Script deployment URL (contains the deployment key)
    pub endpoint: Secret<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// How submissions are confirmed
    pub submission_mode: SubmissionMode,
}

impl From<&RemoteConfig> for SheetsConfig {
    fn from(remote: &RemoteConfig) -> Self {
        Self {
            endpoint: remote.endpoint.clone(),
            timeout_secs: remote.timeout_secs,
            submission_mode: remote.submission_mode,
        }
    }
}

/// Builder for SheetsConfig
pub struct SheetsConfigBuilder {
    config: SheetsConfig,
}

impl SheetsConfigBuilder {
    /// Create a new builder with endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            config: SheetsConfig {
                endpoint: Secret::new(endpoint.into()),
                timeout_secs: 15,
                submission_mode: SubmissionMode::Acknowledged,
            },
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    /// Set submission mode
    pub fn with_submission_mode(mut self, mode: SubmissionMode) -> Self {
        self.config.submission_mode = mode;
        self
    }

    /// Build the configuration
    pub fn build(self) -> SheetsConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_builder() {
        let config = SheetsConfigBuilder::new("https://script.example.com/exec")
            .with_timeout(5)
            .with_submission_mode(SubmissionMode::FireAndForget)
            .build();

        assert_eq!(config.endpoint.expose_secret(), "https://script.example.com/exec");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.submission_mode, SubmissionMode::FireAndForget);
    }

    #[test]
    fn test_from_remote_config() {
        let remote = RemoteConfig {
            endpoint: Secret::new("https://script.example.com/exec".to_string()),
            timeout_secs: 20,
            submission_mode: SubmissionMode::Acknowledged,
        };
        let config = SheetsConfig::from(&remote);
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.submission_mode, SubmissionMode::Acknowledged);
    }
}
