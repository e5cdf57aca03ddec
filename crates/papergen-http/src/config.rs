//! HTTP client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Connection timeout
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,

    /// Maximum retry attempts
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Initial retry delay (exponential backoff)
    #[serde(default = "default_retry_delay")]
    pub retry_delay: Duration,

    /// HTTP/HTTPS proxy URL
    #[serde(default)]
    pub proxy: Option<String>,

    /// Custom user agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum redirects to follow (0 = no redirects)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            retry_count: default_retry_count(),
            retry_delay: default_retry_delay(),
            proxy: None,
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl HttpConfig {
    /// Create a new HTTP config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Config for GitHub REST calls (20s timeout, 2 retries)
    pub fn github() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            connect_timeout: Duration::from_secs(5),
            retry_count: 2,
            ..Default::default()
        }
    }

    /// Config for model calls; generation of long sections is slow
    pub fn ai_provider() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            retry_count: 0,
            ..Default::default()
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set retry count
    pub fn with_retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    /// Set initial retry delay
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Set proxy URL
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_user_agent() -> String {
    format!("papergen/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_redirects() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry_count, 3);
        assert!(config.user_agent.starts_with("papergen/"));
    }

    #[test]
    fn test_github_config() {
        let config = HttpConfig::github();
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.retry_count, 2);
    }

    #[test]
    fn test_ai_provider_config_does_not_retry() {
        let config = HttpConfig::ai_provider();
        assert_eq!(config.retry_count, 0);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_builder_methods() {
        let config = HttpConfig::new()
            .with_timeout(Duration::from_secs(3))
            .with_retry_count(0)
            .with_user_agent("custom/1.0");

        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.retry_count, 0);
        assert_eq!(config.user_agent, "custom/1.0");
    }
}
