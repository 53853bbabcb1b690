use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the OData HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
    /// Quiet period before a table query is sent.
    #[serde(with = "humantime_serde", default = "default_debounce")]
    pub debounce: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            debounce: default_debounce(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/odata".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_debounce() -> Duration {
    Duration::from_millis(300)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humantime_durations() {
        let cfg: ClientConfig = serde_yaml::from_str(
            r#"
base_url: "https://idp.example.com/odata"
timeout: 5s
debounce: 150ms
"#,
        )
        .unwrap();
        assert_eq!(cfg.base_url, "https://idp.example.com/odata");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.debounce, Duration::from_millis(150));
    }

    #[test]
    fn defaults() {
        let cfg: ClientConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.debounce, Duration::from_millis(300));
    }
}
