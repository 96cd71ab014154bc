// Copyright 2026 Hypermesh Foundation. All rights reserved.
// WebTracking Simulation Suite - Session Configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Environment variable holding the orchestrator credential.
pub const API_KEY_ENV: &str = "API_KEY";

/// Timer cadences, rule probabilities and the orchestrator credential for one
/// session. Every field has a default, so a partial JSON document is valid.
/// Keys are camelCase, matching every object the engine hands back to JS.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub status_interval_ms: f64,
    pub traffic_interval_ms: f64,
    pub pulse_spawn_interval_ms: f64,
    pub boot_interval_ms: f64,
    pub credential_notice_delay_ms: f64,

    /// Per-tick chance an IP node picks a new status.
    pub ip_status_change_probability: f64,
    /// Per-tick, per-node chance of a new traffic load.
    pub traffic_change_probability: f64,

    pub pulse_step: f64,
    pub pulse_terminal_x: f64,

    /// Characters of user input echoed in the INPUT log entry.
    pub preview_chars: usize,

    pub seed: u64,

    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            status_interval_ms: 1500.0,
            traffic_interval_ms: 800.0,
            pulse_spawn_interval_ms: 2000.0,
            boot_interval_ms: 800.0,
            credential_notice_delay_ms: 1000.0,
            ip_status_change_probability: 0.25,
            traffic_change_probability: 0.3,
            pulse_step: 0.5,
            pulse_terminal_x: 90.0,
            preview_chars: 20,
            seed: 0,
            api_key: None,
        }
    }
}

impl SessionConfig {
    /// Defaults with the credential read from the process environment.
    pub fn from_env() -> Self {
        Self::default().with_env_credential()
    }

    /// Fill `api_key` from the environment unless one is already set.
    pub fn with_env_credential(mut self) -> Self {
        if self.api_key.is_none() {
            self.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
        }
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TrackerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("statusIntervalMs", self.status_interval_ms),
            ("trafficIntervalMs", self.traffic_interval_ms),
            ("pulseSpawnIntervalMs", self.pulse_spawn_interval_ms),
        ];
        for (name, period) in periods {
            if !(period.is_finite() && period > 0.0) {
                return Err(TrackerError::InvalidConfig(format!("{name} must be positive, got {period}")));
            }
        }
        let delays = [
            ("bootIntervalMs", self.boot_interval_ms),
            ("credentialNoticeDelayMs", self.credential_notice_delay_ms),
        ];
        for (name, delay) in delays {
            if !(delay.is_finite() && delay >= 0.0) {
                return Err(TrackerError::InvalidConfig(format!("{name} must be non-negative, got {delay}")));
            }
        }
        let probabilities = [
            ("ipStatusChangeProbability", self.ip_status_change_probability),
            ("trafficChangeProbability", self.traffic_change_probability),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(TrackerError::InvalidConfig(format!("{name} must be within [0, 1], got {p}")));
            }
        }
        if !(self.pulse_step.is_finite() && self.pulse_step > 0.0) {
            return Err(TrackerError::InvalidConfig("pulseStep must be positive".to_string()));
        }
        if !self.pulse_terminal_x.is_finite() {
            return Err(TrackerError::InvalidConfig(format!(
                "pulseTerminalX must be finite, got {}",
                self.pulse_terminal_x
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        // traffic ticks faster than status, spawn slower than both
        assert!(config.traffic_interval_ms < config.status_interval_ms);
        assert!(config.pulse_spawn_interval_ms > config.status_interval_ms);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SessionConfig::from_json(r#"{"seed": 7, "statusIntervalMs": 500}"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.status_interval_ms, 500.0);
        assert_eq!(config.pulse_terminal_x, 90.0);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_rejects_zero_period() {
        let err = SessionConfig::from_json(r#"{"pulseSpawnIntervalMs": 0}"#).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        let config = SessionConfig { traffic_change_probability: 1.5, ..SessionConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_key_is_not_a_credential() {
        let config = SessionConfig { api_key: Some("   ".to_string()), ..SessionConfig::default() };
        assert!(!config.has_credential());
        let config = SessionConfig { api_key: Some("k".to_string()), ..SessionConfig::default() };
        assert!(config.has_credential());
    }

    #[test]
    fn test_snake_case_keys_are_not_read() {
        let config = SessionConfig::from_json(r#"{"status_interval_ms": 500, "apiKey": "k"}"#).unwrap();
        assert_eq!(config.status_interval_ms, 1500.0);
        assert_eq!(config.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_rejects_non_finite_terminal() {
        let config = SessionConfig { pulse_terminal_x: f64::NAN, ..SessionConfig::default() };
        assert!(matches!(config.validate(), Err(TrackerError::InvalidConfig(_))));
        let config = SessionConfig { pulse_terminal_x: f64::INFINITY, ..SessionConfig::default() };
        assert!(config.validate().is_err());
        assert!(crate::session::TrackerSession::with_config(config).is_err());
    }

    // The only test in the crate that touches API_KEY; the cases run in
    // sequence so they cannot race each other.
    #[test]
    fn test_credential_from_environment() {
        use crate::session::TrackerSession;

        std::env::set_var(API_KEY_ENV, "live-key");
        let config = SessionConfig::from_env();
        assert_eq!(config.api_key.as_deref(), Some("live-key"));
        assert!(TrackerSession::with_config(config).unwrap().orchestrator_ready());

        // an explicit key wins over the environment
        let explicit = SessionConfig { api_key: Some("mine".to_string()), ..SessionConfig::default() };
        assert_eq!(explicit.with_env_credential().api_key.as_deref(), Some("mine"));

        std::env::set_var(API_KEY_ENV, "   ");
        let config = SessionConfig::from_env();
        assert!(config.api_key.is_none());
        assert!(!TrackerSession::with_config(config).unwrap().orchestrator_ready());

        std::env::remove_var(API_KEY_ENV);
        let config = SessionConfig::from_env();
        assert!(config.api_key.is_none());
        assert!(!TrackerSession::with_config(config).unwrap().orchestrator_ready());
    }

    #[test]
    fn test_api_key_never_serialized() {
        let config = SessionConfig { api_key: Some("secret".to_string()), ..SessionConfig::default() };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
