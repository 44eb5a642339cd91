//! Application configuration read from the environment.

use std::path::PathBuf;

use crate::adapter::GatewayConfig;
use crate::core::PlaybackConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub playback: PlaybackConfig,
    /// Interactive mode logs here; unset disables logging so the screen stays clean
    pub log_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load from environment variables. Missing or invalid values fall back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok());
        config.gateway = GatewayConfig::from_env();
        config
    }

    /// Playback and logging settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = PlaybackConfig::default();
        let millis = |key: &str, default: u32| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(default)
        };

        let playback = PlaybackConfig {
            inter_tile_delay_ms: millis("WORDBOARD_INTER_TILE_DELAY_MS", defaults.inter_tile_delay_ms),
            settle_delay_ms: millis("WORDBOARD_SETTLE_DELAY_MS", defaults.settle_delay_ms),
            stream_idle_timeout_ms: match millis(
                "WORDBOARD_STREAM_IDLE_TIMEOUT_MS",
                defaults.stream_idle_timeout_ms,
            ) {
                0 => defaults.stream_idle_timeout_ms,
                v => v,
            },
        };

        let log_path = lookup("WORDBOARD_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        Self {
            gateway: GatewayConfig::default(),
            playback,
            log_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(AppConfig::from_lookup(|_| None), AppConfig::default());
    }

    #[test]
    fn delays_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("WORDBOARD_INTER_TILE_DELAY_MS", "40"),
            ("WORDBOARD_SETTLE_DELAY_MS", " 0 "),
            ("WORDBOARD_LOG_PATH", "/tmp/wordboard.log"),
        ]));
        assert_eq!(config.playback.inter_tile_delay_ms, 40);
        assert_eq!(config.playback.settle_delay_ms, 0);
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/wordboard.log")));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("WORDBOARD_INTER_TILE_DELAY_MS", "fast"),
            ("WORDBOARD_STREAM_IDLE_TIMEOUT_MS", "0"),
            ("WORDBOARD_LOG_PATH", "   "),
        ]));
        assert_eq!(config.playback, PlaybackConfig::default());
        assert_eq!(config.log_path, None);
    }
}
