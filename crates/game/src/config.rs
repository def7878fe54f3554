//! Game configuration.
//!
//! Environment variables:
//!
//! - `FLAPPY_SEED`: pipe placement seed (default: derived from the clock)
//! - `FLAPPY_FRAME_MS`: fixed frame time in milliseconds (default 7)
//! - `FLAPPY_LOG_PATH`: write logs to this file (default: no logging)

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::FRAME_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub seed: u32,
    pub frame_ms: u32,
    pub log_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: clock_seed(),
            frame_ms: FRAME_MS,
            log_path: None,
        }
    }
}

impl GameConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup. Unparseable values keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup("FLAPPY_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(clock_seed);
        let frame_ms = lookup("FLAPPY_FRAME_MS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|&ms: &u32| ms > 0)
            .unwrap_or(FRAME_MS);
        let log_path = lookup("FLAPPY_LOG_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self {
            seed,
            frame_ms,
            log_path,
        }
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_overrides() {
        let config = GameConfig::from_lookup(|key| match key {
            "FLAPPY_SEED" => Some("99".into()),
            "FLAPPY_FRAME_MS" => Some("16".into()),
            "FLAPPY_LOG_PATH" => Some("/tmp/flappy.log".into()),
            _ => None,
        });
        assert_eq!(config.seed, 99);
        assert_eq!(config.frame_ms, 16);
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/flappy.log")));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = GameConfig::from_lookup(|key| match key {
            "FLAPPY_FRAME_MS" => Some("0".into()),
            "FLAPPY_LOG_PATH" => Some("  ".into()),
            _ => None,
        });
        assert_eq!(config.frame_ms, FRAME_MS);
        assert_eq!(config.log_path, None);
    }
}
