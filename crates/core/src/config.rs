//! Engine configuration.
//!
//! Defaults suit the game; every field can be overridden from the
//! environment:
//!
//! - `FLAPPY_RENDER_SCALE`: draw scale handed to the renderer (default 0.25)
//! - `FLAPPY_HALT_ON_CONTRACT`: "1"/"true" panics on contract violations,
//!   "0"/"false" returns them as errors (default: on in debug builds)
//! - `FLAPPY_PAGE_WARN_BYTES`: log once when overflow pages exceed this size
//! - `FLAPPY_PAGE_LIMIT_BYTES`: refuse overflow pages beyond this size

use crate::types::RENDER_SCALE;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub render_scale: f32,
    pub halt_on_contract_violation: bool,
    pub page_warn_bytes: Option<usize>,
    pub page_limit_bytes: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_scale: RENDER_SCALE,
            halt_on_contract_violation: cfg!(debug_assertions),
            page_warn_bytes: None,
            page_limit_bytes: None,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup. Unparseable values keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let render_scale = lookup("FLAPPY_RENDER_SCALE")
            .and_then(|s| s.trim().parse::<f32>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(defaults.render_scale);

        let halt_on_contract_violation = lookup("FLAPPY_HALT_ON_CONTRACT")
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.halt_on_contract_violation);

        let page_warn_bytes = lookup("FLAPPY_PAGE_WARN_BYTES").and_then(|s| s.trim().parse().ok());
        let page_limit_bytes =
            lookup("FLAPPY_PAGE_LIMIT_BYTES").and_then(|s| s.trim().parse().ok());

        Self {
            render_scale,
            halt_on_contract_violation,
            page_warn_bytes,
            page_limit_bytes,
        }
    }

    /// Same configuration, but contract violations come back as errors.
    pub fn lenient(mut self) -> Self {
        self.halt_on_contract_violation = false;
        self
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = EngineConfig::from_lookup(|_| None);
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.render_scale, RENDER_SCALE);
    }

    #[test]
    fn test_overrides() {
        let cfg = EngineConfig::from_lookup(lookup_from(&[
            ("FLAPPY_RENDER_SCALE", "0.5"),
            ("FLAPPY_HALT_ON_CONTRACT", "false"),
            ("FLAPPY_PAGE_WARN_BYTES", "1024"),
            ("FLAPPY_PAGE_LIMIT_BYTES", " 4096 "),
        ]));
        assert_eq!(cfg.render_scale, 0.5);
        assert!(!cfg.halt_on_contract_violation);
        assert_eq!(cfg.page_warn_bytes, Some(1024));
        assert_eq!(cfg.page_limit_bytes, Some(4096));
    }

    #[test]
    fn test_garbage_falls_back() {
        let cfg = EngineConfig::from_lookup(lookup_from(&[
            ("FLAPPY_RENDER_SCALE", "-2"),
            ("FLAPPY_HALT_ON_CONTRACT", "maybe"),
            ("FLAPPY_PAGE_LIMIT_BYTES", "lots"),
        ]));
        assert_eq!(cfg.render_scale, RENDER_SCALE);
        assert_eq!(
            cfg.halt_on_contract_violation,
            EngineConfig::default().halt_on_contract_violation
        );
        assert_eq!(cfg.page_limit_bytes, None);
    }

    #[test]
    fn test_lenient() {
        let cfg = EngineConfig::default().lenient();
        assert!(!cfg.halt_on_contract_violation);
    }
}
