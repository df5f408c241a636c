//! Tunables for the overlay engine, loaded from defaults and environment variables.
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `SUPPORTIMAGES_HANDLE_SIZE` | `handle_size` | 5.0 |
//! | `SUPPORTIMAGES_RESIZE_QUIET_MS` | `resize_quiet_ms` | 100 |
//! | `SUPPORTIMAGES_ASPECT_KEY` | `aspect_ratio_key` | `ctrl` |
//! | `SUPPORTIMAGES_AXIS_KEY` | `axis_key` | `shift` |
//!
//! Numeric values that fail to parse fall back to the default. Values that
//! parse but make no sense (a non-positive handle size, an unknown key name)
//! are rejected.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use serde::Deserialize;

use crate::consts::{DEFAULT_HANDLE_SIZE, DEFAULT_RESIZE_QUIET_MS};
use crate::input::ModifierKey;

pub const ENV_HANDLE_SIZE: &str = "SUPPORTIMAGES_HANDLE_SIZE";
pub const ENV_RESIZE_QUIET_MS: &str = "SUPPORTIMAGES_RESIZE_QUIET_MS";
pub const ENV_ASPECT_KEY: &str = "SUPPORTIMAGES_ASPECT_KEY";
pub const ENV_AXIS_KEY: &str = "SUPPORTIMAGES_AXIS_KEY";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("handle size must be a positive number, got {0}")]
    HandleSize(f64),
    #[error("{var}: unknown modifier key {value:?} (expected shift, ctrl, alt or meta)")]
    ModifierKey { var: &'static str, value: String },
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Handle edge length in world units at zoom 1.
    pub handle_size: f64,
    /// Quiet period before a window-resize burst is acted on.
    pub resize_quiet_ms: u64,
    /// Modifier that locks the aspect ratio while resizing.
    pub aspect_ratio_key: ModifierKey,
    /// Modifier that resizes symmetrically about the center.
    pub axis_key: ModifierKey,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            handle_size: DEFAULT_HANDLE_SIZE,
            resize_quiet_ms: DEFAULT_RESIZE_QUIET_MS,
            aspect_ratio_key: ModifierKey::Ctrl,
            axis_key: ModifierKey::Shift,
        }
    }
}

impl Config {
    /// Build from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-positive handle size or an unknown
    /// modifier key name.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build from an arbitrary key lookup; `from_env` with the environment swapped out.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            handle_size: parse_or(lookup(ENV_HANDLE_SIZE), defaults.handle_size),
            resize_quiet_ms: parse_or(lookup(ENV_RESIZE_QUIET_MS), defaults.resize_quiet_ms),
            aspect_ratio_key: key_or(ENV_ASPECT_KEY, lookup(ENV_ASPECT_KEY), defaults.aspect_ratio_key)?,
            axis_key: key_or(ENV_AXIS_KEY, lookup(ENV_AXIS_KEY), defaults.axis_key)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that deserialized fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HandleSize`] when `handle_size` is not a positive finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.handle_size.is_finite() && self.handle_size > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::HandleSize(self.handle_size))
        }
    }

    #[must_use]
    pub fn resize_quiet(&self) -> Duration {
        Duration::from_millis(self.resize_quiet_ms)
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    match raw.map(|v| v.trim().parse::<T>()) {
        Some(Ok(value)) => value,
        Some(Err(_)) | None => default,
    }
}

fn key_or(var: &'static str, raw: Option<String>, default: ModifierKey) -> Result<ModifierKey, ConfigError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    ModifierKey::parse(&value).ok_or(ConfigError::ModifierKey { var, value })
}
