#![forbid(unsafe_code)]

//! Thresholds and timeouts for gesture recognition.
//!
//! A [`GestureConfig`] is handed to the detector at construction and never
//! changes afterwards. With the `serde` feature it can be loaded from TOML or
//! JSON; durations are written in milliseconds.
//!
//! ```toml
//! double_tap_window_ms = 250
//! long_press_window_ms = 350
//! long_press_tolerance_sq = 25.0
//! suppress_move_during_long_press = true
//! tap_waits_for_double_tap = false
//! ```

#[cfg(feature = "serde")]
use std::path::Path;

use web_time::Duration;

/// Squared distance within which two consecutive taps count as a double tap.
///
/// Fixed rather than configurable: changing it alters what users perceive as
/// "the same spot" across every surface.
pub const DOUBLE_TAP_TOLERANCE_SQ: f64 = 200.0;

/// Thresholds and timeouts for gesture recognition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct GestureConfig {
    /// Time allowed between two taps for a double tap (default: 250ms).
    #[cfg_attr(
        feature = "serde",
        serde(rename = "double_tap_window_ms", with = "millis")
    )]
    pub double_tap_window: Duration,
    /// Time a contact must stay down before it becomes a long press
    /// (default: 350ms).
    #[cfg_attr(
        feature = "serde",
        serde(rename = "long_press_window_ms", with = "millis")
    )]
    pub long_press_window: Duration,
    /// Squared distance a contact may drift and still become a long press
    /// (default: 25).
    pub long_press_tolerance_sq: f64,
    /// Report movement during a long press as long-press-move instead of
    /// starting a drag (default: true).
    pub suppress_move_during_long_press: bool,
    /// Hold single taps back until the double-tap window expires, so a double
    /// tap never also reports taps (default: false).
    pub tap_waits_for_double_tap: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            double_tap_window: Duration::from_millis(250),
            long_press_window: Duration::from_millis(350),
            long_press_tolerance_sq: 25.0,
            suppress_move_during_long_press: true,
            tap_waits_for_double_tap: false,
        }
    }
}

impl GestureConfig {
    #[must_use]
    pub fn with_double_tap_window(mut self, window: Duration) -> Self {
        self.double_tap_window = window;
        self
    }

    #[must_use]
    pub fn with_long_press_window(mut self, window: Duration) -> Self {
        self.long_press_window = window;
        self
    }

    #[must_use]
    pub fn with_long_press_tolerance_sq(mut self, tolerance_sq: f64) -> Self {
        self.long_press_tolerance_sq = tolerance_sq;
        self
    }

    #[must_use]
    pub fn with_suppress_move_during_long_press(mut self, suppress: bool) -> Self {
        self.suppress_move_during_long_press = suppress;
        self
    }

    #[must_use]
    pub fn with_tap_waits_for_double_tap(mut self, wait: bool) -> Self {
        self.tap_waits_for_double_tap = wait;
        self
    }

    /// The double-tap proximity threshold (squared distance).
    #[inline]
    #[must_use]
    pub const fn double_tap_tolerance_sq(&self) -> f64 {
        DOUBLE_TAP_TOLERANCE_SQ
    }

    /// Check all parameters are within acceptable ranges.
    ///
    /// Returns a list of violations. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.double_tap_window.is_zero() {
            errors.push("double_tap_window must be > 0".into());
        }
        if self.long_press_window.is_zero() {
            errors.push("long_press_window must be > 0".into());
        }
        if !self.long_press_tolerance_sq.is_finite() || self.long_press_tolerance_sq < 0.0 {
            errors.push(format!(
                "long_press_tolerance_sq must be finite and >= 0, got {}",
                self.long_press_tolerance_sq
            ));
        }

        errors
    }

    /// Fail with [`ConfigError::Validation`] if any parameter is out of range.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "serde")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "serde")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}

/// Errors from loading or validating a [`GestureConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "serde")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "serde")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Parameters out of range.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(feature = "serde")]
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use web_time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = GestureConfig::default();
        assert_eq!(config.double_tap_window, Duration::from_millis(250));
        assert_eq!(config.long_press_window, Duration::from_millis(350));
        assert_eq!(config.long_press_tolerance_sq, 25.0);
        assert!(config.suppress_move_during_long_press);
        assert!(!config.tap_waits_for_double_tap);
        assert_eq!(config.double_tap_tolerance_sq(), 200.0);
    }

    #[test]
    fn default_is_valid() {
        assert!(GestureConfig::default().validate().is_empty());
        assert!(GestureConfig::default().validated().is_ok());
    }

    #[test]
    fn builders_override_fields() {
        let config = GestureConfig::default()
            .with_double_tap_window(Duration::from_millis(400))
            .with_long_press_window(Duration::from_millis(600))
            .with_long_press_tolerance_sq(9.0)
            .with_suppress_move_during_long_press(false)
            .with_tap_waits_for_double_tap(true);
        assert_eq!(config.double_tap_window, Duration::from_millis(400));
        assert_eq!(config.long_press_window, Duration::from_millis(600));
        assert_eq!(config.long_press_tolerance_sq, 9.0);
        assert!(!config.suppress_move_during_long_press);
        assert!(config.tap_waits_for_double_tap);
    }

    #[test]
    fn validation_collects_every_violation() {
        let config = GestureConfig::default()
            .with_double_tap_window(Duration::ZERO)
            .with_long_press_window(Duration::ZERO)
            .with_long_press_tolerance_sq(f64::NAN);
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");

        let err = config.validated().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref v) if v.len() == 3));
        assert!(err.to_string().starts_with("validation errors: "));
    }

    #[test]
    fn negative_tolerance_rejected() {
        let errors = GestureConfig::default()
            .with_long_press_tolerance_sq(-1.0)
            .validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("long_press_tolerance_sq"));
    }
}
