#![forbid(unsafe_code)]

//! Policy-as-data configuration for the choreographer.
//!
//! Every timing constant and layout estimate lives in one
//! [`ChoreographyConfig`] that can be loaded from JSON (always) or TOML
//! (with the `policy-config` feature) at startup.
//!
//! # Loading
//!
//! ```toml
//! # segue.toml
//! [transition]
//! morph_ms = 650
//!
//! [morph]
//! target_resolution = "absolute"
//!
//! [motion]
//! reduced_motion = true
//! ```
//!
//! ```rust,ignore
//! let config = ChoreographyConfig::load_toml_file("segue.toml")?;
//! let config = ChoreographyConfig::load_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the value the animations were tuned with, so
//! `ChoreographyConfig::default()` needs no file at all and a partial file
//! overrides only what it names.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use segue_core::morph::{FallbackGeometry, MorphPolicy, TargetResolution};

use crate::entrance::EntranceTiming;
use crate::snapshot::SnapshotPolicy;
use crate::transition::TransitionTiming;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// All tunables of the choreographer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreographyConfig {
    /// Navigation transition timing.
    pub transition: TransitionConfig,
    /// First-visit entrance sequence timing.
    pub entrance: EntranceConfig,
    /// Morph target calculation.
    pub morph: MorphConfig,
    /// Header snapshot capture.
    pub snapshot: SnapshotConfig,
    /// Motion preferences.
    pub motion: MotionConfig,
}

impl ChoreographyConfig {
    /// Parse from a TOML string without validating.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Parse from a TOML file without validating.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn load_toml_str(s: &str) -> Result<Self, ConfigError> {
        Self::from_toml_str(s)?.validated()
    }

    /// Parse and validate a TOML file.
    #[cfg(feature = "policy-config")]
    pub fn load_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_toml_file(path)?.validated()?;
        tracing::info!(target: "segue.config", path = %path.display(), "choreography config loaded");
        Ok(config)
    }

    /// Parse from a JSON string without validating.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Parse from a JSON file without validating.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Parse and validate a JSON string.
    pub fn load_json_str(s: &str) -> Result<Self, ConfigError> {
        Self::from_json_str(s)?.validated()
    }

    /// Parse and validate a JSON file.
    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json_file(path)?.validated()?;
        tracing::info!(target: "segue.config", path = %path.display(), "choreography config loaded");
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Json)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.transition.morph_ms == 0 {
            errors.push("transition.morph_ms must be > 0".into());
        }
        if self.transition.fade_out_ms > self.transition.morph_delay_ms {
            errors.push(format!(
                "transition.fade_out_ms ({}) must not exceed transition.morph_delay_ms ({})",
                self.transition.fade_out_ms, self.transition.morph_delay_ms
            ));
        }

        if self.entrance.dot_count == 0 {
            errors.push("entrance.dot_count must be >= 1".into());
        }
        if self.entrance.content_reveal_ms <= self.entrance.line_expand_ms {
            errors.push(format!(
                "entrance.content_reveal_ms ({}) must come after entrance.line_expand_ms ({})",
                self.entrance.content_reveal_ms, self.entrance.line_expand_ms
            ));
        }

        if !self.morph.padding_adjustment_px.is_finite() || self.morph.padding_adjustment_px < 0.0 {
            errors.push(format!(
                "morph.padding_adjustment_px must be >= 0, got {}",
                self.morph.padding_adjustment_px
            ));
        }
        if self.morph.fallback_max_width_px.is_nan() || self.morph.fallback_max_width_px <= 0.0 {
            errors.push(format!(
                "morph.fallback_max_width_px must be > 0, got {}",
                self.morph.fallback_max_width_px
            ));
        }
        if self.morph.fallback_height_px.is_nan() || self.morph.fallback_height_px <= 0.0 {
            errors.push(format!(
                "morph.fallback_height_px must be > 0, got {}",
                self.morph.fallback_height_px
            ));
        }
        if !self.morph.fallback_margin_px.is_finite() || self.morph.fallback_margin_px < 0.0 {
            errors.push(format!(
                "morph.fallback_margin_px must be >= 0, got {}",
                self.morph.fallback_margin_px
            ));
        }

        errors
    }

    /// `self` if valid, otherwise every violation.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            tracing::warn!(target: "segue.config", count = errors.len(), "choreography config rejected");
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build the [`TransitionTiming`] for the state machine.
    #[must_use]
    pub fn to_transition_timing(&self) -> TransitionTiming {
        let t = &self.transition;
        TransitionTiming {
            fade_out: Duration::from_millis(t.fade_out_ms),
            morph_delay: Duration::from_millis(t.morph_delay_ms),
            morph: Duration::from_millis(t.morph_ms),
            reveal_delay: Duration::from_millis(t.reveal_delay_ms),
            reveal: Duration::from_millis(t.reveal_ms),
        }
    }

    /// Build the [`EntranceTiming`] for the entrance sequencer.
    #[must_use]
    pub fn to_entrance_timing(&self) -> EntranceTiming {
        let e = &self.entrance;
        EntranceTiming {
            first_dot_delay: Duration::from_millis(e.first_dot_delay_ms),
            dot_interval: Duration::from_millis(e.dot_interval_ms),
            dot_count: e.dot_count,
            dots_activate: Duration::from_millis(e.dots_activate_ms),
            key_press: Duration::from_millis(e.key_press_ms),
            confetti: Duration::from_millis(e.confetti_ms),
            dot_drop: Duration::from_millis(e.dot_drop_ms),
            line_expand: Duration::from_millis(e.line_expand_ms),
            line_duration: Duration::from_millis(e.line_duration_ms),
            content_reveal: Duration::from_millis(e.content_reveal_ms),
            typing_char: Duration::from_millis(e.typing_char_ms),
            secondary_delay: Duration::from_millis(e.secondary_delay_ms),
            secondary_stagger: Duration::from_millis(e.secondary_stagger_ms),
            nav_delay: Duration::from_millis(e.nav_delay_ms),
            nav_stagger: Duration::from_millis(e.nav_stagger_ms),
        }
    }

    /// Build the [`MorphPolicy`] for the morph calculator.
    #[must_use]
    pub fn to_morph_policy(&self) -> MorphPolicy {
        let m = &self.morph;
        MorphPolicy {
            padding_adjustment: m.padding_adjustment_px,
            resolution: m.target_resolution,
            fallback: FallbackGeometry {
                top: m.fallback_top_px,
                left: m.fallback_left_px,
                max_width: m.fallback_max_width_px,
                margin: m.fallback_margin_px,
                height: m.fallback_height_px,
            },
        }
    }

    /// Build the [`SnapshotPolicy`] for header capture.
    #[must_use]
    pub fn to_snapshot_policy(&self) -> SnapshotPolicy {
        SnapshotPolicy {
            capture_debounce: Duration::from_millis(self.snapshot.capture_debounce_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Navigation transition timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Sibling fade duration. Default: 300.
    pub fade_out_ms: u64,
    /// Click to morph start. Default: 500.
    pub morph_delay_ms: u64,
    /// Morph duration. Default: 800.
    pub morph_ms: u64,
    /// Morph end to destination fade-in. Default: 200.
    pub reveal_delay_ms: u64,
    /// Destination fade-in duration. Default: 300.
    pub reveal_ms: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            fade_out_ms: 300,
            morph_delay_ms: 500,
            morph_ms: 800,
            reveal_delay_ms: 200,
            reveal_ms: 300,
        }
    }
}

/// Entrance sequence timing, offsets from mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntranceConfig {
    /// Default: 300.
    pub first_dot_delay_ms: u64,
    /// Default: 345.
    pub dot_interval_ms: u64,
    /// Default: 5.
    pub dot_count: usize,
    /// Default: 2025.
    pub dots_activate_ms: u64,
    /// Default: 2370.
    pub key_press_ms: u64,
    /// Default: 2658.
    pub confetti_ms: u64,
    /// Default: 2945.
    pub dot_drop_ms: u64,
    /// Default: 3520.
    pub line_expand_ms: u64,
    /// Default: 2000.
    pub line_duration_ms: u64,
    /// Default: 5820.
    pub content_reveal_ms: u64,
    /// Default: 100.
    pub typing_char_ms: u64,
    /// Default: 500.
    pub secondary_delay_ms: u64,
    /// Default: 100.
    pub secondary_stagger_ms: u64,
    /// Default: 1500.
    pub nav_delay_ms: u64,
    /// Default: 150.
    pub nav_stagger_ms: u64,
}

impl Default for EntranceConfig {
    fn default() -> Self {
        Self {
            first_dot_delay_ms: 300,
            dot_interval_ms: 345,
            dot_count: 5,
            dots_activate_ms: 2025,
            key_press_ms: 2370,
            confetti_ms: 2658,
            dot_drop_ms: 2945,
            line_expand_ms: 3520,
            line_duration_ms: 2000,
            content_reveal_ms: 5820,
            typing_char_ms: 100,
            secondary_delay_ms: 500,
            secondary_stagger_ms: 100,
            nav_delay_ms: 1500,
            nav_stagger_ms: 150,
        }
    }
}

/// Morph target calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    /// Card border plus padding. Default: 17.
    pub padding_adjustment_px: f64,
    /// Default: anchor-relative.
    pub target_resolution: TargetResolution,
    /// Default: 84.
    pub fallback_top_px: f64,
    /// Default: 32.
    pub fallback_left_px: f64,
    /// Default: 896.
    pub fallback_max_width_px: f64,
    /// Total horizontal margin. Default: 64.
    pub fallback_margin_px: f64,
    /// Default: 60.
    pub fallback_height_px: f64,
}

impl Default for MorphConfig {
    fn default() -> Self {
        let policy = MorphPolicy::default();
        Self {
            padding_adjustment_px: policy.padding_adjustment,
            target_resolution: policy.resolution,
            fallback_top_px: policy.fallback.top,
            fallback_left_px: policy.fallback.left,
            fallback_max_width_px: policy.fallback.max_width,
            fallback_margin_px: policy.fallback.margin,
            fallback_height_px: policy.fallback.height,
        }
    }
}

/// Header snapshot capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Mount to capture. Default: 200.
    pub capture_debounce_ms: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            capture_debounce_ms: 200,
        }
    }
}

/// Motion preferences.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Skip every animation. Default: false.
    pub reduced_motion: bool,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// JSON parse or encode error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
