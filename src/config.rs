//! Tunables of the harmonic detector.
//!
//! A [DetectorConfig] is an immutable value. It is validated once, when a
//! [HarmonicDetector][crate::detector::harmonic::HarmonicDetector] is built from it,
//! and is then passed down to each stage as a [SpikeParameters] or
//! [HarmonicParameters] view.
//!
//! Configurations can be read from TOML, every missing field falling back to its default:
//! ```
//! use harmonic_pitch::config::DetectorConfig;
//!
//! let config = DetectorConfig::from_toml_str("threshold = 2.0\nclip_length = 0.1").unwrap();
//! assert_eq!(config.threshold, 2.0);
//! assert_eq!(config.sample_window_size, 11);
//! ```

use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Length in seconds of the clip that is transformed at once.
    #[serde(default = "default_clip_length")]
    pub clip_length: f64,
    /// Number of neighbouring peaks averaged into the noise floor. Must be odd.
    #[serde(default = "default_sample_window_size")]
    pub sample_window_size: usize,
    /// Minimum amplitude to noise floor ratio of a spike.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Maximum number of spikes kept for correlation.
    #[serde(default = "default_max_spikes")]
    pub max_spikes: usize,
    /// Number of harmonics generated per candidate, the fundamental included.
    #[serde(default = "default_harmonic_count")]
    pub harmonic_count: usize,
    /// Width in Hz of the gaussian kernel matching harmonics to spikes.
    #[serde(default = "default_gaussian_spacing")]
    pub gaussian_spacing: f64,
    /// Candidates scoring at or below this value are dropped. Zero keeps everything.
    #[serde(default = "default_probability_threshold")]
    pub probability_threshold: f64,
    /// Peaks quieter than this (in full-scale units) never become spikes.
    #[serde(default = "default_min_amplitude")]
    pub min_amplitude: f64,
}

fn default_clip_length() -> f64 {
    0.2
}

fn default_sample_window_size() -> usize {
    11
}

fn default_threshold() -> f64 {
    3.0
}

fn default_max_spikes() -> usize {
    20
}

fn default_harmonic_count() -> usize {
    20
}

fn default_gaussian_spacing() -> f64 {
    50.0
}

fn default_probability_threshold() -> f64 {
    1e-3
}

fn default_min_amplitude() -> f64 {
    1e-4
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            clip_length: default_clip_length(),
            sample_window_size: default_sample_window_size(),
            threshold: default_threshold(),
            max_spikes: default_max_spikes(),
            harmonic_count: default_harmonic_count(),
            gaussian_spacing: default_gaussian_spacing(),
            probability_threshold: default_probability_threshold(),
            min_amplitude: default_min_amplitude(),
        }
    }
}

/// The part of the configuration used by the spike filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeParameters {
    pub sample_window_size: usize,
    pub threshold: f64,
    pub max_spikes: usize,
    pub min_amplitude: f64,
}

/// The part of the configuration used by the harmonic correlator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicParameters {
    pub harmonic_count: usize,
    pub gaussian_spacing: f64,
    pub probability_threshold: f64,
}

impl DetectorConfig {
    /// Parse a TOML document and validate the result.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DetectorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let problem = if !(self.clip_length.is_finite() && self.clip_length > 0.0) {
            Some(format!("clip_length must be positive, got {}", self.clip_length))
        } else if self.sample_window_size == 0 || self.sample_window_size % 2 == 0 {
            Some(format!(
                "sample_window_size must be a positive odd number, got {}",
                self.sample_window_size
            ))
        } else if !(self.threshold.is_finite() && self.threshold > 0.0) {
            Some(format!("threshold must be positive, got {}", self.threshold))
        } else if self.max_spikes == 0 {
            Some("max_spikes must be positive".to_string())
        } else if self.harmonic_count == 0 {
            Some("harmonic_count must be positive".to_string())
        } else if !(self.gaussian_spacing.is_finite() && self.gaussian_spacing > 0.0) {
            Some(format!(
                "gaussian_spacing must be positive, got {}",
                self.gaussian_spacing
            ))
        } else if !(self.probability_threshold.is_finite() && self.probability_threshold >= 0.0) {
            Some(format!(
                "probability_threshold must be non-negative, got {}",
                self.probability_threshold
            ))
        } else if !(self.min_amplitude.is_finite() && self.min_amplitude >= 0.0) {
            Some(format!(
                "min_amplitude must be non-negative, got {}",
                self.min_amplitude
            ))
        } else {
            None
        };

        match problem {
            Some(message) => {
                warn!("rejecting detector configuration: {}", message);
                Err(Error::Configuration(message))
            }
            None => Ok(()),
        }
    }

    pub fn spike_parameters(&self) -> SpikeParameters {
        SpikeParameters {
            sample_window_size: self.sample_window_size,
            threshold: self.threshold,
            max_spikes: self.max_spikes,
            min_amplitude: self.min_amplitude,
        }
    }

    pub fn harmonic_parameters(&self) -> HarmonicParameters {
        HarmonicParameters {
            harmonic_count: self.harmonic_count,
            gaussian_spacing: self.gaussian_spacing,
            probability_threshold: self.probability_threshold,
        }
    }
}
