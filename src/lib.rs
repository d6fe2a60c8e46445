//! # Harmonic Pitch
//! *harmonic_pitch* estimates the fundamental frequency of a short clip of recorded
//! audio. The clip's spectrum is searched for spikes, peaks standing well above the
//! local noise, and every spike is scored by how well its harmonic series lines up
//! with the other spikes.
//!
//! # Pipeline
//! A detection runs a fixed sequence of stages, each a plain function over the
//! output of the previous one:
//!
//!   * [frequency_spectrum][detector::internals::frequency_spectrum]: clip to amplitude spectrum
//!   * [detect_peaks][utils::peak::detect_peaks]: spectrum to lobe maxima
//!   * [filter_spikes][utils::spike::filter_spikes]: peaks to noise-normalized spikes
//!   * [score_candidates][utils::harmonic::score_candidates]: spikes to scored fundamentals
//!
//! [HarmonicDetector][detector::harmonic::HarmonicDetector] composes them.
//!
//! # Examples
//! ```
//! use harmonic_pitch::audio::BufferSource;
//! use harmonic_pitch::config::DetectorConfig;
//! use harmonic_pitch::detector::harmonic::HarmonicDetector;
//!
//! fn main() {
//!     const SAMPLE_RATE: usize = 44100;
//!
//!     // One second of a 440 Hz tone at half of 16 bit full scale
//!     let dt = 1.0 / SAMPLE_RATE as f64;
//!     let freq = 440.0;
//!     let samples: Vec<i32> = (0..SAMPLE_RATE)
//!         .map(|x| (16384.0 * (2.0 * std::f64::consts::PI * x as f64 * dt * freq).sin()) as i32)
//!         .collect();
//!     let mut source = BufferSource::new(samples, SAMPLE_RATE, 16).unwrap();
//!
//!     let detector = HarmonicDetector::<f64>::new(DetectorConfig::default()).unwrap();
//!     let candidates = detector.detect_pitch(&mut source, 0.25).unwrap();
//!
//!     println!(
//!         "Frequency: {}, Score: {}",
//!         candidates[0].frequency, candidates[0].score
//!     );
//! }
//! ```

pub use detector::harmonic::HarmonicDetector;
pub use detector::internals::CandidateFrequency;
pub use error::{Error, Result};

pub mod audio;
pub mod config;
pub mod detector;
pub mod error;
pub mod float;
pub mod notes;
pub mod utils;
