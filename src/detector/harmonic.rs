//! The harmonic detector finds the fundamental of a clip by asking which spectral
//! spike has a harmonic series that explains the other spikes best.
//!
//! ## Implementation
//! 1. The clip is centred on zero, scaled by its bit depth and transformed with an
//!    [FFT](https://en.wikipedia.org/wiki/Fast_Fourier_transform). Only the half of the
//!    spectrum below the Nyquist limit is kept.
//! 2. The spectrum is split into lobes between consecutive local minima, and the
//!    maximum of every lobe becomes a [Peak].
//! 3. Each peak is compared to a noise floor, the mean lobe amplitude of the
//!    `sample_window_size` peaks around it. Peaks louder than `threshold` times their
//!    floor become [Spike]s.
//! 4. Every spike is tried as a fundamental `f`. Each harmonic `f, 2f, ..., nf` is
//!    matched against all spikes with a gaussian kernel of width `gaussian_spacing`,
//!    and the summed matches, divided by the number of spikes, are its score.

use std::marker::PhantomData;

use log::{debug, warn};

use crate::audio::{AudioClip, AudioSource};
use crate::config::DetectorConfig;
use crate::detector::internals::{clip_frames, frequency_spectrum, CandidateFrequency, Spectrum};
use crate::detector::PitchDetector;
use crate::error::{Error, Result};
use crate::float::Float;
use crate::utils::harmonic::score_candidates;
use crate::utils::peak::{detect_peaks, Peak};
use crate::utils::spike::{filter_spikes, Spike};

/// Every intermediate result of one detection.
#[derive(Debug, Clone)]
pub struct Analysis<T>
where
    T: Float,
{
    pub spectrum: Spectrum<T>,
    pub peaks: Vec<Peak<T>>,
    pub spikes: Vec<Spike<T>>,
    pub candidates: Vec<CandidateFrequency<T>>,
}

/// Receives the [Analysis] of a detection, e.g. to plot it.
pub trait Visualizer<T>
where
    T: Float,
{
    fn visualize(&mut self, analysis: &Analysis<T>);
}

impl<T, F> Visualizer<T> for F
where
    T: Float,
    F: FnMut(&Analysis<T>),
{
    fn visualize(&mut self, analysis: &Analysis<T>) {
        self(analysis)
    }
}

pub struct HarmonicDetector<T>
where
    T: Float,
{
    config: DetectorConfig,
    _float: PhantomData<T>,
}

impl<T> HarmonicDetector<T>
where
    T: Float,
{
    /// Build a detector, failing with [Error::Configuration] if a tunable is out of range.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(HarmonicDetector {
            config,
            _float: PhantomData,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run the full pipeline on `clip`.
    ///
    /// Fails with [Error::EmptyInput] when no spike stands out of the noise.
    pub fn analyze(&self, clip: &AudioClip) -> Result<Analysis<T>> {
        let spectrum = frequency_spectrum(clip, self.config.clip_length);
        let peaks: Vec<Peak<T>> = detect_peaks(&spectrum).collect();
        let spikes = filter_spikes(&peaks, &self.config.spike_parameters());
        let candidates = score_candidates(&spikes, &self.config.harmonic_parameters())?;

        debug!(
            "analysis: {} bins, {} peaks, {} spikes, {} candidates",
            spectrum.len(),
            peaks.len(),
            spikes.len(),
            candidates.len()
        );

        Ok(Analysis {
            spectrum,
            peaks,
            spikes,
            candidates,
        })
    }

    /// Detect the pitch of the clip starting `start` seconds into `source`.
    pub fn detect_pitch<S>(&self, source: &mut S, start: f64) -> Result<Vec<CandidateFrequency<T>>>
    where
        S: AudioSource,
    {
        let clip = self.read_clip(source, start)?;
        Ok(self.analyze(&clip)?.candidates)
    }

    /// Like [detect_pitch][Self::detect_pitch], also handing the analysis to `visualizer`.
    pub fn detect_pitch_with<S, V>(
        &self,
        source: &mut S,
        start: f64,
        visualizer: &mut V,
    ) -> Result<Vec<CandidateFrequency<T>>>
    where
        S: AudioSource,
        V: Visualizer<T>,
    {
        let clip = self.read_clip(source, start)?;
        let analysis = self.analyze(&clip)?;
        visualizer.visualize(&analysis);
        Ok(analysis.candidates)
    }

    /// Read `clip_length` seconds from `source`, refusing clips that end at or after
    /// the end of the audio.
    fn read_clip<S>(&self, source: &mut S, start: f64) -> Result<AudioClip>
    where
        S: AudioSource,
    {
        let clip_length = self.config.clip_length;
        let audio_length = source.duration();

        if !(start.is_finite() && start >= 0.0 && start + clip_length < audio_length) {
            warn!(
                "clip at {}s of length {}s does not fit in {}s of audio",
                start, clip_length, audio_length
            );
            return Err(Error::OutOfRange {
                start,
                clip_length,
                audio_length,
            });
        }

        let sample_rate = source.sample_rate();
        let start_frame = (start * sample_rate as f64) as usize;
        source.read_clip(start_frame, clip_frames(sample_rate, clip_length))
    }
}

impl<T> PitchDetector<T> for HarmonicDetector<T>
where
    T: Float,
{
    fn get_pitch(&mut self, clip: &AudioClip) -> Result<Vec<CandidateFrequency<T>>> {
        self.analyze(clip).map(|analysis| analysis.candidates)
    }
}
