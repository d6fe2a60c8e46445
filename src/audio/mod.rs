//! Decoded audio handed to the detector.
//!
//! The detector never parses containers itself. It reads clips from an
//! [AudioSource], which is either an in-memory [BufferSource] or a
//! [WavSource][wav::WavSource] reading linear PCM through `hound`.

use crate::error::{Error, Result};

pub mod wav;

pub use wav::WavSource;

/// A mono clip of integer PCM samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub samples: Vec<i32>,
    pub sample_rate: usize,
    pub bits_per_sample: u16,
}

impl AudioClip {
    pub fn new(samples: Vec<i32>, sample_rate: usize, bits_per_sample: u16) -> Self {
        AudioClip {
            samples,
            sample_rate,
            bits_per_sample,
        }
    }

    /// Length of the clip in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest magnitude a sample of this bit depth can take.
    pub fn max_amplitude(&self) -> f64 {
        max_amplitude(self.bits_per_sample)
    }
}

pub(crate) fn max_amplitude(bits_per_sample: u16) -> f64 {
    2f64.powi(i32::from(bits_per_sample.max(1)) - 1)
}

/// A seekable supply of mono PCM frames.
///
/// Reading moves the source's cursor, so a source must not be shared between
/// concurrent detections. Give each caller its own source or a [BufferSource] copy.
pub trait AudioSource {
    fn sample_rate(&self) -> usize;

    fn bits_per_sample(&self) -> u16;

    /// Total number of frames available.
    fn frame_count(&self) -> usize;

    /// Seek to `start_frame` and read up to `frame_count` frames.
    fn read_clip(&mut self, start_frame: usize, frame_count: usize) -> Result<AudioClip>;

    /// Length of the audio in seconds.
    fn duration(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate() as f64
    }
}

/// An [AudioSource] over samples that are already decoded.
#[derive(Debug, Clone)]
pub struct BufferSource {
    samples: Vec<i32>,
    sample_rate: usize,
    bits_per_sample: u16,
}

impl BufferSource {
    pub fn new(samples: Vec<i32>, sample_rate: usize, bits_per_sample: u16) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::UnsupportedFormat(
                "sample rate must be positive".to_string(),
            ));
        }
        if bits_per_sample == 0 || bits_per_sample > 32 {
            return Err(Error::UnsupportedFormat(format!(
                "{} bits per sample",
                bits_per_sample
            )));
        }
        Ok(BufferSource {
            samples,
            sample_rate,
            bits_per_sample,
        })
    }
}

impl From<AudioClip> for BufferSource {
    fn from(clip: AudioClip) -> Self {
        BufferSource {
            samples: clip.samples,
            sample_rate: clip.sample_rate,
            bits_per_sample: clip.bits_per_sample,
        }
    }
}

impl AudioSource for BufferSource {
    fn sample_rate(&self) -> usize {
        self.sample_rate
    }

    fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    fn frame_count(&self) -> usize {
        self.samples.len()
    }

    fn read_clip(&mut self, start_frame: usize, frame_count: usize) -> Result<AudioClip> {
        let start = start_frame.min(self.samples.len());
        let stop = start.saturating_add(frame_count).min(self.samples.len());
        Ok(AudioClip::new(
            self.samples[start..stop].to_vec(),
            self.sample_rate,
            self.bits_per_sample,
        ))
    }
}
