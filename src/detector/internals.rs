use log::debug;
use rustfft::FftPlanner;

use crate::audio::AudioClip;
use crate::float::Float;
use crate::utils::buffer::{
    copy_real_to_complex, new_complex_buffer, new_real_buffer, normalize_samples, scaled_modulus,
};

/// A frequency the detector considers as the fundamental, with the evidence for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateFrequency<T>
where
    T: Float,
{
    pub frequency: T,
    pub score: T,
}

/// Amplitudes of evenly spaced frequency bins from 0 Hz up to (excluding) the Nyquist limit.
///
/// Bin `i` sits at `i * sample_rate / clip_frames` Hz.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum<T>
where
    T: Float,
{
    pub bin_width: T,
    pub amplitudes: Vec<T>,
}

impl<T> Spectrum<T>
where
    T: Float,
{
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    pub fn frequency(&self, bin: usize) -> T {
        T::from_usize(bin).unwrap() * self.bin_width
    }

    /// `(frequency, amplitude)` pairs in increasing frequency.
    pub fn iter(&self) -> impl Iterator<Item = (T, T)> + '_ {
        self.amplitudes
            .iter()
            .enumerate()
            .map(move |(i, &a)| (self.frequency(i), a))
    }
}

/// Number of frames in a clip of `clip_length` seconds.
pub fn clip_frames(sample_rate: usize, clip_length: f64) -> usize {
    (sample_rate as f64 * clip_length).round() as usize
}

/// Compute the amplitude spectrum of the first `clip_length` seconds of `clip`.
///
/// Samples are centred on their mean and scaled by the bit depth before the
/// transform. Each magnitude is multiplied by `2 / clip_frames`, which undoes the
/// unnormalized FFT and restores the energy of the discarded mirrored half, so a
/// full-scale sinusoid on an exact bin shows up with an amplitude close to 1.
/// A clip shorter than `clip_length` is zero padded.
pub fn frequency_spectrum<T>(clip: &AudioClip, clip_length: f64) -> Spectrum<T>
where
    T: Float,
{
    let size = clip_frames(clip.sample_rate, clip_length);
    let bin_width = T::from_usize(clip.sample_rate).unwrap() / T::from_usize(size.max(1)).unwrap();
    if size < 2 {
        return Spectrum {
            bin_width,
            amplitudes: Vec::new(),
        };
    }

    let used = clip.samples.len().min(size);
    let mut signal = new_real_buffer(size);
    normalize_samples(&clip.samples[..used], clip.max_amplitude(), &mut signal);

    let mut signal_complex = new_complex_buffer(size);
    copy_real_to_complex(&signal, &mut signal_complex);

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(size);
    let mut scratch = new_complex_buffer(fft.get_inplace_scratch_len());
    fft.process_with_scratch(&mut signal_complex, &mut scratch);

    // The input is real, so the upper half mirrors the lower one.
    let half = size / 2;
    let scale = T::from_f64(2.0).unwrap() / T::from_usize(size).unwrap();
    let mut amplitudes = new_real_buffer(half);
    scaled_modulus(&signal_complex[..half], scale, &mut amplitudes);

    debug!("spectrum: {} frames, {} bins of {} Hz", size, half, bin_width);

    Spectrum {
        bin_width,
        amplitudes,
    }
}
