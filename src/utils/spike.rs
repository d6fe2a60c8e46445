use std::cmp::Ordering;

use log::debug;

use crate::config::SpikeParameters;
use crate::float::Float;
use crate::utils::peak::Peak;

/// A peak that stands out from the noise around it, and so is likely a harmonic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spike<T: Float> {
    pub peak: Peak<T>,
    /// Mean `local_mean` of the peaks surrounding this one.
    pub noise_floor: T,
}

impl<T: Float> Spike<T> {
    pub fn frequency(&self) -> T {
        self.peak.frequency
    }

    pub fn amplitude(&self) -> T {
        self.peak.amplitude
    }

    /// How many times louder than its noise floor the peak is.
    pub fn ratio(&self) -> T {
        self.peak.amplitude / self.noise_floor
    }
}

/// The noise floor at every peak of a sequence, yielded in order.
///
/// The floor at peak `i` is the mean `local_mean` of peaks `i - w/2 ..= i + w/2`, `w`
/// being the window size. Near either end the window is truncated to the peaks that
/// exist and the mean is taken over those only. The running sum is updated by the
/// peaks entering and leaving the window, so a full pass is linear in the number of peaks.
/// The sequence is finite and can be restarted by building a new one.
pub struct NoiseFloor<'a, T: Float> {
    peaks: &'a [Peak<T>],
    half_window: usize,
    index: usize,
    lower: usize,
    upper: usize,
    sum: T,
}

impl<'a, T: Float> NoiseFloor<'a, T> {
    pub fn new(peaks: &'a [Peak<T>], window_size: usize) -> Self {
        NoiseFloor {
            peaks,
            half_window: window_size / 2,
            index: 0,
            lower: 0,
            upper: 0,
            sum: T::zero(),
        }
    }
}

impl<'a, T: Float> Iterator for NoiseFloor<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.index >= self.peaks.len() {
            return None;
        }

        let lower = self.index.saturating_sub(self.half_window);
        let upper = (self.index + self.half_window + 1).min(self.peaks.len());
        while self.upper < upper {
            self.sum = self.sum + self.peaks[self.upper].local_mean;
            self.upper += 1;
        }
        while self.lower < lower {
            self.sum = self.sum - self.peaks[self.lower].local_mean;
            self.lower += 1;
        }
        self.index += 1;

        // Running subtraction can leave a tiny negative residue over silent stretches.
        let sum = self.sum.max(T::zero());
        Some(sum / T::from_usize(self.upper - self.lower).unwrap())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.peaks.len() - self.index;
        (remaining, Some(remaining))
    }
}

/// Keep the peaks whose amplitude exceeds `threshold` times their noise floor.
///
/// Peaks quieter than `min_amplitude` are never kept, though they still count
/// towards the noise floor of their neighbours. The result is sorted by decreasing
/// amplitude to noise ratio and holds at most `max_spikes` entries.
pub fn filter_spikes<T: Float>(peaks: &[Peak<T>], parameters: &SpikeParameters) -> Vec<Spike<T>> {
    let threshold = T::from_f64(parameters.threshold).unwrap();
    let min_amplitude = T::from_f64(parameters.min_amplitude).unwrap();

    let mut spikes: Vec<Spike<T>> = peaks
        .iter()
        .zip(NoiseFloor::new(peaks, parameters.sample_window_size))
        .filter(|(peak, noise_floor)| {
            peak.amplitude >= min_amplitude
                && *noise_floor > T::zero()
                && peak.amplitude / *noise_floor > threshold
        })
        .map(|(peak, noise_floor)| Spike {
            peak: *peak,
            noise_floor,
        })
        .collect();

    spikes.sort_by(|a, b| b.ratio().partial_cmp(&a.ratio()).unwrap_or(Ordering::Equal));
    spikes.truncate(parameters.max_spikes);

    debug!("{} of {} peaks kept as spikes", spikes.len(), peaks.len());
    spikes
}
