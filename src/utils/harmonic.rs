use std::cmp::Ordering;

use log::debug;

use crate::config::HarmonicParameters;
use crate::detector::internals::{CandidateFrequency, Spectrum};
use crate::error::{Error, Result};
use crate::float::Float;
use crate::utils::spike::Spike;

/// The first `count` harmonics of `fundamental`: `f, 2f, ..., count * f`.
///
/// The fundamental is the first harmonic. The series is finite; clone it to iterate again.
#[derive(Debug, Clone)]
pub struct HarmonicSeries<T: Float> {
    fundamental: T,
    count: usize,
    next: usize,
}

impl<T: Float> HarmonicSeries<T> {
    pub fn new(fundamental: T, count: usize) -> Self {
        HarmonicSeries {
            fundamental,
            count,
            next: 1,
        }
    }
}

impl<T: Float> Iterator for HarmonicSeries<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next > self.count {
            return None;
        }
        let harmonic = self.fundamental * T::from_usize(self.next).unwrap();
        self.next += 1;
        Some(harmonic)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<T: Float> ExactSizeIterator for HarmonicSeries<T> {}

/// Bell shaped similarity of two frequencies `distance` Hz apart:
///
/// > k(d) = exp(-(2d / spacing)^2)
///
/// It is 1 for identical frequencies and has decayed to `1/e` at `spacing / 2`.
pub fn gaussian_kernel<T: Float>(distance: T, spacing: T) -> T {
    let two = T::from_f64(2.0).unwrap();
    let x = two * distance / spacing;
    (-(x * x)).exp()
}

/// How well `frequency` lands on the spikes: the kernel summed over every spike.
pub fn spike_correlation<T: Float>(frequency: T, spikes: &[Spike<T>], spacing: T) -> T {
    spikes
        .iter()
        .map(|s| gaussian_kernel(frequency - s.frequency(), spacing))
        .sum()
}

/// Score `fundamental` by how well its harmonic series explains `spikes`.
///
/// The correlation of every harmonic is summed and divided by the number of spikes.
/// A candidate whose harmonics each land on one distinct spike scores
/// `min(spikes, harmonic_count) / spikes`; the score can only reach `harmonic_count`
/// when every harmonic coincides with every spike.
pub fn harmonic_score<T: Float>(
    fundamental: T,
    spikes: &[Spike<T>],
    parameters: &HarmonicParameters,
) -> Result<T> {
    if spikes.is_empty() {
        return Err(Error::EmptyInput);
    }
    let spacing = T::from_f64(parameters.gaussian_spacing).unwrap();
    let correlation: T = HarmonicSeries::new(fundamental, parameters.harmonic_count)
        .map(|h| spike_correlation(h, spikes, spacing))
        .sum();

    Ok(correlation / T::from_usize(spikes.len()).unwrap())
}

/// Score every spike as a candidate fundamental.
///
/// Candidates scoring no more than `probability_threshold` are dropped. The rest are
/// returned by decreasing score; equal scores keep the order of `spikes`.
pub fn score_candidates<T: Float>(
    spikes: &[Spike<T>],
    parameters: &HarmonicParameters,
) -> Result<Vec<CandidateFrequency<T>>> {
    if spikes.is_empty() {
        return Err(Error::EmptyInput);
    }
    let probability_threshold = T::from_f64(parameters.probability_threshold).unwrap();

    let mut candidates = Vec::with_capacity(spikes.len());
    for spike in spikes {
        let score = harmonic_score(spike.frequency(), spikes, parameters)?;
        if score > probability_threshold {
            candidates.push(CandidateFrequency {
                frequency: spike.frequency(),
                score,
            });
        }
    }
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    debug!(
        "{} of {} spikes kept as candidates",
        candidates.len(),
        spikes.len()
    );
    Ok(candidates)
}

/// For every bin of `spectrum`, the largest of the spikes' kernel bells, each scaled
/// by its spike's amplitude. This is the envelope a plot overlays on the spectrum to
/// show where the correlator is looking.
pub fn spike_distribution<T: Float>(
    spectrum: &Spectrum<T>,
    spikes: &[Spike<T>],
    spacing: T,
) -> Vec<T> {
    spectrum
        .iter()
        .map(|(x, _)| {
            spikes.iter().fold(T::zero(), |max_y, s| {
                max_y.max(s.amplitude() * gaussian_kernel(x - s.frequency(), spacing))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::peak::Peak;

    fn spike(frequency: f64) -> Spike<f64> {
        Spike {
            peak: Peak {
                frequency,
                amplitude: 1.0,
                local_mean: 0.1,
            },
            noise_floor: 0.1,
        }
    }

    fn spikes_at(frequencies: &[f64]) -> Vec<Spike<f64>> {
        frequencies.iter().map(|&f| spike(f)).collect()
    }

    fn parameters(harmonic_count: usize) -> HarmonicParameters {
        HarmonicParameters {
            harmonic_count,
            gaussian_spacing: 50.0,
            probability_threshold: 0.0,
        }
    }

    #[test]
    fn harmonic_series_includes_the_fundamental() {
        let series = HarmonicSeries::new(110.0, 4);
        assert_eq!(series.len(), 4);
        let harmonics: Vec<f64> = series.clone().collect();
        assert_eq!(harmonics, vec![110., 220., 330., 440.]);
        assert_eq!(series.collect::<Vec<f64>>().len(), 4);
        assert_eq!(HarmonicSeries::new(110.0, 0).count(), 0);
    }

    #[test]
    fn kernel_shape() {
        assert_eq!(gaussian_kernel(0.0, 50.0), 1.0);
        assert!((gaussian_kernel(25.0, 50.0) - (-1.0f64).exp()).abs() < 1e-12);
        assert_eq!(gaussian_kernel(-25.0, 50.0), gaussian_kernel(25.0, 50.0));
        assert!(gaussian_kernel(200.0, 50.0) < 1e-6);
    }

    #[test]
    fn fundamental_beats_unrelated_frequencies() {
        let spikes: Vec<_> = (1..=6).map(|k| spike(100.0 * k as f64)).collect();
        let params = parameters(20);
        let fundamental = harmonic_score(100.0, &spikes, &params).unwrap();
        assert!((fundamental - 1.0).abs() < 1e-3);

        for &other in [137.0, 153.0, 171.3, 230.0, 370.0, 443.0].iter() {
            let score = harmonic_score(other, &spikes, &params).unwrap();
            assert!(score < fundamental, "{} scored {}", other, score);
        }
    }

    #[test]
    fn score_is_bounded_by_harmonic_count() {
        let spikes = vec![spike(100.0); 5];
        let params = parameters(1);
        assert!((harmonic_score(100.0, &spikes, &params).unwrap() - 1.0).abs() < 1e-12);

        let spikes = spikes_at(&[80., 95., 160., 333., 410., 640.]);
        let params = parameters(20);
        for s in spikes.iter() {
            let score = harmonic_score(s.frequency(), &spikes, &params).unwrap();
            assert!(score > 0.0 && score <= 20.0);
        }
    }

    #[test]
    fn empty_spikes_are_an_error() {
        let params = parameters(20);
        assert!(matches!(
            harmonic_score(100.0, &[], &params),
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            score_candidates::<f64>(&[], &params),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn candidates_are_ranked() {
        let spikes = spikes_at(&[300., 200., 100., 400., 777.]);
        let candidates = score_candidates(&spikes, &parameters(20)).unwrap();
        assert_eq!(candidates.len(), 5);
        assert_eq!(candidates[0].frequency, 100.0);
        assert!(candidates.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn probability_threshold_drops_weak_candidates() {
        let spikes = spikes_at(&[100., 200., 300., 1234.]);
        let params = HarmonicParameters {
            probability_threshold: 0.5,
            ..parameters(20)
        };
        let candidates = score_candidates(&spikes, &params).unwrap();
        assert!(candidates.iter().all(|c| c.score > 0.5));
        assert!(candidates.iter().any(|c| c.frequency == 100.0));
        assert!(candidates.iter().all(|c| c.frequency != 1234.0));
    }

    #[test]
    fn distribution_peaks_on_spikes() {
        let spectrum = Spectrum {
            bin_width: 10.0,
            amplitudes: vec![0.0; 50],
        };
        let spikes = vec![spike(100.0), spike(300.0)];
        let distribution = spike_distribution(&spectrum, &spikes, 50.0);
        assert_eq!(distribution.len(), 50);
        assert!((distribution[10] - 1.0).abs() < 1e-6);
        assert!((distribution[30] - 1.0).abs() < 1e-6);
        assert!(distribution[20] < 1e-6);
    }

    #[test]
    fn distribution_is_the_envelope_of_close_spikes() {
        let spectrum = Spectrum {
            bin_width: 5.0,
            amplitudes: vec![0.0; 40],
        };
        let mut loud = spike(110.0);
        loud.peak.amplitude = 2.0;
        let spikes = vec![spike(100.0), loud];
        let distribution = spike_distribution(&spectrum, &spikes, 50.0);

        assert!(distribution.iter().all(|&y| y <= 2.0));
        // 105 Hz is equidistant from both spikes.
        let between = 2.0 * gaussian_kernel(5.0, 50.0);
        assert!((distribution[21] - between).abs() < 1e-12);
        assert!((distribution[22] - 2.0).abs() < 1e-12);
        assert!((distribution[20] - 2.0 * gaussian_kernel(10.0, 50.0)).abs() < 1e-12);
    }
}
