use crate::detector::internals::Spectrum;
use crate::float::Float;

/// A local maximum of a spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak<T: Float> {
    pub frequency: T,
    pub amplitude: T,
    /// Mean amplitude of the lobe the peak was found in.
    pub local_mean: T,
}

/// Splits `arr` into lobes: index ranges running from one local minimum up to the next.
///
/// A local minimum is the sample just before the gradient turns from `<= 0` to `> 0`;
/// it opens the following lobe. The ranges cover `arr` without gaps, the first one
/// starting at 0 and the last one ending at `arr.len()`.
struct Lobes<'a, T: Float> {
    arr: &'a [T],
    start: usize,
    index: usize,
    rising: bool,
}

impl<'a, T: Float> Lobes<'a, T> {
    fn new(arr: &'a [T]) -> Self {
        Lobes {
            arr,
            start: 0,
            index: 1,
            rising: false,
        }
    }
}

impl<'a, T: Float> Iterator for Lobes<'a, T> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.start >= self.arr.len() {
            return None;
        }

        while self.index < self.arr.len() {
            let i = self.index;
            self.index += 1;

            let rising = self.arr[i] > self.arr[i - 1];
            let turned = rising && !self.rising;
            self.rising = rising;

            if turned && i - 1 > self.start {
                let lobe = (self.start, i - 1);
                self.start = i - 1;
                return Some(lobe);
            }
        }

        let lobe = (self.start, self.arr.len());
        self.start = self.arr.len();
        Some(lobe)
    }
}

/// Find the peak of every lobe of `spectrum`, in increasing frequency.
///
/// When several bins of a lobe share the maximum amplitude the lowest one wins.
pub fn detect_peaks<'a, T: Float>(
    spectrum: &'a Spectrum<T>,
) -> impl Iterator<Item = Peak<T>> + 'a {
    let arr = &spectrum.amplitudes[..];
    Lobes::new(arr).map(move |(start, stop)| {
        let mut peak_idx = start;
        let mut peak_val = arr[start];
        for i in start + 1..stop {
            if arr[i] > peak_val {
                peak_val = arr[i];
                peak_idx = i;
            }
        }
        let local_mean =
            arr[start..stop].iter().copied().sum::<T>() / T::from_usize(stop - start).unwrap();

        Peak {
            frequency: spectrum.frequency(peak_idx),
            amplitude: peak_val,
            local_mean,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(amplitudes: Vec<f64>) -> Spectrum<f64> {
        Spectrum {
            bin_width: 10.0,
            amplitudes,
        }
    }

    #[test]
    fn lobes_partition_the_array() {
        let arr = [0., 2., 1., 0., 3., 4., 1., 1., 2.];
        let lobes: Vec<_> = Lobes::new(&arr).collect();
        assert_eq!(lobes, vec![(0, 3), (3, 7), (7, 9)]);
    }

    #[test]
    fn peaks_of_each_lobe() {
        let s = spectrum(vec![0., 2., 1., 0., 3., 4., 1., 1., 2.]);
        let peaks: Vec<_> = detect_peaks(&s).collect();
        assert_eq!(
            peaks,
            vec![
                Peak {
                    frequency: 10.,
                    amplitude: 2.,
                    local_mean: 1.,
                },
                Peak {
                    frequency: 50.,
                    amplitude: 4.,
                    local_mean: 2.,
                },
                Peak {
                    frequency: 80.,
                    amplitude: 2.,
                    local_mean: 1.5,
                },
            ]
        );
    }

    #[test]
    fn first_maximum_wins_ties() {
        let s = spectrum(vec![1., 3., 3., 0.]);
        let peaks: Vec<_> = detect_peaks(&s).collect();
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].frequency, 10.);
    }

    #[test]
    fn degenerate_spectra() {
        assert_eq!(detect_peaks(&spectrum(vec![])).count(), 0);
        assert_eq!(detect_peaks(&spectrum(vec![1., 2., 3., 4.])).count(), 1);
        assert_eq!(detect_peaks(&spectrum(vec![4., 3., 2., 1.])).count(), 1);

        let peaks: Vec<_> = detect_peaks(&spectrum(vec![1., 2., 3., 4.])).collect();
        assert_eq!(peaks[0].frequency, 30.);
        assert_eq!(peaks[0].local_mean, 2.5);
    }

    #[test]
    fn peak_frequencies_increase() {
        let amplitudes: Vec<f64> = (0..500)
            .map(|x| ((x as f64) / 7.).sin().abs() * (1. + (x % 3) as f64))
            .collect();
        let s = spectrum(amplitudes);
        let peaks: Vec<_> = detect_peaks(&s).collect();
        assert!(peaks.len() > 1);
        assert!(peaks.windows(2).all(|w| w[0].frequency < w[1].frequency));
        assert!(peaks.iter().all(|p| p.amplitude >= p.local_mean));
    }
}
