use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;

use crate::float::Float;

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

pub fn new_complex_buffer<T: Float>(size: usize) -> Vec<Complex<T>> {
    vec![Complex::zero(); size]
}

/// Copy `input` into the real part of `output`, zeroing the imaginary part and
/// any remaining tail of `output`.
pub fn copy_real_to_complex<T: Float>(input: &[T], output: &mut [Complex<T>]) {
    assert!(input.len() <= output.len());
    input.iter().zip(output.iter_mut()).for_each(|(i, o)| {
        o.re = *i;
        o.im = T::zero();
    });
    output[input.len()..]
        .iter_mut()
        .for_each(|o| *o = Complex::zero())
}

/// Arithmetic mean of `arr`, zero when `arr` is empty.
pub fn mean<T: Float>(arr: &[T]) -> T {
    if arr.is_empty() {
        return T::zero();
    }
    arr.iter().copied().sum::<T>() / T::from_usize(arr.len()).unwrap()
}

/// Convert integer PCM samples to `T`, removing their mean (the DC offset) and
/// dividing by `max_amplitude` so that full scale maps to roughly `[-1, 1]`.
pub fn normalize_samples<T: Float>(samples: &[i32], max_amplitude: f64, output: &mut [T]) {
    assert!(samples.len() <= output.len());
    let scale = T::from_f64(max_amplitude).unwrap();
    samples
        .iter()
        .zip(output.iter_mut())
        .for_each(|(s, o)| *o = T::from_i32(*s).unwrap());

    let offset = mean(&output[..samples.len()]);
    output[..samples.len()]
        .iter_mut()
        .for_each(|o| *o = (*o - offset) / scale);
    output[samples.len()..]
        .iter_mut()
        .for_each(|o| *o = T::zero());
}

/// Computes `scale * |x|` for each complex value `x` in `input`.
pub fn scaled_modulus<T: Float>(input: &[Complex<T>], scale: T, output: &mut [T]) {
    assert!(input.len() <= output.len());
    input
        .iter()
        .zip(output.iter_mut())
        .for_each(|(c, o)| *o = scale * c.norm());
}
