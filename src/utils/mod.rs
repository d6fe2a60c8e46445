pub mod buffer;
pub mod harmonic;
pub mod peak;
pub mod spike;
