use crate::audio::AudioClip;
use crate::detector::internals::CandidateFrequency;
use crate::error::Result;
use crate::float::Float;

pub mod harmonic;
pub mod internals;

pub trait PitchDetector<T>
where
    T: Float,
{
    /// Candidate fundamentals of `clip`, best first.
    fn get_pitch(&mut self, clip: &AudioClip) -> Result<Vec<CandidateFrequency<T>>>;
}
