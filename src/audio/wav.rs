use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use hound::{SampleFormat, WavReader};
use log::debug;

use super::{AudioClip, AudioSource};
use crate::error::{Error, Result};

/// An [AudioSource] reading integer linear PCM from a WAV container.
///
/// Frames with several channels are averaged down to a single mono sample.
pub struct WavSource<R: Read + Seek> {
    reader: WavReader<R>,
}

impl WavSource<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("opening \"{}\"", path.as_ref().display());
        Self::from_reader(WavReader::open(path)?)
    }
}

impl<R: Read + Seek> WavSource<R> {
    pub fn new(reader: R) -> Result<Self> {
        Self::from_reader(WavReader::new(reader)?)
    }

    fn from_reader(reader: WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        if spec.sample_format != SampleFormat::Int {
            return Err(Error::UnsupportedFormat(
                "floating point wav samples".to_string(),
            ));
        }
        if spec.channels == 0 || spec.sample_rate == 0 {
            return Err(Error::UnsupportedFormat(format!(
                "{} channels at {} Hz",
                spec.channels, spec.sample_rate
            )));
        }
        debug!(
            "wav source: {} Hz, {} bits, {} channels, {} frames",
            spec.sample_rate,
            spec.bits_per_sample,
            spec.channels,
            reader.duration()
        );
        Ok(WavSource { reader })
    }
}

impl<R: Read + Seek> AudioSource for WavSource<R> {
    fn sample_rate(&self) -> usize {
        self.reader.spec().sample_rate as usize
    }

    fn bits_per_sample(&self) -> u16 {
        self.reader.spec().bits_per_sample
    }

    fn frame_count(&self) -> usize {
        self.reader.duration() as usize
    }

    fn read_clip(&mut self, start_frame: usize, frame_count: usize) -> Result<AudioClip> {
        let channels = self.reader.spec().channels as usize;
        let start = start_frame.min(self.frame_count());
        let frame_count = frame_count.min(self.frame_count() - start);

        self.reader.seek(start as u32)?;
        let interleaved = self
            .reader
            .samples::<i32>()
            .take(frame_count * channels)
            .collect::<std::result::Result<Vec<i32>, hound::Error>>()?;

        let samples = match channels {
            1 => interleaved,
            _ => interleaved
                .chunks(channels)
                .map(|frame| {
                    let sum: i64 = frame.iter().map(|&s| i64::from(s)).sum();
                    (sum / frame.len() as i64) as i32
                })
                .collect(),
        };

        Ok(AudioClip::new(
            samples,
            self.sample_rate(),
            self.bits_per_sample(),
        ))
    }
}
