//! Audio loading for the decoder.

use crate::error::{AudioError, Error, Result};
use crate::segment::Frame;
use hound::{SampleFormat, WavReader};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Expected sample rate for the decoder (16kHz)
pub const SAMPLE_RATE: u32 = 16000;

/// Decoder frame rate (10ms frames)
pub const FRAMES_PER_SECOND: u32 = 100;

/// Read size for raw PCM input
const CHUNK_BYTES: usize = 4096;

/// Mono 16-bit audio held in memory for one utterance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Load audio from a file.
    ///
    /// Files with a `.wav` extension are parsed as WAV; anything else is
    /// read as headerless little-endian 16-bit mono PCM at 16kHz.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let is_wav = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

        let buffer = if is_wav {
            Self::from_wav_file(path)?
        } else {
            let file = File::open(path).map_err(|e| Error::io(path, e))?;
            Self::from_raw_pcm(file).map_err(|e| Error::io(path, e))?
        };

        tracing::debug!(
            path = %path.display(),
            samples = buffer.samples.len(),
            frames = buffer.frame_count(),
            "loaded audio"
        );

        Ok(buffer)
    }

    /// Read headerless 16-bit little-endian PCM in fixed-size chunks.
    ///
    /// A dangling odd byte at the end of the stream is ignored.
    pub fn from_raw_pcm<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut samples = Vec::new();
        let mut chunk = [0u8; CHUNK_BYTES];
        let mut carry: Option<u8> = None;

        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            let mut bytes = &chunk[..n];
            if let Some(lo) = carry.take() {
                samples.push(i16::from_le_bytes([lo, bytes[0]]));
                bytes = &bytes[1..];
            }

            let pairs = bytes.chunks_exact(2);
            carry = pairs.remainder().first().copied();
            samples.extend(pairs.map(|pair| i16::from_le_bytes([pair[0], pair[1]])));
        }

        Ok(Self {
            samples,
            sample_rate: SAMPLE_RATE,
        })
    }

    /// Load a 16kHz mono 16-bit WAV file.
    pub fn from_wav_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let reader = WavReader::new(std::io::BufReader::new(file)).map_err(AudioError::from)?;
        let spec = reader.spec();

        if spec.sample_rate != SAMPLE_RATE {
            return Err(AudioError::InvalidSampleRate {
                expected: SAMPLE_RATE,
                got: spec.sample_rate,
            }
            .into());
        }

        if spec.channels != 1 {
            return Err(AudioError::InvalidChannels(spec.channels).into());
        }

        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            let format = match spec.sample_format {
                SampleFormat::Int => "int",
                SampleFormat::Float => "float",
            };
            return Err(AudioError::UnsupportedFormat {
                bits: spec.bits_per_sample,
                format,
            }
            .into());
        }

        let samples = reader
            .into_samples::<i16>()
            .collect::<hound::Result<Vec<_>>>()
            .map_err(AudioError::from)?;

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
        })
    }

    /// Number of whole decoder frames covered by the samples.
    pub fn frame_count(&self) -> Frame {
        let per_frame = (self.sample_rate / FRAMES_PER_SECOND).max(1) as usize;
        Frame::try_from(self.samples.len() / per_frame).unwrap_or(Frame::MAX)
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}
