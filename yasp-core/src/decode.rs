//! Two-phase decode of one utterance.
//!
//! With a transcript the engine runs forced alignment directly. Without
//! one, a free-recognition pass produces a hypothesis that is written out
//! and read back as the transcript for the alignment pass.

use crate::audio::AudioBuffer;
use crate::engine::{Alignment, AlignmentTranscript, Engine};
use crate::error::{Error, Result};
use crate::segment::WordSequence;
use crate::tokenizer::parse_transcript;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where the synthesized hypothesis goes when no path is given.
pub const DEFAULT_HYPOTHESIS_PATH: &str = "generated_hypothesis";

/// Progress of one utterance through the decoder.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodeState {
    /// No transcript yet: run free recognition first.
    NeedsHypothesis,
    /// Transcript file to align against.
    NeedsAlignment { transcript: PathBuf },
    /// Word sequence and local-clock phonemes from the alignment pass.
    Done(Alignment),
}

impl DecodeState {
    pub fn initial(transcript: Option<&Path>) -> Self {
        match transcript {
            Some(path) => Self::NeedsAlignment {
                transcript: path.to_path_buf(),
            },
            None => Self::NeedsHypothesis,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::NeedsHypothesis => "needs-hypothesis",
            Self::NeedsAlignment { .. } => "needs-alignment",
            Self::Done(_) => "done",
        }
    }
}

/// Drives an [`Engine`] through the decode states for one utterance.
pub struct Decoder<'a, E> {
    engine: E,
    audio: &'a AudioBuffer,
    hypothesis_path: PathBuf,
}

impl<'a, E: Engine> Decoder<'a, E> {
    pub fn new(engine: E, audio: &'a AudioBuffer) -> Self {
        Self {
            engine,
            audio,
            hypothesis_path: PathBuf::from(DEFAULT_HYPOTHESIS_PATH),
        }
    }

    /// Path the synthesized hypothesis is written to.
    pub fn with_hypothesis_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.hypothesis_path = path.into();
        self
    }

    /// Run until [`DecodeState::Done`].
    pub fn run(&mut self, transcript: Option<&Path>) -> Result<Alignment> {
        let mut state = DecodeState::initial(transcript);
        loop {
            state = match self.step(state)? {
                DecodeState::Done(alignment) => return Ok(alignment),
                next => next,
            };
        }
    }

    /// Advance one state.
    pub fn step(&mut self, state: DecodeState) -> Result<DecodeState> {
        tracing::debug!(state = state.name(), "decode step");

        match state {
            DecodeState::NeedsHypothesis => {
                let hypothesis = self.engine.recognize(self.audio)?;
                let transcript = write_hypothesis(&hypothesis, &self.hypothesis_path)?;
                Ok(DecodeState::NeedsAlignment { transcript })
            }
            DecodeState::NeedsAlignment { transcript } => {
                let file = File::open(&transcript).map_err(|e| Error::io(&transcript, e))?;
                let words = parse_transcript(file)?;
                let transcript = AlignmentTranscript::build(&words, &self.engine)?;

                tracing::info!(words = words.len(), "running forced alignment");
                let alignment = self.engine.align(self.audio, &transcript)?;

                Ok(DecodeState::Done(alignment))
            }
            done @ DecodeState::Done(_) => Ok(done),
        }
    }
}

/// Spoken words of a hypothesis joined by single spaces.
pub fn hypothesis_text(words: &WordSequence) -> String {
    words
        .iter()
        .filter_map(|w| w.label.word())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write the hypothesis as a transcript file and return its path.
fn write_hypothesis(words: &WordSequence, path: &Path) -> Result<PathBuf> {
    let text = hypothesis_text(words);

    let mut file = File::create(path).map_err(|e| Error::io(path, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| Error::io(path, e))?;

    tracing::info!(path = %path.display(), hypothesis = %text, "wrote hypothesis transcript");

    Ok(path.to_path_buf())
}
