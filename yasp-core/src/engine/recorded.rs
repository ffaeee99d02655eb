//! Engine that replays a recorded decode.
//!
//! A recording is a JSON dump of what a decoder produced for one utterance:
//! the free-recognition word segmentation (optional) and the
//! forced-alignment word and phoneme segmentations, with scores in the
//! decoder's raw form.
//!
//! ```json
//! {
//!   "log_base": 1.0001,
//!   "hypothesis": [
//!     { "word": "<s>", "start": 0, "end": 9, "log_posterior": 0 },
//!     { "word": "cat", "start": 10, "end": 20, "log_posterior": -1200,
//!       "ascr": -9000, "lscr": -120, "lback": 1 }
//!   ],
//!   "alignment": {
//!     "words": [ { "word": "<s>", "start": 0, "end": 9 } ],
//!     "phonemes": [ { "phoneme": "K", "start": 0, "duration": 4, "score": -310 } ]
//!   }
//! }
//! ```

use super::{Alignment, AlignmentTranscript, Engine, EngineConfig, PronunciationDictionary};
use crate::audio::AudioBuffer;
use crate::error::{EngineInitError, Error, Result};
use crate::segment::{
    Frame, LocalClock, PhonemeSegment, PhonemeSequence, WordLabel, WordSegment, WordSequence,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default log base of decoder scores.
pub const DEFAULT_LOG_BASE: f64 = 1.0001;

fn default_log_base() -> f64 {
    DEFAULT_LOG_BASE
}

/// Word segment as emitted by the decoder.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RecordedWord {
    pub word: String,
    pub start: Frame,
    pub end: Frame,
    /// Posterior in the decoder's log domain
    #[serde(default)]
    pub log_posterior: i32,
    #[serde(default)]
    pub ascr: i32,
    #[serde(default)]
    pub lscr: i32,
    #[serde(default)]
    pub lback: i32,
}

/// Phoneme segment as emitted by the aligner.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RecordedPhoneme {
    pub phoneme: String,
    pub start: Frame,
    pub duration: Frame,
    #[serde(default)]
    pub score: i32,
}

/// Recorded forced-alignment pass.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct RecordedAlignment {
    pub words: Vec<RecordedWord>,
    #[serde(default)]
    pub phonemes: Vec<RecordedPhoneme>,
}

/// One utterance worth of decoder output.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct DecodeRecording {
    #[serde(default = "default_log_base")]
    pub log_base: f64,
    /// Free-recognition pass, needed when no transcript is supplied
    #[serde(default)]
    pub hypothesis: Option<Vec<RecordedWord>>,
    pub alignment: RecordedAlignment,
}

impl DecodeRecording {
    /// Convert a log-domain posterior to a probability in [0, 1].
    pub fn probability(&self, log_posterior: i32) -> f64 {
        self.log_base.powi(log_posterior).clamp(0.0, 1.0)
    }

    /// Every segment must start at or after frame 0 and have a
    /// non-negative extent.
    fn check_frames(&self) -> std::result::Result<(), String> {
        let words = self
            .hypothesis
            .iter()
            .flatten()
            .chain(&self.alignment.words);
        for w in words {
            if w.start < 0 || w.end < w.start {
                return Err(format!(
                    "word {:?} has invalid frames {}..{}",
                    w.word, w.start, w.end
                ));
            }
        }

        for p in &self.alignment.phonemes {
            if p.start < 0 || p.duration < 0 {
                return Err(format!(
                    "phoneme {:?} has invalid start {} or duration {}",
                    p.phoneme, p.start, p.duration
                ));
            }
        }

        Ok(())
    }

    fn word_sequence(&self, words: &[RecordedWord]) -> Result<WordSequence> {
        let mut sequence = WordSequence::new();
        for w in words {
            let segment = WordSegment::new(w.word.as_str(), w.start, w.end).with_scores(
                self.probability(w.log_posterior),
                w.ascr,
                w.lscr,
                w.lback,
            );
            sequence.push(segment)?;
        }
        Ok(sequence)
    }

    fn phoneme_sequence(&self) -> Result<PhonemeSequence<LocalClock>> {
        let mut sequence = PhonemeSequence::new();
        for p in &self.alignment.phonemes {
            sequence.push(
                PhonemeSegment::new(p.phoneme.as_str(), p.start, p.duration).with_score(p.score),
            )?;
        }
        Ok(sequence)
    }
}

/// Engine replaying a [`DecodeRecording`] while enforcing the decoder's
/// contracts: model files must exist, transcript words must be in the
/// pronunciation dictionary, and the aligned transcript must be the one
/// the recording was made with.
#[derive(Clone, Debug)]
pub struct RecordedEngine {
    dictionary: PronunciationDictionary,
    recording: DecodeRecording,
}

impl RecordedEngine {
    /// Validate the model directory, load its dictionary and the recording.
    pub fn new(config: &EngineConfig, recording: impl AsRef<Path>) -> Result<Self> {
        config.validate()?;

        let dictionary =
            PronunciationDictionary::from_file(&config.dictionary, config.dictionary_case_sensitive)?;

        let recording = load_recording(recording.as_ref())?;

        Ok(Self::from_parts(dictionary, recording))
    }

    pub fn from_parts(dictionary: PronunciationDictionary, recording: DecodeRecording) -> Self {
        Self {
            dictionary,
            recording,
        }
    }
}

/// Read and parse a recording file.
pub fn load_recording(path: &Path) -> Result<DecodeRecording> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

    let recording: DecodeRecording =
        serde_json::from_str(&text).map_err(|e| EngineInitError::InvalidRecording {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let invalid = |message: String| EngineInitError::InvalidRecording {
        path: path.to_path_buf(),
        message,
    };

    if recording.log_base.is_nan() || recording.log_base <= 1.0 {
        return Err(invalid(format!(
            "log base must be greater than 1, got {}",
            recording.log_base
        ))
        .into());
    }

    recording.check_frames().map_err(invalid)?;

    tracing::debug!(
        path = %path.display(),
        has_hypothesis = recording.hypothesis.is_some(),
        words = recording.alignment.words.len(),
        phonemes = recording.alignment.phonemes.len(),
        "loaded decode recording"
    );

    Ok(recording)
}

/// Warn when recorded segments end after the audio does.
fn check_extent(audio: &AudioBuffer, last_frame: Option<Frame>) {
    let frames = audio.frame_count();
    if let Some(last) = last_frame
        && last > frames
    {
        tracing::warn!(last, frames, "recorded segments extend past the audio");
    }
}

impl Engine for RecordedEngine {
    fn contains_word(&self, word: &str) -> bool {
        self.dictionary.contains(word)
    }

    fn recognize(&mut self, audio: &AudioBuffer) -> Result<WordSequence> {
        let words = self
            .recording
            .hypothesis
            .as_deref()
            .ok_or_else(|| Error::decode("recording has no free-recognition pass"))?;

        check_extent(audio, words.iter().map(|w| w.end).max());

        self.recording.word_sequence(words)
    }

    fn align(&mut self, audio: &AudioBuffer, transcript: &AlignmentTranscript) -> Result<Alignment> {
        let recorded: Vec<&str> = self
            .recording
            .alignment
            .words
            .iter()
            .filter_map(|w| match WordLabel::parse(&w.word) {
                WordLabel::Word(_) => Some(w.word.as_str()),
                _ => None,
            })
            .collect();

        if !transcript.words().eq(recorded.iter().copied()) {
            return Err(Error::decode(format!(
                "transcript does not match recorded alignment: expected {:?}",
                recorded.join(" ")
            )));
        }

        check_extent(
            audio,
            self.recording.alignment.words.iter().map(|w| w.end).max(),
        );

        Ok(Alignment {
            words: self.recording.word_sequence(&self.recording.alignment.words)?,
            phonemes: self.recording.phoneme_sequence()?,
        })
    }
}
