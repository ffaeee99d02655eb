//! Decoding engine seam.
//!
//! Acoustic scoring and search live outside this crate. An [`Engine`]
//! yields word segmentations from free recognition and word + phoneme
//! segmentations from forced alignment against a known transcript.

pub mod config;
pub mod dictionary;
pub mod recorded;

use crate::audio::AudioBuffer;
use crate::error::{Error, Result};
use crate::segment::{LocalClock, PhonemeSequence, WordLabel, WordSequence};

pub use config::EngineConfig;
pub use dictionary::PronunciationDictionary;
pub use recorded::RecordedEngine;

/// Output of one forced-alignment decode.
///
/// Both sequences come from the same search. Word frames are on the
/// utterance clock, phoneme frames on the alignment's local clock.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Alignment {
    pub words: WordSequence,
    pub phonemes: PhonemeSequence<LocalClock>,
}

/// Speech decoder used by the orchestrator.
///
/// Engines keep internal search state, so one instance serves one
/// utterance at a time.
pub trait Engine {
    /// Whether the word can be used in a forced-alignment transcript.
    fn contains_word(&self, word: &str) -> bool;

    /// Free recognition: decode the audio with no known transcript.
    fn recognize(&mut self, audio: &AudioBuffer) -> Result<WordSequence>;

    /// Forced alignment of a known transcript to the audio.
    fn align(&mut self, audio: &AudioBuffer, transcript: &AlignmentTranscript) -> Result<Alignment>;
}

impl<E: Engine + ?Sized> Engine for &mut E {
    fn contains_word(&self, word: &str) -> bool {
        (**self).contains_word(word)
    }

    fn recognize(&mut self, audio: &AudioBuffer) -> Result<WordSequence> {
        (**self).recognize(audio)
    }

    fn align(&mut self, audio: &AudioBuffer, transcript: &AlignmentTranscript) -> Result<Alignment> {
        (**self).align(audio, transcript)
    }
}

/// Forced-alignment search input: vocabulary-checked words bracketed by
/// `<s>` and `</s>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlignmentTranscript {
    labels: Vec<WordLabel>,
}

impl AlignmentTranscript {
    /// Resolve transcript words against the engine vocabulary.
    ///
    /// `<sil>` is accepted as a filler. Any word the engine does not know,
    /// including a stray `<s>` or `</s>`, fails with
    /// [`Error::UnknownWord`].
    pub fn build<E, S>(words: &[S], engine: &E) -> Result<Self>
    where
        E: Engine + ?Sized,
        S: AsRef<str>,
    {
        let mut labels = Vec::new();
        labels.try_reserve(words.len() + 2)?;
        labels.push(WordLabel::UtteranceStart);

        for word in words {
            let word = word.as_ref();
            let label = WordLabel::parse(word);

            let known = match &label {
                WordLabel::Word(w) => engine.contains_word(w),
                WordLabel::Silence => true,
                WordLabel::UtteranceStart | WordLabel::UtteranceEnd => false,
            };

            if !known {
                tracing::error!(word, "unknown word");
                return Err(Error::UnknownWord {
                    word: word.to_string(),
                });
            }

            labels.push(label);
        }

        labels.push(WordLabel::UtteranceEnd);

        Ok(Self { labels })
    }

    /// Full search labels including the sentinels.
    pub fn labels(&self) -> &[WordLabel] {
        &self.labels
    }

    /// Spoken words only.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().filter_map(WordLabel::word)
    }
}
