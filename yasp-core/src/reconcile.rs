//! Time-base reconciliation between word and phoneme segmentations.
//!
//! The phoneme alignment runs as its own search with a clock starting at
//! frame 0, while word frames count from the start of the whole utterance.
//! The `<s>` word's start frame is the distance between the two clocks.

use crate::error::{Error, Result};
use crate::segment::{Frame, LocalClock, PhonemeSequence, UtteranceClock, WordLabel, WordSequence};

/// Outcome of moving phonemes onto the utterance clock.
#[derive(Clone, Debug, PartialEq)]
pub enum Reconciliation {
    /// Every phoneme start was shifted by `offset`.
    Aligned {
        offset: Frame,
        phonemes: PhonemeSequence<UtteranceClock>,
    },
    /// No `<s>` marker; phonemes are untouched.
    Incompatible {
        phonemes: PhonemeSequence<LocalClock>,
    },
}

impl Reconciliation {
    pub fn is_reliable(&self) -> bool {
        matches!(self, Self::Aligned { .. })
    }

    /// Phonemes on the utterance clock, or [`Error::TimingIncompatibility`].
    pub fn into_result(self) -> Result<PhonemeSequence<UtteranceClock>> {
        match self {
            Self::Aligned { phonemes, .. } => Ok(phonemes),
            Self::Incompatible { .. } => Err(Error::TimingIncompatibility),
        }
    }

    /// Phonemes treated as utterance-clock either way, plus whether the
    /// timing can be trusted.
    pub fn into_phonemes(self) -> (PhonemeSequence<UtteranceClock>, bool) {
        match self {
            Self::Aligned { phonemes, .. } => (phonemes, true),
            Self::Incompatible { phonemes } => (phonemes.retag(), false),
        }
    }
}

/// Start frame of the utterance start marker (the last one, if repeated).
pub fn utterance_offset(words: &WordSequence) -> Option<Frame> {
    words
        .iter()
        .rev()
        .find(|w| w.label == WordLabel::UtteranceStart)
        .map(|w| w.start)
}

/// Shift phoneme starts from the alignment clock onto the word clock.
///
/// ```
/// use yasp_core::reconcile::reconcile;
/// use yasp_core::segment::{LocalClock, PhonemeSegment, PhonemeSequence, WordSegment, WordSequence};
///
/// let words: WordSequence = [WordSegment::new("<s>", 5, 9)].into_iter().collect();
/// let phonemes: PhonemeSequence<LocalClock> =
///     [PhonemeSegment::new("K", 0, 4)].into_iter().collect();
///
/// let (shifted, reliable) = reconcile(&words, phonemes).into_phonemes();
/// assert!(reliable);
/// assert_eq!(shifted.as_slice()[0].start, 5);
/// ```
///
/// Phonemes already on the utterance clock cannot be shifted again:
///
/// ```compile_fail
/// use yasp_core::reconcile::reconcile;
/// use yasp_core::segment::{LocalClock, PhonemeSegment, PhonemeSequence, WordSegment, WordSequence};
///
/// let words: WordSequence = [WordSegment::new("<s>", 5, 9)].into_iter().collect();
/// let phonemes: PhonemeSequence<LocalClock> =
///     [PhonemeSegment::new("K", 0, 4)].into_iter().collect();
///
/// let (shifted, _) = reconcile(&words, phonemes).into_phonemes();
/// reconcile(&words, shifted);
/// ```
pub fn reconcile(words: &WordSequence, mut phonemes: PhonemeSequence<LocalClock>) -> Reconciliation {
    let Some(offset) = utterance_offset(words) else {
        tracing::error!(
            phonemes = phonemes.len(),
            "timing incompatibility between word and phoneme lists, result may be unreliable"
        );
        return Reconciliation::Incompatible { phonemes };
    };

    for phoneme in phonemes.segments_mut().iter_mut() {
        phoneme.start = phoneme.start.saturating_add(offset);
    }

    tracing::debug!(offset, phonemes = phonemes.len(), "reconciled phoneme timing");

    Reconciliation::Aligned {
        offset,
        phonemes: phonemes.retag(),
    }
}
