//! Fold flat word and phoneme segmentations into a nested transcript.

use crate::segment::{
    Frame, PhonemeLabel, PhonemeSegment, PhonemeSequence, UtteranceClock, WordLabel, WordSegment,
    WordSequence,
};
use crate::transcript::{NestedTranscript, PhonemeNode, WordNode};

/// Assign phonemes to words by temporal boundary in one forward pass.
///
/// Sentinel words (`<s>`, `</s>`, `<sil>`) produce no node. `SIL` phonemes
/// produce no node but still take part in the boundary test. The phoneme
/// that crosses a word's end is kept in that word and becomes the first
/// candidate for the next one. The cursor never moves backwards.
pub fn merge(words: &WordSequence, phonemes: &PhonemeSequence<UtteranceClock>) -> NestedTranscript {
    let phonemes = phonemes.as_slice();
    let mut cursor = 0;
    let mut nodes = Vec::with_capacity(words.len());

    for word in words {
        let WordLabel::Word(label) = &word.label else {
            continue;
        };

        let mut node = WordNode {
            word: label.clone(),
            start: word.start,
            duration: word.duration,
            phonemes: Vec::new(),
        };

        for (i, phoneme) in phonemes.iter().enumerate().skip(cursor) {
            if let PhonemeLabel::Phone(phone) = &phoneme.label {
                node.phonemes.push(PhonemeNode {
                    phoneme: phone.clone(),
                    start: phoneme.start,
                    duration: phoneme.duration,
                });
            }

            if crosses_end(phoneme, word) {
                cursor = i;
                break;
            }
        }

        nodes.push(node);
    }

    tracing::debug!(words = nodes.len(), cursor, "merged segmentations");

    NestedTranscript { words: nodes }
}

fn crosses_end(phoneme: &PhonemeSegment, word: &WordSegment) -> bool {
    let next_time: Frame = phoneme.start.saturating_add(phoneme.duration).saturating_add(1);
    next_time > word.end
}
