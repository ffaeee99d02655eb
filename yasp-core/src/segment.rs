//! Segment store: ordered word and phoneme segments of one utterance.

use crate::error::Result;
use std::fmt;
use std::marker::PhantomData;

/// Engine frame index or frame count.
pub type Frame = i32;

/// Utterance start marker emitted by the decoder.
pub const UTTERANCE_START: &str = "<s>";
/// Utterance end marker emitted by the decoder.
pub const UTTERANCE_END: &str = "</s>";
/// Word-level silence filler.
pub const WORD_SILENCE: &str = "<sil>";
/// Phone-level silence.
pub const PHONE_SILENCE: &str = "SIL";

/// Word label with the structural tokens split out at construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WordLabel {
    /// `<s>`
    UtteranceStart,
    /// `</s>`
    UtteranceEnd,
    /// `<sil>`
    Silence,
    /// Any spoken word
    Word(String),
}

impl WordLabel {
    pub fn parse(label: &str) -> Self {
        match label {
            UTTERANCE_START => Self::UtteranceStart,
            UTTERANCE_END => Self::UtteranceEnd,
            WORD_SILENCE => Self::Silence,
            word => Self::Word(word.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::UtteranceStart => UTTERANCE_START,
            Self::UtteranceEnd => UTTERANCE_END,
            Self::Silence => WORD_SILENCE,
            Self::Word(word) => word,
        }
    }

    /// Spoken word text, `None` for sentinels and silence.
    pub fn word(&self) -> Option<&str> {
        match self {
            Self::Word(word) => Some(word),
            _ => None,
        }
    }
}

impl From<&str> for WordLabel {
    fn from(label: &str) -> Self {
        Self::parse(label)
    }
}

impl fmt::Display for WordLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phoneme label with silence split out at construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PhonemeLabel {
    /// `SIL`
    Silence,
    /// Context-independent phone symbol
    Phone(String),
}

impl PhonemeLabel {
    pub fn parse(label: &str) -> Self {
        match label {
            PHONE_SILENCE => Self::Silence,
            phone => Self::Phone(phone.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Silence => PHONE_SILENCE,
            Self::Phone(phone) => phone,
        }
    }

    pub fn phone(&self) -> Option<&str> {
        match self {
            Self::Phone(phone) => Some(phone),
            Self::Silence => None,
        }
    }
}

impl From<&str> for PhonemeLabel {
    fn from(label: &str) -> Self {
        Self::parse(label)
    }
}

impl fmt::Display for PhonemeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized word with frame boundaries and decoder scores.
///
/// Frames are on the utterance clock. `duration` is always `end - start`.
#[derive(Clone, Debug, PartialEq)]
pub struct WordSegment {
    pub label: WordLabel,
    pub start: Frame,
    pub end: Frame,
    pub duration: Frame,
    /// Posterior probability in [0, 1]
    pub probability: f64,
    pub acoustic_score: i32,
    pub language_score: i32,
    pub language_backoff: i32,
}

impl WordSegment {
    /// Create a word segment with neutral scores.
    pub fn new(label: impl Into<WordLabel>, start: Frame, end: Frame) -> Self {
        Self {
            label: label.into(),
            start,
            end,
            duration: end.saturating_sub(start),
            probability: 1.0,
            acoustic_score: 0,
            language_score: 0,
            language_backoff: 0,
        }
    }

    pub fn with_scores(
        mut self,
        probability: f64,
        acoustic_score: i32,
        language_score: i32,
        language_backoff: i32,
    ) -> Self {
        self.probability = probability;
        self.acoustic_score = acoustic_score;
        self.language_score = language_score;
        self.language_backoff = language_backoff;
        self
    }
}

/// Aligned phoneme with start frame and duration.
#[derive(Clone, Debug, PartialEq)]
pub struct PhonemeSegment {
    pub label: PhonemeLabel,
    pub start: Frame,
    pub duration: Frame,
    pub score: i32,
}

impl PhonemeSegment {
    pub fn new(label: impl Into<PhonemeLabel>, start: Frame, duration: Frame) -> Self {
        Self {
            label: label.into(),
            start,
            duration,
            score: 0,
        }
    }

    pub fn with_score(mut self, score: i32) -> Self {
        self.score = score;
        self
    }
}

/// Append-only ordered list of segments.
///
/// Segments are kept in production order; nothing is re-sorted on insert.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentList<T> {
    segments: Vec<T>,
}

impl<T> Default for SegmentList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SegmentList<T> {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Append a segment at the tail.
    pub fn push(&mut self, segment: T) -> Result<()> {
        self.segments.try_reserve(1)?;
        self.segments.push(segment);
        Ok(())
    }

    /// Drop every segment. Safe to call on an empty list.
    pub fn release(&mut self) {
        self.segments.clear();
        self.segments.shrink_to_fit();
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.segments.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.segments
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.segments.iter_mut()
    }
}

impl<T> FromIterator<T> for SegmentList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a SegmentList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Word sequence of one utterance, bracketed by `<s>` and `</s>`.
pub type WordSequence = SegmentList<WordSegment>;

/// Phoneme timestamps relative to the alignment search (first frame is 0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalClock;

/// Phoneme timestamps on the same clock as the word sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UtteranceClock;

/// Phoneme sequence tagged with the clock its start frames refer to.
///
/// Only a [`LocalClock`] sequence can be offset-corrected, so the
/// correction cannot be applied twice.
#[derive(Clone, Debug, PartialEq)]
pub struct PhonemeSequence<C = UtteranceClock> {
    segments: SegmentList<PhonemeSegment>,
    clock: PhantomData<C>,
}

impl<C> Default for PhonemeSequence<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> PhonemeSequence<C> {
    pub fn new() -> Self {
        Self {
            segments: SegmentList::new(),
            clock: PhantomData,
        }
    }

    pub fn push(&mut self, segment: PhonemeSegment) -> Result<()> {
        self.segments.push(segment)
    }

    pub fn release(&mut self) {
        self.segments.release();
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhonemeSegment> {
        self.segments.iter()
    }

    pub fn as_slice(&self) -> &[PhonemeSegment] {
        self.segments.as_slice()
    }

    pub fn segments(&self) -> &SegmentList<PhonemeSegment> {
        &self.segments
    }

    /// Re-tag the sequence without touching any timestamp.
    pub(crate) fn retag<D>(self) -> PhonemeSequence<D> {
        PhonemeSequence {
            segments: self.segments,
            clock: PhantomData,
        }
    }

    pub(crate) fn segments_mut(&mut self) -> &mut SegmentList<PhonemeSegment> {
        &mut self.segments
    }
}

impl<C> FromIterator<PhonemeSegment> for PhonemeSequence<C> {
    fn from_iter<I: IntoIterator<Item = PhonemeSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
            clock: PhantomData,
        }
    }
}

impl<'a, C> IntoIterator for &'a PhonemeSequence<C> {
    type Item = &'a PhonemeSegment;
    type IntoIter = std::slice::Iter<'a, PhonemeSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Segment that can be rendered as a table row.
pub trait TableRow {
    const HEADER: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

impl TableRow for WordSegment {
    const HEADER: &'static [&'static str] = &[
        "word", "start", "end", "pprob", "ascr", "lscr", "lback", "duration",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.label.to_string(),
            self.start.to_string(),
            self.end.to_string(),
            format!("{:.3}", self.probability),
            self.acoustic_score.to_string(),
            self.language_score.to_string(),
            self.language_backoff.to_string(),
            self.duration.to_string(),
        ]
    }
}

impl TableRow for PhonemeSegment {
    const HEADER: &'static [&'static str] = &["phoneme", "start", "duration", "score"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.label.to_string(),
            self.start.to_string(),
            self.duration.to_string(),
            self.score.to_string(),
        ]
    }
}

/// Space-delimited table, one segment per line (pastes into a spreadsheet).
pub fn plain_table<'a, T, I>(segments: I) -> String
where
    T: TableRow + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut lines = vec![T::HEADER.join(" ")];
    lines.extend(segments.into_iter().map(|s| s.cells().join(" ")));
    lines.join("\n")
}

/// Column-aligned table for reading.
pub fn pretty_table<'a, T, I>(segments: I) -> String
where
    T: TableRow + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let header: Vec<String> = T::HEADER.iter().map(|h| h.to_string()).collect();
    let rows: Vec<Vec<String>> = std::iter::once(header)
        .chain(segments.into_iter().map(|s| s.cells()))
        .collect();

    let mut widths = vec![0usize; T::HEADER.len()];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join(" ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
