//! Top-level operations: audio in, reconciled segments or nested
//! transcript out.

use crate::audio::AudioBuffer;
use crate::decode::{DEFAULT_HYPOTHESIS_PATH, Decoder};
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::merge::merge;
use crate::reconcile::reconcile;
use crate::segment::{PhonemeSequence, UtteranceClock, WordSequence, plain_table, pretty_table};
use crate::transcript::NestedTranscript;
use std::path::{Path, PathBuf};

/// Files involved in interpreting one utterance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub audio: PathBuf,
    /// Known transcript; a hypothesis is synthesized when absent
    pub transcript: Option<PathBuf>,
    /// Where a synthesized hypothesis is written
    pub hypothesis_path: PathBuf,
    /// Destination for [`interpret_to_file`]
    pub output: Option<PathBuf>,
}

impl Request {
    pub fn new(audio: impl Into<PathBuf>) -> Self {
        Self {
            audio: audio.into(),
            transcript: None,
            hypothesis_path: PathBuf::from(DEFAULT_HYPOTHESIS_PATH),
            output: None,
        }
    }

    pub fn with_transcript(mut self, path: impl Into<PathBuf>) -> Self {
        self.transcript = Some(path.into());
        self
    }

    pub fn with_hypothesis_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.hypothesis_path = path.into();
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }
}

/// Reconciled word and phoneme sequences of one utterance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Breakdown {
    pub words: WordSequence,
    pub phonemes: PhonemeSequence<UtteranceClock>,
    /// `false` when no `<s>` marker was found and phoneme starts were
    /// left on the alignment clock
    pub timing_reliable: bool,
}

impl Breakdown {
    fn log_tables(&self) {
        tracing::debug!("word segments\n{}", pretty_table(&self.words));
        tracing::debug!("phoneme segments\n{}", pretty_table(&self.phonemes));
        tracing::trace!("word segments (plain)\n{}", plain_table(&self.words));
        tracing::trace!("phoneme segments (plain)\n{}", plain_table(&self.phonemes));
    }
}

/// Nested transcript plus whether its phoneme timing can be trusted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Interpretation {
    pub transcript: NestedTranscript,
    pub timing_reliable: bool,
}

/// Decode and reconcile, keeping the flat sequences.
pub fn interpret_breakdown<E: Engine>(engine: E, request: &Request) -> Result<Breakdown> {
    let audio = AudioBuffer::from_file(&request.audio).inspect_err(|e| {
        tracing::error!(audio = %request.audio.display(), error = %e, "failed to parse speech clip");
    })?;
    tracing::debug!(
        audio = %request.audio.display(),
        seconds = audio.duration_secs(),
        frames = audio.frame_count(),
        "loaded speech clip"
    );

    let alignment = Decoder::new(engine, &audio)
        .with_hypothesis_path(&request.hypothesis_path)
        .run(request.transcript.as_deref())
        .inspect_err(|e| {
            tracing::error!(audio = %request.audio.display(), error = %e, "failed to parse speech clip");
        })?;

    let (phonemes, timing_reliable) = reconcile(&alignment.words, alignment.phonemes).into_phonemes();

    let breakdown = Breakdown {
        words: alignment.words,
        phonemes,
        timing_reliable,
    };
    breakdown.log_tables();

    Ok(breakdown)
}

/// Reconciled word sequence only.
pub fn interpret_hypothesis<E: Engine>(engine: E, request: &Request) -> Result<WordSequence> {
    interpret_breakdown(engine, request).map(|b| b.words)
}

/// Reconciled phoneme sequence only.
pub fn interpret_phonemes<E: Engine>(
    engine: E,
    request: &Request,
) -> Result<PhonemeSequence<UtteranceClock>> {
    interpret_breakdown(engine, request).map(|b| b.phonemes)
}

/// Decode, reconcile and merge into a nested transcript.
pub fn interpret<E: Engine>(engine: E, request: &Request) -> Result<Interpretation> {
    let breakdown = interpret_breakdown(engine, request)?;

    if !breakdown.timing_reliable {
        tracing::warn!(audio = %request.audio.display(), "phoneme timing is unreliable");
    }

    Ok(Interpretation {
        transcript: merge(&breakdown.words, &breakdown.phonemes),
        timing_reliable: breakdown.timing_reliable,
    })
}

/// Nested transcript as pretty JSON.
pub fn interpret_to_string<E: Engine>(engine: E, request: &Request) -> Result<String> {
    interpret(engine, request)?.transcript.to_json_string()
}

/// Nested transcript written as JSON to [`Request::output`].
///
/// Fails with [`Error::InvalidArgument`] before decoding when no output
/// path is set. The file is only created once the JSON is rendered.
pub fn interpret_to_file<E: Engine>(engine: E, request: &Request) -> Result<Interpretation> {
    let output = request
        .output
        .as_deref()
        .ok_or_else(|| Error::invalid_argument("no output path for transcript file"))?;

    let interpretation = interpret(engine, request)?;
    write_output(&interpretation.transcript, output)?;

    Ok(interpretation)
}

fn write_output(transcript: &NestedTranscript, output: &Path) -> Result<()> {
    transcript.write_json_file(output).inspect_err(|e| {
        tracing::error!(output = %output.display(), error = %e, "failed to create json file");
    })
}
