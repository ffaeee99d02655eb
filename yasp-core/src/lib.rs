//! yasp-core: time-aligned, hierarchical transcripts from speech decodes.
//!
//! A decoding engine yields two flat segmentations of one utterance: words
//! on the utterance clock and phonemes on the forced-alignment clock. This
//! crate drives the engine, reconciles the two clocks and folds the
//! phonemes into the words they belong to.
//!
//! # Pipeline
//!
//! - [`decode::Decoder`]: free recognition (when no transcript is given)
//!   followed by forced alignment
//! - [`reconcile::reconcile`]: shifts phonemes onto the utterance clock
//! - [`merge::merge`]: nests phonemes under words
//! - [`transcript::NestedTranscript`]: the JSON output
//!
//! The engine itself sits behind the [`engine::Engine`] trait.
//!
//! # Quick Start
//!
//! ```ignore
//! use yasp_core::engine::{EngineConfig, RecordedEngine};
//! use yasp_core::interpret::{Request, interpret};
//!
//! let config = EngineConfig::from_model_dir("model");
//! let engine = RecordedEngine::new(&config, "clip.decode.json")?;
//!
//! let request = Request::new("clip.raw").with_transcript("clip.txt");
//! let result = interpret(engine, &request)?;
//! println!("{}", result.transcript.to_json_string()?);
//! ```

pub mod audio;
pub mod decode;
pub mod engine;
pub mod error;
pub mod interpret;
pub mod merge;
pub mod reconcile;
pub mod segment;
pub mod tokenizer;
pub mod transcript;
