//! Nested transcript: words with their phonemes, and its JSON form.
//!
//! ```json
//! {
//!   "words": [
//!     {
//!       "word": "cat",
//!       "start": 10,
//!       "duration": 10,
//!       "phonemes": [
//!         { "phoneme": "K", "start": 8, "duration": 4 }
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use crate::segment::Frame;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Phoneme inside a word node.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PhonemeNode {
    pub phoneme: String,
    pub start: Frame,
    pub duration: Frame,
}

/// Spoken word and the phonemes aligned inside it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct WordNode {
    pub word: String,
    pub start: Frame,
    pub duration: Frame,
    pub phonemes: Vec<PhonemeNode>,
}

/// Hierarchical transcript of one utterance.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct NestedTranscript {
    pub words: Vec<WordNode>,
}

impl NestedTranscript {
    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::from)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::from)
    }

    /// Write pretty-printed JSON to `path`, truncating it.
    ///
    /// The JSON is rendered before the file is opened, so a serialization
    /// failure leaves no file behind.
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json_string()?;

        let mut file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.write_all(b"\n"))
            .map_err(|e| Error::io(path, e))?;

        tracing::info!(path = %path.display(), words = self.words.len(), "wrote transcript");

        Ok(())
    }

    /// Word labels in order.
    pub fn word_labels(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.word.as_str())
    }
}
