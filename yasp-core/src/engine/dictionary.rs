//! CMU-format pronunciation dictionary.
//!
//! One entry per line: `word PH1 PH2 ...`. Alternate pronunciations are
//! written `word(2) ...`. Lines starting with `;;;` are comments.

use crate::error::{EngineInitError, Error, Result};
use crate::segment::{UTTERANCE_END, UTTERANCE_START, WORD_SILENCE};
use std::collections::HashMap;
use std::path::Path;

/// Word to pronunciations lookup.
#[derive(Clone, Debug, Default)]
pub struct PronunciationDictionary {
    entries: HashMap<String, Vec<Vec<String>>>,
    case_sensitive: bool,
}

impl PronunciationDictionary {
    /// Load a dictionary file.
    pub fn from_file(path: impl AsRef<Path>, case_sensitive: bool) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let dictionary = Self::parse(&text, case_sensitive).map_err(|line| {
            EngineInitError::MalformedDictionary {
                path: path.to_path_buf(),
                line,
            }
        })?;

        tracing::debug!(
            path = %path.display(),
            words = dictionary.len(),
            "loaded pronunciation dictionary"
        );

        Ok(dictionary)
    }

    /// Parse dictionary text. The error is the 1-based line number of the
    /// first malformed entry.
    pub fn parse(text: &str, case_sensitive: bool) -> std::result::Result<Self, usize> {
        let mut dictionary = Self {
            entries: HashMap::new(),
            case_sensitive,
        };

        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(head) = fields.next() else {
                continue;
            };
            let phones: Vec<String> = fields.map(str::to_string).collect();
            if phones.is_empty() {
                return Err(i + 1);
            }

            let key = dictionary.key(strip_variant(head));
            dictionary.entries.entry(key).or_default().push(phones);
        }

        Ok(dictionary)
    }

    /// Whether the word is known. Sentinel and filler words always are.
    pub fn contains(&self, word: &str) -> bool {
        matches!(word, UTTERANCE_START | UTTERANCE_END | WORD_SILENCE)
            || self.entries.contains_key(&self.key(word))
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key(&self, word: &str) -> String {
        if self.case_sensitive {
            word.to_string()
        } else {
            word.to_lowercase()
        }
    }
}

/// `word(2)` -> `word`
fn strip_variant(word: &str) -> &str {
    match word.strip_suffix(')').and_then(|w| w.rsplit_once('(')) {
        Some((base, n)) if !base.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => base,
        _ => word,
    }
}
