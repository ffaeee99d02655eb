//! Transcript tokenizer: splits a text stream into words.

use crate::error::{Error, Result};
use std::io::{BufReader, ErrorKind, Read};

/// Token buffer capacity in bytes.
pub const MAX_WORD_BYTES: usize = 1023;

/// Parse a transcript stream into words, in file order.
///
/// The stream is scanned a byte at a time. Spaces (and tabs, carriage
/// returns, newlines) end a word; a final word without trailing whitespace
/// is still emitted.
///
/// # Errors
///
/// - [`Error::WordTooLong`] when a single word exceeds [`MAX_WORD_BYTES`]
/// - [`Error::TranscriptRead`] on a read failure or non UTF-8 word
/// - [`Error::OutOfMemory`] when the token list cannot grow
pub fn parse_transcript<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut word = Vec::with_capacity(MAX_WORD_BYTES);

    for byte in BufReader::new(reader).bytes() {
        let byte = match byte {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::TranscriptRead(e)),
        };

        if is_delimiter(byte) {
            if !word.is_empty() {
                push_word(&mut words, &mut word)?;
            }
            continue;
        }

        if word.len() >= MAX_WORD_BYTES {
            tracing::error!(limit = MAX_WORD_BYTES, "word is too large in transcript");
            return Err(Error::WordTooLong {
                limit: MAX_WORD_BYTES,
            });
        }
        word.push(byte);
    }

    if !word.is_empty() {
        push_word(&mut words, &mut word)?;
    }

    tracing::debug!(count = words.len(), "parsed transcript");

    Ok(words)
}

fn is_delimiter(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

fn push_word(words: &mut Vec<String>, word: &mut Vec<u8>) -> Result<()> {
    let text = String::from_utf8(std::mem::take(word))
        .map_err(|e| Error::TranscriptRead(std::io::Error::new(ErrorKind::InvalidData, e)))?;
    words.try_reserve(1)?;
    words.push(text);
    word.reserve(MAX_WORD_BYTES);
    Ok(())
}
