//! Decoder configuration resolved from a model directory.

use crate::error::{EngineInitError, Result};
use std::path::{Path, PathBuf};

/// Model directory used when none is configured.
pub const DEFAULT_MODEL_DIR: &str = match option_env!("YASP_MODELDIR") {
    Some(dir) => dir,
    None => "/usr/local/share/pocketsphinx/model",
};

/// Acoustic model directory, relative to the model directory.
pub const ACOUSTIC_MODEL: &str = "en-us/en-us";
/// Language model file, relative to the model directory.
pub const LANGUAGE_MODEL: &str = "en-us/en-us.lm.bin";
/// Pronunciation dictionary, relative to the model directory.
pub const DICTIONARY: &str = "en-us/cmudict-en-us.dict";

/// Decoder construction parameters.
///
/// Built explicitly and handed to the engine; there is no process-wide
/// model directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub model_dir: PathBuf,
    pub acoustic_model: PathBuf,
    pub language_model: PathBuf,
    pub dictionary: PathBuf,
    /// Dictionary lookups respect case
    pub dictionary_case_sensitive: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_model_dir(DEFAULT_MODEL_DIR)
    }
}

impl EngineConfig {
    /// Resolve model file locations under `model_dir`.
    pub fn from_model_dir(model_dir: impl AsRef<Path>) -> Self {
        let model_dir = model_dir.as_ref().to_path_buf();

        Self {
            acoustic_model: model_dir.join(ACOUSTIC_MODEL),
            language_model: model_dir.join(LANGUAGE_MODEL),
            dictionary: model_dir.join(DICTIONARY),
            model_dir,
            dictionary_case_sensitive: true,
        }
    }

    /// Check that every model file is present.
    pub fn validate(&self) -> Result<()> {
        if !self.acoustic_model.is_dir() {
            return Err(EngineInitError::MissingAcousticModel(self.acoustic_model.clone()).into());
        }
        if !self.language_model.is_file() {
            return Err(EngineInitError::MissingLanguageModel(self.language_model.clone()).into());
        }
        if !self.dictionary.is_file() {
            return Err(EngineInitError::MissingDictionary(self.dictionary.clone()).into());
        }

        tracing::debug!(model_dir = %self.model_dir.display(), "engine config validated");

        Ok(())
    }
}
