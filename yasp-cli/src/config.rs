//! Configuration resolved from CLI arguments.
//!
//! The Config struct and its TryFrom implementation live here; the clap
//! argument struct stays in cli.rs.

use crate::cli::Cli;
use eyre::{Result, ensure};
use std::path::PathBuf;
use yasp_core::engine::EngineConfig;
use yasp_core::interpret::Request;

/// Extension of the recorded decode that sits next to the audio file.
pub const RECORDING_EXTENSION: &str = "decode.json";

/// Resolved configuration for one interpretation run.
#[derive(Debug)]
pub struct Config {
    pub request: Request,
    pub engine: EngineConfig,
    pub recording: PathBuf,
}

impl TryFrom<Cli> for Config {
    type Error = eyre::Error;

    fn try_from(cli: Cli) -> Result<Self> {
        if let Some(output) = &cli.output {
            ensure!(
                *output != cli.audio,
                "output path would overwrite the audio file: {}",
                output.display()
            );
        }

        let engine = match cli.modeldir {
            Some(dir) => EngineConfig::from_model_dir(dir),
            None => EngineConfig::default(),
        };

        let recording = cli
            .recording
            .unwrap_or_else(|| cli.audio.with_extension(RECORDING_EXTENSION));

        let mut request = Request::new(cli.audio).with_hypothesis_path(cli.genpath);
        request.transcript = cli.transcript;
        request.output = cli.output;

        Ok(Self {
            request,
            engine,
            recording,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    fn config(args: &[&str]) -> Result<Config> {
        let argv = std::iter::once("yasp").chain(args.iter().copied());
        Config::try_from(Cli::parse_from(argv))
    }

    #[test]
    fn defaults_recording_next_to_audio() {
        let config = config(&["-a", "clips/hello.raw"]).unwrap();

        assert_eq!(config.recording, Path::new("clips/hello.decode.json"));
        assert_eq!(config.request.audio, Path::new("clips/hello.raw"));
        assert_eq!(config.request.hypothesis_path, Path::new("generated_hypothesis"));
        assert!(config.request.transcript.is_none());
    }

    #[test]
    fn uses_model_dir_override() {
        let config = config(&["-a", "a.raw", "-m", "/models"]).unwrap();

        assert_eq!(config.engine.model_dir, Path::new("/models"));
        assert_eq!(config.engine.dictionary, Path::new("/models/en-us/cmudict-en-us.dict"));
    }

    #[test]
    fn carries_transcript_and_output() {
        let config = config(&["-a", "a.raw", "-t", "a.txt", "-o", "a.json", "-g", "hyp"]).unwrap();

        assert_eq!(config.request.transcript.as_deref(), Some(Path::new("a.txt")));
        assert_eq!(config.request.output.as_deref(), Some(Path::new("a.json")));
        assert_eq!(config.request.hypothesis_path, Path::new("hyp"));
    }

    #[test]
    fn rejects_output_over_audio() {
        assert!(config(&["-a", "a.raw", "-o", "a.raw"]).is_err());
    }
}
