//! CLI argument definitions using clap.

use clap::Parser;
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use yasp_core::decode::DEFAULT_HYPOTHESIS_PATH;

use crate::logging::DEFAULT_LOG_PATH;

#[derive(Debug, Parser)]
#[command(name = "yasp")]
#[command(about = "Time-aligned word and phoneme transcripts from speech")]
#[command(version)]
pub struct Cli {
    /// Path to input audio (raw 16kHz 16-bit mono PCM, or WAV)
    #[arg(short, long)]
    pub audio: PathBuf,

    /// Known transcript (default: synthesized from free recognition)
    #[arg(short, long)]
    pub transcript: Option<PathBuf>,

    /// Output JSON path (default: print to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Where the synthesized hypothesis transcript is written
    #[arg(short, long, default_value = DEFAULT_HYPOTHESIS_PATH)]
    pub genpath: PathBuf,

    /// Log file base path; errors go to `<logfile>_err`
    #[arg(short, long, default_value = DEFAULT_LOG_PATH)]
    pub logfile: PathBuf,

    /// Model directory (default: build-time YASP_MODELDIR or the system model dir)
    #[arg(short, long)]
    pub modeldir: Option<PathBuf>,

    /// Recorded decoder output (default: audio path with .decode.json extension)
    #[arg(short, long)]
    pub recording: Option<PathBuf>,
}

/// Execute CLI command - separated for testing.
pub fn run_cli(cli: Cli) -> Result<()> {
    tracing::debug!(?cli, "parsed arguments");

    let audio = cli.audio.clone();

    crate::run::execute(cli.try_into()?)
        .inspect_err(|e| tracing::error!(audio = %audio.display(), error = %e, "interpretation failed"))
        .wrap_err_with(|| format!("failed to interpret audio file: {}", audio.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use std::path::Path;

    #[test]
    fn parses_audio_only() {
        let cli = Cli::parse_from(["yasp", "-a", "clip.raw"]);

        assert_eq!(cli.audio, PathBuf::from("clip.raw"));
        assert!(cli.transcript.is_none());
        assert!(cli.output.is_none());
        assert!(cli.modeldir.is_none());
        assert!(cli.recording.is_none());
        assert_eq!(cli.genpath, PathBuf::from("generated_hypothesis"));
        assert_eq!(cli.logfile, PathBuf::from("default_log"));
    }

    #[test]
    fn parses_long_flags() {
        let cli = Cli::parse_from([
            "yasp",
            "--audio",
            "clip.raw",
            "--transcript",
            "clip.txt",
            "--output",
            "clip.json",
            "--genpath",
            "hyp.txt",
            "--logfile",
            "run_log",
            "--modeldir",
            "/models",
            "--recording",
            "clip.rec.json",
        ]);

        assert_eq!(cli.transcript.as_deref(), Some(Path::new("clip.txt")));
        assert_eq!(cli.output.as_deref(), Some(Path::new("clip.json")));
        assert_eq!(cli.genpath, PathBuf::from("hyp.txt"));
        assert_eq!(cli.logfile, PathBuf::from("run_log"));
        assert_eq!(cli.modeldir.as_deref(), Some(Path::new("/models")));
        assert_eq!(cli.recording.as_deref(), Some(Path::new("clip.rec.json")));
    }

    #[test]
    fn parses_short_flags() {
        let cli = Cli::parse_from([
            "yasp", "-a", "clip.raw", "-t", "clip.txt", "-o", "out.json", "-g", "hyp", "-l", "log",
            "-m", "/models", "-r", "rec.json",
        ]);

        assert_eq!(cli.output.as_deref(), Some(Path::new("out.json")));
        assert_eq!(cli.modeldir.as_deref(), Some(Path::new("/models")));
    }

    #[test]
    fn rejects_missing_audio() {
        let err = Cli::try_parse_from(["yasp", "-t", "clip.txt"]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_unknown_flag() {
        let err = Cli::try_parse_from(["yasp", "-a", "clip.raw", "--verbose"]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
