//! Interpret one audio file and emit the nested transcript JSON.

use crate::config::Config;
use color_eyre::Section;
use eyre::{Report, Result};
use std::time::Instant;
use yasp_core::engine::RecordedEngine;
use yasp_core::error::Error;
use yasp_core::interpret::{Interpretation, interpret, interpret_to_file};

pub fn execute(config: Config) -> Result<()> {
    tracing::info!(
        audio = ?config.request.audio.display(),
        transcript = ?config.request.transcript.as_deref().map(|p| p.display()),
        output = ?config.request.output.as_deref().map(|p| p.display()),
        "interpreting speech clip"
    );

    let s = Instant::now();

    let engine = load_engine(&config)?;

    let d = s.elapsed();
    tracing::info!(duration = %format_secs(d.as_secs_f32()), "engine loaded");

    let s = Instant::now();

    let interpretation = match &config.request.output {
        Some(_) => interpret_to_file(engine, &config.request)?,
        None => {
            let interpretation = interpret(engine, &config.request)?;
            println!("{}", interpretation.transcript.to_json_string()?);
            interpretation
        }
    };

    let d = s.elapsed();
    tracing::info!(
        duration = %format_secs(d.as_secs_f32()),
        words = interpretation.transcript.words.len(),
        "interpretation completed"
    );

    report_timing(&interpretation);

    Ok(())
}

fn load_engine(config: &Config) -> Result<RecordedEngine> {
    RecordedEngine::new(&config.engine, &config.recording).map_err(|e| match e {
        Error::EngineInit(_) => Report::new(e)
            .wrap_err("failed to initialize decoding engine")
            .suggestion("pass --modeldir with a directory holding the en-us models"),
        e => Report::new(e).wrap_err(format!(
            "failed to load decode recording: {:?}",
            config.recording.display()
        )),
    })
}

fn report_timing(interpretation: &Interpretation) {
    if !interpretation.timing_reliable {
        tracing::warn!("no utterance start marker, phoneme timing may be unreliable");
    }
}

/// Format seconds as a string with two decimal places.
fn format_secs(secs: f32) -> String {
    format!("{:.2}s", secs)
}
