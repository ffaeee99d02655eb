//! Integration tests for the yasp CLI.

use clap::Parser;
use std::path::{Path, PathBuf};
use yasp_cli::cli::{Cli, run_cli};

const RECORDING: &str = r#"{
    "hypothesis": [
        { "word": "<s>", "start": 0, "end": 3 },
        { "word": "hello", "start": 4, "end": 30, "log_posterior": -90 },
        { "word": "<sil>", "start": 31, "end": 33 },
        { "word": "</s>", "start": 34, "end": 40 }
    ],
    "alignment": {
        "words": [
            { "word": "<s>", "start": 1, "end": 3 },
            { "word": "hello", "start": 4, "end": 30 },
            { "word": "</s>", "start": 31, "end": 40 }
        ],
        "phonemes": [
            { "phoneme": "SIL", "start": 0, "duration": 2 },
            { "phoneme": "HH", "start": 3, "duration": 5 },
            { "phoneme": "AH", "start": 9, "duration": 6 },
            { "phoneme": "L", "start": 16, "duration": 5 },
            { "phoneme": "OW", "start": 22, "duration": 6 },
            { "phoneme": "SIL", "start": 29, "duration": 10 }
        ]
    }
}"#;

fn model_dir(root: &Path) -> PathBuf {
    let dir = root.join("model");
    std::fs::create_dir_all(dir.join("en-us/en-us")).unwrap();
    std::fs::write(dir.join("en-us/en-us.lm.bin"), b"lm").unwrap();
    std::fs::write(dir.join("en-us/cmudict-en-us.dict"), "hello HH AH L OW\n").unwrap();
    dir
}

fn audio(root: &Path) -> PathBuf {
    let path = root.join("hello.raw");
    std::fs::write(&path, vec![0u8; 16000]).unwrap();
    std::fs::write(root.join("hello.decode.json"), RECORDING).unwrap();
    path
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn writes_nested_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let model = model_dir(dir.path());
    let audio = audio(dir.path());
    let output = dir.path().join("hello.json");
    let genpath = dir.path().join("generated_hypothesis");

    let cli = Cli::parse_from([
        "yasp",
        "-a",
        arg(&audio),
        "-o",
        arg(&output),
        "-g",
        arg(&genpath),
        "-m",
        arg(&model),
    ]);

    run_cli(cli).unwrap();

    assert_eq!(std::fs::read_to_string(&genpath).unwrap(), "hello");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let words = json["words"].as_array().unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0]["word"], "hello");
    assert_eq!(words[0]["start"], 4);
    assert_eq!(words[0]["duration"], 26);

    let phonemes: Vec<_> = words[0]["phonemes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (p["phoneme"].as_str().unwrap(), p["start"].as_i64().unwrap()))
        .collect();
    assert_eq!(phonemes, [("HH", 4), ("AH", 10), ("L", 17), ("OW", 23)]);
}

#[test]
fn uses_supplied_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let model = model_dir(dir.path());
    let audio = audio(dir.path());
    let transcript = dir.path().join("hello.txt");
    std::fs::write(&transcript, "hello\n").unwrap();
    let output = dir.path().join("hello.json");
    let genpath = dir.path().join("generated_hypothesis");

    let cli = Cli::parse_from([
        "yasp",
        "--audio",
        arg(&audio),
        "--transcript",
        arg(&transcript),
        "--output",
        arg(&output),
        "--genpath",
        arg(&genpath),
        "--modeldir",
        arg(&model),
    ]);

    run_cli(cli).unwrap();

    assert!(output.exists());
    assert!(!genpath.exists());
}

#[test]
fn missing_models_fail() {
    let dir = tempfile::tempdir().unwrap();
    let audio = audio(dir.path());
    let output = dir.path().join("hello.json");

    let cli = Cli::parse_from([
        "yasp",
        "-a",
        arg(&audio),
        "-o",
        arg(&output),
        "-m",
        arg(&dir.path().join("no-models")),
    ]);

    assert!(run_cli(cli).is_err());
    assert!(!output.exists());
}

#[test]
fn missing_audio_fails() {
    let dir = tempfile::tempdir().unwrap();
    let model = model_dir(dir.path());
    let audio = dir.path().join("absent.raw");
    let recording = dir.path().join("absent.decode.json");
    std::fs::write(&recording, RECORDING).unwrap();

    let cli = Cli::parse_from(["yasp", "-a", arg(&audio), "-m", arg(&model)]);

    let err = run_cli(cli).unwrap_err();
    assert!(format!("{err:?}").contains("absent.raw"), "{err:?}");
}
