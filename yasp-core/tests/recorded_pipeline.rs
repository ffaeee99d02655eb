//! End-to-end runs against a recorded decode.

use std::path::{Path, PathBuf};
use yasp_core::engine::{EngineConfig, RecordedEngine};
use yasp_core::error::{EngineInitError, Error};
use yasp_core::interpret::{Request, interpret, interpret_breakdown, interpret_to_file};
use yasp_core::transcript::NestedTranscript;

const DICTIONARY: &str = "cat K AE T\nthe DH AH\nthe(2) DH IY\n";

const RECORDING: &str = r#"{
    "log_base": 1.0001,
    "hypothesis": [
        { "word": "<s>", "start": 0, "end": 2, "log_posterior": 0 },
        { "word": "cat", "start": 3, "end": 20, "log_posterior": -150,
          "ascr": -4200, "lscr": -80, "lback": 2 },
        { "word": "</s>", "start": 21, "end": 25 }
    ],
    "alignment": {
        "words": [
            { "word": "<s>", "start": 2, "end": 4 },
            { "word": "cat", "start": 5, "end": 20 },
            { "word": "</s>", "start": 21, "end": 25 }
        ],
        "phonemes": [
            { "phoneme": "SIL", "start": 0, "duration": 3, "score": -20 },
            { "phoneme": "K", "start": 3, "duration": 4, "score": -310 },
            { "phoneme": "AE", "start": 7, "duration": 5, "score": -290 },
            { "phoneme": "T", "start": 12, "duration": 4, "score": -150 },
            { "phoneme": "SIL", "start": 16, "duration": 5, "score": -40 }
        ]
    }
}"#;

struct Fixture {
    _dir: tempfile::TempDir,
    root: PathBuf,
    config: EngineConfig,
    recording: PathBuf,
    audio: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();

    let model_dir = root.join("model");
    std::fs::create_dir_all(model_dir.join("en-us/en-us")).unwrap();
    std::fs::write(model_dir.join("en-us/en-us.lm.bin"), b"lm").unwrap();
    std::fs::write(model_dir.join("en-us/cmudict-en-us.dict"), DICTIONARY).unwrap();

    let audio = root.join("clip.raw");
    // 50 frames of silence
    std::fs::write(&audio, vec![0u8; 16000]).unwrap();

    let recording = root.join("clip.decode.json");
    std::fs::write(&recording, RECORDING).unwrap();

    Fixture {
        _dir: dir,
        config: EngineConfig::from_model_dir(&model_dir),
        root,
        recording,
        audio,
    }
}

fn engine(fixture: &Fixture) -> RecordedEngine {
    RecordedEngine::new(&fixture.config, &fixture.recording).unwrap()
}

fn phonemes(transcript: &NestedTranscript) -> Vec<(&str, i32, i32)> {
    transcript.words[0]
        .phonemes
        .iter()
        .map(|p| (p.phoneme.as_str(), p.start, p.duration))
        .collect()
}

fn write(root: &Path, name: &str, contents: &str) -> PathBuf {
    let path = root.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn aligns_supplied_transcript() {
    let fixture = fixture();
    let transcript = write(&fixture.root, "clip.txt", "cat\n");
    let request = Request::new(&fixture.audio).with_transcript(transcript);

    let result = interpret(engine(&fixture), &request).unwrap();

    assert!(result.timing_reliable);
    assert_eq!(result.transcript.word_labels().collect::<Vec<_>>(), ["cat"]);
    assert_eq!(
        (result.transcript.words[0].start, result.transcript.words[0].duration),
        (5, 15)
    );
    assert_eq!(
        phonemes(&result.transcript),
        [("K", 5, 4), ("AE", 9, 5), ("T", 14, 4)]
    );
}

#[test]
fn synthesizes_hypothesis_without_transcript() {
    let fixture = fixture();
    let genpath = fixture.root.join("generated_hypothesis");
    let request = Request::new(&fixture.audio).with_hypothesis_path(&genpath);

    let result = interpret(engine(&fixture), &request).unwrap();

    assert_eq!(std::fs::read_to_string(&genpath).unwrap(), "cat");
    assert_eq!(phonemes(&result.transcript).len(), 3);
}

#[test]
fn breakdown_carries_engine_scores() {
    let fixture = fixture();
    let transcript = write(&fixture.root, "clip.txt", "cat");
    let request = Request::new(&fixture.audio).with_transcript(transcript);

    let breakdown = interpret_breakdown(engine(&fixture), &request).unwrap();

    let starts: Vec<_> = breakdown.phonemes.iter().map(|p| p.start).collect();
    assert_eq!(starts, [2, 5, 9, 14, 18]);
    let scores: Vec<_> = breakdown.phonemes.iter().map(|p| p.score).collect();
    assert_eq!(scores, [-20, -310, -290, -150, -40]);
}

#[test]
fn reads_wav_audio() {
    let fixture = fixture();
    let wav = fixture.root.join("clip.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&wav, spec).unwrap();
    for _ in 0..8000 {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
    let transcript = write(&fixture.root, "clip.txt", "cat");
    let request = Request::new(&wav).with_transcript(transcript);

    let result = interpret(engine(&fixture), &request).unwrap();

    assert_eq!(result.transcript.words.len(), 1);
}

#[test]
fn writes_json_file() {
    let fixture = fixture();
    let transcript = write(&fixture.root, "clip.txt", "cat");
    let output = fixture.root.join("clip.json");
    let request = Request::new(&fixture.audio)
        .with_transcript(transcript)
        .with_output(&output);

    interpret_to_file(engine(&fixture), &request).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["words"][0]["word"], "cat");
    assert_eq!(json["words"][0]["phonemes"][0]["phoneme"], "K");
    assert_eq!(json["words"][0]["phonemes"][0]["start"], 5);
}

#[test]
fn unknown_word_aborts_without_output() {
    let fixture = fixture();
    let transcript = write(&fixture.root, "clip.txt", "cat dog");
    let output = fixture.root.join("clip.json");
    let request = Request::new(&fixture.audio)
        .with_transcript(transcript)
        .with_output(&output);

    let err = interpret_to_file(engine(&fixture), &request).unwrap_err();

    assert!(matches!(err, Error::UnknownWord { word } if word == "dog"));
    assert!(!output.exists());
}

#[test]
fn missing_language_model_fails_init() {
    let fixture = fixture();
    std::fs::remove_file(&fixture.config.language_model).unwrap();

    let err = RecordedEngine::new(&fixture.config, &fixture.recording).unwrap_err();

    assert!(matches!(
        err,
        Error::EngineInit(EngineInitError::MissingLanguageModel(_))
    ));
}
