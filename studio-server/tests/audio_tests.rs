//! Synthetic audio endpoints

mod helpers;

use axum::http::{header, StatusCode};
use helpers::{test_app, ScriptedBackend};
use serde_json::json;
use std::io::Cursor;

#[tokio::test]
async fn test_beat_wav_download() {
    let app = test_app(ScriptedBackend::fixed("")).await;

    let response = app
        .post(
            "/api/audio/beat",
            json!({"genre": "house", "bpm": 124, "mood": "happy", "duration": 1.0, "channels": 2, "seed": 7}),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::CONTENT_TYPE], "audio/wav");
    let disposition = response.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("beat-house-124bpm.wav"));

    let frames = 44_100usize;
    assert_eq!(response.bytes.len(), 44 + frames * 2 * 2);

    let reader = hound::WavReader::new(Cursor::new(response.bytes.clone())).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44_100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.duration() as usize, frames);
}

#[tokio::test]
async fn test_same_seed_same_audio() {
    let app = test_app(ScriptedBackend::fixed("")).await;
    let body = json!({"genre": "trap", "bpm": 140, "mood": "dark", "duration": 0.5, "seed": 42});

    let a = app.post("/api/audio/beat", body.clone(), None).await;
    let b = app.post("/api/audio/beat", body, None).await;
    assert_eq!(a.bytes, b.bytes);
}

#[tokio::test]
async fn test_beat_preview() {
    let app = test_app(ScriptedBackend::fixed("")).await;

    let response = app
        .post(
            "/api/audio/beat/preview",
            json!({"genre": "lofi", "bpm": 80, "mood": "chill", "duration": 2.0, "channels": 1, "layers": {"pad": true}}),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.json()["data"];
    assert_eq!(data["sampleRate"], 44_100);
    assert_eq!(data["channels"], 1);
    assert_eq!(data["durationSecs"], 2.0);
    assert_eq!(data["byteLength"], 44 + 88_200 * 2);

    let waveform = data["waveform"].as_array().unwrap();
    assert!(!waveform.is_empty() && waveform.len() <= 200);
    for point in waveform {
        let peak = point["peak"].as_f64().unwrap();
        let average = point["average"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&peak));
        assert!(average <= peak + 1e-6);
    }
}

#[tokio::test]
async fn test_invalid_beat_parameters() {
    let app = test_app(ScriptedBackend::fixed("")).await;

    let slow = app
        .post("/api/audio/beat", json!({"bpm": 20, "duration": 1.0}), None)
        .await;
    assert_eq!(slow.status, StatusCode::BAD_REQUEST);
    assert!(slow.json()["errors"]["bpm"].is_string());

    let long = app
        .post("/api/audio/beat/preview", json!({"bpm": 100, "duration": 120.0}), None)
        .await;
    assert_eq!(long.status, StatusCode::BAD_REQUEST);
    assert!(long.json()["errors"]["duration"].is_string());
}

#[tokio::test]
async fn test_voice_wav() {
    let app = test_app(ScriptedBackend::fixed("")).await;

    let response = app
        .post(
            "/api/audio/voice",
            json!({"pitch": 220.0, "tone": "bright", "accent": "british", "emotion": "excited", "duration": 1.5, "seed": 3}),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers[header::CONTENT_TYPE], "audio/wav");

    let reader = hound::WavReader::new(Cursor::new(response.bytes.clone())).unwrap();
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(response.bytes.len(), 44 + 66_150 * 2);

    let out_of_range = app
        .post("/api/audio/voice", json!({"pitch": 1000.0}), None)
        .await;
    assert_eq!(out_of_range.status, StatusCode::BAD_REQUEST);
    assert!(out_of_range.json()["errors"]["pitch"].is_string());
}
