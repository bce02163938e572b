//! `GET /health` surface test (§4.8.1) — no model weights required since the
//! ASR engine handle is stubbed.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use livescribe::asr::types::AsrError;
use livescribe::asr::AsrEngine;
use livescribe::config::Config;
use livescribe::facade::{router, AppState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

struct StubEngine;
impl AsrEngine for StubEngine {
    fn recognize(&self, _samples: &[i16]) -> Result<(Vec<String>, Vec<f32>), AsrError> {
        Ok((Vec::new(), Vec::new()))
    }
}

fn test_config() -> Config {
    Config {
        bind_addr: "127.0.0.1".into(),
        bind_port: 0,
        default_llm_url: "http://unused.invalid".into(),
        hf_token: None,
        chunk_seconds: 5.0,
        sample_rate: 16000,
        whisper_model: "unused.bin".into(),
        diarization_model: None,
        embedding_model: None,
    }
}

#[tokio::test]
async fn health_reflects_model_ready_flag() {
    let model_ready = Arc::new(AtomicBool::new(false));
    let state = AppState {
        asr_engine: Arc::new(StubEngine),
        diarization: None,
        config: Arc::new(test_config()),
        model_ready: model_ready.clone(),
    };
    let app = router(state);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["model_ready"], false);

    model_ready.store(true, Ordering::Relaxed);
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["model_ready"], true);
}
