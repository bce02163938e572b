//! CLI entry point: loads configuration, constructs the engine handles, and
//! serves the streaming facade.

use anyhow::{Context, Result};
use clap::Parser;
use livescribe::asr::whisper_engine::{WhisperAsrEngine, WhisperConfig};
use livescribe::asr::AsrEngine;
use livescribe::config::{Args, Config};
use livescribe::diarization::engine::{build_environment, OnnxDiarizationEngine, OnnxEmbeddingModel};
use livescribe::diarization::{DiarizationEngine, EmbeddingModel};
use livescribe::facade::{router, AppState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let config = Arc::new(Config::from_args(args));

    let model_ready = Arc::new(AtomicBool::new(false));

    info!(model = %config.whisper_model, "loading whisper model");
    let asr_engine: Arc<dyn AsrEngine> = Arc::new(
        WhisperAsrEngine::load(WhisperConfig { model_path: config.whisper_model.clone(), ..Default::default() })
            .context("failed to load whisper model")?,
    );
    model_ready.store(true, Ordering::Relaxed);

    let diarization = if config.diarization_enabled() {
        match (&config.diarization_model, &config.embedding_model) {
            (Some(diarization_path), Some(embedding_path)) => {
                let environment = build_environment().context("failed to build ONNX runtime environment")?;
                let diarizer: Arc<dyn DiarizationEngine> =
                    Arc::new(OnnxDiarizationEngine::load(&environment, diarization_path).context("failed to load diarization model")?);
                let embedder: Arc<dyn EmbeddingModel> = Arc::new(
                    OnnxEmbeddingModel::load(&environment, embedding_path, 256).context("failed to load embedding model")?,
                );
                Some((diarizer, embedder))
            }
            _ => {
                tracing::warn!("HF_TOKEN set but diarization/embedding model paths missing, running without diarization");
                None
            }
        }
    } else {
        None
    };

    let state = AppState { asr_engine, diarization, config: config.clone(), model_ready };
    let app = router(state);

    let addr = format!("{}:{}", config.bind_addr, config.bind_port);
    info!(%addr, "starting livescribe server");
    let listener = tokio::net::TcpListener::bind(&addr).await.context("failed to bind listener")?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
