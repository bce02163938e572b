//! Production `AsrEngine` adapter over whisper.cpp (via `whisper-rs`).

use crate::asr::engine::AsrEngine;
use crate::asr::types::{AsrError, Device, ModelTier};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Configuration for the whisper.cpp-backed engine.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    pub model_path: String,
    pub tier: ModelTier,
    pub device: Device,
    pub num_threads: i32,
    pub language: Option<String>,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model_path: String::new(),
            tier: ModelTier::Standard,
            device: Device::Auto,
            num_threads: 4,
            language: Some("en".to_string()),
        }
    }
}

/// Wraps a loaded whisper.cpp context behind the `AsrEngine` contract.
///
/// Construction (model load) happens once at process start; the context is then
/// shared across sessions behind an `Arc`. `whisper_rs::WhisperState` is not
/// `Sync`, so calls into it are serialised behind a mutex — acceptable since only
/// one ASR worker thread calls `recognize` at a time per session, and sessions
/// rarely overlap heavily on a single process.
pub struct WhisperAsrEngine {
    context: WhisperContext,
    params_template: Mutex<()>,
    config: WhisperConfig,
}

impl WhisperAsrEngine {
    pub fn load(config: WhisperConfig) -> Result<Self, AsrError> {
        if !Path::new(&config.model_path).exists() {
            return Err(AsrError::ModelNotFound { path: config.model_path.clone() });
        }

        info!(model = %config.model_path, tier = ?config.tier, "loading whisper model");

        let mut ctx_params = WhisperContextParameters::default();
        ctx_params.use_gpu(matches!(config.device, Device::Metal | Device::Auto));

        let context = WhisperContext::new_with_params(&config.model_path, ctx_params)
            .map_err(|e| AsrError::ModelLoadFailed { message: e.to_string() })?;

        Ok(Self { context, params_template: Mutex::new(()), config })
    }

    fn build_params(&self) -> FullParams<'_, '_> {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.config.num_threads);
        params.set_token_timestamps(true);
        params.set_print_progress(false);
        params.set_print_special(false);
        params.set_print_realtime(false);
        if let Some(lang) = &self.config.language {
            params.set_language(Some(lang.as_str()));
        }
        params
    }
}

impl AsrEngine for WhisperAsrEngine {
    fn recognize(&self, samples: &[i16]) -> Result<(Vec<String>, Vec<f32>), AsrError> {
        if samples.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let float_samples: Vec<f32> = samples.iter().map(|&s| s as f32 / i16::MAX as f32).collect();

        let _guard = self.params_template.lock().unwrap();
        let mut state = self
            .context
            .create_state()
            .map_err(|e| AsrError::TranscriptionFailed { message: e.to_string() })?;

        let params = self.build_params();
        state
            .full(params, &float_samples)
            .map_err(|e| AsrError::TranscriptionFailed { message: e.to_string() })?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| AsrError::TranscriptionFailed { message: e.to_string() })?;

        let mut tokens = Vec::new();
        let mut timestamps = Vec::new();

        for seg_idx in 0..num_segments {
            let num_tokens = state
                .full_n_tokens(seg_idx)
                .map_err(|e| AsrError::TranscriptionFailed { message: e.to_string() })?;
            for tok_idx in 0..num_tokens {
                let text = state
                    .full_get_token_text(seg_idx, tok_idx)
                    .map_err(|e| AsrError::TranscriptionFailed { message: e.to_string() })?;
                // whisper.cpp special tokens are bracketed, e.g. "[_BEG_]" — skip them.
                if text.starts_with('[') && text.ends_with(']') {
                    continue;
                }
                let token_data = state
                    .full_get_token_data(seg_idx, tok_idx)
                    .map_err(|e| AsrError::TranscriptionFailed { message: e.to_string() })?;
                let t1_seconds = token_data.t1 as f32 / 100.0;
                tokens.push(text);
                timestamps.push(t1_seconds);
            }
        }

        debug!(tokens = tokens.len(), "whisper recognize produced tokens");
        Ok((tokens, timestamps))
    }
}
