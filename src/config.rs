//! Process configuration surface: environment variables with CLI flag
//! overrides, loaded once at process start and immutable thereafter.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "livescribe-server")]
pub struct Args {
    #[arg(long, env = "LIVESCRIBE_BIND_ADDR", default_value = "127.0.0.1")]
    pub bind_address: String,

    #[arg(long, env = "LIVESCRIBE_BIND_PORT", default_value_t = 8765)]
    pub bind_port: u16,

    #[arg(long, env = "LIVESCRIBE_LLM_URL", default_value = "http://localhost:1234/v1")]
    pub llm_url: String,

    #[arg(long, env = "LIVESCRIBE_WHISPER_MODEL")]
    pub whisper_model: String,

    #[arg(long, env = "LIVESCRIBE_DIARIZATION_MODEL")]
    pub diarization_model: Option<String>,

    #[arg(long, env = "LIVESCRIBE_EMBEDDING_MODEL")]
    pub embedding_model: Option<String>,

    #[arg(long, env = "HF_TOKEN")]
    pub hf_token: Option<String>,

    #[arg(long, env = "LIVESCRIBE_CHUNK_SECONDS", default_value_t = 5.0)]
    pub chunk_seconds: f32,
}

/// Immutable process configuration, derived once from `Args`.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub default_llm_url: String,
    pub hf_token: Option<String>,
    pub chunk_seconds: f32,
    pub sample_rate: u32,
    pub whisper_model: String,
    pub diarization_model: Option<String>,
    pub embedding_model: Option<String>,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        Self {
            bind_addr: args.bind_address,
            bind_port: args.bind_port,
            default_llm_url: args.llm_url,
            hf_token: args.hf_token,
            chunk_seconds: args.chunk_seconds,
            sample_rate: crate::asr::worker::SAMPLE_RATE,
            whisper_model: args.whisper_model,
            diarization_model: args.diarization_model,
            embedding_model: args.embedding_model,
        }
    }

    /// Diarization is enabled for a session exactly when an HF token is
    /// configured and non-empty.
    pub fn diarization_enabled(&self) -> bool {
        self.hf_token.as_ref().is_some_and(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diarization_disabled_without_token() {
        let config = Config {
            bind_addr: "127.0.0.1".into(),
            bind_port: 8765,
            default_llm_url: "http://x".into(),
            hf_token: None,
            chunk_seconds: 5.0,
            sample_rate: 16000,
            whisper_model: "model.bin".into(),
            diarization_model: None,
            embedding_model: None,
        };
        assert!(!config.diarization_enabled());
    }

    #[test]
    fn diarization_disabled_for_empty_token() {
        let mut config = Config {
            bind_addr: "127.0.0.1".into(),
            bind_port: 8765,
            default_llm_url: "http://x".into(),
            hf_token: Some(String::new()),
            chunk_seconds: 5.0,
            sample_rate: 16000,
            whisper_model: "model.bin".into(),
            diarization_model: None,
            embedding_model: None,
        };
        assert!(!config.diarization_enabled());
        config.hf_token = Some("token".into());
        assert!(config.diarization_enabled());
    }
}
