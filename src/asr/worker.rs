//! Rolling ASR Worker (C3): accumulates streamed audio into fixed-size chunks,
//! transcribes each, and carries partial sentences across chunk seams.
//!
//! Runs on a dedicated OS thread per session, mirroring the blocking
//! `asr_worker` loop it is grounded on rather than a cooperative async task —
//! whisper.cpp inference blocks the calling thread for the duration of a call.

use crate::asr::engine::AsrEngine;
use crate::audio::normalizer::float_to_int16;
use crate::segmenter::{self, Sentence};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const SAMPLE_RATE: u32 = 16000;

/// One chunk of streamed audio, or a poison value signalling end-of-stream.
pub type AudioTask = Option<Vec<f32>>;

/// A chunk transcription result pushed to the orchestrator.
#[derive(Debug, Clone)]
pub struct AsrChunkResult {
    pub sentences: Vec<Sentence>,
    pub text: String,
    pub is_final: bool,
}

/// Attaches speaker IDs to the sentences produced from one chunk (C4 + C5).
/// Implemented by the diarization binder when enabled, or a no-op otherwise.
pub trait ChunkSpeakerBinder: Send + Sync {
    fn bind(&self, chunk: &[f32], sample_rate: u32, time_offset: f32, sentences: &mut [Sentence]);
}

pub struct NoOpBinder;
impl ChunkSpeakerBinder for NoOpBinder {
    fn bind(&self, _chunk: &[f32], _sample_rate: u32, _time_offset: f32, _sentences: &mut [Sentence]) {}
}

/// Spawns the worker thread. Returns the `JoinHandle`; the caller is responsible
/// for publishing the poison value on `audio_rx`'s sender and joining with a bound.
pub fn spawn(
    engine: Arc<dyn AsrEngine>,
    binder: Arc<dyn ChunkSpeakerBinder>,
    audio_rx: Receiver<AudioTask>,
    result_tx: Sender<AsrChunkResult>,
    stop: Arc<AtomicBool>,
    chunk_seconds: f32,
) -> JoinHandle<()> {
    std::thread::spawn(move || run(engine, binder, audio_rx, result_tx, stop, chunk_seconds))
}

fn run(
    engine: Arc<dyn AsrEngine>,
    binder: Arc<dyn ChunkSpeakerBinder>,
    audio_rx: Receiver<AudioTask>,
    result_tx: Sender<AsrChunkResult>,
    stop: Arc<AtomicBool>,
    chunk_seconds: f32,
) {
    let chunk_size = (chunk_seconds * SAMPLE_RATE as f32) as usize;
    let flush_min = SAMPLE_RATE as usize / 2;

    let mut buffer: Vec<f32> = Vec::new();
    let mut time_offset: f32 = 0.0;

    'outer: loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }

        match audio_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(None) => {
                flush(&engine, &binder, &buffer, time_offset, &result_tx, flush_min);
                break 'outer;
            }
            Ok(Some(samples)) => buffer.extend(samples),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                flush(&engine, &binder, &buffer, time_offset, &result_tx, flush_min);
                break 'outer;
            }
        }

        // Drain whatever else is immediately available without blocking.
        while let Ok(task) = audio_rx.try_recv() {
            match task {
                None => {
                    flush(&engine, &binder, &buffer, time_offset, &result_tx, flush_min);
                    break 'outer;
                }
                Some(samples) => buffer.extend(samples),
            }
        }

        if buffer.len() < chunk_size {
            continue;
        }

        let chunk: Vec<f32> = buffer.drain(..chunk_size).collect();
        let int16 = float_to_int16(&chunk);

        let recognition = match engine.recognize(&int16) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "ASR recognition failed on chunk, dropping");
                time_offset += chunk_seconds;
                continue;
            }
        };
        let (tokens, local_timestamps) = recognition;

        let mut sentences = segmenter::segment(&tokens, &local_timestamps);
        let full_text = tokens.join("");

        binder.bind(&chunk, SAMPLE_RATE, time_offset, &mut sentences);

        for s in sentences.iter_mut() {
            s.start_s += time_offset;
            s.end_s += time_offset;
        }

        if let Some(last) = sentences.last() {
            let last_end_local = last.end_s - time_offset;
            let carry = (last_end_local * SAMPLE_RATE as f32).round() as usize;
            let carry = carry.min(chunk.len());
            let mut rebuilt = chunk[carry..].to_vec();
            rebuilt.extend(buffer.drain(..));
            buffer = rebuilt;
            time_offset += last_end_local;
        } else {
            time_offset += chunk_seconds;
        }

        debug!(sentences = sentences.len(), time_offset, "chunk processed");

        if result_tx
            .send(AsrChunkResult { sentences, text: full_text, is_final: false })
            .is_err()
        {
            break;
        }
    }

    info!("ASR worker exiting");
}

fn flush(
    engine: &Arc<dyn AsrEngine>,
    binder: &Arc<dyn ChunkSpeakerBinder>,
    buffer: &[f32],
    time_offset: f32,
    result_tx: &Sender<AsrChunkResult>,
    flush_min: usize,
) {
    if buffer.len() < flush_min {
        return;
    }

    let int16 = float_to_int16(buffer);
    let recognition = match engine.recognize(&int16) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "ASR recognition failed on flush");
            return;
        }
    };
    let (tokens, local_timestamps) = recognition;
    let mut sentences = segmenter::segment(&tokens, &local_timestamps);
    let full_text = tokens.join("");

    binder.bind(buffer, SAMPLE_RATE, time_offset, &mut sentences);
    for s in sentences.iter_mut() {
        s.start_s += time_offset;
        s.end_s += time_offset;
    }

    let _ = result_tx.send(AsrChunkResult { sentences, text: full_text, is_final: true });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asr::types::AsrError;
    use std::sync::mpsc::channel;

    struct StubEngine {
        tokens: Vec<String>,
        timestamps: Vec<f32>,
    }
    impl AsrEngine for StubEngine {
        fn recognize(&self, _samples: &[i16]) -> Result<(Vec<String>, Vec<f32>), AsrError> {
            Ok((self.tokens.clone(), self.timestamps.clone()))
        }
    }

    #[test]
    fn carry_over_rewinds_to_last_sentence_boundary() {
        let engine: Arc<dyn AsrEngine> = Arc::new(StubEngine {
            tokens: ["Hello", " world", "."].iter().map(|s| s.to_string()).collect(),
            timestamps: vec![0.0, 1.0, 2.0],
        });
        let binder: Arc<dyn ChunkSpeakerBinder> = Arc::new(NoOpBinder);
        let (audio_tx, audio_rx) = channel();
        let (result_tx, result_rx) = channel();
        let stop = Arc::new(AtomicBool::new(false));

        let chunk_seconds = 2.5;
        let chunk_samples = (chunk_seconds * SAMPLE_RATE as f32) as usize;
        audio_tx.send(Some(vec![0.0; chunk_samples])).unwrap();
        audio_tx.send(None).unwrap();

        run(engine, binder, audio_rx, result_tx, stop, chunk_seconds);

        let result = result_rx.recv().unwrap();
        assert_eq!(result.sentences.len(), 1);
        assert_eq!(result.sentences[0].end_s, 2.0);
    }

    #[test]
    fn no_sentences_advances_by_full_chunk() {
        let engine: Arc<dyn AsrEngine> = Arc::new(StubEngine { tokens: vec![], timestamps: vec![] });
        let binder: Arc<dyn ChunkSpeakerBinder> = Arc::new(NoOpBinder);
        let (audio_tx, audio_rx) = channel();
        let (result_tx, _result_rx) = channel();
        let stop = Arc::new(AtomicBool::new(false));

        let chunk_seconds = 1.0;
        let chunk_samples = (chunk_seconds * SAMPLE_RATE as f32) as usize;
        audio_tx.send(Some(vec![0.0; chunk_samples * 2])).unwrap();
        audio_tx.send(None).unwrap();

        run(engine, binder, audio_rx, result_tx, stop, chunk_seconds);
    }
}
