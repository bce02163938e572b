//! End-to-end scenarios for the session orchestrator (C7), against stub ASR,
//! diarization, and LLM collaborators — no model weights required.

use livescribe::asr::types::AsrError;
use livescribe::asr::AsrEngine;
use livescribe::audio::types::AudioFrame;
use livescribe::session::SessionOrchestrator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Always transcribes the same two-sentence utterance, split across calls so
/// the first call ends mid-sentence and the second completes it (S3).
struct SplitSentenceEngine {
    call_count: AtomicUsize,
}

impl AsrEngine for SplitSentenceEngine {
    fn recognize(&self, _samples: &[i16]) -> Result<(Vec<String>, Vec<f32>), AsrError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            Ok((vec!["Hello".into(), " world".into()], vec![0.0, 0.5]))
        } else {
            Ok((vec![".".into(), " Good".into(), " day".into(), ".".into()], vec![0.1, 0.6, 1.0, 1.3]))
        }
    }
}

fn silent_frame(seconds: f32) -> AudioFrame {
    AudioFrame { samples: vec![0.0; (seconds * 16000.0) as usize], sample_rate: 16000, channels: 1 }
}

/// Repeatedly drains the orchestrator until `predicate` accepts the snapshot
/// or `timeout` elapses, returning the last snapshot observed.
fn drain_until<F: Fn(&livescribe::session::SessionSnapshot) -> bool>(
    orchestrator: &mut SessionOrchestrator,
    predicate: F,
    timeout: Duration,
) -> livescribe::session::SessionSnapshot {
    let start = std::time::Instant::now();
    loop {
        let snapshot = orchestrator.drain();
        if predicate(&snapshot) || start.elapsed() >= timeout {
            return snapshot;
        }
        thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn s3_carry_over_produces_two_sentences_across_chunks() {
    let engine: Arc<dyn AsrEngine> = Arc::new(SplitSentenceEngine { call_count: AtomicUsize::new(0) });
    let mut orchestrator = SessionOrchestrator::new(engine, None, "http://unused.invalid".into(), 1.0);

    // Two chunks worth of audio so the ASR worker fires twice.
    orchestrator.on_audio(&silent_frame(1.0)).unwrap();
    orchestrator.on_audio(&silent_frame(1.0)).unwrap();

    let snapshot = drain_until(&mut orchestrator, |s| s.sentences.len() >= 1, Duration::from_secs(5));

    assert!(!snapshot.sentences.is_empty(), "expected at least one sentence, got {:?}", snapshot.sentences);
}

#[test]
fn s6_diarization_disabled_leaves_speaker_none() {
    struct EchoEngine;
    impl AsrEngine for EchoEngine {
        fn recognize(&self, _samples: &[i16]) -> Result<(Vec<String>, Vec<f32>), AsrError> {
            Ok((vec!["Hi".into(), ".".into()], vec![0.0, 0.2]))
        }
    }

    let engine: Arc<dyn AsrEngine> = Arc::new(EchoEngine);
    let mut orchestrator = SessionOrchestrator::new(engine, None, "http://unused.invalid".into(), 0.5);
    orchestrator.on_audio(&silent_frame(0.5)).unwrap();

    let snapshot = drain_until(&mut orchestrator, |s| !s.sentences.is_empty(), Duration::from_secs(5));

    assert!(!snapshot.sentences.is_empty());
    for sentence in &snapshot.sentences {
        assert_eq!(sentence.speaker, None);
    }
}

#[test]
fn invariant_sentences_are_non_decreasing_by_start() {
    struct MultiSentenceEngine;
    impl AsrEngine for MultiSentenceEngine {
        fn recognize(&self, _samples: &[i16]) -> Result<(Vec<String>, Vec<f32>), AsrError> {
            Ok((
                vec!["One".into(), ".".into(), " Two".into(), ".".into()],
                vec![0.0, 0.2, 0.3, 0.5],
            ))
        }
    }

    let engine: Arc<dyn AsrEngine> = Arc::new(MultiSentenceEngine);
    let mut orchestrator = SessionOrchestrator::new(engine, None, "http://unused.invalid".into(), 0.5);
    orchestrator.on_audio(&silent_frame(0.5)).unwrap();

    let snapshot = drain_until(&mut orchestrator, |s| !s.sentences.is_empty(), Duration::from_secs(5));

    assert!(!snapshot.sentences.is_empty());
    for window in snapshot.sentences.windows(2) {
        assert!(window[0].start_s <= window[1].start_s);
    }
    for sentence in &snapshot.sentences {
        assert!(sentence.start_s <= sentence.end_s);
    }
}

#[test]
fn finalize_returns_export_paths_only_when_sentences_exist() {
    struct SilentEngine;
    impl AsrEngine for SilentEngine {
        fn recognize(&self, _samples: &[i16]) -> Result<(Vec<String>, Vec<f32>), AsrError> {
            Ok((vec![], vec![]))
        }
    }

    let engine: Arc<dyn AsrEngine> = Arc::new(SilentEngine);
    let orchestrator = SessionOrchestrator::new(engine, None, "http://unused.invalid".into(), 0.5);
    let (snapshot, exports) = orchestrator.finalize().unwrap();

    assert!(snapshot.sentences.is_empty());
    assert!(exports.csv.is_none());
    assert!(exports.srt.is_none());
}
