//! Diarization Binder (C5): assigns a stable global speaker ID to each sentence
//! in a chunk by maximum temporal overlap with detected speaker turns.

use crate::asr::worker::ChunkSpeakerBinder;
use crate::diarization::engine::{DiarizationEngine, EmbeddingModel};
use crate::diarization::registry::SpeakerRegistry;
use crate::segmenter::Sentence;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

const MIN_TURN_DURATION_S: f32 = 0.1;

pub struct DiarizationBinder {
    diarizer: Arc<dyn DiarizationEngine>,
    embedder: Arc<dyn EmbeddingModel>,
    registry: Arc<SpeakerRegistry>,
}

impl DiarizationBinder {
    pub fn new(
        diarizer: Arc<dyn DiarizationEngine>,
        embedder: Arc<dyn EmbeddingModel>,
        registry: Arc<SpeakerRegistry>,
    ) -> Self {
        Self { diarizer, embedder, registry }
    }
}

impl ChunkSpeakerBinder for DiarizationBinder {
    fn bind(&self, chunk: &[f32], sample_rate: u32, _time_offset: f32, sentences: &mut [Sentence]) {
        if sentences.is_empty() {
            return;
        }

        let turns = match self.diarizer.diarize(chunk, sample_rate) {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "diarization failed for chunk, leaving speakers unassigned");
                return;
            }
        };
        if turns.is_empty() {
            return;
        }

        // One representative turn per distinct local label, mapped to a global ID.
        let mut label_to_global: HashMap<String, String> = HashMap::new();
        for turn in &turns {
            if label_to_global.contains_key(&turn.local_label) {
                continue;
            }
            if turn.end_s - turn.start_s < MIN_TURN_DURATION_S {
                continue;
            }
            let start_sample = (turn.start_s * sample_rate as f32) as usize;
            let end_sample = ((turn.end_s * sample_rate as f32) as usize).min(chunk.len());
            if start_sample >= end_sample {
                continue;
            }
            let slice = &chunk[start_sample..end_sample];
            match self.embedder.embed(slice, sample_rate) {
                Ok(embedding) => {
                    let global_id = self.registry.match_or_create(&embedding);
                    label_to_global.insert(turn.local_label.clone(), global_id);
                }
                Err(e) => {
                    warn!(error = %e, label = %turn.local_label, "embedding failed for turn, label dropped");
                }
            }
        }

        for sentence in sentences.iter_mut() {
            let mut best: Option<(&str, f32)> = None;
            for turn in &turns {
                let global_id = match label_to_global.get(&turn.local_label) {
                    Some(id) => id,
                    None => continue,
                };
                let overlap = overlap_seconds(sentence.start_s, sentence.end_s, turn.start_s, turn.end_s);
                if overlap <= 0.0 {
                    continue;
                }
                match best {
                    Some((_, best_overlap)) if best_overlap >= overlap => {}
                    _ => best = Some((global_id.as_str(), overlap)),
                }
            }
            sentence.speaker = best.map(|(id, _)| id.to_string());
        }
    }
}

fn overlap_seconds(a_start: f32, a_end: f32, b_start: f32, b_end: f32) -> f32 {
    (a_end.min(b_end) - a_start.max(b_start)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diarization::types::{DiarizationError, SpeakerEmbedding, SpeakerTurn};

    struct StubDiarizer {
        turns: Vec<SpeakerTurn>,
    }
    impl DiarizationEngine for StubDiarizer {
        fn diarize(&self, _waveform: &[f32], _sample_rate: u32) -> Result<Vec<SpeakerTurn>, DiarizationError> {
            Ok(self.turns.clone())
        }
    }

    struct StubEmbedder;
    impl EmbeddingModel for StubEmbedder {
        fn embed(&self, waveform: &[f32], _sample_rate: u32) -> Result<SpeakerEmbedding, DiarizationError> {
            if waveform.len() < 1600 {
                return Err(DiarizationError::InsufficientAudio);
            }
            Ok(SpeakerEmbedding { vector: vec![1.0, 0.0] })
        }
    }

    #[test]
    fn assigns_global_speaker_by_max_overlap() {
        let diarizer: Arc<dyn DiarizationEngine> = Arc::new(StubDiarizer {
            turns: vec![SpeakerTurn { start_s: 0.0, end_s: 2.0, local_label: "spk0".into() }],
        });
        let embedder: Arc<dyn EmbeddingModel> = Arc::new(StubEmbedder);
        let registry = Arc::new(SpeakerRegistry::new());
        let binder = DiarizationBinder::new(diarizer, embedder, registry);

        let chunk = vec![0.1f32; 16000 * 3];
        let mut sentences = vec![Sentence { start_s: 0.5, end_s: 1.5, text: "hi".into(), speaker: None }];
        binder.bind(&chunk, 16000, 0.0, &mut sentences);
        assert_eq!(sentences[0].speaker.as_deref(), Some("SPEAKER_1"));
    }

    #[test]
    fn no_overlap_leaves_speaker_unassigned() {
        let diarizer: Arc<dyn DiarizationEngine> = Arc::new(StubDiarizer {
            turns: vec![SpeakerTurn { start_s: 5.0, end_s: 6.0, local_label: "spk0".into() }],
        });
        let embedder: Arc<dyn EmbeddingModel> = Arc::new(StubEmbedder);
        let registry = Arc::new(SpeakerRegistry::new());
        let binder = DiarizationBinder::new(diarizer, embedder, registry);

        let chunk = vec![0.1f32; 16000 * 3];
        let mut sentences = vec![Sentence { start_s: 0.0, end_s: 1.0, text: "hi".into(), speaker: None }];
        binder.bind(&chunk, 16000, 0.0, &mut sentences);
        assert_eq!(sentences[0].speaker, None);
    }
}
