//! Speaker Registry (C4): matches diarization embeddings against stable,
//! session-scoped global speaker IDs.

use crate::diarization::types::SpeakerEmbedding;
use std::sync::Mutex;

const DEFAULT_THRESHOLD: f32 = 0.75;

struct Centroid {
    embedding: SpeakerEmbedding,
    contribution_count: u32,
}

/// Owned per-session; reset by constructing a fresh one. Never a process-global
/// singleton — concurrent sessions must not share speaker identities.
pub struct SpeakerRegistry {
    centroids: Mutex<Vec<(String, Centroid)>>,
    next_id: Mutex<u32>,
    threshold: f32,
}

impl SpeakerRegistry {
    pub fn new() -> Self {
        Self { centroids: Mutex::new(Vec::new()), next_id: Mutex::new(1), threshold: DEFAULT_THRESHOLD }
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self { centroids: Mutex::new(Vec::new()), next_id: Mutex::new(1), threshold }
    }

    /// Matches `embedding` against existing centroids; updates the best match's
    /// centroid as a running mean, or mints a fresh global ID.
    pub fn match_or_create(&self, embedding: &SpeakerEmbedding) -> String {
        let mut centroids = self.centroids.lock().unwrap();

        let best = centroids
            .iter()
            .enumerate()
            .map(|(idx, (_, c))| (idx, c.embedding.similarity(embedding)))
            .fold(None, |best: Option<(usize, f32)>, (idx, sim)| match best {
                Some((_, best_sim)) if best_sim >= sim => best,
                _ => Some((idx, sim)),
            });

        if let Some((idx, sim)) = best {
            if sim >= self.threshold {
                let (id, centroid) = &mut centroids[idx];
                let k = centroid.contribution_count as f32;
                let updated: Vec<f32> = centroid
                    .embedding
                    .vector
                    .iter()
                    .zip(embedding.vector.iter())
                    .map(|(old, new)| (old * k + new) / (k + 1.0))
                    .collect();
                centroid.embedding = SpeakerEmbedding { vector: updated };
                centroid.contribution_count += 1;
                return id.clone();
            }
        }

        let mut next_id = self.next_id.lock().unwrap();
        let id = format!("SPEAKER_{}", *next_id);
        *next_id += 1;
        centroids.push((
            id.clone(),
            Centroid { embedding: embedding.clone(), contribution_count: 1 },
        ));
        id
    }

    pub fn speaker_count(&self) -> usize {
        self.centroids.lock().unwrap().len()
    }
}

impl Default for SpeakerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
