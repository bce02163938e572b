//! End-to-end benchmark for the parts of the pipeline that don't require a
//! loaded model: normalisation, segmentation, and registry matching.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use livescribe::audio::normalizer;
use livescribe::audio::types::AudioFrame;
use livescribe::diarization::types::SpeakerEmbedding;
use livescribe::diarization::SpeakerRegistry;
use livescribe::segmenter;

fn bench_normalize(c: &mut Criterion) {
    let frame = AudioFrame { samples: vec![0.1; 48_000 * 5], sample_rate: 48_000, channels: 2 };
    c.bench_function("normalize_48k_stereo_5s", |b| {
        b.iter(|| normalizer::normalize(black_box(&frame)).unwrap())
    });
}

fn bench_segment(c: &mut Criterion) {
    let tokens: Vec<String> = (0..500)
        .map(|i| if i % 10 == 9 { ".".to_string() } else { format!("word{}", i) })
        .collect();
    let timestamps: Vec<f32> = (0..500).map(|i| i as f32 * 0.1).collect();
    c.bench_function("segment_500_tokens", |b| {
        b.iter(|| segmenter::segment(black_box(&tokens), black_box(&timestamps)))
    });
}

fn bench_registry_match(c: &mut Criterion) {
    let registry = SpeakerRegistry::new();
    for i in 0..20 {
        registry.match_or_create(&SpeakerEmbedding { vector: vec![i as f32, 0.0, 0.0] });
    }
    let probe = SpeakerEmbedding { vector: vec![5.0, 0.0, 0.0] };
    c.bench_function("registry_match_against_20_centroids", |b| {
        b.iter(|| registry.match_or_create(black_box(&probe)))
    });
}

criterion_group!(benches, bench_normalize, bench_segment, bench_registry_match);
criterion_main!(benches);
