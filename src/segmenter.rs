//! Sentence segmentation: turns a token + timestamp stream into sentences split on
//! terminal punctuation.

use serde::{Deserialize, Serialize};

/// A sentence with absolute or chunk-local start/end times, depending on caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub start_s: f32,
    pub end_s: f32,
    pub text: String,
    pub speaker: Option<String>,
}

const TERMINATORS: [&str; 3] = [".", "!", "?"];

/// Walks `tokens`/`timestamps` in lockstep, closing a sentence whenever a terminator
/// token is seen. Trailing tokens with no terminator are dropped — the caller (the
/// rolling ASR worker) re-feeds them via carry-over on the next chunk.
pub fn segment(tokens: &[String], timestamps: &[f32]) -> Vec<Sentence> {
    assert_eq!(tokens.len(), timestamps.len(), "tokens and timestamps must be parallel");

    let mut sentences = Vec::new();
    let mut open_start: Option<f32> = None;
    let mut buffer = String::new();

    for (token, &ts) in tokens.iter().zip(timestamps.iter()) {
        if open_start.is_none() {
            open_start = Some(ts);
        }
        buffer.push_str(token);

        if TERMINATORS.contains(&token.trim()) {
            sentences.push(Sentence {
                start_s: open_start.unwrap(),
                end_s: ts,
                text: buffer.trim().to_string(),
                speaker: None,
            });
            buffer.clear();
            open_start = None;
        }
    }

    sentences
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::collection::vec as prop_vec;
    use proptest::prelude::*;

    // Generates a token/timestamp stream of plain words interleaved with
    // terminators at non-decreasing timestamps, mirroring what an ASR engine
    // actually emits.
    fn token_stream() -> impl Strategy<Value = (Vec<String>, Vec<f32>)> {
        prop_vec((".*", any::<bool>()), 0..20).prop_map(|words| {
            let mut tokens = Vec::new();
            let mut timestamps = Vec::new();
            let mut t = 0.0f32;
            for (word, terminate) in words {
                let word = if word.is_empty() { "w".to_string() } else { word.chars().take(4).collect() };
                tokens.push(word);
                t += 0.1;
                timestamps.push(t);
                if terminate {
                    tokens.push(".".to_string());
                    t += 0.1;
                    timestamps.push(t);
                }
            }
            (tokens, timestamps)
        })
    }

    proptest! {
        #[test]
        fn sentences_are_ordered_and_non_inverted((tokens, timestamps) in token_stream()) {
            let sentences = segment(&tokens, &timestamps);
            for window in sentences.windows(2) {
                prop_assert!(window[0].end_s <= window[1].start_s);
            }
            for s in &sentences {
                prop_assert!(s.start_s <= s.end_s);
            }
        }
    }
}
