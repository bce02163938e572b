//! Audio normalisation: resampling to 16 kHz mono and int16 conversion for ASR input.

use crate::audio::types::{AudioError, AudioFrame};
use tracing::debug;

pub const TARGET_SAMPLE_RATE: u32 = 16000;

/// Averages interleaved multi-channel samples down to mono.
pub fn to_mono(frame: &AudioFrame) -> Result<AudioFrame, AudioError> {
    if frame.channels == 0 {
        return Err(AudioError::InvalidChannelCount(frame.channels));
    }
    if frame.channels == 1 {
        return Ok(frame.clone());
    }

    let channels = frame.channels as usize;
    let output_len = frame.samples.len() / channels;
    let mut mono = Vec::with_capacity(output_len);
    for i in 0..output_len {
        let mut sum = 0.0f32;
        for ch in 0..channels {
            sum += frame.samples[i * channels + ch];
        }
        mono.push(sum / channels as f32);
    }

    Ok(AudioFrame {
        samples: mono,
        sample_rate: frame.sample_rate,
        channels: 1,
    })
}

/// Resamples mono audio to `TARGET_SAMPLE_RATE` by linear interpolation.
///
/// `round(len * 16000 / from_sr)` output samples, matching the source resampler's ratio exactly.
pub fn resample_to_16k(frame: &AudioFrame) -> Result<AudioFrame, AudioError> {
    if frame.sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate(frame.sample_rate));
    }
    if frame.channels != 1 {
        return Err(AudioError::InvalidChannelCount(frame.channels));
    }
    if frame.sample_rate == TARGET_SAMPLE_RATE {
        return Ok(frame.clone());
    }

    let samples = &frame.samples;
    if samples.is_empty() {
        return Ok(AudioFrame {
            samples: Vec::new(),
            sample_rate: TARGET_SAMPLE_RATE,
            channels: 1,
        });
    }

    let ratio = TARGET_SAMPLE_RATE as f64 / frame.sample_rate as f64;
    let input_len = samples.len();
    let output_len = (input_len as f64 * ratio).round() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let input_index = i as f64 / ratio;
        let floor_idx = input_index.floor() as usize;
        let ceil_idx = (input_index.ceil() as usize).min(input_len - 1);

        if floor_idx == ceil_idx {
            output.push(samples[floor_idx.min(input_len - 1)]);
        } else {
            let fraction = (input_index - floor_idx as f64) as f32;
            let low = samples[floor_idx];
            let high = samples[ceil_idx];
            output.push(low + (high - low) * fraction);
        }
    }

    debug!(
        "resampled {} -> {} samples ({} Hz -> {} Hz)",
        input_len,
        output.len(),
        frame.sample_rate,
        TARGET_SAMPLE_RATE
    );

    Ok(AudioFrame {
        samples: output,
        sample_rate: TARGET_SAMPLE_RATE,
        channels: 1,
    })
}

/// Normalises an arbitrary-rate frame to mono 16 kHz float32.
pub fn normalize(frame: &AudioFrame) -> Result<AudioFrame, AudioError> {
    let mono = to_mono(frame)?;
    resample_to_16k(&mono)
}

/// Peak-normalises and converts a float32 buffer to saturating int16, as the ASR engine expects.
pub fn float_to_int16(samples: &[f32]) -> Vec<i16> {
    let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    if peak == 0.0 {
        return vec![0; samples.len()];
    }
    samples
        .iter()
        .map(|&s| ((s / peak) * 32767.0).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16)
        .collect()
}
