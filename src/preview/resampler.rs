//! Whole-clip sample rate and channel conversion.
//!
//! Clips are converted once after decoding so the output callback only
//! copies samples at the device's rate and channel count.

use rubato::{FftFixedIn, Resampler as _};

use super::PreviewError;

/// Input frames per resampler chunk
const CHUNK_SIZE: usize = 1024;

/// Resample interleaved `samples` from `from_rate` to `to_rate`.
///
/// The result is trimmed to exactly `ceil(frames * to_rate / from_rate)`
/// frames with the resampler's delay removed.
pub fn resample_clip(
    samples: &[f32],
    channels: usize,
    from_rate: u32,
    to_rate: u32,
) -> Result<Vec<f32>, PreviewError> {
    if from_rate == to_rate || samples.is_empty() || channels == 0 {
        return Ok(samples.to_vec());
    }

    let mut resampler = FftFixedIn::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_SIZE,
        2,
        channels,
    )
    .map_err(|e| PreviewError::Resample(e.to_string()))?;

    let frames = samples.len() / channels;
    let expected = (frames as u64 * to_rate as u64).div_ceil(from_rate as u64) as usize;
    let delay = resampler.output_delay();

    // Deinterleave into per-channel buffers
    let mut planes = vec![Vec::with_capacity(frames); channels];
    for (i, sample) in samples.iter().enumerate() {
        planes[i % channels].push(*sample);
    }

    let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(expected + delay); channels];
    let mut pos = 0;

    // Keep feeding silence past the end until the delayed tail is flushed
    while output[0].len() < delay + expected {
        let chunk = resampler.input_frames_next();
        let chunk_in: Vec<Vec<f32>> = planes
            .iter()
            .map(|plane| {
                let mut part: Vec<f32> = plane.iter().skip(pos).take(chunk).copied().collect();
                part.resize(chunk, 0.0);
                part
            })
            .collect();
        pos += chunk;

        let resampled = resampler
            .process(&chunk_in, None)
            .map_err(|e| PreviewError::Resample(e.to_string()))?;
        for (out, plane) in output.iter_mut().zip(resampled) {
            out.extend(plane);
        }
    }

    let mut interleaved = Vec::with_capacity(expected * channels);
    for frame in delay..delay + expected {
        for plane in &output {
            interleaved.push(plane[frame]);
        }
    }

    tracing::debug!(from_rate, to_rate, frames, out_frames = expected, "Resampled clip");
    Ok(interleaved)
}

/// Convert interleaved samples between channel counts.
///
/// Mono is duplicated to every output channel; downmixing to mono averages;
/// other layouts map output channel `n` to input channel `n % from`.
pub fn remix(samples: &[f32], from: usize, to: usize) -> Vec<f32> {
    if from == to || from == 0 || to == 0 {
        return samples.to_vec();
    }

    let frames = samples.len() / from;
    let mut out = Vec::with_capacity(frames * to);

    for frame in samples.chunks_exact(from) {
        if to == 1 {
            out.push(frame.iter().sum::<f32>() / from as f32);
        } else {
            for ch in 0..to {
                out.push(frame[ch % from]);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_when_rates_match() {
        let input = vec![0.1, 0.2, 0.3, 0.4];
        assert_eq!(resample_clip(&input, 2, 48_000, 48_000).unwrap(), input);
    }

    #[test]
    fn test_upsample_length() {
        let frames = 4_410;
        let input: Vec<f32> = (0..frames * 2).map(|i| ((i / 2) as f32 * 0.01).sin()).collect();

        let output = resample_clip(&input, 2, 44_100, 48_000).unwrap();
        assert_eq!(output.len(), 4_800 * 2);
    }

    #[test]
    fn test_downsample_length() {
        let input = vec![0.0f32; 48_000];
        let output = resample_clip(&input, 1, 48_000, 22_050).unwrap();
        assert_eq!(output.len(), 22_050);
    }

    #[test]
    fn test_remix_mono_to_stereo() {
        assert_eq!(remix(&[0.5, -0.5], 1, 2), vec![0.5, 0.5, -0.5, -0.5]);
    }

    #[test]
    fn test_remix_stereo_to_mono() {
        assert_eq!(remix(&[0.2, 0.4, -1.0, 1.0], 2, 1), vec![0.3, 0.0]);
    }

    #[test]
    fn test_remix_stereo_to_quad() {
        assert_eq!(remix(&[0.1, 0.2], 2, 4), vec![0.1, 0.2, 0.1, 0.2]);
    }
}
