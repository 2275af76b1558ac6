//! Audio output using cpal.
//!
//! One output stream is opened for the backend's lifetime. Each handle owns
//! a [`Clip`] that the stream callback mixes in while it is playing. Clips
//! are downloaded and decoded on the tokio runtime; a clip asked to play
//! before it has loaded starts as soon as its samples arrive.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use parking_lot::Mutex;
use tokio::runtime::Handle;

use super::PreviewError;
use super::decoder::{decode_clip, url_extension};
use super::handle::{AudioBackend, AudioHandle, CompletionListener};
use super::resampler::{remix, resample_clip};
use crate::config::AudioConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipStatus {
    Loading,
    Ready,
    Failed,
}

/// Per-handle playback state shared with the output callback.
struct ClipState {
    status: ClipStatus,
    /// Interleaved at the device rate and channel count
    samples: Arc<[f32]>,
    cursor: usize,
    playing: bool,
    /// Stamp of the most recent `play`
    playback: u64,
}

struct Clip {
    state: Mutex<ClipState>,
    on_end: CompletionListener,
}

impl Clip {
    fn new(on_end: CompletionListener) -> Self {
        Self {
            state: Mutex::new(ClipState {
                status: ClipStatus::Loading,
                samples: Arc::from(Vec::new()),
                cursor: 0,
                playing: false,
                playback: 0,
            }),
            on_end,
        }
    }

    /// Mix into `mix`, returning the playback stamp if the clip just
    /// reached its end.
    fn mix_into(&self, mix: &mut [f32], volume: f32) -> Option<u64> {
        let mut state = self.state.lock();
        if !state.playing || state.status != ClipStatus::Ready {
            return None;
        }

        let remaining = state.samples.len() - state.cursor;
        let n = remaining.min(mix.len());
        let start = state.cursor;
        for (out, sample) in mix.iter_mut().zip(&state.samples[start..start + n]) {
            *out += sample * volume;
        }
        state.cursor += n;

        if state.cursor >= state.samples.len() {
            // Rewind so the next play starts over
            state.cursor = 0;
            state.playing = false;
            return Some(state.playback);
        }
        None
    }

    fn loaded(&self, samples: Vec<f32>) {
        let mut state = self.state.lock();
        state.samples = Arc::from(samples);
        state.cursor = 0;
        state.status = ClipStatus::Ready;
    }

    fn failed(&self) {
        let (was_playing, playback) = {
            let mut state = self.state.lock();
            state.status = ClipStatus::Failed;
            (std::mem::replace(&mut state.playing, false), state.playback)
        };
        // Treat as finished so the owner's marker doesn't stick
        if was_playing {
            self.on_end.notify(playback);
        }
    }
}

/// Handle to one preview clip.
pub struct CpalHandle {
    clip: Arc<Clip>,
}

impl AudioHandle for CpalHandle {
    fn play(&mut self, playback: u64) -> Result<(), PreviewError> {
        let mut state = self.clip.state.lock();
        if state.status == ClipStatus::Failed {
            return Err(PreviewError::Decode("Preview clip could not be loaded".to_string()));
        }
        state.playing = true;
        state.playback = playback;
        Ok(())
    }

    fn pause(&mut self) {
        self.clip.state.lock().playing = false;
    }
}

/// Output device parameters the clips are converted to.
#[derive(Debug, Clone, Copy)]
struct OutputFormat {
    sample_rate: u32,
    channels: usize,
}

/// Real audio backend: HTTP download, symphonia decode, rubato resample,
/// cpal output.
pub struct CpalBackend {
    _stream: Stream,
    clips: Arc<Mutex<Vec<Arc<Clip>>>>,
    format: OutputFormat,
    http: reqwest::Client,
    runtime: Handle,
}

impl CpalBackend {
    /// Open the configured (or default) output device.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &AudioConfig, http: reqwest::Client) -> Result<Self, PreviewError> {
        let runtime = Handle::try_current().map_err(|e| PreviewError::AudioInit(e.to_string()))?;

        let host = cpal::default_host();
        let device = select_device(&host, &config.output_device)?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        tracing::info!("Using audio device: {}", device_name);

        let supported = device
            .default_output_config()
            .map_err(|e| PreviewError::AudioInit(e.to_string()))?;
        let format = OutputFormat {
            sample_rate: supported.sample_rate().0,
            channels: supported.channels() as usize,
        };
        tracing::info!(
            "Audio format: {}Hz, {} channels",
            format.sample_rate,
            format.channels
        );

        let stream_config: StreamConfig = supported.config();
        let clips: Arc<Mutex<Vec<Arc<Clip>>>> = Arc::new(Mutex::new(Vec::new()));
        let volume = config.volume.clamp(0.0, 1.0);

        let stream = match supported.sample_format() {
            SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, Arc::clone(&clips), volume)
            }
            SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, Arc::clone(&clips), volume)
            }
            SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, Arc::clone(&clips), volume)
            }
            format => {
                return Err(PreviewError::AudioInit(format!(
                    "Unsupported sample format: {:?}",
                    format
                )));
            }
        }
        .map_err(|e| PreviewError::AudioInit(e.to_string()))?;

        stream
            .play()
            .map_err(|e| PreviewError::AudioInit(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            clips,
            format,
            http,
            runtime,
        })
    }
}

impl AudioBackend for CpalBackend {
    type Handle = CpalHandle;

    fn open(&mut self, url: &str, on_end: CompletionListener) -> Result<CpalHandle, PreviewError> {
        let clip = Arc::new(Clip::new(on_end));
        self.clips.lock().push(Arc::clone(&clip));

        let loading = Arc::clone(&clip);
        let http = self.http.clone();
        let url = url.to_string();
        let format = self.format;
        self.runtime.spawn(async move {
            match load_clip(&http, &url, format).await {
                Ok(samples) => {
                    tracing::debug!(
                        track = loading.on_end.track_id(),
                        samples = samples.len(),
                        "Preview loaded"
                    );
                    loading.loaded(samples);
                }
                Err(e) => {
                    tracing::warn!(track = loading.on_end.track_id(), "Preview unavailable: {}", e);
                    loading.failed();
                }
            }
        });

        Ok(CpalHandle { clip })
    }
}

/// Download, decode and convert a clip to the device format.
async fn load_clip(
    http: &reqwest::Client,
    url: &str,
    format: OutputFormat,
) -> Result<Vec<f32>, PreviewError> {
    let bytes = http
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| PreviewError::Download(e.to_string()))?
        .bytes()
        .await
        .map_err(|e| PreviewError::Download(e.to_string()))?;

    let extension = url_extension(url).map(str::to_string);
    tokio::task::spawn_blocking(move || {
        let clip = decode_clip(bytes.to_vec(), extension.as_deref())?;
        let resampled =
            resample_clip(&clip.samples, clip.channels, clip.sample_rate, format.sample_rate)?;
        Ok::<_, PreviewError>(remix(&resampled, clip.channels, format.channels))
    })
    .await
    .map_err(|e| PreviewError::Decode(e.to_string()))?
}

/// Pick the output device whose name contains `preferred`
/// (case-insensitive), falling back to the host default.
fn select_device(host: &cpal::Host, preferred: &str) -> Result<Device, PreviewError> {
    let preferred = preferred.trim().to_lowercase();

    if !preferred.is_empty() {
        let devices = host
            .output_devices()
            .map_err(|e| PreviewError::AudioInit(e.to_string()))?;
        for device in devices {
            if let Ok(name) = device.name()
                && name.to_lowercase().contains(&preferred)
            {
                return Ok(device);
            }
        }
        tracing::warn!("Audio device '{}' not found, using default", preferred);
    }

    host.default_output_device()
        .ok_or_else(|| PreviewError::AudioInit("No output device found".to_string()))
}

/// List available audio output devices.
pub fn list_output_devices() -> Vec<String> {
    let host = cpal::default_host();
    host.output_devices()
        .map(|devices| devices.filter_map(|d| d.name().ok()).collect())
        .unwrap_or_default()
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    clips: Arc<Mutex<Vec<Arc<Clip>>>>,
    volume: f32,
) -> Result<Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let mut mix: Vec<f32> = Vec::new();

    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            mix.clear();
            mix.resize(data.len(), 0.0);

            for clip in clips.lock().iter() {
                if let Some(playback) = clip.mix_into(&mut mix, volume) {
                    clip.on_end.notify(playback);
                }
            }

            for (out, sample) in data.iter_mut().zip(&mix) {
                *out = T::from_sample(sample.clamp(-1.0, 1.0));
            }
        },
        |err| {
            tracing::error!("Audio stream error: {}", err);
        },
        None,
    )
}
