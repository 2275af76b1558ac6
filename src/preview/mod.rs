//! Track preview playback with at most one clip audible at a time.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │             PreviewController (owning task)                  │
//! │   track id -> handle map, current marker, pause-before-play  │
//! └──────────────┬───────────────────────────────▲───────────────┘
//!                │ AudioBackend::open            │ Completions
//!                ▼                               │ (track id, playback)
//! ┌──────────────────────────────────────────────┴───────────────┐
//! │  CpalBackend: download -> symphonia decode -> rubato          │
//! │  resample -> clip mixed in the cpal output callback           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The controller never touches the audio thread directly; the output
//! callback reports natural ends through a channel and the owner feeds
//! them back via [`PreviewController::handle_completion`].

mod controller;
mod decoder;
mod handle;
mod output;
mod resampler;

pub use controller::{Completions, PlaybackState, PreviewController};
pub use decoder::{DecodedClip, decode_clip};
pub use handle::{AudioBackend, AudioHandle, Completion, CompletionListener};
pub use output::{CpalBackend, list_output_devices};
pub use resampler::{remix, resample_clip};

/// Preview playback errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PreviewError {
    #[error("Audio output initialization failed: {0}")]
    AudioInit(String),

    #[error("Failed to download preview: {0}")]
    Download(String),

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Resampling failed: {0}")]
    Resample(String),
}
