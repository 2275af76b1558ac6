//! At-most-one preview playback across any number of track rows.

use std::collections::HashMap;
use std::fmt;

use tokio::sync::mpsc;

use super::PreviewError;
use super::handle::{AudioBackend, AudioHandle, Completion, CompletionListener};
use crate::api::Track;

/// Which preview, if any, is audible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing(String),
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Playing(id) => write!(f, "playing {id}"),
        }
    }
}

/// End-of-clip notifications, one per natural end.
#[derive(Debug)]
pub struct Completions {
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl Completions {
    /// Wait for the next completed play. `None` once the controller is gone.
    pub async fn next(&mut self) -> Option<Completion> {
        self.rx.recv().await
    }

    pub fn try_next(&mut self) -> Option<Completion> {
        self.rx.try_recv().ok()
    }
}

/// Shared playback controller.
///
/// Every track row goes through the same controller, so starting one
/// preview pauses whichever was playing. Handles are created on first play
/// and kept for the controller's lifetime.
pub struct PreviewController<B: AudioBackend> {
    backend: B,
    handles: HashMap<String, B::Handle>,
    current: Option<String>,
    /// Bumped on every play; identifies the current one
    playback: u64,
    completion_tx: mpsc::UnboundedSender<Completion>,
}

impl<B: AudioBackend> PreviewController<B> {
    /// The returned [`Completions`] must be drained by the owner and each
    /// entry passed to [`handle_completion`](Self::handle_completion).
    pub fn new(backend: B) -> (Self, Completions) {
        let (completion_tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            backend,
            handles: HashMap::new(),
            current: None,
            playback: 0,
            completion_tx,
        };
        (controller, Completions { rx })
    }

    /// Start or stop the preview for `track`.
    ///
    /// A track without a preview URL leaves everything untouched. If opening
    /// or starting the new clip fails, the previous clip stays paused and
    /// the controller is idle.
    pub fn toggle(&mut self, track: &Track) -> Result<PlaybackState, PreviewError> {
        let Some(url) = track.preview_url.as_deref() else {
            tracing::debug!(track = %track.id, "No preview available");
            return Ok(self.state());
        };

        if self.current.as_deref() == Some(track.id.as_str()) {
            self.pause_current();
            return Ok(PlaybackState::Idle);
        }

        self.pause_current();

        if !self.handles.contains_key(&track.id) {
            let listener = CompletionListener::new(track.id.clone(), self.completion_tx.clone());
            let handle = self.backend.open(url, listener)?;
            self.handles.insert(track.id.clone(), handle);
        }

        if let Some(handle) = self.handles.get_mut(&track.id) {
            self.playback += 1;
            handle.play(self.playback)?;
            tracing::info!(track = %track.id, name = %track.name, "Playing preview");
            self.current = Some(track.id.clone());
        }

        Ok(self.state())
    }

    /// Apply a natural end reported by the backend.
    ///
    /// Returns whether the marker was cleared. Ends for a track that is no
    /// longer current, or for an earlier play of the current track, are
    /// ignored.
    pub fn handle_completion(&mut self, completion: &Completion) -> bool {
        let track_id = completion.track_id.as_str();
        if self.current.as_deref() != Some(track_id) || completion.playback != self.playback {
            tracing::debug!(
                track = track_id,
                playback = completion.playback,
                "Ignoring completion for inactive preview"
            );
            return false;
        }
        tracing::debug!(track = track_id, "Preview finished");
        self.current = None;
        true
    }

    /// Pause whatever is playing.
    pub fn stop(&mut self) {
        self.pause_current();
    }

    pub fn state(&self) -> PlaybackState {
        match &self.current {
            Some(id) => PlaybackState::Playing(id.clone()),
            None => PlaybackState::Idle,
        }
    }

    pub fn currently_playing(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_playing(&self, track_id: &str) -> bool {
        self.current.as_deref() == Some(track_id)
    }

    /// Number of handles created so far.
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    fn pause_current(&mut self) {
        if let Some(id) = self.current.take()
            && let Some(handle) = self.handles.get_mut(&id)
        {
            handle.pause();
        }
    }
}
