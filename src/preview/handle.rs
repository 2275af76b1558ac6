//! Seams between the preview controller and an audio implementation.

use tokio::sync::mpsc;

use super::PreviewError;

/// One playable preview clip bound to a single URL.
///
/// Handles are created once per track and reused; `play` after a natural
/// end starts over from the beginning.
pub trait AudioHandle {
    /// Start or resume. `playback` identifies this play and is handed back
    /// through [`CompletionListener::notify`] when it reaches its end.
    fn play(&mut self, playback: u64) -> Result<(), PreviewError>;

    /// Pausing never triggers the completion listener.
    fn pause(&mut self);
}

/// Creates audio handles.
pub trait AudioBackend {
    type Handle: AudioHandle;

    /// Bind a new handle to `url`. The backend calls `on_end.notify(playback)`
    /// exactly once each time the clip plays through to its end.
    fn open(&mut self, url: &str, on_end: CompletionListener) -> Result<Self::Handle, PreviewError>;
}

/// A clip that played through to its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub track_id: String,
    /// The value passed to [`AudioHandle::play`] for the play that ended
    pub playback: u64,
}

/// Reports natural end-of-clip for one track back to the controller.
#[derive(Debug, Clone)]
pub struct CompletionListener {
    track_id: String,
    tx: mpsc::UnboundedSender<Completion>,
}

impl CompletionListener {
    pub(crate) fn new(track_id: impl Into<String>, tx: mpsc::UnboundedSender<Completion>) -> Self {
        Self {
            track_id: track_id.into(),
            tx,
        }
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    /// Non-blocking; safe to call from the audio callback.
    pub fn notify(&self, playback: u64) {
        // Controller dropped: nothing left to update
        let _ = self.tx.send(Completion {
            track_id: self.track_id.clone(),
            playback,
        });
    }
}
