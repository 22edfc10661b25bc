use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;

use crate::error::ExportError;

/// Clipboard writes queued for a UI thread that owns the real clipboard.
///
/// The write resolves as soon as the text is queued; the owner flushes the
/// queue with [`SharedClipboard::drain`] on its next frame.
#[derive(Debug, Clone, Default)]
pub struct SharedClipboard {
    queue: Arc<Mutex<Vec<String>>>,
}

impl SharedClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&self, text: String) -> BoxFuture<'static, Result<(), ExportError>> {
        log::debug!("Queued {} bytes for the clipboard", text.len());
        self.queue.lock().push(text);
        futures::future::ready(Ok(())).boxed()
    }

    /// Take every queued write, oldest first.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.queue.lock())
    }
}
