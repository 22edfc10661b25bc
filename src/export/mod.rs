//! Copying the drawing to the clipboard as SVG markup.
//!
//! The session only talks to its surroundings through [`Host`]: it asks
//! for the rendered surface ([`ExportTarget`]), crops and serializes it,
//! and hands the markup to an asynchronous clipboard write. The write is
//! returned as an [`ExportTask`] so the caller owns the suspension point.

mod clipboard;
mod svg;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

pub use clipboard::SharedClipboard;
pub use svg::SvgCanvas;

/// Margin kept around the drawing when cropping it for export.
pub const EXPORT_PADDING: f64 = 16.0;

pub const COPIED_MESSAGE: &str = "Copied SVG";
pub const COPY_FAILED_MESSAGE: &str = "Unable to copy SVG.";

/// User-facing result of a copy request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardMessage {
    pub error: bool,
    pub message: String,
}

impl ClipboardMessage {
    pub fn copied() -> Self {
        Self {
            error: false,
            message: COPIED_MESSAGE.to_string(),
        }
    }

    /// `error` is false here too, same as for a successful copy.
    pub fn copy_failed() -> Self {
        Self {
            error: false,
            message: COPY_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Axis-aligned box in canvas units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The size attributes of an export target. `None` means the attribute is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub view_box: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

impl Frame {
    /// A frame tightly cropped around `bounds`, keeping [`EXPORT_PADDING`] of margin.
    pub fn cropped_to(bounds: Bounds) -> Self {
        Self {
            view_box: Some(format!(
                "{} {} {} {}",
                bounds.x - EXPORT_PADDING,
                bounds.y - EXPORT_PADDING,
                bounds.width + EXPORT_PADDING * 2.0,
                bounds.height + EXPORT_PADDING * 2.0
            )),
            width: Some(bounds.width.to_string()),
            height: Some(bounds.height.to_string()),
        }
    }
}

/// A rendered surface that can be snapshotted.
pub trait ExportTarget {
    /// Bounding box of everything drawn on the surface.
    fn content_bounds(&self) -> Bounds;

    fn frame(&self) -> Frame;

    fn set_frame(&mut self, frame: Frame);

    fn serialize(&self) -> Result<String, ExportError>;
}

/// Everything outside the session that it depends on.
pub trait Host {
    /// The surface to export, if one is currently rendered.
    fn export_target(&mut self) -> Option<&mut dyn ExportTarget>;

    /// Start writing `text` to the system clipboard.
    fn write_clipboard(&mut self, text: String) -> BoxFuture<'static, Result<(), ExportError>>;

    /// Switch the global visual theme.
    fn apply_theme(&mut self, dark_mode: bool) {
        let _ = dark_mode;
    }
}

/// Holds a target at a temporary frame and puts the original back on drop.
struct FrameGuard<'a> {
    target: &'a mut dyn ExportTarget,
    original: Option<Frame>,
}

impl<'a> FrameGuard<'a> {
    fn resize(target: &'a mut dyn ExportTarget, frame: Frame) -> Self {
        let original = target.frame();
        target.set_frame(frame);
        Self {
            target,
            original: Some(original),
        }
    }

    fn serialize(&self) -> Result<String, ExportError> {
        self.target.serialize()
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        if let Some(original) = self.original.take() {
            self.target.set_frame(original);
        }
    }
}

/// Serialize `target` cropped to its content.
///
/// The target's frame is restored before this returns, whether or not
/// serialization succeeded.
pub fn snapshot_markup(target: &mut dyn ExportTarget) -> Result<String, ExportError> {
    let bounds = target.content_bounds();
    let guard = FrameGuard::resize(target, Frame::cropped_to(bounds));
    guard.serialize()
}

/// The pending clipboard write of a copy request.
///
/// Await it (or poll it) and feed the result back with
/// [`crate::state::Session::settle_export`].
#[must_use = "the session stays in the copying state until the task is settled"]
pub struct ExportTask {
    write: BoxFuture<'static, Result<(), ExportError>>,
}

impl ExportTask {
    pub(crate) fn new(write: BoxFuture<'static, Result<(), ExportError>>) -> Self {
        Self { write }
    }

    pub(crate) fn failed(error: ExportError) -> Self {
        Self {
            write: futures::future::ready(Err(error)).boxed(),
        }
    }
}

impl Future for ExportTask {
    type Output = Result<(), ExportError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.write.poll_unpin(cx)
    }
}

impl std::fmt::Debug for ExportTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportTask").finish_non_exhaustive()
    }
}
