//! The drawing session: the single owner of marks, history, options and
//! settings, driven by [`Command`]s.
//!
//! Two state machines run side by side. The pointer machine builds marks:
//!
//! ```text
//!            DOWNED_POINTER / begin mark
//!   ┌──────┐ ───────────────────────────► ┌────────┐
//!   │  Up  │                              │  Down  │ ◄─┐ MOVED_POINTER /
//!   └──────┘ ◄─────────────────────────── └────────┘ ──┘ add point
//!            LIFTED_POINTER / commit mark
//! ```
//!
//! The application machine handles everything else. Commands are only
//! accepted while idle; a copy request parks the session in `Copying`
//! until the clipboard write settles:
//!
//! ```text
//!   ┌──────┐  COPY_REQUESTED [target found]   ┌─────────┐
//!   │ Idle │ ───────────────────────────────► │ Copying │
//!   │      │ ◄─────────────────────────────── │         │
//!   └──────┘   written: "Copied SVG"          └─────────┘
//!              failed:  "Unable to copy SVG."
//! ```
//!
//! A copy request with no target stays in `Idle` and reports the failure
//! message right away. Dismissing the message works in either state.
use super::{AppState, SessionSnapshot};
use crate::command::{Command, History, HistoryEntry, KeyModifiers, ShortcutKey};
use crate::document::Document;
use crate::error::ExportError;
use crate::export::{ClipboardMessage, ExportTask, Host, snapshot_markup};
use crate::input::{PointerAction, PointerEvent, PointerSample, PointerState};
use crate::options::{Options, Settings, SettingsPatch};
use crate::stroke::{Mark, PointerKind};

#[derive(Debug, Clone, Default)]
pub struct Session {
    app: AppState,
    pointer: PointerState,
    document: Document,
    history: History,
    options: Options,
    settings: Settings,
    clipboard_message: Option<ClipboardMessage>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the initial presentation side effects.
    pub fn start(&self, host: &mut dyn Host) {
        host.apply_theme(self.settings.dark_mode);
    }

    pub fn app_state(&self) -> AppState {
        self.app
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    pub fn marks(&self) -> &[Mark] {
        self.document.marks()
    }

    pub fn current_mark(&self) -> Option<&Mark> {
        self.document.current_mark()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clipboard_message(&self) -> Option<&ClipboardMessage> {
        self.clipboard_message.as_ref()
    }

    pub fn redos(&self) -> &[HistoryEntry] {
        self.history.redos()
    }

    pub fn restore(&self) -> &[HistoryEntry] {
        self.history.restore()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    #[cfg(test)]
    pub(crate) fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo(self.document.marks())
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Process one command to completion.
    ///
    /// Returns the pending clipboard write when the command started an export.
    pub fn dispatch(&mut self, command: Command, host: &mut dyn Host) -> Option<ExportTask> {
        log::trace!("{:?} <- {}", self.app, command.name());

        let mut task = None;
        match (self.app, command) {
            // The pointer machine runs independently of the app machine.
            (_, Command::DownedPointer(sample)) => self.handle_pointer(PointerEvent::Downed(sample)),
            (_, Command::MovedPointer(sample)) => self.handle_pointer(PointerEvent::Moved(sample)),
            (_, Command::LiftedPointer(sample)) => self.handle_pointer(PointerEvent::Lifted(sample)),
            (_, Command::ClearedClipboardMessage) => self.clipboard_message = None,

            (AppState::Idle, Command::ResetOptions) => {
                self.options = Options::default();
                self.recompute_all();
            }
            (AppState::Idle, Command::ChangedOptions(patch)) => {
                self.options.merge(&patch);
                self.recompute_all();
            }
            (AppState::Idle, Command::ChangedSettings(patch)) => {
                if self.settings.merge(&patch) {
                    host.apply_theme(self.settings.dark_mode);
                }
            }
            (AppState::Idle, Command::ToggledControls) => {
                self.settings.show_controls = !self.settings.show_controls;
            }
            (AppState::Idle, Command::ToggledDarkMode) => {
                self.settings.dark_mode = !self.settings.dark_mode;
                host.apply_theme(self.settings.dark_mode);
            }
            (AppState::Idle, Command::Undo) => self.undo(),
            (AppState::Idle, Command::Redo) => self.redo(),
            (AppState::Idle, Command::ClearedCanvas) => self.clear_all(),
            (AppState::Idle, Command::PressedKey { key, modifiers }) => {
                self.handle_shortcut(key, modifiers)
            }
            (AppState::Idle, Command::CopyRequested) => task = self.request_copy(host),
            (AppState::Idle, Command::Loaded(snapshot)) => {
                self.load(snapshot);
                host.apply_theme(self.settings.dark_mode);
            }
            (AppState::Idle, Command::Resized | Command::Unloaded) => {}

            (AppState::Copying, Command::ClipboardWritten) => self.finish_export(Ok(())),
            (AppState::Copying, Command::ClipboardWriteFailed(error)) => {
                self.finish_export(Err(error))
            }

            (state, command) => {
                log::debug!("Ignoring {} while {:?}", command.name(), state);
            }
        }
        task
    }

    /// Feed the outcome of an [`ExportTask`] back into the session.
    pub fn settle_export(&mut self, result: Result<(), ExportError>) {
        if self.app != AppState::Copying {
            log::warn!("Export settled while {:?}, ignoring", self.app);
            return;
        }
        self.finish_export(result);
    }

    /// Request a copy, wait for the clipboard write and settle it.
    pub async fn copy_to_clipboard(&mut self, host: &mut dyn Host) {
        if let Some(task) = self.dispatch(Command::CopyRequested, host) {
            let result = task.await;
            self.settle_export(result);
        }
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        match self.pointer.transition(event) {
            PointerAction::BeginMark(sample) => self.begin_mark(sample),
            PointerAction::AddPoint(sample) => {
                self.document
                    .add_point(sample.point(), sample.kind, &self.options);
            }
            PointerAction::CommitMark => {
                if let Some(mark) = self.document.commit_mark(&self.options) {
                    log::debug!("Committed {:?} mark with {} points", mark.kind, mark.points().len());
                }
            }
            PointerAction::Ignore => {}
        }
    }

    fn begin_mark(&mut self, sample: PointerSample) {
        self.settings.pen_mode = sample.kind == PointerKind::Pen;
        self.history.clear_redos();
        self.document
            .begin_mark(sample.point(), sample.kind, &self.options);
    }

    fn handle_shortcut(&mut self, key: ShortcutKey, modifiers: KeyModifiers) {
        match key {
            ShortcutKey::Z if modifiers.meta && modifiers.shift => self.redo(),
            ShortcutKey::Z if modifiers.meta => self.undo(),
            ShortcutKey::Z => {}
            ShortcutKey::D => self.settings.show_trace = !self.settings.show_trace,
            ShortcutKey::E => self.clear_all(),
        }
    }

    fn undo(&mut self) {
        self.history.undo(self.document.marks_mut());
    }

    fn redo(&mut self) {
        self.history.redo(self.document.marks_mut());
    }

    fn clear_all(&mut self) {
        self.document.clear();
        self.history.clear_redos();
    }

    fn recompute_all(&mut self) {
        self.document.recompute_all(&self.options);
    }

    fn load(&mut self, snapshot: SessionSnapshot) {
        let SessionSnapshot {
            marks,
            options,
            settings,
            ..
        } = snapshot;

        self.options.merge_all(&options);
        let marks = marks
            .into_iter()
            .map(|mut mark| {
                mark.recompute(&self.options);
                mark
            })
            .collect::<Vec<_>>();
        log::info!("Loaded {} marks", marks.len());
        self.document.set_marks(marks);

        self.settings.merge(&SettingsPatch::from(settings));
        self.settings.pen_mode = false;
    }

    fn request_copy(&mut self, host: &mut dyn Host) -> Option<ExportTask> {
        let Some(target) = host.export_target() else {
            log::warn!("Unable to copy SVG: {}", ExportError::MissingTarget);
            self.clipboard_message = Some(ClipboardMessage::copy_failed());
            return None;
        };

        log::debug!("App {:?} -> {:?}", self.app, AppState::Copying);
        self.app = AppState::Copying;

        let task = match snapshot_markup(target) {
            Ok(markup) => ExportTask::new(host.write_clipboard(markup)),
            Err(error) => ExportTask::failed(error),
        };
        Some(task)
    }

    fn finish_export(&mut self, result: Result<(), ExportError>) {
        self.clipboard_message = Some(match result {
            Ok(()) => {
                log::info!("Copied SVG to clipboard");
                ClipboardMessage::copied()
            }
            Err(error) => {
                log::warn!("Unable to copy SVG: {}", error);
                ClipboardMessage::copy_failed()
            }
        });
        log::debug!("App {:?} -> {:?}", self.app, AppState::Idle);
        self.app = AppState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::export::ExportTarget;
    use futures::FutureExt;
    use futures::future::BoxFuture;

    struct NoTarget;

    impl Host for NoTarget {
        fn export_target(&mut self) -> Option<&mut dyn ExportTarget> {
            None
        }

        fn write_clipboard(&mut self, _text: String) -> BoxFuture<'static, Result<(), ExportError>> {
            futures::future::ready(Ok(())).boxed()
        }
    }

    fn draw_dot(session: &mut Session, x: f64) {
        let sample = PointerSample::new(x, 0.0, 0.5, PointerKind::Mouse);
        session.dispatch(Command::DownedPointer(sample), &mut NoTarget);
        session.dispatch(Command::LiftedPointer(sample), &mut NoTarget);
    }

    #[test]
    fn test_undo_on_empty_canvas_uses_restore_entry() {
        let mut session = Session::new();
        draw_dot(&mut session, 1.0);
        draw_dot(&mut session, 2.0);
        let saved = session.marks().to_vec();
        session.history_mut().push_restore(HistoryEntry {
            clear: Some(true),
            marks: saved.clone(),
        });

        session.dispatch(Command::ClearedCanvas, &mut NoTarget);
        assert!(session.marks().is_empty());
        assert!(session.can_undo());

        session.dispatch(Command::Undo, &mut NoTarget);
        assert_eq!(session.marks(), saved.as_slice());
        assert!(session.restore().is_empty());
        // Bulk restores don't go onto the redo stack
        assert!(session.redos().is_empty());
    }

    #[test]
    fn test_commands_never_fill_restore() {
        let mut session = Session::new();
        draw_dot(&mut session, 1.0);
        for command in [Command::Undo, Command::Redo, Command::ClearedCanvas, Command::Undo] {
            session.dispatch(command, &mut NoTarget);
        }
        assert!(session.restore().is_empty());
        assert!(session.marks().is_empty());
    }
}
