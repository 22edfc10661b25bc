use std::task::Poll;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::command::Command;
use crate::error::ExportError;
use crate::export::{ExportTarget, ExportTask, Host, SharedClipboard, SvgCanvas};
use crate::input::InputHandler;
use crate::panels;
use crate::renderer::Renderer;
use crate::state::{Session, SessionSnapshot};

/// Seconds a clipboard message stays up before it is dismissed for the user.
const MESSAGE_TIMEOUT: f64 = 3.0;

/// The session's view of the egui application around it.
struct AppHost<'a> {
    canvas: Option<&'a mut SvgCanvas>,
    clipboard: &'a SharedClipboard,
    ctx: &'a egui::Context,
}

impl Host for AppHost<'_> {
    fn export_target(&mut self) -> Option<&mut dyn ExportTarget> {
        self.canvas
            .as_deref_mut()
            .map(|canvas| canvas as &mut dyn ExportTarget)
    }

    fn write_clipboard(&mut self, text: String) -> BoxFuture<'static, Result<(), ExportError>> {
        self.clipboard.write(text)
    }

    fn apply_theme(&mut self, dark_mode: bool) {
        self.ctx.set_visuals(if dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
    }
}

pub struct PaintApp {
    session: Session,
    input: InputHandler,
    renderer: Renderer,
    // Created once the canvas has been laid out
    canvas: Option<SvgCanvas>,
    clipboard: SharedClipboard,
    pending_export: Option<ExportTask>,
    ctx: egui::Context,
    message_since: Option<f64>,
}

impl PaintApp {
    /// Called once before the first frame.
    ///
    /// A snapshot passed in explicitly wins over the one eframe persisted.
    pub fn new(cc: &eframe::CreationContext<'_>, snapshot: Option<SessionSnapshot>) -> Self {
        let mut app = Self::with_context(cc.egui_ctx.clone());

        let stored = cc
            .storage
            .and_then(|storage| eframe::get_value::<SessionSnapshot>(storage, eframe::APP_KEY));
        if let Some(snapshot) = snapshot.or(stored) {
            app.dispatch(Command::Loaded(snapshot));
        }
        app
    }

    /// An app with a fresh session, outside of eframe.
    pub fn with_context(ctx: egui::Context) -> Self {
        let mut app = Self {
            session: Session::new(),
            input: InputHandler::new(),
            renderer: Renderer::new(),
            canvas: None,
            clipboard: SharedClipboard::new(),
            pending_export: None,
            ctx,
            message_since: None,
        };
        let (session, mut host) = app.split();
        session.start(&mut host);
        app
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn input_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    pub fn canvas(&self) -> Option<&SvgCanvas> {
        self.canvas.as_ref()
    }

    pub fn is_exporting(&self) -> bool {
        self.pending_export.is_some()
    }

    pub fn dispatch(&mut self, command: Command) {
        if matches!(command, Command::CopyRequested) {
            if let Some(canvas) = self.canvas.as_mut() {
                canvas.sync(&self.session);
            }
            self.message_since = None;
        }

        let (session, mut host) = self.split();
        if let Some(task) = session.dispatch(command, &mut host) {
            self.pending_export = Some(task);
        }
    }

    /// Track a new canvas size, creating the export surface on first layout.
    pub fn canvas_resized(&mut self, rect: egui::Rect) {
        let (width, height) = (rect.width() as f64, rect.height() as f64);
        match self.canvas.as_mut() {
            Some(canvas) => canvas.set_size(width, height),
            None => self.canvas = Some(SvgCanvas::new(width, height)),
        }
        self.dispatch(Command::Resized);
    }

    fn split(&mut self) -> (&mut Session, AppHost<'_>) {
        (
            &mut self.session,
            AppHost {
                canvas: self.canvas.as_mut(),
                clipboard: &self.clipboard,
                ctx: &self.ctx,
            },
        )
    }

    /// Poll the pending clipboard write without blocking the frame.
    fn poll_export(&mut self, ctx: &egui::Context) {
        let Some(task) = self.pending_export.as_mut() else {
            return;
        };

        let mut cx = std::task::Context::from_waker(futures::task::noop_waker_ref());
        match task.poll_unpin(&mut cx) {
            Poll::Ready(result) => {
                self.pending_export = None;
                self.message_since = None;
                self.session.settle_export(result);
            }
            Poll::Pending => ctx.request_repaint(),
        }
    }

    fn flush_clipboard(&self, ctx: &egui::Context) {
        for text in self.clipboard.drain() {
            ctx.copy_text(text);
        }
    }

    fn expire_message(&mut self, ctx: &egui::Context) {
        if self.session.clipboard_message().is_none() {
            self.message_since = None;
            return;
        }

        let now = ctx.input(|input| input.time);
        let since = *self.message_since.get_or_insert(now);
        if now - since >= MESSAGE_TIMEOUT {
            self.dispatch(Command::ClearedClipboardMessage);
        } else {
            ctx.request_repaint_after(std::time::Duration::from_secs_f64(
                MESSAGE_TIMEOUT - (now - since),
            ));
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &SessionSnapshot::capture(&self.session));
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_export(ctx);

        for command in self.input.shortcut_commands(ctx) {
            self.dispatch(command);
        }

        // Side and top panels first so the canvas gets what is left
        panels::toolbar(self, ctx);
        panels::message_panel(self, ctx);
        panels::controls_panel(self, ctx);
        panels::central_panel(self, ctx);

        self.flush_clipboard(ctx);
        self.expire_message(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.dispatch(Command::Unloaded);
    }
}
