use freehand_session::command::Command;
use freehand_session::error::ExportError;
use freehand_session::export::{
    Bounds, COPIED_MESSAGE, COPY_FAILED_MESSAGE, ExportTarget, Frame, Host, SvgCanvas,
    snapshot_markup,
};
use freehand_session::input::PointerSample;
use freehand_session::options::OptionsPatch;
use freehand_session::state::{AppState, Session};
use freehand_session::stroke::PointerKind;
use futures::FutureExt;
use futures::executor::block_on;
use futures::future::BoxFuture;

/// How the recording host answers clipboard writes.
#[derive(Clone)]
enum WriteOutcome {
    Succeed,
    Fail(ExportError),
    /// Never settles.
    Hang,
}

struct RecordingHost<T> {
    target: Option<T>,
    writes: Vec<String>,
    outcome: WriteOutcome,
}

impl<T: ExportTarget> RecordingHost<T> {
    fn new(target: Option<T>, outcome: WriteOutcome) -> Self {
        Self {
            target,
            writes: Vec::new(),
            outcome,
        }
    }
}

impl<T: ExportTarget> Host for RecordingHost<T> {
    fn export_target(&mut self) -> Option<&mut dyn ExportTarget> {
        self.target.as_mut().map(|t| t as &mut dyn ExportTarget)
    }

    fn write_clipboard(&mut self, text: String) -> BoxFuture<'static, Result<(), ExportError>> {
        self.writes.push(text);
        match self.outcome.clone() {
            WriteOutcome::Succeed => futures::future::ready(Ok(())).boxed(),
            WriteOutcome::Fail(error) => futures::future::ready(Err(error)).boxed(),
            WriteOutcome::Hang => futures::future::pending().boxed(),
        }
    }
}

/// A target whose serialization always fails, remembering every frame it was given.
#[derive(Default)]
struct BrokenTarget {
    frame: Frame,
    frames_seen: Vec<Frame>,
}

impl ExportTarget for BrokenTarget {
    fn content_bounds(&self) -> Bounds {
        Bounds {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 5.0,
        }
    }

    fn frame(&self) -> Frame {
        self.frame.clone()
    }

    fn set_frame(&mut self, frame: Frame) {
        self.frames_seen.push(frame.clone());
        self.frame = frame;
    }

    fn serialize(&self) -> Result<String, ExportError> {
        Err(ExportError::Serialization("unsupported element".into()))
    }
}

fn sample(x: f64, y: f64) -> PointerSample {
    PointerSample::new(x, y, 0.5, PointerKind::Mouse)
}

// A session with one unclipped two-point mark from (10, 20) to (50, 60)
fn session_with_line<T: ExportTarget>(host: &mut RecordingHost<T>) -> Session {
    let mut session = Session::new();
    session.dispatch(
        Command::ChangedOptions(OptionsPatch {
            clip: Some(false),
            ..Default::default()
        }),
        host,
    );
    session.dispatch(Command::DownedPointer(sample(10.0, 20.0)), host);
    session.dispatch(Command::MovedPointer(sample(50.0, 60.0)), host);
    session.dispatch(Command::LiftedPointer(sample(50.0, 60.0)), host);
    session
}

fn message_of(session: &Session) -> Option<(bool, &str)> {
    session
        .clipboard_message()
        .map(|m| (m.error, m.message.as_str()))
}

#[test]
fn test_copy_without_target_stays_idle() {
    let mut host = RecordingHost::<SvgCanvas>::new(None, WriteOutcome::Succeed);
    let mut session = Session::new();

    let task = session.dispatch(Command::CopyRequested, &mut host);

    assert!(task.is_none());
    assert_eq!(session.app_state(), AppState::Idle);
    assert_eq!(message_of(&session), Some((false, COPY_FAILED_MESSAGE)));
    assert!(host.writes.is_empty());
}

#[test]
fn test_copy_writes_cropped_svg() {
    let mut host = RecordingHost::new(Some(SvgCanvas::new(800.0, 600.0)), WriteOutcome::Succeed);
    let mut session = session_with_line(&mut host);
    assert_eq!(session.marks()[0].path(), "M 10 20 Q 10,20 30,40 Z");
    host.target.as_mut().unwrap().sync(&session);

    block_on(session.copy_to_clipboard(&mut host));

    assert_eq!(session.app_state(), AppState::Idle);
    assert_eq!(message_of(&session), Some((false, COPIED_MESSAGE)));
    assert_eq!(
        host.writes,
        vec![
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"20\" height=\"20\" \
             viewBox=\"-6 4 52 52\"><path d=\"M 10 20 Q 10,20 30,40 Z\" fill=\"#000000\"/></svg>"
                .to_string()
        ]
    );

    // The on-screen frame is back
    let frame = host.target.as_ref().unwrap().frame();
    assert_eq!(frame.width.as_deref(), Some("800"));
    assert_eq!(frame.height.as_deref(), Some("600"));
    assert_eq!(frame.view_box, None);
}

#[test]
fn test_clipboard_rejection_reports_failure() {
    let mut host = RecordingHost::new(
        Some(SvgCanvas::new(100.0, 100.0)),
        WriteOutcome::Fail(ExportError::Clipboard("permission denied".into())),
    );
    let mut session = session_with_line(&mut host);
    host.target.as_mut().unwrap().sync(&session);

    block_on(session.copy_to_clipboard(&mut host));

    assert_eq!(host.writes.len(), 1);
    assert_eq!(session.app_state(), AppState::Idle);
    assert_eq!(message_of(&session), Some((false, COPY_FAILED_MESSAGE)));
}

#[test]
fn test_serialize_failure_restores_frame() {
    let mut target = BrokenTarget::default();
    target.frame = Frame {
        view_box: Some("0 0 300 200".into()),
        width: Some("300".into()),
        height: None,
    };
    let original = target.frame.clone();

    let result = snapshot_markup(&mut target);

    assert!(matches!(result, Err(ExportError::Serialization(_))));
    assert_eq!(target.frame, original);
    assert_eq!(
        target.frames_seen,
        vec![
            Frame {
                view_box: Some("-16 -16 42 37".into()),
                width: Some("10".into()),
                height: Some("5".into()),
            },
            original,
        ]
    );
}

#[test]
fn test_serialize_failure_settles_with_message() {
    let mut host = RecordingHost::new(Some(BrokenTarget::default()), WriteOutcome::Succeed);
    let mut session = Session::new();

    let task = session.dispatch(Command::CopyRequested, &mut host).unwrap();
    assert_eq!(session.app_state(), AppState::Copying);

    let result = block_on(task);
    assert!(result.is_err());
    session.settle_export(result);

    assert!(host.writes.is_empty());
    assert_eq!(session.app_state(), AppState::Idle);
    assert_eq!(message_of(&session), Some((false, COPY_FAILED_MESSAGE)));
    assert_eq!(host.target.as_ref().unwrap().frame, Frame::default());
}

#[test]
fn test_copying_blocks_other_commands() {
    let mut host = RecordingHost::new(Some(SvgCanvas::new(100.0, 100.0)), WriteOutcome::Hang);
    let mut session = session_with_line(&mut host);

    let task = session.dispatch(Command::CopyRequested, &mut host);
    assert!(task.is_some());
    assert_eq!(session.app_state(), AppState::Copying);

    session.dispatch(Command::Undo, &mut host);
    session.dispatch(Command::ClearedCanvas, &mut host);
    session.dispatch(Command::ToggledControls, &mut host);
    assert!(session.dispatch(Command::CopyRequested, &mut host).is_none());

    assert_eq!(session.marks().len(), 1);
    assert!(!session.settings().show_controls);
    assert_eq!(host.writes.len(), 1);

    // The write never settles on its own; the host reports it explicitly
    session.dispatch(Command::ClipboardWritten, &mut host);
    assert_eq!(session.app_state(), AppState::Idle);
    assert_eq!(message_of(&session), Some((false, COPIED_MESSAGE)));
}

#[test]
fn test_drawing_continues_while_copying() {
    let mut host = RecordingHost::new(Some(SvgCanvas::new(100.0, 100.0)), WriteOutcome::Hang);
    let mut session = session_with_line(&mut host);
    let _task = session.dispatch(Command::CopyRequested, &mut host);

    session.dispatch(Command::DownedPointer(sample(1.0, 1.0)), &mut host);
    session.dispatch(Command::LiftedPointer(sample(1.0, 1.0)), &mut host);
    assert_eq!(session.marks().len(), 2);

    session.dispatch(
        Command::ClipboardWriteFailed(ExportError::Clipboard("timed out".into())),
        &mut host,
    );
    assert_eq!(session.app_state(), AppState::Idle);
    assert_eq!(message_of(&session), Some((false, COPY_FAILED_MESSAGE)));
}

#[test]
fn test_clear_message_in_either_state() {
    let mut host = RecordingHost::<SvgCanvas>::new(None, WriteOutcome::Succeed);
    let mut session = Session::new();
    session.dispatch(Command::CopyRequested, &mut host);
    assert!(session.clipboard_message().is_some());

    session.dispatch(Command::ClearedClipboardMessage, &mut host);
    assert!(session.clipboard_message().is_none());

    let mut host = RecordingHost::new(Some(SvgCanvas::new(100.0, 100.0)), WriteOutcome::Hang);
    session.dispatch(Command::CopyRequested, &mut host);
    session.dispatch(Command::ClipboardWritten, &mut host);
    let _task = session.dispatch(Command::CopyRequested, &mut host);
    assert_eq!(session.app_state(), AppState::Copying);
    assert!(session.clipboard_message().is_some());

    session.dispatch(Command::ClearedClipboardMessage, &mut host);
    assert!(session.clipboard_message().is_none());
    assert_eq!(session.app_state(), AppState::Copying);
}

#[test]
fn test_settle_when_idle_is_ignored() {
    let mut session = Session::new();
    session.settle_export(Ok(()));
    assert_eq!(session.app_state(), AppState::Idle);
    assert!(session.clipboard_message().is_none());
}
