#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod document;
pub mod error;
pub mod export;
pub mod input;
pub mod options;
pub mod panels;
pub mod path;
pub mod renderer;
pub mod state;
pub mod stroke;

pub use app::PaintApp;
pub use command::{Command, History, HistoryEntry};
pub use document::Document;
pub use error::ExportError;
pub use export::{ClipboardMessage, ExportTarget, ExportTask, Host};
pub use options::{Options, OptionsPatch, Settings, SettingsPatch};
pub use renderer::Renderer;
pub use state::{AppState, Session, SessionSnapshot};
pub use stroke::{Mark, Point, PointerKind};
