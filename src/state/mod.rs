mod persistence;
mod session;

pub use persistence::{PersistenceError, PersistenceResult, SessionSnapshot};
pub use session::Session;

/// Top-level application state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppState {
    /// Accepting commands.
    #[default]
    Idle,
    /// A clipboard export is in flight. Only its outcome and message
    /// dismissal are handled until it settles.
    Copying,
}

impl AppState {
    pub fn is_idle(&self) -> bool {
        matches!(self, AppState::Idle)
    }
}
