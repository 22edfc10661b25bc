mod central_panel;
mod controls_panel;

pub use central_panel::central_panel;
pub use controls_panel::{controls_panel, message_panel, toolbar};
