//! Presentation loop: the play session and the UI state it drives.

pub mod session;
pub mod ui;

pub use session::{Session, TickOutcome, TimerEvent};
pub use ui::{Overlay, TextField, UiSink, UiState};
