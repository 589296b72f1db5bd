//! Presentation layer with UI components and event handling.

/// Event handling.
pub mod events;
/// Colors and styles.
pub mod theme;
/// UI screens.
pub mod ui;
/// Reusable widgets.
pub mod widgets;

pub use ui::{App, AppPorts};
