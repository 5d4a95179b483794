//! UI-Schicht: Panels und Viewport-Input.

mod input;
mod panel;

pub use input::InputState;
pub use panel::render_settings_panel;
