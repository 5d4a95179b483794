//! App-Schicht: Zustand, Intents, Controller.

pub mod controller;
pub mod events;
pub mod state;

pub use controller::ViewerController;
pub use events::ViewerIntent;
pub use state::AppState;
