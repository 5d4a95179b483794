//! Von App- und Render-Schicht gemeinsam genutzte Typen.

pub mod options;
pub mod render_scene;

pub use options::ViewerOptions;
pub use render_scene::RenderScene;
