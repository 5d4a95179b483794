//! Pano Scene Viewer Library.
//! Core-Funktionalität als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod render;
pub mod shared;
pub mod ui;

pub use app::{AppState, ViewerController, ViewerIntent};
pub use core::{
    Lcg, Material, MeshData, OrbitCamera, Scene, SceneGroup, SceneNode, Stroke, Transform,
};
pub use shared::{RenderScene, ViewerOptions};
