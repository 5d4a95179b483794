//! Kern-Datenmodell: Szene, Kamera, Geometrie, Picking.

pub mod camera;
pub mod demo;
pub mod footprints;
pub mod mesh;
pub mod picking;
pub mod primitives;
pub mod random;
pub mod scene;
pub mod walls;

pub use camera::OrbitCamera;
pub use demo::DemoSceneParams;
pub use mesh::MeshData;
pub use picking::{pick_node, RayHit};
pub use random::Lcg;
pub use scene::{Material, Scene, SceneGroup, SceneNode, Stroke, Transform};
