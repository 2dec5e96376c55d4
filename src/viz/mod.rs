//! 3D scatter view of a flattened option chain
//!
//! `scene` turns plot axes into drawable geometry, `session` owns the camera,
//! controls and label textures for one mounted view, and `render` draws a
//! frame with egui's painter.

pub mod camera;
pub mod controls;
pub mod label;
pub mod raycast;
pub mod render;
pub mod scene;
pub mod session;
pub mod tooltip;

pub use camera::PerspectiveCamera;
pub use controls::OrbitControls;
pub use raycast::{PointIntersection, Ray, Raycaster};
pub use scene::PlotScene;
pub use session::{LabelTexture, SceneHandle, SceneUpdate, ViewSession};
pub use tooltip::Tooltip;
