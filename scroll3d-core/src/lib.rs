/// scroll3d Core Library - scroll-linked 3D scene logic
///
/// Everything here is independent of the host: asset loading, the scene
/// graph, the scroll trigger and progress mapping, animation, layout, and a
/// software rasterizer. Front ends own a `Stage` and feed it events.

pub mod animation;
pub mod asset;
pub mod chrome;
pub mod config;
pub mod demo;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod lighting;
pub mod mapper;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod scroll;
pub mod stage;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use asset::Asset;
pub use config::ViewerConfig;
pub use error::{Error, Result};
pub use geometry::{Mesh, Triangle, Vertex};
pub use layout::{CanvasLayout, CanvasSize};
pub use mapper::{ScrollMapping, ScrollTransform};
pub use projection::{Camera, ProjectionMode};
pub use raster::Framebuffer;
pub use scene::{Node, NodeId, NodeSelector, SceneGraph};
pub use scroll::{ScrollTrigger, TriggerLayout, TriggerObserver, TriggerState};
pub use stage::{CameraSource, Stage};
pub use transform::{NodeTransform, RotationState, Transform};
