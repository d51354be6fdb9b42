/// Render context owning everything one scroll-animated view needs
use nalgebra::Point3;

use crate::animation::{AnimationMixer, Clock};
use crate::asset::Asset;
use crate::config::{FallbackCamera, ViewerConfig};
use crate::layout::{CanvasLayout, CanvasSize};
use crate::lighting::Lighting;
use crate::mapper::{ScrollMapping, ScrollTransform};
use crate::projection::Camera;
use crate::raster::{render_scene, Framebuffer};
use crate::scene::{NodeId, SceneGraph};
use crate::scroll::{TriggerObserver, TriggerState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraSource {
    /// First camera embedded in the asset
    Embedded,
    /// Asset had no camera; built from `FallbackCamera`
    Fallback,
}

/// Front ends hold one, feed it resize events and trigger notifications,
/// and call `frame` from their per-frame callback.
pub struct Stage {
    scene: SceneGraph,
    camera: Camera,
    camera_source: CameraSource,
    lighting: Lighting,
    mixer: AnimationMixer,
    clock: Clock,
    mapping: ScrollMapping,
    target: Option<NodeId>,
    layout: CanvasLayout,
    viewport: CanvasSize,
    last_transform: Option<ScrollTransform>,
}

impl Stage {
    /// Build a stage from a loaded asset. `container` is the initial
    /// container size used for the fallback camera's aspect ratio.
    pub fn new(asset: Asset, config: &ViewerConfig, container: CanvasSize) -> Self {
        let Asset {
            scene,
            cameras,
            animations,
        } = asset;

        let (camera, camera_source) = match cameras.into_iter().next() {
            Some(camera) => (camera, CameraSource::Embedded),
            None => {
                log::error!("asset does not contain a camera, using fallback camera");
                (fallback_camera(&config.fallback_camera, container.aspect()), CameraSource::Fallback)
            }
        };

        let target = scene.resolve(&config.asset.target);
        if target.is_none() {
            log::warn!("scroll target {:?} not found in asset", config.asset.target);
        }

        let mut mixer = AnimationMixer::new(config.animation.time_scale);
        for clip in animations {
            mixer.add_clip(clip, config.animation.autoplay);
        }

        Self {
            scene,
            camera,
            camera_source,
            lighting: config.lighting.clone(),
            mixer,
            clock: Clock::new(),
            mapping: config.mapping,
            target,
            layout: config.layout,
            viewport: container,
            last_transform: None,
        }
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_source(&self) -> CameraSource {
        self.camera_source
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn viewport(&self) -> CanvasSize {
        self.viewport
    }

    pub fn last_transform(&self) -> Option<ScrollTransform> {
        self.last_transform
    }

    /// Fit the canvas to a container width and refresh the camera projection
    pub fn resize(&mut self, container_width: f32) -> CanvasSize {
        let size = self.layout.fit(container_width);
        self.set_viewport(size);
        log::debug!("resized canvas to {}x{}", size.width, size.height);
        size
    }

    /// Use an explicit viewport, bypassing the responsive layout
    pub fn set_viewport(&mut self, size: CanvasSize) {
        self.viewport = size;
        self.camera.set_aspect(size.aspect());
    }

    /// Write a mapped scroll sample into the scene and camera
    pub fn apply_scroll(&mut self, progress: f32) -> ScrollTransform {
        let transform = self.mapping.map(progress);

        if let Some(node) = self.target.and_then(|id| self.scene.node_mut(id)) {
            node.transform.rotation.x = transform.rotation_angle;
        }
        self.camera.position.y = transform.camera_height;

        self.last_transform = Some(transform);
        transform
    }

    /// Advance animation clips by `delta` seconds (before time scaling)
    pub fn advance(&mut self, delta: f32) {
        self.mixer.update(delta, &mut self.scene);
    }

    pub fn render(&self, target: &mut Framebuffer) {
        render_scene(&self.scene, &self.camera, &self.lighting, target);
    }

    /// One render-loop iteration: clock, animation, draw
    pub fn frame(&mut self, target: &mut Framebuffer) {
        let delta = self.clock.delta();
        self.advance(delta);
        self.render(target);
    }
}

impl TriggerObserver for Stage {
    fn on_update(&mut self, state: &TriggerState) {
        self.apply_scroll(state.progress);
    }

    fn on_refresh(&mut self, state: &TriggerState) {
        if let Some(height) = state.pin_spacer_height {
            log::debug!("updated pin spacer height to {height}px");
        }
    }
}

fn fallback_camera(config: &FallbackCamera, aspect: f32) -> Camera {
    let [x, y, z] = config.position;
    Camera::perspective(config.fov_degrees, aspect, config.near, config.far, Point3::new(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationClip, Interpolation, Track, TrackValues};
    use crate::demo;
    use crate::projection::ProjectionMode;
    use crate::scene::NodeSelector;
    use crate::scroll::{ScrollTrigger, TriggerConfig, TriggerLayout};
    use nalgebra::Vector3;

    fn container() -> CanvasSize {
        CanvasSize {
            width: 1200.0,
            height: 600.0,
        }
    }

    #[test]
    fn test_fallback_camera_when_asset_has_none() {
        let stage = Stage::new(demo::laptop(), &ViewerConfig::default(), container());
        assert_eq!(stage.camera_source(), CameraSource::Fallback);
        let camera = stage.camera();
        assert_eq!(camera.position, Point3::new(0.0, 1.0, 2.0));
        assert!((camera.aspect - 2.0).abs() < 1e-6);
        assert_eq!(camera.near, 0.1);
        match camera.mode {
            ProjectionMode::Perspective { fov_y } => assert!((fov_y - 75f32.to_radians()).abs() < 1e-6),
            ProjectionMode::Orthographic { .. } => panic!("fallback camera should be perspective"),
        }
    }

    #[test]
    fn test_embedded_camera_is_used() {
        let mut asset = demo::laptop();
        asset.cameras.push(Camera::perspective(40.0, 1.0, 0.5, 50.0, Point3::new(0.0, 3.0, 3.0)));
        let stage = Stage::new(asset, &ViewerConfig::default(), container());
        assert_eq!(stage.camera_source(), CameraSource::Embedded);
        assert_eq!(stage.camera().position.y, 3.0);
    }

    #[test]
    fn test_resize_updates_camera_aspect() {
        let mut stage = Stage::new(demo::laptop(), &ViewerConfig::default(), container());
        let size = stage.resize(300.0);
        assert_eq!(size.width, 600.0);
        assert!((stage.camera().aspect - 16.0 / 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_apply_scroll_moves_target_and_camera() {
        let mut stage = Stage::new(demo::laptop(), &ViewerConfig::default(), container());
        let out = stage.apply_scroll(1.0);
        assert!((out.rotation_angle + 2.15).abs() < 1e-5);

        let screen = stage.target().unwrap();
        let rotation = stage.scene().node(screen).unwrap().transform.rotation;
        assert!((rotation.x + 2.15).abs() < 1e-5);
        assert!((stage.camera().position.y - 2.4).abs() < 1e-5);

        // same input, same state
        stage.apply_scroll(1.0);
        assert_eq!(stage.scene().node(screen).unwrap().transform.rotation, rotation);
    }

    #[test]
    fn test_missing_target_still_moves_camera() {
        let mut config = ViewerConfig::default();
        config.asset.target = NodeSelector::Name("hinge-that-does-not-exist".to_string());
        let mut stage = Stage::new(demo::laptop(), &config, container());
        assert!(stage.target().is_none());
        stage.apply_scroll(0.5);
        assert!(stage.camera().position.y > 1.0);
    }

    #[test]
    fn test_trigger_drives_stage() {
        let mut stage = Stage::new(demo::laptop(), &ViewerConfig::default(), container());
        let mut trigger = ScrollTrigger::from_config(&TriggerConfig::default()).unwrap();
        let layout = TriggerLayout {
            element_top: 600.0,
            element_height: 2400.0,
            viewport_height: 800.0,
        };
        trigger.refresh(layout, true, &mut stage);
        assert_eq!(stage.camera().position.y, 1.0);

        trigger.update(10_000.0, &mut stage);
        assert_eq!(stage.camera().position.y, 2.4);
        assert_eq!(stage.last_transform().map(|t| t.rotation_angle), Some(-2.15));
    }

    #[test]
    fn test_advance_runs_clips_with_time_scale() {
        let mut asset = demo::laptop();
        let keyboard = asset.scene.find_by_name("keyboard").unwrap();
        asset.animations.push(AnimationClip {
            name: None,
            tracks: vec![Track {
                node: keyboard,
                times: vec![0.0, 10.0],
                values: TrackValues::Translation(vec![Vector3::zeros(), Vector3::new(10.0, 0.0, 0.0)]),
                interpolation: Interpolation::Linear,
            }],
        });
        let mut stage = Stage::new(asset, &ViewerConfig::default(), container());
        stage.advance(1.0);
        let x = stage.scene().node(keyboard).unwrap().transform.translation.x;
        assert!((x - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_frame_draws_laptop() {
        let mut stage = Stage::new(demo::laptop(), &ViewerConfig::default(), container());
        stage.set_viewport(CanvasSize {
            width: 64.0,
            height: 36.0,
        });
        let mut fb = Framebuffer::new(64, 36);
        stage.frame(&mut fb);
        assert!(fb.rows().flatten().any(Option::is_some));
    }
}
