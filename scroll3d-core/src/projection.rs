/// Camera and projection utilities
use nalgebra::{Isometry3, Matrix4, Point3, Translation3, UnitQuaternion, Vector3, Vector4};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    /// Vertical field of view in radians
    Perspective { fov_y: f32 },
    /// Half-height of the view volume in scene units
    Orthographic { half_height: f32 },
}

/// Camera configuration for 3D rendering.
///
/// The projection matrix is cached; call `update_projection_matrix` after
/// changing `mode`, `aspect`, `near` or `far`.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub orientation: UnitQuaternion<f32>,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
    projection: Matrix4<f32>,
}

impl Camera {
    /// Perspective camera looking down -Z from `position`
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32, position: Point3<f32>) -> Self {
        let mut camera = Self {
            position,
            orientation: UnitQuaternion::identity(),
            aspect,
            near,
            far,
            mode: ProjectionMode::Perspective {
                fov_y: fov_degrees.to_radians(),
            },
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn orthographic(half_height: f32, aspect: f32, near: f32, far: f32, position: Point3<f32>) -> Self {
        let mut camera = Self {
            position,
            orientation: UnitQuaternion::identity(),
            aspect,
            near,
            far,
            mode: ProjectionMode::Orthographic { half_height },
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn with_orientation(mut self, orientation: UnitQuaternion<f32>) -> Self {
        self.orientation = orientation;
        self
    }

    /// Turn the camera so it faces `target`
    pub fn look_at(&mut self, target: &Point3<f32>, up: &Vector3<f32>) {
        let view = Isometry3::look_at_rh(&self.position, target, up);
        self.orientation = view.rotation.inverse();
    }

    /// Change aspect ratio and refresh the cached projection
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        let aspect = if self.aspect.is_finite() && self.aspect > 0.0 {
            self.aspect
        } else {
            1.0
        };
        self.projection = match self.mode {
            ProjectionMode::Perspective { fov_y } => {
                Matrix4::new_perspective(aspect, fov_y, self.near, self.far)
            }
            ProjectionMode::Orthographic { half_height } => {
                let half_width = half_height * aspect;
                Matrix4::new_orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        };
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Isometry3::from_parts(Translation3::from(self.position.coords), self.orientation)
            .inverse()
            .to_homogeneous()
    }

    pub fn projection_matrix(&self) -> &Matrix4<f32> {
        &self.projection
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view_matrix()
    }

    /// Project a 3D point to 2D screen space, returning `(x, y, ndc_depth)`.
    /// Points behind the camera or outside the view volume yield `None`.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        project_with(&(self.view_projection() * model_matrix), point, width, height)
    }
}

/// Project through a precomputed model-view-projection matrix
pub fn project_with(
    mvp: &Matrix4<f32>,
    point: &Point3<f32>,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip: Vector4<f32> = mvp * point.to_homogeneous();

    // Prevent division by near-zero or negative w
    if clip.w < 1e-6 {
        return None;
    }

    let ndc = clip.xyz() / clip.w;
    if !(-1.0..=1.0).contains(&ndc.z) {
        return None;
    }

    let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

    Some((screen_x, screen_y, ndc.z))
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(75.0, 16.0 / 9.0, 0.1, 1000.0, Point3::new(0.0, 1.0, 2.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::perspective(75.0, 800.0 / 600.0, 0.1, 1000.0, Point3::new(0.0, 1.0, 2.0));
        assert!(matches!(camera.mode, ProjectionMode::Perspective { .. }));
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_point_ahead_projects_to_center() {
        let camera = Camera::perspective(60.0, 1.0, 0.1, 100.0, Point3::new(0.0, 1.0, 2.0));
        let (x, y, depth) = camera
            .project_to_screen(&Point3::new(0.0, 1.0, -3.0), &Matrix4::identity(), 200, 100)
            .unwrap();
        assert!((x - 100.0).abs() < 1e-3);
        assert!((y - 50.0).abs() < 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_point_behind_is_clipped() {
        let camera = Camera::default();
        let hit = camera.project_to_screen(&Point3::new(0.0, 1.0, 5.0), &Matrix4::identity(), 100, 100);
        assert!(hit.is_none());
    }

    #[test]
    fn test_set_aspect_refreshes_projection() {
        let mut camera = Camera::default();
        let before = *camera.projection_matrix();
        camera.set_aspect(1.0);
        assert!((before - camera.projection_matrix()).norm() > 1e-3);
    }

    #[test]
    fn test_raising_camera_moves_point_down_screen() {
        let mut camera = Camera::perspective(60.0, 1.0, 0.1, 100.0, Point3::new(0.0, 1.0, 2.0));
        let point = Point3::new(0.0, 0.0, -2.0);
        let (_, low_y, _) = camera.project_to_screen(&point, &Matrix4::identity(), 100, 100).unwrap();
        camera.position.y = 2.4;
        let (_, high_y, _) = camera.project_to_screen(&point, &Matrix4::identity(), 100, 100).unwrap();
        assert!(high_y > low_y);
    }

    #[test]
    fn test_look_at_faces_target() {
        let mut camera = Camera::perspective(60.0, 1.0, 0.1, 100.0, Point3::new(5.0, 0.0, 0.0));
        camera.look_at(&Point3::origin(), &Vector3::y());
        let (x, y, _) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 100, 100)
            .unwrap();
        assert!((x - 50.0).abs() < 1e-3);
        assert!((y - 50.0).abs() < 1e-3);
    }
}
