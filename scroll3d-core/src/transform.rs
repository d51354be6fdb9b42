/// Node transforms and rotation state
use nalgebra::{Matrix4, Rotation3, UnitQuaternion, Vector3};

/// Intrinsic XYZ Euler angles in radians: the rotation matrix is Rx * Ry * Rz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Decompose a quaternion into the same axis order used by `to_quaternion`
    pub fn from_quaternion(rotation: &UnitQuaternion<f32>) -> Self {
        let m: Rotation3<f32> = rotation.to_rotation_matrix();
        let y = m[(0, 2)].clamp(-1.0, 1.0).asin();

        // Gimbal lock: x and z share an axis, keep it all in x
        if m[(0, 2)].abs() < 0.999_999 {
            Self {
                x: (-m[(1, 2)]).atan2(m[(2, 2)]),
                y,
                z: (-m[(0, 1)]).atan2(m[(0, 0)]),
            }
        } else {
            Self {
                x: m[(2, 1)].atan2(m[(1, 1)]),
                y,
                z: 0.0,
            }
        }
    }

    pub fn to_quaternion(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), self.x)
            * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.y)
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.z)
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Translation, rotation and scale of one scene node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub translation: Vector3<f32>,
    pub rotation: RotationState,
    pub scale: Vector3<f32>,
}

impl NodeTransform {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: RotationState::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vector3::new(x, y, z),
            ..Self::identity()
        }
    }

    /// Build from glTF-style decomposed parts (quaternion as `[x, y, z, w]`)
    pub fn from_decomposed(translation: [f32; 3], rotation: [f32; 4], scale: [f32; 3]) -> Self {
        let [qx, qy, qz, qw] = rotation;
        let quaternion = UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(qw, qx, qy, qz));
        Self {
            translation: Vector3::from(translation),
            rotation: RotationState::from_quaternion(&quaternion),
            scale: Vector3::from(scale),
        }
    }

    /// Local matrix: translation * rotation * scale
    pub fn matrix(&self) -> Matrix4<f32> {
        Transform::translation_matrix(self.translation.x, self.translation.y, self.translation.z)
            * Transform::rotation_matrix(&self.rotation)
            * Transform::scale_matrix(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        rotation.to_quaternion().to_homogeneous()
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(&RotationState::zero());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_quaternion_round_trip_keeps_angles() {
        let rotation = RotationState::new(-1.2, 0.3, 0.1);
        let back = RotationState::from_quaternion(&rotation.to_quaternion());
        assert!((back.x - rotation.x).abs() < 1e-4);
        assert!((back.y - rotation.y).abs() < 1e-4);
        assert!((back.z - rotation.z).abs() < 1e-4);
    }

    #[test]
    fn test_negative_x_rotation_lifts_forward_point() {
        let transform = NodeTransform {
            rotation: RotationState::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0),
            ..NodeTransform::identity()
        };
        let moved = transform.matrix().transform_point(&Point3::new(0.0, 0.0, 1.0));
        assert!((moved.y - 1.0).abs() < 1e-5);
        assert!(moved.z.abs() < 1e-5);
    }

    #[test]
    fn test_axis_order_is_x_then_y_then_z() {
        let rotation = RotationState::new(0.4, -0.7, 1.1);
        let expected = Rotation3::from_axis_angle(&Vector3::x_axis(), 0.4)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), -0.7)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), 1.1);
        assert!((Transform::rotation_matrix(&rotation) - expected.to_homogeneous()).norm() < 1e-5);
    }

    #[test]
    fn test_hinge_tilt_keeps_rest_yaw() {
        // Rest pose turned 0.5 rad about Y, as a glTF quaternion [x, y, z, w]
        let (s, c) = (0.25f32.sin(), 0.25f32.cos());
        let mut transform = NodeTransform::from_decomposed([0.0; 3], [0.0, s, 0.0, c], [1.0; 3]);
        assert!(transform.rotation.x.abs() < 1e-5);
        assert!((transform.rotation.y - 0.5).abs() < 1e-5);
        assert!(transform.rotation.z.abs() < 1e-5);

        transform.rotation.x = -1.72;
        let expected = Rotation3::from_axis_angle(&Vector3::x_axis(), -1.72)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), 0.5);
        assert!((transform.matrix() - expected.to_homogeneous()).norm() < 1e-4);
    }

    #[test]
    fn test_decompose_at_gimbal_lock() {
        let rotation = RotationState::new(0.3, std::f32::consts::FRAC_PI_2, 0.0);
        let back = RotationState::from_quaternion(&rotation.to_quaternion());
        let diff = Transform::rotation_matrix(&back) - Transform::rotation_matrix(&rotation);
        assert!(diff.norm() < 5e-3);
    }

    #[test]
    fn test_decomposed_identity() {
        let transform = NodeTransform::from_decomposed([1.0, 2.0, 3.0], [0.0, 0.0, 0.0, 1.0], [1.0; 3]);
        assert_eq!(transform.translation, Vector3::new(1.0, 2.0, 3.0));
        assert!((transform.matrix() - Transform::translation_matrix(1.0, 2.0, 3.0)).norm() < 1e-6);
    }
}
