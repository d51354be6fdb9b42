/// Ambient and directional lighting for flat-shaded meshes
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Convert a `0xRRGGBB` colour to linear-ish RGB in [0, 1]
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLight {
    pub color: u32,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            intensity: 0.5,
        }
    }
}

/// Light shining from `position` towards the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLight {
    pub color: u32,
    pub intensity: f32,
    pub position: [f32; 3],
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            intensity: 0.5,
            position: [0.0, 1.0, 0.0],
        }
    }
}

impl DirectionalLight {
    /// Unit vector pointing from the surface towards the light
    pub fn direction_to_light(&self) -> Option<Vector3<f32>> {
        Vector3::from(self.position).try_normalize(1e-12)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub directional: Vec<DirectionalLight>,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: AmbientLight::default(),
            directional: vec![DirectionalLight::default()],
        }
    }
}

impl Lighting {
    /// Lambert shading of a face with unit `normal`
    pub fn shade(&self, normal: &Vector3<f32>, base: [f32; 3]) -> [f32; 3] {
        let ambient = rgb_from_hex(self.ambient.color);
        let mut light = ambient.map(|c| c * self.ambient.intensity);

        for directional in &self.directional {
            let Some(to_light) = directional.direction_to_light() else {
                continue;
            };
            let lambert = normal.dot(&to_light).max(0.0) * directional.intensity;
            let color = rgb_from_hex(directional.color);
            for (channel, c) in light.iter_mut().zip(color) {
                *channel += c * lambert;
            }
        }

        [
            (base[0] * light[0]).clamp(0.0, 1.0),
            (base[1] * light[1]).clamp(0.0, 1.0),
            (base[2] * light[2]).clamp(0.0, 1.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_conversion() {
        assert_eq!(rgb_from_hex(0xffffff), [1.0, 1.0, 1.0]);
        assert_eq!(rgb_from_hex(0xff0000), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_upward_face_is_fully_lit() {
        let lit = Lighting::default().shade(&Vector3::y(), [1.0, 1.0, 1.0]);
        assert!((lit[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_side_face_gets_only_ambient() {
        let lit = Lighting::default().shade(&Vector3::x(), [1.0, 1.0, 1.0]);
        assert!((lit[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_base_colour_tints_result() {
        let lit = Lighting::default().shade(&Vector3::y(), [0.2, 0.4, 0.0]);
        assert!((lit[0] - 0.2).abs() < 1e-6);
        assert!((lit[1] - 0.4).abs() < 1e-6);
        assert_eq!(lit[2], 0.0);
    }
}
