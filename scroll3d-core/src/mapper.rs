/// Scroll progress to scene transform mapping
use serde::{Deserialize, Serialize};

/// Values derived from a single scroll progress sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTransform {
    /// X-axis rotation for the target node, in radians
    pub rotation_angle: f32,
    /// Camera Y position, in scene units
    pub camera_height: f32,
}

/// Constants of the scroll mapping.
///
/// The height ramp is evaluated against `ramp_span` but cut off at
/// `lock_threshold`, so it jumps to `end_height` just past the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollMapping {
    /// Rotation reached at full progress (radians, applied negatively)
    pub max_rotation: f32,
    /// Progress above which the camera height is locked
    pub lock_threshold: f32,
    /// Progress divisor of the height ramp
    pub ramp_span: f32,
    pub start_height: f32,
    pub end_height: f32,
}

impl Default for ScrollMapping {
    fn default() -> Self {
        Self {
            max_rotation: 2.15,
            lock_threshold: 0.8,
            ramp_span: 0.85,
            start_height: 1.0,
            end_height: 2.4,
        }
    }
}

impl ScrollMapping {
    /// Map a progress sample. Inputs outside [0, 1] extrapolate.
    pub fn map(&self, progress: f32) -> ScrollTransform {
        let rotation_angle = -(progress * self.max_rotation);

        let camera_height = if progress <= self.lock_threshold {
            self.start_height + (progress / self.ramp_span) * (self.end_height - self.start_height)
        } else {
            self.end_height
        };

        ScrollTransform {
            rotation_angle,
            camera_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_start_of_scroll() {
        let out = ScrollMapping::default().map(0.0);
        assert!(out.rotation_angle.abs() < EPS);
        assert!((out.camera_height - 1.0).abs() < EPS);
    }

    #[test]
    fn test_at_lock_threshold() {
        let out = ScrollMapping::default().map(0.8);
        assert!((out.camera_height - (1.0 + (0.8 / 0.85) * 1.4)).abs() < EPS);
        assert!((out.camera_height - 2.3176).abs() < 1e-3);
        assert!((out.rotation_angle + 1.72).abs() < EPS);
    }

    #[test]
    fn test_height_locked_past_threshold() {
        let mapping = ScrollMapping::default();
        assert!((mapping.map(0.85).camera_height - 2.4).abs() < EPS);

        let end = mapping.map(1.0);
        assert!((end.rotation_angle + 2.15).abs() < EPS);
        assert!((end.camera_height - 2.4).abs() < EPS);
    }

    #[test]
    fn test_monotonic_over_unit_range() {
        let mapping = ScrollMapping::default();
        let mut previous = mapping.map(0.0);
        for step in 1..=1000 {
            let progress = step as f32 / 1000.0;
            let current = mapping.map(progress);
            assert!(current.rotation_angle <= previous.rotation_angle);
            assert!(current.camera_height >= previous.camera_height);
            if progress > 0.8 {
                assert_eq!(current.camera_height, 2.4);
            }
            previous = current;
        }
    }

    #[test]
    fn test_idempotent() {
        let mapping = ScrollMapping::default();
        assert_eq!(mapping.map(0.37), mapping.map(0.37));
    }

    #[test]
    fn test_out_of_range_extrapolates() {
        let mapping = ScrollMapping::default();
        let below = mapping.map(-0.5);
        assert!((below.rotation_angle - 1.075).abs() < EPS);
        assert!(below.camera_height < 1.0);

        let above = mapping.map(1.5);
        assert!((above.rotation_angle + 3.225).abs() < EPS);
        assert_eq!(above.camera_height, 2.4);
    }
}
