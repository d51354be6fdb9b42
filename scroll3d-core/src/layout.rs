/// Responsive canvas sizing
use serde::{Deserialize, Serialize};

/// Canvas size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Backing-store size for a device pixel ratio (truncated, at least 1)
    pub fn pixel_size(&self, pixel_ratio: f32) -> (u32, u32) {
        let scale = |v: f32| ((v * pixel_ratio).floor() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

/// Fixed-aspect layout with a minimum width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasLayout {
    pub min_width: f32,
    /// Width divided by height
    pub aspect: f32,
}

impl Default for CanvasLayout {
    fn default() -> Self {
        Self {
            min_width: 600.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl CanvasLayout {
    pub fn fit(&self, container_width: f32) -> CanvasSize {
        let width = container_width.max(self.min_width);
        CanvasSize {
            width,
            height: width / self.aspect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_container_clamps_to_minimum() {
        let size = CanvasLayout::default().fit(320.0);
        assert_eq!(size.width, 600.0);
        assert!((size.height - 337.5).abs() < 1e-3);
    }

    #[test]
    fn test_wide_container_keeps_sixteen_by_nine() {
        let size = CanvasLayout::default().fit(1280.0);
        assert!((size.height - 720.0).abs() < 1e-3);
        assert!((size.aspect() - 16.0 / 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_pixel_size() {
        let size = CanvasSize {
            width: 600.0,
            height: 337.5,
        };
        assert_eq!(size.pixel_size(1.0), (600, 337));
        assert_eq!(size.pixel_size(2.0), (1200, 675));
    }
}
