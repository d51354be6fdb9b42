/// Viewer configuration with TOML support
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animation::AnimationConfig;
use crate::chrome::ChromeConfig;
use crate::error::{Error, Result};
use crate::layout::CanvasLayout;
use crate::lighting::Lighting;
use crate::mapper::ScrollMapping;
use crate::scene::NodeSelector;
use crate::scroll::{ScrollPosition, TriggerConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub path: String,
    /// Node rotated by scroll progress
    pub target: NodeSelector,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            path: "./macbook.glb".to_string(),
            target: NodeSelector::default(),
        }
    }
}

/// Camera used when the asset has none of its own
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackCamera {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for FallbackCamera {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 1.0, 2.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub asset: AssetConfig,
    pub mapping: ScrollMapping,
    pub trigger: TriggerConfig,
    pub layout: CanvasLayout,
    pub fallback_camera: FallbackCamera,
    pub lighting: Lighting,
    pub animation: AnimationConfig,
    pub chrome: ChromeConfig,
}

impl ViewerConfig {
    /// Load from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(Error::InvalidConfig(msg.to_string()));

        if self.mapping.ramp_span <= 0.0 {
            return invalid("mapping.ramp_span must be positive");
        }
        if self.layout.aspect <= 0.0 {
            return invalid("layout.aspect must be positive");
        }
        if self.layout.min_width <= 0.0 {
            return invalid("layout.min_width must be positive");
        }
        let camera = &self.fallback_camera;
        if camera.near <= 0.0 || camera.far <= camera.near {
            return invalid("fallback_camera needs 0 < near < far");
        }
        if self.animation.time_scale < 0.0 {
            return invalid("animation.time_scale must not be negative");
        }
        if !self.trigger.scrub {
            return invalid("trigger.scrub = false is not supported");
        }
        ScrollPosition::parse(&self.trigger.start)?;
        ScrollPosition::parse(&self.trigger.end)?;
        Ok(())
    }
}
