/// Error types shared by every scroll3d crate
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("STL parse error: {0}")]
    Stl(String),

    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("unsupported asset format: {0}")]
    UnsupportedAsset(String),

    #[error("invalid scroll position {input:?}: {reason}")]
    ScrollPosition { input: String, reason: String },

    #[error("asset contains no scene")]
    EmptyScene,
}

pub type Result<T> = std::result::Result<T, Error>;
