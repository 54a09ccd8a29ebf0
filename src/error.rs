//! Error types for orbit-sphere.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up or running the application.
#[derive(Error, Debug)]
pub enum Error {
    /// The winit event loop could not be created or exited abnormally.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The OS refused to create the window.
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    /// wgpu could not create a surface for the window.
    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// No GPU adapter compatible with the surface was found.
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    /// The adapter refused the device request.
    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// The surface reported no usable texture formats.
    #[error("surface is not supported by the selected adapter")]
    UnsupportedSurface,

    /// Acquiring the next surface texture failed in a way that cannot be recovered.
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A color string was not a valid `#rrggbb` hex color.
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    /// A font file could not be read or parsed.
    #[error("font loading failed: {0}")]
    Font(String),
}

/// Result type for orbit-sphere operations.
pub type Result<T> = std::result::Result<T, Error>;
