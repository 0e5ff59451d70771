//! Setup errors
//!
//! The simulation itself cannot fail; only acquiring the page, the canvas and
//! the GPU can. These are fatal to initialization and surface to the embedder.

use std::fmt;

/// Errors that can occur while bringing up the fire view.
#[derive(Debug)]
pub enum SetupError {
    /// No global `window` (not running in a browser main thread).
    NoWindow,
    /// The window has no document.
    NoDocument,
    /// No element with the configured canvas id.
    CanvasNotFound(String),
    /// The element exists but is not a `<canvas>`.
    NotACanvas(String),
    /// Failed to create a GPU surface for the canvas.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter(wgpu::RequestAdapterError),
    /// Failed to create the GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The surface reports no texture formats or alpha modes.
    UnsupportedSurface,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::NoWindow => write!(f, "No browser window available"),
            SetupError::NoDocument => write!(f, "Window has no document"),
            SetupError::CanvasNotFound(id) => write!(f, "No element with id '{}'", id),
            SetupError::NotACanvas(id) => write!(f, "Element '{}' is not a canvas", id),
            SetupError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            SetupError::NoAdapter(e) => write!(f, "No compatible GPU adapter found: {}", e),
            SetupError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            SetupError::UnsupportedSurface => write!(f, "GPU surface has no usable configuration"),
        }
    }
}

impl std::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SetupError::SurfaceCreation(e) => Some(e),
            SetupError::NoAdapter(e) => Some(e),
            SetupError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for SetupError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        SetupError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestAdapterError> for SetupError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        SetupError::NoAdapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for SetupError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        SetupError::DeviceCreation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_canvas() {
        let err = SetupError::CanvasNotFound("fireCanvas".into());
        assert_eq!(err.to_string(), "No element with id 'fireCanvas'");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_unsupported_surface_has_no_source() {
        let err = SetupError::UnsupportedSurface;
        assert_eq!(err.to_string(), "GPU surface has no usable configuration");
        assert!(std::error::Error::source(&err).is_none());
    }
}
