//! Renderer Settings
//!
//! Consumed once by [`Renderer::init`](crate::renderer::Renderer::init).
//!
//! ```rust,ignore
//! use piano::renderer::settings::RendererSettings;
//!
//! let settings = RendererSettings {
//!     vsync: false,
//!     power_preference: wgpu::PowerPreference::LowPower,
//!     ..Default::default()
//! };
//! ```

/// Global configuration for renderer initialization.
///
/// | Field              | Description                          | Default           |
/// |--------------------|--------------------------------------|-------------------|
/// | `vsync`            | Vertical sync enabled                | `true`            |
/// | `power_preference` | GPU adapter selection strategy       | `HighPerformance` |
/// | `required_limits`  | Required wgpu limits                 | Default           |
/// | `depth_format`     | Depth buffer texture format          | `Depth32Float`    |
#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// Cap the frame rate to the display refresh rate.
    pub vsync: bool,

    pub power_preference: wgpu::PowerPreference,

    pub required_limits: wgpu::Limits,

    pub depth_format: wgpu::TextureFormat,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_limits: wgpu::Limits::default(),
            depth_format: wgpu::TextureFormat::Depth32Float,
        }
    }
}
