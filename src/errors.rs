//! Error Types
//!
//! This module defines the error types used throughout the piano.
//!
//! # Overview
//!
//! The main error type [`PianoError`] covers all failure modes including:
//! - GPU initialization failures
//! - Model loading and decoding errors
//! - Audio back-end failures
//!
//! Click handling never produces an error: unbound targets and missing
//! samples are ignored where they occur.
//!
//! # Usage
//!
//! ```rust,ignore
//! use piano::errors::Result;
//!
//! fn load_model() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the piano.
#[derive(Error, Debug)]
pub enum PianoError {
    // ========================================================================
    // GPU & Rendering Errors
    // ========================================================================
    /// Failed to request a compatible GPU adapter.
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create the window surface.
    #[error("Failed to create surface: {0}")]
    SurfaceCreateFailed(#[from] wgpu::CreateSurfaceError),

    /// The OS refused to create the window.
    #[error("Failed to create window: {0}")]
    WindowCreateFailed(#[from] winit::error::OsError),

    /// Event loop error (winit).
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// A glTF buffer referenced by an accessor is missing.
    #[error("Missing glTF buffer data: {context} (index: {index})")]
    MissingBuffer {
        /// Description of what was being read
        context: String,
        /// The buffer index
        index: usize,
    },

    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    GltfError(String),

    /// Data URI parsing error.
    #[error("Data URI error: {0}")]
    DataUriError(String),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ========================================================================
    // Async & Threading Errors
    // ========================================================================
    /// Task join error (when the background load does not complete).
    #[error("Task join error: {0}")]
    TaskJoinError(String),

    // ========================================================================
    // Audio Errors
    // ========================================================================
    /// The audio back end could not be started.
    #[error("Audio error: {0}")]
    AudioError(String),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<gltf::Error> for PianoError {
    fn from(err: gltf::Error) -> Self {
        PianoError::GltfError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for PianoError {
    fn from(err: tokio::task::JoinError) -> Self {
        PianoError::TaskJoinError(err.to_string())
    }
}

/// Alias for `Result<T, PianoError>`.
pub type Result<T> = std::result::Result<T, PianoError>;
