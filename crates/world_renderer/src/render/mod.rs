//! Rendering services used by the scene pipeline
//!
//! - [`api`]: the graphics binding the pipeline draws through
//! - [`frustum`]: view frustum extraction and sphere culling
//! - [`quality`]: distance-based model quality tiers
//! - [`state`]: named render states and diff-based state switching
//! - [`pick_colour`]: colour-coded object picking
//! - [`lighting`]: dynamic lights for emissive props
//! - [`camera`]: per-frame camera description

pub mod api;
pub mod camera;
pub mod frustum;
pub mod lighting;
pub mod pick_colour;
pub mod quality;
pub mod state;

pub use api::{
    AlphaFunction, BlendFactor, Material, PolygonMode, Primitive, Renderer, RendererCapabilities,
    Rgb, StateSink, StencilMode, TextureHandle, Winding,
};
pub use camera::{CameraMode, CameraView};
pub use frustum::{compute_frustum, sphere_in_frustum, Frustum, Plane};
pub use lighting::{Light, LightManager};
pub use pick_colour::PickColourTable;
pub use quality::{QualitySelector, QualityTier};
pub use state::{StateFlags, StateId, StateProperties, StateRegistry, StateTable};

use crate::config::ConfigError;

/// Errors surfaced by the scene pipeline
///
/// None of these abort a frame: callers log them and skip the affected object.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No object mapping exists for an entity type
    #[error("No object mapping for entity type '{0}'")]
    UnknownObjectType(String),

    /// A model identifier has no model definition
    #[error("No model definition for '{0}'")]
    UnknownModel(String),

    /// The model provider failed to build a model
    #[error("Failed to load model '{model}': {reason}")]
    ModelLoadFailed {
        /// Model identifier that failed
        model: String,
        /// Provider supplied reason
        reason: String,
    },

    /// Every pick colour in the table is already allocated this pass
    #[error("Pick colour table exhausted ({capacity} slots)")]
    PickCapacityExceeded {
        /// Number of slots in the table
        capacity: usize,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
