//! Entity type to model mappings
//!
//! Each entity type names the models it is drawn with at each quality tier,
//! and each model names its loader, data file, render states and placement
//! corrections. Mappings are plain data, loaded through [`Config`].
//!
//! ```ron
//! (
//!     objects: {
//!         "tree": (high: ["oak_hi"], medium: ["oak_lo"], low: ["oak_billboard"]),
//!     },
//!     models: {
//!         "oak_billboard": (loader: "billboard", state: "billboard", rotation_style: billboard),
//!     },
//!     default_object: Some("generic"),
//! )
//! ```

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::config::Config;
use crate::render::QualityTier;
use crate::scene::model_record::RotationStyle;

/// How an entity type is drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectTemplate {
    /// Models used close to the camera
    pub high: Vec<String>,
    /// Models used at mid range
    pub medium: Vec<String>,
    /// Models used far away
    pub low: Vec<String>,
    /// Draw the entity's own models
    pub draw_self: bool,
    /// Descend into contained entities
    pub draw_members: bool,
    /// Draw worn and carried entities at their anchors
    pub draw_attached: bool,
}

impl Default for ObjectTemplate {
    fn default() -> Self {
        Self {
            high: Vec::new(),
            medium: Vec::new(),
            low: Vec::new(),
            draw_self: true,
            draw_members: true,
            draw_attached: true,
        }
    }
}

impl ObjectTemplate {
    /// A template drawing the same single model at every tier
    pub fn single(model: &str) -> Self {
        Self {
            high: vec![model.to_string()],
            medium: vec![model.to_string()],
            low: vec![model.to_string()],
            ..Self::default()
        }
    }

    /// Model identifiers for a quality tier
    pub fn models_for(&self, tier: QualityTier) -> &[String] {
        match tier {
            QualityTier::High => &self.high,
            QualityTier::Medium => &self.medium,
            QualityTier::Low => &self.low,
        }
    }
}

/// How one model is loaded and placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelTemplate {
    /// Loader name understood by the model provider, e.g. `"3ds"` or `"cal3d"`
    pub loader: String,
    /// Data file identifier handed to the loader
    pub data_file: String,
    /// Render state for normal drawing
    pub state: String,
    /// Render state for the selection pass and highlights
    pub select_state: String,
    /// Translation applied after moving to the entity position
    pub offset: [f32; 3],
    /// Fixed rotation about the vertical axis, in degrees
    pub rotate_z: f32,
    /// Uniform scale; 0 and 1 mean unscaled
    pub scale: f32,
    /// Scale the model to the entity's bounding box
    pub scale_bbox: bool,
    /// Rotation policy
    pub rotation_style: RotationStyle,
    /// Use the stencil outline when the model is the active entity;
    /// otherwise it gets the translucent highlight
    pub outline: bool,
}

impl Default for ModelTemplate {
    fn default() -> Self {
        Self {
            loader: String::new(),
            data_file: String::new(),
            state: "models".to_string(),
            select_state: "select".to_string(),
            offset: [0.0; 3],
            rotate_z: 0.0,
            scale: 1.0,
            scale_bbox: false,
            rotation_style: RotationStyle::Normal,
            outline: true,
        }
    }
}

/// Every object and model mapping known to the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelMappings {
    /// Object templates keyed by entity type
    pub objects: BTreeMap<String, ObjectTemplate>,
    /// Model templates keyed by model identifier
    pub models: BTreeMap<String, ModelTemplate>,
    /// Entity type whose template is used for unmapped types
    pub default_object: Option<String>,
}

impl Config for ModelMappings {}

impl ModelMappings {
    /// Template for an entity type, falling back to the default object type
    pub fn object(&self, type_name: &str) -> Option<&ObjectTemplate> {
        self.objects.get(type_name).or_else(|| {
            self.default_object
                .as_deref()
                .and_then(|fallback| self.objects.get(fallback))
        })
    }

    /// Template for a model identifier
    pub fn model(&self, model_id: &str) -> Option<&ModelTemplate> {
        self.models.get(model_id)
    }
}
