//! Resolved model placement and state

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec3;
use crate::render::StateId;
use crate::scene::model_registry::Model;

/// How a model is rotated when drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationStyle {
    /// Drawn axis-aligned
    None,
    /// Spun about the vertical axis by an angle derived from the position
    ByPosition,
    /// The entity's own orientation
    #[default]
    Normal,
    /// Turned about the vertical axis to face the camera
    Billboard,
    /// Fully turned to face the camera
    Halo,
}

/// A loaded model for one (model identifier, entity) pair plus its placement
pub struct ModelRecord {
    /// Model identifier the record was created from
    pub model_id: String,
    /// The loaded model
    pub model: Box<dyn Model>,
    /// Render state for normal drawing
    pub state: StateId,
    /// Render state for the selection pass and highlights
    pub select_state: StateId,
    /// Translation applied after moving to the entity position
    pub offset: Vec3,
    /// Fixed rotation about the vertical axis, in degrees
    pub rotate_z: f32,
    /// Uniform scale; 0 and 1 mean unscaled
    pub scale: f32,
    /// Scale to the entity's bounding box
    pub scale_bbox: bool,
    /// Rotation policy
    pub rotation_style: RotationStyle,
    /// Stencil outline when active
    pub outline: bool,
}

impl ModelRecord {
    /// State the record is queued under for a pass
    pub fn state_for(&self, select_mode: bool) -> StateId {
        if select_mode {
            self.select_state
        } else {
            self.state
        }
    }
}

impl std::fmt::Debug for ModelRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRecord")
            .field("model_id", &self.model_id)
            .field("state", &self.state)
            .field("select_state", &self.select_state)
            .field("rotation_style", &self.rotation_style)
            .field("outline", &self.outline)
            .finish_non_exhaustive()
    }
}
