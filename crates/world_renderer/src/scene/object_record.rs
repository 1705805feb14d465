//! Per-entity render bookkeeping

use crate::foundation::math::{AxisBox, Point3, Quat};
use crate::render::QualityTier;
use crate::scene::mappings::ObjectTemplate;
use crate::world::{EntityId, WorldEntity};

/// Render-side record for one entity with a type mapping.
///
/// Holds a snapshot of the entity's transform and bounds, refreshed every
/// time the scene is built, so that the frame renderer never has to go back
/// to the world view.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    /// The entity this record belongs to
    pub entity: EntityId,
    /// Entity type the record was created for
    pub type_name: String,
    /// Absolute position at the last refresh
    pub position: Point3,
    /// Absolute orientation at the last refresh
    pub orientation: Quat,
    /// Bounding box at the last refresh
    pub bbox: Option<AxisBox>,
    /// Tiered model lists and draw flags
    pub template: ObjectTemplate,
}

impl ObjectRecord {
    /// Create a record for an entity from its type's template
    pub fn new(entity: &dyn WorldEntity, template: ObjectTemplate) -> Self {
        Self {
            entity: entity.id(),
            type_name: entity.type_name().to_string(),
            position: entity.abs_pos(),
            orientation: entity.abs_orient(),
            bbox: entity.bbox(),
            template,
        }
    }

    /// Copy the entity's current transform and bounds
    pub fn refresh(&mut self, entity: &dyn WorldEntity) {
        self.position = entity.abs_pos();
        self.orientation = entity.abs_orient();
        self.bbox = entity.bbox();
    }

    /// Model identifiers for a quality tier
    pub fn models_for(&self, tier: QualityTier) -> &[String] {
        self.template.models_for(tier)
    }

    /// Whether the entity's own models are drawn
    pub fn draw_self(&self) -> bool {
        self.template.draw_self
    }

    /// Whether contained entities are visited
    pub fn draw_members(&self) -> bool {
        self.template.draw_members
    }

    /// Whether attached entities are drawn
    pub fn draw_attached(&self) -> bool {
        self.template.draw_attached
    }
}
