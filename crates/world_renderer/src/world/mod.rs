//! World view collaborator interface
//!
//! Entities are owned by the replication layer. The scene pipeline only sees
//! them through [`WorldView`] and [`WorldEntity`], which expose exactly the
//! fields rendering needs: transforms, bounding box, visibility, containment,
//! attachments and a few presentation hints. Entity references are plain
//! [`EntityId`] handles; nothing in the pipeline owns an entity.
//!
//! Updates from the network are applied between frames. During a scene pass
//! the pipeline has exclusive access to the view.

use crate::foundation::math::{AxisBox, Point3, Quat};

/// Stable identifier of a world entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An entity worn or carried by another, placed at a named anchor on the
/// carrier's model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Anchor (submodel) name on the carrier's model, e.g. `"right_hand"`
    pub anchor: String,
    /// The attached entity; `None` while the slot is empty
    pub entity: Option<EntityId>,
}

/// Projected screen position of an entity, used by speech bubbles and labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCoords {
    /// Pixels from the left edge
    pub x: i32,
    /// Pixels from the top edge
    pub y: i32,
}

/// Read access to one replicated entity
pub trait WorldEntity {
    /// Identifier of this entity
    fn id(&self) -> EntityId;

    /// Type tag, e.g. `"tree"` or `"fire"`
    fn type_name(&self) -> &str;

    /// Whether the entity (and so its whole subtree) should be drawn
    fn is_visible(&self) -> bool;

    /// Absolute position: composition of every ancestor transform, with
    /// terrain-resident entities clamped to the terrain height
    fn abs_pos(&self) -> Point3;

    /// Absolute orientation
    fn abs_orient(&self) -> Quat;

    /// Bounding box relative to the entity origin, if the entity has one
    fn bbox(&self) -> Option<AxisBox>;

    /// Contained child entities in container order
    fn contained(&self) -> &[EntityId];

    /// Worn/carried entities keyed by anchor name
    fn attachments(&self) -> &[Attachment];

    /// Numeric attribute lookup, e.g. `"status"` on a fire
    fn attribute_num(&self, name: &str) -> Option<f64>;

    /// Whether the entity has chat text waiting to be shown
    fn has_messages(&self) -> bool;

    /// Whether something asked for this entity's screen coordinates
    fn screen_coords_requested(&self) -> bool;
}

/// The replicated world as seen by the renderer
pub trait WorldView {
    /// Look up an entity
    fn entity(&self, id: EntityId) -> Option<&dyn WorldEntity>;

    /// Root of the entity tree
    fn top_level(&self) -> Option<EntityId>;

    /// The local player's avatar entity
    fn avatar(&self) -> Option<EntityId>;

    /// Whether the session is in an active, entity-populated state
    fn is_in_world(&self) -> bool;

    /// Place an attached entity relative to its carrier
    fn set_local_transform(&mut self, id: EntityId, position: Point3, orientation: Quat);

    /// Record (or invalidate with `None`) the entity's projected screen position
    fn set_screen_coords(&mut self, id: EntityId, coords: Option<ScreenCoords>);
}
