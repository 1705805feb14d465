//! Per-frame render queues
//!
//! The scene builder groups queued models by render state so that each state
//! is switched to once per frame. Buckets keep the order in which their state
//! was first seen during traversal, and items within a bucket keep traversal
//! order. Nothing is sorted by distance.

use std::collections::HashMap;

use crate::render::{Light, StateId};
use crate::scene::model_registry::ModelKey;
use crate::world::EntityId;

/// One model of one entity, queued for drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueItem {
    /// The entity being drawn
    pub entity: EntityId,
    /// The model to draw it with
    pub model: ModelKey,
}

/// Items sharing a render state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateBucket {
    /// State every item is drawn in
    pub state: StateId,
    /// Items in traversal order
    pub items: Vec<QueueItem>,
}

/// Render queue for a frame, bucketed by render state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderQueue {
    buckets: Vec<StateBucket>,
    index: HashMap<StateId, usize>,
}

impl RenderQueue {
    /// Create an empty render queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to the bucket for `state`, creating the bucket at the
    /// end of the queue if this is the first item in that state
    pub fn push(&mut self, state: StateId, item: QueueItem) {
        let buckets = &mut self.buckets;
        let slot = *self.index.entry(state).or_insert_with(|| {
            buckets.push(StateBucket { state, items: Vec::new() });
            buckets.len() - 1
        });
        self.buckets[slot].items.push(item);
    }

    /// Buckets in drawing order
    pub fn buckets(&self) -> &[StateBucket] {
        &self.buckets
    }

    /// Items queued under `state`
    pub fn bucket(&self, state: StateId) -> Option<&[QueueItem]> {
        self.index.get(&state).map(|&slot| self.buckets[slot].items.as_slice())
    }

    /// Get the number of buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Get total number of queued items
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.items.len()).sum()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Remove every bucket
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.index.clear();
    }
}

/// Counters for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Models queued for drawing
    pub objects_queued: usize,
    /// Entities rejected by frustum culling
    pub objects_culled: usize,
    /// Entities or models skipped because they could not be resolved
    pub objects_skipped: usize,
    /// Render state transitions actually performed
    pub state_switches: usize,
}

/// Everything the scene builder produces for a frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneQueues {
    /// Models to draw, by state
    pub render_queue: RenderQueue,
    /// Entities with speech bubbles or screen-coordinate requests
    pub message_list: Vec<EntityId>,
    /// Entities eligible for a name label
    pub name_list: Vec<EntityId>,
    /// Lights registered by emissive props
    pub lights: Vec<Light>,
    /// Frame counters
    pub stats: FrameStats,
}
