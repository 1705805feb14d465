//! Scene composition and drawing
//!
//! Every frame the entity tree is walked from the top and turned into render
//! queues, which are then drawn bucket by bucket:
//!
//! ```text
//! WorldView (replicated entities)
//!      ↓
//! SceneBuilder  → RenderQueue + name list + message list + lights
//!      ↓
//! FrameRenderer → Renderer primitives
//! ```
//!
//! There is no persistent scene graph; queues are rebuilt from scratch each
//! frame. Picking is the same pipeline run in select mode.

mod frame_renderer;
mod mappings;
mod model_record;
mod model_registry;
mod object_record;
mod picking;
mod render_queue;
mod scene_builder;
mod scene_renderer;

#[cfg(test)]
mod tests;

pub use frame_renderer::{spin_angle, DrawOptions, FrameRenderer};
pub use mappings::{ModelMappings, ModelTemplate, ObjectTemplate};
pub use model_record::{ModelRecord, RotationStyle};
pub use model_registry::{Model, ModelKey, ModelProvider, ModelRegistry};
pub use object_record::ObjectRecord;
pub use picking::{flip_y, read_pick, ActiveEntity};
pub use render_queue::{FrameStats, QueueItem, RenderQueue, SceneQueues, StateBucket};
pub use scene_builder::{BuildSettings, SceneBuilder};
pub use scene_renderer::{commands, SceneRenderer};
