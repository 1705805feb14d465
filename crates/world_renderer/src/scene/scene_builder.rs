//! Render queue construction
//!
//! Walks the entity tree once per frame, pre-order: an entity, then its
//! attachments, then its contained entities. Hidden entities hide their whole
//! subtree. Each drawn entity contributes its models for the quality tier
//! matching its camera distance, bucketed by render state.

use crate::config::FireLightConfig;
use crate::render::{
    sphere_in_frustum, CameraMode, CameraView, Frustum, Light, QualitySelector, StateRegistry,
};
use crate::scene::model_registry::{ModelKey, ModelRegistry};
use crate::scene::render_queue::{QueueItem, SceneQueues};
use crate::world::{EntityId, WorldView};

/// Attribute holding a fire's intensity in `[0, 1]`
const STATUS_ATTRIBUTE: &str = "status";

/// Per-frame inputs of a build, captured once so that configuration changes
/// only apply from the next frame
#[derive(Debug, Clone, Copy)]
pub struct BuildSettings<'a> {
    /// Camera for this frame
    pub camera: &'a CameraView,
    /// Frustum derived from the camera
    pub frustum: Frustum,
    /// Quality thresholds
    pub quality: QualitySelector,
    /// Building for the selection pass
    pub select_mode: bool,
    /// Entity types that emit light
    pub emissive_types: &'a [String],
    /// Light parameters for emissive types
    pub fire: &'a FireLightConfig,
}

/// Builds the render queue, name list and message list for one frame
pub struct SceneBuilder<'a> {
    world: &'a mut dyn WorldView,
    registry: &'a mut ModelRegistry,
    states: &'a mut StateRegistry,
    settings: BuildSettings<'a>,
    avatar: Option<EntityId>,
}

impl<'a> SceneBuilder<'a> {
    /// Create a builder over the world and the render-side registries
    pub fn new(
        world: &'a mut dyn WorldView,
        registry: &'a mut ModelRegistry,
        states: &'a mut StateRegistry,
        settings: BuildSettings<'a>,
    ) -> Self {
        let avatar = world.avatar();
        Self { world, registry, states, settings, avatar }
    }

    /// Walk the tree below (and including) `root`
    pub fn build_queues(mut self, root: EntityId) -> SceneQueues {
        let mut queues = SceneQueues::default();
        self.visit(root, &mut queues);

        log::trace!(
            "Built scene: {} models in {} states, {} culled, {} skipped",
            queues.stats.objects_queued,
            queues.render_queue.bucket_count(),
            queues.stats.objects_culled,
            queues.stats.objects_skipped
        );
        queues
    }

    fn visit(&mut self, id: EntityId, queues: &mut SceneQueues) {
        let Some(entity) = self.world.entity(id) else {
            panic!("scene traversal reached entity {} which is not in the world view", id);
        };
        if !entity.is_visible() {
            return;
        }

        let contained = entity.contained().to_vec();
        let Some(record) = self.registry.object_record(entity) else {
            queues.stats.objects_skipped += 1;
            for child in contained {
                self.visit(child, queues);
            }
            return;
        };
        let (draw_self, draw_members, draw_attached) =
            (record.draw_self(), record.draw_members(), record.draw_attached());

        let position = entity.abs_pos();
        if self.settings.emissive_types.iter().any(|t| t == entity.type_name()) {
            let status = entity.attribute_num(STATUS_ATTRIBUTE).unwrap_or(1.0) as f32;
            queues.lights.push(Light::fire(position, status, self.settings.fire));
        }

        let first_person_self =
            self.settings.camera.mode == CameraMode::FirstPerson && self.avatar == Some(id);

        let mut culled = false;
        let mut anchor_model: Option<ModelKey> = None;
        if draw_self && !first_person_self {
            if sphere_in_frustum(&self.settings.frustum, entity.bbox().as_ref(), &position) {
                let tier = self.settings.quality.select(self.settings.camera.distance_sq(&position));
                let keys = self.registry.resolve_models(entity, tier, self.states);
                let wanted = self.registry.object(id).map_or(0, |r| r.models_for(tier).len());
                queues.stats.objects_skipped += wanted.saturating_sub(keys.len());

                for &key in &keys {
                    if let Some(model) = self.registry.model(key) {
                        let state = model.state_for(self.settings.select_mode);
                        queues.render_queue.push(state, QueueItem { entity: id, model: key });
                        queues.stats.objects_queued += 1;
                    }
                }

                queues.name_list.push(id);
                if entity.has_messages() || entity.screen_coords_requested() {
                    queues.message_list.push(id);
                }
                anchor_model = keys.first().copied();
            } else {
                culled = true;
            }
        }
        let attachments = if draw_attached && anchor_model.is_some() {
            entity.attachments().to_vec()
        } else {
            Vec::new()
        };

        if culled {
            self.world.set_screen_coords(id, None);
            queues.stats.objects_culled += 1;
        }

        if let Some(key) = anchor_model {
            for attachment in attachments {
                let Some(child) = attachment.entity else {
                    continue;
                };
                let pose = self
                    .registry
                    .model(key)
                    .and_then(|record| record.model.position_for_submodel(&attachment.anchor));
                match pose {
                    Some(pose) => self.world.set_local_transform(child, pose.position, pose.orientation),
                    None => log::trace!("No anchor '{}' on model for {}", attachment.anchor, id),
                }
                self.visit(child, queues);
            }
        }

        if draw_members {
            for child in contained {
                self.visit(child, queues);
            }
        }
    }
}
