//! Object and model registry
//!
//! Owns the [`ObjectRecord`] of every mapped entity and the [`ModelRecord`]s
//! loaded for them. Models are created lazily through a [`ModelProvider`] the
//! first time an entity needs them at a given tier and cached per
//! (model identifier, entity) pair until the entity leaves the world or the
//! cache is invalidated.

use std::collections::{HashMap, HashSet};

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::{PosAndOrient, Vec3};
use crate::render::{
    QualityTier, RenderError, RenderResult, Renderer, StateId, StateProperties, StateRegistry,
};
use crate::scene::mappings::{ModelMappings, ModelTemplate};
use crate::scene::model_record::ModelRecord;
use crate::scene::object_record::ObjectRecord;
use crate::world::{EntityId, WorldEntity};

new_key_type! {
    /// Handle to a cached [`ModelRecord`]
    pub struct ModelKey;
}

/// A drawable model instance
///
/// GPU resources belong to the model. After [`context_destroyed`](Model::context_destroyed)
/// they must be recreated lazily on the next [`render`](Model::render), never
/// from inside the destroy notification.
pub trait Model {
    /// Advance animation by `elapsed` seconds
    fn update(&mut self, elapsed: f32);

    /// Record the frame time of the last update
    fn set_last_time(&mut self, time: f32);

    /// Draw with the current transform. In select mode the model must not
    /// change the draw colour, texture or lighting.
    fn render(&mut self, renderer: &mut dyn Renderer, select_mode: bool);

    /// Pose of a named anchor (submodel) relative to the model origin
    fn position_for_submodel(&self, anchor: &str) -> Option<PosAndOrient>;

    /// The graphics context is available again
    fn context_created(&mut self) {}

    /// The graphics context is going away; `force_release` means its
    /// resources are already gone and must only be forgotten
    fn context_destroyed(&mut self, _force_release: bool) {}
}

/// Builds models from their templates
pub trait ModelProvider {
    /// Load the model `model_id` for an entity
    fn load_model(
        &mut self,
        model_id: &str,
        template: &ModelTemplate,
        entity: &dyn WorldEntity,
    ) -> RenderResult<Box<dyn Model>>;
}

/// Registry of object records and cached models
pub struct ModelRegistry {
    mappings: ModelMappings,
    provider: Box<dyn ModelProvider>,
    objects: HashMap<EntityId, ObjectRecord>,
    models: SlotMap<ModelKey, ModelRecord>,
    model_index: HashMap<(String, EntityId), ModelKey>,
    failed: HashSet<(String, EntityId)>,
    warned: HashSet<String>,
}

impl ModelRegistry {
    /// Create a registry over a set of mappings and a model provider
    pub fn new(mappings: ModelMappings, provider: Box<dyn ModelProvider>) -> Self {
        Self {
            mappings,
            provider,
            objects: HashMap::new(),
            models: SlotMap::with_key(),
            model_index: HashMap::new(),
            failed: HashSet::new(),
            warned: HashSet::new(),
        }
    }

    /// Current mappings
    pub fn mappings(&self) -> &ModelMappings {
        &self.mappings
    }

    /// Record for an entity, created from its type mapping on first use and
    /// refreshed from the entity every call. `None` when the type is unmapped.
    pub fn object_record(&mut self, entity: &dyn WorldEntity) -> Option<&ObjectRecord> {
        let id = entity.id();
        if let Some(record) = self.objects.get_mut(&id) {
            if record.type_name == entity.type_name() {
                record.refresh(entity);
                return self.objects.get(&id);
            }
            log::debug!("Entity {} changed type to '{}'", id, entity.type_name());
            self.remove_entity(id);
        }

        let Some(template) = self.mappings.object(entity.type_name()) else {
            self.warn_once(
                entity.type_name(),
                &RenderError::UnknownObjectType(entity.type_name().to_string()),
            );
            return None;
        };

        let record = ObjectRecord::new(entity, template.clone());
        log::trace!("Created object record for {} ('{}')", id, record.type_name);
        Some(&*self.objects.entry(id).or_insert(record))
    }

    /// Record for an entity, without creating or refreshing it
    pub fn object(&self, id: EntityId) -> Option<&ObjectRecord> {
        self.objects.get(&id)
    }

    /// Resolve every model the entity uses at `tier`, loading the ones not yet
    /// cached. Models that fail to resolve are logged and left out.
    ///
    /// The entity must already have an object record.
    pub fn resolve_models(
        &mut self,
        entity: &dyn WorldEntity,
        tier: QualityTier,
        states: &mut StateRegistry,
    ) -> Vec<ModelKey> {
        let id = entity.id();
        let Some(record) = self.objects.get(&id) else {
            return Vec::new();
        };

        let mut keys = Vec::with_capacity(record.models_for(tier).len());
        for model_id in record.models_for(tier) {
            let cache_key = (model_id.clone(), id);
            if let Some(&key) = self.model_index.get(&cache_key) {
                keys.push(key);
                continue;
            }
            if self.failed.contains(&cache_key) {
                continue;
            }

            match Self::load(&self.mappings, self.provider.as_mut(), model_id, entity, states) {
                Ok(model) => {
                    let key = self.models.insert(model);
                    self.model_index.insert(cache_key, key);
                    keys.push(key);
                }
                Err(err) => {
                    if self.warned.insert(model_id.clone()) {
                        log::warn!("{} (entity {})", err, id);
                    }
                    self.failed.insert(cache_key);
                }
            }
        }
        keys
    }

    fn load(
        mappings: &ModelMappings,
        provider: &mut dyn ModelProvider,
        model_id: &str,
        entity: &dyn WorldEntity,
        states: &mut StateRegistry,
    ) -> RenderResult<ModelRecord> {
        let template = mappings
            .model(model_id)
            .ok_or_else(|| RenderError::UnknownModel(model_id.to_string()))?;
        let model = provider.load_model(model_id, template, entity)?;

        log::debug!("Loaded model '{}' for entity {}", model_id, entity.id());
        Ok(ModelRecord {
            model_id: model_id.to_string(),
            model,
            state: resolve_state(states, &template.state),
            select_state: resolve_state(states, &template.select_state),
            offset: Vec3::from(template.offset),
            rotate_z: template.rotate_z,
            scale: template.scale,
            scale_bbox: template.scale_bbox,
            rotation_style: template.rotation_style,
            outline: template.outline,
        })
    }

    /// A cached model record
    pub fn model(&self, key: ModelKey) -> Option<&ModelRecord> {
        self.models.get(key)
    }

    /// A cached model record, mutably
    pub fn model_mut(&mut self, key: ModelKey) -> Option<&mut ModelRecord> {
        self.models.get_mut(key)
    }

    /// Number of object records
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of cached models
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Forget an entity that left the world, with every model loaded for it
    pub fn remove_entity(&mut self, id: EntityId) {
        self.objects.remove(&id);
        let models = &mut self.models;
        self.model_index.retain(|(_, owner), key| {
            if *owner == id {
                models.remove(*key);
                false
            } else {
                true
            }
        });
        self.failed.retain(|(_, owner)| *owner != id);
    }

    /// Drop every cached model. Object records survive.
    pub fn invalidate(&mut self) {
        log::debug!("Dropping {} cached models", self.models.len());
        for record in self.models.values_mut() {
            record.model.context_destroyed(true);
        }
        self.models.clear();
        self.model_index.clear();
        self.failed.clear();
    }

    /// Tell every cached model the context is available
    pub fn context_created(&mut self) {
        for record in self.models.values_mut() {
            record.model.context_created();
        }
    }

    /// Tell every cached model the context is going away
    pub fn context_destroyed(&mut self, force_release: bool) {
        for record in self.models.values_mut() {
            record.model.context_destroyed(force_release);
        }
    }

    fn warn_once(&mut self, key: &str, err: &RenderError) {
        if self.warned.insert(key.to_string()) {
            log::warn!("{}", err);
        }
    }
}

/// State id for a name, falling back to `"default"` for unknown names
fn resolve_state(states: &mut StateRegistry, name: &str) -> StateId {
    if let Some(id) = states.state_id(name) {
        return id;
    }
    log::warn!("Unknown render state '{}', using 'default'", name);
    match states.state_id("default") {
        Some(id) => id,
        None => states.register_state("default", StateProperties::default()),
    }
}
