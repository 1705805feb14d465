//! Scenario tests for the whole scene pipeline


use crate::config::GraphicsConfig;
use crate::foundation::logging;
use crate::render::{compute_frustum, CameraView, QualitySelector, StateId, StateRegistry};
use crate::scene::{
    BuildSettings, ModelMappings, ModelRegistry, ModelTemplate, ObjectTemplate, RotationStyle,
    SceneBuilder, SceneQueues, SceneRenderer,
};
use crate::testing::{test_camera, EventLog, FakeModelProvider, FakeWorld, RecordingRenderer};
use crate::world::{EntityId, WorldView};

fn mappings() -> ModelMappings {
    let mut mappings = ModelMappings::default();
    let objects = &mut mappings.objects;
    objects.insert("world".into(), ObjectTemplate { draw_self: false, ..Default::default() });
    objects.insert(
        "tree".into(),
        ObjectTemplate {
            high: vec!["tree_hi".into()],
            medium: vec!["tree_lo".into()],
            low: vec!["tree_lo".into()],
            ..Default::default()
        },
    );
    objects.insert(
        "rock".into(),
        ObjectTemplate {
            high: vec!["rock_hi".into()],
            medium: vec!["rock_hi".into()],
            low: vec!["rock_lo".into()],
            ..Default::default()
        },
    );
    for (object, model) in [
        ("fire", "flames"),
        ("sign", "sign"),
        ("totem", "totem"),
        ("crate", "crate"),
        ("ghost", "ghost"),
    ] {
        objects.insert(object.into(), ObjectTemplate::single(model));
    }

    let models = &mut mappings.models;
    models.insert("tree_hi".into(), ModelTemplate::default());
    models.insert("tree_lo".into(), ModelTemplate::default());
    for id in ["rock_hi", "rock_lo"] {
        models.insert(id.into(), ModelTemplate { state: "terrain".into(), ..Default::default() });
    }
    models.insert(
        "flames".into(),
        ModelTemplate { state: "halo".into(), rotation_style: RotationStyle::Halo, ..Default::default() },
    );
    models.insert(
        "sign".into(),
        ModelTemplate {
            state: "billboard".into(),
            rotation_style: RotationStyle::Billboard,
            ..Default::default()
        },
    );
    models.insert(
        "totem".into(),
        ModelTemplate {
            offset: [0.0, 0.0, 1.0],
            rotate_z: 90.0,
            scale: 2.0,
            rotation_style: RotationStyle::ByPosition,
            ..Default::default()
        },
    );
    models.insert(
        "crate".into(),
        ModelTemplate { scale_bbox: true, rotation_style: RotationStyle::None, ..Default::default() },
    );
    models.insert("ghost".into(), ModelTemplate { outline: false, ..Default::default() });
    mappings
}

/// Scene builder over a fake world, without a renderer
struct Harness {
    world: FakeWorld,
    registry: ModelRegistry,
    states: StateRegistry,
    camera: CameraView,
    config: GraphicsConfig,
}

impl Harness {
    fn new() -> Self {
        let config = GraphicsConfig::default();
        Self {
            world: FakeWorld::new(),
            registry: ModelRegistry::new(mappings(), Box::new(FakeModelProvider::new())),
            states: StateRegistry::with_defaults(&config),
            camera: test_camera(),
            config,
        }
    }

    fn build(&mut self, select_mode: bool) -> SceneQueues {
        let settings = BuildSettings {
            camera: &self.camera,
            frustum: compute_frustum(&self.camera.projection, &self.camera.view),
            quality: QualitySelector::from(&self.config),
            select_mode,
            emissive_types: &self.config.emissive_types,
            fire: &self.config.fire,
        };
        let root = self.world.top_level().expect("world has a root");
        SceneBuilder::new(&mut self.world, &mut self.registry, &mut self.states, settings).build_queues(root)
    }

    fn state(&self, name: &str) -> StateId {
        self.states.state_id(name).expect("state is registered")
    }
}

/// Every queued entity, bucket by bucket
fn queued_entities(queues: &SceneQueues) -> Vec<EntityId> {
    queues
        .render_queue
        .buckets()
        .iter()
        .flat_map(|bucket| bucket.items.iter().map(|item| item.entity))
        .collect()
}

/// A scene renderer with a live context over a recording renderer
fn scene_renderer() -> (SceneRenderer<RecordingRenderer>, EventLog) {
    logging::init_with_level(log::LevelFilter::Debug);

    let provider = FakeModelProvider::new();
    let events = provider.event_log();
    let mut renderer = RecordingRenderer::new();
    renderer.window_height = 100;

    let mut scene = SceneRenderer::new(renderer, GraphicsConfig::default(), mappings(), Box::new(provider));
    scene.set_camera(test_camera());
    scene.context_created();
    (scene, events)
}
