//! Scene renderer - the frame loop's entry point
//!
//! Owns the graphics binding and every render-side service (state registry,
//! model registry, pick table, light manager) and runs the per-frame pipeline:
//!
//! 1. Extract the frustum from the camera
//! 2. Build the render queue, name list and message list from the world
//! 3. Apply the frame's dynamic lights
//! 4. Draw the queue, one state switch per bucket
//!
//! Picking runs the same pipeline in select mode and reads back one pixel.

use crate::config::{ConfigStore, GraphicsConfig};
use crate::render::{
    compute_frustum, CameraView, LightManager, PickColourTable, QualitySelector, Renderer,
    RendererCapabilities, StateRegistry, StateTable,
};
use crate::scene::frame_renderer::{DrawOptions, FrameRenderer};
use crate::scene::mappings::ModelMappings;
use crate::scene::model_registry::{ModelProvider, ModelRegistry};
use crate::scene::picking::{read_pick, ActiveEntity};
use crate::scene::render_queue::{FrameStats, SceneQueues};
use crate::scene::scene_builder::{BuildSettings, SceneBuilder};
use crate::world::{EntityId, WorldView};

/// Console commands understood by [`SceneRenderer::run_command`]
pub mod commands {
    /// Drop and recreate every context resource
    pub const INVALIDATE: &str = "invalidate";
    /// Show entity name labels
    pub const SHOW_NAMES: &str = "+show_names";
    /// Hide entity name labels
    pub const HIDE_NAMES: &str = "-show_names";
    /// Draw the selection pass on screen instead of the normal frame
    pub const SELECT_MODE_ON: &str = "+select_mode";
    /// Back to normal drawing
    pub const SELECT_MODE_OFF: &str = "-select_mode";

    /// Every command, for registration with a console
    pub const ALL: [&str; 5] = [INVALIDATE, SHOW_NAMES, HIDE_NAMES, SELECT_MODE_ON, SELECT_MODE_OFF];
}

/// Scene renderer for the world view
pub struct SceneRenderer<R: Renderer> {
    renderer: R,
    config: GraphicsConfig,
    capabilities: RendererCapabilities,
    states: StateRegistry,
    state_table: Option<StateTable>,
    registry: ModelRegistry,
    picks: PickColourTable,
    lights: LightManager,
    active: ActiveEntity,
    camera: CameraView,
    context_alive: bool,
    debug_select: bool,
    clock: f32,
    name_list: Vec<EntityId>,
    message_list: Vec<EntityId>,
    last_stats: FrameStats,
}

impl<R: Renderer> SceneRenderer<R> {
    /// Create a scene renderer. Nothing can be drawn until
    /// [`context_created`](Self::context_created) has been called.
    pub fn new(
        renderer: R,
        config: GraphicsConfig,
        mappings: ModelMappings,
        provider: Box<dyn ModelProvider>,
    ) -> Self {
        let capabilities = renderer.capabilities();
        Self {
            states: StateRegistry::with_defaults(&config),
            picks: PickColourTable::from_capabilities(&capabilities, config.pick_limit),
            registry: ModelRegistry::new(mappings, provider),
            renderer,
            config,
            capabilities,
            state_table: None,
            lights: LightManager::default(),
            active: ActiveEntity::default(),
            camera: CameraView::default(),
            context_alive: false,
            debug_select: false,
            clock: 0.0,
            name_list: Vec::new(),
            message_list: Vec::new(),
            last_stats: FrameStats::default(),
        }
    }

    /// The graphics binding
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The graphics binding, mutably
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Current graphics settings
    pub fn config(&self) -> &GraphicsConfig {
        &self.config
    }

    /// Render state registry
    pub fn states(&self) -> &StateRegistry {
        &self.states
    }

    /// Object and model registry
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Object and model registry, mutably
    pub fn registry_mut(&mut self) -> &mut ModelRegistry {
        &mut self.registry
    }

    /// Set the camera used from the next frame on
    pub fn set_camera(&mut self, camera: CameraView) {
        self.camera = camera;
    }

    /// Register state definitions over the built-in ones
    pub fn load_state_table(&mut self, table: StateTable) {
        self.states.apply_table(&table);
        self.state_table = Some(table);
    }

    /// The graphics context exists (again). Re-reads the renderer's
    /// capabilities and forgets the active render state.
    pub fn context_created(&mut self) {
        self.capabilities = self.renderer.capabilities();
        self.picks = PickColourTable::from_capabilities(&self.capabilities, self.config.pick_limit);
        self.states.invalidate();
        self.registry.context_created();
        self.context_alive = true;
        log::info!(
            "Graphics context created (stencil: {}, colour bits: {:?})",
            self.capabilities.stencil_buffer,
            self.capabilities.colour_bits
        );
    }

    /// The graphics context is going away. Models release their resources
    /// and reacquire them lazily once a context exists again.
    pub fn context_destroyed(&mut self, force_release: bool) {
        self.context_alive = false;
        self.registry.context_destroyed(force_release);
        self.states.invalidate();
        log::info!("Graphics context destroyed (force release: {})", force_release);
    }

    /// Draw one frame of the world. A select pass draws flat pick colours
    /// into the back buffer without presenting it.
    ///
    /// # Panics
    ///
    /// Panics if no graphics context is alive.
    pub fn draw_scene(&mut self, world: &mut dyn WorldView, select_mode: bool, elapsed: f32) {
        assert!(self.context_alive, "draw_scene called without a live graphics context");

        let pick_pass = select_mode || self.debug_select;
        if !select_mode {
            self.clock += elapsed;
        }

        self.renderer.begin_frame();
        if pick_pass {
            self.picks.reset_selection();
            match self.picks.reserve_background() {
                Ok(background) => self.renderer.clear_colour_buffer(background),
                Err(err) => log::warn!("{}", err),
            }
        }
        self.lights.reset(&mut self.renderer);

        let mut queues = match world.top_level() {
            Some(root) => {
                let settings = BuildSettings {
                    camera: &self.camera,
                    frustum: compute_frustum(&self.camera.projection, &self.camera.view),
                    quality: QualitySelector::from(&self.config),
                    select_mode: pick_pass,
                    emissive_types: &self.config.emissive_types,
                    fire: &self.config.fire,
                };
                SceneBuilder::new(world, &mut self.registry, &mut self.states, settings).build_queues(root)
            }
            None => SceneQueues::default(),
        };

        if !pick_pass {
            for light in &queues.lights {
                self.lights.apply(&mut self.renderer, light);
            }
        }

        let options = DrawOptions {
            select_mode: pick_pass,
            elapsed,
            time: self.clock,
            active: self.active.get(),
            use_stencil: self.config.use_stencil && self.capabilities.stencil_buffer,
        };
        let drawn = FrameRenderer::new(
            &mut self.renderer,
            &mut self.states,
            &mut self.registry,
            &mut self.picks,
            &self.camera,
            options,
        )
        .draw_queue(&queues.render_queue);

        self.renderer.end_frame(select_mode);
        if cfg!(debug_assertions) {
            if let Some(err) = self.renderer.take_error() {
                log::error!("Graphics error during frame: {}", err);
            }
        }

        queues.stats.state_switches = drawn.state_switches;
        queues.stats.objects_skipped += drawn.objects_skipped;
        self.last_stats = queues.stats;
        if !select_mode {
            self.name_list = queues.name_list;
            self.message_list = queues.message_list;
        }
    }

    /// Resolve the entity under a pointer position (window coordinates, origin
    /// top-left) and make it the active entity. Does nothing outside the world.
    pub fn proc_event(&mut self, world: &mut dyn WorldView, x: i32, y: i32) -> Option<EntityId> {
        if !world.is_in_world() || !self.context_alive {
            return self.active.get();
        }

        self.draw_scene(world, true, 0.0);
        let picked = read_pick(&mut self.renderer, &self.picks, x, y);
        self.active.update(picked);
        self.active.get()
    }

    /// Entity under the pointer at the last pick
    pub fn active_entity(&self) -> Option<EntityId> {
        self.active.get()
    }

    /// Entities eligible for name labels in the last frame
    pub fn name_list(&self) -> &[EntityId] {
        &self.name_list
    }

    /// Entities with speech bubbles or screen-coordinate requests in the last frame
    pub fn message_list(&self) -> &[EntityId] {
        &self.message_list
    }

    /// Whether name labels should be drawn
    pub fn show_names(&self) -> bool {
        self.config.show_names
    }

    /// Counters of the last pass
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// An entity left the world
    pub fn remove_entity(&mut self, id: EntityId) {
        self.registry.remove_entity(id);
        if self.active.get() == Some(id) {
            self.active.clear();
        }
    }

    /// Load graphics settings from the config store
    pub fn read_config(&mut self, store: &dyn ConfigStore) {
        let config = GraphicsConfig::read_from(store);
        let rebuild_states = config.use_textures != self.config.use_textures
            || config.use_lighting != self.config.use_lighting;
        let resize_picks = config.pick_limit != self.config.pick_limit;
        self.config = config;

        if rebuild_states {
            // Names register in a fixed order, so state ids survive the rebuild
            self.states = StateRegistry::with_defaults(&self.config);
            if let Some(table) = &self.state_table {
                self.states.apply_table(table);
            }
        }
        if resize_picks {
            self.picks = PickColourTable::from_capabilities(&self.capabilities, self.config.pick_limit);
        }
    }

    /// Save graphics settings to the config store
    pub fn write_config(&self, store: &mut dyn ConfigStore) {
        self.config.write_to(store);
    }

    /// A key in the config store changed. Takes effect from the next frame.
    pub fn config_changed(&mut self, section: &str, key: &str, store: &dyn ConfigStore) {
        self.config.apply_change(section, key, store);
    }

    /// Run a console command. Returns `false` for commands this renderer does
    /// not handle.
    pub fn run_command(&mut self, command: &str, _arguments: &str) -> bool {
        match command {
            commands::INVALIDATE => {
                self.context_destroyed(true);
                self.context_created();
            }
            commands::SHOW_NAMES => self.config.show_names = true,
            commands::HIDE_NAMES => self.config.show_names = false,
            commands::SELECT_MODE_ON => self.debug_select = true,
            commands::SELECT_MODE_OFF => self.debug_select = false,
            _ => return false,
        }
        log::debug!("Ran command '{}'", command);
        true
    }
}
