//! Named render states
//!
//! A render state is a named set of fixed-function toggles plus the alpha and
//! blend parameters that go with them. States are registered once, referred
//! to by [`StateId`] afterwards, and switched with [`StateRegistry::switch_state`],
//! which emits only the toggles that differ from the active state.

use std::collections::{BTreeMap, HashMap};

use serde::{Serialize, Deserialize};

use crate::config::{Config, GraphicsConfig};
use crate::render::api::{AlphaFunction, BlendFactor, StateSink, Winding};

bitflags::bitflags! {
    /// Fixed-function toggles carried by a render state
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct StateFlags: u32 {
        /// Alpha test
        const ALPHA_TEST = 1 << 0;
        /// Colour blending
        const BLEND = 1 << 1;
        /// Fixed-function lighting
        const LIGHTING = 1 << 2;
        /// Two-sided lighting
        const TWO_SIDED_LIGHTING = 1 << 3;
        /// 2D texturing
        const TEXTURES = 1 << 4;
        /// Colour tracks material
        const COLOUR_MATERIAL = 1 << 5;
        /// Depth test
        const DEPTH_TEST = 1 << 6;
        /// Depth buffer writes
        const DEPTH_WRITE = 1 << 7;
        /// Back face culling
        const CULL_FACE = 1 << 8;
        /// Clockwise front faces; not a capability, switches the winding
        const CULL_FACE_CW = 1 << 9;
        /// Stencil test
        const STENCIL = 1 << 10;
        /// Fog
        const FOG = 1 << 11;
    }
}

/// Properties of one render state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateProperties {
    /// Enabled toggles
    pub flags: StateFlags,
    /// Alpha test comparison
    pub alpha_function: AlphaFunction,
    /// Alpha test threshold
    pub alpha_value: f32,
    /// Blend source factor
    pub blend_source: BlendFactor,
    /// Blend destination factor
    pub blend_destination: BlendFactor,
}

impl Default for StateProperties {
    fn default() -> Self {
        Self {
            flags: StateFlags::empty(),
            alpha_function: AlphaFunction::Greater,
            alpha_value: 0.1,
            blend_source: BlendFactor::SrcAlpha,
            blend_destination: BlendFactor::OneMinusSrcAlpha,
        }
    }
}

impl StateProperties {
    /// Properties with the given toggles and default alpha/blend parameters
    pub fn with_flags(flags: StateFlags) -> Self {
        Self { flags, ..Self::default() }
    }

    fn winding(&self) -> Winding {
        if self.flags.contains(StateFlags::CULL_FACE_CW) {
            Winding::Cw
        } else {
            Winding::Ccw
        }
    }
}

/// Render state identifier handed out by [`StateRegistry::register_state`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub usize);

/// Named state definitions loaded from a file, e.g.
///
/// ```toml
/// [states.models]
/// flags = "TEXTURES | LIGHTING | DEPTH_TEST | DEPTH_WRITE | CULL_FACE"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateTable {
    /// State properties keyed by state name
    pub states: BTreeMap<String, StateProperties>,
}

impl Config for StateTable {}

/// Registry of render states and the cursor of the active one
#[derive(Debug, Default)]
pub struct StateRegistry {
    states: Vec<(String, StateProperties)>,
    by_name: HashMap<String, StateId>,
    current: Option<StateId>,
}

impl StateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in states used by the client.
    ///
    /// Texturing and lighting are stripped from every state when disabled in
    /// the graphics configuration.
    pub fn with_defaults(config: &GraphicsConfig) -> Self {
        use StateFlags as F;

        let depth = F::DEPTH_TEST | F::DEPTH_WRITE;
        let lit = F::TEXTURES | F::LIGHTING | F::COLOUR_MATERIAL;
        let defaults = [
            ("default", StateProperties::with_flags(depth | F::CULL_FACE)),
            ("terrain", StateProperties::with_flags(lit | depth | F::CULL_FACE | F::FOG)),
            ("models", StateProperties::with_flags(lit | depth | F::CULL_FACE | F::FOG | F::ALPHA_TEST)),
            ("billboard", StateProperties::with_flags(F::TEXTURES | F::ALPHA_TEST | F::BLEND | depth | F::FOG)),
            ("halo", StateProperties {
                flags: F::TEXTURES | F::BLEND | F::DEPTH_TEST,
                blend_destination: BlendFactor::One,
                ..StateProperties::default()
            }),
            ("weather", StateProperties::with_flags(F::TEXTURES | F::BLEND | F::DEPTH_TEST)),
            ("skybox", StateProperties::with_flags(F::TEXTURES)),
            ("select", StateProperties::with_flags(depth | F::CULL_FACE)),
            ("font", StateProperties::with_flags(F::TEXTURES | F::BLEND)),
            ("panel", StateProperties::with_flags(F::BLEND)),
            ("cursor", StateProperties::with_flags(F::TEXTURES | F::BLEND | F::ALPHA_TEST)),
        ];

        let mut mask = StateFlags::all();
        if !config.use_textures {
            mask.remove(F::TEXTURES);
        }
        if !config.use_lighting {
            mask.remove(F::LIGHTING | F::TWO_SIDED_LIGHTING);
        }

        let mut registry = Self::new();
        for (name, mut properties) in defaults {
            properties.flags &= mask;
            registry.register_state(name, properties);
        }
        registry
    }

    /// Register a named state. Registering a name that already exists returns
    /// the existing id and leaves its properties untouched.
    pub fn register_state(&mut self, name: &str, properties: StateProperties) -> StateId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }

        let id = StateId(self.states.len());
        self.states.push((name.to_string(), properties));
        self.by_name.insert(name.to_string(), id);
        log::trace!("Registered render state '{}' as {:?}", name, id);
        id
    }

    /// Register every state in a table, replacing the properties of states
    /// that already exist
    pub fn apply_table(&mut self, table: &StateTable) {
        for (name, properties) in &table.states {
            match self.by_name.get(name) {
                Some(&id) => {
                    self.states[id.0].1 = *properties;
                    if self.current == Some(id) {
                        self.current = None;
                    }
                }
                None => {
                    self.register_state(name, *properties);
                }
            }
        }
        log::debug!("Applied {} render state definitions", table.states.len());
    }

    /// Look up a state by name
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.by_name.get(name).copied()
    }

    /// Name of a registered state
    pub fn state_name(&self, id: StateId) -> Option<&str> {
        self.states.get(id.0).map(|(name, _)| name.as_str())
    }

    /// Properties of a registered state
    pub fn properties(&self, id: StateId) -> Option<&StateProperties> {
        self.states.get(id.0).map(|(_, properties)| properties)
    }

    /// Number of registered states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no state has been registered
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The last applied state
    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    /// Forget the active state so the next switch applies every toggle.
    /// Needed whenever the graphics context is recreated.
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    /// Make `id` the active state, emitting only the toggles that differ from
    /// the current one. Returns whether anything was emitted.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not handed out by this registry.
    pub fn switch_state<S: StateSink + ?Sized>(&mut self, id: StateId, sink: &mut S) -> bool {
        let Some((name, next)) = self.states.get(id.0) else {
            panic!("switch to unregistered render state {:?} ({} registered)", id, self.states.len());
        };

        if self.current == Some(id) {
            return false;
        }

        log::trace!("Render state -> '{}'", name);
        match self.current.map(|current| self.states[current.0].1) {
            Some(previous) => Self::apply_diff(&previous, next, sink),
            None => Self::apply_full(next, sink),
        }

        self.current = Some(id);
        true
    }

    fn apply_full<S: StateSink + ?Sized>(next: &StateProperties, sink: &mut S) {
        for flag in StateFlags::all().iter() {
            if flag != StateFlags::CULL_FACE_CW {
                sink.set_capability(flag, next.flags.contains(flag));
            }
        }
        sink.set_front_face(next.winding());
        sink.set_alpha_function(next.alpha_function, next.alpha_value);
        sink.set_blend_function(next.blend_source, next.blend_destination);
    }

    fn apply_diff<S: StateSink + ?Sized>(previous: &StateProperties, next: &StateProperties, sink: &mut S) {
        let changed = previous.flags ^ next.flags;
        for flag in changed.iter() {
            if flag == StateFlags::CULL_FACE_CW {
                sink.set_front_face(next.winding());
            } else {
                sink.set_capability(flag, next.flags.contains(flag));
            }
        }

        if previous.alpha_function != next.alpha_function || previous.alpha_value != next.alpha_value {
            sink.set_alpha_function(next.alpha_function, next.alpha_value);
        }
        if previous.blend_source != next.blend_source || previous.blend_destination != next.blend_destination {
            sink.set_blend_function(next.blend_source, next.blend_destination);
        }
    }
}
