//! Graphics settings for the scene pipeline
//!
//! Every setting lives in the `"graphics"` section of the [`ConfigStore`].
//! Missing or malformed keys fall back to the documented default; they are
//! never reported as errors.

use serde::{Serialize, Deserialize};

use super::{Config, ConfigStore, ConfigValue};

/// Store section holding every graphics key
pub const GRAPHICS_SECTION: &str = "graphics";

/// Store keys for [`GraphicsConfig`]
pub mod keys {
    /// Squared camera distance below which medium quality models are used
    pub const MEDIUM_DIST: &str = "medium_dist";
    /// Squared camera distance below which high quality models are used
    pub const HIGH_DIST: &str = "high_dist";
    /// Use the stencil buffer for outlines
    pub const USE_STENCIL: &str = "render_use_stencil";
    /// Enable texturing
    pub const USE_TEXTURES: &str = "render_use_textures";
    /// Enable lighting
    pub const USE_LIGHTING: &str = "render_use_lighting";
    /// Show entity name labels
    pub const SHOW_NAMES: &str = "show_names";
    /// Maximum number of pickable objects per selection pass
    pub const PICK_LIMIT: &str = "pick_limit";

    /// Comma-separated entity types that register a dynamic light
    pub const EMISSIVE_TYPES: &str = "emissive_types";

    /// Fire light ambient colour keys (r, g, b, a)
    pub const FIRE_AMBIENT: [&str; 4] =
        ["fire_ambient_red", "fire_ambient_green", "fire_ambient_blue", "fire_ambient_alpha"];
    /// Fire light diffuse colour keys (r, g, b, a)
    pub const FIRE_DIFFUSE: [&str; 4] =
        ["fire_diffuse_red", "fire_diffuse_green", "fire_diffuse_blue", "fire_diffuse_alpha"];
    /// Fire light specular colour keys (r, g, b, a)
    pub const FIRE_SPECULAR: [&str; 4] =
        ["fire_specular_red", "fire_specular_green", "fire_specular_blue", "fire_specular_alpha"];
}

const DEFAULT_MEDIUM_DIST: f32 = 9000.0;
const DEFAULT_HIGH_DIST: f32 = 4500.0;
const DEFAULT_PICK_LIMIT: usize = 4096;

/// Light colours used for emissive props such as fires.
///
/// Attenuation is not configurable; it follows the prop's `status`
/// (see [`Light::fire`](crate::render::Light::fire)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireLightConfig {
    /// Ambient colour (RGBA)
    pub ambient: [f32; 4],
    /// Diffuse colour (RGBA)
    pub diffuse: [f32; 4],
    /// Specular colour (RGBA)
    pub specular: [f32; 4],
}

impl Default for FireLightConfig {
    fn default() -> Self {
        Self {
            ambient: [0.0, 0.0, 0.0, 0.0],
            diffuse: [1.0, 1.0, 0.9, 0.0],
            specular: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

/// Graphics settings read from the client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsConfig {
    /// Squared distance threshold for the medium quality tier
    pub medium_dist: f32,
    /// Squared distance threshold for the high quality tier (closer than medium)
    pub high_dist: f32,
    /// Use the stencil buffer for outline rendering when the hardware has one
    pub use_stencil: bool,
    /// Enable texturing in the built-in render states
    pub use_textures: bool,
    /// Enable lighting in the built-in render states
    pub use_lighting: bool,
    /// Whether the GUI should draw entity name labels
    pub show_names: bool,
    /// Maximum number of objects that can be picked in one selection pass
    pub pick_limit: usize,
    /// Entity types that register a dynamic light
    pub emissive_types: Vec<String>,
    /// Light parameters for emissive props
    pub fire: FireLightConfig,
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            medium_dist: DEFAULT_MEDIUM_DIST,
            high_dist: DEFAULT_HIGH_DIST,
            use_stencil: true,
            use_textures: true,
            use_lighting: true,
            show_names: false,
            pick_limit: DEFAULT_PICK_LIMIT,
            emissive_types: vec!["fire".to_string()],
            fire: FireLightConfig::default(),
        }
    }
}

impl Config for GraphicsConfig {}

fn read_f32(store: &dyn ConfigStore, key: &str, default: f32) -> f32 {
    match store.get(GRAPHICS_SECTION, key) {
        Some(value) => match value.as_f64() {
            Some(v) if v.is_finite() => v as f32,
            _ => {
                log::warn!("Malformed value for {}.{}: {:?}, using {}", GRAPHICS_SECTION, key, value, default);
                default
            }
        },
        None => default,
    }
}

fn read_bool(store: &dyn ConfigStore, key: &str, default: bool) -> bool {
    match store.get(GRAPHICS_SECTION, key) {
        Some(value) => value.as_bool().unwrap_or_else(|| {
            log::warn!("Malformed value for {}.{}: {:?}, using {}", GRAPHICS_SECTION, key, value, default);
            default
        }),
        None => default,
    }
}

fn read_list(store: &dyn ConfigStore, key: &str, default: Vec<String>) -> Vec<String> {
    match store.get(GRAPHICS_SECTION, key) {
        Some(value) => match value.as_str() {
            Some(text) => text
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
            None => {
                log::warn!("Malformed value for {}.{}: {:?}, using {:?}", GRAPHICS_SECTION, key, value, default);
                default
            }
        },
        None => default,
    }
}

fn read_colour(store: &dyn ConfigStore, names: [&str; 4], default: [f32; 4]) -> [f32; 4] {
    let mut colour = default;
    for (channel, key) in colour.iter_mut().zip(names) {
        *channel = read_f32(store, key, *channel);
    }
    colour
}

impl GraphicsConfig {
    /// Read every graphics key, substituting defaults for missing or malformed values
    pub fn read_from(store: &dyn ConfigStore) -> Self {
        let defaults = Self::default();
        let fire = FireLightConfig {
            ambient: read_colour(store, keys::FIRE_AMBIENT, defaults.fire.ambient),
            diffuse: read_colour(store, keys::FIRE_DIFFUSE, defaults.fire.diffuse),
            specular: read_colour(store, keys::FIRE_SPECULAR, defaults.fire.specular),
        };

        let pick_limit = read_f32(store, keys::PICK_LIMIT, defaults.pick_limit as f32);
        let pick_limit = if pick_limit >= 1.0 { pick_limit as usize } else { defaults.pick_limit };

        Self {
            medium_dist: read_f32(store, keys::MEDIUM_DIST, defaults.medium_dist),
            high_dist: read_f32(store, keys::HIGH_DIST, defaults.high_dist),
            use_stencil: read_bool(store, keys::USE_STENCIL, defaults.use_stencil),
            use_textures: read_bool(store, keys::USE_TEXTURES, defaults.use_textures),
            use_lighting: read_bool(store, keys::USE_LIGHTING, defaults.use_lighting),
            show_names: read_bool(store, keys::SHOW_NAMES, defaults.show_names),
            pick_limit,
            emissive_types: read_list(store, keys::EMISSIVE_TYPES, defaults.emissive_types),
            fire,
        }
    }

    /// Persist every graphics key
    pub fn write_to(&self, store: &mut dyn ConfigStore) {
        store.set(GRAPHICS_SECTION, keys::MEDIUM_DIST, self.medium_dist.into());
        store.set(GRAPHICS_SECTION, keys::HIGH_DIST, self.high_dist.into());
        store.set(GRAPHICS_SECTION, keys::USE_STENCIL, self.use_stencil.into());
        store.set(GRAPHICS_SECTION, keys::USE_TEXTURES, self.use_textures.into());
        store.set(GRAPHICS_SECTION, keys::USE_LIGHTING, self.use_lighting.into());
        store.set(GRAPHICS_SECTION, keys::SHOW_NAMES, self.show_names.into());
        store.set(GRAPHICS_SECTION, keys::PICK_LIMIT, ConfigValue::Number(self.pick_limit as f64));

        store.set(GRAPHICS_SECTION, keys::EMISSIVE_TYPES, self.emissive_types.join(",").as_str().into());
        for (key, value) in keys::FIRE_AMBIENT.iter().zip(self.fire.ambient) {
            store.set(GRAPHICS_SECTION, key, value.into());
        }
        for (key, value) in keys::FIRE_DIFFUSE.iter().zip(self.fire.diffuse) {
            store.set(GRAPHICS_SECTION, key, value.into());
        }
        for (key, value) in keys::FIRE_SPECULAR.iter().zip(self.fire.specular) {
            store.set(GRAPHICS_SECTION, key, value.into());
        }
    }

    /// Apply a single changed key from the store
    ///
    /// Returns `true` when the key belonged to this config and was applied.
    /// Only the distance thresholds and the name toggle are live-reloadable;
    /// other keys are picked up by the next [`read_from`](Self::read_from).
    pub fn apply_change(&mut self, section: &str, key: &str, store: &dyn ConfigStore) -> bool {
        if section != GRAPHICS_SECTION {
            return false;
        }
        match key {
            keys::MEDIUM_DIST => self.medium_dist = read_f32(store, key, self.medium_dist),
            keys::HIGH_DIST => self.high_dist = read_f32(store, key, self.high_dist),
            keys::SHOW_NAMES => self.show_names = read_bool(store, key, self.show_names),
            _ => return false,
        }
        log::debug!("Graphics setting {} changed", key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;

    #[test]
    fn test_missing_keys_use_defaults() {
        let store = MemoryConfigStore::new();
        assert_eq!(GraphicsConfig::read_from(&store), GraphicsConfig::default());
    }

    #[test]
    fn test_malformed_keys_use_defaults() {
        let mut store = MemoryConfigStore::new();
        store.set(GRAPHICS_SECTION, keys::HIGH_DIST, "near".into());
        store.set(GRAPHICS_SECTION, keys::USE_STENCIL, ConfigValue::Number(3.0));
        store.set(GRAPHICS_SECTION, keys::MEDIUM_DIST, 12000.0_f32.into());

        let config = GraphicsConfig::read_from(&store);
        assert_eq!(config.high_dist, 4500.0);
        assert!(config.use_stencil);
        assert_eq!(config.medium_dist, 12000.0);
    }

    #[test]
    fn test_write_then_read_preserves_values() {
        let mut config = GraphicsConfig::default();
        config.medium_dist = 100.0;
        config.high_dist = 25.0;
        config.use_stencil = false;
        config.fire.diffuse = [0.5, 0.4, 0.3, 1.0];
        config.emissive_types = vec!["fire".into(), "torch".into()];

        let mut store = MemoryConfigStore::new();
        config.write_to(&mut store);
        assert_eq!(GraphicsConfig::read_from(&store), config);
    }

    #[test]
    fn test_apply_change_only_touches_graphics_section() {
        let mut store = MemoryConfigStore::new();
        store.set(GRAPHICS_SECTION, keys::HIGH_DIST, 50.0_f32.into());
        store.set("audio", keys::HIGH_DIST, 75.0_f32.into());

        let mut config = GraphicsConfig::default();
        assert!(!config.apply_change("audio", keys::HIGH_DIST, &store));
        assert_eq!(config.high_dist, 4500.0);

        assert!(config.apply_change(GRAPHICS_SECTION, keys::HIGH_DIST, &store));
        assert_eq!(config.high_dist, 50.0);
    }

    #[test]
    fn test_emissive_types_read_from_store() {
        let mut store = MemoryConfigStore::new();
        store.set(GRAPHICS_SECTION, keys::EMISSIVE_TYPES, " fire, brazier ,,lamp".into());
        let config = GraphicsConfig::read_from(&store);
        assert_eq!(config.emissive_types, ["fire", "brazier", "lamp"]);

        // An empty list turns dynamic lights off
        store.set(GRAPHICS_SECTION, keys::EMISSIVE_TYPES, "".into());
        assert!(GraphicsConfig::read_from(&store).emissive_types.is_empty());

        store.set(GRAPHICS_SECTION, keys::EMISSIVE_TYPES, false.into());
        assert_eq!(GraphicsConfig::read_from(&store).emissive_types, ["fire"]);
    }
}
