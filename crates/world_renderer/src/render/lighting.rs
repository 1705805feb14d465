//! Dynamic lights for emissive props
//!
//! Props like fires register a light while the scene is built. The
//! [`LightManager`] hands each one a hardware light slot for the frame and
//! turns the slots off again at the start of the next.

use crate::config::FireLightConfig;
use crate::foundation::math::{utils, Point3, Vec3};
use crate::render::api::Renderer;

/// Height above the entity origin at which a fire's light sits
const FIRE_LIGHT_HEIGHT: f32 = 0.5;

/// A positional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// World position
    pub position: Point3,
    /// Ambient colour (RGBA)
    pub ambient: [f32; 4],
    /// Diffuse colour (RGBA)
    pub diffuse: [f32; 4],
    /// Specular colour (RGBA)
    pub specular: [f32; 4],
    /// Constant attenuation
    pub attenuation_constant: f32,
    /// Linear attenuation
    pub attenuation_linear: f32,
    /// Quadratic attenuation
    pub attenuation_quadratic: f32,
}

impl Light {
    /// Light for a burning prop.
    ///
    /// `status` is the fire's intensity; values outside `[0, 1]` are clamped.
    /// A stronger fire falls off more slowly: constant attenuation 1, linear
    /// `1 - status`, no quadratic term.
    pub fn fire(position: Point3, status: f32, config: &FireLightConfig) -> Self {
        let status = utils::clamp(status, 0.0, 1.0);
        Self {
            position: position + Vec3::new(0.0, 0.0, FIRE_LIGHT_HEIGHT),
            ambient: config.ambient,
            diffuse: config.diffuse,
            specular: config.specular,
            attenuation_constant: 1.0,
            attenuation_linear: 1.0 - status,
            attenuation_quadratic: 0.0,
        }
    }
}

/// Allocates hardware light slots to dynamic lights, one frame at a time
#[derive(Debug, Clone)]
pub struct LightManager {
    first_slot: usize,
    used: usize,
}

impl LightManager {
    /// Create a manager handing out slots from `first_slot` upwards; lower
    /// slots stay reserved for the sun and the player's light
    pub fn new(first_slot: usize) -> Self {
        Self { first_slot, used: 0 }
    }

    /// Number of lights applied since the last reset
    pub fn active(&self) -> usize {
        self.used
    }

    /// Switch off every slot handed out last frame
    pub fn reset(&mut self, renderer: &mut dyn Renderer) {
        for slot in self.first_slot..self.first_slot + self.used {
            renderer.set_light(slot, None);
        }
        self.used = 0;
    }

    /// Apply a light in the next free slot. Lights beyond the hardware limit
    /// are dropped; returns whether the light was applied.
    pub fn apply(&mut self, renderer: &mut dyn Renderer, light: &Light) -> bool {
        let slot = self.first_slot + self.used;
        if slot >= renderer.max_lights() {
            log::trace!("No light slot left for light at {:?}", light.position);
            return false;
        }
        renderer.set_light(slot, Some(light));
        self.used += 1;
        true
    }
}

impl Default for LightManager {
    fn default() -> Self {
        Self::new(2)
    }
}
