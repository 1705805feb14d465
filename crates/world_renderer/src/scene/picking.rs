//! Pointer picking
//!
//! After a selection pass has been drawn, the pixel under the pointer is read
//! back and decoded through the pick table. The decoded entity becomes the
//! active entity, which drives hover highlighting and name display.

use crate::render::{PickColourTable, Renderer, Rgb};
use crate::world::EntityId;

/// Convert a window Y coordinate (origin top-left) to framebuffer
/// coordinates (origin bottom-left)
pub fn flip_y(window_height: u32, y: i32) -> i32 {
    let height = i32::try_from(window_height).unwrap_or(i32::MAX);
    height - 1 - y
}

/// Read the pixel under a window position and decode it
pub fn read_pick(
    renderer: &mut dyn Renderer,
    picks: &PickColourTable,
    x: i32,
    y: i32,
) -> Option<EntityId> {
    let pixel = Rgb::from(renderer.read_pixel(x, flip_y(renderer.window_height(), y)));
    let picked = picks.decode(pixel);
    log::trace!("Pick at ({}, {}) read {:?} -> {:?}", x, y, pixel, picked);
    picked
}

/// The entity currently under the pointer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveEntity {
    current: Option<EntityId>,
}

impl ActiveEntity {
    /// Active entity, if any
    pub fn get(&self) -> Option<EntityId> {
        self.current
    }

    /// Record a pick result. Returns whether the active entity changed.
    pub fn update(&mut self, picked: Option<EntityId>) -> bool {
        if picked == self.current {
            return false;
        }
        log::debug!("Active entity {:?} -> {:?}", self.current, picked);
        self.current = picked;
        true
    }

    /// Forget the active entity
    pub fn clear(&mut self) {
        self.current = None;
    }
}
