//! Colour-coded object picking
//!
//! During a selection pass every drawn object gets a unique flat colour. Reading
//! back the pixel under the cursor and decoding its colour identifies the
//! object. Each channel carries only as many bits as the table needs, aligned
//! to the most significant end of the byte, so the low bits stay free and a
//! pixel that comes back slightly off still decodes to the right slot.

use crate::render::api::{RendererCapabilities, Rgb};
use crate::render::{RenderError, RenderResult};
use crate::world::EntityId;

/// Low bits per channel kept clear when the table does not need the full
/// framebuffer depth
const RESERVED_LOW_BITS: u32 = 2;

/// Channel layout of the encoded index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChannelBits {
    red: u32,
    green: u32,
    blue: u32,
}

impl ChannelBits {
    fn new(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: u32::from(red.min(8)),
            green: u32::from(green.min(8)),
            blue: u32::from(blue.min(8)),
        }
    }

    /// Smallest layout inside `framebuffer` that holds `limit` indices.
    ///
    /// Bits are handed out one channel at a time (green, red, blue) while
    /// keeping [`RESERVED_LOW_BITS`] clear; the reserved bits are only given
    /// up when the framebuffer is too shallow otherwise.
    fn for_limit(framebuffer: Self, limit: usize) -> Self {
        let full = framebuffer.total();
        if (1usize << full) <= limit {
            return framebuffer;
        }
        let needed = limit.checked_next_power_of_two().map_or(usize::BITS, usize::trailing_zeros);

        let depth = [framebuffer.red, framebuffer.green, framebuffer.blue];
        let mut bits = [0u32; 3];
        for reserve in [RESERVED_LOW_BITS, 0] {
            while bits.iter().sum::<u32>() < needed {
                let mut grew = false;
                for channel in [1, 0, 2] {
                    if bits.iter().sum::<u32>() < needed && bits[channel] < depth[channel].saturating_sub(reserve) {
                        bits[channel] += 1;
                        grew = true;
                    }
                }
                if !grew {
                    break;
                }
            }
        }
        Self { red: bits[0], green: bits[1], blue: bits[2] }
    }

    fn total(&self) -> u32 {
        self.red + self.green + self.blue
    }

    fn mask(bits: u32) -> u32 {
        0xFF >> (8 - bits)
    }

    fn encode(&self, index: usize) -> Rgb {
        let index = index as u32;
        let red = (index >> (self.green + self.blue)) & Self::mask(self.red);
        let green = (index >> self.blue) & Self::mask(self.green);
        let blue = index & Self::mask(self.blue);
        Rgb::new(
            (red << (8 - self.red)) as u8,
            (green << (8 - self.green)) as u8,
            (blue << (8 - self.blue)) as u8,
        )
    }

    /// Nearest channel value for a read-back byte; `None` when the byte
    /// rounds past the channel's range
    fn component(byte: u8, bits: u32) -> Option<u32> {
        if bits == 0 {
            return Some(0);
        }
        let shift = 8 - bits;
        let half = if shift == 0 { 0 } else { 1 << (shift - 1) };
        let value = (u32::from(byte) + half) >> shift;
        (value <= Self::mask(bits)).then_some(value)
    }

    fn decode(&self, colour: Rgb) -> Option<usize> {
        let red = Self::component(colour.r, self.red)?;
        let green = Self::component(colour.g, self.green)?;
        let blue = Self::component(colour.b, self.blue)?;
        Some(((red << (self.green + self.blue)) | (green << self.blue) | blue) as usize)
    }
}

/// Table of pick colours and the entities they were handed to this pass
#[derive(Debug, Clone)]
pub struct PickColourTable {
    bits: ChannelBits,
    colours: Vec<Rgb>,
    entities: Vec<Option<EntityId>>,
}

impl PickColourTable {
    /// Build a table for a framebuffer with the given bits per channel.
    ///
    /// The table holds `2^(red + green + blue)` colours, or `limit` if that is
    /// smaller. A smaller table uses fewer bits per channel and leaves the low
    /// bits of every channel clear.
    pub fn build(red_bits: u8, green_bits: u8, blue_bits: u8, limit: usize) -> Self {
        let framebuffer = ChannelBits::new(red_bits, green_bits, blue_bits);
        let bits = ChannelBits::for_limit(framebuffer, limit);
        let size = (1usize << bits.total()).min(limit);
        let colours = (0..size).map(|index| bits.encode(index)).collect();

        log::debug!(
            "Pick colour table: {}/{}/{} of {}/{}/{} bits, {} colours",
            bits.red,
            bits.green,
            bits.blue,
            framebuffer.red,
            framebuffer.green,
            framebuffer.blue,
            size
        );

        Self {
            bits,
            colours,
            entities: Vec::with_capacity(size),
        }
    }

    /// Build a table matching the renderer's framebuffer
    pub fn from_capabilities(capabilities: &RendererCapabilities, limit: usize) -> Self {
        let (red, green, blue) = capabilities.colour_bits;
        Self::build(red, green, blue, limit)
    }

    /// Number of colours in the table
    pub fn capacity(&self) -> usize {
        self.colours.len()
    }

    /// Number of colours handed out since the last reset
    pub fn allocated(&self) -> usize {
        self.entities.len()
    }

    /// Forget every allocation and rewind to the first colour
    pub fn reset_selection(&mut self) {
        self.entities.clear();
    }

    /// Take the next colour without an owner, for clearing the background
    pub fn reserve_background(&mut self) -> RenderResult<Rgb> {
        self.allocate(None)
    }

    /// Allocate the next colour for `entity`
    pub fn next_colour(&mut self, entity: EntityId) -> RenderResult<Rgb> {
        self.allocate(Some(entity))
    }

    fn allocate(&mut self, entity: Option<EntityId>) -> RenderResult<Rgb> {
        let index = self.entities.len();
        let colour = *self
            .colours
            .get(index)
            .ok_or(RenderError::PickCapacityExceeded { capacity: self.colours.len() })?;
        self.entities.push(entity);
        Ok(colour)
    }

    /// Entity drawn with the colour nearest to `colour` this pass, if any
    pub fn decode(&self, colour: Rgb) -> Option<EntityId> {
        let index = self.bits.decode(colour)?;
        self.entities.get(index).copied().flatten()
    }
}
