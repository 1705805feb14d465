//! Graphics binding interface
//!
//! The scene pipeline never talks to a graphics API directly. Everything it
//! needs, from fixed-function toggles to transform scopes and pixel readback,
//! goes through [`Renderer`]. State toggles are split out into [`StateSink`]
//! so the state registry can be driven (and tested) on its own.

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use crate::foundation::math::{Quat, Vec3};
use crate::render::lighting::Light;
use crate::render::state::StateFlags;

/// 8-bit per channel colour as written to and read back from the framebuffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Create a colour from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(pixel: [u8; 3]) -> Self {
        bytemuck::cast(pixel)
    }
}

/// Polygon rasterisation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonMode {
    /// Solid rendering
    Fill,
    /// Wireframe
    Line,
}

/// Stencil configuration used by outline rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilMode {
    /// Stencil test off
    Disabled,
    /// Always pass and write the reference value where geometry lands
    WriteReference,
    /// Pass only where the reference value is absent
    OutsideReference,
}

/// Front face winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winding {
    /// Counter-clockwise front faces
    #[default]
    Ccw,
    /// Clockwise front faces
    Cw,
}

/// Alpha test comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaFunction {
    /// Never pass
    Never,
    /// Pass if less than threshold
    Less,
    /// Pass if equal to threshold
    Equal,
    /// Pass if less than or equal to threshold
    LessEqual,
    /// Pass if greater than threshold
    #[default]
    Greater,
    /// Pass if not equal to threshold
    NotEqual,
    /// Pass if greater than or equal to threshold
    GreaterEqual,
    /// Always pass
    Always,
}

/// Blend equation factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendFactor {
    /// 0
    Zero,
    /// 1
    One,
    /// Source colour
    SrcColour,
    /// 1 - source colour
    OneMinusSrcColour,
    /// Source alpha
    SrcAlpha,
    /// 1 - source alpha
    OneMinusSrcAlpha,
    /// Destination alpha
    DstAlpha,
    /// 1 - destination alpha
    OneMinusDstAlpha,
    /// Destination colour
    DstColour,
    /// 1 - destination colour
    OneMinusDstColour,
}

/// Primitive topology for vertex submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Points
    Points,
    /// Line list
    Lines,
    /// Triangle list
    Triangles,
    /// Quad list
    Quads,
    /// Triangle fan
    TriangleFan,
    /// Triangle strip
    TriangleStrip,
    /// Quad strip
    QuadStrip,
}

/// Texture owned by the graphics binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Fixed-function material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Ambient reflectance
    pub ambient: [f32; 4],
    /// Diffuse reflectance
    pub diffuse: [f32; 4],
    /// Specular reflectance
    pub specular: [f32; 4],
    /// Specular exponent
    pub shininess: f32,
    /// Emitted colour
    pub emissive: [f32; 4],
}

/// Hardware features detected when the context was created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererCapabilities {
    /// A stencil buffer is attached to the framebuffer
    pub stencil_buffer: bool,
    /// Framebuffer bits per channel (red, green, blue)
    pub colour_bits: (u8, u8, u8),
}

impl Default for RendererCapabilities {
    fn default() -> Self {
        Self {
            stencil_buffer: true,
            colour_bits: (8, 8, 8),
        }
    }
}

/// Receiver of fixed-function state toggles
pub trait StateSink {
    /// Enable or disable one toggle; `capability` has exactly one bit set
    fn set_capability(&mut self, capability: StateFlags, enabled: bool);

    /// Select the front face winding used by face culling
    fn set_front_face(&mut self, winding: Winding);

    /// Configure the alpha test
    fn set_alpha_function(&mut self, function: AlphaFunction, threshold: f32);

    /// Configure the blend equation
    fn set_blend_function(&mut self, source: BlendFactor, destination: BlendFactor);
}

/// Immediate-mode graphics binding
pub trait Renderer: StateSink {
    /// Features of the current context
    fn capabilities(&self) -> RendererCapabilities;

    /// Prepare a frame (clear buffers, load the projection)
    fn begin_frame(&mut self);

    /// Finish a frame; a select pass must not present the back buffer
    fn end_frame(&mut self, select_mode: bool);

    /// Push a model transform scope
    fn push_transform(&mut self);

    /// Pop the innermost model transform scope
    fn pop_transform(&mut self);

    /// Translate the current transform
    fn translate(&mut self, offset: Vec3);

    /// Rotate the current transform by `angle_degrees` about `axis`
    fn rotate(&mut self, angle_degrees: f32, axis: Vec3);

    /// Multiply the current transform by a rotation
    fn apply_quaternion(&mut self, rotation: &Quat);

    /// Scale the current transform
    fn scale(&mut self, factors: Vec3);

    /// Set the current draw colour
    fn set_colour(&mut self, rgba: [f32; 4]);

    /// Set the current draw colour from exact byte values (pick colours)
    fn set_colour_rgb(&mut self, colour: Rgb);

    /// Set polygon rasterisation mode
    fn set_polygon_mode(&mut self, mode: PolygonMode);

    /// Set line width for wireframe drawing
    fn set_line_width(&mut self, width: f32);

    /// Configure the stencil test
    fn set_stencil_mode(&mut self, mode: StencilMode);

    /// Clear the colour buffer to an exact colour
    fn clear_colour_buffer(&mut self, colour: Rgb);

    /// Read back one pixel in framebuffer coordinates (origin bottom-left).
    /// Blocks until the GPU has finished drawing.
    fn read_pixel(&mut self, x: i32, y: i32) -> [u8; 3];

    /// Window height in pixels
    fn window_height(&self) -> u32;

    /// Number of hardware light slots
    fn max_lights(&self) -> usize;

    /// Enable a light slot with the given parameters, or disable it with `None`
    fn set_light(&mut self, slot: usize, light: Option<&Light>);

    /// Bind a texture
    fn switch_texture(&mut self, texture: TextureHandle);

    /// Set the fixed-function material
    fn set_material(&mut self, material: &Material);

    /// Draw non-indexed vertex arrays
    fn render_arrays(
        &mut self,
        primitive: Primitive,
        vertices: &[[f32; 3]],
        texcoords: Option<&[[f32; 2]]>,
        normals: Option<&[[f32; 3]]>,
    );

    /// Draw indexed vertex arrays
    fn render_elements(
        &mut self,
        primitive: Primitive,
        indices: &[u32],
        vertices: &[[f32; 3]],
        texcoords: Option<&[[f32; 2]]>,
        normals: Option<&[[f32; 3]]>,
    );

    /// Take the pending graphics API error, if any
    fn take_error(&mut self) -> Option<String>;
}
