//! Test doubles for the collaborator traits
//!
//! - [`FakeWorld`]: an in-memory entity tree implementing [`WorldView`]
//! - [`RecordingRenderer`]: records every call; pick colours drawn as points
//!   are "rasterised" into a pixel map so readback works
//! - [`FakeModelProvider`]: builds [`FakeModel`]s that log what happens to them

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::foundation::math::{AxisBox, Mat4, Mat4Ext, Point3, PosAndOrient, Quat, Vec3};
use crate::render::{
    AlphaFunction, BlendFactor, CameraMode, CameraView, Light, Material, PolygonMode, Primitive,
    RenderError, RenderResult, Renderer, RendererCapabilities, Rgb, StateFlags, StateSink,
    StencilMode, TextureHandle, Winding,
};
use crate::scene::{Model, ModelProvider, ModelTemplate};
use crate::world::{Attachment, EntityId, ScreenCoords, WorldEntity, WorldView};

/// Attribute naming the framebuffer pixel a fake model covers
pub const PIXEL_X: &str = "pixel_x";
/// Attribute naming the framebuffer pixel a fake model covers
pub const PIXEL_Y: &str = "pixel_y";

/// Camera at the origin looking along +Y with +Z up, 90 degree field of view
pub fn test_camera() -> CameraView {
    let view = Mat4::look_at(Vec3::zeros(), Vec3::y(), Vec3::z());
    let projection = Mat4::perspective_gl(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 1000.0);
    let orientation = Quat::look_at_rh(&Vec3::y(), &Vec3::z());
    CameraView::new(view, projection, orientation, CameraMode::Chase)
}

#[derive(Debug, Clone)]
pub struct FakeEntity {
    pub id: EntityId,
    pub type_name: String,
    pub visible: bool,
    pub position: Point3,
    pub orientation: Quat,
    pub bbox: Option<AxisBox>,
    pub contained: Vec<EntityId>,
    pub attachments: Vec<Attachment>,
    pub attributes: HashMap<String, f64>,
    pub messages: bool,
    pub wants_coords: bool,
    pub screen_coords: Option<ScreenCoords>,
    pub local_position: Option<Point3>,
}

impl WorldEntity for FakeEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn abs_pos(&self) -> Point3 {
        self.position
    }

    fn abs_orient(&self) -> Quat {
        self.orientation
    }

    fn bbox(&self) -> Option<AxisBox> {
        self.bbox
    }

    fn contained(&self) -> &[EntityId] {
        &self.contained
    }

    fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    fn attribute_num(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).copied()
    }

    fn has_messages(&self) -> bool {
        self.messages
    }

    fn screen_coords_requested(&self) -> bool {
        self.wants_coords
    }
}

#[derive(Debug, Clone)]
pub struct FakeWorld {
    entities: BTreeMap<EntityId, FakeEntity>,
    root: Option<EntityId>,
    next_id: u64,
    pub avatar: Option<EntityId>,
    pub in_world: bool,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            root: None,
            next_id: 1,
            avatar: None,
            in_world: true,
        }
    }

    fn create(&mut self, type_name: &str, position: Point3) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(
            id,
            FakeEntity {
                id,
                type_name: type_name.to_string(),
                visible: true,
                position,
                orientation: Quat::identity(),
                bbox: Some(AxisBox::new(Vec3::repeat(-0.5), Vec3::repeat(0.5))),
                contained: Vec::new(),
                attachments: Vec::new(),
                attributes: HashMap::new(),
                messages: false,
                wants_coords: false,
                screen_coords: None,
                local_position: None,
            },
        );
        id
    }

    /// Create an entity; the first one created this way becomes the top level
    pub fn add_root(&mut self, type_name: &str) -> EntityId {
        let id = self.create(type_name, Point3::origin());
        self.root.get_or_insert(id);
        id
    }

    pub fn add_child(&mut self, parent: EntityId, type_name: &str, position: Point3) -> EntityId {
        let id = self.create(type_name, position);
        self.get_mut(parent).contained.push(id);
        id
    }

    /// Create an entity outside the containment tree, e.g. to attach it
    pub fn add_detached(&mut self, type_name: &str) -> EntityId {
        self.create(type_name, Point3::new(0.0, 5.0, 0.0))
    }

    pub fn get(&self, id: EntityId) -> &FakeEntity {
        &self.entities[&id]
    }

    pub fn get_mut(&mut self, id: EntityId) -> &mut FakeEntity {
        self.entities.get_mut(&id).expect("fake entity exists")
    }
}

impl WorldView for FakeWorld {
    fn entity(&self, id: EntityId) -> Option<&dyn WorldEntity> {
        self.entities.get(&id).map(|entity| entity as &dyn WorldEntity)
    }

    fn top_level(&self) -> Option<EntityId> {
        self.root
    }

    fn avatar(&self) -> Option<EntityId> {
        self.avatar
    }

    fn is_in_world(&self) -> bool {
        self.in_world
    }

    fn set_local_transform(&mut self, id: EntityId, position: Point3, _orientation: Quat) {
        self.get_mut(id).local_position = Some(position);
    }

    fn set_screen_coords(&mut self, id: EntityId, coords: Option<ScreenCoords>) {
        self.get_mut(id).screen_coords = coords;
    }
}

/// One recorded renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Capability(StateFlags, bool),
    FrontFace(Winding),
    AlphaFunction(AlphaFunction, f32),
    BlendFunction(BlendFactor, BlendFactor),
    BeginFrame,
    EndFrame(bool),
    PushTransform,
    PopTransform,
    Translate(Vec3),
    Rotate(f32, Vec3),
    ApplyQuaternion(Quat),
    Scale(Vec3),
    Colour([f32; 4]),
    ColourRgb(Rgb),
    PolygonMode(PolygonMode),
    LineWidth(f32),
    Stencil(StencilMode),
    Clear(Rgb),
    ReadPixel(i32, i32),
    Light(usize, bool),
    Texture(TextureHandle),
    Material,
    Draw(Primitive, usize),
}

#[derive(Debug, Clone)]
pub struct RecordingRenderer {
    pub calls: Vec<Call>,
    pub capabilities: RendererCapabilities,
    pub window_height: u32,
    pub light_slots: usize,
    pub pixels: HashMap<(i32, i32), [u8; 3]>,
    pub clear_colour: Rgb,
    pub pending_error: Option<String>,
    lights: BTreeMap<usize, Light>,
    pick_colour: Option<Rgb>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            capabilities: RendererCapabilities::default(),
            window_height: 600,
            light_slots: 8,
            pixels: HashMap::new(),
            clear_colour: Rgb::default(),
            pending_error: None,
            lights: BTreeMap::new(),
            pick_colour: None,
        }
    }

    pub fn enabled_lights(&self) -> Vec<usize> {
        self.lights.keys().copied().collect()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// Calls between the `index`-th push/pop transform pair
    pub fn scope(&self, index: usize) -> &[Call] {
        let start = self
            .calls
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Call::PushTransform)
            .nth(index)
            .map(|(i, _)| i)
            .expect("transform scope exists");
        let end = self.calls[start..]
            .iter()
            .position(|c| *c == Call::PopTransform)
            .map_or(self.calls.len(), |i| start + i);
        &self.calls[start + 1..end]
    }
}

impl StateSink for RecordingRenderer {
    fn set_capability(&mut self, capability: StateFlags, enabled: bool) {
        self.calls.push(Call::Capability(capability, enabled));
    }

    fn set_front_face(&mut self, winding: Winding) {
        self.calls.push(Call::FrontFace(winding));
    }

    fn set_alpha_function(&mut self, function: AlphaFunction, threshold: f32) {
        self.calls.push(Call::AlphaFunction(function, threshold));
    }

    fn set_blend_function(&mut self, source: BlendFactor, destination: BlendFactor) {
        self.calls.push(Call::BlendFunction(source, destination));
    }
}

impl Renderer for RecordingRenderer {
    fn capabilities(&self) -> RendererCapabilities {
        self.capabilities
    }

    fn begin_frame(&mut self) {
        self.pick_colour = None;
        self.calls.push(Call::BeginFrame);
    }

    fn end_frame(&mut self, select_mode: bool) {
        self.calls.push(Call::EndFrame(select_mode));
    }

    fn push_transform(&mut self) {
        self.calls.push(Call::PushTransform);
    }

    fn pop_transform(&mut self) {
        self.calls.push(Call::PopTransform);
    }

    fn translate(&mut self, offset: Vec3) {
        self.calls.push(Call::Translate(offset));
    }

    fn rotate(&mut self, angle_degrees: f32, axis: Vec3) {
        self.calls.push(Call::Rotate(angle_degrees, axis));
    }

    fn apply_quaternion(&mut self, rotation: &Quat) {
        self.calls.push(Call::ApplyQuaternion(*rotation));
    }

    fn scale(&mut self, factors: Vec3) {
        self.calls.push(Call::Scale(factors));
    }

    fn set_colour(&mut self, rgba: [f32; 4]) {
        self.pick_colour = None;
        self.calls.push(Call::Colour(rgba));
    }

    fn set_colour_rgb(&mut self, colour: Rgb) {
        self.pick_colour = Some(colour);
        self.calls.push(Call::ColourRgb(colour));
    }

    fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.calls.push(Call::PolygonMode(mode));
    }

    fn set_line_width(&mut self, width: f32) {
        self.calls.push(Call::LineWidth(width));
    }

    fn set_stencil_mode(&mut self, mode: StencilMode) {
        self.calls.push(Call::Stencil(mode));
    }

    fn clear_colour_buffer(&mut self, colour: Rgb) {
        self.clear_colour = colour;
        self.pixels.clear();
        self.calls.push(Call::Clear(colour));
    }

    fn read_pixel(&mut self, x: i32, y: i32) -> [u8; 3] {
        self.calls.push(Call::ReadPixel(x, y));
        self.pixels
            .get(&(x, y))
            .copied()
            .unwrap_or([self.clear_colour.r, self.clear_colour.g, self.clear_colour.b])
    }

    fn window_height(&self) -> u32 {
        self.window_height
    }

    fn max_lights(&self) -> usize {
        self.light_slots
    }

    fn set_light(&mut self, slot: usize, light: Option<&Light>) {
        match light {
            Some(light) => self.lights.insert(slot, *light),
            None => self.lights.remove(&slot),
        };
        self.calls.push(Call::Light(slot, light.is_some()));
    }

    fn switch_texture(&mut self, texture: TextureHandle) {
        self.calls.push(Call::Texture(texture));
    }

    fn set_material(&mut self, _material: &Material) {
        self.calls.push(Call::Material);
    }

    fn render_arrays(
        &mut self,
        primitive: Primitive,
        vertices: &[[f32; 3]],
        _texcoords: Option<&[[f32; 2]]>,
        _normals: Option<&[[f32; 3]]>,
    ) {
        if let (Primitive::Points, Some(colour)) = (primitive, self.pick_colour) {
            for vertex in vertices {
                self.pixels
                    .insert((vertex[0] as i32, vertex[1] as i32), [colour.r, colour.g, colour.b]);
            }
        }
        self.calls.push(Call::Draw(primitive, vertices.len()));
    }

    fn render_elements(
        &mut self,
        primitive: Primitive,
        indices: &[u32],
        _vertices: &[[f32; 3]],
        _texcoords: Option<&[[f32; 2]]>,
        _normals: Option<&[[f32; 3]]>,
    ) {
        self.calls.push(Call::Draw(primitive, indices.len()));
    }

    fn take_error(&mut self) -> Option<String> {
        self.pending_error.take()
    }
}

/// Something that happened to a fake model
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    Update(EntityId, f32),
    Render(EntityId, bool),
    ContextCreated(EntityId),
    ContextDestroyed(EntityId, bool),
}

pub type EventLog = Rc<RefCell<Vec<ModelEvent>>>;

const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

pub struct FakeModel {
    entity: EntityId,
    anchors: HashMap<String, PosAndOrient>,
    footprint: Option<[f32; 3]>,
    events: EventLog,
}

impl Model for FakeModel {
    fn update(&mut self, elapsed: f32) {
        self.events.borrow_mut().push(ModelEvent::Update(self.entity, elapsed));
    }

    fn set_last_time(&mut self, _time: f32) {}

    fn render(&mut self, renderer: &mut dyn Renderer, select_mode: bool) {
        self.events.borrow_mut().push(ModelEvent::Render(self.entity, select_mode));
        match self.footprint {
            Some(pixel) => renderer.render_arrays(Primitive::Points, &[pixel], None, None),
            None => renderer.render_arrays(Primitive::Triangles, &TRIANGLE, None, None),
        }
    }

    fn position_for_submodel(&self, anchor: &str) -> Option<PosAndOrient> {
        self.anchors.get(anchor).copied()
    }

    fn context_created(&mut self) {
        self.events.borrow_mut().push(ModelEvent::ContextCreated(self.entity));
    }

    fn context_destroyed(&mut self, force_release: bool) {
        self.events.borrow_mut().push(ModelEvent::ContextDestroyed(self.entity, force_release));
    }
}

pub struct FakeModelProvider {
    loads: Rc<Cell<usize>>,
    events: EventLog,
    anchors: HashMap<String, HashMap<String, PosAndOrient>>,
    failing: Vec<String>,
}

impl FakeModelProvider {
    pub fn new() -> Self {
        Self {
            loads: Rc::new(Cell::new(0)),
            events: Rc::new(RefCell::new(Vec::new())),
            anchors: HashMap::new(),
            failing: Vec::new(),
        }
    }

    pub fn load_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.loads)
    }

    pub fn event_log(&self) -> EventLog {
        Rc::clone(&self.events)
    }

    pub fn add_anchor(&mut self, model_id: &str, anchor: &str, position: Point3) {
        self.anchors.entry(model_id.to_string()).or_default().insert(
            anchor.to_string(),
            PosAndOrient { position, orientation: Quat::identity() },
        );
    }

    pub fn fail(&mut self, model_id: &str) {
        self.failing.push(model_id.to_string());
    }
}

impl ModelProvider for FakeModelProvider {
    fn load_model(
        &mut self,
        model_id: &str,
        template: &ModelTemplate,
        entity: &dyn WorldEntity,
    ) -> RenderResult<Box<dyn Model>> {
        if self.failing.iter().any(|id| id == model_id) {
            return Err(RenderError::ModelLoadFailed {
                model: model_id.to_string(),
                reason: format!("no loader '{}'", template.loader),
            });
        }
        self.loads.set(self.loads.get() + 1);

        let footprint = entity
            .attribute_num(PIXEL_X)
            .zip(entity.attribute_num(PIXEL_Y))
            .map(|(x, y)| [x as f32, y as f32, 0.0]);
        Ok(Box::new(FakeModel {
            entity: entity.id(),
            anchors: self.anchors.get(model_id).cloned().unwrap_or_default(),
            footprint,
            events: Rc::clone(&self.events),
        }))
    }
}
