//! Render queue consumption
//!
//! Draws every queued model, switching render state once per bucket. Each
//! model is placed in its own transform scope: entity position plus offset,
//! the fixed vertical rotation, the model's rotation policy, then scale.
//! In the selection pass each model is drawn in a flat colour allocated from
//! the pick table; otherwise the active entity is drawn with a stencil outline,
//! or with a translucent highlight when the stencil path is unavailable or the
//! model opts out of outlining.

use crate::foundation::math::{AxisBox, Point3, Quat, Vec3};
use crate::render::{
    CameraView, PickColourTable, PolygonMode, Renderer, StateId, StateRegistry, StencilMode,
};
use crate::scene::model_record::{ModelRecord, RotationStyle};
use crate::scene::model_registry::ModelRegistry;
use crate::scene::render_queue::{FrameStats, QueueItem, RenderQueue};
use crate::world::EntityId;

/// Outline colour drawn outside the stencilled silhouette
const OUTLINE_COLOUR: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
/// Translucent highlight used when no stencil buffer is available
const HIGHLIGHT_COLOUR: [f32; 4] = [1.0, 0.0, 1.0, 0.4];
const DEFAULT_COLOUR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const OUTLINE_WIDTH: f32 = 4.0;

/// Degrees of spin per unit of summed position for [`RotationStyle::ByPosition`]
const SPIN_PER_UNIT: f32 = 10.0;

/// Per-pass drawing options
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawOptions {
    /// Selection pass
    pub select_mode: bool,
    /// Seconds since the previous frame
    pub elapsed: f32,
    /// Running frame clock, stamped on updated models
    pub time: f32,
    /// Entity to highlight
    pub active: Option<EntityId>,
    /// Outline with the stencil buffer; otherwise use the filled fallback
    pub use_stencil: bool,
}

/// Draws a [`RenderQueue`] through a [`Renderer`]
pub struct FrameRenderer<'a> {
    renderer: &'a mut dyn Renderer,
    states: &'a mut StateRegistry,
    registry: &'a mut ModelRegistry,
    picks: &'a mut PickColourTable,
    camera: &'a CameraView,
    options: DrawOptions,
    stats: FrameStats,
    picks_exhausted: bool,
}

impl<'a> FrameRenderer<'a> {
    /// Create a frame renderer for one pass
    pub fn new(
        renderer: &'a mut dyn Renderer,
        states: &'a mut StateRegistry,
        registry: &'a mut ModelRegistry,
        picks: &'a mut PickColourTable,
        camera: &'a CameraView,
        options: DrawOptions,
    ) -> Self {
        Self {
            renderer,
            states,
            registry,
            picks,
            camera,
            options,
            stats: FrameStats::default(),
            picks_exhausted: false,
        }
    }

    /// Draw every bucket in order. Returns the state switches and skipped
    /// models of this pass.
    pub fn draw_queue(mut self, queue: &RenderQueue) -> FrameStats {
        for bucket in queue.buckets() {
            if self.states.switch_state(bucket.state, self.renderer) {
                self.stats.state_switches += 1;
            }
            for item in &bucket.items {
                self.draw_item(bucket.state, item);
            }
        }
        self.stats
    }

    fn draw_item(&mut self, bucket_state: StateId, item: &QueueItem) {
        let Some(object) = self.registry.object(item.entity) else {
            log::warn!("Queued entity {} has no object record", item.entity);
            self.stats.objects_skipped += 1;
            return;
        };
        let (position, orientation, bbox) = (object.position, object.orientation, object.bbox);

        let Some(record) = self.registry.model_mut(item.model) else {
            log::warn!("Queued model for entity {} is no longer cached", item.entity);
            self.stats.objects_skipped += 1;
            return;
        };

        self.renderer.push_transform();
        apply_transform(self.renderer, record, &position, &orientation, bbox.as_ref(), self.camera);

        if !self.options.select_mode {
            record.model.update(self.options.elapsed);
            record.model.set_last_time(self.options.time);
        }

        if self.options.select_mode {
            match self.picks.next_colour(item.entity) {
                Ok(colour) => {
                    self.renderer.set_colour_rgb(colour);
                    record.model.render(self.renderer, true);
                }
                Err(err) => {
                    if !self.picks_exhausted {
                        log::warn!("{}; remaining objects are not pickable this pass", err);
                        self.picks_exhausted = true;
                    }
                    self.stats.objects_skipped += 1;
                }
            }
        } else if self.options.active == Some(item.entity) {
            let switches = if self.options.use_stencil && record.outline {
                draw_stencil_outline(self.renderer, self.states, record, bucket_state)
            } else {
                draw_highlight(self.renderer, self.states, record, bucket_state)
            };
            self.stats.state_switches += switches;
        } else {
            record.model.render(self.renderer, false);
        }

        self.renderer.pop_transform();
    }
}

/// Spin angle in degrees for [`RotationStyle::ByPosition`]
pub fn spin_angle(position: &Point3) -> f32 {
    SPIN_PER_UNIT * (position.x + position.y + position.z)
}

fn apply_transform(
    renderer: &mut dyn Renderer,
    record: &ModelRecord,
    position: &Point3,
    orientation: &Quat,
    bbox: Option<&AxisBox>,
    camera: &CameraView,
) {
    renderer.translate(position.coords + record.offset);

    if record.rotate_z != 0.0 {
        renderer.rotate(record.rotate_z, Vec3::z());
    }

    match record.rotation_style {
        RotationStyle::None => {}
        RotationStyle::ByPosition => renderer.rotate(spin_angle(position), Vec3::z()),
        RotationStyle::Normal => renderer.apply_quaternion(orientation),
        RotationStyle::Billboard => renderer.apply_quaternion(&camera.yaw_rotation().inverse()),
        RotationStyle::Halo => renderer.apply_quaternion(&camera.orientation.inverse()),
    }

    if record.scale != 0.0 && record.scale != 1.0 {
        renderer.scale(Vec3::repeat(record.scale));
    }
    if record.scale_bbox {
        if let Some(bbox) = bbox.filter(|b| b.is_valid()) {
            renderer.scale(bbox.extents());
        }
    }
}

/// Silhouette outline: draw normally while writing the stencil, then draw a
/// thick wireframe in the select state wherever the stencil was not written
fn draw_stencil_outline(
    renderer: &mut dyn Renderer,
    states: &mut StateRegistry,
    record: &mut ModelRecord,
    bucket_state: StateId,
) -> usize {
    let mut switches = 0;

    renderer.set_stencil_mode(StencilMode::WriteReference);
    record.model.render(renderer, false);

    switches += usize::from(states.switch_state(record.select_state, renderer));
    renderer.set_stencil_mode(StencilMode::OutsideReference);
    renderer.set_colour(OUTLINE_COLOUR);
    renderer.set_line_width(OUTLINE_WIDTH);
    renderer.set_polygon_mode(PolygonMode::Line);
    record.model.render(renderer, true);

    renderer.set_polygon_mode(PolygonMode::Fill);
    renderer.set_line_width(1.0);
    renderer.set_stencil_mode(StencilMode::Disabled);
    renderer.set_colour(DEFAULT_COLOUR);
    switches += usize::from(states.switch_state(bucket_state, renderer));
    switches
}

/// Fallback highlight: a translucent filled redraw in the select state
fn draw_highlight(
    renderer: &mut dyn Renderer,
    states: &mut StateRegistry,
    record: &mut ModelRecord,
    bucket_state: StateId,
) -> usize {
    let mut switches = usize::from(states.switch_state(record.select_state, renderer));
    renderer.set_colour(HIGHLIGHT_COLOUR);
    record.model.render(renderer, true);
    renderer.set_colour(DEFAULT_COLOUR);
    switches += usize::from(states.switch_state(bucket_state, renderer));
    switches
}
