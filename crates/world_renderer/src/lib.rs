//! # World Renderer
//!
//! Scene composition and render queues for a networked virtual-world client.
//!
//! Every frame the replicated entity tree is walked, frustum culled, given a
//! model quality tier by camera distance and grouped into per-render-state
//! queues, which are then drawn through an immediate-mode graphics binding.
//! The same pipeline, run in select mode, resolves which entity is under the
//! pointer by drawing each object in a unique flat colour.
//!
//! The graphics API, the entity replication layer and the model loaders are
//! collaborators behind the [`render::Renderer`], [`world::WorldView`] and
//! [`scene::ModelProvider`] traits.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use world_renderer::prelude::*;
//!
//! let mappings = ModelMappings::load_from_file("models.ron")?;
//! let mut scene = SceneRenderer::new(gl, GraphicsConfig::default(), mappings, Box::new(loaders));
//! scene.context_created();
//!
//! loop {
//!     scene.set_camera(camera.view());
//!     scene.draw_scene(&mut world, false, elapsed);
//!     if let Some((x, y)) = pointer_moved {
//!         scene.proc_event(&mut world, x, y);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;
pub mod scene;
pub mod world;

#[cfg(test)]
pub(crate) mod testing;

/// Common imports for users of the renderer
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigStore, GraphicsConfig, MemoryConfigStore},
        foundation::math::{AxisBox, Mat4, Point3, PosAndOrient, Quat, Vec3},
        render::{
            CameraMode, CameraView, Light, RenderError, RenderResult, Renderer,
            RendererCapabilities, Rgb, StateSink, StateTable,
        },
        scene::{
            Model, ModelMappings, ModelProvider, ModelTemplate, ObjectTemplate, RotationStyle,
            SceneRenderer,
        },
        world::{Attachment, EntityId, ScreenCoords, WorldEntity, WorldView},
    };
}
