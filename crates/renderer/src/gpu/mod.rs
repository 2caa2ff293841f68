//! GPU resource lifecycle and per-frame orchestration.
//!
//! - `pipeline` links the tessellated ocean program and the skybox program
//!   and owns their lifetimes.
//! - `uniforms` resolves each program's uniform table once and type-checks
//!   every per-frame write.
//! - `geometry` holds the two static meshes and their vertex layouts.
//! - `cubemap` decodes and uploads the six skybox faces.
//! - `timeline` turns wall-clock time into the animation clock.
//! - `state` gathers everything into a `RenderContext`; `frame` draws it.

mod cubemap;
mod frame;
mod geometry;
mod pipeline;
mod state;
mod timeline;
mod uniforms;

pub use cubemap::{CubemapLoader, CubemapTexture, FaceDecoder, FaceImage, ImageFaceDecoder};
pub use frame::{FrameRenderer, CLEAR_COLOR, PATCH_VERTICES, SKYBOX_TEXTURE_UNIT};
pub use geometry::{
    ocean_patch_vertices, GeometryBuffer, GeometryStore, VertexAttribute, VertexLayout,
    OCEAN_VERTEX_FLOATS, SKYBOX_VERTICES,
};
pub use pipeline::{PipelineLinker, PipelineProgram, PipelineStatus};
pub use state::{FrameState, RenderContext, RenderError, OCEAN_PIPELINE, SKYBOX_PIPELINE};
pub use timeline::FrameClock;
pub use uniforms::{
    BindError, OceanUniforms, SkyboxUniforms, UniformDescriptor, UniformKind, UniformTable,
    UniformValue,
};
