//! Renderer crate for tideline, a tessellated ocean under a cubemap sky.
//!
//! The flow from configuration to pixels:
//!
//! ```text
//!   tideline / sceneconfig
//!          │ RendererConfig
//!          ▼
//!   RenderContext::new ──▶ PipelineLinker ──▶ UniformTable (resolved once)
//!          │                GeometryStore, CubemapLoader
//!          ▼
//!   FrameRenderer::render ──▶ ocean patch (GL_PATCHES) ──▶ skybox (LEQUAL)
//! ```
//!
//! All driver access goes through the [`GlApi`] trait. The binary hands in a
//! [`NativeGl`] loaded from the window's GL context.

mod camera;
mod compile;
mod glapi;
mod gpu;
mod source;
mod types;
mod waves;

pub use camera::{rotation_only, CameraView, FlyCamera};
pub use compile::{CompileError, ShaderCompiler, StageUnit};
pub use glapi::{
    log_driver_info, BufferId, Capability, DepthFunc, DriverString, GlApi, NativeGl, Primitive,
    ProgramId, ShaderId, TextureFilter, TextureId, TextureParameter, TextureWrap,
    UniformLocation, VertexArrayId,
};
pub use gpu::*;
pub use source::{FileShaderSource, ShaderSourceProvider};
pub use types::{
    CubeFace, CubemapFaces, OceanShaderNames, PolygonMode, Projection, RendererConfig,
    ScreenSize, ShaderStage, SkyboxShaderNames, CUBEMAP_FACE_STEMS,
};
pub use waves::{GerstnerWave, WaveCount, WaveCountError, WaveParameterSet, MAX_WAVES};
