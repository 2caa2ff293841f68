//! Thin command seam over the OpenGL entry points the renderer needs.
//!
//! Everything above this module talks to [`GlApi`] instead of raw `gl::*`
//! calls, so resource lifetimes and draw ordering can be exercised without a
//! live context. [`NativeGl`] forwards to the loaded driver; the unit tests
//! use a recording fake.

mod native;

#[cfg(test)]
pub(crate) mod fake;

pub use native::NativeGl;

use crate::gpu::UniformValue;
use crate::types::{CubeFace, PolygonMode, ShaderStage};

macro_rules! gl_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub u32);

        impl $name {
            /// Zero is never a valid object name.
            pub fn is_valid(self) -> bool {
                self.0 != 0
            }
        }
    };
}

gl_handle!(
    /// Name of a shader object.
    ShaderId
);
gl_handle!(
    /// Name of a program object.
    ProgramId
);
gl_handle!(VertexArrayId);
gl_handle!(BufferId);
gl_handle!(TextureId);

/// Resolved uniform location. Lookups that fail never produce one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthFunc {
    Less,
    LessOrEqual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    Patches,
    Triangles,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    DepthTest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
}

/// Cubemap sampler state applied after the faces are uploaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureParameter {
    MinFilter(TextureFilter),
    MagFilter(TextureFilter),
    WrapS(TextureWrap),
    WrapT(TextureWrap),
    WrapR(TextureWrap),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverString {
    Vendor,
    Renderer,
    Version,
    ShadingLanguageVersion,
}

/// Object-safe surface of the OpenGL 4.1 core calls used by the renderer.
///
/// Implementations must be driven from the thread that owns the current
/// context. Methods take `&self` so a single instance can be shared through
/// `Rc<dyn GlApi>` by every RAII wrapper.
pub trait GlApi {
    fn create_shader(&self, stage: ShaderStage) -> ShaderId;
    fn shader_source(&self, shader: ShaderId, source: &str);
    fn compile_shader(&self, shader: ShaderId);
    fn shader_compile_status(&self, shader: ShaderId) -> bool;
    fn shader_info_log(&self, shader: ShaderId) -> String;
    fn delete_shader(&self, shader: ShaderId);

    fn create_program(&self) -> ProgramId;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId);
    fn detach_shader(&self, program: ProgramId, shader: ShaderId);
    fn link_program(&self, program: ProgramId);
    fn program_link_status(&self, program: ProgramId) -> bool;
    fn validate_program(&self, program: ProgramId);
    fn program_validate_status(&self, program: ProgramId) -> bool;
    fn program_info_log(&self, program: ProgramId) -> String;
    fn use_program(&self, program: Option<ProgramId>);
    fn delete_program(&self, program: ProgramId);

    /// Returns `None` when the name is unknown or was optimised away.
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;
    /// Writes a value to the currently bound program.
    fn set_uniform(&self, location: UniformLocation, value: &UniformValue);

    fn create_vertex_array(&self) -> VertexArrayId;
    fn bind_vertex_array(&self, vao: Option<VertexArrayId>);
    fn delete_vertex_array(&self, vao: VertexArrayId);
    fn create_buffer(&self) -> BufferId;
    fn bind_array_buffer(&self, buffer: Option<BufferId>);
    /// Uploads static data into the bound array buffer.
    fn array_buffer_data(&self, data: &[u8]);
    fn delete_buffer(&self, buffer: BufferId);
    fn enable_vertex_attrib(&self, index: u32);
    fn disable_vertex_attrib(&self, index: u32);
    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        components: i32,
        stride_bytes: i32,
        offset_bytes: usize,
    );

    fn create_texture(&self) -> TextureId;
    fn active_texture_unit(&self, unit: u32);
    fn bind_cube_map(&self, texture: Option<TextureId>);
    /// Uploads tightly packed 8-bit RGB pixels into one face of the bound cubemap.
    fn cube_map_face_rgb8(&self, face: CubeFace, width: u32, height: u32, pixels: &[u8]);
    fn cube_map_parameter(&self, parameter: TextureParameter);
    fn delete_texture(&self, texture: TextureId);

    fn enable(&self, capability: Capability);
    fn depth_func(&self, func: DepthFunc);
    fn polygon_mode(&self, mode: PolygonMode);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, rgba: [f32; 4]);
    fn clear_color_and_depth(&self);
    fn patch_vertices(&self, count: i32);
    fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32);

    fn driver_string(&self, which: DriverString) -> Option<String>;
}

/// Bytes a tightly packed RGB8 image of `width` x `height` occupies.
pub(crate) fn rgb8_len(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)?.checked_mul(3)
}

/// Logs the driver identification strings once the context is current.
pub fn log_driver_info(gl: &dyn GlApi) {
    let read = |which| gl.driver_string(which).unwrap_or_else(|| "unknown".into());
    tracing::info!(
        vendor = %read(DriverString::Vendor),
        renderer = %read(DriverString::Renderer),
        version = %read(DriverString::Version),
        glsl = %read(DriverString::ShadingLanguageVersion),
        "OpenGL context ready"
    );
}
