use std::ffi::{c_void, CStr, CString};

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLsizeiptr, GLuint};

use super::{
    rgb8_len, BufferId, Capability, DepthFunc, DriverString, GlApi, Primitive, ProgramId,
    ShaderId, TextureFilter, TextureId, TextureParameter, TextureWrap, UniformLocation,
    VertexArrayId,
};
use crate::gpu::UniformValue;
use crate::types::{CubeFace, PolygonMode, ShaderStage};

/// [`GlApi`] backed by the process-wide function pointers of the `gl` crate.
///
/// Only construct this after a context has been made current; every call
/// assumes the pointers were resolved against that context.
pub struct NativeGl {
    _loaded: (),
}

impl NativeGl {
    /// Resolves every entry point through `loader` (typically the display's
    /// `get_proc_address`).
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        Self { _loaded: () }
    }
}

fn stage_enum(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::TessControl => gl::TESS_CONTROL_SHADER,
        ShaderStage::TessEvaluation => gl::TESS_EVALUATION_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
    }
}

fn face_target(face: CubeFace) -> GLenum {
    match face {
        CubeFace::PositiveX => gl::TEXTURE_CUBE_MAP_POSITIVE_X,
        CubeFace::NegativeX => gl::TEXTURE_CUBE_MAP_NEGATIVE_X,
        CubeFace::PositiveY => gl::TEXTURE_CUBE_MAP_POSITIVE_Y,
        CubeFace::NegativeY => gl::TEXTURE_CUBE_MAP_NEGATIVE_Y,
        CubeFace::PositiveZ => gl::TEXTURE_CUBE_MAP_POSITIVE_Z,
        CubeFace::NegativeZ => gl::TEXTURE_CUBE_MAP_NEGATIVE_Z,
    }
}

fn filter_enum(filter: TextureFilter) -> GLint {
    match filter {
        TextureFilter::Nearest => gl::NEAREST as GLint,
        TextureFilter::Linear => gl::LINEAR as GLint,
    }
}

fn wrap_enum(wrap: TextureWrap) -> GLint {
    match wrap {
        TextureWrap::Repeat => gl::REPEAT as GLint,
        TextureWrap::ClampToEdge => gl::CLAMP_TO_EDGE as GLint,
    }
}

fn truncate_log(mut buffer: Vec<u8>, written: GLsizei) -> String {
    buffer.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buffer).trim_end().to_string()
}

impl GlApi for NativeGl {
    fn create_shader(&self, stage: ShaderStage) -> ShaderId {
        ShaderId(unsafe { gl::CreateShader(stage_enum(stage)) })
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        let pointer = source.as_ptr() as *const GLchar;
        let length = source.len() as GLint;
        unsafe { gl::ShaderSource(shader.0, 1, &pointer, &length) };
    }

    fn compile_shader(&self, shader: ShaderId) {
        unsafe { gl::CompileShader(shader.0) };
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        let mut status = gl::FALSE as GLint;
        unsafe { gl::GetShaderiv(shader.0, gl::COMPILE_STATUS, &mut status) };
        status == gl::TRUE as GLint
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        let mut length: GLint = 0;
        unsafe { gl::GetShaderiv(shader.0, gl::INFO_LOG_LENGTH, &mut length) };
        if length <= 0 {
            return String::new();
        }
        let mut buffer = vec![0u8; length as usize];
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetShaderInfoLog(
                shader.0,
                length,
                &mut written,
                buffer.as_mut_ptr() as *mut GLchar,
            )
        };
        truncate_log(buffer, written)
    }

    fn delete_shader(&self, shader: ShaderId) {
        unsafe { gl::DeleteShader(shader.0) };
    }

    fn create_program(&self) -> ProgramId {
        ProgramId(unsafe { gl::CreateProgram() })
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        unsafe { gl::AttachShader(program.0, shader.0) };
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        unsafe { gl::DetachShader(program.0, shader.0) };
    }

    fn link_program(&self, program: ProgramId) {
        unsafe { gl::LinkProgram(program.0) };
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        let mut status = gl::FALSE as GLint;
        unsafe { gl::GetProgramiv(program.0, gl::LINK_STATUS, &mut status) };
        status == gl::TRUE as GLint
    }

    fn validate_program(&self, program: ProgramId) {
        unsafe { gl::ValidateProgram(program.0) };
    }

    fn program_validate_status(&self, program: ProgramId) -> bool {
        let mut status = gl::FALSE as GLint;
        unsafe { gl::GetProgramiv(program.0, gl::VALIDATE_STATUS, &mut status) };
        status == gl::TRUE as GLint
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        let mut length: GLint = 0;
        unsafe { gl::GetProgramiv(program.0, gl::INFO_LOG_LENGTH, &mut length) };
        if length <= 0 {
            return String::new();
        }
        let mut buffer = vec![0u8; length as usize];
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetProgramInfoLog(
                program.0,
                length,
                &mut written,
                buffer.as_mut_ptr() as *mut GLchar,
            )
        };
        truncate_log(buffer, written)
    }

    fn use_program(&self, program: Option<ProgramId>) {
        unsafe { gl::UseProgram(program.map_or(0, |id| id.0)) };
    }

    fn delete_program(&self, program: ProgramId) {
        unsafe { gl::DeleteProgram(program.0) };
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let name = CString::new(name).ok()?;
        let location = unsafe { gl::GetUniformLocation(program.0, name.as_ptr()) };
        (location >= 0).then_some(UniformLocation(location))
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        let location = location.0;
        unsafe {
            match value {
                UniformValue::Mat4(matrix) => {
                    gl::UniformMatrix4fv(location, 1, gl::FALSE, matrix.as_ptr())
                }
                UniformValue::Vec3(vector) => gl::Uniform3fv(location, 1, vector.as_ptr()),
                UniformValue::Vec2(vector) => gl::Uniform2f(location, vector[0], vector[1]),
                UniformValue::Float(scalar) => gl::Uniform1f(location, *scalar),
                UniformValue::UInt(scalar) => gl::Uniform1ui(location, *scalar),
                UniformValue::Sampler(unit) => gl::Uniform1i(location, *unit),
            }
        }
    }

    fn create_vertex_array(&self) -> VertexArrayId {
        let mut id: GLuint = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        VertexArrayId(id)
    }

    fn bind_vertex_array(&self, vao: Option<VertexArrayId>) {
        unsafe { gl::BindVertexArray(vao.map_or(0, |id| id.0)) };
    }

    fn delete_vertex_array(&self, vao: VertexArrayId) {
        unsafe { gl::DeleteVertexArrays(1, &vao.0) };
    }

    fn create_buffer(&self) -> BufferId {
        let mut id: GLuint = 0;
        unsafe { gl::GenBuffers(1, &mut id) };
        BufferId(id)
    }

    fn bind_array_buffer(&self, buffer: Option<BufferId>) {
        unsafe { gl::BindBuffer(gl::ARRAY_BUFFER, buffer.map_or(0, |id| id.0)) };
    }

    fn array_buffer_data(&self, data: &[u8]) {
        unsafe {
            gl::BufferData(
                gl::ARRAY_BUFFER,
                data.len() as GLsizeiptr,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            )
        };
    }

    fn delete_buffer(&self, buffer: BufferId) {
        unsafe { gl::DeleteBuffers(1, &buffer.0) };
    }

    fn enable_vertex_attrib(&self, index: u32) {
        unsafe { gl::EnableVertexAttribArray(index) };
    }

    fn disable_vertex_attrib(&self, index: u32) {
        unsafe { gl::DisableVertexAttribArray(index) };
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        components: i32,
        stride_bytes: i32,
        offset_bytes: usize,
    ) {
        unsafe {
            gl::VertexAttribPointer(
                index,
                components,
                gl::FLOAT,
                gl::FALSE,
                stride_bytes,
                offset_bytes as *const c_void,
            )
        };
    }

    fn create_texture(&self) -> TextureId {
        let mut id: GLuint = 0;
        unsafe { gl::GenTextures(1, &mut id) };
        TextureId(id)
    }

    fn active_texture_unit(&self, unit: u32) {
        unsafe { gl::ActiveTexture(gl::TEXTURE0 + unit) };
    }

    fn bind_cube_map(&self, texture: Option<TextureId>) {
        unsafe { gl::BindTexture(gl::TEXTURE_CUBE_MAP, texture.map_or(0, |id| id.0)) };
    }

    fn cube_map_face_rgb8(&self, face: CubeFace, width: u32, height: u32, pixels: &[u8]) {
        // The driver reads width * height * 3 bytes from `pixels`.
        if rgb8_len(width, height) != Some(pixels.len()) {
            tracing::error!(
                face = %face,
                width,
                height,
                found = pixels.len(),
                "refusing cubemap upload with mismatched pixel buffer"
            );
            return;
        }
        unsafe {
            // RGB rows are rarely 4-byte aligned.
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                face_target(face),
                0,
                gl::RGB as GLint,
                width as GLsizei,
                height as GLsizei,
                0,
                gl::RGB,
                gl::UNSIGNED_BYTE,
                pixels.as_ptr() as *const c_void,
            );
        }
    }

    fn cube_map_parameter(&self, parameter: TextureParameter) {
        let (name, value) = match parameter {
            TextureParameter::MinFilter(filter) => (gl::TEXTURE_MIN_FILTER, filter_enum(filter)),
            TextureParameter::MagFilter(filter) => (gl::TEXTURE_MAG_FILTER, filter_enum(filter)),
            TextureParameter::WrapS(wrap) => (gl::TEXTURE_WRAP_S, wrap_enum(wrap)),
            TextureParameter::WrapT(wrap) => (gl::TEXTURE_WRAP_T, wrap_enum(wrap)),
            TextureParameter::WrapR(wrap) => (gl::TEXTURE_WRAP_R, wrap_enum(wrap)),
        };
        unsafe { gl::TexParameteri(gl::TEXTURE_CUBE_MAP, name, value) };
    }

    fn delete_texture(&self, texture: TextureId) {
        unsafe { gl::DeleteTextures(1, &texture.0) };
    }

    fn enable(&self, capability: Capability) {
        let cap = match capability {
            Capability::DepthTest => gl::DEPTH_TEST,
        };
        unsafe { gl::Enable(cap) };
    }

    fn depth_func(&self, func: DepthFunc) {
        let func = match func {
            DepthFunc::Less => gl::LESS,
            DepthFunc::LessOrEqual => gl::LEQUAL,
        };
        unsafe { gl::DepthFunc(func) };
    }

    fn polygon_mode(&self, mode: PolygonMode) {
        let mode = match mode {
            PolygonMode::Fill => gl::FILL,
            PolygonMode::Line => gl::LINE,
        };
        unsafe { gl::PolygonMode(gl::FRONT_AND_BACK, mode) };
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { gl::Viewport(x, y, width, height) };
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        unsafe { gl::ClearColor(rgba[0], rgba[1], rgba[2], rgba[3]) };
    }

    fn clear_color_and_depth(&self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT) };
    }

    fn patch_vertices(&self, count: i32) {
        unsafe { gl::PatchParameteri(gl::PATCH_VERTICES, count) };
    }

    fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32) {
        let mode = match primitive {
            Primitive::Patches => gl::PATCHES,
            Primitive::Triangles => gl::TRIANGLES,
        };
        unsafe { gl::DrawArrays(mode, first, count) };
    }

    fn driver_string(&self, which: DriverString) -> Option<String> {
        let name = match which {
            DriverString::Vendor => gl::VENDOR,
            DriverString::Renderer => gl::RENDERER,
            DriverString::Version => gl::VERSION,
            DriverString::ShadingLanguageVersion => gl::SHADING_LANGUAGE_VERSION,
        };
        let pointer = unsafe { gl::GetString(name) };
        if pointer.is_null() {
            return None;
        }
        let text = unsafe { CStr::from_ptr(pointer as *const std::ffi::c_char) };
        Some(text.to_string_lossy().into_owned())
    }
}
