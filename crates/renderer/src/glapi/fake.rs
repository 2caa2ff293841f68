//! Recording [`GlApi`] used by unit tests.
//!
//! Compilation fails for blank sources or sources containing `#error`.
//! Linking fails when a program has no vertex stage, an attached shader did
//! not compile, or [`FakeGl::fail_link`] was called. Uniform lookups succeed for linked programs unless the name was
//! hidden with [`FakeGl::hide_uniform`].

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::{
    BufferId, Capability, DepthFunc, DriverString, GlApi, Primitive, ProgramId, ShaderId,
    TextureId, TextureParameter, UniformLocation, VertexArrayId,
};
use crate::gpu::UniformValue;
use crate::types::{CubeFace, PolygonMode, ShaderStage};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum GlCall {
    CreateShader(ShaderStage, ShaderId),
    CompileShader(ShaderId),
    DeleteShader(ShaderId),
    CreateProgram(ProgramId),
    AttachShader(ProgramId, ShaderId),
    DetachShader(ProgramId, ShaderId),
    LinkProgram(ProgramId),
    ValidateProgram(ProgramId),
    UseProgram(Option<ProgramId>),
    DeleteProgram(ProgramId),
    SetUniform(UniformLocation, UniformValue),
    CreateVertexArray(VertexArrayId),
    BindVertexArray(Option<VertexArrayId>),
    DeleteVertexArray(VertexArrayId),
    CreateBuffer(BufferId),
    BindArrayBuffer(Option<BufferId>),
    BufferData(Vec<f32>),
    DeleteBuffer(BufferId),
    EnableAttrib(u32),
    DisableAttrib(u32),
    AttribPointer {
        index: u32,
        components: i32,
        stride_bytes: i32,
        offset_bytes: usize,
    },
    CreateTexture(TextureId),
    ActiveTexture(u32),
    BindCubeMap(Option<TextureId>),
    CubeFace {
        face: CubeFace,
        width: u32,
        height: u32,
        first_pixel: Option<[u8; 3]>,
    },
    CubeParameter(TextureParameter),
    DeleteTexture(TextureId),
    Enable(Capability),
    DepthFunc(DepthFunc),
    PolygonMode(PolygonMode),
    Viewport(i32, i32, i32, i32),
    ClearColor([f32; 4]),
    Clear,
    PatchVertices(i32),
    DrawArrays(Primitive, i32, i32),
}

#[derive(Debug)]
struct FakeShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

#[derive(Debug, Default)]
struct FakeProgram {
    attached: Vec<ShaderId>,
    linked: bool,
    validated: bool,
    locations: HashMap<String, i32>,
}

#[derive(Debug, Default)]
struct FakeState {
    next_name: u32,
    calls: Vec<GlCall>,
    shaders: HashMap<ShaderId, FakeShader>,
    programs: HashMap<ProgramId, FakeProgram>,
    vertex_arrays: HashSet<VertexArrayId>,
    buffers: HashSet<BufferId>,
    textures: HashSet<TextureId>,
    hidden_uniforms: HashSet<String>,
    fail_link: bool,
    fail_validation: bool,
    next_location: i32,
}

impl FakeState {
    fn name(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeGl {
    state: RefCell<FakeState>,
}

impl FakeGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every lookup of `name` fail, as if the driver optimised it out.
    pub fn hide_uniform(&self, name: &str) {
        self.state.borrow_mut().hidden_uniforms.insert(name.to_string());
    }

    /// Makes every link fail, as a cross-stage interface mismatch would.
    pub fn fail_link(&self) {
        self.state.borrow_mut().fail_link = true;
    }

    pub fn fail_validation(&self) {
        self.state.borrow_mut().fail_validation = true;
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    fn record(&self, call: GlCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl GlApi for FakeGl {
    fn create_shader(&self, stage: ShaderStage) -> ShaderId {
        let mut state = self.state.borrow_mut();
        let id = ShaderId(state.name());
        state.shaders.insert(
            id,
            FakeShader {
                stage,
                source: String::new(),
                compiled: false,
            },
        );
        state.calls.push(GlCall::CreateShader(stage, id));
        id
    }

    fn shader_source(&self, shader: ShaderId, source: &str) {
        if let Some(entry) = self.state.borrow_mut().shaders.get_mut(&shader) {
            entry.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        if let Some(entry) = state.shaders.get_mut(&shader) {
            entry.compiled = !entry.source.trim().is_empty() && !entry.source.contains("#error");
        }
        state.calls.push(GlCall::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: ShaderId) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|entry| entry.compiled)
    }

    fn shader_info_log(&self, shader: ShaderId) -> String {
        match self.state.borrow().shaders.get(&shader) {
            Some(entry) if !entry.compiled => {
                format!("0:1(1): error: {} stage rejected", entry.stage)
            }
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        state.shaders.remove(&shader);
        state.calls.push(GlCall::DeleteShader(shader));
    }

    fn create_program(&self) -> ProgramId {
        let mut state = self.state.borrow_mut();
        let id = ProgramId(state.name());
        state.programs.insert(id, FakeProgram::default());
        state.calls.push(GlCall::CreateProgram(id));
        id
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        if let Some(entry) = state.programs.get_mut(&program) {
            entry.attached.push(shader);
        }
        state.calls.push(GlCall::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: ProgramId, shader: ShaderId) {
        let mut state = self.state.borrow_mut();
        if let Some(entry) = state.programs.get_mut(&program) {
            entry.attached.retain(|attached| *attached != shader);
        }
        state.calls.push(GlCall::DetachShader(program, shader));
    }

    fn link_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        let attached = state
            .programs
            .get(&program)
            .map(|entry| entry.attached.clone())
            .unwrap_or_default();
        let stages_ok = attached.iter().all(|id| {
            state
                .shaders
                .get(id)
                .is_some_and(|shader| shader.compiled)
        });
        let has_vertex = attached.iter().any(|id| {
            state
                .shaders
                .get(id)
                .is_some_and(|shader| shader.stage == ShaderStage::Vertex)
        });
        let fail = state.fail_link;
        if let Some(entry) = state.programs.get_mut(&program) {
            entry.linked = stages_ok && has_vertex && !fail;
        }
        state.calls.push(GlCall::LinkProgram(program));
    }

    fn program_link_status(&self, program: ProgramId) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|entry| entry.linked)
    }

    fn validate_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        let fail = state.fail_validation;
        if let Some(entry) = state.programs.get_mut(&program) {
            entry.validated = entry.linked && !fail;
        }
        state.calls.push(GlCall::ValidateProgram(program));
    }

    fn program_validate_status(&self, program: ProgramId) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|entry| entry.validated)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        match self.state.borrow().programs.get(&program) {
            Some(entry) if !entry.linked => "error: program failed to link".into(),
            Some(entry) if !entry.validated => "validation: sampler unit mismatch".into(),
            _ => String::new(),
        }
    }

    fn use_program(&self, program: Option<ProgramId>) {
        self.record(GlCall::UseProgram(program));
    }

    fn delete_program(&self, program: ProgramId) {
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        state.calls.push(GlCall::DeleteProgram(program));
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let mut state = self.state.borrow_mut();
        if state.hidden_uniforms.contains(name) {
            return None;
        }
        let next = state.next_location;
        let entry = state.programs.get_mut(&program)?;
        if !entry.linked {
            return None;
        }
        let location = *entry.locations.entry(name.to_string()).or_insert(next);
        if location == next {
            state.next_location += 1;
        }
        Some(UniformLocation(location))
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        self.record(GlCall::SetUniform(location, *value));
    }

    fn create_vertex_array(&self) -> VertexArrayId {
        let mut state = self.state.borrow_mut();
        let id = VertexArrayId(state.name());
        state.vertex_arrays.insert(id);
        state.calls.push(GlCall::CreateVertexArray(id));
        id
    }

    fn bind_vertex_array(&self, vao: Option<VertexArrayId>) {
        self.record(GlCall::BindVertexArray(vao));
    }

    fn delete_vertex_array(&self, vao: VertexArrayId) {
        let mut state = self.state.borrow_mut();
        state.vertex_arrays.remove(&vao);
        state.calls.push(GlCall::DeleteVertexArray(vao));
    }

    fn create_buffer(&self) -> BufferId {
        let mut state = self.state.borrow_mut();
        let id = BufferId(state.name());
        state.buffers.insert(id);
        state.calls.push(GlCall::CreateBuffer(id));
        id
    }

    fn bind_array_buffer(&self, buffer: Option<BufferId>) {
        self.record(GlCall::BindArrayBuffer(buffer));
    }

    fn array_buffer_data(&self, data: &[u8]) {
        let floats = data
            .chunks_exact(4)
            .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        self.record(GlCall::BufferData(floats));
    }

    fn delete_buffer(&self, buffer: BufferId) {
        let mut state = self.state.borrow_mut();
        state.buffers.remove(&buffer);
        state.calls.push(GlCall::DeleteBuffer(buffer));
    }

    fn enable_vertex_attrib(&self, index: u32) {
        self.record(GlCall::EnableAttrib(index));
    }

    fn disable_vertex_attrib(&self, index: u32) {
        self.record(GlCall::DisableAttrib(index));
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        components: i32,
        stride_bytes: i32,
        offset_bytes: usize,
    ) {
        self.record(GlCall::AttribPointer {
            index,
            components,
            stride_bytes,
            offset_bytes,
        });
    }

    fn create_texture(&self) -> TextureId {
        let mut state = self.state.borrow_mut();
        let id = TextureId(state.name());
        state.textures.insert(id);
        state.calls.push(GlCall::CreateTexture(id));
        id
    }

    fn active_texture_unit(&self, unit: u32) {
        self.record(GlCall::ActiveTexture(unit));
    }

    fn bind_cube_map(&self, texture: Option<TextureId>) {
        self.record(GlCall::BindCubeMap(texture));
    }

    fn cube_map_face_rgb8(&self, face: CubeFace, width: u32, height: u32, pixels: &[u8]) {
        let first_pixel = (pixels.len() >= 3).then(|| [pixels[0], pixels[1], pixels[2]]);
        self.record(GlCall::CubeFace {
            face,
            width,
            height,
            first_pixel,
        });
    }

    fn cube_map_parameter(&self, parameter: TextureParameter) {
        self.record(GlCall::CubeParameter(parameter));
    }

    fn delete_texture(&self, texture: TextureId) {
        let mut state = self.state.borrow_mut();
        state.textures.remove(&texture);
        state.calls.push(GlCall::DeleteTexture(texture));
    }

    fn enable(&self, capability: Capability) {
        self.record(GlCall::Enable(capability));
    }

    fn depth_func(&self, func: DepthFunc) {
        self.record(GlCall::DepthFunc(func));
    }

    fn polygon_mode(&self, mode: PolygonMode) {
        self.record(GlCall::PolygonMode(mode));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport(x, y, width, height));
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        self.record(GlCall::ClearColor(rgba));
    }

    fn clear_color_and_depth(&self) {
        self.record(GlCall::Clear);
    }

    fn patch_vertices(&self, count: i32) {
        self.record(GlCall::PatchVertices(count));
    }

    fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32) {
        self.record(GlCall::DrawArrays(primitive, first, count));
    }

    fn driver_string(&self, which: DriverString) -> Option<String> {
        match which {
            DriverString::Vendor => Some("fake".into()),
            _ => None,
        }
    }
}
