use std::rc::Rc;

use crate::glapi::{GlApi, ShaderId};
use crate::types::ShaderStage;

/// A stage that failed to compile, carrying the driver's diagnostic log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} shader failed to compile: {log}")]
pub struct CompileError {
    pub stage: ShaderStage,
    pub log: String,
}

/// A successfully compiled shader object. Deleted when dropped.
pub struct StageUnit {
    gl: Rc<dyn GlApi>,
    id: ShaderId,
    stage: ShaderStage,
}

impl StageUnit {
    pub fn id(&self) -> ShaderId {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl Drop for StageUnit {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

impl std::fmt::Debug for StageUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageUnit")
            .field("id", &self.id)
            .field("stage", &self.stage)
            .finish()
    }
}

/// Turns GLSL text into stage units.
pub struct ShaderCompiler {
    gl: Rc<dyn GlApi>,
}

impl ShaderCompiler {
    pub fn new(gl: Rc<dyn GlApi>) -> Self {
        Self { gl }
    }

    /// Compiles `source` for `stage`.
    ///
    /// On failure the diagnostic log is emitted under the stage's label and
    /// the half-built shader object is released before returning.
    pub fn compile(&self, stage: ShaderStage, source: &str) -> Result<StageUnit, CompileError> {
        let id = self.gl.create_shader(stage);
        let unit = StageUnit {
            gl: Rc::clone(&self.gl),
            id,
            stage,
        };
        self.gl.shader_source(id, source);
        self.gl.compile_shader(id);

        if !self.gl.shader_compile_status(id) {
            let log = self.gl.shader_info_log(id);
            tracing::error!(stage = %stage, "shader compilation failed:\n{log}");
            return Err(CompileError { stage, log });
        }

        tracing::debug!(stage = %stage, shader = id.0, "compiled shader stage");
        Ok(unit)
    }
}
