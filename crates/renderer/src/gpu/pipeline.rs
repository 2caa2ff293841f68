use std::rc::Rc;

use crate::compile::{CompileError, ShaderCompiler};
use crate::glapi::{GlApi, ProgramId};
use crate::types::ShaderStage;

/// Outcome of assembling a pipeline.
///
/// Only `Linked` and `ValidateFailed` programs are drawable; validation
/// depends on bound state at the time of the call and is reported, not fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStatus {
    Linked,
    CompileFailed { errors: Vec<CompileError> },
    LinkFailed { log: String },
    ValidateFailed { log: String },
}

impl PipelineStatus {
    pub fn is_linked(&self) -> bool {
        matches!(
            self,
            PipelineStatus::Linked | PipelineStatus::ValidateFailed { .. }
        )
    }
}

/// A program object plus how its assembly went. Deleted when dropped.
pub struct PipelineProgram {
    gl: Rc<dyn GlApi>,
    id: ProgramId,
    label: &'static str,
    status: PipelineStatus,
}

impl PipelineProgram {
    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn status(&self) -> &PipelineStatus {
        &self.status
    }

    pub fn is_linked(&self) -> bool {
        self.status.is_linked()
    }
}

impl Drop for PipelineProgram {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}

impl std::fmt::Debug for PipelineProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineProgram")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("status", &self.status)
            .finish()
    }
}

/// Compiles stage sources and links them into programs.
pub struct PipelineLinker {
    gl: Rc<dyn GlApi>,
    compiler: ShaderCompiler,
}

impl PipelineLinker {
    pub fn new(gl: Rc<dyn GlApi>) -> Self {
        Self {
            compiler: ShaderCompiler::new(Rc::clone(&gl)),
            gl,
        }
    }

    /// Vertex, tessellation control, tessellation evaluation and fragment.
    pub fn link_tessellated(
        &self,
        label: &'static str,
        vertex: &str,
        fragment: &str,
        tess_control: &str,
        tess_evaluation: &str,
    ) -> PipelineProgram {
        self.link_stages(
            label,
            &[
                (ShaderStage::Vertex, vertex),
                (ShaderStage::TessControl, tess_control),
                (ShaderStage::TessEvaluation, tess_evaluation),
                (ShaderStage::Fragment, fragment),
            ],
        )
    }

    /// Vertex and fragment only.
    pub fn link_simple(&self, label: &'static str, vertex: &str, fragment: &str) -> PipelineProgram {
        self.link_stages(
            label,
            &[(ShaderStage::Vertex, vertex), (ShaderStage::Fragment, fragment)],
        )
    }

    /// Always hands back a program object; inspect [`PipelineProgram::status`]
    /// before drawing with it. A stage that fails to compile is never
    /// attached, so in that case linking is skipped altogether.
    fn link_stages(&self, label: &'static str, stages: &[(ShaderStage, &str)]) -> PipelineProgram {
        let id = self.gl.create_program();
        let mut program = PipelineProgram {
            gl: Rc::clone(&self.gl),
            id,
            label,
            status: PipelineStatus::Linked,
        };

        let mut units = Vec::with_capacity(stages.len());
        let mut errors = Vec::new();
        for (stage, source) in stages {
            match self.compiler.compile(*stage, source) {
                Ok(unit) => units.push(unit),
                Err(err) => errors.push(err),
            }
        }

        if !errors.is_empty() {
            let failed: Vec<_> = errors.iter().map(|err| err.stage.label()).collect();
            tracing::error!(
                pipeline = label,
                failed = ?failed,
                "pipeline left unlinked after stage compilation failures"
            );
            program.status = PipelineStatus::CompileFailed { errors };
            return program;
        }

        for unit in &units {
            self.gl.attach_shader(id, unit.id());
        }
        self.gl.link_program(id);
        self.gl.validate_program(id);

        program.status = if !self.gl.program_link_status(id) {
            let log = self.gl.program_info_log(id);
            tracing::error!(pipeline = label, "program link failed:\n{log}");
            PipelineStatus::LinkFailed { log }
        } else if !self.gl.program_validate_status(id) {
            let log = self.gl.program_info_log(id);
            tracing::warn!(pipeline = label, "program validation failed:\n{log}");
            PipelineStatus::ValidateFailed { log }
        } else {
            tracing::info!(pipeline = label, program = id.0, stages = units.len(), "pipeline linked");
            PipelineStatus::Linked
        };

        for unit in &units {
            self.gl.detach_shader(id, unit.id());
        }
        program
    }
}
