use std::borrow::Cow;

use glam::{Mat4, Vec3};

use super::pipeline::PipelineProgram;
use crate::glapi::{GlApi, UniformLocation};
use crate::waves::{WaveCount, WaveParameterSet, MAX_WAVES};

/// GLSL type a uniform is declared with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformKind {
    Mat4,
    Vec3,
    Vec2,
    Float,
    UInt,
    Sampler,
}

/// A value ready to be written to a uniform location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    /// Column-major, untransposed.
    Mat4([f32; 16]),
    Vec3([f32; 3]),
    Vec2([f32; 2]),
    Float(f32),
    UInt(u32),
    /// Texture unit index.
    Sampler(i32),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Mat4(_) => UniformKind::Mat4,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::UInt(_) => UniformKind::UInt,
            UniformValue::Sampler(_) => UniformKind::Sampler,
        }
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        UniformValue::Mat4(value.to_cols_array())
    }
}

impl From<Vec3> for UniformValue {
    fn from(value: Vec3) -> Self {
        UniformValue::Vec3(value.to_array())
    }
}

/// Name and declared type of one uniform a pipeline expects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformDescriptor {
    pub name: Cow<'static, str>,
    pub kind: UniformKind,
}

impl UniformDescriptor {
    pub fn new(name: impl Into<Cow<'static, str>>, kind: UniformKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("pipeline `{pipeline}` is missing uniforms: {}", .names.join(", "))]
    Missing {
        pipeline: &'static str,
        names: Vec<String>,
    },
    #[error("uniform `{name}` expects {expected:?} but was given {found:?}")]
    TypeMismatch {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },
    #[error("pipeline `{pipeline}` expects {expected} uniform values, got {found}")]
    Arity {
        pipeline: &'static str,
        expected: usize,
        found: usize,
    },
}

#[derive(Clone, Debug)]
struct ResolvedUniform {
    descriptor: UniformDescriptor,
    location: UniformLocation,
}

/// Uniform locations resolved once against a linked program.
#[derive(Clone, Debug)]
pub struct UniformTable {
    pipeline: &'static str,
    slots: Vec<ResolvedUniform>,
}

impl UniformTable {
    /// Looks up every descriptor, reporting all unresolved names together.
    pub fn resolve(
        gl: &dyn GlApi,
        program: &PipelineProgram,
        descriptors: &[UniformDescriptor],
    ) -> Result<Self, BindError> {
        let mut slots = Vec::with_capacity(descriptors.len());
        let mut missing = Vec::new();
        for descriptor in descriptors {
            match gl.uniform_location(program.id(), &descriptor.name) {
                Some(location) => slots.push(ResolvedUniform {
                    descriptor: descriptor.clone(),
                    location,
                }),
                None => missing.push(descriptor.name.to_string()),
            }
        }

        if !missing.is_empty() {
            tracing::error!(
                pipeline = program.label(),
                missing = ?missing,
                "uniform lookup failed"
            );
            return Err(BindError::Missing {
                pipeline: program.label(),
                names: missing,
            });
        }

        tracing::debug!(
            pipeline = program.label(),
            count = slots.len(),
            "resolved uniform table"
        );
        Ok(Self {
            pipeline: program.label(),
            slots,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Writes `values` in descriptor order to the currently bound program.
    ///
    /// Every value is type-checked before anything is written.
    pub fn bind_all(&self, gl: &dyn GlApi, values: &[UniformValue]) -> Result<(), BindError> {
        if values.len() != self.slots.len() {
            return Err(BindError::Arity {
                pipeline: self.pipeline,
                expected: self.slots.len(),
                found: values.len(),
            });
        }
        for (slot, value) in self.slots.iter().zip(values) {
            if slot.descriptor.kind != value.kind() {
                return Err(BindError::TypeMismatch {
                    name: slot.descriptor.name.to_string(),
                    expected: slot.descriptor.kind,
                    found: value.kind(),
                });
            }
        }
        for (slot, value) in self.slots.iter().zip(values) {
            gl.set_uniform(slot.location, value);
        }
        Ok(())
    }
}

const WAVE_FIELDS: [(&str, UniformKind); 5] = [
    ("direction", UniformKind::Vec2),
    ("amplitude", UniformKind::Float),
    ("steepness", UniformKind::Float),
    ("frequency", UniformKind::Float),
    ("speed", UniformKind::Float),
];

/// Per-frame inputs of the tessellated ocean pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OceanUniforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub skybox_unit: i32,
    pub camera_position: Vec3,
    pub wave_count: WaveCount,
    pub time: f32,
    pub waves: WaveParameterSet,
}

impl OceanUniforms {
    /// Names in the order [`OceanUniforms::values`] produces them.
    pub fn descriptors() -> Vec<UniformDescriptor> {
        let mut descriptors = vec![
            UniformDescriptor::new("u_ModelMatrix", UniformKind::Mat4),
            UniformDescriptor::new("u_ViewMatrix", UniformKind::Mat4),
            UniformDescriptor::new("u_Projection", UniformKind::Mat4),
            UniformDescriptor::new("skybox", UniformKind::Sampler),
            UniformDescriptor::new("cameraPos", UniformKind::Vec3),
            UniformDescriptor::new("num_of_waves", UniformKind::UInt),
            UniformDescriptor::new("time", UniformKind::Float),
        ];
        for slot in 0..MAX_WAVES {
            for (field, kind) in WAVE_FIELDS {
                descriptors.push(UniformDescriptor::new(
                    format!("gerstner_waves[{slot}].{field}"),
                    kind,
                ));
            }
        }
        descriptors
    }

    pub fn values(&self) -> Vec<UniformValue> {
        let mut values = vec![
            self.model.into(),
            self.view.into(),
            self.projection.into(),
            UniformValue::Sampler(self.skybox_unit),
            self.camera_position.into(),
            UniformValue::UInt(self.wave_count.get()),
            UniformValue::Float(self.time),
        ];
        for wave in self.waves.slots() {
            values.extend([
                UniformValue::Vec2(wave.direction.to_array()),
                UniformValue::Float(wave.amplitude),
                UniformValue::Float(wave.steepness),
                UniformValue::Float(wave.frequency),
                UniformValue::Float(wave.speed),
            ]);
        }
        values
    }
}

/// Per-frame inputs of the skybox pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyboxUniforms {
    /// Camera view with the translation stripped.
    pub view: Mat4,
    pub projection: Mat4,
    pub skybox_unit: i32,
}

impl SkyboxUniforms {
    pub fn descriptors() -> Vec<UniformDescriptor> {
        vec![
            UniformDescriptor::new("view", UniformKind::Mat4),
            UniformDescriptor::new("projection", UniformKind::Mat4),
            UniformDescriptor::new("skybox", UniformKind::Sampler),
        ]
    }

    pub fn values(&self) -> Vec<UniformValue> {
        vec![
            self.view.into(),
            self.projection.into(),
            UniformValue::Sampler(self.skybox_unit),
        ]
    }
}
