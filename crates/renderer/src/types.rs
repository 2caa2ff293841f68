use std::fmt;
use std::path::{Path, PathBuf};

use glam::Mat4;

use crate::waves::WaveCount;

/// Programmable stages a pipeline can be assembled from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    TessControl,
    TessEvaluation,
    Fragment,
}

impl ShaderStage {
    /// Short label used when tagging compile diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::TessControl => "tess-control",
            ShaderStage::TessEvaluation => "tess-evaluation",
            ShaderStage::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rasterisation mode applied to every primitive of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PolygonMode {
    #[default]
    Fill,
    Line,
}

impl PolygonMode {
    /// Returns the other mode; used by the fill/wireframe toggle.
    pub fn toggled(self) -> Self {
        match self {
            PolygonMode::Fill => PolygonMode::Line,
            PolygonMode::Line => PolygonMode::Fill,
        }
    }
}

impl fmt::Display for PolygonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolygonMode::Fill => f.write_str("fill"),
            PolygonMode::Line => f.write_str("wireframe"),
        }
    }
}

/// Drawable surface size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, falling back to 1.0 while the window is minimised.
    pub fn aspect_ratio(self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Faces of a cubemap in the fixed upload order +X, -X, +Y, -Y, +Z, -Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    pub fn index(self) -> usize {
        match self {
            CubeFace::PositiveX => 0,
            CubeFace::NegativeX => 1,
            CubeFace::PositiveY => 2,
            CubeFace::NegativeY => 3,
            CubeFace::PositiveZ => 4,
            CubeFace::NegativeZ => 5,
        }
    }
}

impl fmt::Display for CubeFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(CUBEMAP_FACE_STEMS[self.index()])
    }
}

/// Conventional file stems for skybox faces, aligned with [`CubeFace::ALL`].
pub const CUBEMAP_FACE_STEMS: [&str; 6] = ["right", "left", "top", "bottom", "front", "back"];

/// Ordered list of image paths, one per cubemap face.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CubemapFaces {
    paths: [PathBuf; 6],
}

impl CubemapFaces {
    /// Faces listed explicitly in +X, -X, +Y, -Y, +Z, -Z order.
    pub fn new(paths: [PathBuf; 6]) -> Self {
        Self { paths }
    }

    /// Resolves `<stem>.<extension>` for every face inside `directory`.
    pub fn from_directory(directory: &Path, extension: &str) -> Self {
        Self {
            paths: std::array::from_fn(|index| {
                directory.join(format!("{}.{}", CUBEMAP_FACE_STEMS[index], extension))
            }),
        }
    }

    pub fn path(&self, face: CubeFace) -> &Path {
        &self.paths[face.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (CubeFace, &Path)> {
        CubeFace::ALL
            .into_iter()
            .map(move |face| (face, self.path(face)))
    }
}

/// Perspective projection parameters shared by both pipelines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self, screen: ScreenSize) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            screen.aspect_ratio(),
            self.near,
            self.far,
        )
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

/// Logical shader names for the tessellated ocean pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OceanShaderNames {
    pub vertex: String,
    pub fragment: String,
    pub tess_control: String,
    pub tess_evaluation: String,
}

impl Default for OceanShaderNames {
    fn default() -> Self {
        Self {
            vertex: "vert.glsl".into(),
            fragment: "frag.glsl".into(),
            tess_control: "gerstner_tesc.glsl".into(),
            tess_evaluation: "gerstner_tese.glsl".into(),
        }
    }
}

/// Logical shader names for the skybox pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkyboxShaderNames {
    pub vertex: String,
    pub fragment: String,
}

impl Default for SkyboxShaderNames {
    fn default() -> Self {
        Self {
            vertex: "skybox_vert.glsl".into(),
            fragment: "skybox_frag.glsl".into(),
        }
    }
}

/// Everything needed to build a [`RenderContext`](crate::RenderContext).
#[derive(Clone, Debug)]
pub struct RendererConfig {
    pub screen: ScreenSize,
    pub ocean_half_extent: f32,
    pub wave_count: WaveCount,
    pub polygon_mode: PolygonMode,
    pub projection: Projection,
    pub ocean_shaders: OceanShaderNames,
    pub skybox_shaders: SkyboxShaderNames,
    pub cubemap_faces: CubemapFaces,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            screen: ScreenSize::default(),
            ocean_half_extent: 1500.0,
            wave_count: WaveCount::default(),
            polygon_mode: PolygonMode::default(),
            projection: Projection::default(),
            ocean_shaders: OceanShaderNames::default(),
            skybox_shaders: SkyboxShaderNames::default(),
            cubemap_faces: CubemapFaces::from_directory(Path::new("."), "ppm"),
        }
    }
}
