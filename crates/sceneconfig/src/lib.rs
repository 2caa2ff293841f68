use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Highest wave count the ocean shader sums.
pub const MAX_WAVES: u32 = 4;

/// Face files in +X, -X, +Y, -Y, +Z, -Z order.
pub const DEFAULT_FACES: [&str; 6] = [
    "right.ppm",
    "left.ppm",
    "top.ppm",
    "bottom.ppm",
    "front.ppm",
    "back.ppm",
];

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub ocean: OceanConfig,
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub shaders: ShaderConfig,
    pub skybox: SkyboxConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            title: "Tesselation".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OceanConfig {
    /// Half the side length of the square ocean patch, in world units.
    pub half_extent: f32,
    pub waves: u32,
    pub wireframe: bool,
}

impl Default for OceanConfig {
    fn default() -> Self {
        Self {
            half_extent: 1500.0,
            waves: 1,
            wireframe: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    /// World units per frame while a movement key is held.
    pub move_speed: f32,
    /// Degrees of rotation per pixel of mouse motion.
    pub look_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 20.0, 0.0],
            move_speed: 0.1,
            look_sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub directory: PathBuf,
    pub vertex: String,
    pub fragment: String,
    pub tess_control: String,
    pub tess_eval: String,
    pub skybox_vertex: String,
    pub skybox_fragment: String,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./shaders"),
            vertex: "vert.glsl".into(),
            fragment: "frag.glsl".into(),
            tess_control: "gerstner_tesc.glsl".into(),
            tess_eval: "gerstner_tese.glsl".into(),
            skybox_vertex: "skybox_vert.glsl".into(),
            skybox_fragment: "skybox_frag.glsl".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SkyboxConfig {
    pub directory: PathBuf,
    pub faces: Vec<String>,
}

impl Default for SkyboxConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            faces: DEFAULT_FACES.iter().map(|face| face.to_string()).collect(),
        }
    }
}

impl SkyboxConfig {
    /// Face paths joined onto the skybox directory, in upload order.
    pub fn face_paths(&self) -> Vec<PathBuf> {
        self.faces
            .iter()
            .map(|face| self.directory.join(face))
            .collect()
    }
}

impl SceneConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: SceneConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Reads `path`, or returns the defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} must be non-zero",
                self.window.width, self.window.height
            )));
        }

        if !(self.ocean.half_extent.is_finite() && self.ocean.half_extent > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "ocean.half_extent must be positive, got {}",
                self.ocean.half_extent
            )));
        }

        if !(1..=MAX_WAVES).contains(&self.ocean.waves) {
            return Err(ConfigError::Invalid(format!(
                "ocean.waves must be between 1 and {MAX_WAVES}, got {}",
                self.ocean.waves
            )));
        }

        if self.camera.move_speed < 0.0 || self.camera.look_sensitivity < 0.0 {
            return Err(ConfigError::Invalid(
                "camera speeds must be non-negative".into(),
            ));
        }

        let projection = &self.projection;
        if !(projection.fov_degrees > 0.0 && projection.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "projection.fov_degrees must be within (0, 180), got {}",
                projection.fov_degrees
            )));
        }
        if !(projection.near > 0.0 && projection.near < projection.far) {
            return Err(ConfigError::Invalid(format!(
                "projection planes must satisfy 0 < near < far, got near={} far={}",
                projection.near, projection.far
            )));
        }

        let shaders = &self.shaders;
        for (key, name) in [
            ("vertex", &shaders.vertex),
            ("fragment", &shaders.fragment),
            ("tess_control", &shaders.tess_control),
            ("tess_eval", &shaders.tess_eval),
            ("skybox_vertex", &shaders.skybox_vertex),
            ("skybox_fragment", &shaders.skybox_fragment),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "shaders.{key} may not be empty"
                )));
            }
        }

        if self.skybox.faces.len() != DEFAULT_FACES.len() {
            return Err(ConfigError::Invalid(format!(
                "skybox.faces must list exactly {} files (right, left, top, bottom, front, back), got {}",
                DEFAULT_FACES.len(),
                self.skybox.faces.len()
            )));
        }

        Ok(())
    }
}
