use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use glam::Vec3;
use renderer::{
    CubemapFaces, OceanShaderNames, PolygonMode, Projection, RendererConfig, ScreenSize,
    SkyboxShaderNames, WaveCount,
};
use sceneconfig::SceneConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::input::CONTROLS_HELP;
use crate::paths::AppPaths;
use crate::window;

/// Everything the window loop needs beyond the renderer configuration.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub title: String,
    pub renderer: RendererConfig,
    pub shader_dir: PathBuf,
    pub eye: Vec3,
    pub move_speed: f32,
    pub look_sensitivity: f32,
}

pub fn run(cli: Cli) -> Result<()> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => AppPaths::discover()?.config_file(),
    };
    let mut scene = SceneConfig::load(&config_path)
        .with_context(|| format!("failed to load scene from {}", config_path.display()))?;
    apply_overrides(&mut scene, &cli);
    scene
        .validate()
        .context("scene configuration rejected after applying command-line overrides")?;
    tracing::debug!(config = %config_path.display(), ?scene, "resolved scene configuration");

    let session = session_config(&scene)?;
    tracing::info!(
        size = %session.renderer.screen,
        waves = %session.renderer.wave_count,
        shaders = %session.shader_dir.display(),
        "starting tideline"
    );
    for line in CONTROLS_HELP {
        tracing::info!("{line}");
    }

    window::run_window(session)
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn apply_overrides(scene: &mut SceneConfig, cli: &Cli) {
    if let Some((width, height)) = cli.size {
        scene.window.width = width;
        scene.window.height = height;
    }
    if let Some(size) = cli.ocean_size {
        scene.ocean.half_extent = size;
    }
    if let Some(waves) = cli.waves {
        scene.ocean.waves = waves.get();
    }
    if cli.wireframe {
        scene.ocean.wireframe = true;
    }
    if let Some(dir) = &cli.shader_dir {
        scene.shaders.directory = dir.clone();
    }
    if let Some(dir) = &cli.skybox_dir {
        scene.skybox.directory = dir.clone();
    }
}

pub fn session_config(scene: &SceneConfig) -> Result<SessionConfig> {
    let wave_count = WaveCount::try_from(scene.ocean.waves)?;
    let faces: [PathBuf; 6] = scene
        .skybox
        .face_paths()
        .try_into()
        .map_err(|paths: Vec<PathBuf>| anyhow!("expected 6 skybox faces, got {}", paths.len()))?;

    let shaders = &scene.shaders;
    let renderer = RendererConfig {
        screen: ScreenSize::new(scene.window.width, scene.window.height),
        ocean_half_extent: scene.ocean.half_extent,
        wave_count,
        polygon_mode: if scene.ocean.wireframe {
            PolygonMode::Line
        } else {
            PolygonMode::Fill
        },
        projection: Projection {
            fov_y_degrees: scene.projection.fov_degrees,
            near: scene.projection.near,
            far: scene.projection.far,
        },
        ocean_shaders: OceanShaderNames {
            vertex: shaders.vertex.clone(),
            fragment: shaders.fragment.clone(),
            tess_control: shaders.tess_control.clone(),
            tess_evaluation: shaders.tess_eval.clone(),
        },
        skybox_shaders: SkyboxShaderNames {
            vertex: shaders.skybox_vertex.clone(),
            fragment: shaders.skybox_fragment.clone(),
        },
        cubemap_faces: CubemapFaces::new(faces),
    };

    Ok(SessionConfig {
        title: scene.window.title.clone(),
        renderer,
        shader_dir: shaders.directory.clone(),
        eye: Vec3::from_array(scene.camera.eye),
        move_speed: scene.camera.move_speed,
        look_sensitivity: scene.camera.look_sensitivity,
    })
}
