use std::rc::Rc;

use super::cubemap::{CubemapLoader, CubemapTexture, FaceDecoder};
use super::geometry::{GeometryBuffer, GeometryStore};
use super::pipeline::{PipelineLinker, PipelineProgram};
use super::uniforms::{BindError, OceanUniforms, SkyboxUniforms, UniformTable};
use crate::glapi::GlApi;
use crate::source::ShaderSourceProvider;
use crate::types::{PolygonMode, Projection, RendererConfig, ScreenSize};
use crate::waves::{WaveCount, WaveParameterSet};

pub const OCEAN_PIPELINE: &str = "ocean";
pub const SKYBOX_PIPELINE: &str = "skybox";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("uniform binding failed for the {pipeline} pipeline")]
    Bind {
        pipeline: &'static str,
        #[source]
        source: BindError,
    },
}

impl RenderError {
    pub fn bind_error(&self) -> &BindError {
        match self {
            RenderError::Bind { source, .. } => source,
        }
    }
}

/// Mutable per-frame inputs driven by the input layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    pub polygon_mode: PolygonMode,
    pub wave_count: WaveCount,
    pub screen: ScreenSize,
    /// Fixed once the ocean patch is uploaded.
    pub ocean_half_extent: f32,
}

/// Every GPU resource the frame loop draws with, plus the frame state.
///
/// Programs, buffers and the cubemap release themselves when the context is
/// dropped, so it must go away before the GL context does.
pub struct RenderContext {
    gl: Rc<dyn GlApi>,
    frame: FrameState,
    projection: Projection,
    waves: WaveParameterSet,
    ocean: PipelineProgram,
    ocean_uniforms: UniformTable,
    skybox: PipelineProgram,
    skybox_uniforms: UniformTable,
    ocean_patch: GeometryBuffer,
    skybox_cube: GeometryBuffer,
    cubemap: CubemapTexture,
}

impl RenderContext {
    /// Builds both pipelines, uploads the meshes and the cubemap, then
    /// resolves every required uniform.
    ///
    /// Fails only when a pipeline is missing uniforms, which is also what a
    /// pipeline that failed to compile or link looks like from here.
    pub fn new(
        gl: Rc<dyn GlApi>,
        config: &RendererConfig,
        sources: &dyn ShaderSourceProvider,
        decoder: &dyn FaceDecoder,
    ) -> Result<Self, RenderError> {
        let linker = PipelineLinker::new(Rc::clone(&gl));
        let shaders = &config.ocean_shaders;
        let ocean = linker.link_tessellated(
            OCEAN_PIPELINE,
            &sources.load(&shaders.vertex),
            &sources.load(&shaders.fragment),
            &sources.load(&shaders.tess_control),
            &sources.load(&shaders.tess_evaluation),
        );
        let shaders = &config.skybox_shaders;
        let skybox = linker.link_simple(
            SKYBOX_PIPELINE,
            &sources.load(&shaders.vertex),
            &sources.load(&shaders.fragment),
        );

        let geometry = GeometryStore::new(Rc::clone(&gl));
        let ocean_patch = geometry.upload_ocean_patch(config.ocean_half_extent);
        let skybox_cube = geometry.upload_skybox_cube();
        let cubemap = CubemapLoader::new(Rc::clone(&gl), decoder).load(&config.cubemap_faces);

        let ocean_uniforms = UniformTable::resolve(gl.as_ref(), &ocean, &OceanUniforms::descriptors())
            .map_err(|source| RenderError::Bind {
                pipeline: OCEAN_PIPELINE,
                source,
            })?;
        let skybox_uniforms =
            UniformTable::resolve(gl.as_ref(), &skybox, &SkyboxUniforms::descriptors()).map_err(
                |source| RenderError::Bind {
                    pipeline: SKYBOX_PIPELINE,
                    source,
                },
            )?;

        tracing::info!(
            screen = %config.screen,
            half_extent = config.ocean_half_extent,
            waves = %config.wave_count,
            mode = %config.polygon_mode,
            "render context ready"
        );

        Ok(Self {
            frame: FrameState {
                polygon_mode: config.polygon_mode,
                wave_count: config.wave_count,
                screen: config.screen,
                ocean_half_extent: config.ocean_half_extent,
            },
            projection: config.projection,
            waves: WaveParameterSet::ocean(),
            gl,
            ocean,
            ocean_uniforms,
            skybox,
            skybox_uniforms,
            ocean_patch,
            skybox_cube,
            cubemap,
        })
    }

    pub fn frame_state(&self) -> &FrameState {
        &self.frame
    }

    pub fn set_polygon_mode(&mut self, mode: PolygonMode) {
        self.frame.polygon_mode = mode;
    }

    pub fn toggle_polygon_mode(&mut self) -> PolygonMode {
        self.frame.polygon_mode = self.frame.polygon_mode.toggled();
        tracing::debug!(mode = %self.frame.polygon_mode, "polygon mode toggled");
        self.frame.polygon_mode
    }

    pub fn set_wave_count(&mut self, count: WaveCount) {
        if self.frame.wave_count != count {
            tracing::debug!(waves = %count, "wave count changed");
        }
        self.frame.wave_count = count;
    }

    pub fn resize(&mut self, screen: ScreenSize) {
        self.frame.screen = screen;
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn waves(&self) -> &WaveParameterSet {
        &self.waves
    }

    pub fn cubemap(&self) -> &CubemapTexture {
        &self.cubemap
    }

    pub(crate) fn gl(&self) -> &dyn GlApi {
        self.gl.as_ref()
    }

    pub(crate) fn ocean(&self) -> (&PipelineProgram, &UniformTable, &GeometryBuffer) {
        (&self.ocean, &self.ocean_uniforms, &self.ocean_patch)
    }

    pub(crate) fn skybox(&self) -> (&PipelineProgram, &UniformTable, &GeometryBuffer) {
        (&self.skybox, &self.skybox_uniforms, &self.skybox_cube)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::path::Path;

    use super::*;
    use crate::glapi::fake::FakeGl;
    use crate::gpu::cubemap::FaceImage;

    pub(crate) struct InlineSources(pub HashMap<String, String>);

    impl ShaderSourceProvider for InlineSources {
        fn load(&self, name: &str) -> String {
            self.0.get(name).cloned().unwrap_or_default()
        }
    }

    pub(crate) struct GreyFaces;

    impl FaceDecoder for GreyFaces {
        fn decode(&self, _path: &Path) -> FaceImage {
            FaceImage {
                width: 1,
                height: 1,
                pixels: vec![128, 128, 128],
            }
        }
    }

    pub(crate) fn sources_for(config: &RendererConfig) -> InlineSources {
        let body = "void main() {}".to_string();
        let names = [
            &config.ocean_shaders.vertex,
            &config.ocean_shaders.fragment,
            &config.ocean_shaders.tess_control,
            &config.ocean_shaders.tess_evaluation,
            &config.skybox_shaders.vertex,
            &config.skybox_shaders.fragment,
        ];
        InlineSources(
            names
                .into_iter()
                .map(|name| (name.clone(), body.clone()))
                .collect(),
        )
    }

    pub(crate) fn context(fake: &Rc<FakeGl>) -> RenderContext {
        let config = RendererConfig::default();
        RenderContext::new(fake.clone(), &config, &sources_for(&config), &GreyFaces)
            .expect("context builds")
    }

    #[test]
    fn context_carries_config_into_frame_state() {
        let fake = Rc::new(FakeGl::new());
        let mut context = context(&fake);
        assert_eq!(context.frame_state().ocean_half_extent, 1500.0);
        assert_eq!(context.frame_state().polygon_mode, PolygonMode::Fill);
        assert!(context.cubemap().is_complete());

        assert_eq!(context.toggle_polygon_mode(), PolygonMode::Line);
        context.set_wave_count(WaveCount::MAX);
        context.resize(ScreenSize::new(800, 600));
        assert_eq!(context.frame_state().wave_count.get(), 4);
        assert_eq!(context.frame_state().screen, ScreenSize::new(800, 600));
    }

    #[test]
    fn broken_tessellation_stage_surfaces_as_missing_uniforms() {
        let fake = Rc::new(FakeGl::new());
        let config = RendererConfig::default();
        let mut sources = sources_for(&config);
        sources
            .0
            .insert(config.ocean_shaders.tess_evaluation.clone(), String::new());

        let err = RenderContext::new(fake.clone(), &config, &sources, &GreyFaces)
            .err()
            .expect("ocean pipeline cannot resolve uniforms");
        let RenderError::Bind { pipeline, source } = &err;
        assert_eq!(*pipeline, OCEAN_PIPELINE);
        let BindError::Missing { names, .. } = source else {
            panic!("expected missing uniforms, got {source:?}");
        };
        assert_eq!(names.len(), OceanUniforms::descriptors().len());

        // Everything built so far is released on the error path.
        assert_eq!(fake.live_shaders(), 0);
        assert_eq!(fake.live_programs(), 0);
        assert_eq!(fake.live_buffers(), 0);
        assert_eq!(fake.live_textures(), 0);
    }

    #[test]
    fn hidden_skybox_uniform_names_the_skybox_pipeline() {
        let fake = Rc::new(FakeGl::new());
        fake.hide_uniform("projection");
        let config = RendererConfig::default();

        let err = RenderContext::new(fake.clone(), &config, &sources_for(&config), &GreyFaces)
            .err()
            .expect("skybox projection missing");
        assert_eq!(
            err.bind_error(),
            &BindError::Missing {
                pipeline: SKYBOX_PIPELINE,
                names: vec!["projection".into()],
            }
        );
    }

    #[test]
    fn dropping_context_releases_every_object() {
        let fake = Rc::new(FakeGl::new());
        let context = context(&fake);
        assert_eq!(fake.live_programs(), 2);
        drop(context);
        assert_eq!(fake.live_programs(), 0);
        assert_eq!(fake.live_vertex_arrays(), 0);
        assert_eq!(fake.live_buffers(), 0);
        assert_eq!(fake.live_textures(), 0);
    }
}
