use glam::Mat4;

use super::state::{RenderContext, RenderError, OCEAN_PIPELINE, SKYBOX_PIPELINE};
use super::uniforms::{OceanUniforms, SkyboxUniforms};
use crate::camera::{rotation_only, CameraView};
use crate::glapi::{Capability, DepthFunc, Primitive};

pub const CLEAR_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
/// Texture unit the skybox cubemap is bound to for both pipelines.
pub const SKYBOX_TEXTURE_UNIT: u32 = 0;
pub const PATCH_VERTICES: i32 = 4;

/// Issues one frame: ocean first, skybox last under a less-or-equal depth test.
#[derive(Clone, Copy, Debug)]
pub struct FrameRenderer {
    clear_color: [f32; 4],
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self {
            clear_color: CLEAR_COLOR,
        }
    }
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values bound to the ocean pipeline for this camera and time.
    ///
    /// Pure: the same inputs always yield the same values.
    pub fn ocean_uniforms(
        &self,
        context: &RenderContext,
        camera: &dyn CameraView,
        elapsed_seconds: f32,
    ) -> OceanUniforms {
        let frame = context.frame_state();
        OceanUniforms {
            model: Mat4::IDENTITY,
            view: camera.view_matrix(),
            projection: context.projection().matrix(frame.screen),
            skybox_unit: SKYBOX_TEXTURE_UNIT as i32,
            camera_position: camera.eye_position() + camera.view_direction(),
            wave_count: frame.wave_count,
            time: elapsed_seconds,
            waves: *context.waves(),
        }
    }

    pub fn skybox_uniforms(&self, context: &RenderContext, camera: &dyn CameraView) -> SkyboxUniforms {
        SkyboxUniforms {
            view: rotation_only(camera.view_matrix()),
            projection: context.projection().matrix(context.frame_state().screen),
            skybox_unit: SKYBOX_TEXTURE_UNIT as i32,
        }
    }

    /// Prepares state, binds both pipelines' uniforms, then draws.
    ///
    /// A bind failure aborts before any draw call is issued.
    pub fn render(
        &self,
        context: &RenderContext,
        camera: &dyn CameraView,
        elapsed_seconds: f32,
    ) -> Result<(), RenderError> {
        let gl = context.gl();
        let frame = context.frame_state();
        let (ocean, ocean_table, ocean_patch) = context.ocean();
        let (skybox, skybox_table, skybox_cube) = context.skybox();

        gl.enable(Capability::DepthTest);
        gl.polygon_mode(frame.polygon_mode);
        gl.viewport(0, 0, frame.screen.width as i32, frame.screen.height as i32);
        gl.clear_color(self.clear_color);
        gl.clear_color_and_depth();

        gl.use_program(Some(ocean.id()));
        gl.patch_vertices(PATCH_VERTICES);
        let ocean_values = self.ocean_uniforms(context, camera, elapsed_seconds).values();
        ocean_table
            .bind_all(gl, &ocean_values)
            .map_err(|source| RenderError::Bind {
                pipeline: OCEAN_PIPELINE,
                source,
            })?;

        gl.use_program(Some(skybox.id()));
        let skybox_values = self.skybox_uniforms(context, camera).values();
        skybox_table
            .bind_all(gl, &skybox_values)
            .map_err(|source| RenderError::Bind {
                pipeline: SKYBOX_PIPELINE,
                source,
            })?;

        gl.use_program(Some(ocean.id()));
        gl.bind_vertex_array(Some(ocean_patch.vertex_array()));
        gl.active_texture_unit(SKYBOX_TEXTURE_UNIT);
        gl.bind_cube_map(Some(context.cubemap().id()));
        gl.draw_arrays(Primitive::Patches, 0, ocean_patch.vertex_count() as i32);

        gl.depth_func(DepthFunc::LessOrEqual);
        gl.use_program(Some(skybox.id()));
        gl.bind_vertex_array(Some(skybox_cube.vertex_array()));
        gl.active_texture_unit(SKYBOX_TEXTURE_UNIT);
        gl.bind_cube_map(Some(context.cubemap().id()));
        gl.draw_arrays(Primitive::Triangles, 0, skybox_cube.vertex_count() as i32);
        gl.bind_vertex_array(None);
        gl.depth_func(DepthFunc::Less);

        gl.use_program(None);
        Ok(())
    }
}
