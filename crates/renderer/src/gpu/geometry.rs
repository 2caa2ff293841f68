use std::mem::size_of;
use std::rc::Rc;

use crate::glapi::{BufferId, GlApi, VertexArrayId};

const FLOAT_BYTES: usize = size_of::<f32>();

/// One interleaved float attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub index: u32,
    /// Floats this attribute occupies in each vertex record.
    pub width: usize,
    /// Components declared to the pipeline; may read past `width` into the
    /// next attribute when the shader input is wider than the stored data.
    pub components: i32,
    /// Offset in floats from the start of the record.
    pub offset: usize,
}

impl VertexAttribute {
    pub fn offset_bytes(&self) -> usize {
        self.offset * FLOAT_BYTES
    }
}

/// Interleaved attribute layout fixed before any attribute is enabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Packs `(index, width)` pairs back to back, declaring each with its own width.
    pub fn packed(attributes: &[(u32, usize)]) -> Self {
        let mut offset = 0;
        let attributes = attributes
            .iter()
            .map(|&(index, width)| {
                let attribute = VertexAttribute {
                    index,
                    width,
                    components: width as i32,
                    offset,
                };
                offset += width;
                attribute
            })
            .collect();
        Self { attributes }
    }

    /// Overrides how many components `index` declares to the pipeline.
    pub fn with_declared_components(mut self, index: u32, components: i32) -> Self {
        for attribute in &mut self.attributes {
            if attribute.index == index {
                attribute.components = components;
            }
        }
        self
    }

    /// Position, texcoord and normal.
    ///
    /// The texcoord holds two floats but the ocean vertex shader reads it as a
    /// `vec3`, so it is declared with three components.
    pub fn ocean() -> Self {
        Self::packed(&[(0, 3), (1, 2), (2, 3)]).with_declared_components(1, 3)
    }

    /// Position only.
    pub fn skybox() -> Self {
        Self::packed(&[(0, 3)])
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    pub fn stride_floats(&self) -> usize {
        self.attributes.iter().map(|attribute| attribute.width).sum()
    }

    pub fn stride_bytes(&self) -> usize {
        self.stride_floats() * FLOAT_BYTES
    }
}

/// Floats per ocean patch vertex.
pub const OCEAN_VERTEX_FLOATS: usize = 8;

/// The four corners of the ocean patch at `y = 0`, wound
/// (-s,-s), (s,-s), (s,s), (-s,s) on the XZ plane with upward normals.
pub fn ocean_patch_vertices(half_extent: f32) -> [f32; 4 * OCEAN_VERTEX_FLOATS] {
    let s = half_extent;
    #[rustfmt::skip]
    let vertices = [
        -s, 0.0, -s,   -1.0, -1.0,   0.0, 1.0, 0.0,
         s, 0.0, -s,    1.0, -1.0,   0.0, 1.0, 0.0,
         s, 0.0,  s,    1.0,  1.0,   0.0, 1.0, 0.0,
        -s, 0.0,  s,   -1.0,  1.0,   0.0, 1.0, 0.0,
    ];
    vertices
}

/// Unit cube as 36 positions, two triangles per face.
#[rustfmt::skip]
pub const SKYBOX_VERTICES: [f32; 108] = [
    // -Z
    -1.0,  1.0, -1.0,  -1.0, -1.0, -1.0,   1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,   1.0,  1.0, -1.0,  -1.0,  1.0, -1.0,
    // -X
    -1.0, -1.0,  1.0,  -1.0, -1.0, -1.0,  -1.0,  1.0, -1.0,
    -1.0,  1.0, -1.0,  -1.0,  1.0,  1.0,  -1.0, -1.0,  1.0,
    // +X
     1.0, -1.0, -1.0,   1.0, -1.0,  1.0,   1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,   1.0,  1.0, -1.0,   1.0, -1.0, -1.0,
    // +Z
    -1.0, -1.0,  1.0,  -1.0,  1.0,  1.0,   1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,   1.0, -1.0,  1.0,  -1.0, -1.0,  1.0,
    // +Y
    -1.0,  1.0, -1.0,   1.0,  1.0, -1.0,   1.0,  1.0,  1.0,
     1.0,  1.0,  1.0,  -1.0,  1.0,  1.0,  -1.0,  1.0, -1.0,
    // -Y
    -1.0, -1.0, -1.0,  -1.0, -1.0,  1.0,   1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,  -1.0, -1.0,  1.0,   1.0, -1.0,  1.0,
];

/// A vertex array plus its backing buffer. Both are deleted when dropped.
pub struct GeometryBuffer {
    gl: Rc<dyn GlApi>,
    vao: VertexArrayId,
    vbo: BufferId,
    vertex_count: usize,
    layout: VertexLayout,
}

impl GeometryBuffer {
    pub fn vertex_array(&self) -> VertexArrayId {
        self.vao
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }
}

impl Drop for GeometryBuffer {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.vbo);
        self.gl.delete_vertex_array(self.vao);
    }
}

impl std::fmt::Debug for GeometryBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryBuffer")
            .field("vao", &self.vao)
            .field("vbo", &self.vbo)
            .field("vertex_count", &self.vertex_count)
            .finish()
    }
}

/// Uploads the two static meshes the scene draws.
pub struct GeometryStore {
    gl: Rc<dyn GlApi>,
}

impl GeometryStore {
    pub fn new(gl: Rc<dyn GlApi>) -> Self {
        Self { gl }
    }

    /// One four-vertex patch for the tessellation stages.
    pub fn upload_ocean_patch(&self, half_extent: f32) -> GeometryBuffer {
        tracing::debug!(half_extent, "uploading ocean patch");
        self.upload(&ocean_patch_vertices(half_extent), VertexLayout::ocean())
    }

    pub fn upload_skybox_cube(&self) -> GeometryBuffer {
        self.upload(&SKYBOX_VERTICES, VertexLayout::skybox())
    }

    fn upload(&self, vertices: &[f32], layout: VertexLayout) -> GeometryBuffer {
        let gl = &self.gl;
        let vao = gl.create_vertex_array();
        gl.bind_vertex_array(Some(vao));
        let vbo = gl.create_buffer();
        gl.bind_array_buffer(Some(vbo));
        gl.array_buffer_data(bytemuck::cast_slice(vertices));

        let stride = layout.stride_bytes() as i32;
        for attribute in layout.attributes() {
            gl.enable_vertex_attrib(attribute.index);
            gl.vertex_attrib_pointer_f32(
                attribute.index,
                attribute.components,
                stride,
                attribute.offset_bytes(),
            );
        }

        gl.bind_vertex_array(None);
        for attribute in layout.attributes() {
            gl.disable_vertex_attrib(attribute.index);
        }

        GeometryBuffer {
            gl: Rc::clone(gl),
            vao,
            vbo,
            vertex_count: vertices.len() / layout.stride_floats(),
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glapi::fake::{FakeGl, GlCall};

    #[test]
    fn ocean_layout_strides_eight_floats() {
        let layout = VertexLayout::ocean();
        assert_eq!(layout.stride_floats(), OCEAN_VERTEX_FLOATS);
        assert_eq!(layout.stride_bytes(), 32);
        let offsets: Vec<_> = layout.attributes().iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 3, 5]);
        assert_eq!(layout.attributes()[1].components, 3);
    }

    #[test]
    fn ocean_corners_sit_at_half_extent() {
        let vertices = ocean_patch_vertices(1500.0);
        let corners: Vec<_> = vertices
            .chunks_exact(OCEAN_VERTEX_FLOATS)
            .map(|vertex| (vertex[0], vertex[1], vertex[2]))
            .collect();
        assert_eq!(
            corners,
            vec![
                (-1500.0, 0.0, -1500.0),
                (1500.0, 0.0, -1500.0),
                (1500.0, 0.0, 1500.0),
                (-1500.0, 0.0, 1500.0),
            ]
        );
        for vertex in vertices.chunks_exact(OCEAN_VERTEX_FLOATS) {
            assert_eq!(&vertex[5..], &[0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn zero_extent_collapses_to_origin() {
        let vertices = ocean_patch_vertices(0.0);
        for vertex in vertices.chunks_exact(OCEAN_VERTEX_FLOATS) {
            assert_eq!(&vertex[..3], &[0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn skybox_cube_has_thirty_six_unit_positions() {
        assert_eq!(SKYBOX_VERTICES.len() / 3, 36);
        assert!(SKYBOX_VERTICES.iter().all(|c| c.abs() == 1.0));
    }

    #[test]
    fn upload_declares_layout_then_unbinds_and_disables() {
        let fake = Rc::new(FakeGl::new());
        let store = GeometryStore::new(fake.clone());
        let ocean = store.upload_ocean_patch(10.0);
        assert_eq!(ocean.vertex_count(), 4);

        let calls = fake.calls();
        let pointers: Vec<_> = calls
            .iter()
            .filter_map(|call| match call {
                GlCall::AttribPointer {
                    index,
                    components,
                    stride_bytes,
                    offset_bytes,
                } => Some((*index, *components, *stride_bytes, *offset_bytes)),
                _ => None,
            })
            .collect();
        assert_eq!(pointers, vec![(0, 3, 32, 0), (1, 3, 32, 12), (2, 3, 32, 20)]);

        let unbind_at = calls
            .iter()
            .position(|call| *call == GlCall::BindVertexArray(None))
            .expect("vao unbound");
        let disables: Vec<_> = calls
            .iter()
            .enumerate()
            .filter(|(_, call)| matches!(call, GlCall::DisableAttrib(_)))
            .map(|(at, _)| at)
            .collect();
        assert_eq!(disables.len(), 3);
        assert!(disables.iter().all(|at| *at > unbind_at));
    }

    #[test]
    fn repeated_upload_produces_identical_data() {
        let fake = Rc::new(FakeGl::new());
        let store = GeometryStore::new(fake.clone());
        let _first = store.upload_ocean_patch(42.0);
        let _second = store.upload_ocean_patch(42.0);

        let uploads: Vec<_> = fake
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                GlCall::BufferData(data) => Some(data),
                _ => None,
            })
            .collect();
        assert_eq!(uploads.len(), 2);
        assert_eq!(uploads[0], uploads[1]);
    }

    #[test]
    fn dropping_geometry_releases_buffers() {
        let fake = Rc::new(FakeGl::new());
        let store = GeometryStore::new(fake.clone());
        let skybox = store.upload_skybox_cube();
        assert_eq!(skybox.vertex_count(), 36);
        assert_eq!((fake.live_buffers(), fake.live_vertex_arrays()), (1, 1));
        drop(skybox);
        assert_eq!((fake.live_buffers(), fake.live_vertex_arrays()), (0, 0));
    }
}
