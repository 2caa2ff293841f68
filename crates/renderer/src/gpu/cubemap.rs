use std::path::Path;
use std::rc::Rc;

use crate::glapi::{
    rgb8_len, GlApi, TextureFilter, TextureId, TextureParameter, TextureWrap,
};
use crate::types::{CubeFace, CubemapFaces};

/// Decoded face pixels: tightly packed 8-bit RGB, top row first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl FaceImage {
    /// An empty image marks a face that could not be read.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Bytes a `width` x `height` RGB8 image occupies, if it fits in memory.
    pub fn expected_len(&self) -> Option<usize> {
        rgb8_len(self.width, self.height)
    }
}


/// Turns an image file into RGB pixels, or an empty image when it cannot.
pub trait FaceDecoder {
    fn decode(&self, path: &Path) -> FaceImage;
}

/// Decodes any format the `image` crate recognises, PPM included.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageFaceDecoder;

impl FaceDecoder for ImageFaceDecoder {
    fn decode(&self, path: &Path) -> FaceImage {
        match image::open(path) {
            Ok(image) => {
                let rgb = image.to_rgb8();
                let (width, height) = rgb.dimensions();
                FaceImage {
                    width,
                    height,
                    pixels: rgb.into_raw(),
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to decode cubemap face");
                FaceImage::default()
            }
        }
    }
}

/// A cubemap texture object and which faces received data. Deleted when dropped.
pub struct CubemapTexture {
    gl: Rc<dyn GlApi>,
    id: TextureId,
    populated: [bool; 6],
}

impl CubemapTexture {
    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn is_populated(&self, face: CubeFace) -> bool {
        self.populated[face.index()]
    }

    pub fn missing_faces(&self) -> Vec<CubeFace> {
        CubeFace::ALL
            .into_iter()
            .filter(|face| !self.is_populated(*face))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.populated.iter().all(|populated| *populated)
    }
}

impl Drop for CubemapTexture {
    fn drop(&mut self) {
        self.gl.delete_texture(self.id);
    }
}

impl std::fmt::Debug for CubemapTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CubemapTexture")
            .field("id", &self.id)
            .field("populated", &self.populated)
            .finish()
    }
}

/// Builds the skybox cubemap from six face images.
pub struct CubemapLoader<'a> {
    gl: Rc<dyn GlApi>,
    decoder: &'a dyn FaceDecoder,
}

impl<'a> CubemapLoader<'a> {
    pub fn new(gl: Rc<dyn GlApi>, decoder: &'a dyn FaceDecoder) -> Self {
        Self { gl, decoder }
    }

    /// Uploads each face in +X, -X, +Y, -Y, +Z, -Z order.
    ///
    /// Faces that decode to nothing, or whose pixel buffer does not hold
    /// `width * height` RGB texels, are skipped and stay unpopulated; the
    /// texture is still returned so rendering can continue.
    pub fn load(&self, faces: &CubemapFaces) -> CubemapTexture {
        let gl = &self.gl;
        let id = gl.create_texture();
        gl.bind_cube_map(Some(id));

        let mut populated = [false; 6];
        for (face, path) in faces.iter() {
            let image = self.decoder.decode(path);
            if image.is_empty() {
                tracing::warn!(face = %face, path = %path.display(), "cubemap face missing; leaving unpopulated");
                continue;
            }
            if image.expected_len() != Some(image.pixels.len()) {
                tracing::warn!(
                    face = %face,
                    path = %path.display(),
                    expected = ?image.expected_len(),
                    found = image.pixels.len(),
                    "cubemap face pixel data does not match its dimensions; leaving unpopulated"
                );
                continue;
            }
            gl.cube_map_face_rgb8(face, image.width, image.height, &image.pixels);
            populated[face.index()] = true;
            tracing::debug!(face = %face, width = image.width, height = image.height, "uploaded cubemap face");
        }

        for parameter in [
            TextureParameter::MinFilter(TextureFilter::Linear),
            TextureParameter::MagFilter(TextureFilter::Linear),
            TextureParameter::WrapS(TextureWrap::ClampToEdge),
            TextureParameter::WrapT(TextureWrap::ClampToEdge),
            TextureParameter::WrapR(TextureWrap::ClampToEdge),
        ] {
            gl.cube_map_parameter(parameter);
        }

        let texture = CubemapTexture {
            gl: Rc::clone(gl),
            id,
            populated,
        };
        if texture.is_complete() {
            tracing::info!(texture = id.0, "skybox cubemap loaded");
        } else {
            tracing::warn!(missing = ?texture.missing_faces(), "skybox cubemap incomplete");
        }
        texture
    }
}
