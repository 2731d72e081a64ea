use std::{fs::File, io::Read, path::Path};

use anyhow::{bail, Context, Result};
use wgpu::{
    Extent3d, ImageCopyTexture, ImageDataLayout, Origin3d, Queue, ShaderSource, Texture,
    TextureAspect, TextureFormat,
};

pub mod tools;

/// WGSL source with the names of its vertex and fragment entry points.
#[derive(Debug)]
pub struct Shader {
    pub source: String,
    vs_enter_point: String,
    fs_enter_point: String,
}

impl Shader {
    pub const VS_FUNC_NAME: &'static str = "vertex_main";
    pub const FS_FUNC_NAME: &'static str = "fragment_main";

    pub fn vs_enter_point(&self) -> &str {
        &self.vs_enter_point
    }

    pub fn fs_enter_point(&self) -> &str {
        &self.fs_enter_point
    }

    pub fn as_shader_source(&self) -> ShaderSource {
        ShaderSource::Wgsl(self.source.as_str().into())
    }
}

impl Shader {
    pub fn from_wgsl(source: String) -> Self {
        Self {
            source,
            vs_enter_point: Self::VS_FUNC_NAME.to_owned(),
            fs_enter_point: Self::FS_FUNC_NAME.to_owned(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut f = File::open(path).with_context(|| format!("open shader {:?}", path))?;
        let mut buf = String::new();
        f.read_to_string(&mut buf)
            .with_context(|| format!("read shader {:?}", path))?;
        Ok(Self::from_wgsl(buf))
    }
}

/// Decoded RGBA8 pixels, bottom row first.
#[derive(Debug)]
pub struct Image {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Channel count of the source file before RGBA conversion.
    pub channels: u8,
    pub format: wgpu::TextureFormat,
}

impl Image {
    pub fn from_path(path: impl AsRef<Path>, srgb: bool) -> Result<Self> {
        let img = image::open(path.as_ref())
            .with_context(|| format!("could not load image {:?}", path.as_ref()))?;
        Self::from_dynamic(img, srgb)
    }

    /// Only RGB and RGBA sources are accepted, the same as the GL upload path
    /// this replaces.
    pub fn from_dynamic(img: image::DynamicImage, srgb: bool) -> Result<Self> {
        let channels = img.color().channel_count();
        if channels != 3 && channels != 4 {
            bail!("not implemented to handle image with {} channels", channels);
        }
        let img = img.flipv();
        let width = img.width();
        let height = img.height();
        let data = img.into_rgba8().into_raw();
        Ok(Image {
            width,
            height,
            channels,
            format: if srgb {
                TextureFormat::Rgba8UnormSrgb
            } else {
                TextureFormat::Rgba8Unorm
            },
            data,
        })
    }

    pub fn white_pixel() -> Self {
        Image {
            data: vec![255; 4],
            width: 1,
            height: 1,
            channels: 4,
            format: TextureFormat::Rgba8UnormSrgb,
        }
    }
}

#[derive(Debug)]
pub struct ImageMipMap {
    pub data: Vec<Vec<u8>>,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
}

impl ImageMipMap {
    pub fn extent_3d(&self, mip_level: u32) -> Extent3d {
        Extent3d {
            width: (self.width >> mip_level).max(1),
            height: (self.height >> mip_level).max(1),
            depth_or_array_layers: 1,
        }
    }

    pub fn mip_map_count(&self) -> u32 {
        self.data.len() as u32
    }

    pub fn write_into_texture(&self, queue: &Queue, texture: &Texture, layer: u32) {
        for (mip_level, d) in self.data.iter().enumerate() {
            let mip_level = mip_level as u32;
            let e = self.extent_3d(mip_level);
            let data_layout = ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(tools::RGBA8_PIXEL_SIZE * e.width),
                rows_per_image: Some(e.height),
            };
            queue.write_texture(
                ImageCopyTexture {
                    texture,
                    mip_level,
                    origin: Origin3d {
                        x: 0,
                        y: 0,
                        z: layer,
                    },
                    aspect: TextureAspect::All,
                },
                &d[..],
                data_layout,
                e,
            );
        }
    }
}
