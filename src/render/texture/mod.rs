use std::path::Path;

use anyhow::Result;
use log::{error, info};
use resource::{tools::*, Image, ImageMipMap};
use wgpu::*;

use crate::scene::registry::{TextureLookup, TextureRegistry};

use super::{label::*, pipeline::*};

#[derive(Debug)]
pub struct TextureBind {
    pub texture: wgpu::Texture,
    pub view: TextureView,
}

impl TextureBind {
    pub fn new(device: &Device, args: TextureArgs, label: Option<&str>) -> Self {
        let texture = {
            let label = get_default_label(&label, [TEXTURE_LABEL]);
            device.create_texture(&args.into_desc(label.as_deref()))
        };
        let view = {
            let label = get_default_label(&label, [TEXTURE_VIEW_LABEL]);
            texture.create_view(&TextureViewDescriptor {
                label: label.as_deref(),
                ..Default::default()
            })
        };
        TextureBind { texture, view }
    }

    pub fn from_mip_map(
        device: &Device,
        queue: &Queue,
        mip_map: &ImageMipMap,
        label: Option<&str>,
    ) -> Self {
        let args = TextureArgs {
            mip_level_count: mip_map.mip_map_count(),
            format: mip_map.format,
            ..TextureArgs::color_texture(mip_map.width, mip_map.height)
        };
        let bind = Self::new(device, args, label);
        mip_map.write_into_texture(queue, &bind.texture, 0);
        bind
    }

    pub fn depth(device: &Device, width: u32, height: u32) -> Self {
        Self::new(device, TextureArgs::depth_texture(width, height), Some("Depth"))
    }

    fn get_entries_desc<'a>(&'a self, sampler: &'a Sampler) -> [BindGroupBuilderEntryDesc<'a>; 2] {
        let texture_desc = BindGroupBuilderEntryDesc {
            resource: BindingResource::TextureView(&self.view),
            visibility: ShaderStages::FRAGMENT,
            count: None,
            ty: BindingType::Texture {
                sample_type: TextureSampleType::Float { filterable: true },
                view_dimension: TextureViewDimension::D2,
                multisampled: false,
            },
        };
        let sampler_desc = BindGroupBuilderEntryDesc {
            resource: BindingResource::Sampler(sampler),
            visibility: ShaderStages::FRAGMENT,
            count: None,
            ty: BindingType::Sampler(SamplerBindingType::Filtering),
        };
        [texture_desc, sampler_desc]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextureArgs {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mip_level_count: u32,
    pub sample_count: u32,
    pub dimension: TextureDimension,
    pub format: TextureFormat,
    pub usage: TextureUsages,
}

impl TextureArgs {
    pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

    pub fn depth_texture(width: u32, height: u32) -> TextureArgs {
        TextureArgs {
            width: width.max(1),
            height: height.max(1),
            depth: 1,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: TextureUsages::RENDER_ATTACHMENT,
        }
    }

    pub fn color_texture(width: u32, height: u32) -> TextureArgs {
        TextureArgs {
            width,
            height,
            depth: 1,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::COPY_DST | TextureUsages::TEXTURE_BINDING,
        }
    }

    pub fn into_desc(self, label: Option<&str>) -> TextureDescriptor {
        TextureDescriptor {
            label,
            size: Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: self.depth,
            },
            mip_level_count: self.mip_level_count,
            sample_count: self.sample_count,
            dimension: self.dimension,
            format: self.format,
            usage: self.usage,
            view_formats: &[],
        }
    }
}

/// Decodes an image file into an uploadable RGBA8 mip chain.
pub fn load_mip_map(path: &Path) -> Result<(ImageMipMap, u8)> {
    let image = Image::from_path(path, true)?;
    let channels = image.channels;
    let count = full_mip_count(image.width, image.height);
    Ok((generate_rgba8_mip_map(image, count)?, channels))
}

/// Loaded scene textures, their bind groups, and a white fallback for
/// untextured draws.
#[derive(Debug)]
pub struct SceneTextures {
    registry: TextureRegistry<TextureBind>,
    bind_groups: Vec<BindGroup>,
    layout: BindGroupLayout,
    sampler: Sampler,
    fallback: BindGroup,
    _fallback_texture: TextureBind,
}

impl SceneTextures {
    pub fn new(device: &Device, queue: &Queue) -> Result<Self> {
        let sampler = {
            let label = get_default_label(&Some("Scene"), [SAMPLER_LABEL]);
            device.create_sampler(&SamplerDescriptor {
                label: label.as_deref(),
                address_mode_u: AddressMode::Repeat,
                address_mode_v: AddressMode::Repeat,
                address_mode_w: AddressMode::Repeat,
                mag_filter: FilterMode::Linear,
                min_filter: FilterMode::Linear,
                mipmap_filter: FilterMode::Linear,
                ..Default::default()
            })
        };
        let white = generate_rgba8_mip_map(Image::white_pixel(), 1)?;
        let fallback_texture = TextureBind::from_mip_map(device, queue, &white, Some("White"));
        let (layout, fallback) = {
            let mut builder = BindGroupBuider::default();
            builder
                .set_device(device)
                .set_label("Texture")
                .push_entries(fallback_texture.get_entries_desc(&sampler));
            builder.build()?
        };
        Ok(Self {
            registry: TextureRegistry::default(),
            bind_groups: Vec::new(),
            layout,
            sampler,
            fallback,
            _fallback_texture: fallback_texture,
        })
    }

    /// Loads `path` into the next free slot under `tag`. Failures are
    /// logged and reported as `false`, the scene still renders without it.
    pub fn create_texture(
        &mut self,
        device: &Device,
        queue: &Queue,
        path: impl AsRef<Path>,
        tag: &str,
    ) -> bool {
        let path = path.as_ref();
        match self.try_create_texture(device, queue, path, tag) {
            Ok((width, height, channels)) => {
                info!(
                    "loaded image {}, width:{}, height:{}, channels:{}",
                    path.display(),
                    width,
                    height,
                    channels
                );
                true
            }
            Err(err) => {
                error!("could not load image {}: {:#}", path.display(), err);
                false
            }
        }
    }

    fn try_create_texture(
        &mut self,
        device: &Device,
        queue: &Queue,
        path: &Path,
        tag: &str,
    ) -> Result<(u32, u32, u8)> {
        let (mip_map, channels) = load_mip_map(path)?;
        let bind = TextureBind::from_mip_map(device, queue, &mip_map, Some(tag));
        self.registry.register(tag, bind)?;
        Ok((mip_map.width, mip_map.height, channels))
    }

    /// One bind group per loaded slot, in slot order.
    pub fn bind_textures(&mut self, device: &Device) -> Result<()> {
        let mut bind_groups = Vec::with_capacity(self.registry.len());
        for entry in self.registry.iter() {
            let mut builder = BindGroupBuider::default();
            builder
                .set_device(device)
                .set_label(&entry.tag)
                .push_entries(entry.handle.get_entries_desc(&self.sampler));
            bind_groups.push(builder.build_with_layout(&self.layout)?);
        }
        self.bind_groups = bind_groups;
        Ok(())
    }

    /// Bind group for a draw, the white fallback when it has no texture.
    pub fn bind_group(&self, slot: Option<usize>) -> &BindGroup {
        slot.and_then(|s| self.bind_groups.get(s))
            .unwrap_or(&self.fallback)
    }

    pub fn layout(&self) -> &BindGroupLayout {
        &self.layout
    }

    pub fn registry(&self) -> &TextureRegistry<TextureBind> {
        &self.registry
    }

    pub fn destroy_textures(&mut self) {
        for entry in self.registry.iter() {
            entry.handle.texture.destroy();
        }
        self.bind_groups.clear();
        self.registry.destroy_textures();
    }
}

impl TextureLookup for SceneTextures {
    fn find_texture_slot(&self, tag: &str) -> Option<usize> {
        self.registry.find_texture_slot(tag)
    }
}
