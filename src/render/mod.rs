use std::{iter::once, mem::size_of, num::NonZeroU64, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info, warn};
use resource::Shader;
use wgpu::{
    util::{BufferInitDescriptor, DeviceExt},
    *,
};
use winit::window::Window;

use crate::scene::{draw::DrawCommand, lights::LightRig};

pub mod built_in;
pub mod camera;
pub mod label;
pub mod mesh;
pub mod pipeline;
pub mod texture;
pub mod uniform;

use built_in::{ShapeMeshes, ShapeVertex};
use camera::Camera;
use label::*;
use pipeline::*;
use texture::*;
use uniform::*;

/// Capacity of the per-draw uniform buffer.
pub const MAX_DRAWS: usize = 256;

#[derive(Debug)]
pub struct UniformBind {
    pub buffer: Buffer,
    pub bind_group: BindGroup,
}

#[derive(Debug)]
pub struct RenderState {
    pub device: Device,
    pub queue: Queue,
    pub main_surface: Surface<'static>,
    pub main_surface_config: SurfaceConfiguration,
    pub depth: TextureBind,
    pub pipeline: RenderPipeline,

    frame: UniformBind,
    objects: UniformBind,
    object_stride: BufferAddress,

    pub textures: SceneTextures,
    pub meshes: ShapeMeshes,
    pub lights: LightRig,
    draws: Vec<DrawCommand>,
    pub clear_color: Color,
}

impl RenderState {
    pub async fn init(window: Arc<Window>, shader_path: &str) -> Result<RenderState> {
        let instance = Instance::new(InstanceDescriptor::default());
        let size = window.inner_size();
        let surface = instance
            .create_surface(window)
            .context("failed to create surface")?;

        let adapter = {
            let opt = RequestAdapterOptions {
                power_preference: Default::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            };
            instance
                .request_adapter(&opt)
                .await
                .ok_or_else(|| anyhow!("no graphics adapter can present to the window"))?
        };
        info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = {
            let desc = DeviceDescriptor {
                label: Some("Main Device"),
                required_features: Features::empty(),
                required_limits: Limits::default(),
            };
            adapter
                .request_device(&desc, None)
                .await
                .context("failed to request device")?
        };

        let main_surface_config = {
            let con = Self::get_default_main_surface_config(
                size.width.max(1),
                size.height.max(1),
                &surface,
                &adapter,
            )?;
            surface.configure(&device, &con);
            con
        };
        let depth = TextureBind::depth(&device, main_surface_config.width, main_surface_config.height);

        // group 0: camera and lights, rewritten every frame
        let (frame_layout, frame) = {
            let buffer = device.create_buffer_init(&BufferInitDescriptor {
                label: get_default_label(&Some("Frame"), [BUFFER_LABEL]).as_deref(),
                contents: bytemuck::bytes_of(&FrameUniform::default()),
                usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            });
            let (layout, bind_group) = {
                let mut builder = BindGroupBuider::default();
                builder
                    .set_device(&device)
                    .set_label("Per Frame")
                    .push_entry(BindGroupBuilderEntryDesc {
                        resource: buffer.as_entire_binding(),
                        visibility: ShaderStages::VERTEX_FRAGMENT,
                        count: None,
                        ty: BindingType::Buffer {
                            ty: BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                    });
                builder.build()?
            };
            (layout, UniformBind { buffer, bind_group })
        };

        // group 1: one object block per draw, selected by dynamic offset
        let object_stride = uniform_stride(
            size_of::<ObjectUniform>() as BufferAddress,
            device.limits().min_uniform_buffer_offset_alignment as BufferAddress,
        );
        let (object_layout, objects) = {
            let buffer = device.create_buffer(&BufferDescriptor {
                label: get_default_label(&Some("Per Draw"), [BUFFER_LABEL]).as_deref(),
                size: object_stride * MAX_DRAWS as BufferAddress,
                usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let block_size = NonZeroU64::new(size_of::<ObjectUniform>() as u64);
            let (layout, bind_group) = {
                let mut builder = BindGroupBuider::default();
                builder
                    .set_device(&device)
                    .set_label("Per Draw")
                    .push_entry(BindGroupBuilderEntryDesc {
                        resource: BindingResource::Buffer(BufferBinding {
                            buffer: &buffer,
                            offset: 0,
                            size: block_size,
                        }),
                        visibility: ShaderStages::VERTEX_FRAGMENT,
                        count: None,
                        ty: BindingType::Buffer {
                            ty: BufferBindingType::Uniform,
                            has_dynamic_offset: true,
                            min_binding_size: block_size,
                        },
                    });
                builder.build()?
            };
            (layout, UniformBind { buffer, bind_group })
        };

        // group 2: texture and sampler
        let textures = SceneTextures::new(&device, &queue)?;

        let layout = {
            let label = get_default_label(&Some("Scene"), [PIPELINE_LAYOUT_LABEL]);
            device.create_pipeline_layout(&PipelineLayoutDescriptor {
                label: label.as_deref(),
                bind_group_layouts: &[&frame_layout, &object_layout, textures.layout()],
                push_constant_ranges: &[],
            })
        };

        let pipeline = {
            let shader = Shader::from_path(shader_path)?;
            let vertex_buffer = [ShapeVertex::desc()];
            let mut builder = PipelineBuilder::new();
            builder
                .set_device(&device)
                .set_label("Scene")
                .set_layout(&layout)
                .set_shader(&shader)
                .set_target_format(main_surface_config.format)
                .set_depth_format(TextureArgs::DEPTH_FORMAT)
                .set_vertex_buffer(&vertex_buffer);
            builder.build()?
        };

        Ok(RenderState {
            device,
            queue,
            main_surface: surface,
            main_surface_config,
            depth,
            pipeline,
            frame,
            objects,
            object_stride,
            textures,
            meshes: ShapeMeshes::default(),
            lights: LightRig::default(),
            draws: Vec::new(),
            clear_color: Color::BLACK,
        })
    }

    /// Writes every draw's uniform block. The scene is static, so this
    /// runs once after the draw list is recorded.
    pub fn upload_draws(&mut self, draws: Vec<DrawCommand>) -> Result<()> {
        if draws.len() > MAX_DRAWS {
            bail!("{} draws exceed the per-draw buffer of {}", draws.len(), MAX_DRAWS);
        }
        for draw in &draws {
            self.meshes.get(draw.shape.shape())?;
        }
        let stride = self.object_stride as usize;
        let mut bytes = vec![0u8; draws.len() * stride];
        for (block, draw) in bytes.chunks_exact_mut(stride).zip(&draws) {
            let uniform = ObjectUniform::from_state(&draw.state);
            block[..size_of::<ObjectUniform>()].copy_from_slice(bytemuck::bytes_of(&uniform));
        }
        if !bytes.is_empty() {
            self.queue.write_buffer(&self.objects.buffer, 0, &bytes);
        }
        debug!("uploaded {} draws", draws.len());
        self.draws = draws;
        Ok(())
    }

    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    pub fn redraw(&mut self, camera: &Camera) -> Result<()> {
        let frame = FrameUniform::new(camera, &self.lights);
        self.queue
            .write_buffer(&self.frame.buffer, 0, bytemuck::bytes_of(&frame));

        let output = match self.main_surface.get_current_texture() {
            Ok(output) => output,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                warn!("surface lost or outdated, reconfiguring");
                self.main_surface
                    .configure(&self.device, &self.main_surface_config);
                return Ok(());
            }
            Err(SurfaceError::Timeout) => {
                warn!("surface timed out, skipping frame");
                return Ok(());
            }
            Err(err) => return Err(err).context("failed to acquire surface texture"),
        };

        let mut encoder = {
            let desc = CommandEncoderDescriptor {
                label: Some("Main Command Encoder"),
            };
            self.device.create_command_encoder(&desc)
        };
        {
            let main_surface_view = output.texture.create_view(&Default::default());
            let mut render_pass = {
                let color_att = RenderPassColorAttachment {
                    view: &main_surface_view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                };
                let depth_stencil_att = RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                };
                let desc = RenderPassDescriptor {
                    label: Some("Main Render Pass"),
                    color_attachments: &[Some(color_att)],
                    depth_stencil_attachment: Some(depth_stencil_att),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                };
                encoder.begin_render_pass(&desc)
            };

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.frame.bind_group, &[]);
            for (i, draw) in self.draws.iter().enumerate() {
                let mesh = self.meshes.get(draw.shape.shape())?;
                let offset = (i as BufferAddress * self.object_stride) as DynamicOffset;
                render_pass.set_bind_group(1, &self.objects.bind_group, &[offset]);
                render_pass.set_bind_group(2, self.textures.bind_group(draw.state.texture_slot), &[]);
                render_pass.set_vertex_buffer(0, mesh.bind.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.bind.index_buffer.slice(..), mesh.bind.index_format);
                for (part, range) in &mesh.parts {
                    if draw.shape.wants(*part) {
                        render_pass.draw_indexed(range.clone(), 0, 0..1);
                    }
                }
            }
        }
        self.queue.submit(once(encoder.finish()));
        output.present();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.main_surface_config.width = width;
        self.main_surface_config.height = height;
        self.main_surface
            .configure(&self.device, &self.main_surface_config);
        self.depth = TextureBind::depth(&self.device, width, height);
    }
}

impl RenderState {
    fn get_default_main_surface_config(
        width: u32,
        height: u32,
        surface: &Surface,
        adapter: &Adapter,
    ) -> Result<SurfaceConfiguration> {
        let caps = surface.get_capabilities(adapter);
        let format = *caps
            .formats
            .first()
            .ok_or_else(|| anyhow!("surface reports no supported format"))?;
        Ok(SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: PresentMode::Fifo,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }
}

/// `size` rounded up to the dynamic offset alignment.
pub fn uniform_stride(size: BufferAddress, alignment: BufferAddress) -> BufferAddress {
    let alignment = alignment.max(1);
    (size + alignment - 1) / alignment * alignment
}
