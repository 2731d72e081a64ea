use std::{mem::take, num::NonZeroU32};

use anyhow::Result;
use resource::Shader;
use wgpu::*;

use crate::utils::{builder_set_fn, required};

use super::label::*;

#[derive(Clone, Debug, Default)]
pub struct PipelineBuilder<'d> {
    pub device: Option<&'d Device>,
    pub layout: Option<&'d PipelineLayout>,
    pub shader: Option<&'d Shader>,
    pub label: Option<&'d str>,
    pub vertex_buffer: Option<&'d [VertexBufferLayout<'d>]>,
    pub target_format: Option<TextureFormat>,
    pub target_blend: Option<BlendState>,
    pub depth_format: Option<TextureFormat>,
    pub depth_write: Option<bool>,
}

impl<'d> PipelineBuilder<'d> {
    pub fn new() -> Self {
        Self::default()
    }

    builder_set_fn!(set_device, device, &'d Device);
    builder_set_fn!(set_layout, layout, &'d PipelineLayout);
    builder_set_fn!(set_shader, shader, &'d Shader);
    builder_set_fn!(set_label, label, &'d str);
    builder_set_fn!(
        set_vertex_buffer,
        vertex_buffer,
        &'d [VertexBufferLayout<'d>]
    );
    builder_set_fn!(set_target_format, target_format, TextureFormat);
    builder_set_fn!(set_target_blend, target_blend, BlendState);
    builder_set_fn!(set_depth_format, depth_format, TextureFormat);
    builder_set_fn!(set_depth_write, depth_write, bool);

    fn add_default_values(&mut self) {
        if self.target_blend.is_none() {
            self.set_target_blend(BlendState::REPLACE);
        };
        if self.depth_format.is_none() {
            self.set_depth_format(TextureFormat::Depth32Float);
        }
        if self.depth_write.is_none() {
            self.set_depth_write(true);
        }
    }

    pub fn build(mut self) -> Result<RenderPipeline> {
        self.add_default_values();

        let device = required(self.device, "device")?;
        let layout = required(self.layout, "layout")?;
        let shader = required(self.shader, "shader")?;
        let vertex_buffer = required(self.vertex_buffer, "vertex_buffer")?;
        let depth_format = required(self.depth_format, "depth_format")?;
        let depth_write = required(self.depth_write, "depth_write")?;
        let target_format = required(self.target_format, "target_format")?;
        let target_blend = required(self.target_blend, "target_blend")?;

        let module = {
            let label = get_default_label(&self.label, [SHADER_LABEL]);
            device.create_shader_module(ShaderModuleDescriptor {
                label: label.as_deref(),
                source: shader.as_shader_source(),
            })
        };
        let targets = [Some(ColorTargetState {
            format: target_format,
            blend: Some(target_blend),
            write_mask: ColorWrites::ALL,
        })];
        let label = get_default_label(&self.label, [PIPELINE_LABEL]);
        let desc = RenderPipelineDescriptor {
            label: label.as_deref(),
            layout: Some(layout),
            vertex: VertexState {
                module: &module,
                entry_point: shader.vs_enter_point(),
                buffers: vertex_buffer,
            },
            fragment: Some(FragmentState {
                module: &module,
                entry_point: shader.fs_enter_point(),
                targets: &targets,
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                // desk boxes and planes are seen from both sides
                cull_mode: None,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: depth_format,
                depth_write_enabled: depth_write,
                depth_compare: CompareFunction::Less,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        };
        Ok(device.create_render_pipeline(&desc))
    }
}

#[derive(Debug, Default)]
pub struct BindGroupBuider<'a> {
    device: Option<&'a Device>,
    label: Option<&'a str>,
    entries: Vec<BindGroupBuilderEntryDesc<'a>>,
}

#[derive(Debug)]
pub struct BindGroupBuilderEntryDesc<'a> {
    pub resource: BindingResource<'a>,
    pub visibility: ShaderStages,
    pub count: Option<NonZeroU32>,
    pub ty: BindingType,
}

impl<'a> BindGroupBuider<'a> {
    builder_set_fn!(set_device, device, &'a Device);
    builder_set_fn!(set_label, label, &'a str);

    pub fn push_entry(&mut self, desc: BindGroupBuilderEntryDesc<'a>) -> &mut Self {
        self.entries.push(desc);
        self
    }

    pub fn push_entries<T>(&mut self, descs: T) -> &mut Self
    where
        T: IntoIterator<Item = BindGroupBuilderEntryDesc<'a>>,
    {
        self.entries.extend(descs);
        self
    }

    /// Layout entries and bind group entries, bound in push order.
    fn split_entries(&mut self) -> (Vec<BindGroupLayoutEntry>, Vec<BindGroupEntry<'a>>) {
        take(&mut self.entries)
            .into_iter()
            .enumerate()
            .map(|(i, e)| {
                let layout = BindGroupLayoutEntry {
                    binding: i as u32,
                    count: e.count,
                    visibility: e.visibility,
                    ty: e.ty,
                };
                let entry = BindGroupEntry {
                    binding: i as u32,
                    resource: e.resource,
                };
                (layout, entry)
            })
            .unzip()
    }

    /// Creates a new layout from the entries along with the bind group.
    pub fn build(&mut self) -> Result<(BindGroupLayout, BindGroup)> {
        let device = required(self.device, "device")?;
        let (layout_entries, entries) = self.split_entries();
        let layout = {
            let label = get_default_label(&self.label, [BIND_GROUP_LAYOUT_LABEL]);
            device.create_bind_group_layout(&BindGroupLayoutDescriptor {
                label: label.as_deref(),
                entries: &layout_entries,
            })
        };
        let bind_group = self.create_bind_group(device, &layout, &entries);
        Ok((layout, bind_group))
    }

    /// Binds the entries against an existing, compatible layout.
    pub fn build_with_layout(&mut self, layout: &BindGroupLayout) -> Result<BindGroup> {
        let device = required(self.device, "device")?;
        let (_, entries) = self.split_entries();
        Ok(self.create_bind_group(device, layout, &entries))
    }

    fn create_bind_group(
        &self,
        device: &Device,
        layout: &BindGroupLayout,
        entries: &[BindGroupEntry],
    ) -> BindGroup {
        let label = get_default_label(&self.label, [BIND_GROUP_LABEL]);
        device.create_bind_group(&BindGroupDescriptor {
            label: label.as_deref(),
            layout,
            entries,
        })
    }
}
