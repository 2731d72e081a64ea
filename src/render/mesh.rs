use anyhow::Result;
use wgpu::{
    util::{BufferInitDescriptor, DeviceExt},
    *,
};

use crate::utils::{builder_set_fn, required};

use super::label::*;

/// Vertex attribute array for a `#[repr(C)]` struct, offsets taken with
/// `memoffset`.
macro_rules! field_desc {
    ($t:ty ; struct { $( $sloc:expr; $field:ident ; $format:ident,)+ }) => {
        vec![$(
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::$format,
                offset: memoffset::offset_of!($t, $field) as wgpu::BufferAddress,
                shader_location: $sloc,
            }
        ),+]
    };
}

/// `VertexBufferLayout<'static>` whose attributes live in a lazily
/// initialised static.
macro_rules! vertex_buffer_layout {
    ($t:ty; $step_mode:ident; struct { $( $sloc:expr; $field:ident ; $format:ident,)+ }) => {{
        static ATTRS: once_cell::sync::OnceCell<Vec<wgpu::VertexAttribute>> =
            once_cell::sync::OnceCell::new();
        let attrs = ATTRS.get_or_init(|| {
            $crate::render::mesh::field_desc!($t ; struct {$($sloc; $field ; $format,)+})
        });
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<$t>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::$step_mode,
            attributes: &attrs[..],
        }
    }};
}

pub(crate) use field_desc;
pub(crate) use vertex_buffer_layout;

#[derive(Clone, Debug, Default)]
pub struct Mesh<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u16>,
}

#[derive(Debug)]
pub struct MeshBind {
    pub vertex_buffer: Buffer,
    pub index_buffer: Buffer,
    pub index_format: IndexFormat,
}

pub struct MeshBindBuilder<'a, V> {
    device: Option<&'a Device>,
    label: Option<&'a str>,
    mesh: Option<&'a Mesh<V>>,
}

impl<'a, V> Default for MeshBindBuilder<'a, V> {
    fn default() -> Self {
        Self {
            device: None,
            label: None,
            mesh: None,
        }
    }
}

impl<'a, V> MeshBindBuilder<'a, V>
where
    V: bytemuck::Pod,
{
    builder_set_fn!(set_device, device, &'a Device);
    builder_set_fn!(set_label, label, &'a str);
    builder_set_fn!(set_mesh, mesh, &'a Mesh<V>);

    pub fn build(&self) -> Result<MeshBind> {
        let device = required(self.device, "device")?;
        let mesh = required(self.mesh, "mesh")?;

        let vert_label = get_default_label(&self.label, [VERT_ATTR_LABEL, BUFFER_LABEL]);
        let index_label = get_default_label(&self.label, [INDEX_LABEL, BUFFER_LABEL]);
        let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: vert_label.as_deref(),
            contents: bytemuck::cast_slice(&mesh.vertices[..]),
            usage: BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&BufferInitDescriptor {
            label: index_label.as_deref(),
            contents: bytemuck::cast_slice(&mesh.indices[..]),
            usage: BufferUsages::INDEX,
        });
        Ok(MeshBind {
            vertex_buffer,
            index_buffer,
            index_format: IndexFormat::Uint16,
        })
    }
}
