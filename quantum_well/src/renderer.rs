//! GPU rendering of the well surfaces
//!
//! Vertex buffers are created once at grid size and rewritten in place with
//! `queue.write_buffer` whenever the session recomputes its surfaces.

use common::{
    create_dynamic_vertex_buffer, create_index_buffer, create_uniform_buffer, Camera3D,
    CameraUniform, GraphicsContext,
};

use crate::config::{SurfaceStyle, BOUNDARY_COLOR, CLEAR_COLOR};
use crate::constants::WELL_HALF_WIDTH;
use crate::simulation::QuantumWell;
use crate::surface::{SurfaceBuffer, SurfaceSet};
use crate::wavefunction::Quantity;

/// Surface vertex with shading normal
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl SurfaceVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SurfaceVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Line vertex for the well boundary
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Per-surface color and offset uniform
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceUniform {
    pub color: [f32; 4],
    pub offset: [f32; 4],
}

impl SurfaceUniform {
    pub fn from_style(style: &SurfaceStyle) -> Self {
        Self {
            color: style.rgba(),
            offset: [0.0, 0.0, style.z_offset, 0.0],
        }
    }
}

/// Fill `out` with GPU vertices for `buffer`, reusing its allocation
pub fn fill_surface_vertices(buffer: &SurfaceBuffer, out: &mut Vec<SurfaceVertex>) {
    out.clear();
    out.extend(
        buffer
            .vertices()
            .iter()
            .zip(buffer.normals())
            .map(|(p, n)| SurfaceVertex {
                position: p.to_array(),
                normal: n.to_array(),
            }),
    );
}

/// Four walls of the well as a line list at z = 0
pub fn boundary_vertices() -> Vec<LineVertex> {
    let h = WELL_HALF_WIDTH;
    let corners = [[-h, -h], [h, -h], [h, h], [-h, h]];
    (0..4)
        .flat_map(|i| {
            let [x0, y0] = corners[i];
            let [x1, y1] = corners[(i + 1) % 4];
            [
                LineVertex { position: [x0, y0, 0.0], color: BOUNDARY_COLOR },
                LineVertex { position: [x1, y1, 0.0], color: BOUNDARY_COLOR },
            ]
        })
        .collect()
}

struct SurfaceMesh {
    quantity: Quantity,
    style: SurfaceStyle,
    vertex_buffer: wgpu::Buffer,
    style_bind_group: wgpu::BindGroup,
}

/// Renders the three well surfaces plus the boundary
pub struct WellRenderer {
    solid_pipeline: wgpu::RenderPipeline,
    wire_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,

    meshes: Vec<SurfaceMesh>,
    triangle_buffer: wgpu::Buffer,
    triangle_count: u32,
    edge_buffer: wgpu::Buffer,
    edge_count: u32,
    boundary_buffer: wgpu::Buffer,
    boundary_count: u32,

    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::TextureView,

    staging: Vec<SurfaceVertex>,
    uploaded_generation: Option<u64>,
}

impl WellRenderer {
    pub fn new(ctx: &GraphicsContext, surfaces: &SurfaceSet) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Well Surface Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/surface.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[uniform_layout_entry()],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let style_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Surface Style Bind Group Layout"),
                entries: &[uniform_layout_entry()],
            });

        let surface_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Surface Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &style_bind_group_layout],
            push_constant_ranges: &[],
        });

        let line_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_texture = Self::create_depth_texture(device, ctx.size.width, ctx.size.height);

        // Solid surface writes depth so wireframes behind it are hidden
        let solid_pipeline = create_pipeline(
            device,
            ctx.config.format,
            "Solid Surface Pipeline",
            &surface_layout,
            &shader,
            ("vs_surface", "fs_surface"),
            SurfaceVertex::layout(),
            wgpu::PrimitiveTopology::TriangleList,
            true,
        );

        let wire_pipeline = create_pipeline(
            device,
            ctx.config.format,
            "Wireframe Surface Pipeline",
            &surface_layout,
            &shader,
            ("vs_surface", "fs_wire"),
            SurfaceVertex::layout(),
            wgpu::PrimitiveTopology::LineList,
            false,
        );

        let line_pipeline = create_pipeline(
            device,
            ctx.config.format,
            "Boundary Line Pipeline",
            &line_layout,
            &shader,
            ("vs_line", "fs_line"),
            LineVertex::layout(),
            wgpu::PrimitiveTopology::LineList,
            true,
        );

        let grid = surfaces.grid();
        let triangles = grid.triangle_indices();
        let edges = grid.edge_indices();
        let triangle_buffer = create_index_buffer(device, "Surface Triangle Indices", &triangles);
        let edge_buffer = create_index_buffer(device, "Surface Edge Indices", &edges);

        let boundary = boundary_vertices();
        let boundary_buffer = create_dynamic_vertex_buffer(device, "Boundary Buffer", &boundary);

        let mut staging = Vec::with_capacity(grid.vertex_count());
        let meshes = Quantity::ALL
            .iter()
            .map(|&quantity| {
                let style = SurfaceStyle::for_quantity(quantity);
                fill_surface_vertices(surfaces.get(quantity), &mut staging);
                let vertex_buffer =
                    create_dynamic_vertex_buffer(device, quantity.name(), &staging);

                let style_buffer = create_uniform_buffer(
                    device,
                    "Surface Style Buffer",
                    &SurfaceUniform::from_style(&style),
                );
                let style_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Surface Style Bind Group"),
                    layout: &style_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: style_buffer.as_entire_binding(),
                    }],
                });

                SurfaceMesh {
                    quantity,
                    style,
                    vertex_buffer,
                    style_bind_group,
                }
            })
            .collect();

        log::debug!(
            "Surface renderer ready: {} vertices, {} triangles, {} edges per surface",
            grid.vertex_count(),
            triangles.len() / 3,
            edges.len() / 2
        );

        Self {
            solid_pipeline,
            wire_pipeline,
            line_pipeline,
            meshes,
            triangle_buffer,
            triangle_count: triangles.len() as u32,
            edge_buffer,
            edge_count: edges.len() as u32,
            boundary_buffer,
            boundary_count: boundary.len() as u32,
            camera_buffer,
            camera_bind_group,
            depth_texture,
            staging,
            uploaded_generation: None,
        }
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera3D) {
        let uniform = CameraUniform::from_camera_3d(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Copy recomputed surfaces to the GPU; a no-op while the session is frozen
    pub fn upload(&mut self, queue: &wgpu::Queue, well: &QuantumWell) {
        if self.uploaded_generation == Some(well.generation()) {
            return;
        }
        for mesh in &self.meshes {
            fill_surface_vertices(well.surfaces().get(mesh.quantity), &mut self.staging);
            queue.write_buffer(&mesh.vertex_buffer, 0, bytemuck::cast_slice(&self.staging));
        }
        self.uploaded_generation = Some(well.generation());
    }

    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        well: &QuantumWell,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Well Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        render_pass.set_pipeline(&self.line_pipeline);
        render_pass.set_vertex_buffer(0, self.boundary_buffer.slice(..));
        render_pass.draw(0..self.boundary_count, 0..1);

        let display_mode = well.state().display_mode();
        for &quantity in display_mode.visible() {
            let Some(mesh) = self.meshes.iter().find(|m| m.quantity == quantity) else {
                continue;
            };

            render_pass.set_bind_group(1, &mesh.style_bind_group, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));

            if mesh.style.wireframe {
                render_pass.set_pipeline(&self.wire_pipeline);
                render_pass.set_index_buffer(self.edge_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.edge_count, 0, 0..1);
            } else {
                render_pass.set_pipeline(&self.solid_pipeline);
                render_pass
                    .set_index_buffer(self.triangle_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.triangle_count, 0, 0..1);
            }
        }
    }
}

fn uniform_layout_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    (vs_entry, fs_entry): (&str, &str),
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: vs_entry,
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: fs_entry,
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WellConfig;

    #[test]
    fn test_boundary_is_closed_square() {
        let lines = boundary_vertices();
        assert_eq!(lines.len(), 8);
        for pair in lines.chunks(2) {
            let [x0, y0, z0] = pair[0].position;
            let [x1, y1, z1] = pair[1].position;
            assert_eq!((z0, z1), (0.0, 0.0));
            // Each wall is axis-aligned and spans the full well
            assert!(x0 == x1 || y0 == y1);
            assert_eq!((x1 - x0).abs() + (y1 - y0).abs(), 2.0);
        }
        assert_eq!(lines[0].position, lines[7].position);
    }

    #[test]
    fn test_surface_vertices_mirror_buffer() {
        let well = QuantumWell::new(&WellConfig { resolution: 8, ..Default::default() }).unwrap();
        let buffer = well.surfaces().get(Quantity::Probability);

        let mut out = Vec::new();
        fill_surface_vertices(buffer, &mut out);
        assert_eq!(out.len(), 64);
        for (gpu, (p, n)) in out.iter().zip(buffer.vertices().iter().zip(buffer.normals())) {
            assert_eq!(gpu.position, p.to_array());
            assert_eq!(gpu.normal, n.to_array());
        }

        let capacity = out.capacity();
        fill_surface_vertices(buffer, &mut out);
        assert_eq!(out.capacity(), capacity);
    }

    #[test]
    fn test_surface_uniform_carries_offset() {
        let uniform = SurfaceUniform::from_style(&SurfaceStyle::for_quantity(Quantity::Imaginary));
        assert_eq!(uniform.offset, [0.0, 0.0, -0.1, 0.0]);
        assert_eq!(uniform.color[3], 0.7);
    }
}
