//! The 3D scene: instanced meshes for the drones, defended point, and
//! burst particles over a ground grid, rendered through a fixed camera.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use winit::window::Window;

use skywatch_core::snapshot::SimSnapshot;
use skywatch_core::status::SimStatus;

use crate::camera::Camera;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::primitives::{
    create_box_mesh, create_cylinder_mesh, create_grid_lines, create_sphere_mesh, LineVertex,
    Mesh, Vertex,
};

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.0015,
    g: 0.0015,
    b: 0.0015,
    a: 1.0,
};

const ENEMY_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const INTERCEPTOR_COLOR: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
const TARGET_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const PARTICLE_COLOR: [f32; 4] = [1.0, 0.44, 0.0, 1.0];
const GRID_CENTER_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const GRID_LINE_COLOR: [f32; 4] = [0.006, 0.015, 0.006, 1.0];

/// Particle instance slots; bursts from consecutive missions can overlap.
const PARTICLE_INSTANCE_CAP: usize = 64;

/// Per-instance data: position + uniform scale, rotation quat, tint.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct InstanceRaw {
    pos_scale: [f32; 4],
    rotation: [f32; 4],
    color: [f32; 4],
}

impl InstanceRaw {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
    ];

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// The 3D rendering path. Constructing one runs the capability probe:
/// failure here is what sends the session down the 2D fallback.
pub struct Scene3d {
    context: RenderContext,
    camera: Camera,
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    grid_buffer: wgpu::Buffer,
    grid_vertex_count: u32,
    drone_mesh: GpuMesh,
    target_mesh: GpuMesh,
    particle_mesh: GpuMesh,
    drone_instances: wgpu::Buffer,
    target_instances: wgpu::Buffer,
    particle_instances: wgpu::Buffer,
    drone_instance_count: u32,
    particle_instance_count: u32,
}

impl Scene3d {
    /// Create a scene presenting to the given window.
    pub fn windowed(window: Arc<Window>) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::new(window))?;
        Ok(Self::with_context(context))
    }

    /// Create an offscreen scene (tests, probing without a window).
    pub fn headless(width: u32, height: u32) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::headless(width, height))?;
        Ok(Self::with_context(context))
    }

    fn with_context(context: RenderContext) -> Self {
        let device = &context.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("Camera Bind Group Layout"),
            });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform {
                view_proj: [[0.0; 4]; 4],
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("Camera Bind Group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_stencil = wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        };

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_mesh"),
                buffers: &[Vertex::desc(), InstanceRaw::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_mesh"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(depth_stencil.clone()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_line"),
                buffers: &[LineVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_line"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(depth_stencil),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let grid = create_grid_lines(50.0, 50, GRID_CENTER_COLOR, GRID_LINE_COLOR);
        let grid_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid Vertex Buffer"),
            contents: bytemuck::cast_slice(&grid),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // White base meshes; instance tints select the final color.
        let white = [1.0, 1.0, 1.0, 1.0];
        let drone_mesh = GpuMesh::upload(device, &create_box_mesh(1.0, 0.4, 1.0, white), "Drone");
        let target_mesh = GpuMesh::upload(
            device,
            &create_cylinder_mesh(0.5, 2.0, 16, white),
            "Defended Point",
        );
        let particle_mesh =
            GpuMesh::upload(device, &create_sphere_mesh(0.2, 12, 8, white), "Particle");

        let instance_buffer = |label: &str, capacity: usize| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: (capacity * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let drone_instances = instance_buffer("Drone Instances", 2);
        let target_instances = instance_buffer("Target Instances", 1);
        let particle_instances = instance_buffer("Particle Instances", PARTICLE_INSTANCE_CAP);

        let camera = Camera::new(context.aspect_ratio());

        Self {
            context,
            camera,
            mesh_pipeline,
            line_pipeline,
            camera_buffer,
            camera_bind_group,
            grid_buffer,
            grid_vertex_count: grid.len() as u32,
            drone_mesh,
            target_mesh,
            particle_mesh,
            drone_instances,
            target_instances,
            particle_instances,
            drone_instance_count: 0,
            particle_instance_count: 0,
        }
    }

    /// Copy body transforms and particle state into the instance buffers.
    pub fn sync(&mut self, snapshot: &SimSnapshot) {
        let identity = [0.0, 0.0, 0.0, 1.0];

        // A successful intercept removes both drone visuals; the bodies
        // themselves persist until the next mission spawn.
        let mut drones: Vec<InstanceRaw> = Vec::with_capacity(2);
        if snapshot.status != SimStatus::Success {
            for (body, color) in [
                (&snapshot.enemy, ENEMY_COLOR),
                (&snapshot.interceptor, INTERCEPTOR_COLOR),
            ] {
                if let Some(view) = body {
                    drones.push(InstanceRaw {
                        pos_scale: [view.position.x, view.position.y, view.position.z, 1.0],
                        rotation: view.rotation,
                        color,
                    });
                }
            }
        }
        self.drone_instance_count = drones.len() as u32;
        if !drones.is_empty() {
            self.context
                .queue
                .write_buffer(&self.drone_instances, 0, bytemuck::cast_slice(&drones));
        }

        let target = InstanceRaw {
            pos_scale: [snapshot.target.x, snapshot.target.y, snapshot.target.z, 1.0],
            rotation: identity,
            color: TARGET_COLOR,
        };
        self.context
            .queue
            .write_buffer(&self.target_instances, 0, bytemuck::cast_slice(&[target]));

        // Particles shrink with remaining life.
        let particles: Vec<InstanceRaw> = snapshot
            .particles
            .iter()
            .take(PARTICLE_INSTANCE_CAP)
            .map(|p| InstanceRaw {
                pos_scale: [p.position.x, p.position.y, p.position.z, p.life.max(0.0)],
                rotation: identity,
                color: PARTICLE_COLOR,
            })
            .collect();
        self.particle_instance_count = particles.len() as u32;
        if !particles.is_empty() {
            self.context.queue.write_buffer(
                &self.particle_instances,
                0,
                bytemuck::cast_slice(&particles),
            );
        }
    }

    /// Render the scene and present (windowed) or complete the offscreen
    /// pass.
    pub fn render(&mut self) -> Result<(), RenderError> {
        let (frame, view) = self.context.acquire_frame()?;

        let uniform = CameraUniform {
            view_proj: self.camera.view_projection().to_cols_array_2d(),
        };
        self.context
            .queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.context.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            pass.set_pipeline(&self.line_pipeline);
            pass.set_vertex_buffer(0, self.grid_buffer.slice(..));
            pass.draw(0..self.grid_vertex_count, 0..1);

            pass.set_pipeline(&self.mesh_pipeline);

            pass.set_vertex_buffer(0, self.target_mesh.vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, self.target_instances.slice(..));
            pass.set_index_buffer(
                self.target_mesh.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            pass.draw_indexed(0..self.target_mesh.index_count, 0, 0..1);

            if self.drone_instance_count > 0 {
                pass.set_vertex_buffer(0, self.drone_mesh.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.drone_instances.slice(..));
                pass.set_index_buffer(
                    self.drone_mesh.index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                pass.draw_indexed(
                    0..self.drone_mesh.index_count,
                    0,
                    0..self.drone_instance_count,
                );
            }

            if self.particle_instance_count > 0 {
                pass.set_vertex_buffer(0, self.particle_mesh.vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.particle_instances.slice(..));
                pass.set_index_buffer(
                    self.particle_mesh.index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                pass.draw_indexed(
                    0..self.particle_mesh.index_count,
                    0,
                    0..self.particle_instance_count,
                );
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));

        if let Some(frame) = frame {
            frame.present();
        }
        Ok(())
    }

    /// Re-fit to new viewport dimensions (projection + framebuffer).
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.camera.set_aspect(width, height);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.context.width, self.context.height)
    }

    /// Release graphics resources.
    pub fn teardown(self) -> Result<(), RenderError> {
        self.context.teardown()
    }
}
