use crate::mesh::{self, HudVertex, LineVertex, MeshData, Vertex};
use crate::shaders;
use crate::texture::Texture;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use impulse_physics::PhysicsWorld;
use impulse_player::{DebugRay, PlayerCamera};
use impulse_scene::{MeshKind, Scene};
use std::ops::Range;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct HudUniforms {
    mvp: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    tint: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, tint: Vec4) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            tint: tint.to_array(),
        }
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

fn upload_mesh(device: &wgpu::Device, label: &str, data: &MeshData) -> GpuMesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&data.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(&data.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: data.indices.len() as u32,
    }
}

const MAX_INSTANCES: u32 = 4096;
const CROSSHAIR_HALF_SIZE: f32 = 16.0;
const DEBUG_RAY_COLOR: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
const DEBUG_GLYPH_SCALE: f32 = 0.25;

/// wgpu renderer for the sandbox: instanced world meshes, the debug-ray
/// segment, and the crosshair HUD.
pub struct SandboxRenderer {
    world_pipeline: wgpu::RenderPipeline,
    wire_pipeline: Option<wgpu::RenderPipeline>,
    line_pipeline: wgpu::RenderPipeline,
    hud_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    hud_uniform_buffer: wgpu::Buffer,
    hud_uniform_bind_group: wgpu::BindGroup,
    hud_texture_bind_group: wgpu::BindGroup,
    _crosshair: Texture,
    plane: GpuMesh,
    cube: GpuMesh,
    sphere: GpuMesh,
    hud_vertex_buffer: wgpu::Buffer,
    hud_index_buffer: wgpu::Buffer,
    hud_index_count: u32,
    instance_buffer: wgpu::Buffer,
    line_vertex_buffer: wgpu::Buffer,
    depth_texture: wgpu::TextureView,
    width: u32,
    height: u32,
    wireframe: bool,
    wireframe_supported: bool,
}

impl SandboxRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        crosshair: Texture,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let hud_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hud_uniform_buffer"),
            contents: bytemuck::bytes_of(&HudUniforms {
                mvp: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
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
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("hud_texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let hud_uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("hud_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: hud_uniform_buffer.as_entire_binding(),
            }],
        });
        let hud_texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("hud_texture_bind_group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&crosshair.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&crosshair.sampler),
                },
            ],
        });

        let world_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("world_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });
        let hud_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("hud_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let world_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("world_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::WORLD_SHADER.into()),
        });
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::LINE_SHADER.into()),
        });
        let hud_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("hud_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::HUD_SHADER.into()),
        });

        let world_vertex_layouts = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x3,
                ],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<InstanceData>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![
                    2 => Float32x4,
                    3 => Float32x4,
                    4 => Float32x4,
                    5 => Float32x4,
                    6 => Float32x4,
                ],
            },
        ];

        let world_targets = [Some(wgpu::ColorTargetState {
            format: surface_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];
        let world_pipeline_desc = |polygon_mode| wgpu::RenderPipelineDescriptor {
            label: Some("world_pipeline"),
            layout: Some(&world_layout),
            vertex: wgpu::VertexState {
                module: &world_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &world_vertex_layouts,
            },
            fragment: Some(wgpu::FragmentState {
                module: &world_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &world_targets,
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                polygon_mode,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        };

        let world_pipeline =
            device.create_render_pipeline(&world_pipeline_desc(wgpu::PolygonMode::Fill));
        let wireframe_supported = device
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        let wire_pipeline = wireframe_supported
            .then(|| device.create_render_pipeline(&world_pipeline_desc(wgpu::PolygonMode::Line)));

        let line_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line_pipeline"),
            layout: Some(&world_layout),
            vertex: wgpu::VertexState {
                module: &line_shader,
                entry_point: Some("vs_line"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x4,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &line_shader,
                entry_point: Some("fs_line"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // The crosshair inverts whatever it covers: src * (1 - dst).
        let hud_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("hud_pipeline"),
            layout: Some(&hud_layout),
            vertex: wgpu::VertexState {
                module: &hud_shader,
                entry_point: Some("vs_hud"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<HudVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &hud_shader,
                entry_point: Some("fs_hud"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::OneMinusDst,
                            dst_factor: wgpu::BlendFactor::Zero,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent::REPLACE,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let plane = upload_mesh(device, "plane_mesh", &mesh::plane_mesh());
        let cube = upload_mesh(device, "cube_mesh", &mesh::cube_mesh());
        let sphere = upload_mesh(device, "sphere_mesh", &mesh::sphere_mesh(32, 16));

        let (hud_vertices, hud_indices) = mesh::hud_quad();
        let hud_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hud_vertex_buffer"),
            contents: bytemuck::cast_slice(&hud_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let hud_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("hud_index_buffer"),
            contents: bytemuck::cast_slice(&hud_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (MAX_INSTANCES as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // Rewritten on every cast; two endpoints.
        let line_vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("line_vertex_buffer"),
            size: 2 * std::mem::size_of::<LineVertex>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        if !wireframe_supported {
            tracing::debug!("polygon line mode not supported by this adapter");
        }

        Self {
            world_pipeline,
            wire_pipeline,
            line_pipeline,
            hud_pipeline,
            uniform_buffer,
            uniform_bind_group,
            hud_uniform_buffer,
            hud_uniform_bind_group,
            hud_texture_bind_group,
            _crosshair: crosshair,
            plane,
            cube,
            sphere,
            hud_vertex_buffer,
            hud_index_buffer,
            hud_index_count: hud_indices.len() as u32,
            instance_buffer,
            line_vertex_buffer,
            depth_texture,
            width,
            height,
            wireframe: false,
            wireframe_supported,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.depth_texture = Self::create_depth_texture(device, self.width, self.height);
    }

    /// Flip fill/line rendering. Returns the new state; a no-op when the
    /// adapter lacks line polygon mode.
    pub fn toggle_wireframe(&mut self) -> bool {
        if self.wireframe_supported {
            self.wireframe = !self.wireframe;
        } else {
            tracing::warn!("wireframe unavailable: adapter lacks line polygon mode");
        }
        self.wireframe
    }

    pub fn wireframe(&self) -> bool {
        self.wireframe
    }

    /// Render one frame: scene meshes (transforms read live from the physics
    /// world), the optional debug ray, then the crosshair HUD.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &PlayerCamera,
        world: &PhysicsWorld,
        scene: &Scene,
        debug_ray: Option<DebugRay>,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_projection(world).to_cols_array_2d(),
            }),
        );

        // Bucket instances by mesh, concatenated into one buffer.
        let mut planes: Vec<InstanceData> = Vec::new();
        let mut cubes: Vec<InstanceData> = Vec::new();
        let mut spheres: Vec<InstanceData> = Vec::new();
        for object in &scene.objects {
            let Some(transform) = object.transform(world) else {
                continue;
            };
            let instance =
                InstanceData::new(transform.matrix_with_scale(object.visual_scale), object.tint);
            match object.mesh {
                MeshKind::Plane => planes.push(instance),
                MeshKind::Cube => cubes.push(instance),
                MeshKind::Sphere => spheres.push(instance),
            }
        }
        if let Some(ray) = debug_ray {
            for endpoint in [ray.from, ray.to] {
                spheres.push(InstanceData::new(
                    Mat4::from_scale_rotation_translation(
                        Vec3::splat(DEBUG_GLYPH_SCALE),
                        glam::Quat::IDENTITY,
                        endpoint,
                    ),
                    Vec4::from_array(DEBUG_RAY_COLOR),
                ));
            }
        }

        let mut instances = planes;
        let plane_range = 0..instances.len() as u32;
        instances.extend_from_slice(&cubes);
        let cube_range = plane_range.end..instances.len() as u32;
        instances.extend_from_slice(&spheres);
        let sphere_range = cube_range.end..instances.len() as u32;

        if instances.len() as u32 > MAX_INSTANCES {
            tracing::warn!(
                total = instances.len(),
                cap = MAX_INSTANCES,
                "instance overflow, truncating draw"
            );
            instances.truncate(MAX_INSTANCES as usize);
        }
        let clamp = |r: Range<u32>| r.start.min(MAX_INSTANCES)..r.end.min(MAX_INSTANCES);
        let (plane_range, cube_range, sphere_range) =
            (clamp(plane_range), clamp(cube_range), clamp(sphere_range));
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        if let Some(ray) = debug_ray {
            let segment = [
                LineVertex {
                    position: ray.from.to_array(),
                    color: DEBUG_RAY_COLOR,
                },
                LineVertex {
                    position: ray.to.to_array(),
                    color: DEBUG_RAY_COLOR,
                },
            ];
            queue.write_buffer(&self.line_vertex_buffer, 0, bytemuck::cast_slice(&segment));
        }

        let hud_projection = Mat4::orthographic_rh(
            0.0,
            self.width as f32,
            self.height as f32,
            0.0,
            -1.0,
            1.0,
        );
        let hud_model = Mat4::from_translation(Vec3::new(
            self.width as f32 * 0.5,
            self.height as f32 * 0.5,
            0.0,
        )) * Mat4::from_scale(Vec3::new(CROSSHAIR_HALF_SIZE, CROSSHAIR_HALF_SIZE, 1.0));
        queue.write_buffer(
            &self.hud_uniform_buffer,
            0,
            bytemuck::bytes_of(&HudUniforms {
                mvp: (hud_projection * hud_model).to_cols_array_2d(),
            }),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("world_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.15,
                            a: 1.0,
                        }),
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
                ..Default::default()
            });

            let pipeline = match (&self.wire_pipeline, self.wireframe) {
                (Some(wire), true) => wire,
                _ => &self.world_pipeline,
            };
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

            for (gpu_mesh, range) in [
                (&self.plane, plane_range),
                (&self.cube, cube_range),
                (&self.sphere, sphere_range),
            ] {
                if range.is_empty() {
                    continue;
                }
                self.draw_mesh(&mut pass, gpu_mesh, range);
            }

            if debug_ray.is_some() {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_vertex_buffer(0, self.line_vertex_buffer.slice(..));
                pass.draw(0..2, 0..1);
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("hud_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            pass.set_pipeline(&self.hud_pipeline);
            pass.set_bind_group(0, &self.hud_uniform_bind_group, &[]);
            pass.set_bind_group(1, &self.hud_texture_bind_group, &[]);
            pass.set_vertex_buffer(0, self.hud_vertex_buffer.slice(..));
            pass.set_index_buffer(self.hud_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..self.hud_index_count, 0, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn draw_mesh(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        gpu_mesh: &GpuMesh,
        instances: Range<u32>,
    ) {
        pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(gpu_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..gpu_mesh.index_count, 0, instances);
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
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
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_data_matches_vertex_layout_stride() {
        // Five vec4 attributes per instance.
        assert_eq!(std::mem::size_of::<InstanceData>(), 5 * 16);
    }

    #[test]
    fn instance_data_keeps_matrix_columns() {
        let model = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let instance = InstanceData::new(model, Vec4::ONE);
        assert_eq!(instance.model_3, [1.0, 2.0, 3.0, 1.0]);
    }
}
