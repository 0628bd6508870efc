//! Forward renderer.
//!
//! One pass, one pipeline: every visible mesh is drawn with Lambert shading
//! under the scene's ambient and directional lights.

pub mod context;
pub mod gpu_mesh;
pub mod pipeline;
pub mod settings;

use glam::{Mat4, Vec3};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use rustc_hash::FxHashMap;

use crate::errors::Result;
use crate::scene::{LightKind, MeshKey, Scene};

use self::context::WgpuContext;
use self::gpu_mesh::GpuMesh;
use self::pipeline::{ForwardPipeline, FrameUniforms, ObjectUniforms};
use self::settings::RendererSettings;

struct RenderState {
    ctx: WgpuContext,
    pipeline: ForwardPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    meshes: FxHashMap<MeshKey, GpuMesh>,
}

/// Renderer in two phases: configuration at construction, GPU state after
/// [`init`](Self::init) once a window exists.
pub struct Renderer {
    settings: RendererSettings,
    state: Option<RenderState>,
}

impl Renderer {
    #[must_use]
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings, state: None }
    }

    pub async fn init<W>(&mut self, window: W, width: u32, height: u32) -> Result<()>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        let ctx = WgpuContext::new(window, &self.settings, width, height).await?;
        let pipeline = ForwardPipeline::new(&ctx.device, ctx.color_format(), ctx.depth_format);

        let frame_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &pipeline.frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        self.state = Some(RenderState {
            ctx,
            pipeline,
            frame_buffer,
            frame_bind_group,
            meshes: FxHashMap::default(),
        });
        log::info!("Renderer initialized ({width}x{height})");
        Ok(())
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(state) = &mut self.state {
            state.ctx.resize(width, height);
        }
    }

    /// Draws `scene` from its active camera. World matrices must be current.
    pub fn render(&mut self, scene: &Scene) {
        let Some(state) = &mut self.state else {
            return;
        };
        let Some(camera) = scene.main_camera() else {
            return;
        };

        let output = match state.ctx.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = state.ctx.size();
                state.ctx.resize(w, h);
                return;
            }
            Err(e) => {
                log::error!("Render error: {e:?}");
                return;
            }
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        state.ctx.queue.write_buffer(
            &state.frame_buffer,
            0,
            bytemuck::bytes_of(&frame_uniforms(scene, camera.view_projection_matrix())),
        );

        let device = &state.ctx.device;
        let queue = &state.ctx.queue;
        let mut draws = Vec::new();
        for (node, key, mesh) in scene.iter_visible_meshes() {
            if mesh.geometry.indices.is_empty() {
                continue;
            }
            let gpu_mesh = state
                .meshes
                .entry(key)
                .or_insert_with(|| GpuMesh::new(device, &state.pipeline.object_layout, &mesh.geometry, &mesh.name));
            gpu_mesh.write_uniforms(
                queue,
                &ObjectUniforms::new(Mat4::from(*node.world_matrix()), mesh.material.base_color),
            );
            draws.push(key);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });
        {
            let bg = scene.background;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Forward Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(bg.x),
                            g: f64::from(bg.y),
                            b: f64::from(bg.z),
                            a: f64::from(bg.w),
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &state.ctx.depth_texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&state.pipeline.pipeline);
            pass.set_bind_group(0, &state.frame_bind_group, &[]);
            for key in draws {
                let Some(gpu_mesh) = state.meshes.get(&key) else {
                    continue;
                };
                pass.set_bind_group(1, &gpu_mesh.bind_group, &[]);
                pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(gpu_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..gpu_mesh.index_count, 0, 0..1);
            }
        }

        queue.submit(Some(encoder.finish()));
        output.present();
    }
}

/// Sums ambient lights and picks the first directional light.
fn frame_uniforms(scene: &Scene, view_projection: Mat4) -> FrameUniforms {
    let mut ambient = Vec3::ZERO;
    let mut light_direction = Vec3::Y;
    let mut light_color = Vec3::ZERO;
    let mut has_directional = false;

    for (light, world) in scene.iter_active_lights() {
        match light.kind {
            LightKind::Ambient => ambient += light.radiance(),
            LightKind::Directional if !has_directional => {
                let position: Vec3 = world.translation.into();
                light_direction = position.try_normalize().unwrap_or(Vec3::Y);
                light_color = light.radiance();
                has_directional = true;
            }
            LightKind::Directional => {}
        }
    }

    FrameUniforms {
        view_projection,
        ambient: ambient.extend(0.0),
        light_direction: light_direction.extend(0.0),
        light_color: light_color.extend(0.0),
    }
}

