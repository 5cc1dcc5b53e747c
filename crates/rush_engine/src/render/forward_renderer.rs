//! # Forward Renderer
//!
//! Single-pass forward renderer. Each call to [`ForwardRenderer::render`]
//! rebuilds the frame from scratch:
//!
//! 1. Extract render and light commands from the world and pick the first camera.
//!    Without a camera the frame is skipped and nothing reaches the GPU.
//!    Otherwise every command's mesh and material must still be in the cache.
//! 2. Sort transparent commands along the camera forward axis.
//! 3. Compute `VP = projection * view`.
//! 4. Set the viewport.
//! 5. Clear color to opaque black and depth to 1.0, with both write masks enabled first.
//! 6. Draw every opaque command, then every transparent one.
//! 7. Per draw: material setup, per-draw uniforms, all lights, mesh draw.
//!
//! Every draw receives:
//!
//! | Uniform                        | Value                                       |
//! |--------------------------------|---------------------------------------------|
//! | `object_to_world`              | command world matrix `M`                    |
//! | `view_projection`              | `VP`                                        |
//! | `camera_position`              | camera world origin                         |
//! | `object_to_world_inv_transpose`| `inverse(M)`, uploaded with transpose set   |
//! | `lights[i].*`, `light_count`   | see [`crate::render::systems::lighting`]    |

use crate::assets::AssetCache;
use crate::core::config::RendererConfig;
use crate::ecs::components::{CameraComponent, LightComponent, MeshRendererComponent};
use crate::ecs::World;
use crate::foundation::math::{IVec2, Mat4, Mat4Ext, Vec3, Vec4};
use crate::render::api::{ClearFlags, GraphicsBackend};
use crate::render::pipeline::ColorMask;
use crate::render::render_queue::{LightCommand, RenderCommand, RenderQueue};
use crate::render::resources::Material;
use crate::render::systems::lighting::{upload_lights, LightUniform};
use crate::render::{RenderError, RenderResult};

/// Counters describing the last rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// The frame was skipped for lack of a camera
    pub skipped: bool,
    /// Opaque draws submitted
    pub opaque_draws: usize,
    /// Transparent draws submitted
    pub transparent_draws: usize,
    /// Lights written per draw
    pub lights: usize,
}

/// Uniforms shared by every draw of a frame
struct FrameUniforms {
    view_projection: Mat4,
    camera_position: Vec3,
}

/// Single-pass multi-light forward renderer
///
/// Owns scratch buffers (the render queue and the packed light array) that are
/// cleared at the start of every frame and reused. They make the renderer
/// unsuitable for concurrent or reentrant calls; `render` takes `&mut self` so
/// the borrow checker enforces that.
#[derive(Debug, Default)]
pub struct ForwardRenderer {
    config: RendererConfig,
    queue: RenderQueue,
    light_uniforms: Vec<LightUniform>,
    stats: FrameStats,
}

impl ForwardRenderer {
    /// Create a renderer
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Renderer settings
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Commands extracted by the last frame
    pub fn queue(&self) -> &RenderQueue {
        &self.queue
    }

    /// Counters of the last frame
    pub fn last_frame(&self) -> &FrameStats {
        &self.stats
    }

    /// Render the world into the viewport rectangle
    ///
    /// Returns `Ok(())` without touching the backend when the world has no
    /// camera. A mesh renderer whose mesh or material (or anything the material
    /// references) is no longer in the cache fails the frame with
    /// [`RenderError::MissingAsset`] before any backend call is made.
    pub fn render(
        &mut self,
        world: &World,
        assets: &AssetCache,
        gpu: &mut dyn GraphicsBackend,
        viewport_origin: IVec2,
        viewport_size: IVec2,
    ) -> RenderResult<()> {
        self.stats = FrameStats::default();

        let Some((camera, camera_to_world)) = self.extract(world, assets) else {
            log::trace!("No camera in world, skipping frame");
            self.stats.skipped = true;
            return Ok(());
        };
        self.validate(assets)?;

        let forward = camera_to_world.transform_direction4(&Vec3::new(0.0, 0.0, -1.0));
        self.queue.sort_transparent(&forward, self.config.transparent_sort);

        let view = camera.view_matrix(&camera_to_world);
        let projection = camera.projection_matrix(viewport_size);
        let frame = FrameUniforms {
            view_projection: projection * view,
            camera_position: camera_to_world.transform_point4(&Vec3::zeros()),
        };

        self.pack_lights();

        gpu.set_viewport(viewport_origin, viewport_size);
        gpu.set_clear_color(Vec4::new(0.0, 0.0, 0.0, 1.0));
        gpu.set_clear_depth(1.0);
        // A clear only reaches buffers whose writes are enabled
        gpu.set_color_mask(ColorMask::all());
        gpu.set_depth_mask(true);
        gpu.clear(ClearFlags::COLOR | ClearFlags::DEPTH);

        for command in self.queue.opaque() {
            submit(command, assets, gpu, &frame, &self.light_uniforms)?;
        }
        for command in self.queue.transparent() {
            submit(command, assets, gpu, &frame, &self.light_uniforms)?;
        }

        self.stats.opaque_draws = self.queue.opaque().len();
        self.stats.transparent_draws = self.queue.transparent().len();
        self.stats.lights = self.light_uniforms.len();
        log::trace!("Frame rendered: {:?}", self.stats);
        Ok(())
    }

    /// Walk the world once, filling the queue and returning the first camera
    ///
    /// Commands whose material cannot be resolved are queued as opaque and
    /// reported by [`ForwardRenderer::validate`].
    fn extract(&mut self, world: &World, assets: &AssetCache) -> Option<(CameraComponent, Mat4)> {
        self.queue.clear();
        let mut camera = None;

        for &entity in world.entities() {
            let Some(local_to_world) = world.local_to_world_matrix(entity) else {
                continue;
            };

            if camera.is_none() {
                if let Some(component) = world.get_component::<CameraComponent>(entity) {
                    camera = Some((*component, local_to_world));
                }
            }

            if let Some(renderer) = world.get_component::<MeshRendererComponent>(entity) {
                let transparent = assets
                    .material(renderer.material)
                    .is_some_and(Material::is_transparent);
                let command = RenderCommand {
                    entity,
                    local_to_world,
                    center: local_to_world.transform_point4(&Vec3::zeros()),
                    mesh: renderer.mesh,
                    material: renderer.material,
                };
                self.queue.push(command, transparent);
            }

            if let Some(light) = world.get_component::<LightComponent>(entity) {
                self.queue.push_light(LightCommand {
                    entity,
                    local_to_world,
                    light: *light,
                });
            }
        }

        camera
    }

    /// Check every queued command against the cache before any backend call
    fn validate(&self, assets: &AssetCache) -> RenderResult<()> {
        for command in self.queue.opaque().iter().chain(self.queue.transparent()) {
            assets
                .mesh(command.mesh)
                .ok_or(RenderError::MissingAsset { kind: "mesh" })?;
            assets
                .material(command.material)
                .ok_or(RenderError::MissingAsset { kind: "material" })?
                .validate(assets)?;
        }
        Ok(())
    }

    fn pack_lights(&mut self) {
        self.light_uniforms.clear();
        let lights = self.queue.lights();
        let limit = self.config.max_lights.unwrap_or(usize::MAX);
        if lights.len() > limit {
            log::warn!("{} lights in scene, only the first {} are shaded", lights.len(), limit);
        }
        self.light_uniforms
            .extend(lights.iter().take(limit).map(LightUniform::from_command));
    }
}

fn submit(
    command: &RenderCommand,
    assets: &AssetCache,
    gpu: &mut dyn GraphicsBackend,
    frame: &FrameUniforms,
    lights: &[LightUniform],
) -> RenderResult<()> {
    let material = assets
        .material(command.material)
        .ok_or(RenderError::MissingAsset { kind: "material" })?;
    let mesh = assets
        .mesh(command.mesh)
        .ok_or(RenderError::MissingAsset { kind: "mesh" })?;

    let program = material.setup(assets, gpu)?;

    program.set(gpu, "object_to_world", command.local_to_world);
    program.set(gpu, "view_projection", frame.view_projection);
    program.set(gpu, "camera_position", frame.camera_position);

    let world_to_object = command.local_to_world.try_inverse().unwrap_or_else(|| {
        log::warn!("Singular world matrix on {:?}, normals use identity", command.entity);
        Mat4::identity()
    });
    program.set_transposed(gpu, "object_to_world_inv_transpose", world_to_object);

    upload_lights(&program, gpu, lights);

    mesh.draw(gpu);
    Ok(())
}
