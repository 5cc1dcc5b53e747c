//! Light packing for the single-pass multi-light shading contract
//!
//! Lights are packed once per frame into [`LightUniform`]s and then written to
//! every draw's program as an indexed array:
//!
//! ```text
//! lights[i].type                   int (0 directional, 1 point, 2 spot)
//! lights[i].color                  vec3
//! lights[i].position               vec3 (world space)
//! lights[i].direction              vec3 (world space, normalized)
//! lights[i].attenuation_constant   float
//! lights[i].attenuation_linear     float
//! lights[i].attenuation_quadratic  float
//! lights[i].inner_angle            float (radians)
//! lights[i].outer_angle            float (radians)
//! light_count                      int
//! ```

use crate::ecs::components::{Attenuation, ConeAngles, LightType};
use crate::foundation::math::{Mat4Ext, Vec3};
use crate::render::api::GraphicsBackend;
use crate::render::primitives::ShaderProgram;
use crate::render::render_queue::LightCommand;

/// World-space light data as the shaders see it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightUniform {
    /// Light type
    pub light_type: LightType,
    /// Color
    pub color: Vec3,
    /// World-space position
    pub position: Vec3,
    /// Normalized world-space direction
    pub direction: Vec3,
    /// Attenuation terms
    pub attenuation: Attenuation,
    /// Cone angles
    pub cone_angles: ConeAngles,
}

impl LightUniform {
    /// Resolve a light command to world space
    ///
    /// A non-zero `position` or `direction` on the component wins over the
    /// entity transform. Otherwise the position is the entity's world origin and
    /// the direction its world -Z axis.
    pub fn from_command(command: &LightCommand) -> Self {
        let light = &command.light;

        let position = if light.position == Vec3::zeros() {
            command.local_to_world.transform_point4(&Vec3::zeros())
        } else {
            light.position
        };

        let direction = if light.direction == Vec3::zeros() {
            command.local_to_world.transform_direction4(&Vec3::new(0.0, 0.0, -1.0))
        } else {
            light.direction
        };
        let direction = direction.try_normalize(f32::EPSILON).unwrap_or_else(|| {
            log::warn!("Light on {:?} has a degenerate direction, using -Z", command.entity);
            Vec3::new(0.0, 0.0, -1.0)
        });

        Self {
            light_type: light.light_type,
            color: light.color,
            position,
            direction,
            attenuation: light.attenuation,
            cone_angles: light.cone_angles,
        }
    }
}

/// Write every light and `light_count` to the bound program
pub fn upload_lights(program: &ShaderProgram, gpu: &mut dyn GraphicsBackend, lights: &[LightUniform]) {
    for (index, light) in lights.iter().enumerate() {
        let prefix = format!("lights[{}]", index);
        program.set(gpu, &format!("{}.type", prefix), light.light_type.as_uniform());
        program.set(gpu, &format!("{}.color", prefix), light.color);
        program.set(gpu, &format!("{}.position", prefix), light.position);
        program.set(gpu, &format!("{}.direction", prefix), light.direction);
        program.set(gpu, &format!("{}.attenuation_constant", prefix), light.attenuation.constant);
        program.set(gpu, &format!("{}.attenuation_linear", prefix), light.attenuation.linear);
        program.set(gpu, &format!("{}.attenuation_quadratic", prefix), light.attenuation.quadratic);
        program.set(gpu, &format!("{}.inner_angle", prefix), light.cone_angles.inner);
        program.set(gpu, &format!("{}.outer_angle", prefix), light.cone_angles.outer);
    }
    program.set(gpu, "light_count", i32::try_from(lights.len()).unwrap_or(i32::MAX));
}
