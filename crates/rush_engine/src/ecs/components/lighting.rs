//! Lighting components for ECS

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::foundation::math::Vec3;

/// Light type enumeration
///
/// The discriminant is what shaders receive in `lights[i].type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightType {
    /// Parallel rays along `direction`; ignores attenuation and cone
    #[default]
    Directional = 0,
    /// Omnidirectional light at `position` with distance attenuation
    Point = 1,
    /// Cone shaped light with distance attenuation
    Spot = 2,
}

impl LightType {
    /// Integer code uploaded to shaders
    pub fn as_uniform(self) -> i32 {
        self as i32
    }
}

/// Distance attenuation `1 / (constant + linear * d + quadratic * d^2)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attenuation {
    /// Constant term
    pub constant: f32,
    /// Linear term
    pub linear: f32,
    /// Quadratic term
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

impl Attenuation {
    /// Create attenuation coefficients
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self { constant, linear, quadratic }
    }
}

/// Spot light cone, both angles in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeAngles {
    /// Full intensity inside this angle
    pub inner: f32,
    /// No light beyond this angle
    pub outer: f32,
}

impl Default for ConeAngles {
    fn default() -> Self {
        Self {
            inner: std::f32::consts::FRAC_PI_4,
            outer: std::f32::consts::FRAC_PI_2,
        }
    }
}

/// Light component for ECS entities
///
/// `position` and `direction` are optional world-space overrides: a zero
/// vector means "take it from the entity's world transform".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightComponent {
    /// Type of light
    pub light_type: LightType,

    /// Light color (linear RGB, may exceed 1 for brighter lights)
    pub color: Vec3,

    /// Distance attenuation (point and spot)
    pub attenuation: Attenuation,

    /// Cone angles (spot only)
    pub cone_angles: ConeAngles,

    /// World-space position override, zero to use the entity origin
    pub position: Vec3,

    /// World-space direction override, zero to use the entity's -Z axis
    pub direction: Vec3,
}

impl Component for LightComponent {}

impl Default for LightComponent {
    fn default() -> Self {
        Self {
            light_type: LightType::Directional,
            color: Vec3::new(1.0, 1.0, 1.0),
            attenuation: Attenuation::default(),
            cone_angles: ConeAngles::default(),
            position: Vec3::zeros(),
            direction: Vec3::zeros(),
        }
    }
}

impl LightComponent {
    /// Create a directional light
    pub fn directional(color: Vec3) -> Self {
        Self {
            light_type: LightType::Directional,
            color,
            ..Self::default()
        }
    }

    /// Create a point light
    pub fn point(color: Vec3, attenuation: Attenuation) -> Self {
        Self {
            light_type: LightType::Point,
            color,
            attenuation,
            ..Self::default()
        }
    }

    /// Create a spot light
    pub fn spot(color: Vec3, attenuation: Attenuation, cone_angles: ConeAngles) -> Self {
        Self {
            light_type: LightType::Spot,
            color,
            attenuation,
            cone_angles,
            ..Self::default()
        }
    }

    /// Override the world-space position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Override the world-space direction
    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = direction;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_type_codes() {
        assert_eq!(LightType::Directional.as_uniform(), 0);
        assert_eq!(LightType::Point.as_uniform(), 1);
        assert_eq!(LightType::Spot.as_uniform(), 2);
    }

    #[test]
    fn test_constructors_keep_overrides_empty() {
        let light = LightComponent::spot(
            Vec3::new(1.0, 0.5, 0.0),
            Attenuation::new(1.0, 0.1, 0.01),
            ConeAngles { inner: 0.2, outer: 0.4 },
        );

        assert_eq!(light.light_type, LightType::Spot);
        assert_eq!(light.position, Vec3::zeros());
        assert_eq!(light.direction, Vec3::zeros());
        assert_eq!(light.cone_angles.outer, 0.4);
    }
}
