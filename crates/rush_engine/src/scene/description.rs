//! Serializable scene documents
//!
//! Angles in a scene document are degrees. Everything is converted to the
//! radians the components hold when the description is turned into
//! components.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::SceneError;
use crate::assets::AssetDescriptions;
use crate::config;
use crate::ecs::components::{
    Attenuation, CameraComponent, CameraType, ColliderComponent, ColliderRole, ConeAngles, LightComponent,
    LightType, MovementComponent, TransformComponent,
};
use crate::foundation::math::{utils, Vec3};

/// A complete scene: assets first, then the entity tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    /// Everything the entities reference by name
    pub assets: AssetDescriptions,
    /// Root entities, in creation order
    pub world: Vec<EntityDescription>,
}

impl SceneDescription {
    /// Read a `.ron` or `.toml` scene document
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        Ok(config::read_file(path)?)
    }

    /// Number of entities in the tree, children included
    pub fn entity_count(&self) -> usize {
        self.world.iter().map(EntityDescription::subtree_len).sum()
    }
}

/// One entity and its children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDescription {
    /// Entity name
    pub name: String,
    /// Local position
    pub position: [f32; 3],
    /// Local rotation in degrees (pitch, yaw, roll)
    pub rotation: [f32; 3],
    /// Local scale
    pub scale: [f32; 3],
    /// Components besides the transform
    pub components: Vec<ComponentDescription>,
    /// Entities parented to this one
    pub children: Vec<EntityDescription>,
}

impl Default for EntityDescription {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
            components: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl EntityDescription {
    /// Local transform with the rotation converted to radians
    pub fn transform(&self) -> TransformComponent {
        TransformComponent::new(
            Vec3::from(self.position),
            utils::deg_to_rad_vec3(Vec3::from(self.rotation)),
            Vec3::from(self.scale),
        )
    }

    fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }
}

/// Component attached to a described entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentDescription {
    /// [`CameraComponent`]
    Camera {
        /// Projection model
        #[serde(default)]
        camera_type: CameraType,
        /// Vertical field of view in degrees
        #[serde(default = "default_fov_y")]
        fov_y: f32,
        /// Vertical extent of an orthographic view
        #[serde(default = "default_ortho_height")]
        ortho_height: f32,
        /// Near plane distance
        #[serde(default = "default_near")]
        near: f32,
        /// Far plane distance
        #[serde(default = "default_far")]
        far: f32,
    },

    /// Mesh renderer, resolved by asset name
    MeshRenderer {
        /// Mesh name in the asset cache
        mesh: String,
        /// Material name in the asset cache
        material: String,
    },

    /// [`LightComponent`]
    Light {
        /// Light model
        #[serde(default)]
        light_type: LightType,
        /// Linear RGB color
        #[serde(default = "default_light_color")]
        color: [f32; 3],
        /// World-space position override, zero to follow the entity
        #[serde(default)]
        position: [f32; 3],
        /// World-space direction override, zero to follow the entity
        #[serde(default)]
        direction: [f32; 3],
        /// Distance attenuation
        #[serde(default)]
        attenuation: Attenuation,
        /// Spot cone, in degrees
        #[serde(default = "default_cone_degrees")]
        cone_angles: ConeAngles,
    },

    /// [`MovementComponent`]
    Movement {
        /// Units per second
        #[serde(default)]
        linear_velocity: [f32; 3],
        /// Degrees per second
        #[serde(default)]
        angular_velocity: [f32; 3],
    },

    /// [`ColliderComponent`]
    Collider {
        /// Sphere radius
        radius: f32,
        /// Role in the collision rules
        #[serde(default)]
        role: ColliderRole,
    },
}

fn default_fov_y() -> f32 {
    90.0
}

fn default_ortho_height() -> f32 {
    1.0
}

fn default_near() -> f32 {
    0.01
}

fn default_far() -> f32 {
    100.0
}

fn default_light_color() -> [f32; 3] {
    [1.0; 3]
}

fn default_cone_degrees() -> ConeAngles {
    ConeAngles { inner: 45.0, outer: 90.0 }
}

impl ComponentDescription {
    /// Camera component, if this describes one
    pub fn camera(&self) -> Option<CameraComponent> {
        match *self {
            Self::Camera { camera_type, fov_y, ortho_height, near, far } => Some(CameraComponent {
                camera_type,
                near,
                far,
                fov_y: utils::deg_to_rad(fov_y),
                ortho_height,
            }),
            _ => None,
        }
    }

    /// Light component, if this describes one
    pub fn light(&self) -> Option<LightComponent> {
        match *self {
            Self::Light { light_type, color, position, direction, attenuation, cone_angles } => Some(LightComponent {
                light_type,
                color: Vec3::from(color),
                attenuation,
                cone_angles: ConeAngles {
                    inner: utils::deg_to_rad(cone_angles.inner),
                    outer: utils::deg_to_rad(cone_angles.outer),
                },
                position: Vec3::from(position),
                direction: Vec3::from(direction),
            }),
            _ => None,
        }
    }

    /// Movement component, if this describes one
    pub fn movement(&self) -> Option<MovementComponent> {
        match *self {
            Self::Movement { linear_velocity, angular_velocity } => Some(MovementComponent::new(
                Vec3::from(linear_velocity),
                utils::deg_to_rad_vec3(Vec3::from(angular_velocity)),
            )),
            _ => None,
        }
    }

    /// Collider component, if this describes one
    pub fn collider(&self) -> Option<ColliderComponent> {
        match *self {
            Self::Collider { radius, role } => Some(ColliderComponent { radius, role }),
            _ => None,
        }
    }
}
