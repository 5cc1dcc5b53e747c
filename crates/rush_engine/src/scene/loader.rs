//! Scene population

use std::path::Path;

use super::{ComponentDescription, EntityDescription, SceneDescription, SceneError};
use crate::assets::AssetCache;
use crate::ecs::components::MeshRendererComponent;
use crate::ecs::{Entity, World};
use crate::render::api::GraphicsBackend;

/// Builds world entities from scene descriptions
pub struct SceneLoader;

impl SceneLoader {
    /// Read a scene file, load its assets and create its entities
    ///
    /// Relative shader paths in the document resolve against the directory of
    /// the scene file. Returns the root entities in document order.
    pub fn load(
        path: impl AsRef<Path>,
        world: &mut World,
        assets: &mut AssetCache,
        gpu: &mut dyn GraphicsBackend,
    ) -> Result<Vec<Entity>, SceneError> {
        let path = path.as_ref();
        let scene = SceneDescription::load(path)?;
        let asset_root = path.parent().unwrap_or_else(|| Path::new("."));

        assets.load_descriptions(&scene.assets, asset_root, gpu)?;
        let roots = Self::populate(world, assets, &scene.world)?;

        log::info!("Loaded scene {} ({} entities)", path.display(), scene.entity_count());
        Ok(roots)
    }

    /// Create entities depth-first, parenting children to their describing parent
    ///
    /// Mesh and material names must already be in `assets`.
    pub fn populate(
        world: &mut World,
        assets: &AssetCache,
        descriptions: &[EntityDescription],
    ) -> Result<Vec<Entity>, SceneError> {
        descriptions
            .iter()
            .map(|description| Self::spawn(world, assets, description, None))
            .collect()
    }

    fn spawn(
        world: &mut World,
        assets: &AssetCache,
        description: &EntityDescription,
        parent: Option<Entity>,
    ) -> Result<Entity, SceneError> {
        let entity = world.create_entity(description.name.clone());
        if let Some(transform) = world.transform_mut(entity) {
            *transform = description.transform();
        }
        world.set_parent(entity, parent)?;

        for component in &description.components {
            Self::attach(world, assets, entity, &description.name, component)?;
        }
        log::debug!(
            "Spawned '{}' with {} components",
            description.name,
            description.components.len()
        );

        for child in &description.children {
            Self::spawn(world, assets, child, Some(entity))?;
        }
        Ok(entity)
    }

    fn attach(
        world: &mut World,
        assets: &AssetCache,
        entity: Entity,
        name: &str,
        component: &ComponentDescription,
    ) -> Result<(), SceneError> {
        match component {
            ComponentDescription::Camera { .. } => {
                if let Some(camera) = component.camera() {
                    world.add_component(entity, camera)?;
                }
            }
            ComponentDescription::MeshRenderer { mesh, material } => {
                let unknown = |kind, asset: &str| SceneError::UnknownAsset {
                    entity: name.to_string(),
                    kind,
                    name: asset.to_string(),
                };
                let mesh = assets.mesh_handle(mesh).ok_or_else(|| unknown("mesh", mesh.as_str()))?;
                let material = assets
                    .material_handle(material)
                    .ok_or_else(|| unknown("material", material.as_str()))?;
                world.add_component(entity, MeshRendererComponent::new(mesh, material))?;
            }
            ComponentDescription::Light { .. } => {
                if let Some(light) = component.light() {
                    world.add_component(entity, light)?;
                }
            }
            ComponentDescription::Movement { .. } => {
                if let Some(movement) = component.movement() {
                    world.add_component(entity, movement)?;
                }
            }
            ComponentDescription::Collider { .. } => {
                if let Some(collider) = component.collider() {
                    world.add_component(entity, collider)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_str, ConfigFormat};
    use crate::ecs::components::{CameraComponent, ColliderComponent, LightComponent};
    use crate::foundation::math::Vec3;
    use crate::render::backends::HeadlessBackend;
    use approx::assert_relative_eq;

    const SCENE: &str = r#"(
        assets: (
            shaders: { "flat": (vertex: inline("v"), fragment: inline("f")) },
            meshes: { "cube": cube },
            materials: { "stone": (shader: "flat") },
        ),
        world: [
            (name: "camera", position: (0.0, 1.0, 5.0), components: [camera()]),
            (
                name: "rig",
                position: (0.0, 0.0, -10.0),
                children: [
                    (
                        name: "block",
                        position: (2.0, 0.0, 0.0),
                        components: [mesh_renderer(mesh: "cube", material: "stone"), collider(radius: 1.0)],
                    ),
                    (name: "sun", components: [light()]),
                ],
            ),
        ],
    )"#;

    fn load(source: &str) -> (World, Result<Vec<Entity>, SceneError>) {
        let scene: SceneDescription = parse_str(source, ConfigFormat::Ron).unwrap();
        let mut gpu = HeadlessBackend::new();
        let mut assets = AssetCache::new();
        assets.load_descriptions(&scene.assets, Path::new("."), &mut gpu).unwrap();

        let mut world = World::new();
        let roots = SceneLoader::populate(&mut world, &assets, &scene.world);
        (world, roots)
    }

    #[test]
    fn test_populate_depth_first() {
        let (world, roots) = load(SCENE);
        let roots = roots.unwrap();

        assert_eq!(roots.len(), 2);
        let names: Vec<&str> = world.entities().iter().filter_map(|&e| world.name(e)).collect();
        assert_eq!(names, vec!["camera", "rig", "block", "sun"]);

        let block = world.find_by_name("block").unwrap();
        assert_eq!(world.parent(block), Some(roots[1]));
        assert!(world.has_component::<MeshRendererComponent>(block));
        assert_eq!(world.get_component::<ColliderComponent>(block), Some(&ColliderComponent::obstacle(1.0)));
        assert!(world.has_component::<LightComponent>(world.find_by_name("sun").unwrap()));
        assert!(world.has_component::<CameraComponent>(roots[0]));

        let center = world.local_to_world_matrix(block).unwrap().column(3).xyz();
        assert_relative_eq!(center, Vec3::new(2.0, 0.0, -10.0));
    }

    #[test]
    fn test_unknown_mesh_is_reported() {
        let source = r#"(
            world: [(name: "ghost", components: [mesh_renderer(mesh: "nothing", material: "none")])],
        )"#;
        let (_, roots) = load(source);

        assert!(matches!(
            roots,
            Err(SceneError::UnknownAsset { kind: "mesh", ref entity, .. }) if entity == "ghost"
        ));
    }

    #[test]
    fn test_load_reads_file_and_assets() {
        let dir = std::env::temp_dir().join(format!("rush_scene_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scene.ron");
        std::fs::write(&path, SCENE).unwrap();

        let mut gpu = HeadlessBackend::new();
        let mut assets = AssetCache::new();
        let mut world = World::new();
        let roots = SceneLoader::load(&path, &mut world, &mut assets, &mut gpu).unwrap();

        assert_eq!(roots.len(), 2);
        assert_eq!(world.len(), 4);
        assert!(assets.material_handle("stone").is_some());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
