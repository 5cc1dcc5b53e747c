//! ECS World management

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};

use slotmap::SlotMap;

use super::components::TransformComponent;
use super::{Component, EcsError, Entity};
use crate::foundation::math::Mat4;

type ComponentMap = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

struct EntityRecord {
    name: String,
    parent: Option<Entity>,
    transform: TransformComponent,
    components: ComponentMap,
    marked_for_removal: bool,
}

/// The ECS world containing all entities and components
///
/// Iteration always follows entity creation order, so anything extracted from
/// the world each frame (render and light commands in particular) comes out in
/// the same order for an unmodified scene.
#[derive(Default)]
pub struct World {
    records: SlotMap<Entity, EntityRecord>,
    order: Vec<Entity>,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity with an identity transform
    pub fn create_entity(&mut self, name: impl Into<String>) -> Entity {
        let name = name.into();
        log::trace!("Creating entity '{}'", name);
        let entity = self.records.insert(EntityRecord {
            name,
            parent: None,
            transform: TransformComponent::identity(),
            components: ComponentMap::new(),
            marked_for_removal: false,
        });
        self.order.push(entity);
        entity
    }

    /// Whether the entity is alive in this world
    pub fn contains(&self, entity: Entity) -> bool {
        self.records.contains_key(entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the world has no entities
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All live entities in creation order
    pub fn entities(&self) -> &[Entity] {
        &self.order
    }

    /// Debug name given at creation
    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.records.get(entity).map(|record| record.name.as_str())
    }

    /// First entity with the given name
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.order
            .iter()
            .copied()
            .find(|&entity| self.name(entity) == Some(name))
    }

    /// Parent of an entity, if any
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.records.get(entity).and_then(|record| record.parent)
    }

    /// Attach `child` under `parent`, or detach it with `None`
    pub fn set_parent(&mut self, child: Entity, parent: Option<Entity>) -> Result<(), EcsError> {
        if !self.contains(child) {
            return Err(EcsError::NoSuchEntity(child));
        }
        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(EcsError::NoSuchEntity(parent));
            }
            let mut cursor = Some(parent);
            while let Some(current) = cursor {
                if current == child {
                    return Err(EcsError::ParentCycle { child, parent });
                }
                cursor = self.parent(current);
            }
        }
        if let Some(record) = self.records.get_mut(child) {
            record.parent = parent;
        }
        Ok(())
    }

    /// The entity's own transform
    pub fn transform(&self, entity: Entity) -> Option<&TransformComponent> {
        self.records.get(entity).map(|record| &record.transform)
    }

    /// Mutable access to the entity's own transform
    pub fn transform_mut(&mut self, entity: Entity) -> Option<&mut TransformComponent> {
        self.records.get_mut(entity).map(|record| &mut record.transform)
    }

    /// Matrix taking the entity's local space to world space
    ///
    /// Composes `parent_world * local` up the hierarchy. Recomputed on every call.
    pub fn local_to_world_matrix(&self, entity: Entity) -> Option<Mat4> {
        let record = self.records.get(entity)?;
        let mut matrix = record.transform.to_matrix();
        let mut cursor = record.parent;
        while let Some(parent) = cursor {
            let parent_record = self.records.get(parent)?;
            matrix = parent_record.transform.to_matrix() * matrix;
            cursor = parent_record.parent;
        }
        Some(matrix)
    }

    /// Attach a component, replacing and returning any previous one of the same type
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<Option<T>, EcsError> {
        let record = self
            .records
            .get_mut(entity)
            .ok_or(EcsError::NoSuchEntity(entity))?;
        let previous = record
            .components
            .insert(TypeId::of::<T>(), Box::new(component))
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed);
        Ok(previous)
    }

    /// Get a component of the given type
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.records
            .get(entity)?
            .components
            .get(&TypeId::of::<T>())?
            .downcast_ref::<T>()
    }

    /// Get a mutable component of the given type
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.records
            .get_mut(entity)?
            .components
            .get_mut(&TypeId::of::<T>())?
            .downcast_mut::<T>()
    }

    /// Whether the entity carries a component of the given type
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.records
            .get(entity)
            .is_some_and(|record| record.components.contains_key(&TypeId::of::<T>()))
    }

    /// Detach and return a component
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.records
            .get_mut(entity)?
            .components
            .remove(&TypeId::of::<T>())?
            .downcast::<T>()
            .ok()
            .map(|boxed| *boxed)
    }

    /// Iterate over every entity carrying `T`, in creation order
    pub fn query<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.order
            .iter()
            .filter_map(move |&entity| self.get_component::<T>(entity).map(|component| (entity, component)))
    }

    /// Flag an entity for deletion at the next [`World::delete_marked_entities`]
    pub fn mark_for_removal(&mut self, entity: Entity) {
        if let Some(record) = self.records.get_mut(entity) {
            record.marked_for_removal = true;
        }
    }

    /// Delete every marked entity together with all of its descendants
    ///
    /// Returns the number of entities removed.
    pub fn delete_marked_entities(&mut self) -> usize {
        let mut doomed: HashSet<Entity> = HashSet::new();
        for &entity in &self.order {
            let mut cursor = Some(entity);
            while let Some(record) = cursor.and_then(|current| self.records.get(current)) {
                if record.marked_for_removal {
                    doomed.insert(entity);
                    break;
                }
                cursor = record.parent;
            }
        }

        if doomed.is_empty() {
            return 0;
        }

        self.order.retain(|entity| !doomed.contains(entity));
        for &entity in &doomed {
            self.records.remove(entity);
        }
        log::debug!("Deleted {} entities", doomed.len());
        doomed.len()
    }

    /// Remove every entity
    pub fn clear(&mut self) {
        self.records.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, Vec3};
    use approx::assert_relative_eq;

    #[derive(Debug, PartialEq)]
    struct Health(u32);
    impl Component for Health {}

    #[derive(Debug, PartialEq)]
    struct Tag;
    impl Component for Tag {}

    #[test]
    fn test_entities_keep_creation_order() {
        let mut world = World::new();
        let a = world.create_entity("a");
        let b = world.create_entity("b");
        let c = world.create_entity("c");

        assert_eq!(world.entities(), &[a, b, c]);
        assert_eq!(world.find_by_name("b"), Some(b));
    }

    #[test]
    fn test_one_component_per_type() {
        let mut world = World::new();
        let entity = world.create_entity("hero");

        assert_eq!(world.add_component(entity, Health(10)).unwrap(), None);
        assert_eq!(world.add_component(entity, Health(5)).unwrap(), Some(Health(10)));
        world.add_component(entity, Tag).unwrap();

        assert_eq!(world.get_component::<Health>(entity), Some(&Health(5)));
        assert!(world.has_component::<Tag>(entity));

        world.get_component_mut::<Health>(entity).unwrap().0 = 1;
        assert_eq!(world.remove_component::<Health>(entity), Some(Health(1)));
        assert!(!world.has_component::<Health>(entity));
    }

    #[test]
    fn test_query_filters_and_orders() {
        let mut world = World::new();
        let a = world.create_entity("a");
        let _b = world.create_entity("b");
        let c = world.create_entity("c");
        world.add_component(c, Health(3)).unwrap();
        world.add_component(a, Health(1)).unwrap();

        let found: Vec<Entity> = world.query::<Health>().map(|(entity, _)| entity).collect();
        assert_eq!(found, vec![a, c]);
    }

    #[test]
    fn test_world_matrix_composes_parent_first() {
        let mut world = World::new();
        let parent = world.create_entity("parent");
        let child = world.create_entity("child");
        world.set_parent(child, Some(parent)).unwrap();

        world.transform_mut(parent).unwrap().position = Vec3::new(10.0, 0.0, 0.0);
        world.transform_mut(parent).unwrap().scale = Vec3::new(2.0, 2.0, 2.0);
        world.transform_mut(child).unwrap().position = Vec3::new(1.0, 0.0, 0.0);

        let matrix = world.local_to_world_matrix(child).unwrap();
        assert_relative_eq!(matrix.transform_point4(&Vec3::zeros()), Vec3::new(12.0, 0.0, 0.0));
    }

    #[test]
    fn test_parent_cycles_rejected() {
        let mut world = World::new();
        let a = world.create_entity("a");
        let b = world.create_entity("b");
        world.set_parent(b, Some(a)).unwrap();

        assert_eq!(world.set_parent(a, Some(b)), Err(EcsError::ParentCycle { child: a, parent: b }));
        assert!(world.set_parent(a, Some(a)).is_err());
        assert!(world.set_parent(b, None).is_ok());
        assert!(world.set_parent(a, Some(b)).is_ok());
    }

    #[test]
    fn test_delete_marked_removes_descendants() {
        let mut world = World::new();
        let root = world.create_entity("root");
        let child = world.create_entity("child");
        let other = world.create_entity("other");
        world.set_parent(child, Some(root)).unwrap();

        world.mark_for_removal(root);
        assert_eq!(world.delete_marked_entities(), 2);

        assert_eq!(world.entities(), &[other]);
        assert!(!world.contains(child));
        assert!(world.local_to_world_matrix(child).is_none());
    }
}
