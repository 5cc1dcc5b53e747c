//! Entity Component System
//!
//! A small ECS: entities live in a [`World`] in creation order, each owns one
//! [`TransformComponent`](components::TransformComponent) and at most one
//! component of any other type. Entities can be parented; world matrices are
//! composed from the parent chain on demand.

pub mod entity;
pub mod component;
pub mod world;
pub mod system;
pub mod components;
pub mod systems;

pub use entity::Entity;
pub use component::Component;
pub use world::World;
pub use system::System;

/// Errors raised by world mutations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity is not alive in this world
    #[error("Entity {0:?} does not exist")]
    NoSuchEntity(Entity),

    /// Parenting would create a cycle in the hierarchy
    #[error("Parenting {child:?} under {parent:?} would create a cycle")]
    ParentCycle {
        /// Entity being parented
        child: Entity,
        /// Requested parent
        parent: Entity,
    },
}
