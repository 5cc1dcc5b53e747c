//! Component trait definitions

/// Marker trait for data that can be attached to an entity
pub trait Component: 'static + Send + Sync {}
