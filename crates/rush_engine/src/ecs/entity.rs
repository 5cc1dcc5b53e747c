//! Entity identifiers

slotmap::new_key_type! {
    /// Generational entity id
    ///
    /// Ids of deleted entities are never reused for live ones, so a stale id
    /// simply fails lookups.
    pub struct Entity;
}
