//! Physics primitives

pub mod collision;
