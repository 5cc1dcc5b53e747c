//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and matrix construction
//! - Handle-based collections
//! - Logging setup

pub mod math;
pub mod collections;
pub mod logging;
