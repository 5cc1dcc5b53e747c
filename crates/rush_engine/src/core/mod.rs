//! Core engine configuration shared by the engine loop and the renderer

pub mod config;
