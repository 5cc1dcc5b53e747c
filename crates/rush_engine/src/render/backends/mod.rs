//! Graphics backend implementations

pub mod headless;

pub use headless::{ContextState, Framebuffer, GpuCommand, HeadlessBackend};
