//! Fixed-function pipeline state

pub mod pipeline_state;

pub use pipeline_state::{
    BlendEquation, BlendFactor, Blending, ColorMask, CompareFunction, CullMode, DepthTesting, FaceCulling,
    FrontFace, PipelineState,
};
