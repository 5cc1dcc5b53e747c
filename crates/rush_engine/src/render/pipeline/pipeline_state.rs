//! Pipeline state configuration
//!
//! Fixed-function state a material applies before drawing. Defaults match a
//! freshly created context: culling, depth testing and blending disabled, every
//! write mask enabled.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::render::api::GraphicsBackend;

bitflags! {
    /// Color channels that accept writes
    ///
    /// Serialized as a flag list such as `"RED | GREEN"`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorMask: u8 {
        /// Red channel
        const RED = 1 << 0;
        /// Green channel
        const GREEN = 1 << 1;
        /// Blue channel
        const BLUE = 1 << 2;
        /// Alpha channel
        const ALPHA = 1 << 3;
    }
}

impl Serialize for ColorMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for ColorMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

impl Default for ColorMask {
    fn default() -> Self {
        Self::all()
    }
}

/// Face culling modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CullMode {
    /// Cull front faces
    Front,
    /// Cull back faces
    #[default]
    Back,
    /// Cull everything
    FrontAndBack,
}

/// Winding that counts as front facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FrontFace {
    /// Counter-clockwise winding is front facing
    #[default]
    CounterClockwise,
    /// Clockwise winding is front facing
    Clockwise,
}

/// Depth comparison function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompareFunction {
    /// Never passes
    Never,
    /// Passes if incoming < stored
    #[default]
    Less,
    /// Passes if equal
    Equal,
    /// Passes if incoming <= stored
    LessOrEqual,
    /// Passes if incoming > stored
    Greater,
    /// Passes if not equal
    NotEqual,
    /// Passes if incoming >= stored
    GreaterOrEqual,
    /// Always passes
    Always,
}

/// Blend equation combining source and destination terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendEquation {
    /// src + dst
    #[default]
    Add,
    /// src - dst
    Subtract,
    /// dst - src
    ReverseSubtract,
    /// min(src, dst)
    Min,
    /// max(src, dst)
    Max,
}

/// Blend factor applied to a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    ConstantAlpha,
    OneMinusConstantAlpha,
}

/// Face culling state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceCulling {
    /// Enable culling
    pub enabled: bool,
    /// Faces removed when enabled
    pub culled_face: CullMode,
    /// Front face winding
    pub front_face: FrontFace,
}

/// Depth testing state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthTesting {
    /// Enable the depth test
    pub enabled: bool,
    /// Comparison function
    pub function: CompareFunction,
}

/// Blending state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blending {
    /// Enable blending
    pub enabled: bool,
    /// Blend equation
    pub equation: BlendEquation,
    /// Source factor
    pub source_factor: BlendFactor,
    /// Destination factor
    pub destination_factor: BlendFactor,
    /// Constant color for the constant factors
    pub constant_color: [f32; 4],
}

impl Default for Blending {
    fn default() -> Self {
        Self {
            enabled: false,
            equation: BlendEquation::Add,
            source_factor: BlendFactor::SrcAlpha,
            destination_factor: BlendFactor::OneMinusSrcAlpha,
            constant_color: [1.0; 4],
        }
    }
}

/// Complete fixed-function state for a draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineState {
    /// Face culling
    pub face_culling: FaceCulling,
    /// Depth testing
    pub depth_testing: DepthTesting,
    /// Blending
    pub blending: Blending,
    /// Color write mask
    pub color_mask: ColorMask,
    /// Depth write mask
    pub depth_mask: bool,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            face_culling: FaceCulling::default(),
            depth_testing: DepthTesting::default(),
            blending: Blending::default(),
            color_mask: ColorMask::all(),
            depth_mask: true,
        }
    }
}

impl PipelineState {
    /// Back-face culled, depth tested, no blending
    pub fn opaque() -> Self {
        Self {
            face_culling: FaceCulling { enabled: true, ..FaceCulling::default() },
            depth_testing: DepthTesting { enabled: true, function: CompareFunction::LessOrEqual },
            ..Self::default()
        }
    }

    /// Depth tested without depth writes, standard alpha blending
    pub fn alpha_blended() -> Self {
        Self {
            depth_testing: DepthTesting { enabled: true, function: CompareFunction::LessOrEqual },
            blending: Blending { enabled: true, ..Blending::default() },
            depth_mask: false,
            ..Self::default()
        }
    }

    /// Apply this state to the backend
    pub fn setup(&self, gpu: &mut dyn GraphicsBackend) {
        gpu.apply_pipeline_state(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_str, ConfigFormat};

    #[test]
    fn test_defaults_match_fresh_context() {
        let state = PipelineState::default();
        assert!(!state.face_culling.enabled);
        assert!(!state.depth_testing.enabled);
        assert!(!state.blending.enabled);
        assert_eq!(state.color_mask, ColorMask::all());
        assert!(state.depth_mask);
    }

    #[test]
    fn test_partial_description() {
        let state: PipelineState = parse_str(
            "(blending: (enabled: true), depth_mask: false, color_mask: \"RED | GREEN\")",
            ConfigFormat::Ron,
        )
        .unwrap();

        assert!(state.blending.enabled);
        assert_eq!(state.blending.source_factor, BlendFactor::SrcAlpha);
        assert!(!state.depth_mask);
        assert_eq!(state.color_mask, ColorMask::RED | ColorMask::GREEN);
    }

    #[test]
    fn test_color_mask_is_a_plain_flag_list() {
        let text = ron::to_string(&ColorMask::BLUE).unwrap();
        assert_eq!(text, "\"BLUE\"");

        let state: PipelineState = parse_str("(color_mask: \"ALPHA\")", ConfigFormat::Ron).unwrap();
        assert_eq!(state.color_mask, ColorMask::ALPHA);
        let none: PipelineState = parse_str("(color_mask: \"\")", ConfigFormat::Ron).unwrap();
        assert_eq!(none.color_mask, ColorMask::empty());
    }
}
