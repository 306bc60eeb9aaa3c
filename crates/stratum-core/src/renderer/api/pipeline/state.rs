// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Sub-state descriptors for the pipeline: raster, depth/stencil and blend.
//!
//! Equality on every descriptor is structural and exact. Floating-point fields
//! compare by bit pattern, so two descriptors are equal only if a backend would
//! build an identical native object from them.

use super::enums::*;
use crate::stratum_bitflags;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// The maximum number of simultaneously bound render targets, and therefore of
/// per-target blend descriptors.
pub const MAX_RENDER_TARGETS: usize = 8;

/// Describes depth biasing, used to prevent z-fighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthBiasState {
    /// A constant value added to the depth of each fragment.
    pub constant: i32,
    /// A factor that scales with the fragment's depth slope.
    pub slope_scale: f32,
    /// The maximum bias that can be applied.
    pub clamp: f32,
}

impl PartialEq for DepthBiasState {
    fn eq(&self, other: &Self) -> bool {
        self.constant == other.constant
            && self.slope_scale.to_bits() == other.slope_scale.to_bits()
            && self.clamp.to_bits() == other.clamp.to_bits()
    }
}

impl Eq for DepthBiasState {}

impl Hash for DepthBiasState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.constant.hash(state);
        self.slope_scale.to_bits().hash(state);
        self.clamp.to_bits().hash(state);
    }
}

/// Describes the rasterizer stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterStateDescriptor {
    /// The face culling mode.
    pub cull_mode: CullMode,
    /// The rasterization mode for polygons.
    pub polygon_mode: PolygonMode,
    /// The vertex winding order that determines the "front" face of a triangle.
    pub front_face: FrontFace,
    /// The depth bias applied to rasterized fragments.
    pub depth_bias: DepthBiasState,
    /// If `true`, fragments outside the near/far planes are clipped.
    pub depth_clip_enabled: bool,
    /// If `true`, fragments outside the bound scissor rectangles are discarded.
    pub scissor_test_enabled: bool,
    /// If `true`, multisample anti-aliasing is used on multisampled targets.
    pub multisample_enabled: bool,
    /// If `true`, lines are drawn with anti-aliasing.
    pub antialiased_lines_enabled: bool,
}

impl Default for RasterStateDescriptor {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::Back,
            polygon_mode: PolygonMode::Fill,
            front_face: FrontFace::Cw,
            depth_bias: DepthBiasState::default(),
            depth_clip_enabled: true,
            scissor_test_enabled: false,
            multisample_enabled: false,
            antialiased_lines_enabled: false,
        }
    }
}

impl RasterStateDescriptor {
    /// A raster state with culling disabled.
    pub fn no_culling() -> Self {
        Self {
            cull_mode: CullMode::None,
            ..Self::default()
        }
    }

    /// A raster state that draws polygon outlines.
    pub fn wireframe() -> Self {
        Self {
            polygon_mode: PolygonMode::Line,
            cull_mode: CullMode::None,
            ..Self::default()
        }
    }
}

/// Describes the stencil test and operations for a single face of a primitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StencilFaceState {
    /// The comparison function used for the stencil test.
    pub compare: CompareFunction,
    /// The operation to perform if the stencil test fails.
    pub fail_op: StencilOperation,
    /// The operation to perform if the stencil test passes but the depth test fails.
    pub depth_fail_op: StencilOperation,
    /// The operation to perform if both the stencil and depth tests pass.
    pub depth_pass_op: StencilOperation,
}

/// Describes the state for depth and stencil testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilStateDescriptor {
    /// If `true`, the depth test is performed.
    pub depth_test_enabled: bool,
    /// If `true`, depth values will be written to the depth buffer.
    pub depth_write_enabled: bool,
    /// The comparison function used for the depth test.
    pub depth_compare: CompareFunction,
    /// If `true`, the stencil test is performed.
    pub stencil_enabled: bool,
    /// The stencil state for front-facing primitives.
    pub stencil_front: StencilFaceState,
    /// The stencil state for back-facing primitives.
    pub stencil_back: StencilFaceState,
    /// A bitmask for reading from the stencil buffer.
    pub stencil_read_mask: u8,
    /// A bitmask for writing to the stencil buffer.
    pub stencil_write_mask: u8,
}

impl Default for DepthStencilStateDescriptor {
    fn default() -> Self {
        Self {
            depth_test_enabled: false,
            depth_write_enabled: false,
            depth_compare: CompareFunction::Less,
            stencil_enabled: false,
            stencil_front: StencilFaceState::default(),
            stencil_back: StencilFaceState::default(),
            stencil_read_mask: 0xFF,
            stencil_write_mask: 0xFF,
        }
    }
}

impl DepthStencilStateDescriptor {
    /// Depth testing with `Less` and depth writes enabled.
    pub fn depth_read_write() -> Self {
        Self {
            depth_test_enabled: true,
            depth_write_enabled: true,
            ..Self::default()
        }
    }

    /// Depth testing with `LessEqual` and depth writes disabled.
    pub fn depth_read_only() -> Self {
        Self {
            depth_test_enabled: true,
            depth_write_enabled: false,
            depth_compare: CompareFunction::LessEqual,
            ..Self::default()
        }
    }
}

/// Describes a complete blend equation for either the color or the alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendComponentDescriptor {
    /// The blend factor for the source color (from the pixel shader).
    pub src_factor: BlendFactor,
    /// The blend factor for the destination color (already in the target).
    pub dst_factor: BlendFactor,
    /// The operation to combine the source and destination factors.
    pub operation: BlendOperation,
}

impl BlendComponentDescriptor {
    /// `src * 1 + dst * 0`: the source replaces the destination.
    pub const REPLACE: Self = Self {
        src_factor: BlendFactor::One,
        dst_factor: BlendFactor::Zero,
        operation: BlendOperation::Add,
    };
}

impl Default for BlendComponentDescriptor {
    fn default() -> Self {
        Self::REPLACE
    }
}

stratum_bitflags! {
    /// A bitmask to enable or disable writes to individual color channels.
    pub struct ColorWrites: u8 {
        /// Enable writes to the Red channel.
        const R = 0b0001;
        /// Enable writes to the Green channel.
        const G = 0b0010;
        /// Enable writes to the Blue channel.
        const B = 0b0100;
        /// Enable writes to the Alpha channel.
        const A = 0b1000;
    }
}

/// Describes the blend state of a single render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetBlendDescriptor {
    /// If `true`, blending is performed for this target.
    pub blend_enabled: bool,
    /// The blend equation for the RGB color components.
    pub color: BlendComponentDescriptor,
    /// The blend equation for the Alpha component.
    pub alpha: BlendComponentDescriptor,
    /// A bitmask controlling which color channels are written to.
    pub write_mask: ColorWrites,
}

impl Default for RenderTargetBlendDescriptor {
    fn default() -> Self {
        Self::OPAQUE
    }
}

impl RenderTargetBlendDescriptor {
    /// Blending disabled, all channels written.
    pub const OPAQUE: Self = Self {
        blend_enabled: false,
        color: BlendComponentDescriptor::REPLACE,
        alpha: BlendComponentDescriptor::REPLACE,
        write_mask: ColorWrites::ALL,
    };

    /// Classic non-premultiplied alpha blending.
    pub const ALPHA_BLEND: Self = Self {
        blend_enabled: true,
        color: BlendComponentDescriptor {
            src_factor: BlendFactor::SrcAlpha,
            dst_factor: BlendFactor::OneMinusSrcAlpha,
            operation: BlendOperation::Add,
        },
        alpha: BlendComponentDescriptor {
            src_factor: BlendFactor::One,
            dst_factor: BlendFactor::OneMinusSrcAlpha,
            operation: BlendOperation::Add,
        },
        write_mask: ColorWrites::ALL,
    };

    /// Additive blending, `src * src.a + dst`.
    pub const ADDITIVE: Self = Self {
        blend_enabled: true,
        color: BlendComponentDescriptor {
            src_factor: BlendFactor::SrcAlpha,
            dst_factor: BlendFactor::One,
            operation: BlendOperation::Add,
        },
        alpha: BlendComponentDescriptor {
            src_factor: BlendFactor::One,
            dst_factor: BlendFactor::One,
            operation: BlendOperation::Add,
        },
        write_mask: ColorWrites::ALL,
    };
}

/// An immutable, shareable sequence of per-render-target blend descriptors.
///
/// Equality first checks whether both values share the same underlying sequence;
/// only if they do not are the lengths and then the elements compared. A changed
/// sequence must be a new `BlendStates` value, never an in-place edit.
#[derive(Debug, Clone)]
pub struct BlendStates(Arc<[RenderTargetBlendDescriptor]>);

impl BlendStates {
    /// Creates a sequence from the given per-target descriptors.
    pub fn new(targets: impl Into<Arc<[RenderTargetBlendDescriptor]>>) -> Self {
        Self(targets.into())
    }

    /// Creates a sequence describing a single render target.
    pub fn single(target: RenderTargetBlendDescriptor) -> Self {
        Self(Arc::from(vec![target]))
    }

    /// Returns the number of render targets described.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the sequence describes no render target.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the descriptors as a slice.
    pub fn as_slice(&self) -> &[RenderTargetBlendDescriptor] {
        &self.0
    }

    /// Returns `true` if both values share the same underlying sequence.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for BlendStates {
    fn default() -> Self {
        Self::single(RenderTargetBlendDescriptor::OPAQUE)
    }
}

impl PartialEq for BlendStates {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.0.len() == other.0.len() && self.0.iter().zip(other.0.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for BlendStates {}

impl Hash for BlendStates {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl From<Vec<RenderTargetBlendDescriptor>> for BlendStates {
    fn from(targets: Vec<RenderTargetBlendDescriptor>) -> Self {
        Self::new(targets)
    }
}

/// Describes the complete output-merger blend configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BlendStateDescriptor {
    /// The per-render-target blend descriptors.
    pub targets: BlendStates,
    /// If `true`, each target uses its own descriptor; otherwise target 0 applies to all.
    pub independent_blend_enabled: bool,
    /// If `true`, the pixel alpha is used as a coverage mask.
    pub alpha_to_coverage_enabled: bool,
}
