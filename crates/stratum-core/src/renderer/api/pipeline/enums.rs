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

//! Enums for pipeline state configuration.

/// Defines how vertices are connected to form a geometric primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Vertices are rendered as a list of isolated points.
    PointList,
    /// Vertices are rendered as a list of isolated lines (every two vertices form a line).
    LineList,
    /// Vertices are rendered as a connected line strip.
    LineStrip,
    /// Vertices are rendered as a list of isolated triangles (every three vertices form a triangle).
    #[default]
    TriangleList,
    /// Vertices are rendered as a connected triangle strip.
    TriangleStrip,
}

/// Defines which face of a triangle to cull (not render).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// No culling is performed.
    None,
    /// Cull front-facing triangles.
    Front,
    /// Cull back-facing triangles.
    #[default]
    Back,
}

/// Defines which vertex winding order considers a triangle to be "front-facing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrontFace {
    /// Counter-clockwise winding order is the front face.
    Ccw,
    /// Clockwise winding order is the front face.
    #[default]
    Cw,
}

/// Defines how polygons are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolygonMode {
    /// Polygons are filled. This is the normal rendering mode.
    #[default]
    Fill,
    /// Polygons are rendered as outlines (wireframe).
    Line,
}

/// The comparison function used for depth, stencil and sampler comparison tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareFunction {
    /// The test never passes.
    Never,
    /// The test passes if the new value is less than the existing value.
    Less,
    /// The test passes if the new value is equal to the existing value.
    Equal,
    /// The test passes if the new value is less than or equal to the existing value.
    LessEqual,
    /// The test passes if the new value is greater than the existing value.
    Greater,
    /// The test passes if the new value is not equal to the existing value.
    NotEqual,
    /// The test passes if the new value is greater than or equal to the existing value.
    GreaterEqual,
    /// The test always passes.
    #[default]
    Always,
}

/// An operation to perform on a stencil buffer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StencilOperation {
    /// Keep the existing stencil value.
    #[default]
    Keep,
    /// Set the stencil value to 0.
    Zero,
    /// Replace the stencil value with the reference value.
    Replace,
    /// Bitwise invert the stencil value.
    Invert,
    /// Increment the stencil value, clamping at the maximum value.
    IncrementClamp,
    /// Decrement the stencil value, clamping at 0.
    DecrementClamp,
    /// Increment the stencil value, wrapping to 0 on overflow.
    IncrementWrap,
    /// Decrement the stencil value, wrapping to the maximum value on underflow.
    DecrementWrap,
}

/// A factor in a blend equation, determining how much a source or destination color contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// The factor is `0.0`.
    Zero,
    /// The factor is `1.0`.
    One,
    /// The factor is the source color (`src.rgb`).
    SrcColor,
    /// The factor is `1.0 - src.rgb`.
    OneMinusSrcColor,
    /// The factor is the source alpha component (`src.a`).
    SrcAlpha,
    /// The factor is `1.0 - src.a`.
    OneMinusSrcAlpha,
    /// The factor is the destination color (`dst.rgb`).
    DstColor,
    /// The factor is `1.0 - dst.rgb`.
    OneMinusDstColor,
    /// The factor is the destination alpha component (`dst.a`).
    DstAlpha,
    /// The factor is `1.0 - dst.a`.
    OneMinusDstAlpha,
    /// The factor is `min(src.a, 1.0 - dst.a)`.
    SrcAlphaSaturated,
    /// The factor is the per-draw blend factor.
    Constant,
    /// The factor is `1.0 - blend_factor`.
    OneMinusConstant,
}

/// The operation used to combine source and destination colors in a blend equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendOperation {
    /// The result is `source + destination`.
    #[default]
    Add,
    /// The result is `source - destination`.
    Subtract,
    /// The result is `destination - source`.
    ReverseSubtract,
    /// The result is `min(source, destination)`.
    Min,
    /// The result is `max(source, destination)`.
    Max,
}
