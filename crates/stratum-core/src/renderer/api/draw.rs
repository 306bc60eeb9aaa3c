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

//! Per-draw parameters: everything a draw call sets that is neither part of the
//! pipeline state nor a bound resource.

use crate::math::LinearRgba;
use crate::renderer::api::pipeline::PrimitiveTopology;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The maximum number of viewports or scissor rectangles bound at once.
pub const MAX_VIEWPORTS: usize = 16;

/// A viewport rectangle with its depth range.
#[derive(
    Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Viewport {
    /// The left edge, in pixels.
    pub x: f32,
    /// The top edge, in pixels.
    pub y: f32,
    /// The width, in pixels.
    pub width: f32,
    /// The height, in pixels.
    pub height: f32,
    /// The minimum depth, usually `0.0`.
    pub min_depth: f32,
    /// The maximum depth, usually `1.0`.
    pub max_depth: f32,
}

impl Viewport {
    /// A viewport covering `width` x `height` pixels with the full depth range.
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// A scissor rectangle, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScissorRect {
    /// The left edge.
    pub x: i32,
    /// The top edge.
    pub y: i32,
    /// The width.
    pub width: u32,
    /// The height.
    pub height: u32,
}

/// The per-draw parameters of a draw call.
///
/// Scalars are compared by value against the previous draw call. The viewport
/// and scissor lists are compared by identity only: supply a new list to change
/// them and keep sharing the same list while they stay the same.
#[derive(Debug, Clone)]
pub struct DrawCallParameters {
    /// How the vertices are assembled into primitives.
    pub topology: PrimitiveTopology,
    /// The constant color used by [`BlendFactor::Constant`].
    ///
    /// [`BlendFactor::Constant`]: crate::renderer::api::pipeline::BlendFactor::Constant
    pub blend_factor: LinearRgba,
    /// The multisample coverage mask.
    pub blend_sample_mask: u32,
    /// The reference value for the stencil test.
    pub stencil_reference: u32,
    /// The bound viewports.
    pub viewports: Arc<[Viewport]>,
    /// The bound scissor rectangles.
    pub scissor_rects: Arc<[ScissorRect]>,
}

impl Default for DrawCallParameters {
    fn default() -> Self {
        Self {
            topology: PrimitiveTopology::TriangleList,
            blend_factor: LinearRgba::WHITE,
            blend_sample_mask: u32::MAX,
            stencil_reference: 0,
            viewports: Vec::new().into(),
            scissor_rects: Vec::new().into(),
        }
    }
}

impl DrawCallParameters {
    /// Parameters with a single viewport and otherwise default values.
    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            viewports: Arc::from(vec![viewport]),
            ..Self::default()
        }
    }
}

/// The kind of draw command to issue, with its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawKind {
    /// A non-indexed draw.
    Draw {
        /// The number of vertices to draw.
        vertex_count: u32,
        /// The first vertex to read.
        start_vertex: u32,
    },
    /// An indexed draw. Requires a bound index buffer.
    DrawIndexed {
        /// The number of indices to draw.
        index_count: u32,
        /// The first index to read.
        start_index: u32,
        /// A value added to each index before reading a vertex.
        base_vertex: i32,
    },
    /// A non-indexed, instanced draw.
    DrawInstanced {
        /// The number of vertices per instance.
        vertex_count_per_instance: u32,
        /// The number of instances to draw.
        instance_count: u32,
        /// The first vertex to read.
        start_vertex: u32,
        /// The first instance to draw.
        start_instance: u32,
    },
    /// An indexed, instanced draw. Requires a bound index buffer.
    DrawIndexedInstanced {
        /// The number of indices per instance.
        index_count_per_instance: u32,
        /// The number of instances to draw.
        instance_count: u32,
        /// The first index to read.
        start_index: u32,
        /// A value added to each index before reading a vertex.
        base_vertex: i32,
        /// The first instance to draw.
        start_instance: u32,
    },
}

impl DrawKind {
    /// Returns `true` if this draw reads from the index buffer.
    pub fn is_indexed(&self) -> bool {
        matches!(
            self,
            DrawKind::DrawIndexed { .. } | DrawKind::DrawIndexedInstanced { .. }
        )
    }
}
