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

//! The complete pipeline state descriptor.

use super::state::{BlendStateDescriptor, DepthStencilStateDescriptor, RasterStateDescriptor};
use crate::renderer::api::handles::ShaderProgramId;

/// A complete description of a pipeline state: the shader programs plus the
/// raster, depth/stencil and blend configuration.
///
/// Descriptors are cheap to clone; the blend target sequence is shared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PipelineStateDescriptor {
    /// The vertex-stage program. A pipeline state cannot be realized without one.
    pub vertex_program: Option<ShaderProgramId>,
    /// The pixel-stage program, or `None` for depth-only rendering.
    pub pixel_program: Option<ShaderProgramId>,
    /// The rasterizer configuration.
    pub raster: RasterStateDescriptor,
    /// The depth/stencil configuration.
    pub depth_stencil: DepthStencilStateDescriptor,
    /// The blend configuration.
    pub blend: BlendStateDescriptor,
}

impl PipelineStateDescriptor {
    /// Creates a descriptor with default sub-states for the given programs.
    pub fn new(vertex_program: ShaderProgramId, pixel_program: Option<ShaderProgramId>) -> Self {
        Self {
            vertex_program: Some(vertex_program),
            pixel_program,
            ..Self::default()
        }
    }

    /// Returns a copy with the given raster configuration.
    #[must_use]
    pub fn with_raster(mut self, raster: RasterStateDescriptor) -> Self {
        self.raster = raster;
        self
    }

    /// Returns a copy with the given depth/stencil configuration.
    #[must_use]
    pub fn with_depth_stencil(mut self, depth_stencil: DepthStencilStateDescriptor) -> Self {
        self.depth_stencil = depth_stencil;
        self
    }

    /// Returns a copy with the given blend configuration.
    #[must_use]
    pub fn with_blend(mut self, blend: BlendStateDescriptor) -> Self {
        self.blend = blend;
        self
    }
}
