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

//! Component-wise comparison of pipeline state descriptors.
//!
//! The cache does not only look for a descriptor identical to the requested one:
//! it also looks for entries sharing any single sub-state, so the native object
//! behind that sub-state can be reused.

use stratum_core::renderer::api::pipeline::PipelineStateDescriptor;
use stratum_core::stratum_bitflags;

stratum_bitflags! {
    /// The components two pipeline state descriptors have in common.
    pub struct SubStateMatch: u8 {
        /// Same vertex program.
        const VERTEX_PROGRAM = 1 << 0;
        /// Same pixel program (or both without one).
        const PIXEL_PROGRAM = 1 << 1;
        /// Same rasterizer configuration.
        const RASTER = 1 << 2;
        /// Same depth/stencil configuration.
        const DEPTH_STENCIL = 1 << 3;
        /// Same blend targets, independent-blend flag and alpha-to-coverage flag.
        const BLEND = 1 << 4;
    }
}

impl SubStateMatch {
    /// Returns `true` if every component matches.
    pub fn is_full(&self) -> bool {
        self.is_all()
    }
}

/// Compares two descriptors component by component.
pub fn match_components(
    cached: &PipelineStateDescriptor,
    requested: &PipelineStateDescriptor,
) -> SubStateMatch {
    let mut matched = SubStateMatch::EMPTY;
    matched.set(
        SubStateMatch::VERTEX_PROGRAM,
        cached.vertex_program == requested.vertex_program,
    );
    matched.set(
        SubStateMatch::PIXEL_PROGRAM,
        cached.pixel_program == requested.pixel_program,
    );
    matched.set(SubStateMatch::RASTER, cached.raster == requested.raster);
    matched.set(
        SubStateMatch::DEPTH_STENCIL,
        cached.depth_stencil == requested.depth_stencil,
    );
    matched.set(SubStateMatch::BLEND, cached.blend == requested.blend);
    matched
}
