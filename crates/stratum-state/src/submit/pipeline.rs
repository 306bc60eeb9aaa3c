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

//! Pipeline state diffs between consecutive draw calls.

use crate::cache::CachedPipelineState;
use stratum_core::stratum_bitflags;

stratum_bitflags! {
    /// The pipeline components that must be rebound on the device.
    pub struct PipelineChanges: u8 {
        /// The vertex-stage program.
        const VERTEX_PROGRAM = 1 << 0;
        /// The pixel-stage program.
        const PIXEL_PROGRAM = 1 << 1;
        /// The rasterizer state object.
        const RASTER = 1 << 2;
        /// The depth/stencil state object.
        const DEPTH_STENCIL = 1 << 3;
        /// The blend state object.
        const BLEND = 1 << 4;
    }
}

/// Computes which pipeline components differ between `previous` and `next`.
///
/// Components compare by their realized objects, so two entries sharing a
/// native object never rebind it. Two references to the same entry report no
/// change without looking at the components.
pub fn diff_pipeline_states(
    previous: Option<&CachedPipelineState>,
    next: &CachedPipelineState,
) -> PipelineChanges {
    let previous = match previous {
        None => return PipelineChanges::ALL,
        Some(previous) if std::ptr::eq(previous, next) => return PipelineChanges::EMPTY,
        Some(previous) => previous,
    };

    let mut changes = PipelineChanges::EMPTY;
    changes.set(
        PipelineChanges::VERTEX_PROGRAM,
        previous.vertex_program() != next.vertex_program(),
    );
    changes.set(
        PipelineChanges::PIXEL_PROGRAM,
        previous.pixel_program() != next.pixel_program(),
    );
    changes.set(
        PipelineChanges::RASTER,
        previous.raster_state() != next.raster_state(),
    );
    changes.set(
        PipelineChanges::DEPTH_STENCIL,
        previous.depth_stencil_state() != next.depth_stencil_state(),
    );
    changes.set(
        PipelineChanges::BLEND,
        previous.blend_state() != next.blend_state(),
    );
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::PipelineStateCache;
    use std::sync::Arc;
    use stratum_core::renderer::api::*;
    use stratum_infra::recording::RecordingStateFactory;

    #[test]
    fn only_differing_components_are_reported() {
        let cache = PipelineStateCache::new(Arc::new(RecordingStateFactory::new()));
        let base = PipelineStateDescriptor::new(ShaderProgramId(1), Some(ShaderProgramId(2)));
        let a = cache.get_or_create(&base).unwrap();
        let b = cache
            .get_or_create(&base.clone().with_raster(RasterStateDescriptor::wireframe()))
            .unwrap();

        assert_eq!(diff_pipeline_states(None, &a), PipelineChanges::ALL);
        assert!(diff_pipeline_states(Some(&a), &a).is_empty());
        assert_eq!(diff_pipeline_states(Some(&a), &b), PipelineChanges::RASTER);
    }

    #[test]
    fn program_changes_are_reported() {
        let cache = PipelineStateCache::new(Arc::new(RecordingStateFactory::new()));
        let a = cache
            .get_or_create(&PipelineStateDescriptor::new(ShaderProgramId(1), None))
            .unwrap();
        let b = cache
            .get_or_create(&PipelineStateDescriptor::new(
                ShaderProgramId(3),
                Some(ShaderProgramId(4)),
            ))
            .unwrap();
        assert_eq!(
            diff_pipeline_states(Some(&a), &b),
            PipelineChanges::VERTEX_PROGRAM | PipelineChanges::PIXEL_PROGRAM
        );
    }
}
