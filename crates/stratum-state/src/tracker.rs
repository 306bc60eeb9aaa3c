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

//! Tracking of the per-draw parameters between consecutive draw calls.

use std::sync::Arc;
use stratum_core::renderer::api::DrawCallParameters;
use stratum_core::stratum_bitflags;

stratum_bitflags! {
    /// The per-draw parameters that differ from the previous draw call.
    pub struct PerDrawChanges: u8 {
        /// The primitive topology.
        const TOPOLOGY = 1 << 0;
        /// The blend factor color.
        const BLEND_FACTOR = 1 << 1;
        /// The multisample coverage mask.
        const SAMPLE_MASK = 1 << 2;
        /// The stencil reference value.
        const STENCIL_REFERENCE = 1 << 3;
        /// The viewport list.
        const VIEWPORTS = 1 << 4;
        /// The scissor rectangle list.
        const SCISSOR_RECTS = 1 << 5;
    }
}

/// Computes which per-draw parameters changed since `previous`.
///
/// Scalars compare by value. Viewport and scissor lists compare by identity.
pub fn diff_draw_parameters(
    previous: Option<&DrawCallParameters>,
    next: &DrawCallParameters,
) -> PerDrawChanges {
    let Some(previous) = previous else {
        return PerDrawChanges::ALL;
    };

    let mut changes = PerDrawChanges::EMPTY;
    changes.set(PerDrawChanges::TOPOLOGY, previous.topology != next.topology);
    changes.set(
        PerDrawChanges::BLEND_FACTOR,
        !previous.blend_factor.bits_eq(&next.blend_factor),
    );
    changes.set(
        PerDrawChanges::SAMPLE_MASK,
        previous.blend_sample_mask != next.blend_sample_mask,
    );
    changes.set(
        PerDrawChanges::STENCIL_REFERENCE,
        previous.stencil_reference != next.stencil_reference,
    );
    changes.set(
        PerDrawChanges::VIEWPORTS,
        !Arc::ptr_eq(&previous.viewports, &next.viewports),
    );
    changes.set(
        PerDrawChanges::SCISSOR_RECTS,
        !Arc::ptr_eq(&previous.scissor_rects, &next.scissor_rects),
    );
    changes
}

/// Holds the per-draw parameters last applied to a device context.
#[derive(Debug, Default)]
pub struct DrawStateTracker {
    baseline: Option<DrawCallParameters>,
}

impl DrawStateTracker {
    /// Creates a tracker with no baseline: the next diff reports every parameter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the changes between the baseline and `next`.
    pub fn diff(&self, next: &DrawCallParameters) -> PerDrawChanges {
        diff_draw_parameters(self.baseline.as_ref(), next)
    }

    /// Makes `applied` the new baseline. Scalars are copied and the viewport and
    /// scissor lists are shared.
    pub fn commit(&mut self, applied: &DrawCallParameters) {
        self.baseline = Some(applied.clone());
    }

    /// Drops the baseline.
    pub fn reset(&mut self) {
        self.baseline = None;
    }

    /// The parameters last committed, if any.
    pub fn baseline(&self) -> Option<&DrawCallParameters> {
        self.baseline.as_ref()
    }
}
