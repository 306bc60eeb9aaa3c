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

//! # Stratum State
//!
//! The pipeline-state cache and the per-draw state-diffing submission engine.
//!
//! A [`PipelineStateCache`] turns descriptors into realized, deduplicated
//! [`CachedPipelineState`]s, reusing native raster, depth/stencil and blend
//! objects across entries wherever their descriptors match. A [`DrawContext`]
//! owns one device context and, for every [`DrawCall`], applies only the
//! state that differs from what the previous draw call left on the device.

#![warn(missing_docs)]

pub mod binding;
pub mod cache;
pub mod equality;
pub mod error;
pub mod submit;
pub mod tracker;

pub use binding::{diff_bindings, ChangeMask};
pub use cache::{CachedPipelineState, CachedSamplerState, PipelineStateCache, SamplerStateCache};
pub use error::{StateError, StateResult};
pub use submit::{diff_pipeline_states, DrawCall, DrawContext, PipelineChanges};
pub use tracker::{diff_draw_parameters, DrawStateTracker, PerDrawChanges};
