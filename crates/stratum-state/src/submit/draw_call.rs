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

use crate::cache::CachedPipelineState;
use std::sync::Arc;
use stratum_core::renderer::api::{DrawCallParameters, DrawKind, ResourceBindingSet};

/// One request to render primitives.
///
/// The pipeline state and the binding set are shared: reusing the same `Arc`s
/// across draw calls is what lets the engine skip them entirely.
#[derive(Debug, Clone)]
pub struct DrawCall {
    /// The realized pipeline state.
    pub pipeline_state: Arc<CachedPipelineState>,
    /// The resources to bind.
    pub bindings: Arc<ResourceBindingSet>,
    /// The per-draw parameters.
    pub parameters: DrawCallParameters,
    /// The draw command and its arguments.
    pub kind: DrawKind,
}

impl DrawCall {
    /// Creates a draw call with default per-draw parameters.
    pub fn new(
        pipeline_state: Arc<CachedPipelineState>,
        bindings: Arc<ResourceBindingSet>,
        kind: DrawKind,
    ) -> Self {
        Self {
            pipeline_state,
            bindings,
            parameters: DrawCallParameters::default(),
            kind,
        }
    }

    /// Returns a copy with the given per-draw parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: DrawCallParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Returns a copy issuing a different draw command with the same state.
    #[must_use]
    pub fn with_kind(mut self, kind: DrawKind) -> Self {
        self.kind = kind;
        self
    }
}
