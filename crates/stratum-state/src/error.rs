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

//! Error types for the cache and the submission engine.

use stratum_core::renderer::{ResourceError, SamplerStateHandle};
use thiserror::Error;

/// A specialized `Result` for state management operations.
pub type StateResult<T> = Result<T, StateError>;

/// An error raised by a state cache or a draw context.
///
/// Every variant is raised before the cache or the device is modified.
#[derive(Debug, Error)]
pub enum StateError {
    /// The caller supplied a malformed descriptor or draw call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend failed to build a native state object.
    #[error("failed to construct state object: {0}")]
    Construction(#[from] ResourceError),

    /// A cached pipeline state was submitted after its cache was cleared.
    #[error(
        "pipeline state #{index} belongs to cache generation {state_generation}, \
         the cache is at generation {cache_generation}"
    )]
    StalePipelineState {
        /// The index the state was created with.
        index: usize,
        /// The generation the state was created under.
        state_generation: u64,
        /// The current cache generation.
        cache_generation: u64,
    },

    /// A binding set refers to a sampler the sampler cache no longer holds.
    #[error("sampler state {handle:?} is not held by the sampler cache at generation {cache_generation}")]
    StaleSamplerState {
        /// The rejected sampler object.
        handle: SamplerStateHandle,
        /// The current sampler cache generation.
        cache_generation: u64,
    },

    /// A cached pipeline state was submitted to a context backed by another cache.
    #[error("pipeline state #{index} was created by a different pipeline state cache")]
    ForeignPipelineState {
        /// The index the state was created with.
        index: usize,
    },

    /// The draw call uses a binding group the engine cannot apply.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

impl StateError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        StateError::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use stratum_core::renderer::StateObjectKind;

    #[test]
    fn construction_error_keeps_source() {
        let err: StateError = ResourceError::CreationFailed {
            kind: StateObjectKind::Raster,
            details: "device removed".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "failed to construct state object: Failed to create raster state object: device removed"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn stale_state_display() {
        let err = StateError::StalePipelineState {
            index: 3,
            state_generation: 1,
            cache_generation: 2,
        };
        assert_eq!(
            err.to_string(),
            "pipeline state #3 belongs to cache generation 1, the cache is at generation 2"
        );
    }

    #[test]
    fn stale_sampler_display() {
        let err = StateError::StaleSamplerState {
            handle: SamplerStateHandle(4),
            cache_generation: 2,
        };
        assert_eq!(
            err.to_string(),
            "sampler state SamplerStateHandle(4) is not held by the sampler cache at generation 2"
        );
    }
}
