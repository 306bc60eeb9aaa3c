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

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use stratum_core::renderer::api::*;
use stratum_core::renderer::error::ResourceError;
use stratum_core::renderer::traits::StateObjectFactory;

#[derive(Debug, Default)]
struct KindLedger {
    created: usize,
    released: usize,
    live: HashSet<usize>,
}

/// A state object factory that hands out unique counters as native handles.
///
/// Tracks every live object per kind, rejects double releases, and can be told
/// to fail the next creation of a given kind.
#[derive(Debug, Default)]
pub struct RecordingStateFactory {
    next_handle: AtomicUsize,
    ledgers: Mutex<HashMap<StateObjectKind, KindLedger>>,
    pending_failures: Mutex<Vec<StateObjectKind>>,
}

impl RecordingStateFactory {
    /// Creates a factory with no live objects.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next creation of `kind` fail with [`ResourceError::CreationFailed`].
    pub fn fail_next_creation(&self, kind: StateObjectKind) {
        self.pending_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(kind);
    }

    /// The number of objects of `kind` created so far.
    pub fn created(&self, kind: StateObjectKind) -> usize {
        self.ledgers().get(&kind).map_or(0, |l| l.created)
    }

    /// The number of objects of `kind` released so far.
    pub fn released(&self, kind: StateObjectKind) -> usize {
        self.ledgers().get(&kind).map_or(0, |l| l.released)
    }

    /// The number of objects of `kind` currently alive.
    pub fn live(&self, kind: StateObjectKind) -> usize {
        self.ledgers().get(&kind).map_or(0, |l| l.live.len())
    }

    fn ledgers(&self) -> MutexGuard<'_, HashMap<StateObjectKind, KindLedger>> {
        self.ledgers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn create(&self, kind: StateObjectKind) -> Result<usize, ResourceError> {
        {
            let mut pending = self
                .pending_failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(pos) = pending.iter().position(|k| *k == kind) {
                pending.remove(pos);
                log::debug!("Failing {kind} state creation on request");
                return Err(ResourceError::CreationFailed {
                    kind,
                    details: "injected failure".to_string(),
                });
            }
        }

        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        let mut ledgers = self.ledgers();
        let ledger = ledgers.entry(kind).or_default();
        ledger.created += 1;
        ledger.live.insert(handle);
        Ok(handle)
    }

    fn release(&self, kind: StateObjectKind, handle: usize) -> Result<(), ResourceError> {
        let mut ledgers = self.ledgers();
        let ledger = ledgers.entry(kind).or_default();
        if ledger.live.remove(&handle) {
            ledger.released += 1;
            Ok(())
        } else {
            Err(ResourceError::InvalidHandle { kind, handle })
        }
    }
}

impl StateObjectFactory for RecordingStateFactory {
    fn create_raster_state(
        &self,
        _descriptor: &RasterStateDescriptor,
    ) -> Result<RasterStateHandle, ResourceError> {
        self.create(StateObjectKind::Raster).map(RasterStateHandle)
    }

    fn create_depth_stencil_state(
        &self,
        _descriptor: &DepthStencilStateDescriptor,
    ) -> Result<DepthStencilStateHandle, ResourceError> {
        self.create(StateObjectKind::DepthStencil)
            .map(DepthStencilStateHandle)
    }

    fn create_blend_state(
        &self,
        descriptor: &BlendStateDescriptor,
    ) -> Result<BlendStateHandle, ResourceError> {
        if descriptor.targets.len() > MAX_RENDER_TARGETS {
            return Err(ResourceError::CreationFailed {
                kind: StateObjectKind::Blend,
                details: format!("{} render targets", descriptor.targets.len()),
            });
        }
        self.create(StateObjectKind::Blend).map(BlendStateHandle)
    }

    fn create_sampler_state(
        &self,
        _descriptor: &SamplerStateDescriptor,
    ) -> Result<SamplerStateHandle, ResourceError> {
        self.create(StateObjectKind::Sampler).map(SamplerStateHandle)
    }

    fn release_raster_state(&self, handle: RasterStateHandle) -> Result<(), ResourceError> {
        self.release(StateObjectKind::Raster, handle.0)
    }

    fn release_depth_stencil_state(
        &self,
        handle: DepthStencilStateHandle,
    ) -> Result<(), ResourceError> {
        self.release(StateObjectKind::DepthStencil, handle.0)
    }

    fn release_blend_state(&self, handle: BlendStateHandle) -> Result<(), ResourceError> {
        self.release(StateObjectKind::Blend, handle.0)
    }

    fn release_sampler_state(&self, handle: SamplerStateHandle) -> Result<(), ResourceError> {
        self.release(StateObjectKind::Sampler, handle.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_across_kinds() {
        let factory = RecordingStateFactory::new();
        let raster = factory
            .create_raster_state(&RasterStateDescriptor::default())
            .unwrap();
        let blend = factory
            .create_blend_state(&BlendStateDescriptor::default())
            .unwrap();
        assert_ne!(raster.0, blend.0);
        assert_eq!(factory.created(StateObjectKind::Raster), 1);
        assert_eq!(factory.live(StateObjectKind::Blend), 1);
    }

    #[test]
    fn double_release_is_rejected() {
        let factory = RecordingStateFactory::new();
        let handle = factory
            .create_sampler_state(&SamplerStateDescriptor::default())
            .unwrap();
        assert!(factory.release_sampler_state(handle).is_ok());
        let err = factory.release_sampler_state(handle).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::InvalidHandle {
                kind: StateObjectKind::Sampler,
                ..
            }
        ));
        assert_eq!(factory.released(StateObjectKind::Sampler), 1);
    }

    #[test]
    fn injected_failure_fires_once() {
        let factory = RecordingStateFactory::new();
        factory.fail_next_creation(StateObjectKind::DepthStencil);
        let desc = DepthStencilStateDescriptor::default();
        assert!(factory.create_depth_stencil_state(&desc).is_err());
        assert!(factory.create_depth_stencil_state(&desc).is_ok());
        assert_eq!(factory.created(StateObjectKind::DepthStencil), 1);
    }
}
