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

//! The sampler state cache.

use crate::error::{StateError, StateResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use stratum_core::renderer::api::*;
use stratum_core::renderer::traits::StateObjectFactory;

/// A realized sampler state.
#[derive(Debug)]
pub struct CachedSamplerState {
    index: usize,
    generation: u64,
    descriptor: SamplerStateDescriptor,
    handle: SamplerStateHandle,
}

impl CachedSamplerState {
    /// The position of this sampler in its cache.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The cache generation this sampler was created under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The descriptor this sampler was realized from.
    pub fn descriptor(&self) -> &SamplerStateDescriptor {
        &self.descriptor
    }

    /// The native sampler object, ready to go into a binding set.
    pub fn handle(&self) -> SamplerStateHandle {
        self.handle
    }
}

#[derive(Debug)]
struct SamplerCacheInner {
    entries: Vec<Arc<CachedSamplerState>>,
    generation: u64,
}

/// A thread-safe cache of realized sampler states.
///
/// Unless disabled in the settings, the [`PredefinedSampler`]s are registered
/// first, in their declaration order, and again after every clear.
#[derive(Debug)]
pub struct SamplerStateCache {
    factory: Arc<dyn StateObjectFactory>,
    inner: Mutex<SamplerCacheInner>,
    generation: AtomicU64,
    register_defaults: bool,
}

impl SamplerStateCache {
    /// Creates a cache and registers the predefined samplers if the settings ask for it.
    ///
    /// ## Errors
    /// * `StateError::Construction` - If a predefined sampler cannot be created.
    pub fn new(factory: Arc<dyn StateObjectFactory>, settings: &EngineSettings) -> StateResult<Self> {
        let cache = Self {
            factory,
            inner: Mutex::new(SamplerCacheInner {
                entries: Vec::new(),
                generation: 0,
            }),
            generation: AtomicU64::new(0),
            register_defaults: settings.register_default_samplers,
        };
        cache.register_predefined()?;
        Ok(cache)
    }

    fn register_predefined(&self) -> StateResult<()> {
        if self.register_defaults {
            for predefined in PredefinedSampler::ALL {
                self.get_or_create(&predefined.descriptor())?;
            }
        }
        Ok(())
    }

    /// Returns the cached sampler for `descriptor`, creating it on a miss.
    ///
    /// ## Errors
    /// * `StateError::Construction` - If the sampler cannot be created. The cache is
    ///   left unmodified.
    pub fn get_or_create(
        &self,
        descriptor: &SamplerStateDescriptor,
    ) -> StateResult<Arc<CachedSamplerState>> {
        loop {
            let generation = {
                let inner = self.lock();
                if let Some(found) = find(&inner.entries, descriptor) {
                    return Ok(found);
                }
                inner.generation
            };

            let handle = self.factory.create_sampler_state(descriptor)?;

            let mut inner = self.lock();
            if inner.generation != generation {
                drop(inner);
                self.release(handle);
                continue;
            }
            if let Some(found) = find(&inner.entries, descriptor) {
                drop(inner);
                self.release(handle);
                return Ok(found);
            }

            let state = Arc::new(CachedSamplerState {
                index: inner.entries.len(),
                generation,
                descriptor: *descriptor,
                handle,
            });
            inner.entries.push(Arc::clone(&state));
            log::debug!("Cached sampler state #{} ({:?})", state.index, handle);
            return Ok(state);
        }
    }

    /// Returns one of the predefined samplers, creating it if needed.
    pub fn predefined(&self, sampler: PredefinedSampler) -> StateResult<Arc<CachedSamplerState>> {
        self.get_or_create(&sampler.descriptor())
    }

    /// Empties the cache, releases every sampler object, and registers the
    /// predefined samplers again.
    ///
    /// ## Errors
    /// * `StateError::Construction` - If a predefined sampler cannot be recreated.
    pub fn clear(&self) -> StateResult<()> {
        {
            let mut inner = self.lock();
            inner.generation += 1;
            self.generation.store(inner.generation, Ordering::Release);
            let entries = std::mem::take(&mut inner.entries);
            for entry in &entries {
                self.release(entry.handle);
            }
            log::info!("Cleared sampler state cache ({} entries)", entries.len());
        }
        self.register_predefined()
    }

    /// Returns the number of cached samplers.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` if the cache holds no sampler.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Returns the current cache generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Returns `true` if `handle` is held by the current generation of this cache.
    pub fn is_live(&self, handle: SamplerStateHandle) -> bool {
        self.lock().entries.iter().any(|entry| entry.handle == handle)
    }

    /// Fails with [`StateError::StaleSamplerState`] on the first handle that this
    /// cache does not hold, either because it was released by a clear or because
    /// it never came from this cache.
    pub fn ensure_live(
        &self,
        handles: impl IntoIterator<Item = SamplerStateHandle>,
    ) -> StateResult<()> {
        let inner = self.lock();
        for handle in handles {
            if !inner.entries.iter().any(|entry| entry.handle == handle) {
                return Err(StateError::StaleSamplerState {
                    handle,
                    cache_generation: inner.generation,
                });
            }
        }
        Ok(())
    }

    fn release(&self, handle: SamplerStateHandle) {
        if let Err(err) = self.factory.release_sampler_state(handle) {
            log::warn!("Failed to release sampler state {handle:?}: {err}");
        }
    }

    fn lock(&self) -> MutexGuard<'_, SamplerCacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SamplerStateCache {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        for entry in std::mem::take(&mut inner.entries) {
            if let Err(err) = self.factory.release_sampler_state(entry.handle) {
                log::warn!("Failed to release sampler state {:?}: {err}", entry.handle);
            }
        }
    }
}

fn find(
    entries: &[Arc<CachedSamplerState>],
    descriptor: &SamplerStateDescriptor,
) -> Option<Arc<CachedSamplerState>> {
    entries
        .iter()
        .find(|entry| entry.descriptor == *descriptor)
        .cloned()
}
