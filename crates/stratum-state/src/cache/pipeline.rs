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

//! The pipeline state cache.
//!
//! Entries are kept in insertion order and looked up by a linear scan. A lookup
//! that finds no identical entry still collects the native raster, depth/stencil
//! and blend objects of entries that share that sub-state, so a new entry only
//! creates the objects nobody has yet.
//!
//! Native objects are created outside the cache lock. Before inserting, the cache
//! re-scans under the lock: if an equivalent entry or sub-state appeared in the
//! meantime it wins and the freshly built duplicates are released, and if the
//! cache was cleared the whole lookup starts over.

use crate::equality::{match_components, SubStateMatch};
use crate::error::{StateError, StateResult};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use stratum_core::renderer::api::*;
use stratum_core::renderer::traits::StateObjectFactory;

/// A realized pipeline state.
///
/// Immutable once created. Holds the native sub-state objects, which may be shared
/// with other entries of the same cache, and stays valid until the cache is cleared.
#[derive(Debug)]
pub struct CachedPipelineState {
    cache_id: u64,
    index: usize,
    generation: u64,
    descriptor: PipelineStateDescriptor,
    vertex_program: ShaderProgramId,
    raster: RasterStateHandle,
    depth_stencil: DepthStencilStateHandle,
    blend: BlendStateHandle,
}

impl CachedPipelineState {
    /// The position of this state in its cache, assigned at creation.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The cache generation this state was created under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The descriptor this state was realized from.
    pub fn descriptor(&self) -> &PipelineStateDescriptor {
        &self.descriptor
    }

    /// The vertex-stage program.
    pub fn vertex_program(&self) -> ShaderProgramId {
        self.vertex_program
    }

    /// The pixel-stage program, if any.
    pub fn pixel_program(&self) -> Option<ShaderProgramId> {
        self.descriptor.pixel_program
    }

    /// The native rasterizer state object.
    pub fn raster_state(&self) -> RasterStateHandle {
        self.raster
    }

    /// The native depth/stencil state object.
    pub fn depth_stencil_state(&self) -> DepthStencilStateHandle {
        self.depth_stencil
    }

    /// The native blend state object.
    pub fn blend_state(&self) -> BlendStateHandle {
        self.blend
    }
}

#[derive(Debug)]
struct CacheInner {
    entries: Vec<Arc<CachedPipelineState>>,
    generation: u64,
}

/// Native handles of existing entries that can be shared with a new entry.
#[derive(Debug, Default)]
struct ReusableHandles {
    raster: Option<RasterStateHandle>,
    depth_stencil: Option<DepthStencilStateHandle>,
    blend: Option<BlendStateHandle>,
}

enum Lookup {
    Hit(Arc<CachedPipelineState>),
    Miss(ReusableHandles),
}

fn lookup(entries: &[Arc<CachedPipelineState>], descriptor: &PipelineStateDescriptor) -> Lookup {
    let mut reusable = ReusableHandles::default();
    for entry in entries {
        let matched = match_components(&entry.descriptor, descriptor);
        if matched.is_full() {
            return Lookup::Hit(Arc::clone(entry));
        }
        if matched.contains(SubStateMatch::RASTER) {
            reusable.raster.get_or_insert(entry.raster);
        }
        if matched.contains(SubStateMatch::DEPTH_STENCIL) {
            reusable.depth_stencil.get_or_insert(entry.depth_stencil);
        }
        if matched.contains(SubStateMatch::BLEND) {
            reusable.blend.get_or_insert(entry.blend);
        }
    }
    Lookup::Miss(reusable)
}

/// A handle chosen for a new entry, and whether this call created it.
#[derive(Debug, Clone, Copy)]
struct Pick<H> {
    handle: H,
    created: bool,
}

impl<H: Copy> Pick<H> {
    fn reused(handle: H) -> Self {
        Self {
            handle,
            created: false,
        }
    }

    fn created(handle: H) -> Self {
        Self {
            handle,
            created: true,
        }
    }

    fn owned(&self) -> Option<H> {
        self.created.then_some(self.handle)
    }

    /// Settles on `existing` if another entry now provides one, returning the
    /// handle to use and the created handle that became redundant.
    fn settle(self, existing: Option<H>) -> (H, Option<H>) {
        match existing {
            Some(handle) => (handle, self.owned()),
            None => (self.handle, None),
        }
    }
}

#[derive(Debug)]
struct Picks {
    raster: Pick<RasterStateHandle>,
    depth_stencil: Pick<DepthStencilStateHandle>,
    blend: Pick<BlendStateHandle>,
}

static NEXT_CACHE_ID: AtomicU64 = AtomicU64::new(0);

/// A thread-safe cache of realized pipeline states.
#[derive(Debug)]
pub struct PipelineStateCache {
    id: u64,
    factory: Arc<dyn StateObjectFactory>,
    inner: Mutex<CacheInner>,
    generation: AtomicU64,
    settings: EngineSettings,
}

impl PipelineStateCache {
    /// Creates an empty cache with the default settings.
    pub fn new(factory: Arc<dyn StateObjectFactory>) -> Self {
        Self::with_settings(factory, EngineSettings::default())
    }

    /// Creates an empty cache with the given settings.
    ///
    /// The reserved capacity is capped at [`MAX_INITIAL_CACHE_CAPACITY`], so
    /// settings that skipped [`EngineSettings::validate`] cannot abort here.
    pub fn with_settings(factory: Arc<dyn StateObjectFactory>, settings: EngineSettings) -> Self {
        let capacity = settings.initial_cache_capacity;
        if capacity > MAX_INITIAL_CACHE_CAPACITY {
            log::warn!(
                "Initial cache capacity {capacity} exceeds {MAX_INITIAL_CACHE_CAPACITY}, clamping"
            );
        }
        Self {
            id: NEXT_CACHE_ID.fetch_add(1, Ordering::Relaxed),
            factory,
            inner: Mutex::new(CacheInner {
                entries: Vec::with_capacity(capacity.min(MAX_INITIAL_CACHE_CAPACITY)),
                generation: 0,
            }),
            generation: AtomicU64::new(0),
            settings,
        }
    }

    /// Returns the cached state for `descriptor`, realizing it on a miss.
    ///
    /// ## Errors
    /// * `StateError::InvalidArgument` - If the descriptor has no vertex program or
    ///   too many blend targets. Checked before the cache is touched.
    /// * `StateError::Construction` - If a native object cannot be created. The cache
    ///   is left unmodified and objects created during the call are released.
    pub fn get_or_create(
        &self,
        descriptor: &PipelineStateDescriptor,
    ) -> StateResult<Arc<CachedPipelineState>> {
        let vertex_program = descriptor
            .vertex_program
            .ok_or_else(|| StateError::invalid("a pipeline state requires a vertex program"))?;
        let blend_targets = descriptor.blend.targets.len();
        if blend_targets > self.settings.max_blend_targets {
            return Err(StateError::invalid(format!(
                "{blend_targets} blend targets exceed the limit of {}",
                self.settings.max_blend_targets
            )));
        }

        loop {
            let (generation, reusable) = {
                let inner = self.lock();
                match lookup(&inner.entries, descriptor) {
                    Lookup::Hit(state) => return Ok(state),
                    Lookup::Miss(reusable) => (inner.generation, reusable),
                }
            };

            let picks = self.build_missing(descriptor, &reusable)?;

            let mut inner = self.lock();
            if inner.generation != generation {
                drop(inner);
                log::debug!("Pipeline state cache was cleared during construction, retrying");
                self.release_handles(
                    picks.raster.owned(),
                    picks.depth_stencil.owned(),
                    picks.blend.owned(),
                );
                continue;
            }

            let existing = match lookup(&inner.entries, descriptor) {
                Lookup::Hit(state) => {
                    drop(inner);
                    self.release_handles(
                        picks.raster.owned(),
                        picks.depth_stencil.owned(),
                        picks.blend.owned(),
                    );
                    return Ok(state);
                }
                Lookup::Miss(existing) => existing,
            };

            let (raster, spare_raster) = picks.raster.settle(existing.raster);
            let (depth_stencil, spare_depth_stencil) =
                picks.depth_stencil.settle(existing.depth_stencil);
            let (blend, spare_blend) = picks.blend.settle(existing.blend);

            let state = Arc::new(CachedPipelineState {
                cache_id: self.id,
                index: inner.entries.len(),
                generation,
                descriptor: descriptor.clone(),
                vertex_program,
                raster,
                depth_stencil,
                blend,
            });
            inner.entries.push(Arc::clone(&state));
            drop(inner);

            log::debug!(
                "Cached pipeline state #{} (raster {:?}, depth/stencil {:?}, blend {:?})",
                state.index,
                raster,
                depth_stencil,
                blend
            );
            self.release_handles(spare_raster, spare_depth_stencil, spare_blend);
            return Ok(state);
        }
    }

    fn build_missing(
        &self,
        descriptor: &PipelineStateDescriptor,
        reusable: &ReusableHandles,
    ) -> StateResult<Picks> {
        let raster = match reusable.raster {
            Some(handle) => Pick::reused(handle),
            None => Pick::created(self.factory.create_raster_state(&descriptor.raster)?),
        };

        let depth_stencil = match reusable.depth_stencil {
            Some(handle) => Pick::reused(handle),
            None => match self
                .factory
                .create_depth_stencil_state(&descriptor.depth_stencil)
            {
                Ok(handle) => Pick::created(handle),
                Err(err) => {
                    self.release_handles(raster.owned(), None, None);
                    return Err(err.into());
                }
            },
        };

        let blend = match reusable.blend {
            Some(handle) => Pick::reused(handle),
            None => match self.factory.create_blend_state(&descriptor.blend) {
                Ok(handle) => Pick::created(handle),
                Err(err) => {
                    self.release_handles(raster.owned(), depth_stencil.owned(), None);
                    return Err(err.into());
                }
            },
        };

        Ok(Picks {
            raster,
            depth_stencil,
            blend,
        })
    }

    /// Empties the cache and releases every native object it holds.
    ///
    /// States obtained before the call become stale: submitting one fails with
    /// [`StateError::StalePipelineState`]. A draw context that already validated
    /// a state may still be applying it on another thread; callers must not clear
    /// while draw calls using this cache are in flight.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        self.generation.store(inner.generation, Ordering::Release);
        let entries = std::mem::take(&mut inner.entries);
        self.release_entries(&entries);
        log::info!(
            "Cleared pipeline state cache ({} entries), now at generation {}",
            entries.len(),
            inner.generation
        );
    }

    fn release_entries(&self, entries: &[Arc<CachedPipelineState>]) {
        let mut rasters = HashSet::new();
        let mut depth_stencils = HashSet::new();
        let mut blends = HashSet::new();
        for entry in entries {
            self.release_handles(
                rasters.insert(entry.raster).then_some(entry.raster),
                depth_stencils
                    .insert(entry.depth_stencil)
                    .then_some(entry.depth_stencil),
                blends.insert(entry.blend).then_some(entry.blend),
            );
        }
    }

    fn release_handles(
        &self,
        raster: Option<RasterStateHandle>,
        depth_stencil: Option<DepthStencilStateHandle>,
        blend: Option<BlendStateHandle>,
    ) {
        if let Some(handle) = raster {
            if let Err(err) = self.factory.release_raster_state(handle) {
                log::warn!("Failed to release raster state {handle:?}: {err}");
            }
        }
        if let Some(handle) = depth_stencil {
            if let Err(err) = self.factory.release_depth_stencil_state(handle) {
                log::warn!("Failed to release depth/stencil state {handle:?}: {err}");
            }
        }
        if let Some(handle) = blend {
            if let Err(err) = self.factory.release_blend_state(handle) {
                log::warn!("Failed to release blend state {handle:?}: {err}");
            }
        }
    }

    /// Returns the state at `index`, if it exists in the current generation.
    pub fn get(&self, index: usize) -> Option<Arc<CachedPipelineState>> {
        self.lock().entries.get(index).cloned()
    }

    /// Returns the number of cached states.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` if the cache holds no state.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Returns the current cache generation. It increases on every [`clear`](Self::clear).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Returns `true` if `state` was created by this cache under the current generation.
    pub fn is_current(&self, state: &CachedPipelineState) -> bool {
        state.cache_id == self.id && state.generation == self.generation()
    }

    /// Fails if `state` was created by another cache or predates the last clear.
    ///
    /// ## Errors
    /// * `StateError::ForeignPipelineState` - If another cache created `state`.
    /// * `StateError::StalePipelineState` - If `state` predates the last clear.
    pub fn ensure_current(&self, state: &CachedPipelineState) -> StateResult<()> {
        if state.cache_id != self.id {
            return Err(StateError::ForeignPipelineState { index: state.index });
        }
        let cache_generation = self.generation();
        if state.generation == cache_generation {
            Ok(())
        } else {
            Err(StateError::StalePipelineState {
                index: state.index,
                state_generation: state.generation,
                cache_generation,
            })
        }
    }

    /// The settings this cache was created with.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The factory realizing native objects for this cache.
    pub fn factory(&self) -> &Arc<dyn StateObjectFactory> {
        &self.factory
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // Every critical section leaves the entry list consistent, so a poisoned
        // lock still guards valid data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for PipelineStateCache {
    fn drop(&mut self) {
        let entries = std::mem::take(
            &mut self
                .inner
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner)
                .entries,
        );
        self.release_entries(&entries);
    }
}
