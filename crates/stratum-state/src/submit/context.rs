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

//! The per-context draw submission engine.

use super::draw_call::DrawCall;
use super::pipeline::{diff_pipeline_states, PipelineChanges};
use crate::binding::{apply_binding_changes, diff_bindings, needs_vertex_resources, ChangeMask};
use crate::cache::{CachedPipelineState, PipelineStateCache, SamplerStateCache};
use crate::error::{StateError, StateResult};
use crate::tracker::{DrawStateTracker, PerDrawChanges};
use std::sync::Arc;
use stratum_core::renderer::api::*;
use stratum_core::renderer::traits::DeviceContext;

/// The changes a validated draw call will apply.
#[derive(Debug, Clone, Copy)]
struct PendingChanges {
    bindings: ChangeMask,
    pipeline: PipelineChanges,
    per_draw: PerDrawChanges,
}

/// Submits draw calls to one device context, applying only the state that
/// changed since the previous draw call.
///
/// A context owns its device context and its last-applied baseline; only the
/// pipeline state and sampler caches are shared. Use one context per submitting
/// thread.
#[derive(Debug)]
pub struct DrawContext<D: DeviceContext> {
    cache: Arc<PipelineStateCache>,
    samplers: Arc<SamplerStateCache>,
    device: D,
    last_pipeline: Option<Arc<CachedPipelineState>>,
    last_bindings: Option<Arc<ResourceBindingSet>>,
    tracker: DrawStateTracker,
    stats: DrawStatistics,
}

impl<D: DeviceContext> DrawContext<D> {
    /// Creates a context with no baseline: the first draw applies every state.
    ///
    /// Every sampler in a submitted binding set must be held by `samplers`.
    pub fn new(cache: Arc<PipelineStateCache>, samplers: Arc<SamplerStateCache>, device: D) -> Self {
        Self {
            cache,
            samplers,
            device,
            last_pipeline: None,
            last_bindings: None,
            tracker: DrawStateTracker::new(),
            stats: DrawStatistics::default(),
        }
    }

    /// Applies the state of `draw` that differs from the previous draw call, then
    /// issues the draw command.
    ///
    /// ## Errors
    /// Every error is raised before the first device call, leaving the device and
    /// the baseline untouched.
    /// * `StateError::StalePipelineState` - If the pipeline state predates a cache clear.
    /// * `StateError::ForeignPipelineState` - If another cache created the pipeline state.
    /// * `StateError::StaleSamplerState` - If a bound sampler is not held by the sampler
    ///   cache, for instance after it was cleared.
    /// * `StateError::InvalidArgument` - If a limit is exceeded, or an indexed draw has
    ///   no index buffer.
    /// * `StateError::NotImplemented` - If vertex-stage shader resource views must be bound.
    ///
    /// ## Concurrency
    /// The cache checks happen before the device calls without holding either
    /// cache lock. A [`PipelineStateCache::clear`] or [`SamplerStateCache::clear`]
    /// on another thread between the two can release objects this call then binds.
    /// Clear the caches only while no draw context is submitting.
    pub fn submit(&mut self, draw: &DrawCall) -> StateResult<()> {
        let changes = self.validate(draw)?;
        self.apply_common_state(draw, changes);
        self.issue(draw.kind);
        self.commit(draw, changes);
        Ok(())
    }

    fn validate(&self, draw: &DrawCall) -> StateResult<PendingChanges> {
        if let Err(err) = self.cache.ensure_current(&draw.pipeline_state) {
            log::warn!("Rejected draw call: {err}");
            return Err(err);
        }

        if let Err(err) = self.samplers.ensure_live(draw.bindings.samplers()) {
            log::warn!("Rejected draw call: {err}");
            return Err(err);
        }

        let settings = self.cache.settings();
        let bindings = &draw.bindings;
        let parameters = &draw.parameters;
        if bindings.render_targets.len() > settings.max_render_targets {
            return Err(StateError::invalid(format!(
                "{} render targets exceed the limit of {}",
                bindings.render_targets.len(),
                settings.max_render_targets
            )));
        }
        if parameters.viewports.len() > settings.max_viewports {
            return Err(StateError::invalid(format!(
                "{} viewports exceed the limit of {}",
                parameters.viewports.len(),
                settings.max_viewports
            )));
        }
        if parameters.scissor_rects.len() > settings.max_scissor_rects {
            return Err(StateError::invalid(format!(
                "{} scissor rectangles exceed the limit of {}",
                parameters.scissor_rects.len(),
                settings.max_scissor_rects
            )));
        }
        if draw.kind.is_indexed() && bindings.index_buffer.is_none() {
            return Err(StateError::invalid(
                "an indexed draw requires a bound index buffer",
            ));
        }

        let binding_changes = diff_bindings(self.last_bindings.as_deref(), bindings);
        if needs_vertex_resources(bindings, binding_changes) {
            log::warn!("Rejected draw call: vertex-stage shader resource views are not supported");
            return Err(StateError::NotImplemented(
                "binding vertex-stage shader resource views",
            ));
        }

        // A baseline from before a cache clear refers to released objects.
        let last_pipeline = self
            .last_pipeline
            .as_deref()
            .filter(|state| self.cache.is_current(state));

        Ok(PendingChanges {
            bindings: binding_changes,
            pipeline: diff_pipeline_states(last_pipeline, &draw.pipeline_state),
            per_draw: self.tracker.diff(parameters),
        })
    }

    fn apply_common_state(&mut self, draw: &DrawCall, changes: PendingChanges) {
        apply_binding_changes(&mut self.device, &draw.bindings, changes.bindings);

        let state = &draw.pipeline_state;
        let parameters = &draw.parameters;
        let pipeline = changes.pipeline;
        let per_draw = changes.per_draw;

        if pipeline.contains(PipelineChanges::VERTEX_PROGRAM) {
            self.device.set_vertex_program(Some(state.vertex_program()));
        }
        if pipeline.contains(PipelineChanges::PIXEL_PROGRAM) {
            self.device.set_pixel_program(state.pixel_program());
        }
        if pipeline.contains(PipelineChanges::RASTER) {
            self.device.set_raster_state(state.raster_state());
        }
        if pipeline.contains(PipelineChanges::DEPTH_STENCIL)
            || per_draw.contains(PerDrawChanges::STENCIL_REFERENCE)
        {
            self.device
                .set_depth_stencil_state(state.depth_stencil_state(), parameters.stencil_reference);
        }
        if pipeline.contains(PipelineChanges::BLEND)
            || per_draw.intersects(PerDrawChanges::BLEND_FACTOR | PerDrawChanges::SAMPLE_MASK)
        {
            self.device.set_blend_state(
                state.blend_state(),
                parameters.blend_factor,
                parameters.blend_sample_mask,
            );
        }
        if per_draw.contains(PerDrawChanges::TOPOLOGY) {
            self.device.set_primitive_topology(parameters.topology);
        }
        if per_draw.contains(PerDrawChanges::VIEWPORTS) {
            self.device.set_viewports(&parameters.viewports);
        }
        if per_draw.contains(PerDrawChanges::SCISSOR_RECTS) {
            self.device.set_scissor_rects(&parameters.scissor_rects);
        }
    }

    fn issue(&mut self, kind: DrawKind) {
        match kind {
            DrawKind::Draw {
                vertex_count,
                start_vertex,
            } => self.device.draw(vertex_count, start_vertex),
            DrawKind::DrawIndexed {
                index_count,
                start_index,
                base_vertex,
            } => self
                .device
                .draw_indexed(index_count, start_index, base_vertex),
            DrawKind::DrawInstanced {
                vertex_count_per_instance,
                instance_count,
                start_vertex,
                start_instance,
            } => self.device.draw_instanced(
                vertex_count_per_instance,
                instance_count,
                start_vertex,
                start_instance,
            ),
            DrawKind::DrawIndexedInstanced {
                index_count_per_instance,
                instance_count,
                start_index,
                base_vertex,
                start_instance,
            } => self.device.draw_indexed_instanced(
                index_count_per_instance,
                instance_count,
                start_index,
                base_vertex,
                start_instance,
            ),
        }
    }

    fn commit(&mut self, draw: &DrawCall, changes: PendingChanges) {
        self.last_pipeline = Some(Arc::clone(&draw.pipeline_state));
        self.last_bindings = Some(Arc::clone(&draw.bindings));
        self.tracker.commit(&draw.parameters);

        let stats = &mut self.stats;
        stats.draw_calls += 1;
        if !changes.pipeline.is_empty() {
            stats.pipeline_state_changes += 1;
        }
        if !changes.bindings.is_empty() {
            stats.binding_changes += 1;
        }
        if !changes.per_draw.is_empty() {
            stats.per_draw_changes += 1;
        }
        if changes.pipeline.is_empty() && changes.bindings.is_empty() && changes.per_draw.is_empty() {
            stats.redundant_submissions += 1;
        }

        log::trace!(
            "Draw #{} with pipeline state #{}: {:?}, {:?}, {:?}",
            stats.draw_calls,
            draw.pipeline_state.index(),
            changes.bindings,
            changes.pipeline,
            changes.per_draw
        );
    }

    /// Forgets the baseline and resets the device state, optionally flushing
    /// outstanding device commands. The next draw applies every state.
    pub fn reset(&mut self, flush: bool) {
        self.last_pipeline = None;
        self.last_bindings = None;
        self.tracker.reset();
        self.device.clear_state();
        if flush {
            self.device.flush();
        }
        log::debug!("Draw context reset (flush: {flush})");
    }

    /// The statistics gathered since creation or the last [`reset_statistics`](Self::reset_statistics).
    pub fn statistics(&self) -> &DrawStatistics {
        &self.stats
    }

    /// Zeroes the statistics.
    pub fn reset_statistics(&mut self) {
        self.stats = DrawStatistics::default();
    }

    /// The shared pipeline state cache.
    pub fn cache(&self) -> &Arc<PipelineStateCache> {
        &self.cache
    }

    /// The shared sampler state cache.
    pub fn sampler_cache(&self) -> &Arc<SamplerStateCache> {
        &self.samplers
    }

    /// The pipeline state applied by the last draw call, if any.
    pub fn last_pipeline_state(&self) -> Option<&Arc<CachedPipelineState>> {
        self.last_pipeline.as_ref()
    }

    /// The binding set applied by the last draw call, if any.
    pub fn last_bindings(&self) -> Option<&Arc<ResourceBindingSet>> {
        self.last_bindings.as_ref()
    }

    /// The per-draw parameters applied by the last draw call, if any.
    pub fn last_parameters(&self) -> Option<&DrawCallParameters> {
        self.tracker.baseline()
    }

    /// The device context.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The device context, mutably. State changed through it is not tracked;
    /// call [`reset`](Self::reset) afterwards.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Consumes the context and returns its device context.
    pub fn into_device(self) -> D {
        self.device
    }
}
