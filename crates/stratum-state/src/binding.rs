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

//! Resource binding diffs.
//!
//! Render targets and buffer groups are compared by content, with a shortcut when
//! both sets share the same sequence. View and sampler groups are compared by
//! sequence identity only: unless both sets share the sequence, the group is
//! considered changed and rebound.

use std::sync::Arc;
use stratum_core::renderer::api::*;
use stratum_core::renderer::traits::DeviceContext;
use stratum_core::stratum_bitflags;

stratum_bitflags! {
    /// The resource groups that differ between two binding sets.
    pub struct ChangeMask: u32 {
        /// Render target views and the depth/stencil view.
        const RENDER_TARGETS = 1 << 0;
        /// Vertex buffers and the input layout.
        const VERTEX_BUFFERS = 1 << 1;
        /// The index buffer and its format.
        const INDEX_BUFFER = 1 << 2;
        /// Vertex-stage constant buffers.
        const VS_CONSTANTS = 1 << 3;
        /// Pixel-stage constant buffers.
        const PS_CONSTANTS = 1 << 4;
        /// Vertex-stage shader resource views.
        const VS_RESOURCES = 1 << 5;
        /// Pixel-stage shader resource views.
        const PS_RESOURCES = 1 << 6;
        /// Pixel-stage samplers.
        const PS_SAMPLERS = 1 << 7;
        /// Vertex-stage samplers.
        const VS_SAMPLERS = 1 << 8;
    }
}

fn same_content<T: PartialEq>(a: &Arc<[T]>, b: &Arc<[T]>) -> bool {
    Arc::ptr_eq(a, b) || a[..] == b[..]
}

/// Computes which resource groups must be rebound to go from `previous` to `next`.
///
/// With no `previous` set every group is reported as changed. Two references to
/// the same set report no change.
pub fn diff_bindings(previous: Option<&ResourceBindingSet>, next: &ResourceBindingSet) -> ChangeMask {
    let previous = match previous {
        None => return ChangeMask::ALL,
        Some(previous) if std::ptr::eq(previous, next) => return ChangeMask::EMPTY,
        Some(previous) => previous,
    };

    let mut mask = ChangeMask::EMPTY;
    mask.set(
        ChangeMask::RENDER_TARGETS,
        previous.depth_stencil_view != next.depth_stencil_view
            || !same_content(&previous.render_targets, &next.render_targets),
    );
    mask.set(
        ChangeMask::VERTEX_BUFFERS,
        previous.input_layout != next.input_layout
            || !same_content(&previous.vertex_buffers, &next.vertex_buffers),
    );
    mask.set(
        ChangeMask::INDEX_BUFFER,
        previous.index_buffer != next.index_buffer,
    );
    mask.set(
        ChangeMask::VS_CONSTANTS,
        !same_content(&previous.vertex_constant_buffers, &next.vertex_constant_buffers),
    );
    mask.set(
        ChangeMask::PS_CONSTANTS,
        !same_content(&previous.pixel_constant_buffers, &next.pixel_constant_buffers),
    );
    mask.set(
        ChangeMask::VS_RESOURCES,
        !Arc::ptr_eq(&previous.vertex_shader_resources, &next.vertex_shader_resources),
    );
    mask.set(
        ChangeMask::PS_RESOURCES,
        !Arc::ptr_eq(&previous.pixel_shader_resources, &next.pixel_shader_resources),
    );
    mask.set(
        ChangeMask::PS_SAMPLERS,
        !Arc::ptr_eq(&previous.pixel_samplers, &next.pixel_samplers),
    );
    mask.set(
        ChangeMask::VS_SAMPLERS,
        !Arc::ptr_eq(&previous.vertex_samplers, &next.vertex_samplers),
    );
    mask
}

/// Returns `true` if applying `mask` would need vertex-stage shader resource
/// views, which the engine does not bind.
pub(crate) fn needs_vertex_resources(set: &ResourceBindingSet, mask: ChangeMask) -> bool {
    mask.contains(ChangeMask::VS_RESOURCES) && !set.vertex_shader_resources.is_empty()
}

/// Issues the device binding calls for every group set in `mask`.
///
/// Vertex-stage shader resource views are never bound here; callers reject
/// binding sets that need them before any device call.
pub(crate) fn apply_binding_changes<D: DeviceContext + ?Sized>(
    device: &mut D,
    set: &ResourceBindingSet,
    mask: ChangeMask,
) {
    if mask.contains(ChangeMask::RENDER_TARGETS) {
        device.bind_render_targets(&set.render_targets, set.depth_stencil_view);
    }
    if mask.contains(ChangeMask::VERTEX_BUFFERS) {
        device.bind_vertex_buffers(&set.vertex_buffers, set.input_layout);
    }
    if mask.contains(ChangeMask::INDEX_BUFFER) {
        device.bind_index_buffer(set.index_buffer.as_ref());
    }
    if mask.contains(ChangeMask::VS_CONSTANTS) {
        device.bind_constant_buffers(ShaderStage::Vertex, &set.vertex_constant_buffers);
    }
    if mask.contains(ChangeMask::PS_CONSTANTS) {
        device.bind_constant_buffers(ShaderStage::Pixel, &set.pixel_constant_buffers);
    }
    if mask.contains(ChangeMask::PS_RESOURCES) {
        device.bind_shader_resources(ShaderStage::Pixel, &set.pixel_shader_resources);
    }
    if mask.contains(ChangeMask::PS_SAMPLERS) {
        device.bind_samplers(ShaderStage::Pixel, &set.pixel_samplers);
    }
    if mask.contains(ChangeMask::VS_SAMPLERS) {
        device.bind_samplers(ShaderStage::Vertex, &set.vertex_samplers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_infra::recording::{DeviceCommand, RecordingDevice};

    fn full_set() -> ResourceBindingSet {
        ResourceBindingSet::default()
            .with_render_targets(vec![RenderTargetViewId(1)], Some(DepthStencilViewId(2)))
            .with_vertex_buffers(
                vec![VertexBufferBinding {
                    buffer: BufferId(3),
                    stride: 32,
                    offset: 0,
                }],
                Some(InputLayoutId(4)),
            )
            .with_index_buffer(Some(IndexBufferBinding {
                buffer: BufferId(5),
                format: IndexFormat::Uint16,
                offset: 0,
            }))
            .with_constant_buffers(ShaderStage::Vertex, vec![BufferId(6)])
            .with_constant_buffers(ShaderStage::Pixel, vec![BufferId(7)])
            .with_shader_resources(ShaderStage::Pixel, vec![ShaderResourceViewId(8)])
            .with_pixel_samplers(vec![SamplerStateHandle(9)])
    }

    #[test]
    fn first_diff_marks_every_group() {
        assert_eq!(diff_bindings(None, &full_set()), ChangeMask::ALL);
    }

    #[test]
    fn same_set_has_no_changes() {
        let set = full_set();
        assert!(diff_bindings(Some(&set), &set).is_empty());
    }

    #[test]
    fn clone_with_shared_sequences_has_no_changes() {
        let set = full_set();
        let copy = set.clone();
        assert!(diff_bindings(Some(&set), &copy).is_empty());
    }

    #[test]
    fn only_index_buffer_changes() {
        let a = full_set();
        let b = a.clone().with_index_buffer(Some(IndexBufferBinding {
            buffer: BufferId(50),
            format: IndexFormat::Uint32,
            offset: 0,
        }));
        assert_eq!(diff_bindings(Some(&a), &b), ChangeMask::INDEX_BUFFER);
    }

    #[test]
    fn buffers_compare_by_content() {
        let a = full_set();
        let b = a
            .clone()
            .with_render_targets(vec![RenderTargetViewId(1)], Some(DepthStencilViewId(2)))
            .with_constant_buffers(ShaderStage::Pixel, vec![BufferId(7)]);
        assert!(!Arc::ptr_eq(&a.render_targets, &b.render_targets));
        assert!(diff_bindings(Some(&a), &b).is_empty());

        let c = a.clone().with_constant_buffers(ShaderStage::Pixel, vec![BufferId(70)]);
        assert_eq!(diff_bindings(Some(&a), &c), ChangeMask::PS_CONSTANTS);
    }

    #[test]
    fn views_and_samplers_compare_by_identity() {
        let a = full_set();
        let b = a
            .clone()
            .with_shader_resources(ShaderStage::Pixel, vec![ShaderResourceViewId(8)])
            .with_pixel_samplers(vec![SamplerStateHandle(9)]);
        assert_eq!(
            diff_bindings(Some(&a), &b),
            ChangeMask::PS_RESOURCES | ChangeMask::PS_SAMPLERS
        );
    }

    #[test]
    fn vertex_samplers_are_their_own_group() {
        let a = full_set();
        let b = a
            .clone()
            .with_samplers(ShaderStage::Vertex, vec![SamplerStateHandle(10)]);
        assert_eq!(diff_bindings(Some(&a), &b), ChangeMask::VS_SAMPLERS);

        let mut device = RecordingDevice::new();
        apply_binding_changes(&mut device, &b, ChangeMask::VS_SAMPLERS);
        assert_eq!(
            device.commands(),
            &[DeviceCommand::BindSamplers {
                stage: ShaderStage::Vertex,
                samplers: vec![SamplerStateHandle(10)]
            }]
        );
        assert_eq!(
            device.bound_state().vertex_samplers,
            vec![SamplerStateHandle(10)]
        );
        assert!(device.bound_state().pixel_samplers.is_empty());
    }

    #[test]
    fn depth_stencil_view_counts_as_render_target_change() {
        let a = full_set();
        let b = ResourceBindingSet {
            depth_stencil_view: None,
            ..a.clone()
        };
        assert_eq!(diff_bindings(Some(&a), &b), ChangeMask::RENDER_TARGETS);
    }

    #[test]
    fn vertex_resources_need_support_only_when_present() {
        let empty = full_set();
        assert!(!needs_vertex_resources(&empty, ChangeMask::ALL));

        let with_views = empty
            .clone()
            .with_shader_resources(ShaderStage::Vertex, vec![ShaderResourceViewId(1)]);
        assert!(needs_vertex_resources(&with_views, ChangeMask::ALL));
        assert!(!needs_vertex_resources(&with_views, ChangeMask::EMPTY));
    }
}
