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

use stratum_core::math::LinearRgba;
use stratum_core::renderer::api::*;

/// A device call captured by a [`RecordingDevice`](super::RecordingDevice).
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    /// `set_raster_state`.
    SetRasterState(RasterStateHandle),
    /// `set_depth_stencil_state`.
    SetDepthStencilState {
        /// The bound state object.
        state: DepthStencilStateHandle,
        /// The stencil reference value.
        stencil_reference: u32,
    },
    /// `set_blend_state`.
    SetBlendState {
        /// The bound state object.
        state: BlendStateHandle,
        /// The blend factor color.
        blend_factor: LinearRgba,
        /// The multisample coverage mask.
        sample_mask: u32,
    },
    /// `set_vertex_program`.
    SetVertexProgram(Option<ShaderProgramId>),
    /// `set_pixel_program`.
    SetPixelProgram(Option<ShaderProgramId>),
    /// `bind_render_targets`.
    BindRenderTargets {
        /// The render target views.
        targets: Vec<RenderTargetViewId>,
        /// The depth/stencil view.
        depth_stencil: Option<DepthStencilViewId>,
    },
    /// `bind_vertex_buffers`.
    BindVertexBuffers {
        /// The vertex buffers.
        buffers: Vec<VertexBufferBinding>,
        /// The input layout.
        layout: Option<InputLayoutId>,
    },
    /// `bind_index_buffer`.
    BindIndexBuffer(Option<IndexBufferBinding>),
    /// `bind_constant_buffers`.
    BindConstantBuffers {
        /// The shader stage.
        stage: ShaderStage,
        /// The constant buffers.
        buffers: Vec<BufferId>,
    },
    /// `bind_shader_resources`.
    BindShaderResources {
        /// The shader stage.
        stage: ShaderStage,
        /// The shader resource views.
        views: Vec<ShaderResourceViewId>,
    },
    /// `bind_samplers`.
    BindSamplers {
        /// The shader stage.
        stage: ShaderStage,
        /// The sampler objects.
        samplers: Vec<SamplerStateHandle>,
    },
    /// `set_primitive_topology`.
    SetPrimitiveTopology(PrimitiveTopology),
    /// `set_viewports`.
    SetViewports(Vec<Viewport>),
    /// `set_scissor_rects`.
    SetScissorRects(Vec<ScissorRect>),
    /// `draw`.
    Draw {
        /// The number of vertices.
        vertex_count: u32,
        /// The first vertex.
        start_vertex: u32,
    },
    /// `draw_indexed`.
    DrawIndexed {
        /// The number of indices.
        index_count: u32,
        /// The first index.
        start_index: u32,
        /// The value added to each index.
        base_vertex: i32,
    },
    /// `draw_instanced`.
    DrawInstanced {
        /// The number of vertices per instance.
        vertex_count_per_instance: u32,
        /// The number of instances.
        instance_count: u32,
        /// The first vertex.
        start_vertex: u32,
        /// The first instance.
        start_instance: u32,
    },
    /// `draw_indexed_instanced`.
    DrawIndexedInstanced {
        /// The number of indices per instance.
        index_count_per_instance: u32,
        /// The number of instances.
        instance_count: u32,
        /// The first index.
        start_index: u32,
        /// The value added to each index.
        base_vertex: i32,
        /// The first instance.
        start_instance: u32,
    },
    /// `clear_state`.
    ClearState,
    /// `flush`.
    Flush,
}

impl DeviceCommand {
    /// Returns `true` for the four draw commands.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            DeviceCommand::Draw { .. }
                | DeviceCommand::DrawIndexed { .. }
                | DeviceCommand::DrawInstanced { .. }
                | DeviceCommand::DrawIndexedInstanced { .. }
        )
    }

    /// Returns `true` for commands that set or bind state.
    pub fn is_state_change(&self) -> bool {
        !self.is_draw() && !matches!(self, DeviceCommand::ClearState | DeviceCommand::Flush)
    }
}
