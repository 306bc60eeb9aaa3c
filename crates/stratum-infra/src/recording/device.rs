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

use super::command::DeviceCommand;
use stratum_core::math::LinearRgba;
use stratum_core::renderer::api::*;
use stratum_core::renderer::traits::DeviceContext;

/// The state currently bound on a [`RecordingDevice`].
///
/// `None` and empty lists mean "device default", which is what
/// [`DeviceContext::clear_state`] restores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundState {
    /// The bound rasterizer state.
    pub raster: Option<RasterStateHandle>,
    /// The bound depth/stencil state and stencil reference.
    pub depth_stencil: Option<(DepthStencilStateHandle, u32)>,
    /// The bound blend state, blend factor and sample mask.
    pub blend: Option<(BlendStateHandle, LinearRgba, u32)>,
    /// The bound vertex-stage program.
    pub vertex_program: Option<ShaderProgramId>,
    /// The bound pixel-stage program.
    pub pixel_program: Option<ShaderProgramId>,
    /// The bound render target views.
    pub render_targets: Vec<RenderTargetViewId>,
    /// The bound depth/stencil view.
    pub depth_stencil_view: Option<DepthStencilViewId>,
    /// The bound vertex buffers.
    pub vertex_buffers: Vec<VertexBufferBinding>,
    /// The bound input layout.
    pub input_layout: Option<InputLayoutId>,
    /// The bound index buffer.
    pub index_buffer: Option<IndexBufferBinding>,
    /// The vertex-stage constant buffers.
    pub vertex_constant_buffers: Vec<BufferId>,
    /// The pixel-stage constant buffers.
    pub pixel_constant_buffers: Vec<BufferId>,
    /// The vertex-stage shader resource views.
    pub vertex_shader_resources: Vec<ShaderResourceViewId>,
    /// The pixel-stage shader resource views.
    pub pixel_shader_resources: Vec<ShaderResourceViewId>,
    /// The vertex-stage samplers.
    pub vertex_samplers: Vec<SamplerStateHandle>,
    /// The pixel-stage samplers.
    pub pixel_samplers: Vec<SamplerStateHandle>,
    /// The primitive topology.
    pub topology: Option<PrimitiveTopology>,
    /// The viewports.
    pub viewports: Vec<Viewport>,
    /// The scissor rectangles.
    pub scissor_rects: Vec<ScissorRect>,
}

/// A device context that records every call and keeps track of the bound state.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    commands: Vec<DeviceCommand>,
    bound: BoundState,
    draws: u64,
}

impl RecordingDevice {
    /// Creates a device with an empty command log and default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands recorded since creation or the last [`clear_commands`](Self::clear_commands).
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Empties the command log. The bound state is kept.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Takes the recorded commands, leaving the log empty.
    pub fn take_commands(&mut self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// The number of recorded state-setting commands.
    pub fn state_change_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_state_change()).count()
    }

    /// The total number of draw commands issued since creation.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    /// The state currently bound on the device.
    pub fn bound_state(&self) -> &BoundState {
        &self.bound
    }

    fn record(&mut self, command: DeviceCommand) {
        log::trace!("Recorded {command:?}");
        if command.is_draw() {
            self.draws += 1;
        }
        self.commands.push(command);
    }
}

impl DeviceContext for RecordingDevice {
    fn set_raster_state(&mut self, state: RasterStateHandle) {
        self.bound.raster = Some(state);
        self.record(DeviceCommand::SetRasterState(state));
    }

    fn set_depth_stencil_state(&mut self, state: DepthStencilStateHandle, stencil_reference: u32) {
        self.bound.depth_stencil = Some((state, stencil_reference));
        self.record(DeviceCommand::SetDepthStencilState {
            state,
            stencil_reference,
        });
    }

    fn set_blend_state(&mut self, state: BlendStateHandle, blend_factor: LinearRgba, sample_mask: u32) {
        self.bound.blend = Some((state, blend_factor, sample_mask));
        self.record(DeviceCommand::SetBlendState {
            state,
            blend_factor,
            sample_mask,
        });
    }

    fn set_vertex_program(&mut self, program: Option<ShaderProgramId>) {
        self.bound.vertex_program = program;
        self.record(DeviceCommand::SetVertexProgram(program));
    }

    fn set_pixel_program(&mut self, program: Option<ShaderProgramId>) {
        self.bound.pixel_program = program;
        self.record(DeviceCommand::SetPixelProgram(program));
    }

    fn bind_render_targets(
        &mut self,
        targets: &[RenderTargetViewId],
        depth_stencil: Option<DepthStencilViewId>,
    ) {
        self.bound.render_targets = targets.to_vec();
        self.bound.depth_stencil_view = depth_stencil;
        self.record(DeviceCommand::BindRenderTargets {
            targets: targets.to_vec(),
            depth_stencil,
        });
    }

    fn bind_vertex_buffers(&mut self, buffers: &[VertexBufferBinding], layout: Option<InputLayoutId>) {
        self.bound.vertex_buffers = buffers.to_vec();
        self.bound.input_layout = layout;
        self.record(DeviceCommand::BindVertexBuffers {
            buffers: buffers.to_vec(),
            layout,
        });
    }

    fn bind_index_buffer(&mut self, index_buffer: Option<&IndexBufferBinding>) {
        self.bound.index_buffer = index_buffer.copied();
        self.record(DeviceCommand::BindIndexBuffer(index_buffer.copied()));
    }

    fn bind_constant_buffers(&mut self, stage: ShaderStage, buffers: &[BufferId]) {
        match stage {
            ShaderStage::Vertex => self.bound.vertex_constant_buffers = buffers.to_vec(),
            ShaderStage::Pixel => self.bound.pixel_constant_buffers = buffers.to_vec(),
        }
        self.record(DeviceCommand::BindConstantBuffers {
            stage,
            buffers: buffers.to_vec(),
        });
    }

    fn bind_shader_resources(&mut self, stage: ShaderStage, views: &[ShaderResourceViewId]) {
        match stage {
            ShaderStage::Vertex => self.bound.vertex_shader_resources = views.to_vec(),
            ShaderStage::Pixel => self.bound.pixel_shader_resources = views.to_vec(),
        }
        self.record(DeviceCommand::BindShaderResources {
            stage,
            views: views.to_vec(),
        });
    }

    fn bind_samplers(&mut self, stage: ShaderStage, samplers: &[SamplerStateHandle]) {
        match stage {
            ShaderStage::Vertex => self.bound.vertex_samplers = samplers.to_vec(),
            ShaderStage::Pixel => self.bound.pixel_samplers = samplers.to_vec(),
        }
        self.record(DeviceCommand::BindSamplers {
            stage,
            samplers: samplers.to_vec(),
        });
    }

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.bound.topology = Some(topology);
        self.record(DeviceCommand::SetPrimitiveTopology(topology));
    }

    fn set_viewports(&mut self, viewports: &[Viewport]) {
        self.bound.viewports = viewports.to_vec();
        self.record(DeviceCommand::SetViewports(viewports.to_vec()));
    }

    fn set_scissor_rects(&mut self, rects: &[ScissorRect]) {
        self.bound.scissor_rects = rects.to_vec();
        self.record(DeviceCommand::SetScissorRects(rects.to_vec()));
    }

    fn draw(&mut self, vertex_count: u32, start_vertex: u32) {
        self.record(DeviceCommand::Draw {
            vertex_count,
            start_vertex,
        });
    }

    fn draw_indexed(&mut self, index_count: u32, start_index: u32, base_vertex: i32) {
        self.record(DeviceCommand::DrawIndexed {
            index_count,
            start_index,
            base_vertex,
        });
    }

    fn draw_instanced(
        &mut self,
        vertex_count_per_instance: u32,
        instance_count: u32,
        start_vertex: u32,
        start_instance: u32,
    ) {
        self.record(DeviceCommand::DrawInstanced {
            vertex_count_per_instance,
            instance_count,
            start_vertex,
            start_instance,
        });
    }

    fn draw_indexed_instanced(
        &mut self,
        index_count_per_instance: u32,
        instance_count: u32,
        start_index: u32,
        base_vertex: i32,
        start_instance: u32,
    ) {
        self.record(DeviceCommand::DrawIndexedInstanced {
            index_count_per_instance,
            instance_count,
            start_index,
            base_vertex,
            start_instance,
        });
    }

    fn clear_state(&mut self) {
        self.bound = BoundState::default();
        self.record(DeviceCommand::ClearState);
    }

    fn flush(&mut self) {
        self.record(DeviceCommand::Flush);
    }
}
