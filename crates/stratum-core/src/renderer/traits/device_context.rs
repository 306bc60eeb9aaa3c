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

use crate::math::LinearRgba;
use crate::renderer::api::*;
use std::fmt::Debug;

/// The immediate-mode device boundary the submission engine drives.
///
/// Every call sets or binds state on the device, or issues a command. The calls
/// are infallible: invalid input is rejected before it reaches the device.
pub trait DeviceContext: Debug {
    /// Binds a realized rasterizer state.
    fn set_raster_state(&mut self, state: RasterStateHandle);

    /// Binds a realized depth/stencil state together with the stencil reference value.
    /// ## Arguments
    /// * `state` - The depth/stencil state object.
    /// * `stencil_reference` - The reference value for the stencil test.
    fn set_depth_stencil_state(&mut self, state: DepthStencilStateHandle, stencil_reference: u32);

    /// Binds a realized blend state together with the blend factor and sample mask.
    /// ## Arguments
    /// * `state` - The blend state object.
    /// * `blend_factor` - The constant color used by constant blend factors.
    /// * `sample_mask` - The multisample coverage mask.
    fn set_blend_state(&mut self, state: BlendStateHandle, blend_factor: LinearRgba, sample_mask: u32);

    /// Binds the vertex-stage program.
    fn set_vertex_program(&mut self, program: Option<ShaderProgramId>);

    /// Binds the pixel-stage program, or unbinds it with `None`.
    fn set_pixel_program(&mut self, program: Option<ShaderProgramId>);

    /// Binds the render target views and the depth/stencil view.
    fn bind_render_targets(
        &mut self,
        targets: &[RenderTargetViewId],
        depth_stencil: Option<DepthStencilViewId>,
    );

    /// Binds the vertex buffers, starting at slot 0, and the input layout.
    fn bind_vertex_buffers(&mut self, buffers: &[VertexBufferBinding], layout: Option<InputLayoutId>);

    /// Binds the index buffer, or unbinds it with `None`.
    fn bind_index_buffer(&mut self, index_buffer: Option<&IndexBufferBinding>);

    /// Binds constant buffers to a shader stage, starting at slot 0.
    fn bind_constant_buffers(&mut self, stage: ShaderStage, buffers: &[BufferId]);

    /// Binds shader resource views to a shader stage, starting at slot 0.
    fn bind_shader_resources(&mut self, stage: ShaderStage, views: &[ShaderResourceViewId]);

    /// Binds samplers to a shader stage, starting at slot 0.
    fn bind_samplers(&mut self, stage: ShaderStage, samplers: &[SamplerStateHandle]);

    /// Sets the primitive topology used by the input assembler.
    fn set_primitive_topology(&mut self, topology: PrimitiveTopology);

    /// Sets the viewports.
    fn set_viewports(&mut self, viewports: &[Viewport]);

    /// Sets the scissor rectangles.
    fn set_scissor_rects(&mut self, rects: &[ScissorRect]);

    /// Draws non-indexed primitives.
    fn draw(&mut self, vertex_count: u32, start_vertex: u32);

    /// Draws indexed primitives from the bound index buffer.
    fn draw_indexed(&mut self, index_count: u32, start_index: u32, base_vertex: i32);

    /// Draws instances of non-indexed primitives.
    fn draw_instanced(
        &mut self,
        vertex_count_per_instance: u32,
        instance_count: u32,
        start_vertex: u32,
        start_instance: u32,
    );

    /// Draws instances of indexed primitives from the bound index buffer.
    fn draw_indexed_instanced(
        &mut self,
        index_count_per_instance: u32,
        instance_count: u32,
        start_index: u32,
        base_vertex: i32,
        start_instance: u32,
    );

    /// Resets every piece of bound state to the device defaults.
    fn clear_state(&mut self);

    /// Submits every outstanding command to the device.
    fn flush(&mut self);
}
