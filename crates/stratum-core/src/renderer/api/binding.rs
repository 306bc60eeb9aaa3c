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

//! The resource binding set: every buffer, view and sampler bound for a draw.

use super::handles::*;
use std::sync::Arc;

/// A programmable shader stage that resources can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The vertex shader stage.
    Vertex,
    /// The pixel (fragment) shader stage.
    Pixel,
}

/// The format of the indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// Indices are 16-bit unsigned integers.
    Uint16,
    /// Indices are 32-bit unsigned integers.
    #[default]
    Uint32,
}

/// A vertex buffer bound to one input slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBufferBinding {
    /// The buffer holding the vertex data.
    pub buffer: BufferId,
    /// The byte distance between consecutive vertices.
    pub stride: u32,
    /// The byte offset of the first vertex.
    pub offset: u32,
}

/// The bound index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexBufferBinding {
    /// The buffer holding the index data.
    pub buffer: BufferId,
    /// The format of each index.
    pub format: IndexFormat,
    /// The byte offset of the first index.
    pub offset: u32,
}

/// The complete set of resources bound for a draw call.
///
/// Every sequence is an immutable shared slice. Cloning a set is cheap and the
/// clone shares its sequences with the original, which lets the submission engine
/// skip unchanged groups by identity. To change a group, build a new sequence.
#[derive(Debug, Clone)]
pub struct ResourceBindingSet {
    /// The bound render target views, in slot order.
    pub render_targets: Arc<[RenderTargetViewId]>,
    /// The bound depth/stencil view.
    pub depth_stencil_view: Option<DepthStencilViewId>,
    /// The bound vertex buffers, in slot order.
    pub vertex_buffers: Arc<[VertexBufferBinding]>,
    /// The input layout describing the vertex buffers.
    pub input_layout: Option<InputLayoutId>,
    /// The bound index buffer.
    pub index_buffer: Option<IndexBufferBinding>,
    /// Constant buffers bound to the vertex stage.
    pub vertex_constant_buffers: Arc<[BufferId]>,
    /// Constant buffers bound to the pixel stage.
    pub pixel_constant_buffers: Arc<[BufferId]>,
    /// Shader resource views bound to the vertex stage.
    pub vertex_shader_resources: Arc<[ShaderResourceViewId]>,
    /// Shader resource views bound to the pixel stage.
    pub pixel_shader_resources: Arc<[ShaderResourceViewId]>,
    /// Samplers bound to the vertex stage.
    pub vertex_samplers: Arc<[SamplerStateHandle]>,
    /// Samplers bound to the pixel stage.
    pub pixel_samplers: Arc<[SamplerStateHandle]>,
}

impl Default for ResourceBindingSet {
    fn default() -> Self {
        Self {
            render_targets: Vec::new().into(),
            depth_stencil_view: None,
            vertex_buffers: Vec::new().into(),
            input_layout: None,
            index_buffer: None,
            vertex_constant_buffers: Vec::new().into(),
            pixel_constant_buffers: Vec::new().into(),
            vertex_shader_resources: Vec::new().into(),
            pixel_shader_resources: Vec::new().into(),
            vertex_samplers: Vec::new().into(),
            pixel_samplers: Vec::new().into(),
        }
    }
}

impl ResourceBindingSet {
    /// Returns a copy with the given render targets and depth/stencil view.
    #[must_use]
    pub fn with_render_targets(
        mut self,
        targets: impl Into<Arc<[RenderTargetViewId]>>,
        depth_stencil: Option<DepthStencilViewId>,
    ) -> Self {
        self.render_targets = targets.into();
        self.depth_stencil_view = depth_stencil;
        self
    }

    /// Returns a copy with the given vertex buffers and input layout.
    #[must_use]
    pub fn with_vertex_buffers(
        mut self,
        buffers: impl Into<Arc<[VertexBufferBinding]>>,
        layout: Option<InputLayoutId>,
    ) -> Self {
        self.vertex_buffers = buffers.into();
        self.input_layout = layout;
        self
    }

    /// Returns a copy with the given index buffer.
    #[must_use]
    pub fn with_index_buffer(mut self, index_buffer: Option<IndexBufferBinding>) -> Self {
        self.index_buffer = index_buffer;
        self
    }

    /// Returns a copy with the given constant buffers bound to `stage`.
    #[must_use]
    pub fn with_constant_buffers(
        mut self,
        stage: ShaderStage,
        buffers: impl Into<Arc<[BufferId]>>,
    ) -> Self {
        match stage {
            ShaderStage::Vertex => self.vertex_constant_buffers = buffers.into(),
            ShaderStage::Pixel => self.pixel_constant_buffers = buffers.into(),
        }
        self
    }

    /// Returns a copy with the given shader resource views bound to `stage`.
    #[must_use]
    pub fn with_shader_resources(
        mut self,
        stage: ShaderStage,
        views: impl Into<Arc<[ShaderResourceViewId]>>,
    ) -> Self {
        match stage {
            ShaderStage::Vertex => self.vertex_shader_resources = views.into(),
            ShaderStage::Pixel => self.pixel_shader_resources = views.into(),
        }
        self
    }

    /// Returns a copy with the given samplers bound to `stage`.
    #[must_use]
    pub fn with_samplers(
        mut self,
        stage: ShaderStage,
        samplers: impl Into<Arc<[SamplerStateHandle]>>,
    ) -> Self {
        match stage {
            ShaderStage::Vertex => self.vertex_samplers = samplers.into(),
            ShaderStage::Pixel => self.pixel_samplers = samplers.into(),
        }
        self
    }

    /// Returns a copy with the given pixel-stage samplers.
    #[must_use]
    pub fn with_pixel_samplers(self, samplers: impl Into<Arc<[SamplerStateHandle]>>) -> Self {
        self.with_samplers(ShaderStage::Pixel, samplers)
    }

    /// Iterates over the samplers of both stages.
    pub fn samplers(&self) -> impl Iterator<Item = SamplerStateHandle> + '_ {
        self.vertex_samplers
            .iter()
            .chain(self.pixel_samplers.iter())
            .copied()
    }
}
