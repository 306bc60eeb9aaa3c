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

//! Opaque handles to realized device objects and caller-owned resources.
//!
//! Handles are plain copyable integers. Their meaning is defined by the backend
//! that produced them; the engine only compares them for identity.

use std::fmt;

/// An opaque handle to a compiled shader program (vertex or pixel stage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderProgramId(pub usize);

/// An opaque handle to a realized rasterizer state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterStateHandle(pub usize);

/// An opaque handle to a realized depth/stencil state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilStateHandle(pub usize);

/// An opaque handle to a realized blend state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendStateHandle(pub usize);

/// An opaque handle to a realized sampler state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerStateHandle(pub usize);

/// An opaque handle to a GPU buffer (vertex, index or constant data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);

/// An opaque handle to a render target view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetViewId(pub usize);

/// An opaque handle to a depth/stencil view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilViewId(pub usize);

/// An opaque handle to a shader resource view (textures, structured buffers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderResourceViewId(pub usize);

/// An opaque handle to a vertex input layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputLayoutId(pub usize);

/// The kind of a native state object created by a [`StateObjectFactory`].
///
/// [`StateObjectFactory`]: crate::renderer::traits::StateObjectFactory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateObjectKind {
    /// A rasterizer state object.
    Raster,
    /// A depth/stencil state object.
    DepthStencil,
    /// A blend state object.
    Blend,
    /// A sampler state object.
    Sampler,
}

impl fmt::Display for StateObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateObjectKind::Raster => "raster",
            StateObjectKind::DepthStencil => "depth/stencil",
            StateObjectKind::Blend => "blend",
            StateObjectKind::Sampler => "sampler",
        };
        f.write_str(name)
    }
}
