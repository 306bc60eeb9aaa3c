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

use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// Creates and releases the native state objects the caches hold on to.
///
/// Implementations must be thread-safe; the caches call them from whichever
/// thread misses, outside of any cache lock.
pub trait StateObjectFactory: Send + Sync + Debug + 'static {
    /// Creates a rasterizer state object.
    /// ## Arguments
    /// * `descriptor` - The rasterizer configuration.
    /// ## Returns
    /// A `Result` containing the handle of the created object.
    /// ## Errors
    /// * `ResourceError` - If the backend cannot create the object.
    fn create_raster_state(
        &self,
        descriptor: &RasterStateDescriptor,
    ) -> Result<RasterStateHandle, ResourceError>;

    /// Creates a depth/stencil state object.
    /// ## Errors
    /// * `ResourceError` - If the backend cannot create the object.
    fn create_depth_stencil_state(
        &self,
        descriptor: &DepthStencilStateDescriptor,
    ) -> Result<DepthStencilStateHandle, ResourceError>;

    /// Creates a blend state object covering every render target.
    /// ## Errors
    /// * `ResourceError` - If the backend cannot create the object.
    fn create_blend_state(
        &self,
        descriptor: &BlendStateDescriptor,
    ) -> Result<BlendStateHandle, ResourceError>;

    /// Creates a sampler state object.
    /// ## Errors
    /// * `ResourceError` - If the backend cannot create the object.
    fn create_sampler_state(
        &self,
        descriptor: &SamplerStateDescriptor,
    ) -> Result<SamplerStateHandle, ResourceError>;

    /// Releases a rasterizer state object.
    /// ## Errors
    /// * `ResourceError` - If the handle is unknown or already released.
    fn release_raster_state(&self, handle: RasterStateHandle) -> Result<(), ResourceError>;

    /// Releases a depth/stencil state object.
    fn release_depth_stencil_state(
        &self,
        handle: DepthStencilStateHandle,
    ) -> Result<(), ResourceError>;

    /// Releases a blend state object.
    fn release_blend_state(&self, handle: BlendStateHandle) -> Result<(), ResourceError>;

    /// Releases a sampler state object.
    fn release_sampler_state(&self, handle: SamplerStateHandle) -> Result<(), ResourceError>;
}
