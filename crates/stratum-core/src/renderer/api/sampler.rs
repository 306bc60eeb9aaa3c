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

//! Sampler state descriptors and the predefined sampler configurations.

use crate::math::LinearRgba;
use crate::renderer::api::pipeline::CompareFunction;
use std::hash::{Hash, Hasher};

/// Defines how texture coordinates outside the `[0, 1]` range are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    /// Coordinates wrap around. `1.1` becomes `0.1`.
    Repeat,
    /// Coordinates are clamped to the edge. `1.1` becomes `1.0`.
    #[default]
    ClampToEdge,
    /// Coordinates wrap around, mirroring at each integer boundary.
    MirrorRepeat,
    /// Coordinates outside the range are given the border color.
    ClampToBorder,
}

/// Defines the filtering mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Point sampling. Returns the value of the nearest texel.
    Nearest,
    /// Linear interpolation between the nearest texels.
    #[default]
    Linear,
    /// Anisotropic filtering, limited by `max_anisotropy`.
    Anisotropic,
}

/// Describes a sampler state object.
///
/// Floating-point fields compare by exact bit pattern.
#[derive(Debug, Clone, Copy)]
pub struct SamplerStateDescriptor {
    /// The address mode for the U texture coordinate.
    pub address_mode_u: AddressMode,
    /// The address mode for the V texture coordinate.
    pub address_mode_v: AddressMode,
    /// The address mode for the W texture coordinate.
    pub address_mode_w: AddressMode,
    /// The filter used for minification, magnification and mip selection.
    pub filter: FilterMode,
    /// The bias added to the computed mip level.
    pub mip_lod_bias: f32,
    /// The minimum level of detail to use for mipmapping.
    pub lod_min_clamp: f32,
    /// The maximum level of detail to use for mipmapping.
    pub lod_max_clamp: f32,
    /// If `Some`, creates a comparison sampler for tasks like shadow mapping.
    pub compare: Option<CompareFunction>,
    /// The maximum anisotropy level, used with [`FilterMode::Anisotropic`].
    pub max_anisotropy: u16,
    /// The border color used with [`AddressMode::ClampToBorder`].
    pub border_color: LinearRgba,
}

impl Default for SamplerStateDescriptor {
    fn default() -> Self {
        Self {
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            address_mode_w: AddressMode::ClampToEdge,
            filter: FilterMode::Linear,
            mip_lod_bias: 0.0,
            lod_min_clamp: f32::MIN,
            lod_max_clamp: f32::MAX,
            compare: None,
            max_anisotropy: 1,
            border_color: LinearRgba::WHITE,
        }
    }
}

impl PartialEq for SamplerStateDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.address_mode_u == other.address_mode_u
            && self.address_mode_v == other.address_mode_v
            && self.address_mode_w == other.address_mode_w
            && self.filter == other.filter
            && self.mip_lod_bias.to_bits() == other.mip_lod_bias.to_bits()
            && self.lod_min_clamp.to_bits() == other.lod_min_clamp.to_bits()
            && self.lod_max_clamp.to_bits() == other.lod_max_clamp.to_bits()
            && self.compare == other.compare
            && self.max_anisotropy == other.max_anisotropy
            && self.border_color.bits_eq(&other.border_color)
    }
}

impl Eq for SamplerStateDescriptor {}

impl Hash for SamplerStateDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address_mode_u.hash(state);
        self.address_mode_v.hash(state);
        self.address_mode_w.hash(state);
        self.filter.hash(state);
        self.mip_lod_bias.to_bits().hash(state);
        self.lod_min_clamp.to_bits().hash(state);
        self.lod_max_clamp.to_bits().hash(state);
        self.compare.hash(state);
        self.max_anisotropy.hash(state);
        self.border_color.hash_bits(state);
    }
}

impl SamplerStateDescriptor {
    fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode_u = mode;
        self.address_mode_v = mode;
        self.address_mode_w = mode;
        self
    }

    /// Linear filtering with wrapping texture coordinates.
    pub fn linear_wrap() -> Self {
        Self::default().with_address_mode(AddressMode::Repeat)
    }

    /// Anisotropic filtering (16x) with wrapping texture coordinates.
    pub fn anisotropic() -> Self {
        Self {
            filter: FilterMode::Anisotropic,
            max_anisotropy: 16,
            ..Self::linear_wrap()
        }
    }

    /// Point filtering with clamped texture coordinates.
    pub fn point() -> Self {
        Self {
            filter: FilterMode::Nearest,
            ..Self::default()
        }
    }

    /// Point filtering with wrapping texture coordinates.
    pub fn point_wrap() -> Self {
        Self {
            filter: FilterMode::Nearest,
            ..Self::linear_wrap()
        }
    }
}

/// The sampler configurations every sampler cache provides out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedSampler {
    /// Linear filtering, clamped coordinates. Same as [`SamplerStateDescriptor::default`].
    Default,
    /// Linear filtering, wrapping coordinates.
    Wrapping,
    /// Anisotropic filtering, wrapping coordinates.
    Anisotropic,
    /// Point filtering, clamped coordinates.
    Point,
    /// Point filtering, wrapping coordinates.
    PointWrapping,
}

impl PredefinedSampler {
    /// Every predefined sampler, in registration order.
    pub const ALL: [PredefinedSampler; 5] = [
        PredefinedSampler::Default,
        PredefinedSampler::Wrapping,
        PredefinedSampler::Anisotropic,
        PredefinedSampler::Point,
        PredefinedSampler::PointWrapping,
    ];

    /// Returns the descriptor for this predefined sampler.
    pub fn descriptor(self) -> SamplerStateDescriptor {
        match self {
            PredefinedSampler::Default => SamplerStateDescriptor::default(),
            PredefinedSampler::Wrapping => SamplerStateDescriptor::linear_wrap(),
            PredefinedSampler::Anisotropic => SamplerStateDescriptor::anisotropic(),
            PredefinedSampler::Point => SamplerStateDescriptor::point(),
            PredefinedSampler::PointWrapping => SamplerStateDescriptor::point_wrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_descriptors_are_distinct() {
        let all: Vec<_> = PredefinedSampler::ALL.iter().map(|p| p.descriptor()).collect();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn equality_is_bit_exact() {
        let a = SamplerStateDescriptor::default();
        let b = SamplerStateDescriptor {
            mip_lod_bias: -0.0,
            ..a
        };
        assert_ne!(a, b);
        assert_eq!(a, SamplerStateDescriptor::default());
    }
}
