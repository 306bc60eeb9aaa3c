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

//! Defines the `LinearRgba` color type used for blend factors and border colors.

use serde::{Deserialize, Serialize};

/// Represents a color in a **linear RGBA** color space using `f32` components.
///
/// `#[repr(C)]` ensures a consistent memory layout, which is important when passing
/// color data to graphics APIs.
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct LinearRgba {
    /// The red component in linear space.
    pub r: f32,
    /// The green component in linear space.
    pub g: f32,
    /// The blue component in linear space.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

impl LinearRgba {
    /// Opaque white (`[1.0, 1.0, 1.0, 1.0]`).
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black (`[0.0, 0.0, 0.0, 1.0]`).
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Fully transparent black (`[0.0, 0.0, 0.0, 0.0]`).
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new `LinearRgba` with explicit RGBA values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque `LinearRgba` (alpha = 1.0).
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Returns the components as `[r, g, b, a]`.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Compares two colors by the exact bit pattern of each component.
    ///
    /// Unlike `==`, this treats `0.0` and `-0.0` as different and a NaN as equal
    /// to an identical NaN.
    #[inline]
    pub fn bits_eq(&self, other: &Self) -> bool {
        self.r.to_bits() == other.r.to_bits()
            && self.g.to_bits() == other.g.to_bits()
            && self.b.to_bits() == other.b.to_bits()
            && self.a.to_bits() == other.a.to_bits()
    }

    /// Hashes the exact bit pattern of each component.
    pub fn hash_bits<H: std::hash::Hasher>(&self, state: &mut H) {
        use std::hash::Hash;
        bytemuck::bytes_of(self).hash(state);
    }
}

impl Default for LinearRgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[f32; 4]> for LinearRgba {
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}
