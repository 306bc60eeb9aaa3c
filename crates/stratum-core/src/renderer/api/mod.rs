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

//! Public API data types for state management.
//!
//! These are plain value types: descriptors that describe state objects, opaque
//! handles to realized objects, resource binding sets, and per-draw parameters.

pub mod binding;
pub mod core;
pub mod draw;
pub mod handles;
pub mod pipeline;
pub mod sampler;

pub use self::binding::*;
pub use self::core::*;
pub use self::draw::*;
pub use self::handles::*;
pub use self::pipeline::*;
pub use self::sampler::*;
