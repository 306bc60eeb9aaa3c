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

//! Provides the backend-agnostic state contracts for the Stratum engine.
//!
//! This module defines the "common language" shared by the pipeline-state cache,
//! the draw submission engine, and the concrete device backends. It contains the
//! abstract `traits` (like [`DeviceContext`] and [`StateObjectFactory`]), the
//! descriptor and binding types, and the error types.
//!
//! The 'how' of state application is handled by a concrete backend in the
//! `stratum-infra` crate, which implements these traits. The `stratum-state` crate
//! then drives those traits without knowing the specifics of the device.

pub mod api;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::{ResourceError, SettingsError};
pub use self::traits::{DeviceContext, StateObjectFactory};
