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

//! Defines the error types for state object management and configuration.

use crate::renderer::api::handles::StateObjectKind;
use std::fmt;

/// An error related to the creation or release of a native state object.
#[derive(Debug)]
pub enum ResourceError {
    /// The backend refused to create a state object from the given descriptor.
    CreationFailed {
        /// The kind of state object that failed.
        kind: StateObjectKind,
        /// Detailed error message from the backend.
        details: String,
    },
    /// The handle used to reference a state object is invalid or already released.
    InvalidHandle {
        /// The kind of state object the handle refers to.
        kind: StateObjectKind,
        /// The raw handle value.
        handle: usize,
    },
    /// The backend ran out of memory or object slots.
    OutOfMemory,
    /// An error originating from the specific backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::CreationFailed { kind, details } => {
                write!(f, "Failed to create {kind} state object: {details}")
            }
            ResourceError::InvalidHandle { kind, handle } => {
                write!(f, "Invalid {kind} state handle: {handle}")
            }
            ResourceError::OutOfMemory => write!(f, "Out of memory for state objects."),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// An error raised while loading or validating [`EngineSettings`].
///
/// [`EngineSettings`]: crate::renderer::api::core::EngineSettings
#[derive(Debug)]
pub enum SettingsError {
    /// The settings document could not be parsed.
    Parse(serde_json::Error),
    /// A limit is zero or exceeds what the engine supports.
    InvalidLimit {
        /// The name of the offending setting.
        name: &'static str,
        /// The configured value.
        value: usize,
        /// The largest accepted value.
        max: usize,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Parse(err) => write!(f, "Failed to parse engine settings: {err}"),
            SettingsError::InvalidLimit { name, value, max } => {
                write!(f, "Setting '{name}' must be in 1..={max}, got {value}")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn resource_error_display() {
        let err = ResourceError::CreationFailed {
            kind: StateObjectKind::DepthStencil,
            details: "unsupported compare function".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Failed to create depth/stencil state object: unsupported compare function"
        );

        let err = ResourceError::InvalidHandle {
            kind: StateObjectKind::Blend,
            handle: 7,
        };
        assert_eq!(format!("{err}"), "Invalid blend state handle: 7");
    }

    #[test]
    fn settings_error_wraps_parse_error() {
        let parse_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: SettingsError = parse_err.into();
        assert!(format!("{err}").starts_with("Failed to parse engine settings:"));
        assert!(err.source().is_some());

        let err = SettingsError::InvalidLimit {
            name: "max_viewports",
            value: 0,
            max: 16,
        };
        assert_eq!(
            format!("{err}"),
            "Setting 'max_viewports' must be in 1..=16, got 0"
        );
        assert!(err.source().is_none());
    }
}
