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

//! Engine-wide settings for the state cache and the submission engine.

use crate::renderer::api::draw::MAX_VIEWPORTS;
use crate::renderer::api::pipeline::MAX_RENDER_TARGETS;
use crate::renderer::error::SettingsError;
use serde::{Deserialize, Serialize};

/// The largest number of cache entries that may be reserved up front.
pub const MAX_INITIAL_CACHE_CAPACITY: usize = 4096;

/// Limits and toggles applied by the caches and draw contexts.
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// The maximum number of render targets a binding set may bind.
    pub max_render_targets: usize,
    /// The maximum number of per-target blend descriptors in a pipeline state.
    pub max_blend_targets: usize,
    /// The maximum number of viewports a draw call may bind.
    pub max_viewports: usize,
    /// The maximum number of scissor rectangles a draw call may bind.
    pub max_scissor_rects: usize,
    /// The number of cache entries to reserve up front.
    pub initial_cache_capacity: usize,
    /// If `true`, sampler caches register the predefined samplers on creation.
    pub register_default_samplers: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_render_targets: MAX_RENDER_TARGETS,
            max_blend_targets: MAX_RENDER_TARGETS,
            max_viewports: MAX_VIEWPORTS,
            max_scissor_rects: MAX_VIEWPORTS,
            initial_cache_capacity: 64,
            register_default_samplers: true,
        }
    }
}

impl EngineSettings {
    /// Parses settings from a JSON document and validates them.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serializes the settings to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that every limit is non-zero and within what the device supports,
    /// and that the initial cache capacity is at most [`MAX_INITIAL_CACHE_CAPACITY`].
    pub fn validate(&self) -> Result<(), SettingsError> {
        let limits = [
            ("max_render_targets", self.max_render_targets, MAX_RENDER_TARGETS),
            ("max_blend_targets", self.max_blend_targets, MAX_RENDER_TARGETS),
            ("max_viewports", self.max_viewports, MAX_VIEWPORTS),
            ("max_scissor_rects", self.max_scissor_rects, MAX_VIEWPORTS),
        ];
        for (name, value, max) in limits {
            if value == 0 || value > max {
                return Err(SettingsError::InvalidLimit { name, value, max });
            }
        }
        if self.initial_cache_capacity > MAX_INITIAL_CACHE_CAPACITY {
            return Err(SettingsError::InvalidLimit {
                name: "initial_cache_capacity",
                value: self.initial_cache_capacity,
                max: MAX_INITIAL_CACHE_CAPACITY,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = EngineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.max_render_targets, 8);
        assert_eq!(settings.max_viewports, 16);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let settings =
            EngineSettings::from_json_str(r#"{ "max_viewports": 4, "register_default_samplers": false }"#)
                .unwrap();
        assert_eq!(settings.max_viewports, 4);
        assert!(!settings.register_default_samplers);
        assert_eq!(settings.max_render_targets, 8);
    }

    #[test]
    fn out_of_range_limit_is_rejected() {
        let err = EngineSettings::from_json_str(r#"{ "max_render_targets": 9 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidLimit {
                name: "max_render_targets",
                value: 9,
                max: 8
            }
        ));
    }

    #[test]
    fn oversized_cache_capacity_is_rejected() {
        let err = EngineSettings::from_json_str(r#"{ "initial_cache_capacity": 18446744073709551615 }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidLimit {
                name: "initial_cache_capacity",
                max: MAX_INITIAL_CACHE_CAPACITY,
                ..
            }
        ));
        let empty = EngineSettings {
            initial_cache_capacity: 0,
            ..EngineSettings::default()
        };
        assert!(empty.validate().is_ok());
    }

    #[test]
    fn json_round_trip() {
        let settings = EngineSettings {
            initial_cache_capacity: 8,
            ..EngineSettings::default()
        };
        let json = settings.to_json_string().unwrap();
        assert_eq!(EngineSettings::from_json_str(&json).unwrap(), settings);
    }
}
