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

//! Statistics gathered by a draw context.

/// Counters for the draw calls submitted through one draw context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStatistics {
    /// The number of draw commands issued to the device.
    pub draw_calls: u64,
    /// The number of submissions that changed at least one pipeline component.
    pub pipeline_state_changes: u64,
    /// The number of submissions that rebound at least one resource group.
    pub binding_changes: u64,
    /// The number of submissions that changed at least one per-draw parameter.
    pub per_draw_changes: u64,
    /// The number of submissions that changed nothing but issued the draw.
    pub redundant_submissions: u64,
}

impl DrawStatistics {
    /// The fraction of submissions that needed no state change, in `[0, 1]`.
    pub fn redundancy_ratio(&self) -> f64 {
        if self.draw_calls == 0 {
            0.0
        } else {
            self.redundant_submissions as f64 / self.draw_calls as f64
        }
    }
}
