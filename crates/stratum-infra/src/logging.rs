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

//! Logger setup for binaries and tests.

use env_logger::{Builder, Env};

/// Initializes the global logger from `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    init_with_default_filter("info");
}

/// Initializes the global logger from `RUST_LOG`, falling back to `filter`.
pub fn init_with_default_filter(filter: &str) {
    if Builder::from_env(Env::default().default_filter_or(filter))
        .try_init()
        .is_err()
    {
        log::trace!("Logger already initialized");
    }
}
