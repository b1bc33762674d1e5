// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Helpers shared by the `google-cloud-pager` tests.
//!
//! None of this is meant for production code.

/// Captures spans and events emitted during a test.
pub mod capture;

/// An in-memory implementation of a paged list RPC.
pub mod fake_service;

/// Request and response messages for a typical list RPC.
pub mod model;

/// Installs a `fmt` subscriber for debugging tests.
pub mod tracing;
