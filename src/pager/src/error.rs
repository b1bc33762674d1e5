// Copyright 2024 Google LLC
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

mod core_error;
pub use core_error::*;

/// The status model returned by services when an RPC fails.
///
/// # Examples
///
/// ```
/// # use google_cloud_pager::error;
/// use error::Error;
/// use error::rpc::Code;
/// fn handle_error(e: Error) {
///     if let Some(status) = e.status() {
///         if status.code == Code::NotFound {
///             println!("the collection is gone: {}", status.message);
///         }
///     }
/// }
/// ```
pub mod rpc;
