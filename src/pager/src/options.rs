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

//! Per-call options.
//!
//! A list RPC is often made with call-scoped metadata, for example, routing
//! headers or a custom user agent. A paginator captures these options when
//! it is created and forwards them, unchanged, to every subsequent fetch. The
//! fetch function (typically a generated client method) is responsible for
//! applying them to the request.

use http::HeaderMap;
use http::HeaderValue;
use http::header::IntoHeaderName;

/// A set of options configuring a single call.
///
/// Applications only use this type directly in fetch functions and mocks,
/// where they may want to verify the right metadata was forwarded.
///
/// # Example
/// ```
/// # use google_cloud_pager::options::RequestOptions;
/// use http::HeaderValue;
/// let mut options = RequestOptions::default();
/// options.set_header("x-goog-request-params", HeaderValue::from_static("parent=folders/123"));
/// options.set_user_agent("my-app/1.0");
/// assert_eq!(options.headers().len(), 1);
/// assert_eq!(options.user_agent().as_deref(), Some("my-app/1.0"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
    headers: HeaderMap,
    user_agent: Option<String>,
}

impl RequestOptions {
    /// Adds a header (gRPC metadata entry) sent with every call.
    ///
    /// Replaces any previous values for the same name.
    pub fn set_header<K: IntoHeaderName>(&mut self, name: K, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// Adds a header, keeping any previous values for the same name.
    pub fn append_header<K: IntoHeaderName>(&mut self, name: K, value: HeaderValue) {
        self.headers.append(name, value);
    }

    /// The headers sent with every call.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Prepends this prefix to the user agent header value.
    pub fn set_user_agent<T: Into<String>>(&mut self, v: T) {
        self.user_agent = Some(v.into());
    }

    /// Gets the current user-agent prefix.
    pub fn user_agent(&self) -> &Option<String> {
        &self.user_agent
    }
}

impl From<HeaderMap> for RequestOptions {
    fn from(headers: HeaderMap) -> Self {
        Self {
            headers,
            ..Default::default()
        }
    }
}
