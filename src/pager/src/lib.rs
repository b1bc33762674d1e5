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

//! Pagination helpers for list RPCs.
//!
//! Many Google Cloud services return large collections in pages. Each
//! response carries a batch of items and an opaque `next_page_token`. Sending
//! the same request again, with the `page_token` field set to that value,
//! returns the following page. An empty token marks the last page.
//!
//! This crate turns that protocol into iterators and streams. The
//! [paginator] module is the entry point:
//!
//! - [BlockingPaginator][paginator::BlockingPaginator] and
//!   [BlockingItemPaginator][paginator::BlockingItemPaginator] implement
//!   [Iterator] over pages and items respectively.
//! - [Paginator][paginator::Paginator] and
//!   [ItemPaginator][paginator::ItemPaginator] implement
//!   [futures::Stream] over pages and items respectively.
//!
//! The paginators never perform I/O when constructed. The application (or
//! the generated client) makes the first call and hands both the request and
//! the response to the paginator, along with a function to fetch more pages.
//!
//! # Example
//!
//! ```
//! # use google_cloud_pager::paginator::{BlockingPaginator, PageableRequest, PageableResponse};
//! # use google_cloud_pager::options::RequestOptions;
//! #[derive(Clone, Default)]
//! struct ListRequest { page_token: String }
//! #[derive(Clone, Default)]
//! struct ListResponse { names: Vec<String>, next_page_token: String }
//!
//! impl PageableRequest for ListRequest {
//!     fn page_token(&self) -> &str { &self.page_token }
//!     fn set_page_token(&mut self, token: String) { self.page_token = token; }
//! }
//! impl PageableResponse for ListResponse {
//!     type PageItem = String;
//!     fn items(self) -> Vec<String> { self.names }
//!     fn next_page_token(&self) -> String { self.next_page_token.clone() }
//! }
//!
//! // Stands in for a real RPC.
//! let list = |req: ListRequest, _: RequestOptions| -> google_cloud_pager::Result<ListResponse> {
//!     Ok(match req.page_token.as_str() {
//!         "" => ListResponse { names: vec!["a".into(), "b".into()], next_page_token: "p2".into() },
//!         _ => ListResponse { names: vec!["c".into()], next_page_token: String::new() },
//!     })
//! };
//!
//! let request = ListRequest::default();
//! let first = list(request.clone(), RequestOptions::default())?;
//! let names = BlockingPaginator::new(list, request, first)
//!     .items()
//!     .collect::<google_cloud_pager::Result<Vec<_>>>()?;
//! assert_eq!(names, ["a", "b", "c"]);
//! # google_cloud_pager::Result::<()>::Ok(())
//! ```

/// An alias of [std::result::Result] where the error is always [crate::error::Error].
///
/// Fetch functions are free to use any error type. This alias is a
/// convenience for those that use the error model in this crate.
pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// The error model for fetch functions and transports.
pub mod error;

/// Per-call options forwarded on every page fetch.
pub mod options;

/// Page and item iteration over list RPCs.
pub mod paginator;

/// Tracing support for fetch functions.
pub mod observability;
