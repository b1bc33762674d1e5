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

//! Adapters that convert list RPCs as defined by
//! [AIP-4233](https://google.aip.dev/client-libraries/4233) into iterators
//! and streams.
//!
//! Each adapter starts from a response the caller already has, and fetches
//! more pages on demand:
//!
//! 1. The first page produced is the initial response. No fetch is made.
//! 1. While the most recent page has a non-empty `next_page_token`, the
//!    adapter copies that token into its own copy of the request, calls the
//!    fetch function with the request and the call options, and produces
//!    the result.
//! 1. The sequence ends after the first page with an empty token.
//!
//! If a fetch fails, the error is produced in place of the page, and the
//! sequence ends. Exhausted adapters stay exhausted, create a new one to
//! start over.
//!
//! The item adapters flatten the pages, in order, into their items. They
//! never fetch a page on their own.

mod blocking;
mod state;
mod stream;

pub use blocking::{BlockingItemPaginator, BlockingPaginator, FetchPage};
pub use stream::{AsyncFetchPage, ItemPaginator, Paginator};

/// A request for a list RPC.
///
/// The paginators treat the token as opaque: they only copy it from the
/// previous response.
pub trait PageableRequest {
    /// The token used to request a specific page.
    fn page_token(&self) -> &str;

    /// Sets the token for the next page.
    fn set_page_token(&mut self, token: String);
}

/// A response for a list RPC.
pub trait PageableResponse {
    /// The type of the items in each page.
    type PageItem;

    /// Consumes the page, returning its items in order.
    fn items(self) -> Vec<Self::PageItem>;

    /// The token to fetch the next page. Empty if this is the last page.
    fn next_page_token(&self) -> String;
}
