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

//! The paginators never emit logs or traces on their own. Applications that
//! want to observe each page fetch wrap the fetch function in [TracedFetch]:
//!
//! ```
//! # use google_cloud_pager::observability::TracedFetch;
//! # use google_cloud_pager::paginator::{BlockingPaginator, PageableRequest, PageableResponse};
//! # use google_cloud_pager::options::RequestOptions;
//! # #[derive(Clone, Default)]
//! # struct ListRequest { page_token: String }
//! # #[derive(Clone, Default)]
//! # struct ListResponse { names: Vec<String>, next_page_token: String }
//! # impl PageableRequest for ListRequest {
//! #     fn page_token(&self) -> &str { &self.page_token }
//! #     fn set_page_token(&mut self, token: String) { self.page_token = token; }
//! # }
//! # impl PageableResponse for ListResponse {
//! #     type PageItem = String;
//! #     fn items(self) -> Vec<String> { self.names }
//! #     fn next_page_token(&self) -> String { self.next_page_token.clone() }
//! # }
//! fn list(req: ListRequest, _: RequestOptions) -> google_cloud_pager::Result<ListResponse> {
//!     // ... details omitted ...
//!     # Ok(ListResponse::default())
//! }
//! let request = ListRequest::default();
//! let response = list(request.clone(), RequestOptions::default())?;
//! let fetch = TracedFetch::new(list, "google.cloud.resourcemanager.v3.Folders/ListFolders");
//! for page in BlockingPaginator::new(fetch, request, response) {
//!     let _ = page?;
//! }
//! # google_cloud_pager::Result::<()>::Ok(())
//! ```
//!
//! Events are emitted through the [tracing] crate. Installing a subscriber
//! is left to the application.

use crate::options::RequestOptions;
use crate::paginator::{AsyncFetchPage, FetchPage, PageableRequest, PageableResponse};
use pin_project::{pin_project, pinned_drop};
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

/// Decorates a fetch function with a `tracing` span per page fetch.
///
/// Works with both the blocking and the async paginators. Each fetch runs
/// inside an `INFO` span named `fetch_page`, with these fields:
///
/// - `rpc.method`: the name given to [TracedFetch::new].
/// - `page.token_present`: `true` if the request carries a page token.
///
/// A successful fetch emits a `DEBUG` event with `page.has_next`. A failed
/// fetch emits a `WARN` event with the error.
#[derive(Clone, Debug)]
pub struct TracedFetch<F> {
    inner: F,
    rpc: &'static str,
}

impl<F> TracedFetch<F> {
    /// Wraps `inner`, labeling its spans with `rpc`.
    pub fn new(inner: F, rpc: &'static str) -> Self {
        Self { inner, rpc }
    }

    /// The wrapped fetch function.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    fn span<Req: PageableRequest>(&self, request: &Req) -> tracing::Span {
        tracing::info_span!(
            "fetch_page",
            rpc.method = self.rpc,
            page.token_present = !request.page_token().is_empty()
        )
    }
}

fn record<Resp, E>(result: &Result<Resp, E>)
where
    Resp: PageableResponse,
    E: Display,
{
    match result {
        Ok(page) => tracing::debug!(
            page.has_next = !page.next_page_token().is_empty(),
            "page fetched"
        ),
        Err(e) => tracing::warn!(error = %e, "page fetch failed"),
    }
}

impl<F, Req, Resp> FetchPage<Req, Resp> for TracedFetch<F>
where
    F: FetchPage<Req, Resp>,
    F::Error: Display,
    Req: PageableRequest,
    Resp: PageableResponse,
{
    type Error = F::Error;

    fn fetch(&self, request: Req, options: RequestOptions) -> Result<Resp, Self::Error> {
        self.span(&request).in_scope(|| {
            let result = FetchPage::fetch(&self.inner, request, options);
            record(&result);
            result
        })
    }
}

impl<F, Req, Resp> AsyncFetchPage<Req, Resp> for TracedFetch<F>
where
    F: AsyncFetchPage<Req, Resp>,
    F::Error: Display,
    Req: PageableRequest,
    Resp: PageableResponse,
{
    type Error = F::Error;
    type Future = TracedFuture<F::Future>;

    fn fetch(&self, request: Req, options: RequestOptions) -> Self::Future {
        let span = self.span(&request);
        let inner = span.in_scope(|| AsyncFetchPage::fetch(&self.inner, request, options));
        TracedFuture {
            inner,
            span,
            completed: false,
        }
    }
}

/// The future returned by the async [TracedFetch].
///
/// Enters the span on every poll. If dropped before it completes, records
/// the cancellation.
#[pin_project(PinnedDrop)]
pub struct TracedFuture<F> {
    #[pin]
    inner: F,
    span: tracing::Span,
    completed: bool,
}

#[pinned_drop]
impl<F> PinnedDrop for TracedFuture<F> {
    fn drop(self: Pin<&mut Self>) {
        if !self.completed {
            self.span
                .in_scope(|| tracing::debug!("page fetch cancelled"));
        }
    }
}

impl<F, Resp, E> Future for TracedFuture<F>
where
    F: Future<Output = Result<Resp, E>>,
    Resp: PageableResponse,
    E: Display,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _guard = this.span.enter();
        let result = ready!(this.inner.poll(cx));
        *this.completed = true;
        record(&result);
        Poll::Ready(result)
    }
}

impl<F> std::fmt::Debug for TracedFuture<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracedFuture")
            .field("span", &self.span)
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}
