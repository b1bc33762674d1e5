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

use super::state::{Next, PageState};
use super::{PageableRequest, PageableResponse};
use crate::options::RequestOptions;
use futures::stream::FusedStream;
use futures::{Stream, StreamExt};
use pin_project::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

/// Fetches one page of a list RPC asynchronously.
///
/// Implementations have all the parameters other than the page token
/// already bound: the service endpoint, credentials, and so on. This trait
/// is implemented for any `Fn(Req, RequestOptions) -> Fut` where `Fut`
/// resolves to `Result<Resp, E>`, which includes async closures.
pub trait AsyncFetchPage<Req, Resp> {
    /// The error returned when the page cannot be fetched.
    type Error;

    /// The future returned by [fetch][AsyncFetchPage::fetch].
    type Future: Future<Output = Result<Resp, Self::Error>>;

    /// Starts the call. The page is ready when the future resolves.
    fn fetch(&self, request: Req, options: RequestOptions) -> Self::Future;
}

impl<F, Fut, Req, Resp, E> AsyncFetchPage<Req, Resp> for F
where
    F: Fn(Req, RequestOptions) -> Fut,
    Fut: Future<Output = Result<Resp, E>>,
{
    type Error = E;
    type Future = Fut;
    fn fetch(&self, request: Req, options: RequestOptions) -> Fut {
        self(request, options)
    }
}

/// A [Stream] over the pages of a list RPC.
///
/// Polling the stream may suspend the task while the next page is fetched.
/// Only one fetch is in flight at a time, and a fetch starts only after the
/// previous page was consumed.
///
/// If the consumer stops waiting for a page (e.g. the `next()` future is
/// dropped in a `select!`), the fetch remains pending inside the paginator,
/// and the following `next()` resumes it. Dropping the paginator cancels
/// any pending fetch.
///
/// # Example
/// ```
/// # use google_cloud_pager::paginator::{Paginator, PageableRequest, PageableResponse};
/// # use google_cloud_pager::options::RequestOptions;
/// # #[derive(Clone, Default)]
/// # struct ListRequest { page_token: String }
/// # #[derive(Clone, Default)]
/// # struct ListResponse { names: Vec<String>, next_page_token: String }
/// # impl PageableRequest for ListRequest {
/// #     fn page_token(&self) -> &str { &self.page_token }
/// #     fn set_page_token(&mut self, token: String) { self.page_token = token; }
/// # }
/// # impl PageableResponse for ListResponse {
/// #     type PageItem = String;
/// #     fn items(self) -> Vec<String> { self.names }
/// #     fn next_page_token(&self) -> String { self.next_page_token.clone() }
/// # }
/// async fn list(req: ListRequest, _: RequestOptions) -> google_cloud_pager::Result<ListResponse> {
///     // ... details omitted ...
///     # Ok(ListResponse::default())
/// }
///
/// # tokio_test::block_on(async {
/// let request = ListRequest::default();
/// let response = list(request.clone(), RequestOptions::default()).await?;
/// let mut pages = Paginator::new(list, request, response);
/// while let Some(page) = pages.next().await {
///     let page = page?;
///     println!("got {} names", page.names.len());
/// }
/// # google_cloud_pager::Result::<()>::Ok(()) });
/// ```
pub struct Paginator<Req, Resp, F>
where
    F: AsyncFetchPage<Req, Resp>,
{
    state: PageState<Req, Resp>,
    fetch: F,
    pending: Option<Pin<Box<F::Future>>>,
}

impl<Req, Resp, F> Paginator<Req, Resp, F>
where
    Req: PageableRequest + Clone,
    Resp: PageableResponse + Clone,
    F: AsyncFetchPage<Req, Resp>,
{
    /// Creates a paginator from the initial request and its response.
    ///
    /// The `response` must be the result of calling `fetch` with `request`.
    /// Creating the paginator makes no calls.
    pub fn new(fetch: F, request: Req, response: Resp) -> Self {
        Self::with_options(fetch, request, response, RequestOptions::default())
    }

    /// Creates a paginator that forwards `options` on every fetch.
    pub fn with_options(fetch: F, request: Req, response: Resp, options: RequestOptions) -> Self {
        Self {
            state: PageState::new(request, response, options),
            fetch,
            pending: None,
        }
    }

    /// Returns the next page.
    pub fn next(&mut self) -> futures::stream::Next<'_, Self> {
        StreamExt::next(self)
    }

    /// Converts the paginator into a stream over the items in each page.
    pub fn items(self) -> ItemPaginator<Req, Resp, F> {
        ItemPaginator {
            pages: self,
            current: Vec::new().into_iter(),
        }
    }
}

impl<Req, Resp, F> Paginator<Req, Resp, F>
where
    F: AsyncFetchPage<Req, Resp>,
{
    /// The most recently fetched page.
    ///
    /// This reflects only the latest page, never an aggregate over all the
    /// pages seen so far. A fetch in progress does not change it.
    pub fn latest_response(&self) -> &Resp {
        self.state.latest()
    }

    /// The request used for the most recent fetch.
    ///
    /// Before the first fetch this is the initial request. After a failed
    /// fetch it is the request that failed.
    pub fn request(&self) -> &Req {
        self.state.request()
    }

    /// The options forwarded on each fetch.
    pub fn options(&self) -> &RequestOptions {
        self.state.options()
    }
}

// The pending fetch is boxed, so moving the paginator never moves it.
impl<Req, Resp, F> Unpin for Paginator<Req, Resp, F> where F: AsyncFetchPage<Req, Resp> {}

impl<Req, Resp, F> Stream for Paginator<Req, Resp, F>
where
    Req: PageableRequest + Clone,
    Resp: PageableResponse + Clone,
    F: AsyncFetchPage<Req, Resp>,
{
    type Item = Result<Resp, F::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(pending) = this.pending.as_mut() {
                let result = ready!(pending.as_mut().poll(cx));
                this.pending = None;
                return Poll::Ready(Some(this.state.complete(result)));
            }
            match this.state.advance() {
                Next::Yield(page) => return Poll::Ready(Some(Ok(page))),
                Next::Fetch(request, options) => {
                    this.pending = Some(Box::pin(this.fetch.fetch(request, options)));
                }
                Next::Finished => return Poll::Ready(None),
            }
        }
    }
}

impl<Req, Resp, F> FusedStream for Paginator<Req, Resp, F>
where
    Req: PageableRequest + Clone,
    Resp: PageableResponse + Clone,
    F: AsyncFetchPage<Req, Resp>,
{
    fn is_terminated(&self) -> bool {
        self.pending.is_none() && self.state.is_done()
    }
}

impl<Req, Resp, F> std::fmt::Debug for Paginator<Req, Resp, F>
where
    Resp: std::fmt::Debug,
    F: AsyncFetchPage<Req, Resp>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("latest_response", self.state.latest())
            .field("fetch_pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

/// A [Stream] over the items of a list RPC.
///
/// Returned by [Paginator::items]. Produces all the items of the first page,
/// then all the items of the second page, and so on. Items already in hand
/// are produced without suspending. If a page cannot be fetched the error is
/// produced in place of the next item, and the stream ends.
#[pin_project]
pub struct ItemPaginator<Req, Resp, F>
where
    Resp: PageableResponse,
    F: AsyncFetchPage<Req, Resp>,
{
    #[pin]
    pages: Paginator<Req, Resp, F>,
    current: std::vec::IntoIter<Resp::PageItem>,
}

impl<Req, Resp, F> ItemPaginator<Req, Resp, F>
where
    Req: PageableRequest + Clone,
    Resp: PageableResponse + Clone,
    F: AsyncFetchPage<Req, Resp>,
{
    /// Returns the next item.
    pub fn next(&mut self) -> futures::stream::Next<'_, Self>
    where
        Self: Unpin,
    {
        StreamExt::next(self)
    }
}

impl<Req, Resp, F> ItemPaginator<Req, Resp, F>
where
    Resp: PageableResponse,
    F: AsyncFetchPage<Req, Resp>,
{
    /// The most recently fetched page.
    pub fn latest_response(&self) -> &Resp {
        self.pages.latest_response()
    }
}

impl<Req, Resp, F> Stream for ItemPaginator<Req, Resp, F>
where
    Req: PageableRequest + Clone,
    Resp: PageableResponse + Clone,
    F: AsyncFetchPage<Req, Resp>,
{
    type Item = Result<Resp::PageItem, F::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            if let Some(item) = this.current.next() {
                return Poll::Ready(Some(Ok(item)));
            }
            match ready!(this.pages.as_mut().poll_next(cx)) {
                Some(Ok(page)) => *this.current = page.items().into_iter(),
                Some(Err(e)) => return Poll::Ready(Some(Err(e))),
                None => return Poll::Ready(None),
            }
        }
    }
}

impl<Req, Resp, F> FusedStream for ItemPaginator<Req, Resp, F>
where
    Req: PageableRequest + Clone,
    Resp: PageableResponse + Clone,
    F: AsyncFetchPage<Req, Resp>,
{
    fn is_terminated(&self) -> bool {
        self.current.len() == 0 && self.pages.is_terminated()
    }
}

impl<Req, Resp, F> std::fmt::Debug for ItemPaginator<Req, Resp, F>
where
    Resp: PageableResponse + std::fmt::Debug,
    F: AsyncFetchPage<Req, Resp>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemPaginator")
            .field("latest_response", self.pages.latest_response())
            .finish_non_exhaustive()
    }
}
