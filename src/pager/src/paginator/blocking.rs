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
use std::iter::FusedIterator;

/// Fetches one page of a list RPC, blocking the calling thread.
///
/// Implementations have all the parameters other than the page token
/// already bound: the service endpoint, credentials, and so on. This trait
/// is implemented for any `Fn(Req, RequestOptions) -> Result<Resp, E>`.
pub trait FetchPage<Req, Resp> {
    /// The error returned when the page cannot be fetched.
    type Error;

    /// Makes the call and returns the page.
    fn fetch(&self, request: Req, options: RequestOptions) -> Result<Resp, Self::Error>;
}

impl<F, Req, Resp, E> FetchPage<Req, Resp> for F
where
    F: Fn(Req, RequestOptions) -> Result<Resp, E>,
{
    type Error = E;
    fn fetch(&self, request: Req, options: RequestOptions) -> Result<Resp, E> {
        self(request, options)
    }
}

/// An [Iterator] over the pages of a list RPC.
///
/// Each call to `next()` after the first one may block while the next page
/// is fetched.
///
/// # Example
/// ```
/// # use google_cloud_pager::paginator::{BlockingPaginator, PageableRequest, PageableResponse};
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
/// fn list(req: ListRequest, _: RequestOptions) -> google_cloud_pager::Result<ListResponse> {
///     // ... details omitted ...
///     # Ok(ListResponse::default())
/// }
///
/// let request = ListRequest::default();
/// let response = list(request.clone(), RequestOptions::default())?;
/// for page in BlockingPaginator::new(list, request, response) {
///     let page = page?;
///     println!("got {} names", page.names.len());
/// }
/// # google_cloud_pager::Result::<()>::Ok(())
/// ```
pub struct BlockingPaginator<Req, Resp, F> {
    state: PageState<Req, Resp>,
    fetch: F,
}

impl<Req, Resp, F> BlockingPaginator<Req, Resp, F>
where
    Req: PageableRequest + Clone,
    Resp: PageableResponse + Clone,
    F: FetchPage<Req, Resp>,
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
        }
    }

    /// Converts the paginator into an iterator over the items in each page.
    pub fn items(self) -> BlockingItemPaginator<Req, Resp, F> {
        BlockingItemPaginator {
            pages: self,
            current: Vec::new().into_iter(),
        }
    }
}

impl<Req, Resp, F> BlockingPaginator<Req, Resp, F> {
    /// The most recently fetched page.
    ///
    /// This reflects only the latest page, never an aggregate over all the
    /// pages seen so far.
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

impl<Req, Resp, F> Iterator for BlockingPaginator<Req, Resp, F>
where
    Req: PageableRequest + Clone,
    Resp: PageableResponse + Clone,
    F: FetchPage<Req, Resp>,
{
    type Item = Result<Resp, F::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state.advance() {
            Next::Yield(page) => Some(Ok(page)),
            Next::Fetch(request, options) => {
                let result = self.fetch.fetch(request, options);
                Some(self.state.complete(result))
            }
            Next::Finished => None,
        }
    }
}

impl<Req, Resp, F> FusedIterator for BlockingPaginator<Req, Resp, F>
where
    Req: PageableRequest + Clone,
    Resp: PageableResponse + Clone,
    F: FetchPage<Req, Resp>,
{
}

impl<Req, Resp, F> std::fmt::Debug for BlockingPaginator<Req, Resp, F>
where
    Resp: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingPaginator")
            .field("latest_response", self.state.latest())
            .finish_non_exhaustive()
    }
}

/// An [Iterator] over the items of a list RPC.
///
/// Returned by [BlockingPaginator::items]. Produces all the items of the
/// first page, then all the items of the second page, and so on. If a page
/// cannot be fetched the error is produced in place of the next item, and
/// the iteration ends.
pub struct BlockingItemPaginator<Req, Resp, F>
where
    Resp: PageableResponse,
{
    pages: BlockingPaginator<Req, Resp, F>,
    current: std::vec::IntoIter<Resp::PageItem>,
}

impl<Req, Resp, F> BlockingItemPaginator<Req, Resp, F>
where
    Resp: PageableResponse,
{
    /// The most recently fetched page.
    pub fn latest_response(&self) -> &Resp {
        self.pages.latest_response()
    }
}

impl<Req, Resp, F> Iterator for BlockingItemPaginator<Req, Resp, F>
where
    Req: PageableRequest + Clone,
    Resp: PageableResponse + Clone,
    F: FetchPage<Req, Resp>,
{
    type Item = Result<Resp::PageItem, F::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.current.next() {
                return Some(Ok(item));
            }
            match self.pages.next()? {
                Ok(page) => self.current = page.items().into_iter(),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<Req, Resp, F> FusedIterator for BlockingItemPaginator<Req, Resp, F>
where
    Req: PageableRequest + Clone,
    Resp: PageableResponse + Clone,
    F: FetchPage<Req, Resp>,
{
}

impl<Req, Resp, F> std::fmt::Debug for BlockingItemPaginator<Req, Resp, F>
where
    Resp: PageableResponse + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingItemPaginator")
            .field("latest_response", self.pages.latest_response())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::super::state::tests::*;
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    type TestResult = anyhow::Result<()>;

    /// Serves canned responses and records every request it receives.
    struct Canned {
        responses: RefCell<VecDeque<Result<TestResponse, String>>>,
        requests: RefCell<Vec<TestRequest>>,
    }

    impl Canned {
        fn new<I: IntoIterator<Item = Result<TestResponse, String>>>(responses: I) -> Self {
            Self {
                responses: RefCell::new(responses.into_iter().collect()),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn call(&self, request: TestRequest) -> Result<TestResponse, String> {
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err("unexpected fetch".to_string()))
        }

        fn fetcher(
            &self,
        ) -> impl Fn(TestRequest, RequestOptions) -> Result<TestResponse, String> + '_ {
            move |request, _options| self.call(request)
        }
    }

    #[test]
    fn pages() -> TestResult {
        let canned = Canned::new([Ok(page(&["c"], "t2")), Ok(page(&["d", "e"], ""))]);
        let first = page(&["a", "b"], "t1");
        let paginator = BlockingPaginator::new(canned.fetcher(), request("parent"), first.clone());
        let got = paginator.collect::<Result<Vec<_>, _>>().map_err(anyhow::Error::msg)?;
        assert_eq!(
            got,
            vec![first, page(&["c"], "t2"), page(&["d", "e"], "")]
        );

        let tokens = canned
            .requests
            .borrow()
            .iter()
            .map(|r| r.page_token.clone())
            .collect::<Vec<_>>();
        assert_eq!(tokens, ["t1", "t2"]);
        Ok(())
    }

    #[test]
    fn items() -> TestResult {
        let canned = Canned::new([Ok(page(&[], "t2")), Ok(page(&["c"], ""))]);
        let paginator =
            BlockingPaginator::new(canned.fetcher(), request("parent"), page(&["a", "b"], "t1"));
        let got = paginator
            .items()
            .collect::<Result<Vec<_>, _>>()
            .map_err(anyhow::Error::msg)?;
        assert_eq!(got, ["a", "b", "c"]);
        assert_eq!(canned.requests.borrow().len(), 2);
        Ok(())
    }

    #[test]
    fn no_fetch_on_construction() {
        let canned = Canned::new([]);
        let paginator =
            BlockingPaginator::new(canned.fetcher(), request("parent"), page(&["a"], "t1"));
        assert!(canned.requests.borrow().is_empty());
        drop(paginator);
        assert!(canned.requests.borrow().is_empty());
    }

    #[test]
    fn error_is_last() {
        let canned = Canned::new([Err("unavailable".to_string()), Ok(page(&["x"], ""))]);
        let mut items =
            BlockingPaginator::new(canned.fetcher(), request("parent"), page(&["a"], "t1")).items();
        assert_eq!(items.next(), Some(Ok("a".to_string())));
        assert_eq!(items.next(), Some(Err("unavailable".to_string())));
        assert_eq!(items.next(), None);
        assert_eq!(items.next(), None);
        assert_eq!(canned.requests.borrow().len(), 1);
    }

    #[test]
    fn exhausted_stays_exhausted() {
        let canned = Canned::new([Ok(page(&["b"], ""))]);
        let mut paginator =
            BlockingPaginator::new(canned.fetcher(), request("parent"), page(&["a"], "t1"));
        assert_eq!(paginator.by_ref().count(), 2);
        assert_eq!(paginator.next(), None);
        assert_eq!(paginator.by_ref().count(), 0);
        assert_eq!(canned.requests.borrow().len(), 1);
    }

    #[test]
    fn latest_response() {
        let canned = Canned::new([Ok(page(&["b"], "t2")), Ok(page(&["c"], ""))]);
        let mut paginator =
            BlockingPaginator::new(canned.fetcher(), request("parent"), page(&["a"], "t1"));
        assert_eq!(paginator.latest_response(), &page(&["a"], "t1"));
        let _ = paginator.next();
        assert_eq!(paginator.latest_response(), &page(&["a"], "t1"));
        let _ = paginator.next();
        assert_eq!(paginator.latest_response(), &page(&["b"], "t2"));
        assert_eq!(paginator.request().page_token, "t1");
        let _ = paginator.next();
        assert_eq!(paginator.latest_response(), &page(&["c"], ""));
        assert_eq!(paginator.request().page_token, "t2");
        assert_eq!(paginator.request().parent, "parent");
    }

    #[test]
    fn caller_request_is_not_modified() {
        let canned = Canned::new([Ok(page(&[], ""))]);
        let original = request("parent");
        let paginator = BlockingPaginator::new(canned.fetcher(), original.clone(), page(&[], "t1"));
        assert_eq!(paginator.count(), 2);
        assert_eq!(original.page_token, "");
    }

    #[test]
    fn closure_fetch() -> TestResult {
        let fetch = |req: TestRequest, _: RequestOptions| -> Result<TestResponse, String> {
            match req.page_token.as_str() {
                "t1" => Ok(page(&["b"], "")),
                t => Err(format!("unexpected token {t}")),
            }
        };
        let items = BlockingPaginator::new(fetch, request("parent"), page(&["a"], "t1"))
            .items()
            .collect::<Result<Vec<_>, _>>()
            .map_err(anyhow::Error::msg)?;
        assert_eq!(items, ["a", "b"]);
        Ok(())
    }

    #[test]
    fn request_through_lifecycle() {
        let canned = Canned::new([Ok(page(&["b"], "t2")), Err("unavailable".to_string())]);
        let mut paginator =
            BlockingPaginator::new(canned.fetcher(), request("parent"), page(&["a"], "t1"));
        assert_eq!(paginator.request(), &request("parent"));
        let _ = paginator.next();
        assert_eq!(paginator.request(), &request("parent"));

        assert_eq!(paginator.next(), Some(Ok(page(&["b"], "t2"))));
        assert_eq!(paginator.request().page_token, "t1");

        assert_eq!(paginator.next(), Some(Err("unavailable".to_string())));
        let failed = canned.requests.borrow().last().cloned();
        assert_eq!(Some(paginator.request()), failed.as_ref());
        assert_eq!(paginator.request().page_token, "t2");
        assert_eq!(paginator.next(), None);
    }

    #[test]
    fn debug() {
        let paginator = BlockingPaginator::new(
            |_: TestRequest, _: RequestOptions| Err::<TestResponse, String>("unused".into()),
            request("parent"),
            page(&["a"], "t1"),
        );
        let got = format!("{paginator:?}");
        assert!(got.contains("BlockingPaginator"), "{got}");
        assert!(got.contains("t1"), "{got}");
        let got = format!("{:?}", paginator.items());
        assert!(got.contains("BlockingItemPaginator"), "{got}");
    }
}
