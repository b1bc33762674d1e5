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

//! These tests drive the blocking paginators against a mocked list RPC and
//! against an in-memory service. The mocks verify the exact sequence of
//! fetches, the in-memory service verifies the paginators work with real
//! opaque tokens.

#[cfg(test)]
mod tests {
    use google_cloud_pager::Result;
    use google_cloud_pager::error::Error;
    use google_cloud_pager::error::rpc::{Code, Status};
    use google_cloud_pager::options::RequestOptions;
    use google_cloud_pager::paginator::{BlockingItemPaginator, BlockingPaginator};
    use google_cloud_test_utils::fake_service::FakeFolders;
    use google_cloud_test_utils::model::{
        Folder, ListFoldersRequest, ListFoldersResponse, folder_page,
    };
    use http::HeaderValue;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    type TestResult = anyhow::Result<()>;

    trait Folders {
        fn list_folders(
            &self,
            request: ListFoldersRequest,
            options: RequestOptions,
        ) -> Result<ListFoldersResponse>;
    }

    mockall::mock! {
        Folders {}
        impl Folders for Folders {
            fn list_folders(&self, request: ListFoldersRequest, options: RequestOptions) -> Result<ListFoldersResponse>;
        }
    }

    fn names(folders: &[Folder]) -> Vec<String> {
        folders.iter().map(|f| f.name.clone()).collect()
    }

    fn request() -> ListFoldersRequest {
        ListFoldersRequest::default()
            .set_parent("organizations/123")
            .set_page_size(2)
    }

    fn unavailable() -> Status {
        Status::default()
            .set_code(Code::Unavailable)
            .set_message("try again later")
    }

    /// Builds a chain of pages, with `counts[i]` folders in page `i`.
    ///
    /// Page `i` links to page `i + 1` with the token `token-{i + 1}`. The
    /// last page has an empty token.
    fn chain(counts: &[usize]) -> Vec<ListFoldersResponse> {
        let mut next = 0;
        counts
            .iter()
            .enumerate()
            .map(|(i, count)| {
                let folders = (next..next + count)
                    .map(|n| Folder::default().set_name(format!("folders/{n}")))
                    .collect::<Vec<_>>();
                next += count;
                let token = if i + 1 < counts.len() {
                    format!("token-{}", i + 1)
                } else {
                    String::new()
                };
                ListFoldersResponse::default()
                    .set_folders(folders)
                    .set_next_page_token(token)
            })
            .collect()
    }

    /// Expects one fetch per page after the first, in order, each with the
    /// previous page's token.
    fn expect_chain(mock: &mut MockFolders, pages: &[ListFoldersResponse]) {
        let mut seq = mockall::Sequence::new();
        for (i, page) in pages.iter().enumerate().skip(1) {
            let want = request().set_page_token(format!("token-{i}"));
            let page = page.clone();
            mock.expect_list_folders()
                .once()
                .in_sequence(&mut seq)
                .withf(move |r, _| r == &want)
                .return_once(move |_, _| Ok(page));
        }
    }

    #[test_case(&[0]; "single empty page")]
    #[test_case(&[2]; "single page")]
    #[test_case(&[2, 2, 1]; "three pages")]
    #[test_case(&[2, 0, 0, 3]; "empty pages in the middle")]
    #[test_case(&[0, 0, 0]; "only empty pages")]
    fn pages_in_order(counts: &[usize]) -> TestResult {
        let pages = chain(counts);
        let mut mock = MockFolders::new();
        expect_chain(&mut mock, &pages);

        let paginator = BlockingPaginator::new(
            |r, o| mock.list_folders(r, o),
            request(),
            pages[0].clone(),
        );
        let got = paginator.collect::<Result<Vec<_>>>()?;
        assert_eq!(got, pages);
        Ok(())
    }

    #[test_case(&[0]; "single empty page")]
    #[test_case(&[2, 2, 1]; "three pages")]
    #[test_case(&[2, 0, 0, 3]; "empty pages in the middle")]
    fn items_in_order(counts: &[usize]) -> TestResult {
        let pages = chain(counts);
        let mut mock = MockFolders::new();
        expect_chain(&mut mock, &pages);

        let items = BlockingPaginator::new(
            |r, o| mock.list_folders(r, o),
            request(),
            pages[0].clone(),
        )
        .items()
        .collect::<Result<Vec<_>>>()?;
        let want = pages
            .iter()
            .flat_map(|p| names(&p.folders))
            .collect::<Vec<_>>();
        assert_eq!(names(&items), want);
        Ok(())
    }

    #[test]
    fn exhausted_paginator_stays_exhausted() -> TestResult {
        let pages = chain(&[1, 1]);
        let mut mock = MockFolders::new();
        expect_chain(&mut mock, &pages);

        let mut paginator = BlockingPaginator::new(
            |r, o| mock.list_folders(r, o),
            request(),
            pages[0].clone(),
        );
        assert_eq!(paginator.by_ref().count(), 2);
        assert!(paginator.next().is_none());
        assert_eq!(paginator.by_ref().count(), 0);

        // A new paginator with the original request and response starts over.
        let fresh = FakeFolders::new(3);
        let first = fresh.list_folders(request(), RequestOptions::default())?;
        let again = BlockingPaginator::new(
            |r, o| fresh.list_folders(r, o),
            request(),
            first.clone(),
        )
        .collect::<Result<Vec<_>>>()?;
        let replay = BlockingPaginator::new(|r, o| fresh.list_folders(r, o), request(), first)
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(again, replay);
        Ok(())
    }

    #[test]
    fn options_forwarded() -> TestResult {
        let mut options = RequestOptions::default();
        options.set_header(
            "x-goog-request-params",
            HeaderValue::from_static("parent=organizations/123"),
        );
        options.set_user_agent("test-only/1.0");

        let service = FakeFolders::new(5);
        let first = service.list_folders(request(), options.clone())?;
        let count = BlockingPaginator::with_options(
            |r, o| service.list_folders(r, o),
            request(),
            first,
            options.clone(),
        )
        .count();
        assert_eq!(count, 3);
        assert_eq!(service.options(), vec![options; 3]);
        Ok(())
    }

    #[test]
    fn fake_service_tokens() -> TestResult {
        let service = FakeFolders::new(7);
        let first = service.list_folders(request(), RequestOptions::default())?;
        let mut paginator =
            BlockingPaginator::new(|r, o| service.list_folders(r, o), request(), first);
        let mut tokens = Vec::new();
        while let Some(page) = paginator.next() {
            tokens.push(page?.next_page_token);
        }

        // Each fetch uses the token from the previous page, and otherwise the
        // same request.
        let requests = service.requests();
        assert_eq!(requests.len(), 4);
        for (want_token, got) in tokens.iter().zip(requests.iter().skip(1)) {
            assert_eq!(got, &request().set_page_token(want_token.clone()));
        }
        assert_eq!(tokens.last().map(String::as_str), Some(""));
        assert_eq!(paginator.request(), requests.last().unwrap());
        Ok(())
    }

    // Two pages, the caller makes the first call.
    #[test]
    fn scenario_a() -> TestResult {
        let service = FakeFolders::new(3);
        let first = service.list_folders(request(), RequestOptions::default())?;
        assert_eq!(first.folders.len(), 2);

        let items = BlockingPaginator::new(|r, o| service.list_folders(r, o), request(), first)
            .items()
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(names(&items), ["folders/0", "folders/1", "folders/2"]);
        assert_eq!(service.calls(), 2);
        Ok(())
    }

    // A single empty page.
    #[test]
    fn scenario_b() -> TestResult {
        let mut mock = MockFolders::new();
        mock.expect_list_folders().never();

        let paginator = BlockingPaginator::new(
            |r, o| mock.list_folders(r, o),
            request(),
            folder_page(&[], ""),
        );
        let pages = paginator.collect::<Result<Vec<_>>>()?;
        assert_eq!(pages, vec![folder_page(&[], "")]);

        let mut items: BlockingItemPaginator<_, _, _> = BlockingPaginator::new(
            |r, o| mock.list_folders(r, o),
            request(),
            folder_page(&[], ""),
        )
        .items();
        assert!(items.next().is_none());
        Ok(())
    }

    // The second call fails.
    #[test]
    fn scenario_c() -> TestResult {
        let service = FakeFolders::new(10).fail_on_call(1, unavailable());
        let first = service.list_folders(request(), RequestOptions::default())?;

        let mut items =
            BlockingPaginator::new(|r, o| service.list_folders(r, o), request(), first).items();
        assert_eq!(
            items.next().transpose()?.map(|f| f.name),
            Some("folders/0".to_string())
        );
        assert_eq!(
            items.next().transpose()?.map(|f| f.name),
            Some("folders/1".to_string())
        );
        let err = items.next().and_then(|r| r.err());
        let status = err.as_ref().and_then(Error::status);
        assert_eq!(status, Some(&unavailable()), "{err:?}");
        assert!(items.next().is_none());
        assert!(items.next().is_none());
        assert_eq!(service.calls(), 2);
        Ok(())
    }

    #[test]
    fn error_with_mock() {
        let pages = chain(&[1, 1, 1]);
        let mut seq = mockall::Sequence::new();
        let mut mock = MockFolders::new();
        mock.expect_list_folders()
            .once()
            .in_sequence(&mut seq)
            .return_once(|_, _| Err(Error::service(unavailable())));

        let got = BlockingPaginator::new(
            |r, o| mock.list_folders(r, o),
            request(),
            pages[0].clone(),
        )
        .map(|r| r.map_err(|e| e.status().cloned()))
        .collect::<Vec<_>>();
        assert_eq!(got, vec![Ok(pages[0].clone()), Err(Some(unavailable()))]);
    }

    #[test]
    fn latest_response() -> TestResult {
        let pages = chain(&[1, 1]);
        let mut mock = MockFolders::new();
        expect_chain(&mut mock, &pages);

        let mut paginator = BlockingPaginator::new(
            |r, o| mock.list_folders(r, o),
            request(),
            pages[0].clone(),
        );
        assert_eq!(paginator.latest_response(), &pages[0]);
        let _ = paginator.next().transpose()?;
        assert_eq!(paginator.latest_response(), &pages[0]);
        let _ = paginator.next().transpose()?;
        assert_eq!(paginator.latest_response(), &pages[1]);
        assert_eq!(paginator.latest_response().next_page_token, "");
        Ok(())
    }

    type ListFn = fn(ListFoldersRequest, RequestOptions) -> Result<ListFoldersResponse>;

    #[test]
    fn send() {
        static_assertions::assert_impl_all!(
            BlockingPaginator<ListFoldersRequest, ListFoldersResponse, ListFn>: Send, Sync
        );
        static_assertions::assert_impl_all!(
            BlockingItemPaginator<ListFoldersRequest, ListFoldersResponse, ListFn>: Send, Iterator
        );
    }
}
