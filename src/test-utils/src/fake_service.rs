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

use crate::model::{Folder, ListFoldersRequest, ListFoldersResponse};
use base64::Engine;
use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use google_cloud_pager::Result;
use google_cloud_pager::error::Error;
use google_cloud_pager::error::rpc::{Code, Status};
use google_cloud_pager::options::RequestOptions;
use std::collections::HashMap;
use std::sync::Mutex;

/// The page size used when the request does not set one.
pub const DEFAULT_PAGE_SIZE: usize = 3;

const TOKEN_PREFIX: &str = "offset=";

/// An in-memory `ListFolders` service.
///
/// Serves a fixed list of folders in pages. The page tokens are opaque to
/// the caller: they encode the offset of the next folder, and the service
/// rejects tokens it did not issue. Every call is recorded, along with the
/// options it received, so tests can verify how many fetches a paginator
/// made and with which tokens.
///
/// # Example
/// ```
/// # use google_cloud_test_utils::fake_service::FakeFolders;
/// # use google_cloud_test_utils::model::ListFoldersRequest;
/// # use google_cloud_pager::options::RequestOptions;
/// let service = FakeFolders::new(5);
/// let request = ListFoldersRequest::default().set_parent("organizations/123").set_page_size(2);
/// let response = service.list_folders(request, RequestOptions::default())?;
/// assert_eq!(response.folders.len(), 2);
/// assert!(!response.next_page_token.is_empty());
/// assert_eq!(service.calls(), 1);
/// # google_cloud_pager::Result::<()>::Ok(())
/// ```
#[derive(Debug, Default)]
pub struct FakeFolders {
    folders: Vec<Folder>,
    failures: HashMap<usize, Status>,
    calls: Mutex<Vec<(ListFoldersRequest, RequestOptions)>>,
}

impl FakeFolders {
    /// A service with `count` folders, named `folders/0` to `folders/{count - 1}`.
    pub fn new(count: usize) -> Self {
        Self::with_folders((0..count).map(|i| {
            Folder::default()
                .set_name(format!("folders/{i}"))
                .set_display_name(format!("Folder {i}"))
        }))
    }

    /// A service returning the given folders.
    pub fn with_folders<I: IntoIterator<Item = Folder>>(folders: I) -> Self {
        Self {
            folders: folders.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Makes the `call`-th call (starting at zero) fail with `status`.
    pub fn fail_on_call(mut self, call: usize, status: Status) -> Self {
        self.failures.insert(call, status);
        self
    }

    /// All the folders, in the order they are served.
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// The number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The requests received so far, in order.
    pub fn requests(&self) -> Vec<ListFoldersRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(r, _)| r.clone())
            .collect()
    }

    /// The options received so far, in order.
    pub fn options(&self) -> Vec<RequestOptions> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, o)| o.clone())
            .collect()
    }

    /// The page tokens received so far, in order.
    pub fn tokens(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.page_token).collect()
    }

    /// Returns one page of folders.
    pub fn list_folders(
        &self,
        request: ListFoldersRequest,
        options: RequestOptions,
    ) -> Result<ListFoldersResponse> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((request.clone(), options));
            calls.len() - 1
        };
        if let Some(status) = self.failures.get(&call) {
            return Err(Error::service(status.clone()));
        }
        let page_size = match request.page_size {
            n if n < 0 => return Err(invalid_argument("page_size must not be negative")),
            0 => DEFAULT_PAGE_SIZE,
            n => n as usize,
        };
        let start = decode_token(&request.page_token)?;
        if start > self.folders.len() {
            return Err(invalid_argument("page_token is out of range"));
        }
        let end = std::cmp::min(start + page_size, self.folders.len());
        let next_page_token = if end < self.folders.len() {
            encode_token(end)
        } else {
            String::new()
        };
        Ok(ListFoldersResponse::default()
            .set_folders(self.folders[start..end].iter().cloned())
            .set_next_page_token(next_page_token))
    }

    /// The async version of [list_folders][FakeFolders::list_folders].
    pub async fn list_folders_async(
        &self,
        request: ListFoldersRequest,
        options: RequestOptions,
    ) -> Result<ListFoldersResponse> {
        self.list_folders(request, options)
    }
}

fn invalid_argument(message: &str) -> Error {
    Error::service(
        Status::default()
            .set_code(Code::InvalidArgument)
            .set_message(message),
    )
}

fn encode_token(offset: usize) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(format!("{TOKEN_PREFIX}{offset}"))
}

fn decode_token(token: &str) -> Result<usize> {
    if token.is_empty() {
        return Ok(0);
    }
    BASE64_URL_SAFE_NO_PAD
        .decode(token)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .and_then(|s| s.strip_prefix(TOKEN_PREFIX).map(str::to_string))
        .and_then(|offset| offset.parse::<usize>().ok())
        .ok_or_else(|| invalid_argument("invalid page_token"))
}
