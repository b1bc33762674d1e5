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

//! These messages mirror the shape of a generated list RPC, such as
//! `google.cloud.resourcemanager.v3.Folders/ListFolders`.

use google_cloud_pager::paginator::{PageableRequest, PageableResponse};

/// A folder, the item type returned by the list RPC.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Folder {
    /// The resource name, e.g. `folders/123`.
    pub name: String,
    /// A user-visible name.
    pub display_name: String,
}

impl Folder {
    /// Sets the value of [name][Folder::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [display_name][Folder::display_name].
    pub fn set_display_name<T: Into<String>>(mut self, v: T) -> Self {
        self.display_name = v.into();
        self
    }
}

/// The request message for `ListFolders`.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct ListFoldersRequest {
    /// The parent resource, e.g. `organizations/123`.
    pub parent: String,
    /// The maximum number of folders per page. Zero selects the service default.
    pub page_size: i32,
    /// The continuation token from a previous response.
    pub page_token: String,
    /// Include folders pending deletion.
    pub show_deleted: bool,
}

impl ListFoldersRequest {
    /// Sets the value of [parent][ListFoldersRequest::parent].
    pub fn set_parent<T: Into<String>>(mut self, v: T) -> Self {
        self.parent = v.into();
        self
    }

    /// Sets the value of [page_size][ListFoldersRequest::page_size].
    pub fn set_page_size<T: Into<i32>>(mut self, v: T) -> Self {
        self.page_size = v.into();
        self
    }

    /// Sets the value of [page_token][ListFoldersRequest::page_token].
    pub fn set_page_token<T: Into<String>>(mut self, v: T) -> Self {
        self.page_token = v.into();
        self
    }

    /// Sets the value of [show_deleted][ListFoldersRequest::show_deleted].
    pub fn set_show_deleted<T: Into<bool>>(mut self, v: T) -> Self {
        self.show_deleted = v.into();
        self
    }
}

impl PageableRequest for ListFoldersRequest {
    fn page_token(&self) -> &str {
        &self.page_token
    }

    fn set_page_token(&mut self, token: String) {
        self.page_token = token;
    }
}

/// The response message for `ListFolders`.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct ListFoldersResponse {
    /// The folders in this page.
    pub folders: Vec<Folder>,
    /// The token for the next page, empty on the last page.
    pub next_page_token: String,
}

impl ListFoldersResponse {
    /// Sets the value of [folders][ListFoldersResponse::folders].
    pub fn set_folders<T, V>(mut self, v: T) -> Self
    where
        T: IntoIterator<Item = V>,
        V: Into<Folder>,
    {
        self.folders = v.into_iter().map(|i| i.into()).collect();
        self
    }

    /// Sets the value of [next_page_token][ListFoldersResponse::next_page_token].
    pub fn set_next_page_token<T: Into<String>>(mut self, v: T) -> Self {
        self.next_page_token = v.into();
        self
    }
}

impl PageableResponse for ListFoldersResponse {
    type PageItem = Folder;

    fn items(self) -> Vec<Folder> {
        self.folders
    }

    fn next_page_token(&self) -> String {
        self.next_page_token.clone()
    }
}

/// Creates a page with folders named after `names`.
pub fn folder_page(names: &[&str], next_page_token: &str) -> ListFoldersResponse {
    ListFoldersResponse::default()
        .set_folders(names.iter().map(|n| Folder::default().set_name(*n)))
        .set_next_page_token(next_page_token)
}
