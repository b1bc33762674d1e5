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

use super::{PageableRequest, PageableResponse};
use crate::options::RequestOptions;

/// The page-advance algorithm shared by the blocking and async paginators.
///
/// The adapters call [advance][PageState::advance] to learn what to do
/// next, and report the result of any fetch via
/// [complete][PageState::complete].
#[derive(Clone, Debug)]
pub(crate) struct PageState<Req, Resp> {
    request: Req,
    latest: Resp,
    options: RequestOptions,
    step: Step,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Step {
    Initial,
    Advance,
    Done,
}

/// What the adapter must do to produce the next page.
#[derive(Debug, PartialEq)]
pub(crate) enum Next<Req, Resp> {
    /// Produce this page, no fetch needed.
    Yield(Resp),
    /// Fetch the next page with this request and options.
    Fetch(Req, RequestOptions),
    /// The sequence is over.
    Finished,
}

impl<Req, Resp> PageState<Req, Resp>
where
    Req: PageableRequest + Clone,
    Resp: PageableResponse + Clone,
{
    pub fn new(request: Req, response: Resp, options: RequestOptions) -> Self {
        Self {
            request,
            latest: response,
            options,
            step: Step::Initial,
        }
    }

    pub fn advance(&mut self) -> Next<Req, Resp> {
        match self.step {
            Step::Initial => {
                self.step = Step::Advance;
                Next::Yield(self.latest.clone())
            }
            Step::Advance => {
                let token = self.latest.next_page_token();
                if token.is_empty() {
                    self.step = Step::Done;
                    return Next::Finished;
                }
                self.request.set_page_token(token);
                Next::Fetch(self.request.clone(), self.options.clone())
            }
            Step::Done => Next::Finished,
        }
    }

    pub fn complete<E>(&mut self, result: Result<Resp, E>) -> Result<Resp, E> {
        match result {
            Ok(page) => {
                self.latest = page.clone();
                Ok(page)
            }
            Err(e) => {
                self.step = Step::Done;
                Err(e)
            }
        }
    }

    pub fn is_done(&self) -> bool {
        self.step == Step::Done
    }
}

impl<Req, Resp> PageState<Req, Resp> {
    pub fn latest(&self) -> &Resp {
        &self.latest
    }

    pub fn request(&self) -> &Req {
        &self.request
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }
}
