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

use super::rpc::Status;
use http::HeaderMap;
use std::error::Error as StdError;

type BoxError = Box<dyn StdError + Send + Sync>;

/// The error returned by fetch functions that use this crate's error model.
///
/// The paginators do not interpret errors: whatever the fetch function
/// returns is handed to the consumer at the position of the page (or item)
/// that could not be fetched. This type exists so transports and tests have
/// a shared vocabulary for the usual failures: the service rejected the
/// call, the call timed out, credentials were unavailable, or the connection
/// broke.
///
/// # Example
/// ```
/// use google_cloud_pager::error::Error;
/// use google_cloud_pager::error::rpc::{Code, Status};
/// let error = Error::service(Status::default().set_code(Code::Unavailable));
/// match error {
///     e if e.status().is_some() => println!("service error {e}"),
///     e if e.is_timeout() => println!("not enough time {e}"),
///     e => println!("some other error {e}"),
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<BoxError>,
}

impl Error {
    /// Creates an error with the status returned by the service.
    ///
    /// # Example
    /// ```
    /// use google_cloud_pager::error::Error;
    /// use google_cloud_pager::error::rpc::{Code, Status};
    /// let status = Status::default().set_code(Code::NotFound).set_message("NOT FOUND");
    /// let error = Error::service(status.clone());
    /// assert_eq!(error.status(), Some(&status));
    /// ```
    pub fn service(status: Status) -> Self {
        Self::service_with_headers(status, HeaderMap::new())
    }

    /// Creates an error with the status and the response headers (or gRPC
    /// metadata) returned by the service.
    pub fn service_with_headers(status: Status, headers: HeaderMap) -> Self {
        Self {
            kind: ErrorKind::Service(Box::new(ServiceDetails { status, headers })),
            source: None,
        }
    }

    /// The [Status] payload associated with this error, if any.
    pub fn status(&self) -> Option<&Status> {
        match &self.kind {
            ErrorKind::Service(d) => Some(&d.status),
            _ => None,
        }
    }

    /// The headers returned along with a service error, if any.
    pub fn http_headers(&self) -> Option<&HeaderMap> {
        match &self.kind {
            ErrorKind::Service(d) => Some(&d.headers),
            _ => None,
        }
    }

    /// Creates an error representing a timeout.
    ///
    /// # Example
    /// ```
    /// use std::error::Error as _;
    /// use google_cloud_pager::error::Error;
    /// let error = Error::timeout("simulated timeout");
    /// assert!(error.is_timeout());
    /// assert!(error.source().is_some());
    /// ```
    pub fn timeout<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            source: Some(source.into()),
        }
    }

    /// The call did not complete before its deadline.
    ///
    /// This is a client-side error. The service may or may not have
    /// processed the request.
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Creates an error representing a failure to produce credentials.
    pub fn authentication<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Authentication,
            source: Some(source.into()),
        }
    }

    /// The transport could not create the authentication headers.
    ///
    /// # Troubleshooting
    ///
    /// Typically this indicates a misconfigured authentication environment.
    /// Credentials are bound into the fetch function before it reaches the
    /// paginator, consult the documentation of the credentials in use.
    pub fn is_authentication(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication)
    }

    /// Creates an error representing a problem in the transport layer, such
    /// as a broken connection, without a full response.
    pub fn io<T: Into<BoxError>>(source: T) -> Self {
        Self {
            kind: ErrorKind::Io,
            source: Some(source.into()),
        }
    }

    /// The transport failed before a full response was received.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ErrorKind::Io)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.kind, &self.source) {
            (ErrorKind::Service(d), _) => write!(
                f,
                "the service reports an error with code {} described as: {}",
                d.status.code, d.status.message
            ),
            (ErrorKind::Timeout, Some(e)) => {
                write!(f, "the request exceeded the request deadline {e}")
            }
            (ErrorKind::Authentication, Some(e)) => {
                write!(f, "cannot create the authentication headers {e}")
            }
            (ErrorKind::Io, Some(e)) => {
                write!(f, "the transport reports an error: {e}")
            }
            (_, None) => unreachable!("no constructor allows this"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

#[derive(Debug)]
enum ErrorKind {
    Service(Box<ServiceDetails>),
    Timeout,
    Authentication,
    Io,
}

#[derive(Debug)]
struct ServiceDetails {
    status: Status,
    headers: HeaderMap,
}
