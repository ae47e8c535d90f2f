// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Plain-data views of HTTP exchanges.
//!
//! The client fills these in and hands them to lifecycle observers by reference. The logger
//! reads them but never constructs or mutates them.

use std::fmt;

use jiff::SignedDuration;
use jiff::Timestamp;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "UPPERCASE"))]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Create a request without headers or body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// A single request/response exchange as seen by lifecycle observers.
///
/// At the start event only `request` and `started_at` are meaningful. At the finish event
/// `finished_at` is set, and exactly one of `response` or `error` is usually present.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RequestDescriptor {
    /// Sequence number of the request within its client.
    pub id: u64,
    pub request: HttpRequest,
    pub response: Option<HttpResponse>,
    /// Transport failure reported by the host, if the round trip did not produce a response.
    pub error: Option<String>,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
}

impl RequestDescriptor {
    /// Describe a request that is about to start now.
    pub fn new(id: u64, request: HttpRequest) -> Self {
        Self::started_at(id, request, Timestamp::now())
    }

    pub fn started_at(id: u64, request: HttpRequest, started_at: Timestamp) -> Self {
        Self {
            id,
            request,
            response: None,
            error: None,
            started_at,
            finished_at: None,
        }
    }

    /// Record a response and the time it completed.
    pub fn finish(&mut self, response: HttpResponse, finished_at: Timestamp) {
        self.response = Some(response);
        self.finished_at = Some(finished_at);
    }

    /// Record a transport failure and the time it was observed.
    pub fn fail(&mut self, error: impl fmt::Display, finished_at: Timestamp) {
        self.error = Some(error.to_string());
        self.finished_at = Some(finished_at);
    }

    pub fn method(&self) -> HttpMethod {
        self.request.method
    }

    pub fn url(&self) -> &str {
        &self.request.url
    }

    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Wall time between start and finish, `None` while the request is in flight.
    pub fn elapsed(&self) -> Option<SignedDuration> {
        self.finished_at
            .map(|finished| finished.duration_since(self.started_at))
    }
}
