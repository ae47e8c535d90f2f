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

use crate::format::LifecycleEvent;

/// The error type of httplog.
///
/// Only [`Error::Binding`] and [`Error::Config`] are ever returned to callers. Formatter and sink
/// failures are swallowed by the [`RequestLogger`](crate::RequestLogger) and handed to its
/// [`Trap`](crate::Trap) instead, so that logging can never fail a request.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to bind logger to client {client:?}: {reason}")]
    Binding { client: String, reason: String },
    #[error("formatter failed on request {event} event: {source:#}")]
    Formatter {
        event: LifecycleEvent,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to write log line: {source:#}")]
    Sink {
        #[source]
        source: anyhow::Error,
    },
    #[error("malformed {key} value: {value:?}")]
    Config { key: &'static str, value: String },
}

impl Error {
    /// Wrap a sink failure.
    pub fn sink(source: impl Into<anyhow::Error>) -> Error {
        Error::Sink {
            source: source.into(),
        }
    }

    /// Default constructor for [`Error`] from [`std::io::Error`].
    pub fn from_io_error(err: std::io::Error) -> Error {
        Error::sink(err)
    }
}
