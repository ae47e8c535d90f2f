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

use std::sync::Arc;
use std::sync::PoisonError;

use crate::Error;
use crate::HttpClient;
use crate::RequestLogger;
use crate::RequestLoggerBuilder;

/// Attaches one [`RequestLogger`] to each [`HttpClient`], on demand.
///
/// The first call for a client builds a logger, stores it in the client and subscribes it to the
/// client's request lifecycle. Later calls return the same logger.
///
/// # Examples
///
/// ```
/// use httplog::ClientLoggerBinding;
/// use httplog::HttpClient;
///
/// let client = HttpClient::new("http://localhost:3000");
/// let logger = ClientLoggerBinding::get_logger(&client).unwrap();
/// logger.set_enabled(true);
///
/// let again = ClientLoggerBinding::get_logger(&client).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&logger, &again));
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub struct ClientLoggerBinding {}

impl ClientLoggerBinding {
    /// Return the logger of `client`, creating it with default settings if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] if the client has no logger yet and can no longer accept
    /// subscriptions.
    pub fn get_logger(client: &HttpClient) -> Result<Arc<RequestLogger>, Error> {
        Self::get_logger_with(client, RequestLoggerBuilder::default)
    }

    /// Return the logger of `client`, creating it from `builder` if needed.
    ///
    /// `builder` runs without holding any lock on the client, so it may itself access the
    /// client's logger. If another caller attaches a logger in the meantime, that logger is
    /// returned and the one built here is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] if the client has no logger yet and can no longer accept
    /// subscriptions. Nothing is stored in that case.
    pub fn get_logger_with(
        client: &HttpClient,
        builder: impl FnOnce() -> RequestLoggerBuilder,
    ) -> Result<Arc<RequestLogger>, Error> {
        if let Some(logger) = Self::bound_logger(client) {
            return Ok(logger);
        }

        let logger = Arc::new(builder().build());

        let mut slot = client.logger.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = slot.as_ref() {
            return Ok(existing.clone());
        }
        client.subscribe(logger.clone())?;
        log::debug!("attached request logger to client {}", client.base_url());

        *slot = Some(logger.clone());
        Ok(logger)
    }

    /// Return the logger of `client` without creating one.
    pub fn bound_logger(client: &HttpClient) -> Option<Arc<RequestLogger>> {
        client
            .logger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Gives [`HttpClient`] a `logger()` accessor backed by [`ClientLoggerBinding`].
pub trait HttpClientExt {
    /// The client's logger. A logger will be created if one doesn't already exist.
    fn logger(&self) -> Result<Arc<RequestLogger>, Error>;
}

impl HttpClientExt for HttpClient {
    fn logger(&self) -> Result<Arc<RequestLogger>, Error> {
        ClientLoggerBinding::get_logger(self)
    }
}
