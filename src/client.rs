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

//! A minimal HTTP client that announces the lifecycle of its requests.
//!
//! The client never touches the network. [`HttpClient::execute`] hands the request to a
//! caller-supplied round trip and notifies observers before and after it runs, so any transport
//! can be plugged in while observers such as the [`RequestLogger`] see every exchange.

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use jiff::Timestamp;

use crate::Error;
use crate::HttpMethod;
use crate::HttpRequest;
use crate::HttpResponse;
use crate::RequestDescriptor;
use crate::RequestLogger;

/// Receives request lifecycle notifications from an [`HttpClient`].
///
/// For a single request `request_did_start` is always delivered before `request_did_finish`.
/// Notifications for different requests may interleave, and may arrive on any thread that
/// executes requests.
pub trait LifecycleObserver: fmt::Debug + Send + Sync + 'static {
    /// The request is about to be sent.
    fn request_did_start(&self, descriptor: &RequestDescriptor);

    /// The request completed with a response or failed.
    fn request_did_finish(&self, descriptor: &RequestDescriptor);
}

/// Identifies one [`LifecycleObserver`] registration on one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Default)]
struct Observers {
    shut_down: bool,
    next_id: u64,
    entries: Vec<(SubscriptionId, Arc<dyn LifecycleObserver>)>,
}

/// An HTTP client bound to a base URL.
///
/// Each client owns at most one [`RequestLogger`], created on first access through
/// [`ClientLoggerBinding`](crate::ClientLoggerBinding) and dropped with the client.
#[derive(Debug)]
pub struct HttpClient {
    base_url: String,
    next_request_id: AtomicU64,
    observers: Mutex<Observers>,
    pub(crate) logger: Mutex<Option<Arc<RequestLogger>>>,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            next_request_id: AtomicU64::new(1),
            observers: Mutex::new(Observers::default()),
            logger: Mutex::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `path` relative to the base URL.
    pub fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        let path = path.trim_start_matches('/');
        HttpRequest::new(method, format!("{}/{path}", self.base_url))
    }

    /// Register an observer for the lifecycle of every request this client executes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] if the client has been [shut down](HttpClient::shutdown).
    pub fn subscribe(
        &self,
        observer: Arc<dyn LifecycleObserver>,
    ) -> Result<SubscriptionId, Error> {
        let mut observers = self.observers();
        if observers.shut_down {
            return Err(Error::Binding {
                client: self.base_url.clone(),
                reason: "client has been shut down".to_string(),
            });
        }

        observers.next_id += 1;
        let id = SubscriptionId(observers.next_id);
        observers.entries.push((id, observer));
        Ok(id)
    }

    /// Remove a registration. Returns `false` if it was not present.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers();
        let before = observers.entries.len();
        observers.entries.retain(|(entry, _)| *entry != id);
        observers.entries.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers().entries.len()
    }

    /// Tear the client down: drop every observer and refuse new subscriptions.
    pub fn shutdown(&self) {
        let mut observers = self.observers();
        observers.shut_down = true;
        observers.entries.clear();
    }

    pub fn is_shut_down(&self) -> bool {
        self.observers().shut_down
    }

    /// Notify observers that `descriptor` is about to be sent.
    pub fn notify_start(&self, descriptor: &RequestDescriptor) {
        for observer in self.snapshot() {
            observer.request_did_start(descriptor);
        }
    }

    /// Notify observers that `descriptor` has completed.
    pub fn notify_finish(&self, descriptor: &RequestDescriptor) {
        for observer in self.snapshot() {
            observer.request_did_finish(descriptor);
        }
    }

    /// Run one request through `round_trip`, notifying observers around it.
    ///
    /// The result of `round_trip` is returned unchanged. Observers can neither fail nor alter it.
    pub fn execute<E, F>(&self, request: HttpRequest, round_trip: F) -> Result<HttpResponse, E>
    where
        E: fmt::Display,
        F: FnOnce(&HttpRequest) -> Result<HttpResponse, E>,
    {
        let id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let mut descriptor = RequestDescriptor::new(id, request);
        self.notify_start(&descriptor);

        let result = round_trip(&descriptor.request);
        match &result {
            Ok(response) => descriptor.finish(response.clone(), Timestamp::now()),
            Err(err) => descriptor.fail(err, Timestamp::now()),
        }

        self.notify_finish(&descriptor);
        result
    }

    fn observers(&self) -> MutexGuard<'_, Observers> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // observers run outside the lock so that they may subscribe or log freely
    fn snapshot(&self) -> Vec<Arc<dyn LifecycleObserver>> {
        self.observers()
            .entries
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect()
    }
}
