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

//! httplog provides configurable request logging for HTTP clients.
//!
//! # Overview
//!
//! A [`RequestLogger`] observes the start and finish of every request made by one
//! [`HttpClient`]. For each event it asks a [`Formatter`] for a line, passing the logger's
//! [`LogLevel`], and writes whatever comes back to one or more [`Append`]s. Logging is off until
//! enabled, and nothing that goes wrong while logging can fail a request: errors are handed to a
//! [`Trap`] instead.
//!
//! # Examples
//!
//! Enable the default text output for a client:
//!
//! ```
//! use httplog::HttpClient;
//! use httplog::HttpClientExt;
//! use httplog::HttpMethod;
//! use httplog::HttpResponse;
//!
//! let client = HttpClient::new("http://localhost:3000");
//! client.logger().unwrap().set_enabled(true);
//!
//! let request = client.request(HttpMethod::Get, "todos");
//! let response = client
//!     .execute(request, |_| Ok::<_, std::io::Error>(HttpResponse::new(200)))
//!     .unwrap();
//! assert_eq!(response.status, 200);
//! ```
//!
//! Supply custom formatters and capture output:
//!
//! ```
//! use httplog::ClientLoggerBinding;
//! use httplog::HttpClient;
//! use httplog::HttpMethod;
//! use httplog::HttpResponse;
//! use httplog::RequestLogger;
//! use httplog::append::Testing;
//! use httplog::format::CustomFormatter;
//!
//! let client = HttpClient::new("http://example.com");
//! let capture = Testing::default();
//! let logger = ClientLoggerBinding::get_logger_with(&client, || {
//!     RequestLogger::builder()
//!         .enabled(true)
//!         .start_formatter(CustomFormatter::new(|req, _| Some(format!("START {}", req.url()))))
//!         .append(capture.clone())
//! })
//! .unwrap();
//! assert!(logger.is_enabled());
//!
//! client
//!     .execute(client.request(HttpMethod::Get, "/"), |_| {
//!         Ok::<_, std::io::Error>(HttpResponse::new(200))
//!     })
//!     .unwrap();
//! assert_eq!(capture.lines()[0], "START http://example.com/");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod append;
pub mod format;
pub mod trap;

mod binding;
mod client;
mod descriptor;
mod error;
mod level;
mod logger;

pub use self::append::Append;
pub use self::binding::ClientLoggerBinding;
pub use self::binding::HttpClientExt;
pub use self::client::HttpClient;
pub use self::client::LifecycleObserver;
pub use self::client::SubscriptionId;
pub use self::descriptor::HttpMethod;
pub use self::descriptor::HttpRequest;
pub use self::descriptor::HttpResponse;
pub use self::descriptor::RequestDescriptor;
pub use self::error::Error;
pub use self::format::Formatter;
pub use self::format::LifecycleEvent;
pub use self::level::LogLevel;
pub use self::logger::RequestLogger;
pub use self::logger::RequestLoggerBuilder;
pub use self::trap::Trap;
