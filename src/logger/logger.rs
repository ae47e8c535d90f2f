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

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::Append;
use crate::Error;
use crate::Formatter;
use crate::LifecycleObserver;
use crate::LogLevel;
use crate::RequestDescriptor;
use crate::Trap;
use crate::format::FormatterRegistry;
use crate::format::LifecycleEvent;
use crate::logger::RequestLoggerBuilder;

/// Logs the start and finish of every request made by one HTTP client.
///
/// A logger is disabled by default. Once [enabled](RequestLogger::set_enabled), each lifecycle
/// event is passed with the current [`LogLevel`] to the formatter registered for that event, and
/// any non-empty line it returns is written to every configured [`Append`].
///
/// The level is never used to filter events here; it is handed to the formatter, which decides
/// what to print.
///
/// Configuration may be changed while requests are in flight. Every change publishes a new
/// immutable snapshot, and each event reads exactly one snapshot, so an event never sees a
/// half-applied update.
///
/// Nothing that goes wrong while logging reaches the caller: formatter errors, formatter panics
/// and sink failures are reported to the logger's [`Trap`] and the line is dropped.
#[derive(Debug)]
pub struct RequestLogger {
    config: ArcSwap<Config>,
    appends: Vec<Box<dyn Append>>,
    trap: Box<dyn Trap>,
}

#[derive(Debug, Clone)]
pub(super) struct Config {
    pub(super) enabled: bool,
    pub(super) level: LogLevel,
    pub(super) formatters: FormatterRegistry,
}

impl Default for RequestLogger {
    fn default() -> Self {
        RequestLoggerBuilder::default().build()
    }
}

impl RequestLogger {
    /// Create a new [`RequestLoggerBuilder`].
    pub fn builder() -> RequestLoggerBuilder {
        RequestLoggerBuilder::default()
    }

    pub(super) fn new(config: Config, appends: Vec<Box<dyn Append>>, trap: Box<dyn Trap>) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            appends,
            trap,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.load().enabled
    }

    /// Turn logging on or off. Defaults to off.
    pub fn set_enabled(&self, enabled: bool) {
        self.update(|config| config.enabled = enabled);
    }

    pub fn level(&self) -> LogLevel {
        self.config.load().level
    }

    /// Set the level passed to formatters. Defaults to [`LogLevel::Info`].
    pub fn set_level(&self, level: LogLevel) {
        self.update(|config| config.level = level);
    }

    /// Return the formatter currently registered for `event`.
    pub fn formatter(&self, event: LifecycleEvent) -> Option<Arc<dyn Formatter>> {
        self.config.load().formatters.get(event)
    }

    /// Replace the formatter for `event`. `None` disables logging of that event even while the
    /// logger is enabled.
    pub fn set_formatter(&self, event: LifecycleEvent, formatter: Option<Box<dyn Formatter>>) {
        let formatter: Option<Arc<dyn Formatter>> = formatter.map(Arc::from);
        self.update(|config| config.formatters.set_shared(event, formatter.clone()));
    }

    /// Replace the formatter for request start events.
    pub fn set_start_formatter(&self, formatter: impl Formatter) {
        self.set_formatter(LifecycleEvent::Start, Some(Box::new(formatter)));
    }

    /// Stop logging request start events.
    pub fn clear_start_formatter(&self) {
        self.set_formatter(LifecycleEvent::Start, None);
    }

    /// Replace the formatter for request finish events.
    pub fn set_finish_formatter(&self, formatter: impl Formatter) {
        self.set_formatter(LifecycleEvent::Finish, Some(Box::new(formatter)));
    }

    /// Stop logging request finish events.
    pub fn clear_finish_formatter(&self) {
        self.set_formatter(LifecycleEvent::Finish, None);
    }

    /// Log the start of a request.
    pub fn on_request_start(&self, descriptor: &RequestDescriptor) {
        self.log(LifecycleEvent::Start, descriptor);
    }

    /// Log the completion of a request, successful or not.
    pub fn on_request_finish(&self, descriptor: &RequestDescriptor) {
        self.log(LifecycleEvent::Finish, descriptor);
    }

    /// Flush every append, reporting failures to the trap.
    pub fn flush(&self) {
        for append in &self.appends {
            if let Err(err) = append.flush() {
                self.trap.trap(&err);
            }
        }
    }

    fn update(&self, f: impl Fn(&mut Config)) {
        self.config.rcu(|current| {
            let mut next = Config::clone(current);
            f(&mut next);
            next
        });
    }

    fn log(&self, event: LifecycleEvent, descriptor: &RequestDescriptor) {
        let config = self.config.load();
        if !config.enabled {
            return;
        }
        let Some(formatter) = config.formatters.get(event) else {
            return;
        };
        let level = config.level;
        drop(config);

        let formatted = std::panic::catch_unwind(AssertUnwindSafe(|| {
            formatter.format(descriptor, level)
        }));
        let line = match formatted {
            Ok(Ok(line)) => line,
            Ok(Err(source)) => {
                self.trap.trap(&Error::Formatter { event, source });
                return;
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                let source = anyhow::anyhow!("formatter panicked: {message}");
                self.trap.trap(&Error::Formatter { event, source });
                return;
            }
        };

        let Some(line) = line.filter(|line| !line.is_empty()) else {
            return;
        };
        for append in &self.appends {
            if let Err(err) = append.append(&line, level) {
                self.trap.trap(&err);
            }
        }
    }
}

impl LifecycleObserver for RequestLogger {
    fn request_did_start(&self, descriptor: &RequestDescriptor) {
        self.on_request_start(descriptor);
    }

    fn request_did_finish(&self, descriptor: &RequestDescriptor) {
        self.on_request_finish(descriptor);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "Box<dyn Any>"
    }
}
