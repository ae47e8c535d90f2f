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

use std::borrow::Cow;

use crate::Append;
use crate::Error;
use crate::Formatter;
use crate::LogLevel;
use crate::Trap;
use crate::append;
use crate::format::FormatterRegistry;
use crate::format::LifecycleEvent;
use crate::logger::RequestLogger;
use crate::logger::logger::Config;
use crate::trap::DefaultTrap;

/// The default prefix of the environment variables read by [`RequestLoggerBuilder::from_env`].
const DEFAULT_ENV_PREFIX: &str = "HTTPLOG";

/// A builder for configuring a [`RequestLogger`].
///
/// Everything can be changed later on the logger itself except the appends and the trap, which
/// are fixed once the logger is built.
///
/// ## Examples
///
/// ```rust
/// use httplog::LogLevel;
/// use httplog::RequestLogger;
/// use httplog::append;
/// use httplog::format::CustomFormatter;
///
/// let logger = RequestLogger::builder()
///     .enabled(true)
///     .level(LogLevel::Debug)
///     .start_formatter(CustomFormatter::new(|req, _| Some(format!("-> {}", req.url()))))
///     .append(append::Stdout::default())
///     .build();
/// ```
#[must_use = "call `build` to create the logger"]
#[derive(Debug)]
pub struct RequestLoggerBuilder {
    enabled: bool,
    level: LogLevel,
    formatters: FormatterRegistry,
    appends: Vec<Box<dyn Append>>,
    trap: Box<dyn Trap>,
}

impl Default for RequestLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestLoggerBuilder {
    /// Create a builder with logging disabled, level [`LogLevel::Info`] and the
    /// [`TextFormatter`](crate::format::TextFormatter) registered for both events.
    pub fn new() -> Self {
        Self {
            enabled: false,
            level: LogLevel::Info,
            formatters: FormatterRegistry::text(),
            appends: vec![],
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Create a builder configured from the `HTTPLOG_ENABLED` and `HTTPLOG_LEVEL` environment
    /// variables.
    ///
    /// Malformed values are logged with [`log::warn!`] and ignored.
    pub fn from_env() -> Self {
        Self::from_env_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Like [`from_env`](RequestLoggerBuilder::from_env), reading `{prefix}_ENABLED` and
    /// `{prefix}_LEVEL` instead.
    pub fn from_env_prefix<'a>(prefix: impl Into<Cow<'a, str>>) -> Self {
        let prefix: Cow<str> = prefix.into();
        let lookup = |name: &str| std::env::var(name).ok();
        let mut builder = Self::new();
        for err in builder.apply_vars(&prefix, lookup) {
            log::warn!("ignoring environment configuration: {err}");
        }
        builder
    }

    /// Like [`from_env_prefix`](RequestLoggerBuilder::from_env_prefix), but fails on the first
    /// malformed value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a variable is set to a value that cannot be parsed.
    pub fn try_from_env_prefix<'a>(prefix: impl Into<Cow<'a, str>>) -> Result<Self, Error> {
        let prefix: Cow<str> = prefix.into();
        let lookup = |name: &str| std::env::var(name).ok();
        let mut builder = Self::new();
        match builder.apply_vars(&prefix, lookup).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(builder),
        }
    }

    fn apply_vars(&mut self, prefix: &str, lookup: impl Fn(&str) -> Option<String>) -> Vec<Error> {
        let mut errors = vec![];

        if let Some(value) = lookup(&format!("{prefix}_ENABLED")) {
            match parse_bool(&value) {
                Some(enabled) => self.enabled = enabled,
                None => errors.push(Error::Config {
                    key: "enabled",
                    value,
                }),
            }
        }

        if let Some(value) = lookup(&format!("{prefix}_LEVEL")) {
            match value.parse() {
                Ok(level) => self.level = level,
                Err(err) => errors.push(err),
            }
        }

        errors
    }

    /// Whether the logger starts enabled. Defaults to `false`.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The level passed to formatters. Defaults to [`LogLevel::Info`].
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Register the formatter for request start events.
    pub fn start_formatter(mut self, formatter: impl Into<Box<dyn Formatter>>) -> Self {
        self.formatters.set(LifecycleEvent::Start, Some(formatter.into()));
        self
    }

    /// Register the formatter for request finish events.
    pub fn finish_formatter(mut self, formatter: impl Into<Box<dyn Formatter>>) -> Self {
        self.formatters.set(LifecycleEvent::Finish, Some(formatter.into()));
        self
    }

    /// Replace or clear the formatter for `event`.
    pub fn formatter(
        mut self,
        event: LifecycleEvent,
        formatter: Option<Box<dyn Formatter>>,
    ) -> Self {
        self.formatters.set(event, formatter);
        self
    }

    /// Add an [`Append`] that receives every formatted line.
    ///
    /// Defaults to a single [`Stderr`](append::Stderr) append when none is added.
    pub fn append(mut self, append: impl Into<Box<dyn Append>>) -> Self {
        self.appends.push(append.into());
        self
    }

    /// Set the [`Trap`] that receives logging failures. Defaults to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Build the logger.
    pub fn build(self) -> RequestLogger {
        let mut appends = self.appends;
        if appends.is_empty() {
            appends.push(Box::new(append::Stderr::default()));
        }

        let config = Config {
            enabled: self.enabled,
            level: self.level,
            formatters: self.formatters,
        };
        RequestLogger::new(config, appends, self.trap)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    for (name, enabled) in [
        ("1", true),
        ("true", true),
        ("yes", true),
        ("on", true),
        ("0", false),
        ("false", false),
        ("no", false),
        ("off", false),
    ] {
        if value.eq_ignore_ascii_case(name) {
            return Some(enabled);
        }
    }
    None
}
