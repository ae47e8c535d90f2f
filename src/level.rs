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

//! Log levels handed to request formatters.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The verbosity a [`RequestLogger`](crate::RequestLogger) passes to its formatters.
///
/// Variants are ordered by increasing severity, so `LogLevel::Debug < LogLevel::Error`.
///
/// The logger itself never filters on the level. Formatters receive it and decide what, if
/// anything, to print.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "UPPERCASE"))]
pub enum LogLevel {
    /// Everything, including headers and bodies.
    Debug,
    /// Lower priority details.
    Verbose,
    /// One line per request event.
    #[default]
    Info,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// Return the string representation of the `LogLevel`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Info => "INFO",
            LogLevel::Error => "ERROR",
        }
    }

    /// The closest [`log::Level`] for forwarding lines into the `log` facade.
    pub fn as_log_level(&self) -> log::Level {
        match self {
            LogLevel::Debug => log::Level::Trace,
            LogLevel::Verbose => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Error => log::Level::Error,
        }
    }
}

impl fmt::Debug for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<LogLevel, Self::Err> {
        for (name, level) in [
            ("debug", LogLevel::Debug),
            ("verbose", LogLevel::Verbose),
            ("info", LogLevel::Info),
            ("error", LogLevel::Error),
        ] {
            if s.trim().eq_ignore_ascii_case(name) {
                return Ok(level);
            }
        }

        Err(Error::Config {
            key: "level",
            value: s.to_string(),
        })
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        level.as_log_level()
    }
}
