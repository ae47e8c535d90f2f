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

use crate::Error;
use crate::LogLevel;
use crate::append::Append;

/// The target used by [`Log`] unless overridden.
const DEFAULT_TARGET: &str = "httplog";

/// An appender that forwards lines to the [`log`] facade.
///
/// Lines are emitted with the target `httplog` and the [`log::Level`] closest to the logger's
/// level (see [`LogLevel::as_log_level`]), so whatever `log` backend the application installed
/// decides where they end up.
///
/// # Examples
///
/// ```
/// use httplog::append::Log;
///
/// let append = Log::default().target("my_app::http");
/// ```
#[derive(Debug, Clone)]
pub struct Log {
    target: Cow<'static, str>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            target: Cow::Borrowed(DEFAULT_TARGET),
        }
    }
}

impl Log {
    /// Set the `log` target of forwarded lines.
    pub fn target(mut self, target: impl Into<Cow<'static, str>>) -> Self {
        self.target = target.into();
        self
    }
}

impl Append for Log {
    fn append(&self, line: &str, level: LogLevel) -> Result<(), Error> {
        log::log!(target: &*self.target, level.as_log_level(), "{line}");
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        log::logger().flush();
        Ok(())
    }
}
