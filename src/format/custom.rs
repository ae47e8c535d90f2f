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

use std::fmt::Debug;
use std::fmt::Formatter as DebugFormatter;

use crate::LogLevel;
use crate::RequestDescriptor;
use crate::format::Formatter;

type FormatFunction = dyn Fn(&RequestDescriptor, LogLevel) -> anyhow::Result<Option<String>>
    + Send
    + Sync
    + 'static;

/// A formatter backed by a caller-supplied closure.
///
/// The closure receives the request and the logger's current level and returns the line to log,
/// or `None` to log nothing. For example:
///
/// ```rust
/// use httplog::format::CustomFormatter;
///
/// let formatter = CustomFormatter::new(|request, level| {
///     Some(format!("[{level}] {} {}", request.method(), request.url()))
/// });
/// ```
pub struct CustomFormatter {
    f: Box<FormatFunction>,
}

impl Debug for CustomFormatter {
    fn fmt(&self, f: &mut DebugFormatter) -> std::fmt::Result {
        write!(f, "CustomFormatter {{ ... }}")
    }
}

impl CustomFormatter {
    /// Wrap an infallible closure.
    pub fn new(
        f: impl Fn(&RequestDescriptor, LogLevel) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        CustomFormatter {
            f: Box::new(move |descriptor, level| Ok(f(descriptor, level))),
        }
    }

    /// Wrap a closure that may fail.
    ///
    /// Errors never reach the HTTP client. The logger reports them to its trap and skips the line.
    pub fn fallible(
        f: impl Fn(&RequestDescriptor, LogLevel) -> anyhow::Result<Option<String>>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        CustomFormatter { f: Box::new(f) }
    }
}

impl Formatter for CustomFormatter {
    fn format(
        &self,
        descriptor: &RequestDescriptor,
        level: LogLevel,
    ) -> anyhow::Result<Option<String>> {
        (self.f)(descriptor, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HttpRequest;

    #[test]
    fn test_closure_receives_level() {
        let formatter = CustomFormatter::new(|d, level| Some(format!("{level} {}", d.url())));
        let d = RequestDescriptor::new(1, HttpRequest::get("http://example.com"));

        let line = formatter.format(&d, LogLevel::Verbose).unwrap();
        assert_eq!(line.as_deref(), Some("VERBOSE http://example.com"));
    }

    #[test]
    fn test_fallible_closure_error_is_returned() {
        let formatter = CustomFormatter::fallible(|_, _| anyhow::bail!("boom"));
        let d = RequestDescriptor::new(1, HttpRequest::get("http://example.com"));

        let err = formatter.format(&d, LogLevel::Info).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
