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
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::Error;
use crate::LogLevel;
use crate::append::Append;

/// An appender that keeps log lines in memory so that tests can assert on them.
///
/// Clones share the same buffer: hand one clone to the logger and keep another to inspect.
///
/// # Examples
///
/// ```
/// use httplog::append::Testing;
///
/// let capture = Testing::default();
/// let handle = capture.clone();
/// assert!(handle.lines().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Testing {
    lines: Arc<Mutex<Vec<String>>>,
}

impl Testing {
    /// Return a copy of every line appended so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return every line appended so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Append for Testing {
    fn append(&self, line: &str, _: LogLevel) -> Result<(), Error> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let capture = Testing::default();
        let handle = capture.clone();

        capture.append("one", LogLevel::Info).unwrap();
        capture.append("two", LogLevel::Error).unwrap();

        assert_eq!(handle.lines(), vec!["one", "two"]);
        assert_eq!(handle.take(), vec!["one", "two"]);
        assert!(capture.lines().is_empty());
    }
}
