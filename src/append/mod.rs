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

//! Output sinks for formatted request log lines.

use std::fmt;

use crate::Error;
use crate::LogLevel;

mod facade;
mod stdio;
mod testing;

pub use self::facade::Log;
pub use self::stdio::Stderr;
pub use self::stdio::Stdout;
pub use self::testing::Testing;

/// A sink that receives formatted log lines.
///
/// A single sink is shared by every in-flight request of a client, so implementations must
/// accept concurrent calls. The logger does not serialize writes.
pub trait Append: fmt::Debug + Send + Sync + 'static {
    /// Write one line. `level` is the logger's level at the time the line was formatted.
    fn append(&self, line: &str, level: LogLevel) -> Result<(), Error>;

    /// Flush any buffered lines.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T: Append> From<T> for Box<dyn Append> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
