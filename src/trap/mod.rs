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

//! Side channel for failures the logger must not propagate.

use std::fmt;

use crate::Error;

mod default;

pub use self::default::DefaultTrap;

/// A trap receives errors that occur while logging a request.
///
/// Formatter and sink failures are never returned to the HTTP client. They are handed to the
/// logger's trap and the offending line is dropped.
pub trait Trap: fmt::Debug + Send + Sync + 'static {
    /// Handle an error that occurred while logging.
    fn trap(&self, err: &Error);
}

impl<T: Trap> From<T> for Box<dyn Trap> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
