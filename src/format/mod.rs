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

//! Formatters that turn request lifecycle events into log lines.

use std::fmt;
use std::sync::Arc;

use crate::LogLevel;
use crate::RequestDescriptor;

mod custom;
#[cfg(feature = "json")]
mod json;
mod text;

pub use self::custom::CustomFormatter;
#[cfg(feature = "json")]
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

/// A formatter for one kind of request lifecycle event.
///
/// Returning `Ok(None)` or an empty string suppresses the line. Returning an error is reported
/// to the logger's trap and also produces no line.
pub trait Formatter: fmt::Debug + Send + Sync + 'static {
    /// Format the request at the given level.
    fn format(
        &self,
        descriptor: &RequestDescriptor,
        level: LogLevel,
    ) -> anyhow::Result<Option<String>>;
}

impl<T: Formatter> From<T> for Box<dyn Formatter> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// The request lifecycle events a formatter can be registered for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum LifecycleEvent {
    Start,
    Finish,
}

impl LifecycleEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::Start => "start",
            LifecycleEvent::Finish => "finish",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One optional formatter slot per [`LifecycleEvent`].
///
/// Cloning is cheap: slots hold `Arc`s, so a logger can rebuild its configuration snapshot on
/// every update without copying the formatters themselves.
#[derive(Debug, Clone, Default)]
pub struct FormatterRegistry {
    start: Option<Arc<dyn Formatter>>,
    finish: Option<Arc<dyn Formatter>>,
}

impl FormatterRegistry {
    /// A registry with a [`TextFormatter`] installed for every event.
    pub fn text() -> Self {
        Self {
            start: Some(Arc::new(TextFormatter::start())),
            finish: Some(Arc::new(TextFormatter::finish())),
        }
    }

    pub fn get(&self, event: LifecycleEvent) -> Option<Arc<dyn Formatter>> {
        self.slot(event).clone()
    }

    /// Replace the formatter for `event`. `None` disables the event.
    pub fn set(&mut self, event: LifecycleEvent, formatter: Option<Box<dyn Formatter>>) {
        self.set_shared(event, formatter.map(Arc::from));
    }

    pub(crate) fn set_shared(
        &mut self,
        event: LifecycleEvent,
        formatter: Option<Arc<dyn Formatter>>,
    ) {
        *self.slot_mut(event) = formatter;
    }

    fn slot(&self, event: LifecycleEvent) -> &Option<Arc<dyn Formatter>> {
        match event {
            LifecycleEvent::Start => &self.start,
            LifecycleEvent::Finish => &self.finish,
        }
    }

    fn slot_mut(&mut self, event: LifecycleEvent) -> &mut Option<Arc<dyn Formatter>> {
        match event {
            LifecycleEvent::Start => &mut self.start,
            LifecycleEvent::Finish => &mut self.finish,
        }
    }
}
