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

use jiff::Timestamp;
use serde::Serialize;

use crate::HttpMethod;
use crate::LogLevel;
use crate::RequestDescriptor;
use crate::format::Formatter;
use crate::format::LifecycleEvent;

/// A formatter that emits one JSON object per request event.
///
/// Output format:
///
/// ```json
/// {"event":"start","level":"INFO","id":1,"method":"GET","url":"http://localhost:3000/todos","started_at":"2024-06-01T12:00:00Z"}
/// {"event":"finish","level":"INFO","id":1,"method":"GET","url":"http://localhost:3000/todos","started_at":"2024-06-01T12:00:00Z","status":200,"elapsed_ms":12.3}
/// ```
///
/// Like [`TextFormatter`](crate::format::TextFormatter), a `JsonFormatter` is bound to one
/// [`LifecycleEvent`]. Unlike it, every level produces a line.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    event: LifecycleEvent,
}

#[derive(Debug, Serialize)]
struct RequestLine<'a> {
    event: LifecycleEvent,
    level: LogLevel,
    id: u64,
    method: HttpMethod,
    url: &'a str,
    started_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl JsonFormatter {
    pub fn new(event: LifecycleEvent) -> Self {
        Self { event }
    }

    pub fn start() -> Self {
        Self::new(LifecycleEvent::Start)
    }

    pub fn finish() -> Self {
        Self::new(LifecycleEvent::Finish)
    }
}

impl Formatter for JsonFormatter {
    fn format(
        &self,
        descriptor: &RequestDescriptor,
        level: LogLevel,
    ) -> anyhow::Result<Option<String>> {
        let line = RequestLine {
            event: self.event,
            level,
            id: descriptor.id,
            method: descriptor.method(),
            url: descriptor.url(),
            started_at: descriptor.started_at,
            status: descriptor.status(),
            elapsed_ms: descriptor.elapsed().map(|d| d.as_secs_f64() * 1000.0),
            error: descriptor.error.as_deref(),
        };

        Ok(Some(serde_json::to_string(&line)?))
    }
}
