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

use std::fmt::Write;

#[cfg(feature = "colored")]
use colored::Color;
#[cfg(feature = "colored")]
use colored::ColoredString;
#[cfg(feature = "colored")]
use colored::Colorize;

use crate::LogLevel;
use crate::RequestDescriptor;
use crate::format::Formatter;
use crate::format::LifecycleEvent;

/// The default formatter for request start and finish events.
///
/// A `TextFormatter` is bound to one [`LifecycleEvent`] and always renders that event, whatever
/// state the descriptor is in. Output format at [`LogLevel::Info`]:
///
/// ```text
/// GET 'http://localhost:3000/todos'
/// 200 'http://localhost:3000/todos' [0.0123 s]
/// [Error] GET 'http://localhost:3000/todos' (0): connection refused
/// ```
///
/// At [`LogLevel::Debug`] request and response headers and bodies are appended. At
/// [`LogLevel::Verbose`] nothing is printed, and at [`LogLevel::Error`] only failed requests are
/// printed.
///
/// With the `colored` feature the status code is colored by class. Call
/// [`no_color`](TextFormatter::no_color) to turn it off.
#[derive(Debug, Clone)]
pub struct TextFormatter {
    event: LifecycleEvent,
    #[cfg(feature = "colored")]
    no_color: bool,
    #[cfg(feature = "colored")]
    colors: StatusColor,
}

impl TextFormatter {
    /// Create a formatter for `event`.
    pub fn new(event: LifecycleEvent) -> Self {
        Self {
            event,
            #[cfg(feature = "colored")]
            no_color: false,
            #[cfg(feature = "colored")]
            colors: StatusColor::default(),
        }
    }

    /// Create a formatter for request start events.
    pub fn start() -> Self {
        Self::new(LifecycleEvent::Start)
    }

    /// Create a formatter for request finish events.
    pub fn finish() -> Self {
        Self::new(LifecycleEvent::Finish)
    }

    pub fn event(&self) -> LifecycleEvent {
        self.event
    }

    /// Disable colored output.
    #[cfg(feature = "colored")]
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    fn format_start(&self, d: &RequestDescriptor, level: LogLevel) -> Option<String> {
        let method = d.method();
        let url = d.url();
        match level {
            LogLevel::Debug => {
                let headers = HeadersDisplay(&d.request.headers);
                let body = d.request.body.as_deref().unwrap_or_default();
                Some(format!("{method} '{url}': {headers} {body}"))
            }
            LogLevel::Info => Some(format!("{method} '{url}'")),
            LogLevel::Verbose | LogLevel::Error => None,
        }
    }

    fn format_finish(&self, d: &RequestDescriptor, level: LogLevel) -> Option<String> {
        let url = d.url();

        if let Some(error) = d.error.as_deref() {
            return match level {
                LogLevel::Debug | LogLevel::Info | LogLevel::Error => {
                    let method = d.method();
                    let status = self.format_status(d.status().unwrap_or_default());
                    Some(format!("[Error] {method} '{url}' ({status}): {error}"))
                }
                LogLevel::Verbose => None,
            };
        }

        let response = d.response.as_ref()?;
        let status = self.format_status(response.status);
        let secs = d.elapsed().unwrap_or_default().as_secs_f64();
        match level {
            LogLevel::Debug => {
                let headers = HeadersDisplay(&response.headers);
                let body = &response.body;
                Some(format!("{status} '{url}' [{secs:.4} s]: {headers} {body}"))
            }
            LogLevel::Info => Some(format!("{status} '{url}' [{secs:.4} s]")),
            LogLevel::Verbose | LogLevel::Error => None,
        }
    }

    #[cfg(feature = "colored")]
    fn format_status(&self, status: u16) -> String {
        if self.no_color {
            status.to_string()
        } else {
            let color = self.colors.color_for(status);
            ColoredString::from(status.to_string()).color(color).to_string()
        }
    }

    #[cfg(not(feature = "colored"))]
    fn format_status(&self, status: u16) -> String {
        status.to_string()
    }
}

impl Formatter for TextFormatter {
    fn format(
        &self,
        descriptor: &RequestDescriptor,
        level: LogLevel,
    ) -> anyhow::Result<Option<String>> {
        let line = match self.event {
            LifecycleEvent::Start => self.format_start(descriptor, level),
            LifecycleEvent::Finish => self.format_finish(descriptor, level),
        };
        Ok(line)
    }
}

struct HeadersDisplay<'a>(&'a [(String, String)]);

impl std::fmt::Display for HeadersDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('{')?;
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_char('}')
    }
}

/// Colors for status code classes.
#[cfg(feature = "colored")]
#[derive(Debug, Clone)]
struct StatusColor {
    success: Color,
    redirect: Color,
    client_error: Color,
    server_error: Color,
}

#[cfg(feature = "colored")]
impl Default for StatusColor {
    fn default() -> Self {
        Self {
            success: Color::Green,
            redirect: Color::Cyan,
            client_error: Color::Yellow,
            server_error: Color::Red,
        }
    }
}

#[cfg(feature = "colored")]
impl StatusColor {
    fn color_for(&self, status: u16) -> Color {
        match status {
            200..=299 => self.success,
            300..=399 => self.redirect,
            400..=499 => self.client_error,
            _ => self.server_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::HttpRequest;
    use crate::HttpResponse;

    fn started() -> Timestamp {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    fn start_descriptor() -> RequestDescriptor {
        let request = HttpRequest::post("http://localhost:3000/todos")
            .header("x-request-id", "7")
            .body(r#"{"title":"Buy milk"}"#);
        RequestDescriptor::started_at(1, request, started())
    }

    fn finished_descriptor() -> RequestDescriptor {
        let mut d = RequestDescriptor::started_at(
            2,
            HttpRequest::get("http://localhost:3000/todos"),
            started(),
        );
        let response = HttpResponse::new(200)
            .header("content-type", "application/json")
            .body("[]");
        d.finish(response, "2024-06-01T12:00:00.0123Z".parse().unwrap());
        d
    }

    #[cfg(feature = "colored")]
    fn plain(event: LifecycleEvent) -> TextFormatter {
        TextFormatter::new(event).no_color()
    }

    #[cfg(not(feature = "colored"))]
    fn plain(event: LifecycleEvent) -> TextFormatter {
        TextFormatter::new(event)
    }

    fn format(d: &RequestDescriptor, level: LogLevel) -> Option<String> {
        let event = if d.is_finished() {
            LifecycleEvent::Finish
        } else {
            LifecycleEvent::Start
        };
        plain(event).format(d, level).unwrap()
    }

    #[test]
    fn test_start_lines() {
        let d = start_descriptor();
        insta::assert_snapshot!(
            format(&d, LogLevel::Info).unwrap(),
            @"POST 'http://localhost:3000/todos'"
        );
        insta::assert_snapshot!(
            format(&d, LogLevel::Debug).unwrap(),
            @r#"POST 'http://localhost:3000/todos': {x-request-id: 7} {"title":"Buy milk"}"#
        );
        assert_eq!(format(&d, LogLevel::Verbose), None);
        assert_eq!(format(&d, LogLevel::Error), None);
    }

    #[test]
    fn test_finish_lines() {
        let d = finished_descriptor();
        insta::assert_snapshot!(
            format(&d, LogLevel::Info).unwrap(),
            @"200 'http://localhost:3000/todos' [0.0123 s]"
        );
        insta::assert_snapshot!(
            format(&d, LogLevel::Debug).unwrap(),
            @"200 'http://localhost:3000/todos' [0.0123 s]: {content-type: application/json} []"
        );
        assert_eq!(format(&d, LogLevel::Verbose), None);
        assert_eq!(format(&d, LogLevel::Error), None);
    }

    #[test]
    fn test_failed_request_lines() {
        let mut d = RequestDescriptor::started_at(
            3,
            HttpRequest::get("http://localhost:3000/todos"),
            started(),
        );
        d.fail("connection refused", started());

        insta::assert_snapshot!(
            format(&d, LogLevel::Info).unwrap(),
            @"[Error] GET 'http://localhost:3000/todos' (0): connection refused"
        );
        assert_eq!(format(&d, LogLevel::Debug), format(&d, LogLevel::Info));
        assert_eq!(format(&d, LogLevel::Error), format(&d, LogLevel::Info));
        assert_eq!(format(&d, LogLevel::Verbose), None);
    }

    #[test]
    fn test_event_is_fixed_by_the_formatter() {
        let in_flight = start_descriptor();
        let finished = finished_descriptor();

        let finish = plain(LifecycleEvent::Finish);
        assert_eq!(finish.format(&in_flight, LogLevel::Info).unwrap(), None);
        insta::assert_snapshot!(
            finish.format(&finished, LogLevel::Info).unwrap().unwrap(),
            @"200 'http://localhost:3000/todos' [0.0123 s]"
        );

        let start = plain(LifecycleEvent::Start);
        insta::assert_snapshot!(
            start.format(&finished, LogLevel::Info).unwrap().unwrap(),
            @"GET 'http://localhost:3000/todos'"
        );
        assert_eq!(start.event(), LifecycleEvent::Start);
    }
}
