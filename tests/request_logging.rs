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
use std::thread;

use httplog::ClientLoggerBinding;
use httplog::Error;
use httplog::HttpClient;
use httplog::HttpClientExt;
use httplog::HttpMethod;
use httplog::HttpRequest;
use httplog::HttpResponse;
use httplog::LifecycleEvent;
use httplog::LogLevel;
use httplog::RequestDescriptor;
use httplog::RequestLogger;
use httplog::Trap;
use httplog::append::Testing;
use httplog::format::CustomFormatter;
use httplog::format::TextFormatter;
use rand::Rng;

#[derive(Debug, Clone, Default)]
struct CollectTrap(Arc<Mutex<Vec<String>>>);

impl Trap for CollectTrap {
    fn trap(&self, err: &Error) {
        self.0.lock().unwrap().push(err.to_string());
    }
}

fn bind(client: &HttpClient, capture: &Testing, trap: &CollectTrap) -> Arc<RequestLogger> {
    ClientLoggerBinding::get_logger_with(client, || {
        RequestLogger::builder()
            .append(capture.clone())
            .trap(trap.clone())
    })
    .unwrap()
}

fn ok(status: u16) -> impl FnOnce(&HttpRequest) -> Result<HttpResponse, String> {
    move |_| Ok(HttpResponse::new(status))
}

#[cfg(feature = "colored")]
fn plain_text(event: LifecycleEvent) -> TextFormatter {
    TextFormatter::new(event).no_color()
}

#[cfg(not(feature = "colored"))]
fn plain_text(event: LifecycleEvent) -> TextFormatter {
    TextFormatter::new(event)
}

#[test]
fn test_disabled_by_default() {
    let client = HttpClient::new("http://localhost:3000");
    let capture = Testing::default();
    let logger = bind(&client, &capture, &CollectTrap::default());
    assert!(!logger.is_enabled());

    for path in ["todos", "todos/1", "todos/2"] {
        client.execute(client.request(HttpMethod::Get, path), ok(200)).unwrap();
    }
    assert!(capture.lines().is_empty());
}

#[test]
fn test_start_scenario() {
    let client = HttpClient::new("http://example.com");
    let capture = Testing::default();
    let logger = bind(&client, &capture, &CollectTrap::default());
    logger.set_enabled(true);
    logger.set_level(LogLevel::Info);
    logger.set_start_formatter(CustomFormatter::new(|d, _| Some(format!("START {}", d.url()))));
    logger.clear_finish_formatter();

    let mut request = client.request(HttpMethod::Get, "");
    request.url = "http://example.com".to_string();
    client.execute(request, ok(200)).unwrap();

    assert_eq!(capture.lines(), vec!["START http://example.com"]);
}

#[test]
fn test_not_modified_is_suppressed() {
    let client = HttpClient::new("http://localhost:3000");
    let capture = Testing::default();
    let logger = bind(&client, &capture, &CollectTrap::default());
    logger.set_enabled(true);
    logger.clear_start_formatter();
    logger.set_finish_formatter(CustomFormatter::new(|d, _| match d.status() {
        Some(304) => Some(String::new()),
        Some(status) => Some(format!("{status} {}", d.url())),
        None => None,
    }));

    client.execute(client.request(HttpMethod::Get, "cached"), ok(304)).unwrap();
    assert!(capture.lines().is_empty());

    client.execute(client.request(HttpMethod::Get, "fresh"), ok(200)).unwrap();
    assert_eq!(capture.lines(), vec!["200 http://localhost:3000/fresh"]);
}

#[test]
fn test_default_text_output() {
    let client = HttpClient::new("http://localhost:3000");
    let capture = Testing::default();
    let logger = bind(&client, &capture, &CollectTrap::default());
    logger.set_enabled(true);
    logger.set_start_formatter(plain_text(LifecycleEvent::Start));
    logger.set_finish_formatter(plain_text(LifecycleEvent::Finish));

    client.execute(client.request(HttpMethod::Get, "todos"), ok(200)).unwrap();
    client
        .execute(client.request(HttpMethod::Post, "todos"), |_| {
            Err::<HttpResponse, _>("connection refused".to_string())
        })
        .unwrap_err();

    let lines = capture.lines();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "GET 'http://localhost:3000/todos'");
    assert!(lines[1].starts_with("200 'http://localhost:3000/todos' ["));
    assert!(lines[1].ends_with(" s]"));
    assert_eq!(lines[2], "POST 'http://localhost:3000/todos'");
    assert_eq!(
        lines[3],
        "[Error] POST 'http://localhost:3000/todos' (0): connection refused"
    );
}

#[test]
fn test_notifications_are_formatted_as_the_event_received() {
    let client = HttpClient::new("http://localhost:3000");
    let capture = Testing::default();
    let logger = bind(&client, &capture, &CollectTrap::default());
    logger.set_enabled(true);
    logger.set_start_formatter(plain_text(LifecycleEvent::Start));
    logger.set_finish_formatter(plain_text(LifecycleEvent::Finish));

    // a finish notification for a request that never completed has nothing to report
    let in_flight = RequestDescriptor::new(1, HttpRequest::get("http://localhost:3000/a"));
    client.notify_finish(&in_flight);
    assert!(capture.take().is_empty());

    let mut finished = RequestDescriptor::new(2, HttpRequest::get("http://localhost:3000/b"));
    finished.finish(HttpResponse::new(200), jiff::Timestamp::now());
    client.notify_start(&finished);
    assert_eq!(capture.take(), vec!["GET 'http://localhost:3000/b'"]);

    client.notify_finish(&finished);
    let lines = capture.take();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("200 'http://localhost:3000/b' ["));
}

#[test]
fn test_broken_formatter_does_not_affect_requests() {
    let client = HttpClient::new("http://localhost:3000");
    let capture = Testing::default();
    let trap = CollectTrap::default();
    let logger = bind(&client, &capture, &trap);
    logger.set_enabled(true);
    logger.set_start_formatter(CustomFormatter::new(|_, _| panic!("start formatter exploded")));
    logger.set_finish_formatter(CustomFormatter::fallible(|d, _| match d.status() {
        Some(500) => anyhow::bail!("no template for 500"),
        status => Ok(Some(format!("finished {status:?}"))),
    }));

    let response = client
        .execute(client.request(HttpMethod::Get, "a"), ok(500))
        .unwrap();
    assert_eq!(response.status, 500);

    let response = client
        .execute(client.request(HttpMethod::Get, "b"), ok(201))
        .unwrap();
    assert_eq!(response.status, 201);

    let err = client
        .execute(client.request(HttpMethod::Get, "c"), |_| {
            Err::<HttpResponse, _>("timed out".to_string())
        })
        .unwrap_err();
    assert_eq!(err, "timed out");

    assert_eq!(capture.lines(), vec!["finished Some(201)", "finished None"]);

    let trapped = trap.0.lock().unwrap().clone();
    // three start panics and one finish error
    assert_eq!(trapped.len(), 4);
    assert!(trapped.iter().any(|e| e.contains("no template for 500")));
    assert_eq!(
        trapped
            .iter()
            .filter(|e| e.contains("start formatter exploded"))
            .count(),
        3
    );
}

#[test]
fn test_single_subscription_per_client() {
    let client = HttpClient::new("http://localhost:3000");
    let capture = Testing::default();

    let first = bind(&client, &capture, &CollectTrap::default());
    let second = client.logger().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(client.subscriber_count(), 1);

    first.set_enabled(true);
    first.set_start_formatter(CustomFormatter::new(|_, _| Some("once".to_string())));
    first.clear_finish_formatter();
    client.execute(client.request(HttpMethod::Get, "todos"), ok(200)).unwrap();
    assert_eq!(capture.lines(), vec!["once"]);
}

#[test]
fn test_concurrent_first_access_binds_once() {
    let client = Arc::new(HttpClient::new("http://localhost:3000"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            thread::spawn(move || client.logger().unwrap())
        })
        .collect();
    let loggers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(loggers.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(client.subscriber_count(), 1);
}

#[test]
fn test_reconfigure_while_requests_are_in_flight() {
    let client = Arc::new(HttpClient::new("http://localhost:3000"));
    let capture = Testing::default();
    let trap = CollectTrap::default();
    let logger = bind(&client, &capture, &trap);
    logger.set_enabled(true);
    logger.set_start_formatter(CustomFormatter::new(|d, _| Some(format!("A:{}", d.id))));
    logger.set_finish_formatter(CustomFormatter::new(|d, _| Some(format!("A:{}", d.id))));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let client = client.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    client
                        .execute(client.request(HttpMethod::Get, "todos"), ok(200))
                        .unwrap();
                }
            })
        })
        .collect();

    let mut rng = rand::rng();
    for _ in 0..200 {
        let tag = if rng.random_bool(0.5) { "A" } else { "B" };
        let level = [LogLevel::Debug, LogLevel::Info][rng.random_range(0..2)];
        logger.set_level(level);
        let tagged = move |d: &RequestDescriptor, _: LogLevel| Some(format!("{tag}:{}", d.id));
        logger.set_start_formatter(CustomFormatter::new(tagged));
        logger.set_finish_formatter(CustomFormatter::new(tagged));
        thread::yield_now();
    }

    for worker in workers {
        worker.join().unwrap();
    }

    let lines = capture.lines();
    assert_eq!(lines.len(), 4 * 200 * 2);
    assert!(lines.iter().all(|l| l.starts_with("A:") || l.starts_with("B:")));
    assert!(trap.0.lock().unwrap().is_empty());
}
