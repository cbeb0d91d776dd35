//! End-to-end lifecycle tests for the callback surface
//!
//! Drives full operations through the public API over a scripted transport:
//! callback at-most-once guarantees, retry exhaustion delivery, and the
//! no-network-before-validation rule.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::HeaderValue;
use http::header::LOCATION;
use serde_json::json;
use tokio::sync::oneshot;

use ow_core::{Error, Options, Response, Result};
use ow_s3::{Client, Handlers, Transport, TransportRequest};

struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<Response>>>,
    calls: AtomicU32,
}

impl ScriptedTransport {
    fn new(outcomes: impl IntoIterator<Item = Result<Response>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            calls: AtomicU32::new(0),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, _request: TransportRequest) -> Result<Response> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called more times than scripted")
    }
}

fn status(code: u16) -> Result<Response> {
    Ok(Response {
        status: code,
        ..Default::default()
    })
}

#[tokio::test]
async fn test_on_success_fires_exactly_once() {
    let transport = ScriptedTransport::new([status(200)]);
    let client = Client::with_transport(transport.clone() as Arc<dyn Transport>);

    let successes = Arc::new(AtomicU32::new(0));
    let errors = Arc::new(AtomicU32::new(0));
    let (tx, rx) = oneshot::channel();

    let counter = successes.clone();
    let errored = errors.clone();
    let handle = client
        .get(
            "abc",
            "k",
            Options::new(),
            Handlers::new()
                .on_success(move |response| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let _ = tx.send(response.status);
                })
                .on_error(move |_| {
                    errored.fetch_add(1, Ordering::SeqCst);
                }),
        )
        .unwrap();

    handle.await.unwrap();
    assert_eq!(rx.await.unwrap(), 200);
    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_exhaustion_delivers_on_error() {
    // Budget 2: three 503s in a row exhaust it
    let transport = ScriptedTransport::new([status(503), status(503), status(503)]);
    let client = Client::with_transport(transport.clone() as Arc<dyn Transport>);

    let (tx, rx) = oneshot::channel();
    let handle = client
        .get(
            "abc",
            "k",
            Options::new().with_retry_count(2),
            Handlers::new()
                .on_success(|_| panic!("success callback must not fire"))
                .on_error(move |error| {
                    let _ = tx.send(error);
                }),
        )
        .unwrap();

    handle.await.unwrap();
    let error = rx.await.unwrap();
    assert_eq!(transport.calls(), 3);
    // The last delivered response stays inspectable on the error
    assert_eq!(error.response().map(|r| r.status), Some(503));
    match error {
        Error::RetriesExhausted { attempts, response } => {
            assert_eq!(attempts, 3);
            assert_eq!(response.status, 503);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_put_lifecycle_with_redirect() {
    let mut moved = Response {
        status: 301,
        ..Default::default()
    };
    moved.headers.insert(
        LOCATION,
        HeaderValue::from_static("https://abc.eu.example.com/report.csv"),
    );

    let transport = ScriptedTransport::new([Ok(moved), status(200)]);
    let client = Client::with_transport(transport.clone() as Arc<dyn Transport>);

    let (tx, rx) = oneshot::channel();
    let handle = client
        .put(
            "abc",
            "report.csv",
            &b"a,b,c\n"[..],
            Options::new().with_credentials("AKID", "secret"),
            Handlers::new().on_success(move |response| {
                let _ = tx.send(response.status);
            }),
        )
        .unwrap();

    handle.await.unwrap();
    assert_eq!(rx.await.unwrap(), 200);
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_unknown_option_key_fails_before_network() {
    let err = Options::from_value(json!({
        "server": "storage.example.com",
        "retris": 3,
    }))
    .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[tokio::test]
async fn test_empty_bucket_rejected_synchronously() {
    let transport = ScriptedTransport::new([]);
    let client = Client::with_transport(transport.clone() as Arc<dyn Transport>);

    let result = client.delete("", "k", Options::new(), Handlers::new());
    assert!(matches!(result, Err(Error::Config(_))));
    assert_eq!(transport.calls(), 0);
}
