//! HTTP transport abstraction for downloads and latency probes.
//!
//! The trait boundary keeps the mirror-fallback and probe logic testable
//! with a scripted transport instead of a live network.

use std::io::Read;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Browser-like identification sent with download requests; some mirror
/// frontends reject clients without one.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Time allowed to establish a connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Time allowed for each read of the response body.
const READ_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("{0}")]
    Other(String),
}

/// A successful GET: the body is streamed, not buffered.
pub struct HttpResponse {
    pub content_length: Option<u64>,
    pub body: Box<dyn Read>,
}

pub trait Transport {
    /// GET `url`, following redirects; any non-success status is an error.
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, HttpError>;

    /// HEAD `url` and return the measured round-trip time. Any HTTP response
    /// counts as reachable; only transport-level failures are errors.
    /// `insecure` disables TLS certificate validation for the request.
    fn head(&self, url: &str, insecure: bool) -> std::result::Result<Duration, HttpError>;
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
    insecure_client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> std::result::Result<Self, HttpError> {
        // `read_timeout` only exists on the async builder; convert it into a
        // blocking builder to keep the per-read timeout semantics.
        let client = reqwest::blocking::ClientBuilder::from(
            reqwest::ClientBuilder::new()
                .user_agent(BROWSER_USER_AGENT)
                .connect_timeout(CONNECT_TIMEOUT)
                .read_timeout(READ_TIMEOUT),
        )
        // No overall deadline: large archives stream for minutes.
        .timeout(None)
        .build()
        .map_err(|e| HttpError::Other(format!("failed to create HTTP client: {e}")))?;

        let insecure_client = reqwest::blocking::ClientBuilder::from(
            reqwest::ClientBuilder::new()
                .user_agent(BROWSER_USER_AGENT)
                .connect_timeout(CONNECT_TIMEOUT)
                .read_timeout(READ_TIMEOUT),
        )
        .timeout(None)
        .danger_accept_invalid_certs(true)
        .build()
            .map_err(|e| HttpError::Other(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            insecure_client,
        })
    }
}

fn request_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_connect() {
        HttpError::Connect(e.to_string())
    } else {
        HttpError::Other(e.to_string())
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, HttpError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "*/*")
            .send()
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status(status.as_u16()));
        }

        Ok(HttpResponse {
            content_length: response.content_length(),
            body: Box::new(response),
        })
    }

    fn head(&self, url: &str, insecure: bool) -> std::result::Result<Duration, HttpError> {
        let client = if insecure {
            &self.insecure_client
        } else {
            &self.client
        };

        let started = Instant::now();
        client.head(url).send().map_err(request_error)?;
        Ok(started.elapsed())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io::Cursor;

    /// Scripted reply for one `get` call.
    pub enum MockReply {
        /// Stream this body with a known content-length.
        Body(Vec<u8>),
        /// Stream this body without a content-length.
        BodyUnsized(Vec<u8>),
        /// Fail the attempt with the given error.
        Fail(HttpError),
    }

    /// Scripted transport: replies are consumed in call order, and every
    /// call is recorded for assertions on attempt counts and ordering.
    pub struct MockTransport {
        pub get_replies: RefCell<VecDeque<MockReply>>,
        pub head_replies: RefCell<VecDeque<std::result::Result<Duration, HttpError>>>,
        pub get_log: RefCell<Vec<String>>,
        pub head_log: RefCell<Vec<(String, bool)>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                get_replies: RefCell::new(VecDeque::new()),
                head_replies: RefCell::new(VecDeque::new()),
                get_log: RefCell::new(Vec::new()),
                head_log: RefCell::new(Vec::new()),
            }
        }

        pub fn with_get_replies(replies: Vec<MockReply>) -> Self {
            let transport = Self::new();
            *transport.get_replies.borrow_mut() = replies.into();
            transport
        }

        pub fn with_head_replies(
            replies: Vec<std::result::Result<Duration, HttpError>>,
        ) -> Self {
            let transport = Self::new();
            *transport.head_replies.borrow_mut() = replies.into();
            transport
        }
    }

    impl Transport for MockTransport {
        fn get(&self, url: &str) -> std::result::Result<HttpResponse, HttpError> {
            self.get_log.borrow_mut().push(url.to_string());
            match self.get_replies.borrow_mut().pop_front() {
                Some(MockReply::Body(bytes)) => Ok(HttpResponse {
                    content_length: Some(bytes.len() as u64),
                    body: Box::new(Cursor::new(bytes)),
                }),
                Some(MockReply::BodyUnsized(bytes)) => Ok(HttpResponse {
                    content_length: None,
                    body: Box::new(Cursor::new(bytes)),
                }),
                Some(MockReply::Fail(e)) => Err(e),
                // An exhausted script keeps failing, which lets tests model
                // an always-down network without enumerating every attempt.
                None => Err(HttpError::Connect("scripted network is down".to_string())),
            }
        }

        fn head(&self, url: &str, insecure: bool) -> std::result::Result<Duration, HttpError> {
            self.head_log.borrow_mut().push((url.to_string(), insecure));
            match self.head_replies.borrow_mut().pop_front() {
                Some(reply) => reply,
                None => Err(HttpError::Connect("scripted network is down".to_string())),
            }
        }
    }

    #[test]
    fn test_mock_transport_replies_in_order() {
        let transport = MockTransport::with_get_replies(vec![
            MockReply::Fail(HttpError::Timeout),
            MockReply::Body(b"data".to_vec()),
        ]);

        assert!(transport.get("http://a").is_err());
        let mut body = Vec::new();
        transport
            .get("http://b")
            .unwrap()
            .body
            .read_to_end(&mut body)
            .unwrap();
        assert_eq!(body, b"data");
        assert_eq!(*transport.get_log.borrow(), vec!["http://a", "http://b"]);
    }

    #[test]
    fn test_mock_transport_exhausted_script_fails() {
        let transport = MockTransport::new();
        assert!(transport.get("http://a").is_err());
        assert!(transport.head("http://a", false).is_err());
    }
}
