//! HTTP plumbing: the [`Transport`] that performs one GET, and the
//! [`RequestExecutor`] that retries it.

use crate::config::{RetryPolicy, ScraperConfig, ACCEPT, USER_AGENT};
use crate::error::{RequestFailure, ScrapeError, ScrapeResult, TransportError};
use crate::types::Endpoint;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde_json::Value;
use std::thread;
use tracing::{debug, warn};

/// Status and body of a completed HTTP exchange, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 403 || self.status == 429
    }
}

/// Performs a single GET. Errors are transport failures only; HTTP error
/// statuses come back as a [`RawResponse`].
pub trait Transport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, TransportError>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(config: &ScraperConfig) -> ScrapeResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("token {}", token))
                .map_err(|_| ScrapeError::ClientSetup("token is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|err| ScrapeError::ClientSetup(err.to_string()))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, TransportError> {
        let response = self.client.get(url).query(query).send()?;

        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(RawResponse { status, body })
    }
}

pub struct RequestExecutor<T = HttpTransport> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch `endpoint` and decode the body as JSON.
    ///
    /// Transient failures are retried up to `max_attempts` times with doubling
    /// backoff. Rate-limit responses sleep `rate_limit_wait` and ask again
    /// without using up an attempt, at most `max_rate_limit_waits` times.
    pub fn get_json(&self, endpoint: &Endpoint) -> ScrapeResult<Value> {
        let url = endpoint.url.as_str();
        let mut attempt = 1;
        let mut rate_limit_waits = 0;

        loop {
            debug!(url, attempt, "sending request");

            let failure = match self.transport.get(url, &endpoint.query) {
                Ok(response) if response.is_success() => {
                    return serde_json::from_str(&response.body).map_err(|source| {
                        ScrapeError::MalformedResponse {
                            url: url.to_string(),
                            source,
                        }
                    });
                }
                Ok(response) if response.is_rate_limited() => {
                    if rate_limit_waits >= self.policy.max_rate_limit_waits {
                        return Err(ScrapeError::RequestFailed {
                            url: url.to_string(),
                            cause: RequestFailure::Status(response.status),
                        });
                    }
                    rate_limit_waits += 1;
                    warn!(
                        url,
                        status = response.status,
                        wait_secs = self.policy.rate_limit_wait.as_secs(),
                        "rate limit reached, waiting"
                    );
                    thread::sleep(self.policy.rate_limit_wait);
                    continue;
                }
                Ok(response) => RequestFailure::Status(response.status),
                Err(cause) => RequestFailure::Transport(cause),
            };

            if attempt >= self.policy.max_attempts {
                return Err(ScrapeError::RequestFailed {
                    url: url.to_string(),
                    cause: failure,
                });
            }

            let delay = self.policy.backoff_after(attempt);
            warn!(
                url,
                attempt,
                error = %failure,
                delay_ms = delay.as_millis() as u64,
                "request failed, retrying"
            );
            thread::sleep(delay);
            attempt += 1;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned outcomes in order and records every requested URL.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        replies: RefCell<VecDeque<Result<RawResponse, String>>>,
        pub(crate) requests: RefCell<Vec<(String, Vec<(String, String)>)>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new(replies: Vec<Result<RawResponse, String>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                requests: RefCell::default(),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Transport for ScriptedTransport {
        fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, TransportError> {
            self.requests
                .borrow_mut()
                .push((url.to_string(), query.to_vec()));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err("no scripted reply left".into()))
                .map_err(TransportError::from)
        }
    }

    pub(crate) fn ok(body: &str) -> Result<RawResponse, String> {
        status(200, body)
    }

    pub(crate) fn status(code: u16, body: &str) -> Result<RawResponse, String> {
        Ok(RawResponse {
            status: code,
            body: body.to_string(),
        })
    }

    fn executor(replies: Vec<Result<RawResponse, String>>) -> RequestExecutor<ScriptedTransport> {
        RequestExecutor::new(ScriptedTransport::new(replies), RetryPolicy::immediate())
    }

    fn endpoint() -> Endpoint {
        Endpoint::new("https://api.github.com/repos/a/b".into())
    }

    #[test]
    fn success_on_third_attempt_hides_earlier_failures() {
        let executor = executor(vec![
            Err("connection reset".into()),
            Err("timed out".into()),
            ok(r#"{"name": "b"}"#),
        ]);

        let value = executor.get_json(&endpoint()).unwrap();
        assert_eq!(value["name"], "b");
        assert_eq!(executor.transport().calls(), 3);
    }

    #[test]
    fn three_transport_failures_fail_with_last_cause() {
        let executor = executor(vec![
            Err("connection reset".into()),
            Err("connection reset".into()),
            Err("timed out".into()),
            ok("{}"),
        ]);

        match executor.get_json(&endpoint()) {
            Err(ScrapeError::RequestFailed {
                cause: RequestFailure::Transport(err),
                ..
            }) => assert_eq!(err.to_string(), "timed out"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(executor.transport().calls(), 3);
    }

    #[test]
    fn http_errors_follow_transient_path() {
        let executor = executor(vec![status(502, ""), status(404, "{}"), status(500, "")]);
        let err = executor.get_json(&endpoint()).unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(executor.transport().calls(), 3);
    }

    #[test]
    fn rate_limit_does_not_use_up_attempts() {
        let executor = executor(vec![
            status(403, "{}"),
            Err("timed out".into()),
            status(429, "{}"),
            status(403, "{}"),
            Err("timed out".into()),
            ok("[]"),
        ]);

        assert_eq!(executor.get_json(&endpoint()).unwrap(), Value::Array(vec![]));
        assert_eq!(executor.transport().calls(), 6);
    }

    #[test]
    fn rate_limit_waits_are_bounded() {
        let policy = RetryPolicy {
            max_rate_limit_waits: 2,
            ..RetryPolicy::immediate()
        };
        let executor = RequestExecutor::new(
            ScriptedTransport::new(vec![status(403, ""), status(403, ""), status(403, ""), ok("{}")]),
            policy,
        );

        let err = executor.get_json(&endpoint()).unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(executor.transport().calls(), 3);
    }

    #[test]
    fn invalid_json_is_malformed() {
        let executor = executor(vec![ok("<html>not json</html>")]);
        assert!(matches!(
            executor.get_json(&endpoint()),
            Err(ScrapeError::MalformedResponse { .. })
        ));
        assert_eq!(executor.transport().calls(), 1);
    }

    #[test]
    fn forwards_query_parameters() {
        let executor = executor(vec![ok("[]")]);
        let endpoint = Endpoint::new("https://api.github.com/repos/a/b/commits".into())
            .param("per_page", 5);
        executor.get_json(&endpoint).unwrap();

        let requests = executor.transport().requests.borrow();
        assert_eq!(requests[0].0, "https://api.github.com/repos/a/b/commits");
        assert_eq!(requests[0].1, vec![("per_page".to_string(), "5".to_string())]);
    }
}
