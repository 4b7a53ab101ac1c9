use std::time::Duration;

use isahc::{
    config::{Configurable, RedirectPolicy},
    http::StatusCode,
    AsyncBody, AsyncReadResponseExt, Request, RequestExt,
};
use serde_json::Value;

use crate::config::Network;
use crate::constants::network::{DEFAULT_RETRIES, DEFAULT_TIMEOUT_SECS};
use crate::debug;
use crate::error::*;

const USER_AGENT: &str = concat!("toolshed/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub timeout: Duration,
    /// Extra attempts after a transient failure
    pub retries: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retries: DEFAULT_RETRIES,
        }
    }
}

impl From<&Network> for FetchOptions {
    fn from(network: &Network) -> Self {
        Self {
            timeout: network.timeout(),
            retries: network.retries,
        }
    }
}

/// Checks the given endpoint is an absolute HTTP or HTTPS URL
///
/// # Errors
/// `NetworkError` if the URL cannot be parsed or uses another scheme
pub fn validate_url(url: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(url.trim()).map_err(|e| Error::NetworkError {
        url: url.to_string(),
        cause: format!("invalid URL ({})", e),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(Error::NetworkError {
            url: url.to_string(),
            cause: format!(
                "URL scheme '{}' is not supported. Only http:// and https:// are supported.",
                scheme
            ),
        }),
    }
}

/// Outcome of a single failed attempt
enum Failure {
    /// Worth another attempt (connection, timeout, 5xx)
    Transient(String),
    Fatal(Error),
}

/// Blocking JSON over HTTP client with a timeout and retries on transient failures
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    options: FetchOptions,
}

impl HttpClient {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Performs a GET request returning the decoded JSON body
    pub fn get_json(&self, url: &str, headers: &[(&str, &str)]) -> Result<Value> {
        let text = self.send("GET", url, headers, None)?;
        decode(url, &text)
    }

    /// POSTs `body` as JSON returning the decoded JSON response
    pub fn post_json(&self, url: &str, headers: &[(&str, &str)], body: &Value) -> Result<Value> {
        let payload = serde_json::to_vec(body)?;
        let text = self.send("POST", url, headers, Some(payload))?;
        decode(url, &text)
    }

    /// Sends the request, retrying transient failures, and returns the body
    /// of the first successful response
    ///
    /// # Errors
    /// `NetworkError` once the attempts are exhausted or on a non retryable status
    pub fn send(
        &self,
        method: &str,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Result<String> {
        validate_url(url)?;
        let attempts = self.options.retries + 1;
        let mut last_cause = String::new();

        for attempt in 1..=attempts {
            debug!("{} {} (attempt {}/{})", method, url, attempt, attempts);
            let result = smol::block_on(self.send_once(method, url, headers, body.clone()));
            match result {
                Ok(text) => return Ok(text),
                Err(Failure::Transient(cause)) => {
                    debug!("Transient failure on {}: {}", url, cause);
                    last_cause = cause;
                }
                Err(Failure::Fatal(e)) => return Err(e),
            }
        }

        Err(Error::NetworkError {
            url: url.to_string(),
            cause: last_cause,
        })
    }

    async fn send_once(
        &self,
        method: &str,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> std::result::Result<String, Failure> {
        let mut builder = Request::builder()
            .method(method)
            .uri(url)
            .timeout(self.options.timeout)
            .redirect_policy(RedirectPolicy::Follow)
            .header("User-Agent", USER_AGENT);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let body = body.map_or_else(AsyncBody::empty, AsyncBody::from);
        let request = builder
            .body(body)
            .map_err(|e| Failure::Fatal(Error::from(e)))?;

        let mut response = request.send_async().await.map_err(|e| {
            if e.is_network() || e.is_timeout() {
                Failure::Transient(e.to_string())
            } else {
                Failure::Fatal(Error::NetworkError {
                    url: url.to_string(),
                    cause: e.to_string(),
                })
            }
        })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(Failure::Transient(status_cause(status)));
        }
        if !status.is_success() {
            return Err(Failure::Fatal(Error::NetworkError {
                url: url.to_string(),
                cause: status_cause(status),
            }));
        }

        response
            .text()
            .await
            .map_err(|e| Failure::Transient(e.to_string()))
    }
}

fn status_cause(status: StatusCode) -> String {
    format!("server returned status {}", status)
}

fn decode(url: &str, text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| Error::NetworkError {
        url: url.to_string(),
        cause: format!("invalid JSON response ({})", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(retries: u32) -> HttpClient {
        HttpClient::new(FetchOptions {
            timeout: Duration::from_secs(2),
            retries,
        })
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://icanhazdadjoke.com/").is_ok());
        assert!(validate_url("http://localhost:8080/api").is_ok());
        assert!(matches!(
            validate_url("ftp://example.com/file"),
            Err(Error::NetworkError { .. })
        ));
        assert!(validate_url("not a url").is_err());
    }

    #[test]
    fn test_get_json() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/joke").header("Accept", "application/json");
            then.status(200).json_body(json!({"id": "1", "joke": "knock knock"}));
        });

        let value = client(1)
            .get_json(&server.url("/joke"), &[("Accept", "application/json")])
            .unwrap();
        assert_eq!(value["joke"], "knock knock");
        mock.assert_hits(1);
    }

    #[test]
    fn test_server_error_is_retried_once() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/flaky");
            then.status(503);
        });

        let result = client(1).get_json(&server.url("/flaky"), &[]);
        assert!(matches!(result, Err(Error::NetworkError { .. })));
        mock.assert_hits(2);
    }

    #[test]
    fn test_client_error_is_not_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/generate");
            then.status(403);
        });

        let result = client(3).post_json(&server.url("/generate"), &[], &json!({"a": 1}));
        match result {
            Err(Error::NetworkError { cause, .. }) => assert!(cause.contains("403")),
            other => panic!("unexpected result {:?}", other),
        }
        mock.assert_hits(1);
    }

    #[test]
    fn test_timeout() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(json!({}));
        });

        let client = HttpClient::new(FetchOptions {
            timeout: Duration::from_millis(200),
            retries: 0,
        });
        assert!(matches!(
            client.get_json(&server.url("/slow"), &[]),
            Err(Error::NetworkError { .. })
        ));
        mock.assert_hits(1);
    }

    #[test]
    fn test_invalid_json_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/html");
            then.status(200).body("<html></html>");
        });
        assert!(matches!(
            client(0).get_json(&server.url("/html"), &[]),
            Err(Error::NetworkError { .. })
        ));
    }
}
