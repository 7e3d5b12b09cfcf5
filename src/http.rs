use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub attempts: usize,
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn new(timeout: Duration, attempts: usize) -> Self {
        Self {
            connect_timeout: timeout,
            read_timeout: timeout,
            attempts,
            retry_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {status}{detail}")]
    Status { status: u16, detail: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("response decode failed: {0}")]
    Decode(String),

    #[error("request failed after {attempts} attempt(s): {last}")]
    Exhausted {
        attempts: usize,
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Timeouts, throttling, server errors and transport failures are worth another try.
    fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => {
                matches!(status, 408 | 429) || (500..=599).contains(status)
            }
            Self::Transport(_) => true,
            Self::Decode(_) | Self::Exhausted { .. } => false,
        }
    }
}

pub fn get_text_with_retries(url: &str, policy: RetryPolicy) -> Result<String, FetchError> {
    let attempts = policy.attempts.max(1);
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(policy.connect_timeout)
        .timeout_read(policy.read_timeout)
        .timeout_write(policy.read_timeout)
        .build();

    let mut attempt = 1;
    loop {
        debug!(url, attempt, "GET");
        let err = match fetch_once(&agent, url) {
            Ok(body) => return Ok(body),
            Err(err) => err,
        };
        if !err.is_retryable() {
            return Err(err);
        }
        if attempt >= attempts {
            return Err(FetchError::Exhausted {
                attempts,
                last: Box::new(err),
            });
        }
        warn!(url, attempt, error = %err, "request failed, retrying");
        thread::sleep(policy.retry_delay);
        attempt += 1;
    }
}

fn fetch_once(agent: &ureq::Agent, url: &str) -> Result<String, FetchError> {
    match agent.get(url).call() {
        Ok(response) => response
            .into_string()
            .map_err(|err| FetchError::Decode(err.to_string())),
        Err(ureq::Error::Status(status, response)) => {
            let body = response.into_string().unwrap_or_default();
            let body = body.trim();
            let detail = if body.is_empty() {
                String::new()
            } else {
                format!(" ({})", body.chars().take(240).collect::<String>())
            };
            Err(FetchError::Status { status, detail })
        }
        Err(ureq::Error::Transport(err)) => Err(FetchError::Transport(err.to_string())),
    }
}

/// Loopback HTTP server that answers a fixed script of replies, one per connection.
#[cfg(test)]
pub(crate) mod test_server {
    use std::io::{self, BufRead, BufReader, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, Clone)]
    pub(crate) struct Reply {
        status: u16,
        body: String,
        delay: Duration,
    }

    impl Reply {
        pub(crate) fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                delay: Duration::ZERO,
            }
        }

        pub(crate) fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[derive(Debug)]
    pub(crate) struct TestServer {
        pub(crate) base_url: String,
        hits: Arc<AtomicUsize>,
    }

    impl TestServer {
        pub(crate) fn spawn(script: Vec<Reply>) -> Self {
            let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind test server");
            let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
            let hits = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&hits);

            thread::spawn(move || {
                for reply in script {
                    let Ok((stream, _)) = listener.accept() else {
                        return;
                    };
                    counter.fetch_add(1, Ordering::SeqCst);
                    thread::spawn(move || serve(stream, reply));
                }
            });

            Self { base_url, hits }
        }

        pub(crate) fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    fn serve(mut stream: TcpStream, reply: Reply) {
        let _ = read_request_head(&mut stream);
        thread::sleep(reply.delay);
        let _ = write!(
            stream,
            "HTTP/1.1 {} Scripted\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            reply.status,
            reply.body.len(),
            reply.body
        );
        let _ = stream.flush();
    }

    fn read_request_head(stream: &mut TcpStream) -> io::Result<()> {
        stream.set_read_timeout(Some(Duration::from_millis(200)))?;
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 || line == "\r\n" {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_server::{Reply, TestServer};
    use super::*;

    fn fast_policy(attempts: usize) -> RetryPolicy {
        RetryPolicy {
            connect_timeout: Duration::from_millis(200),
            read_timeout: Duration::from_millis(200),
            attempts,
            retry_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn retries_server_errors_and_throttling_until_success() {
        let server = TestServer::spawn(vec![
            Reply::new(500, "server-error"),
            Reply::new(429, "throttled"),
            Reply::new(200, "00 a3A #1: Ep"),
        ]);

        let body = get_text_with_retries(&server.base_url, fast_policy(3))
            .expect("should eventually succeed");

        assert_eq!(body, "00 a3A #1: Ep");
        assert_eq!(server.hits(), 3);
    }

    #[test]
    fn not_found_is_not_retried() {
        let server = TestServer::spawn(vec![Reply::new(404, "not-found")]);

        let err = get_text_with_retries(&server.base_url, fast_policy(5))
            .expect_err("404 should not be retried");

        assert!(
            matches!(err, FetchError::Status { status: 404, .. }),
            "unexpected error: {err}"
        );
        assert_eq!(err.to_string(), "HTTP status 404 (not-found)");
        assert_eq!(server.hits(), 1);
    }

    #[test]
    fn read_timeout_is_retried() {
        let server = TestServer::spawn(vec![
            Reply::new(200, "slow").delayed(Duration::from_millis(150)),
            Reply::new(200, "ok"),
        ]);
        let policy = RetryPolicy {
            connect_timeout: Duration::from_millis(250),
            read_timeout: Duration::from_millis(20),
            attempts: 2,
            retry_delay: Duration::from_millis(1),
        };

        let body = get_text_with_retries(&server.base_url, policy).expect("timeout is retried");

        assert_eq!(body, "ok");
        assert_eq!(server.hits(), 2);
    }

    #[test]
    fn exhausted_retries_report_last_failure() {
        let server = TestServer::spawn(vec![
            Reply::new(503, "down"),
            Reply::new(503, "still-down"),
        ]);

        let err = get_text_with_retries(&server.base_url, fast_policy(2))
            .expect_err("retryable failures should eventually error");

        assert_eq!(
            err.to_string(),
            "request failed after 2 attempt(s): HTTP status 503 (still-down)"
        );
        assert_eq!(server.hits(), 2);
    }
}
