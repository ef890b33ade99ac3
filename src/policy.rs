use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::RemoteError;

/// Which failures a call may be retried on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retry {
    /// Any transient failure. For handshakes and listings, which are safe
    /// to repeat.
    Transient,
    /// Only failures where the request never left. Tool runs are not
    /// idempotent, so a timeout or gateway error is final.
    Unsent,
}

impl Retry {
    fn allows(self, err: &RemoteError) -> bool {
        match self {
            Retry::Transient => err.is_transient(),
            Retry::Unsent => err.is_unsent(),
        }
    }
}

/// Timeout and retry budget applied to each remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallPolicy {
    pub timeout: Duration,
    /// Extra attempts after the first, only for transient failures.
    pub max_retries: u32,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 1,
        }
    }
}

impl CallPolicy {
    /// Run `op` under the timeout, retrying the failures `retry` allows.
    pub async fn run<T, F, Fut>(
        &self,
        operation: &str,
        retry: Retry,
        mut op: F,
    ) -> Result<T, RemoteError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        let mut attempt = 0;
        loop {
            let outcome = match tokio::time::timeout(self.timeout, op()).await {
                Ok(result) => result,
                Err(_elapsed) => Err(RemoteError::Timeout(self.timeout)),
            };

            match outcome {
                Err(e) if retry.allows(&e) && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(operation, attempt, error = %e, "remote failure, retrying");
                }
                other => return other,
            }
        }
    }
}
