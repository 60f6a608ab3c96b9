//! Bounded retry for engine transitions
//!
//! The engine may reject a transition while another one is pending. Callers
//! get a plain boolean back: exhausting the attempts is a soft failure, not an
//! error.

use std::time::Duration;

/// Attempt count and spacing for a retried engine call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,

    /// Sleep between two attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a new policy
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Call `op` until it returns true or the attempts run out
    ///
    /// There is no sleep after the last attempt.
    pub async fn run<F>(&self, what: &str, mut op: F) -> bool
    where
        F: FnMut() -> bool,
    {
        for attempt in 1..=self.attempts {
            if op() {
                if attempt > 1 {
                    tracing::debug!("{} succeeded on attempt {}", what, attempt);
                }
                return true;
            }

            if attempt < self.attempts {
                tokio::time::sleep(self.delay).await;
            }
        }

        tracing::warn!("{} rejected {} times, giving up", what, self.attempts);
        false
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(4, Duration::from_millis(250))
    }
}
