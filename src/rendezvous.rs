//! Bounded polling for values the remote side produces asynchronously.
//!
//! [`poll_until`] knows nothing about Slack: it runs a poll operation up to
//! `max_attempts` times, sleeping a fixed interval between attempts, and
//! stops at the first value the predicate accepts.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;

use crate::log_debug;

/// Attempt budget and fixed inter-attempt delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    max_attempts: u32,
    interval: Duration,
}

impl PollPolicy {
    /// A budget of zero is raised to one; a poll always runs at least once.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(20, Duration::from_secs(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Ready { value: T, attempts: u32 },
    Exhausted { attempts: u32 },
}

impl<T> PollOutcome<T> {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Ready { attempts, .. } | Self::Exhausted { attempts } => *attempts,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Ready { value, .. } => Some(value),
            Self::Exhausted { .. } => None,
        }
    }
}

/// Poll until `accept` returns true or the budget runs out.
///
/// `poll` receives the 1-based attempt number. Attempts never overlap: the
/// next one starts only after the previous future resolved and the interval
/// elapsed. No delay follows the final attempt.
pub async fn poll_until<T, F, Fut, P>(policy: PollPolicy, mut poll: F, accept: P) -> PollOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = T>,
    P: Fn(&T) -> bool,
{
    let attempts = AtomicU32::new(0);
    let attempts_ref = &attempts;
    let accept_ref = &accept;

    let retries = usize::try_from(policy.max_attempts - 1).unwrap_or(usize::MAX);
    let strategy = FixedInterval::new(policy.interval).take(retries);

    let result = Retry::start(strategy, move || {
        let attempt = attempts_ref.fetch_add(1, Ordering::Relaxed) + 1;
        log_debug!("Poll attempt {}/{}", attempt, policy.max_attempts);
        let pending = poll(attempt);
        async move {
            let value = pending.await;
            if accept_ref(&value) { Ok(value) } else { Err(()) }
        }
    })
    .await;

    let attempts = attempts.into_inner();
    match result {
        Ok(value) => PollOutcome::Ready { value, attempts },
        Err(()) => PollOutcome::Exhausted { attempts },
    }
}
