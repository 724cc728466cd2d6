//! Cooperative cancellation and deadlines for a matching run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::PipelineError;

/// Shared flag that asks a running pipeline to stop
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Fresh, untriggered token
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this token to stop
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// True once [`cancel`](Self::cancel) was called on any clone
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Cancellation token plus an optional time budget
#[derive(Debug, Clone)]
pub struct RunControl {
    token: CancelToken,
    started: Instant,
    timeout: Option<Duration>,
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RunControl {
    /// No deadline, fresh token; the clock starts now
    pub fn new() -> Self {
        Self {
            token: CancelToken::new(),
            started: Instant::now(),
            timeout: None,
        }
    }

    /// Stop the run once `timeout` has elapsed since construction
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Share an existing token
    pub fn with_token(mut self, token: CancelToken) -> Self {
        self.token = token;
        self
    }

    /// Token observed by this run
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Time since construction
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Err when the run should stop; cancellation wins over the deadline
    pub fn check(&self) -> Result<(), PipelineError> {
        if self.token.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        match self.timeout {
            Some(timeout) if self.elapsed() >= timeout => Err(PipelineError::TimedOut(timeout)),
            _ => Ok(()),
        }
    }
}
