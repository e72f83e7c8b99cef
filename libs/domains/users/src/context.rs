use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::{UserError, UserResult};

/// Explicit deadline/cancellation carrier threaded through every
/// repository and service call.
///
/// Operations call [`CallContext::check`] on entry, before touching any
/// lock, and fail fast once the caller has given up. There is no
/// mid-operation cancellation; critical sections are short enough not to
/// need it.
#[derive(Clone, Debug, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: Option<CancellationToken>,
}

impl CallContext {
    /// An unbounded context: never cancelled, no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_deadline_opt(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail fast if the caller has cancelled or the deadline has passed.
    pub fn check(&self) -> UserResult<()> {
        if let Some(token) = &self.cancel {
            if token.is_cancelled() {
                return Err(UserError::Cancelled);
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(UserError::DeadlineExceeded);
            }
        }
        Ok(())
    }

    /// Resolves when the caller gives up: token cancelled or deadline
    /// passed. Pending forever for an unbounded context.
    pub async fn cancelled(&self) {
        let deadline_passed = async {
            match self.deadline {
                Some(deadline) => {
                    tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await
                }
                None => std::future::pending().await,
            }
        };

        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => {}
                    _ = deadline_passed => {}
                }
            }
            None => deadline_passed.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_context_always_passes() {
        assert!(CallContext::new().check().is_ok());
    }

    #[test]
    fn test_cancelled_token_fails_fast() {
        let token = CancellationToken::new();
        let ctx = CallContext::new().with_token(token.clone());
        assert!(ctx.check().is_ok());

        token.cancel();
        assert_eq!(ctx.check().unwrap_err(), UserError::Cancelled);
    }

    #[test]
    fn test_expired_deadline_fails_fast() {
        let ctx = CallContext::new().with_timeout(Duration::ZERO);
        assert_eq!(ctx.check().unwrap_err(), UserError::DeadlineExceeded);
    }

    #[test]
    fn test_future_deadline_passes() {
        let ctx = CallContext::new().with_timeout(Duration::from_secs(60));
        assert!(ctx.check().is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_resolves_on_token_cancel() {
        let token = CancellationToken::new();
        let ctx = CallContext::new().with_token(token.clone());

        token.cancel();
        // Must not hang.
        ctx.cancelled().await;
    }
}
