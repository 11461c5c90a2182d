//! Per-call cancellation and deadline tracking
//!
//! A `CallContext` is built from the incoming request metadata (the
//! `grpc-timeout` header) and optionally tied to the response channel of a
//! streaming call, so that long loops can stop as soon as the client is gone.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;
use tonic::metadata::MetadataMap;

const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("request is canceled")]
    Canceled,

    #[error("deadline is exceeded")]
    DeadlineExceeded,
}

type ClosedProbe = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    canceled: Arc<AtomicBool>,
    closed: Option<ClosedProbe>,
}

impl fmt::Debug for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("deadline", &self.deadline)
            .field("canceled", &self.is_canceled())
            .finish()
    }
}

impl CallContext {
    /// Context with no deadline that is never canceled unless asked to
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::default()
        }
    }

    /// Context honoring the client's `grpc-timeout`, if it sent one
    pub fn from_metadata(metadata: &MetadataMap) -> Self {
        metadata
            .get(GRPC_TIMEOUT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_grpc_timeout)
            .map(Self::with_timeout)
            .unwrap_or_default()
    }

    /// Treat the call as canceled once the receiving half of `tx` is dropped
    ///
    /// The context keeps a sender clone, so it must not outlive the task that
    /// feeds the channel.
    pub fn cancel_on_closed<T: Send + 'static>(mut self, tx: &mpsc::Sender<T>) -> Self {
        let tx = tx.clone();
        self.closed = Some(Arc::new(move || tx.is_closed()));
        self
    }

    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst) || self.closed.as_ref().is_some_and(|probe| probe())
    }

    /// Fails with the reason the call should stop, if any
    pub fn check(&self) -> Result<(), ContextError> {
        if self.is_canceled() {
            return Err(ContextError::Canceled);
        }

        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ContextError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

/// Parse a `grpc-timeout` value: up to 8 ASCII digits followed by one unit
fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    if value.len() < 2 || value.len() > 9 {
        return None;
    }

    let (digits, unit) = value.split_at(value.len() - 1);
    let amount: u64 = digits.parse().ok()?;

    let duration = match unit {
        "H" => Duration::from_secs(amount.checked_mul(3600)?),
        "M" => Duration::from_secs(amount.checked_mul(60)?),
        "S" => Duration::from_secs(amount),
        "m" => Duration::from_millis(amount),
        "u" => Duration::from_micros(amount),
        "n" => Duration::from_nanos(amount),
        _ => return None,
    };

    Some(duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::metadata::MetadataValue;

    #[test]
    fn test_fresh_context_passes() {
        assert_eq!(CallContext::new().check(), Ok(()));
    }

    #[test]
    fn test_cancel_is_shared_by_clones() {
        let ctx = CallContext::new();
        let clone = ctx.clone();

        ctx.cancel();

        assert_eq!(clone.check(), Err(ContextError::Canceled));
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = CallContext::with_deadline(Instant::now() - Duration::from_millis(1));
        assert_eq!(ctx.check(), Err(ContextError::DeadlineExceeded));

        let ctx = CallContext::with_timeout(Duration::from_secs(60));
        assert_eq!(ctx.check(), Ok(()));
    }

    #[test]
    fn test_cancel_wins_over_deadline() {
        let ctx = CallContext::with_deadline(Instant::now() - Duration::from_millis(1));
        ctx.cancel();
        assert_eq!(ctx.check(), Err(ContextError::Canceled));
    }

    #[test]
    fn test_closed_channel_cancels() {
        let (tx, rx) = mpsc::channel::<u8>(1);
        let ctx = CallContext::new().cancel_on_closed(&tx);
        assert_eq!(ctx.check(), Ok(()));

        drop(rx);

        assert_eq!(ctx.check(), Err(ContextError::Canceled));
    }

    #[test]
    fn test_parse_grpc_timeout_units() {
        assert_eq!(parse_grpc_timeout("1H"), Some(Duration::from_secs(3600)));
        assert_eq!(parse_grpc_timeout("2M"), Some(Duration::from_secs(120)));
        assert_eq!(parse_grpc_timeout("5S"), Some(Duration::from_secs(5)));
        assert_eq!(parse_grpc_timeout("250m"), Some(Duration::from_millis(250)));
        assert_eq!(parse_grpc_timeout("10u"), Some(Duration::from_micros(10)));
        assert_eq!(parse_grpc_timeout("99n"), Some(Duration::from_nanos(99)));
    }

    #[test]
    fn test_parse_grpc_timeout_rejects_garbage() {
        assert_eq!(parse_grpc_timeout(""), None);
        assert_eq!(parse_grpc_timeout("S"), None);
        assert_eq!(parse_grpc_timeout("10x"), None);
        assert_eq!(parse_grpc_timeout("123456789S"), None);
        assert_eq!(parse_grpc_timeout("-1S"), None);
    }

    #[test]
    fn test_from_metadata() {
        let mut metadata = MetadataMap::new();
        assert!(CallContext::from_metadata(&metadata).deadline().is_none());

        metadata.insert(GRPC_TIMEOUT_HEADER, MetadataValue::from_static("30S"));
        let deadline = CallContext::from_metadata(&metadata).deadline().unwrap();
        assert!(deadline > Instant::now() + Duration::from_secs(25));
    }
}
