//! Cooperative cancellation for long-running alignments
//!
//! The DP fill loop polls a [`CancelSignal`] once per row and aborts with
//! [`AlignError::Cancelled`](crate::AlignError::Cancelled) when it fires.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Anything the engine can poll for a cancellation request.
pub trait CancelSignal {
    fn is_cancelled(&self) -> bool;
}

/// Signal that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelSignal for NeverCancel {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shared cancellation flag. Clones observe the same flag, so one clone can
/// be handed to the alignment and another kept by the caller (or a timer).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

impl CancelSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Polling callbacks: the closure returns `true` once work should stop.
impl<F> CancelSignal for F
where
    F: Fn() -> bool,
{
    fn is_cancelled(&self) -> bool {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_token_clones_share_state() {
        let token = CancellationToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_closure_signal() {
        let polls = Cell::new(0);
        let signal = || {
            polls.set(polls.get() + 1);
            polls.get() > 2
        };
        assert!(!signal.is_cancelled());
        assert!(!signal.is_cancelled());
        assert!(signal.is_cancelled());
    }

    #[test]
    fn test_never_cancel() {
        assert!(!NeverCancel.is_cancelled());
    }
}
