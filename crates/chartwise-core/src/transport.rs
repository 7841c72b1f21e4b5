//! Request lifecycle: deadlines, cancellation, and stale-result discard.

use crate::error::{AnalysisError, RequestResult};
use crate::keys::ProviderKind;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Run `fut` until it completes, `timeout` elapses, or `token` is cancelled.
///
/// On timeout the token is cancelled too, so anything else observing it stops.
/// The future is dropped in both failure cases, which aborts an in-flight
/// HTTP request.
pub async fn with_deadline<T, F>(
    provider: ProviderKind,
    token: &CancellationToken,
    timeout: Duration,
    fut: F,
) -> RequestResult<T>
where
    F: Future<Output = RequestResult<T>>,
{
    if token.is_cancelled() {
        return Err(AnalysisError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(AnalysisError::Cancelled),
        _ = tokio::time::sleep(timeout) => {
            token.cancel();
            tracing::debug!(
                %provider,
                timeout_ms = timeout.as_millis() as u64,
                "Request timed out"
            );
            Err(AnalysisError::Timeout {
                provider,
                timeout_ms: timeout.as_millis() as u64,
            })
        }
        result = fut => result,
    }
}

/// Generation token returned by [`ResultSlot::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

struct SlotState<T> {
    generation: u64,
    value: Option<T>,
}

/// Holds the latest result of a repeatable request.
///
/// Each request takes a ticket; only the newest ticket may store its result,
/// so a slow earlier request can never overwrite a later one.
pub struct ResultSlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T: Clone> ResultSlot<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                generation: 0,
                value: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        // The state is a counter and a value; a panic mid-update cannot leave it torn
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a new request, superseding any in flight.
    pub fn begin(&self) -> Ticket {
        let mut state = self.lock();
        state.generation += 1;
        Ticket(state.generation)
    }

    /// Store `value` if `ticket` is still the newest. Returns whether it was stored.
    pub fn complete(&self, ticket: Ticket, value: T) -> bool {
        let mut state = self.lock();
        if ticket.0 != state.generation {
            tracing::debug!(
                ticket = ticket.0,
                current = state.generation,
                "Discarding stale result"
            );
            return false;
        }
        state.value = Some(value);
        true
    }

    /// Record that the request for `ticket` failed, clearing the shown value if
    /// it is still the newest.
    pub fn fail(&self, ticket: Ticket) -> bool {
        let mut state = self.lock();
        if ticket.0 != state.generation {
            return false;
        }
        state.value = None;
        true
    }

    /// Clear the stored value and invalidate every outstanding ticket.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.value = None;
    }

    /// The most recently stored value.
    pub fn latest(&self) -> Option<T> {
        self.lock().value.clone()
    }
}

impl<T: Clone> Default for ResultSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: ProviderKind = ProviderKind::Perplexity;

    #[tokio::test(start_paused = true)]
    async fn test_deadline_passes_result_through() {
        let token = CancellationToken::new();
        let result = with_deadline(P, &token, Duration::from_secs(30), async { Ok(7) }).await;
        assert_eq!(result, Ok(7));
        assert!(!token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_times_out_and_cancels_token() {
        let token = CancellationToken::new();
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("late")
        };
        let result = with_deadline(P, &token, Duration::from_secs(30), slow).await;
        assert_eq!(
            result,
            Err(AnalysisError::Timeout {
                provider: P,
                timeout_ms: 30_000
            })
        );
        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_external_cancel_yields_cancelled() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });

        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        };
        let result = with_deadline(P, &token, Duration::from_secs(30), slow).await;
        assert_eq!(result, Err(AnalysisError::Cancelled));
    }

    #[tokio::test]
    async fn test_already_cancelled_skips_future() {
        let token = CancellationToken::new();
        token.cancel();
        let polled = std::sync::atomic::AtomicBool::new(false);
        let result = with_deadline(P, &token, Duration::from_secs(1), async {
            polled.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        })
        .await;
        assert_eq!(result, Err(AnalysisError::Cancelled));
        assert!(!polled.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_slot_discards_superseded_result() {
        let slot = ResultSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert!(slot.complete(second, "AAPL"));
        assert!(!slot.complete(first, "MSFT"));
        assert_eq!(slot.latest(), Some("AAPL"));
    }

    #[test]
    fn test_slot_keeps_previous_value_while_loading() {
        let slot = ResultSlot::new();
        let t = slot.begin();
        slot.complete(t, 1);
        let t2 = slot.begin();
        assert_eq!(slot.latest(), Some(1));
        assert!(slot.complete(t2, 2));
        assert_eq!(slot.latest(), Some(2));
    }

    #[test]
    fn test_slot_failure_clears_only_when_current() {
        let slot = ResultSlot::new();
        let stale = slot.begin();
        let current = slot.begin();
        slot.complete(current, "NVDA");

        assert!(!slot.fail(stale));
        assert_eq!(slot.latest(), Some("NVDA"));

        let next = slot.begin();
        assert!(slot.fail(next));
        assert_eq!(slot.latest(), None);
    }

    #[test]
    fn test_slot_reset_invalidates_outstanding() {
        let slot = ResultSlot::new();
        let t = slot.begin();
        slot.reset();
        assert!(!slot.complete(t, 1));
        assert!(!slot.fail(t));
        assert_eq!(slot.latest(), None);
    }
}
