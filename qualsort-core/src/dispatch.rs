/// Bounded-concurrency gate for outbound judge calls.
///
/// Every live call holds one permit for its duration; cache hits bypass the
/// gate entirely. One gate exists per `sort` call and dies with it.
use tokio::sync::{Semaphore, SemaphorePermit};

pub struct Dispatcher {
    gate: Semaphore,
    capacity: usize,
}

impl Dispatcher {
    pub fn new(max_concurrent_requests: usize) -> Self {
        Dispatcher {
            gate: Semaphore::new(max_concurrent_requests),
            capacity: max_concurrent_requests,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Wait for a permit. Released on drop, whether the call succeeded or
    /// failed.
    pub async fn permit(&self) -> SemaphorePermit<'_> {
        // The gate is never closed while the sorter is alive.
        self.gate.acquire().await.expect("dispatcher gate closed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_permits_cycle_through_gate() {
        let dispatcher = Dispatcher::new(2);
        assert_eq!(dispatcher.capacity(), 2);

        let first = dispatcher.permit().await;
        let second = dispatcher.permit().await;
        drop(first);
        drop(second);
        let _third = dispatcher.permit().await;
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_capacity() {
        let dispatcher = Arc::new(Dispatcher::new(3));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let dispatcher = dispatcher.clone();
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            handles.push(tokio::spawn(async move {
                let _permit = dispatcher.permit().await;
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 3);
    }
}
