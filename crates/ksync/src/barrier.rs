//! One-shot rendezvous barrier.

use core::sync::atomic::{AtomicI32, Ordering};

use crate::Semaphore;

/// A single-use rendezvous point for a fixed set of execution contexts.
///
/// Built for exactly `parties` participants, each of which calls
/// [`sync()`](Barrier::sync) exactly once. Nobody passes the barrier until
/// everyone has arrived.
///
/// The release mechanism is a single-token relay: the last arrival posts
/// one semaphore permit and returns immediately; every earlier arrival is
/// parked consuming that permit and re-posts it the moment it wakes, handing
/// the token to the next waiter. Exactly one token circulates, so every
/// party wakes exactly once.
///
/// The barrier is exhausted after one use. A repeatable rendezvous (say,
/// once per frame) needs a fresh `Barrier` per phase; reusing this one
/// trips the over-arrival check below.
pub struct Barrier {
    remaining: AtomicI32,
    token: Semaphore,
}

impl Barrier {
    /// Creates a barrier for `parties` participants.
    ///
    /// # Panics
    ///
    /// Panics if `parties` is zero.
    pub fn new(parties: u32) -> Self {
        assert!(parties >= 1, "a barrier needs at least one party");
        Self {
            remaining: AtomicI32::new(parties as i32),
            token: Semaphore::new(0),
        }
    }

    /// Arrives at the barrier and blocks until all parties have arrived.
    ///
    /// There is no timeout: a party that never shows up stalls everyone
    /// else forever. That is inherent to a fixed-party rendezvous and is
    /// the caller's contract to uphold.
    ///
    /// # Panics
    ///
    /// Panics if called more times than the barrier was built for. An
    /// extra arrival is a caller bookkeeping bug that would desynchronize
    /// the token relay, so it is fatal rather than tolerated.
    pub fn sync(&self) {
        let left = self.remaining.fetch_sub(1, Ordering::AcqRel) - 1;
        if left < 0 {
            panic!("barrier over-arrival: more sync() calls than configured parties");
        }
        if left == 0 {
            // Last arrival: seed the relay and go.
            self.token.post();
        } else {
            // Park until the token reaches us, then pass it on.
            self.token.wait();
            self.token.post();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use std::vec::Vec;

    #[test]
    fn all_parties_released_after_last_arrival() {
        const PARTIES: u32 = 4;
        let barrier = Arc::new(Barrier::new(PARTIES));
        let arrived = Arc::new(AtomicU32::new(0));

        let handles: Vec<_> = (0..PARTIES)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let arrived = Arc::clone(&arrived);
                thread::spawn(move || {
                    arrived.fetch_add(1, Ordering::SeqCst);
                    barrier.sync();
                    // Nobody gets here before every party has checked in.
                    assert_eq!(arrived.load(Ordering::SeqCst), PARTIES);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn nobody_passes_until_the_last_party_arrives() {
        let barrier = Arc::new(Barrier::new(3));
        let released = Arc::new(AtomicU32::new(0));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let released = Arc::clone(&released);
                thread::spawn(move || {
                    barrier.sync();
                    released.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        // Two of three parties have arrived; neither may be through yet.
        thread::sleep(Duration::from_millis(50));
        assert_eq!(released.load(Ordering::SeqCst), 0);

        barrier.sync();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(released.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[should_panic(expected = "over-arrival")]
    fn extra_arrival_panics() {
        let barrier = Arc::new(Barrier::new(3));

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || barrier.sync())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // The barrier is exhausted; a fourth arrival is a caller bug.
        barrier.sync();
    }

    #[test]
    #[should_panic(expected = "at least one party")]
    fn zero_parties_is_rejected() {
        let _ = Barrier::new(0);
    }

    #[test]
    fn single_party_barrier_does_not_block() {
        let barrier = Barrier::new(1);
        barrier.sync();
    }
}
