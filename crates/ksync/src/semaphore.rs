//! Counting semaphore with spin-wait semantics.

use core::sync::atomic::{AtomicU32, Ordering};

/// A counting semaphore.
///
/// `post()` adds a permit; `wait()` consumes one, spinning until a permit
/// is available. There is no waiter queue and no fairness guarantee: when
/// several contexts spin in `wait()`, an arbitrary one wins each permit.
pub struct Semaphore {
    permits: AtomicU32,
}

impl Semaphore {
    /// Creates a semaphore holding `permits` initial permits.
    pub const fn new(permits: u32) -> Self {
        Self {
            permits: AtomicU32::new(permits),
        }
    }

    /// Adds one permit, releasing at most one spinning waiter.
    pub fn post(&self) {
        self.permits.fetch_add(1, Ordering::Release);
    }

    /// Consumes one permit without spinning.
    ///
    /// Returns `true` if a permit was taken, `false` if none were available.
    pub fn try_wait(&self) -> bool {
        let mut available = self.permits.load(Ordering::Acquire);
        while available > 0 {
            match self.permits.compare_exchange_weak(
                available,
                available - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(seen) => available = seen,
            }
        }
        false
    }

    /// Consumes one permit, spinning until one is available.
    ///
    /// There is no timeout: if no other context ever posts, this spins
    /// forever.
    pub fn wait(&self) {
        while !self.try_wait() {
            core::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn initial_permits_are_consumable() {
        let sem = Semaphore::new(2);
        assert!(sem.try_wait());
        assert!(sem.try_wait());
        assert!(!sem.try_wait());
    }

    #[test]
    fn post_releases_a_waiter() {
        let sem = Arc::new(Semaphore::new(0));
        let woke = Arc::new(AtomicBool::new(false));

        let handle = {
            let sem = Arc::clone(&sem);
            let woke = Arc::clone(&woke);
            thread::spawn(move || {
                sem.wait();
                woke.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!woke.load(Ordering::SeqCst), "waiter ran without a permit");

        sem.post();
        handle.join().unwrap();
        assert!(woke.load(Ordering::SeqCst));
    }
}
