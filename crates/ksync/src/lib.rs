//! Kernel synchronization primitives.
//!
//! The kernel has no sleeping scheduler, so blocking here means spinning
//! (with the PAUSE hint) until another execution context makes progress.
//! Both primitives are interrupt-handler safe in the sense that they touch
//! nothing but their own atomics; whether spinning in a given context is
//! appropriate is the caller's call.

#![no_std]

#[cfg(test)]
extern crate std;

mod barrier;
mod semaphore;

pub use barrier::Barrier;
pub use semaphore::Semaphore;
