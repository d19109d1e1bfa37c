//! Architecture-specific code. Only x86_64 exists; the rest of the
//! kernel goes through `crate::arch::*` and never names the architecture
//! directly.

#[cfg(target_arch = "x86_64")]
pub mod x86_64;

#[cfg(target_arch = "x86_64")]
pub use x86_64::*;
