//! PIT (Programmable Interval Timer) driver and tick counter.
//!
//! Channel 0 runs as a rate generator at [`TICK_HZ`]; every expiry raises
//! IRQ0 and the handler bumps the tick counter. The display subsystem is
//! driven off this counter by the foreground loop; it never reads the
//! PIT directly.

use core::sync::atomic::{AtomicU64, Ordering};

use x86_64::instructions::port::Port;

const PIT_CHANNEL0: u16 = 0x40;
const PIT_COMMAND: u16 = 0x43;

/// Input clock of the 8253/8254 in Hz.
const PIT_BASE_HZ: u32 = 1_193_182;

/// Tick rate the kernel runs at.
pub const TICK_HZ: u32 = 100;

/// Milliseconds per tick (10 ms at 100 Hz).
pub const MS_PER_TICK: u64 = 1000 / TICK_HZ as u64;

const DIVISOR: u16 = (PIT_BASE_HZ / TICK_HZ) as u16;

/// Ticks since boot. Written by the IRQ0 handler, read by the foreground
/// loop; a single atomic word so reads never tear.
static TICKS: AtomicU64 = AtomicU64::new(0);

/// Programs channel 0 as a rate generator at [`TICK_HZ`].
pub fn init() {
    let mut command: Port<u8> = Port::new(PIT_COMMAND);
    let mut channel0: Port<u8> = Port::new(PIT_CHANNEL0);

    unsafe {
        // 0x34: channel 0, lobyte/hibyte access, mode 2 (rate generator),
        // binary counting.
        command.write(0x34);
        channel0.write((DIVISOR & 0xFF) as u8);
        channel0.write((DIVISOR >> 8) as u8);
    }

    log::debug!("pit: {} Hz (divisor {})", TICK_HZ, DIVISOR);
}

/// Called by the timer interrupt handler on every expiry.
#[inline]
pub fn on_tick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

/// Ticks since boot.
#[inline]
pub fn ticks() -> u64 {
    TICKS.load(Ordering::Relaxed)
}
