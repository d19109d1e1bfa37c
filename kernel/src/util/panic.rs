//! Kernel panic handler.
//!
//! A panic is a violated kernel invariant (the barrier's over-arrival
//! check, a double fault, an impossible state). Print everything we know
//! over serial and park the CPU; there is nothing to recover to.

use core::panic::PanicInfo;

use crate::arch::cpu;

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    // Bypass the `log` record format; a panic wants a plain banner even
    // if the logger was never installed in this boot.
    klog::raw_write(format_args!("\n*** KERNEL PANIC ***\n"));
    if let Some(location) = info.location() {
        klog::raw_write(format_args!("at {}:{}\n", location.file(), location.line()));
    }
    klog::raw_write(format_args!("{}\n", info.message()));

    cpu::halt_forever()
}
