//! CPU utilities: thin wrappers over privileged instructions.

/// Halts until the next interrupt. The foreground loop's idle step.
#[inline(always)]
pub fn halt() {
    x86_64::instructions::hlt();
}

/// Disables interrupts and halts forever. Fatal-error parking.
pub fn halt_forever() -> ! {
    x86_64::instructions::interrupts::disable();
    loop {
        x86_64::instructions::hlt();
    }
}

/// Enables maskable interrupts.
#[inline(always)]
pub fn enable_interrupts() {
    x86_64::instructions::interrupts::enable();
}
