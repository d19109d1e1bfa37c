//! IDT setup.

use spin::Once;
use x86_64::structures::idt::InterruptDescriptorTable;

use super::handlers;
use crate::arch::pic;

/// Vector the PIT's IRQ0 arrives on after the PIC remap.
pub const TIMER_VECTOR: u8 = pic::PIC1_OFFSET;
/// Vector the keyboard's IRQ1 arrives on.
pub const KEYBOARD_VECTOR: u8 = pic::PIC1_OFFSET + 1;

static IDT: Once<InterruptDescriptorTable> = Once::new();

/// Builds and loads the IDT.
///
/// Exception handlers cover the faults worth diagnosing during bring-up;
/// the two hardware vectors carry the kernel's entire interrupt load.
/// Limine's GDT stays in place; flat segments are all this kernel needs.
pub fn init_idt() {
    let idt = IDT.call_once(|| {
        let mut idt = InterruptDescriptorTable::new();

        idt.breakpoint.set_handler_fn(handlers::breakpoint);
        idt.double_fault.set_handler_fn(handlers::double_fault);
        idt.general_protection_fault
            .set_handler_fn(handlers::general_protection_fault);
        idt.page_fault.set_handler_fn(handlers::page_fault);

        idt[TIMER_VECTOR].set_handler_fn(handlers::timer);
        idt[KEYBOARD_VECTOR].set_handler_fn(handlers::keyboard);

        idt
    });
    idt.load();
    log::debug!("idt: loaded (timer={}, keyboard={})", TIMER_VECTOR, KEYBOARD_VECTOR);
}
