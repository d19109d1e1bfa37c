//! Interrupt and exception handlers.

use x86_64::instructions::port::Port;
use x86_64::structures::idt::{InterruptStackFrame, PageFaultErrorCode};

use crate::arch::{cpu, pic, pit};
use crate::input;

/// PS/2 controller data port.
const PS2_DATA: u16 = 0x60;

/// Timer interrupt (IRQ0). The kernel's heartbeat: bump the tick counter
/// and acknowledge. All display work happens later, in the foreground
/// loop, never in interrupt context.
pub extern "x86-interrupt" fn timer(_frame: InterruptStackFrame) {
    pit::on_tick();
    pic::end_of_interrupt(0);
}

/// Keyboard interrupt (IRQ1). Reads the scancode (which also clears the
/// controller's output buffer) and hands it to the input queue; decoding
/// happens in the foreground.
pub extern "x86-interrupt" fn keyboard(_frame: InterruptStackFrame) {
    let scancode = unsafe { Port::<u8>::new(PS2_DATA).read() };
    input::push_scancode(scancode);
    pic::end_of_interrupt(1);
}

/// Breakpoint (INT3): report and continue.
pub extern "x86-interrupt" fn breakpoint(frame: InterruptStackFrame) {
    log::warn!("breakpoint at {:#018x}", frame.instruction_pointer.as_u64());
}

/// General protection fault: unrecoverable during bring-up.
pub extern "x86-interrupt" fn general_protection_fault(
    frame: InterruptStackFrame,
    error_code: u64,
) {
    log::error!("GENERAL PROTECTION FAULT (error {:#x})", error_code);
    log::error!("{:#?}", frame);
    cpu::halt_forever();
}

/// Page fault: print the faulting address and halt.
pub extern "x86-interrupt" fn page_fault(frame: InterruptStackFrame, error_code: PageFaultErrorCode) {
    log::error!("PAGE FAULT at {:?}", x86_64::registers::control::Cr2::read());
    log::error!("error code: {:?}", error_code);
    log::error!("{:#?}", frame);
    cpu::halt_forever();
}

/// Double fault: the CPU failed to invoke another handler. Abort.
pub extern "x86-interrupt" fn double_fault(frame: InterruptStackFrame, _error_code: u64) -> ! {
    panic!("DOUBLE FAULT\n{:#?}", frame);
}
