//! Legacy 8259 PIC (Programmable Interrupt Controller) driver.
//!
//! By default IRQ 0-7 land on vectors 0x08-0x0F, on top of the CPU
//! exception range, so the controller must be remapped before interrupts
//! are enabled. This kernel runs entirely off the legacy pair: IRQ0 (PIT)
//! and IRQ1 (keyboard) stay unmasked, everything else is masked off.

use x86_64::instructions::port::Port;

/// Master PIC command/data ports.
const PIC1_COMMAND: u16 = 0x20;
const PIC1_DATA: u16 = 0x21;

/// Slave PIC command/data ports.
const PIC2_COMMAND: u16 = 0xA0;
const PIC2_DATA: u16 = 0xA1;

/// ICW1: begin initialization, ICW4 follows.
const ICW1_INIT: u8 = 0x10;
const ICW1_ICW4: u8 = 0x01;
/// ICW4: 8086 mode.
const ICW4_8086: u8 = 0x01;

/// End-of-interrupt command.
const EOI: u8 = 0x20;

/// IRQ 0-7 → vectors 32-39, IRQ 8-15 → vectors 40-47.
pub const PIC1_OFFSET: u8 = 32;
pub const PIC2_OFFSET: u8 = 40;

/// IRQ lines this kernel actually services.
const IRQ_TIMER: u8 = 0;
const IRQ_KEYBOARD: u8 = 1;

/// Pacing write to an unused port; old controllers need a moment between
/// successive command bytes.
#[inline]
fn io_wait() {
    unsafe {
        Port::<u8>::new(0x80).write(0);
    }
}

/// Remaps both PICs and masks every line except the timer and keyboard.
///
/// Must run before the IDT accepts hardware interrupts; the vector
/// offsets here have to agree with the IDT's IRQ entries.
pub fn init() {
    let mut pic1_command: Port<u8> = Port::new(PIC1_COMMAND);
    let mut pic1_data: Port<u8> = Port::new(PIC1_DATA);
    let mut pic2_command: Port<u8> = Port::new(PIC2_COMMAND);
    let mut pic2_data: Port<u8> = Port::new(PIC2_DATA);

    unsafe {
        // ICW1: start the init sequence on both controllers.
        pic1_command.write(ICW1_INIT | ICW1_ICW4);
        io_wait();
        pic2_command.write(ICW1_INIT | ICW1_ICW4);
        io_wait();

        // ICW2: vector offsets.
        pic1_data.write(PIC1_OFFSET);
        io_wait();
        pic2_data.write(PIC2_OFFSET);
        io_wait();

        // ICW3: master/slave wiring (slave on IRQ2).
        pic1_data.write(0x04);
        io_wait();
        pic2_data.write(0x02);
        io_wait();

        // ICW4: 8086 mode.
        pic1_data.write(ICW4_8086);
        io_wait();
        pic2_data.write(ICW4_8086);
        io_wait();

        // Masks: only the timer and keyboard lines are open.
        pic1_data.write(!((1 << IRQ_TIMER) | (1 << IRQ_KEYBOARD)));
        pic2_data.write(0xFF);
    }

    log::debug!("pic: remapped to vectors {}..{}", PIC1_OFFSET, PIC2_OFFSET + 8);
}

/// Acknowledges an IRQ. Lines on the slave controller need an EOI at both
/// chips.
pub fn end_of_interrupt(irq: u8) {
    unsafe {
        if irq >= 8 {
            Port::<u8>::new(PIC2_COMMAND).write(EOI);
        }
        Port::<u8>::new(PIC1_COMMAND).write(EOI);
    }
}
