//! Serial-backed kernel logger.
//!
//! Drives the COM1 16550 UART and installs it as the global sink for the
//! `log` facade, so every crate in the kernel logs with the ordinary
//! `log::info!` / `log::debug!` macros. Records emitted before
//! [`init()`] are dropped.

#![no_std]

use core::fmt::{self, Write};

use log::{LevelFilter, Metadata, Record};
use spin::Mutex;
use x86_64::instructions::port::{Port, PortReadOnly};

/// COM1 base I/O port.
const COM1: u16 = 0x3F8;

/// 16550 UART on a fixed base port, 115200 baud, 8N1, polled transmit.
struct Uart {
    data: Port<u8>,
    interrupt_enable: Port<u8>,
    fifo_control: Port<u8>,
    line_control: Port<u8>,
    modem_control: Port<u8>,
    line_status: PortReadOnly<u8>,
    ready: bool,
}

impl Uart {
    const fn new(base: u16) -> Self {
        Self {
            data: Port::new(base),
            interrupt_enable: Port::new(base + 1),
            fifo_control: Port::new(base + 2),
            line_control: Port::new(base + 3),
            modem_control: Port::new(base + 4),
            line_status: PortReadOnly::new(base + 5),
            ready: false,
        }
    }

    fn init(&mut self) {
        unsafe {
            // No UART interrupts; the kernel polls the line status instead.
            self.interrupt_enable.write(0x00);

            // DLAB on: the next two data/interrupt-enable writes set the
            // baud divisor. Divisor 1 = 115200 baud.
            self.line_control.write(0x80);
            self.data.write(0x01);
            self.interrupt_enable.write(0x00);

            // DLAB off; 8 data bits, no parity, one stop bit.
            self.line_control.write(0x03);

            // FIFOs on and flushed, 14-byte receive threshold.
            self.fifo_control.write(0xC7);

            // Loop the transmitter back to the receiver and bounce one
            // byte through it to confirm the UART is actually there.
            self.modem_control.write(0x1E);
            self.data.write(0xA5);
            let echoed = self.data.read();

            // Normal operation: DTR + RTS + OUT2.
            self.modem_control.write(0x0F);

            self.ready = echoed == 0xA5;
        }
    }

    fn transmit_empty(&mut self) -> bool {
        unsafe { self.line_status.read() & 0x20 != 0 }
    }

    fn write_byte(&mut self, byte: u8) {
        if !self.ready {
            return;
        }
        while !self.transmit_empty() {
            core::hint::spin_loop();
        }
        unsafe {
            self.data.write(byte);
        }
    }
}

impl fmt::Write for Uart {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            // Serial consoles expect CRLF line endings.
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
        Ok(())
    }
}

static SERIAL: Mutex<Uart> = Mutex::new(Uart::new(COM1));

/// `log::Log` implementation writing level-prefixed lines to COM1.
///
/// Each record is written while holding the serial lock, so lines from
/// different contexts never interleave mid-record. Logging from an
/// interrupt handler while the foreground holds the lock would deadlock;
/// the kernel only logs from interrupt context on fatal paths, where it
/// halts afterwards anyway.
struct SerialLogger;

impl log::Log for SerialLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut serial = SERIAL.lock();
        let _ = writeln!(
            serial,
            "[{:>5}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: SerialLogger = SerialLogger;

/// Initializes COM1 and installs the global logger.
///
/// Call once, as early as possible; everything logged before this call is
/// lost. Safe to call again (the second install attempt is ignored).
pub fn init() {
    SERIAL.lock().init();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

/// Writes raw formatted text to the serial port, bypassing the `log`
/// record format. Used by the panic handler for its banner.
pub fn raw_write(args: fmt::Arguments) {
    let _ = SERIAL.lock().write_fmt(args);
}
