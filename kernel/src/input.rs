//! Keyboard input: scancode queue and transport-control decoding.
//!
//! The IRQ1 handler produces raw scancodes into a fixed ring buffer; the
//! foreground loop consumes them and decodes key presses into transport
//! events. Raw bytes cross the interrupt boundary, decoding state stays
//! entirely in the foreground.

use pc_keyboard::layouts::Us104Key;
use pc_keyboard::{DecodedKey, HandleControl, KeyCode, Keyboard, ScancodeSet1};
use spin::Mutex;
use x86_64::instructions::interrupts;

/// A decoded transport-control request.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ControlEvent {
    /// Space: toggle Playing/Paused.
    PlayPause,
    /// `n` or right arrow: next track (forward transition).
    Next,
    /// `b` or left arrow: previous track (backward transition).
    Back,
}

const QUEUE_SIZE: usize = 64;

/// Scancode ring buffer between the IRQ handler and the foreground loop.
/// Drops new scancodes when full; a transport key lost under that much
/// backlog is the least of our problems.
struct ScancodeQueue {
    buf: [u8; QUEUE_SIZE],
    read: usize,
    write: usize,
    count: usize,
}

impl ScancodeQueue {
    const fn new() -> Self {
        Self {
            buf: [0; QUEUE_SIZE],
            read: 0,
            write: 0,
            count: 0,
        }
    }

    fn push(&mut self, scancode: u8) {
        if self.count == QUEUE_SIZE {
            return;
        }
        self.buf[self.write] = scancode;
        self.write = (self.write + 1) % QUEUE_SIZE;
        self.count += 1;
    }

    fn pop(&mut self) -> Option<u8> {
        if self.count == 0 {
            return None;
        }
        let scancode = self.buf[self.read];
        self.read = (self.read + 1) % QUEUE_SIZE;
        self.count -= 1;
        Some(scancode)
    }
}

// Lock discipline: the IRQ handler takes this lock; the foreground only
// takes it with interrupts disabled, so the handler can never preempt a
// holder on the same core.
static SCANCODES: Mutex<ScancodeQueue> = Mutex::new(ScancodeQueue::new());

static DECODER: Mutex<Option<Keyboard<Us104Key, ScancodeSet1>>> = Mutex::new(None);

/// Sets up the scancode decoder. Call once before enabling IRQ1.
pub fn init() {
    *DECODER.lock() = Some(Keyboard::new(
        ScancodeSet1::new(),
        Us104Key,
        HandleControl::Ignore,
    ));
}

/// Called from the keyboard interrupt handler.
pub fn push_scancode(scancode: u8) {
    SCANCODES.lock().push(scancode);
}

/// Drains the scancode queue until a transport key press decodes, or the
/// queue is empty. Foreground only.
pub fn next_event() -> Option<ControlEvent> {
    let mut decoder = DECODER.lock();
    let decoder = decoder.as_mut()?;

    while let Some(scancode) = interrupts::without_interrupts(|| SCANCODES.lock().pop()) {
        let Ok(Some(event)) = decoder.add_byte(scancode) else {
            continue;
        };
        let Some(key) = decoder.process_keyevent(event) else {
            continue;
        };
        let control = match key {
            DecodedKey::Unicode(' ') => Some(ControlEvent::PlayPause),
            DecodedKey::Unicode('n') => Some(ControlEvent::Next),
            DecodedKey::Unicode('b') => Some(ControlEvent::Back),
            DecodedKey::RawKey(KeyCode::ArrowRight) => Some(ControlEvent::Next),
            DecodedKey::RawKey(KeyCode::ArrowLeft) => Some(ControlEvent::Back),
            _ => None,
        };
        if control.is_some() {
            return control;
        }
    }
    None
}
