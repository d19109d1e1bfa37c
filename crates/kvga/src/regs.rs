//! VGA register protocol layer.
//!
//! The VGA controller is programmed through a handful of register groups,
//! most of them behind an index-then-data convention: write the register
//! number to the group's index port, then the value to the port one above
//! it. Two groups break the pattern. The attribute controller multiplexes
//! index and data bytes onto a single port, with a controller-internal
//! flip-flop deciding which it expects next; reading the input status port
//! forces the flip-flop back to the index state. The DAC takes one index
//! write selecting a color slot, after which consecutive R,G,B byte writes
//! auto-advance through the slots.
//!
//! None of these operations can fail at this level. Writing groups in the
//! wrong order corrupts the display silently, so the ordering lives in one
//! place: [`VgaRegisters::program`].

use bitflags::bitflags;
use x86_64::instructions::port::{Port, PortReadOnly, PortWriteOnly};

use crate::palette::Rgb;

// ── Port map ──────────────────────────────────────────────────────

/// Attribute controller index/data port (shared, flip-flop selected).
const ATTRIBUTE_PORT: u16 = 0x3C0;
/// Input status #1 (color aliasing). Reading it resets the attribute
/// flip-flop to the index state. Aliases at 0x3BA when the misc output
/// register selects monochrome port mapping.
const INPUT_STATUS: u16 = 0x3DA;
/// Miscellaneous output register: write port (reads are at 0x3CC).
const MISC_WRITE: u16 = 0x3C2;
const MISC_READ: u16 = 0x3CC;
/// Sequencer index port (data at 0x3C5).
const SEQUENCER_INDEX: u16 = 0x3C4;
/// Graphics controller index port (data at 0x3CF).
const GRAPHICS_INDEX: u16 = 0x3CE;
/// CRT controller index port, color mapping (data at 0x3D5). Only
/// decoded when misc output bit 0 is set.
const CRTC_COLOR_INDEX: u16 = 0x3D4;
/// CRT controller index port, monochrome mapping (data at 0x3B5).
const CRTC_MONO_INDEX: u16 = 0x3B4;
/// DAC pixel mask; 0xFF passes palette indices through untouched.
const DAC_MASK: u16 = 0x3C6;
/// DAC read-index and write-index selectors.
const DAC_READ_INDEX: u16 = 0x3C7;
const DAC_WRITE_INDEX: u16 = 0x3C8;
/// DAC data port: R, G, B bytes, slot auto-advances per triple.
const DAC_DATA: u16 = 0x3C9;

bitflags! {
    /// Miscellaneous output register bits.
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct MiscOutput: u8 {
        /// I/O address select: set = CRTC and input status decode at
        /// 0x3Dx (color), clear = 0x3Bx (monochrome).
        const IO_ADDRESS_SELECT = 1 << 0;
        /// Enable CPU access to display memory.
        const RAM_ENABLE = 1 << 1;
        /// Pixel clock select, low bit (01 = 28.3 MHz crystal).
        const CLOCK_SELECT_0 = 1 << 2;
        /// Pixel clock select, high bit.
        const CLOCK_SELECT_1 = 1 << 3;
        /// Select the upper 64K page in odd/even addressing.
        const ODD_EVEN_PAGE = 1 << 5;
        /// Negative-going horizontal sync.
        const HSYNC_NEGATIVE = 1 << 6;
        /// Negative-going vertical sync.
        const VSYNC_NEGATIVE = 1 << 7;
    }
}

// ── Register group handles ────────────────────────────────────────

/// An indexed register group: index byte to the index port, data byte to
/// index port + 1. The pair of writes must not be interleaved with any
/// other access to the same group.
struct Indexed {
    index: Port<u8>,
    data: Port<u8>,
}

impl Indexed {
    const fn new(index_port: u16) -> Self {
        Self {
            index: Port::new(index_port),
            data: Port::new(index_port + 1),
        }
    }

    fn write(&mut self, register: u8, value: u8) {
        unsafe {
            self.index.write(register);
            self.data.write(value);
        }
    }

    fn read(&mut self, register: u8) -> u8 {
        unsafe {
            self.index.write(register);
            self.data.read()
        }
    }

    /// Writes `values[i]` to register `i` for the whole table.
    fn write_table(&mut self, values: &[u8]) {
        for (register, &value) in values.iter().enumerate() {
            self.write(register as u8, value);
        }
    }
}

/// The attribute controller's single-port index/data cycle.
///
/// The controller keeps an internal flip-flop deciding whether the next
/// write to 0x3C0 is an index or a data byte. Its state is unknowable
/// after arbitrary BIOS or boot activity, so every cycle here starts with
/// an input-status read that forces it back to index state.
struct AttributeController {
    port: Port<u8>,
    status: PortReadOnly<u8>,
}

impl AttributeController {
    const fn new() -> Self {
        Self {
            port: Port::new(ATTRIBUTE_PORT),
            status: PortReadOnly::new(INPUT_STATUS),
        }
    }

    fn write(&mut self, register: u8, value: u8) {
        unsafe {
            let _ = self.status.read();
            self.port.write(register);
            self.port.write(value);
        }
    }

    fn write_table(&mut self, values: &[u8]) {
        for (register, &value) in values.iter().enumerate() {
            self.write(register as u8, value);
        }
    }

    /// Sets bit 5 of the index register, turning video output back on
    /// after programming (the screen blanks while it is clear).
    fn enable_video(&mut self) {
        unsafe {
            let _ = self.status.read();
            self.port.write(0x20);
        }
    }
}

/// The DAC's palette-load interface.
struct Dac {
    mask: Port<u8>,
    write_index: PortWriteOnly<u8>,
    #[allow(dead_code)]
    read_index: PortWriteOnly<u8>,
    data: Port<u8>,
}

impl Dac {
    const fn new() -> Self {
        Self {
            mask: Port::new(DAC_MASK),
            write_index: PortWriteOnly::new(DAC_WRITE_INDEX),
            read_index: PortWriteOnly::new(DAC_READ_INDEX),
            data: Port::new(DAC_DATA),
        }
    }

    /// Loads consecutive palette slots starting at `first`: one index
    /// write, then R,G,B per color with the slot auto-advancing. A full
    /// 64-color load is 1 index write plus 192 data writes.
    fn load(&mut self, first: u8, colors: &[Rgb]) {
        unsafe {
            self.mask.write(0xFF);
            self.write_index.write(first);
            for color in colors {
                // DAC channels are 6 bits wide; scale the 8-bit palette
                // values down.
                self.data.write(color.0 >> 2);
                self.data.write(color.1 >> 2);
                self.data.write(color.2 >> 2);
            }
        }
    }
}

// ── Mode register tables ──────────────────────────────────────────

/// A complete register image for one video mode.
pub(crate) struct RegisterSet {
    pub misc: MiscOutput,
    pub sequencer: [u8; 5],
    pub crtc: [u8; 25],
    pub graphics: [u8; 9],
    pub attribute: [u8; 21],
}

/// Mode 13h: 320×200, 256 colors, chain-4, framebuffer at 0xA0000.
pub(crate) const MODE_13H: RegisterSet = RegisterSet {
    misc: MiscOutput::from_bits_retain(0x63),
    // Reset off, 8-dot clocking, all planes writable, chain-4.
    sequencer: [0x03, 0x01, 0x0F, 0x00, 0x0E],
    crtc: [
        0x5F, 0x4F, 0x50, 0x82, 0x54, 0x80, // horizontal total/display/blank/retrace
        0xBF, 0x1F, // vertical total, overflow
        0x00, 0x41, // preset row scan, max scan line (200-line doubling)
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // cursor + start address
        0x9C, 0x0E, 0x8F, // vertical retrace, display end
        0x28, 0x40, // offset (pitch/8), underline (double-word mode)
        0x96, 0xB9, // vertical blank
        0xA3, // mode control: byte addressing, timing enabled
        0xFF, // line compare
    ],
    // 256-color shift mode, graphics mode at A0000, 64K map.
    graphics: [0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x05, 0x0F, 0xFF],
    attribute: [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, // palette slots map 1:1
        0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
        0x41, // mode control: graphics, 8-bit color
        0x00, // overscan
        0x0F, // all color planes enabled
        0x00, // pixel panning
        0x00, // color select
    ],
};

/// 80×25 16-color text, 9-dot cells, buffer at 0xB8000.
pub(crate) const TEXT_80X25: RegisterSet = RegisterSet {
    misc: MiscOutput::from_bits_retain(0x67),
    sequencer: [0x03, 0x00, 0x03, 0x00, 0x02],
    crtc: [
        0x5F, 0x4F, 0x50, 0x82, 0x55, 0x81, // horizontal timing
        0xBF, 0x1F, // vertical total, overflow
        0x00, 0x4F, // preset row scan, 16-line character cells
        0x0D, 0x0E, // cursor start/end scan lines
        0x00, 0x00, 0x00, 0x50, // start address, cursor location
        0x9C, 0x0E, 0x8F, // vertical retrace, display end
        0x28, 0x1F, // offset, underline
        0x96, 0xB9, // vertical blank
        0xA3, // mode control
        0xFF, // line compare
    ],
    // Odd/even addressing, text mode at B8000.
    graphics: [0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x0E, 0x00, 0xFF],
    attribute: [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x14, 0x07, // EGA-compatible color map
        0x38, 0x39, 0x3A, 0x3B, 0x3C, 0x3D, 0x3E, 0x3F,
        0x0C, // mode control: text, blink enabled
        0x00, // overscan
        0x0F, // all color planes enabled
        0x08, // pixel panning
        0x00, // color select
    ],
};

// ── The register file ─────────────────────────────────────────────

/// Port handles for every VGA register group, one endpoint each.
///
/// Construction is free of side effects; nothing touches hardware until
/// [`program`](VgaRegisters::program) runs.
pub(crate) struct VgaRegisters {
    misc: PortWriteOnly<u8>,
    #[allow(dead_code)]
    misc_read: PortReadOnly<u8>,
    sequencer: Indexed,
    graphics: Indexed,
    crtc_color: Indexed,
    crtc_mono: Indexed,
    attribute: AttributeController,
    dac: Dac,
}

impl VgaRegisters {
    pub(crate) const fn new() -> Self {
        Self {
            misc: PortWriteOnly::new(MISC_WRITE),
            misc_read: PortReadOnly::new(MISC_READ),
            sequencer: Indexed::new(SEQUENCER_INDEX),
            graphics: Indexed::new(GRAPHICS_INDEX),
            crtc_color: Indexed::new(CRTC_COLOR_INDEX),
            crtc_mono: Indexed::new(CRTC_MONO_INDEX),
            attribute: AttributeController::new(),
            dac: Dac::new(),
        }
    }

    /// Programs a full mode image. The sequence is mandatory:
    ///
    /// 1. misc output: decides the color/mono port aliasing every later
    ///    CRTC and status access depends on;
    /// 2. sequencer;
    /// 3. CRT controller, on the port pair misc selected, after clearing
    ///    the write-protect bit over CRTC registers 0..=7 (bit 7 of
    ///    register 0x11);
    /// 4. graphics controller;
    /// 5. attribute controller, then video re-enable;
    /// 6. DAC mask and palette last, because the color-depth bits set
    ///    in steps 2..=5 govern how the DAC interprets the loads.
    pub(crate) fn program(&mut self, set: &RegisterSet, palette: &[Rgb]) {
        unsafe {
            self.misc.write(set.misc.bits());
        }

        self.sequencer.write_table(&set.sequencer);

        let crtc = if set.misc.contains(MiscOutput::IO_ADDRESS_SELECT) {
            &mut self.crtc_color
        } else {
            &mut self.crtc_mono
        };
        let unlocked = crtc.read(0x11) & 0x7F;
        crtc.write(0x11, unlocked);
        crtc.write_table(&set.crtc);

        self.graphics.write_table(&set.graphics);

        self.attribute.write_table(&set.attribute);
        self.attribute.enable_video();

        self.dac.load(0, palette);
    }
}
