//! VGA display subsystem.
//!
//! Programs the VGA controller's indexed register sets directly (no BIOS,
//! no VBE), switches between 80×25 text and 320×200×256 graphics, and
//! rasterizes into the legacy framebuffer windows. On top of the drawing
//! primitives sits a "now playing" overlay coordinator driven by an
//! external tick source.
//!
//! Hardware is only touched through [`VgaDevice::setup`] (port I/O) and
//! the framebuffer window pointers handed to [`VgaDevice::new`]; all
//! steady-state drawing is direct framebuffer memory access. That split is
//! what lets the rasterizer and the playback coordinator run against plain
//! heap buffers in the host test suite.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod device;
mod draw;
pub mod font;
pub mod palette;
pub mod player;
mod regs;

pub use device::{
    VgaDevice, VideoMode, GRAPHICS_HEIGHT, GRAPHICS_WIDTH, GRAPHICS_WINDOW_PHYS, TEXT_COLS,
    TEXT_ROWS, TEXT_WINDOW_PHYS,
};
pub use draw::SlideDirection;
pub use player::{PlaybackState, Player, TrackFile};
