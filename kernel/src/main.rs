//! DeckOS kernel entry point.
//!
//! Boot order matters here:
//!
//!   1. serial logger: first sign of life, everything after can log
//!   2. PIC remap + PIT + IDT: interrupt plumbing, still masked off
//!   3. heap: the playlist allocates
//!   4. ramdisk and playlist: album art from the boot module
//!   5. boot rendezvous: every core checks in, secondaries park
//!   6. VGA setup: register-programmed mode switch, then the home screen
//!   7. interrupts on, then the foreground loop forever
//!
//! The foreground loop is the single drawing context: it drains decoded
//! transport keys into player calls and converts timer-tick deltas into
//! the player's periodic update. Interrupt handlers only ever touch
//! atomics and the scancode queue.

#![no_std]
#![no_main]
#![feature(abi_x86_interrupt)]

extern crate alloc;

mod arch;
mod fs;
mod heap;
mod input;
mod traps;
mod util;

use kvga::player::Player;
use kvga::{VgaDevice, VideoMode, GRAPHICS_WINDOW_PHYS, TEXT_WINDOW_PHYS};

use crate::arch::{boot, cpu, pic, pit, smp};
use crate::input::ControlEvent;

/// The playback coordinator. Static so transport controls could be issued
/// from any context; in this bring-up everything goes through the
/// foreground loop.
static PLAYER: Player = Player::new();

#[no_mangle]
extern "C" fn kmain() -> ! {
    klog::init();
    log::info!("DeckOS {} booting", env!("CARGO_PKG_VERSION"));

    pic::init();
    pit::init();
    traps::init_idt();

    heap::init();
    input::init();

    let playlist = match boot::ramdisk() {
        Some(ramdisk) => fs::playlist::load(ramdisk),
        None => {
            log::warn!("no ramdisk module; starting with an empty playlist");
            alloc::vec::Vec::new()
        }
    };

    // Every core crosses the rendezvous; after it the BSP is the only
    // context that will ever touch the VGA registers or framebuffer.
    smp::rendezvous();

    // The legacy windows are fixed physical addresses; reach them through
    // Limine's direct map.
    let mut vga = unsafe {
        VgaDevice::new(
            boot::phys_to_virt(TEXT_WINDOW_PHYS),
            boot::phys_to_virt(GRAPHICS_WINDOW_PHYS),
        )
    };
    vga.setup(VideoMode::Graphics);
    vga.home_screen("DeckOS");

    let mut track_index = 0usize;
    if let Some(first) = playlist.first() {
        PLAYER.load(first.clone(), true);
    }

    cpu::enable_interrupts();
    log::info!("entering the render loop");

    let mut last_ticks = pit::ticks();
    loop {
        while let Some(event) = input::next_event() {
            match event {
                ControlEvent::PlayPause => PLAYER.play_pause(&mut vga),
                ControlEvent::Next if !playlist.is_empty() => {
                    track_index = (track_index + 1) % playlist.len();
                    PLAYER.skip(&mut vga, playlist[track_index].clone(), true, true);
                }
                ControlEvent::Back if !playlist.is_empty() => {
                    track_index = (track_index + playlist.len() - 1) % playlist.len();
                    PLAYER.skip(&mut vga, playlist[track_index].clone(), true, false);
                }
                _ => {}
            }
        }

        let now = pit::ticks();
        let delta = now - last_ticks;
        if delta > 0 {
            last_ticks = now;
            PLAYER.advance(&mut vga, (delta * pit::MS_PER_TICK) as u32);
        }

        cpu::halt();
    }
}
