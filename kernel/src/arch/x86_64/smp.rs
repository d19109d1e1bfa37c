//! Multi-core bring-up and the boot rendezvous.
//!
//! Secondary cores have no work in this kernel: the display is
//! single-writer and everything runs in the BSP's foreground loop. The
//! APs still must not be left wherever the bootloader parked them, so
//! the BSP wakes each one, every core (BSP included) crosses a one-shot
//! rendezvous barrier, and the secondaries halt for good. After the
//! barrier the BSP is the only context left that can touch the VGA
//! registers or framebuffer.

use ksync::Barrier;
use limine::mp::Cpu;
use spin::Once;

use super::{boot, cpu};

/// The boot rendezvous, sized at runtime from the MP response. Filled
/// before any AP is woken, so `wait()` on an AP never spins for long.
static BOOT_BARRIER: Once<Barrier> = Once::new();

/// Wakes every AP and crosses the boot rendezvous with them.
///
/// Without an MP response (uniprocessor machine, or a bootloader that
/// elided it) this degenerates to a one-party barrier the BSP crosses
/// alone. A listed AP that never starts stalls boot here forever; the
/// barrier has no timeout.
pub fn rendezvous() {
    let Some(mp) = boot::mp() else {
        BOOT_BARRIER.call_once(|| Barrier::new(1)).sync();
        return;
    };

    let cpus = mp.cpus();
    let barrier = BOOT_BARRIER.call_once(|| Barrier::new(cpus.len().max(1) as u32));
    log::info!("smp: {} core(s), parking the secondaries", cpus.len());

    for entry in cpus.iter() {
        if entry.lapic_id != mp.bsp_lapic_id() {
            entry.goto_address.write(ap_entry);
        }
    }

    barrier.sync();
}

/// AP entry point. Limine hands the AP over in long mode on the BSP's
/// page tables with interrupts disabled; they stay disabled. Check in
/// at the rendezvous, then halt forever.
extern "C" fn ap_entry(info: &Cpu) -> ! {
    log::debug!("smp: core with LAPIC id {} parked", info.lapic_id);
    BOOT_BARRIER.wait().sync();
    cpu::halt_forever()
}
