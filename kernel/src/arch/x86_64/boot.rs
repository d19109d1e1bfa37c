//! Limine boot protocol interface.
//!
//! The request structures below are static data Limine finds by scanning
//! the kernel binary; it fills in the response pointers before jumping to
//! `kmain`. `#[used]` keeps the otherwise-unreferenced statics alive and
//! the dedicated link section puts them where the bootloader looks.

use limine::request::{HhdmRequest, ModuleRequest, MpRequest};
use limine::response::MpResponse;
use limine::BaseRevision;

/// Protocol revision handshake with the bootloader.
#[used]
#[link_section = ".limine_requests"]
static BASE_REVISION: BaseRevision = BaseRevision::new();

/// Higher Half Direct Map offset. Limine maps all physical memory at this
/// virtual offset, which is how the kernel reaches the fixed physical VGA
/// windows (0xA0000 / 0xB8000) without setting up mappings of its own.
#[used]
#[link_section = ".limine_requests"]
static HHDM_REQUEST: HhdmRequest = HhdmRequest::new();

/// Boot modules. The first module is the playlist ramdisk: a USTAR
/// archive of album-art files loaded next to the kernel.
#[used]
#[link_section = ".limine_requests"]
static MODULE_REQUEST: ModuleRequest = ModuleRequest::new();

/// CPU topology. Asking for it also makes Limine bootstrap the
/// application processors into long mode and hold them for us.
#[used]
#[link_section = ".limine_requests"]
static MP_REQUEST: MpRequest = MpRequest::new();

/// The HHDM offset.
///
/// # Panics
///
/// Panics if Limine did not supply the response; nothing in the kernel
/// can run without it, so a missing response is fatal.
pub fn hhdm_offset() -> u64 {
    HHDM_REQUEST
        .get_response()
        .expect("Limine HHDM response missing")
        .offset()
}

/// Translates a physical address through the HHDM.
pub fn phys_to_virt(phys: u64) -> *mut u8 {
    (hhdm_offset() + phys) as *mut u8
}

/// The CPU list, if the bootloader reported one.
pub fn mp() -> Option<&'static MpResponse> {
    MP_REQUEST.get_response()
}

/// The playlist ramdisk, if the bootloader loaded one.
///
/// The module memory is bootloader-reclaimable but this kernel never
/// reclaims it, so the `'static` borrow is sound for our lifetime.
pub fn ramdisk() -> Option<&'static [u8]> {
    let response = MODULE_REQUEST.get_response()?;
    let module = response.modules().first()?;
    Some(unsafe { core::slice::from_raw_parts(module.addr(), module.size() as usize) })
}
