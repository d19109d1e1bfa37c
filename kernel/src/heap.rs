//! Kernel heap.
//!
//! A fixed 256 KiB region inside the kernel image, handed to a
//! linked-list allocator. The only steady-state consumers are the
//! playlist's track objects, so a static region is plenty; this kernel
//! never maps or reclaims memory.

use linked_list_allocator::LockedHeap;

#[global_allocator]
static ALLOCATOR: LockedHeap = LockedHeap::empty();

const HEAP_SIZE: usize = 256 * 1024;

static mut HEAP_REGION: [u8; HEAP_SIZE] = [0; HEAP_SIZE];

/// Hands the static region to the allocator. Call once, before the first
/// allocation.
pub fn init() {
    unsafe {
        ALLOCATOR
            .lock()
            .init(core::ptr::addr_of_mut!(HEAP_REGION) as *mut u8, HEAP_SIZE);
    }
    log::debug!("heap: {} KiB ready", HEAP_SIZE / 1024);
}
