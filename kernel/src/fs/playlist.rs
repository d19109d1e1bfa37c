//! Playlist loading.
//!
//! The ramdisk carries one `<name>.rgb` file per song: raw packed
//! 24-bit RGB album art at a fixed 120×120, the display name being the
//! file stem. No image decoding happens in the kernel; the art files are
//! pre-rendered at build time.

use alloc::sync::Arc;
use alloc::string::ToString;
use alloc::vec::Vec;

use kvga::TrackFile;

use super::tar;

/// Fixed album-art geometry.
pub const ART_WIDTH: usize = 120;
pub const ART_HEIGHT: usize = 120;

const ART_BYTES: usize = ART_WIDTH * ART_HEIGHT * 3;
const ART_SUFFIX: &str = ".rgb";

/// Collects every track in the archive, in archive order.
///
/// Entries with the wrong size are logged and skipped rather than drawn
/// as garbage.
pub fn load(ramdisk: &[u8]) -> Vec<Arc<TrackFile>> {
    let mut tracks = Vec::new();

    for entry in tar::entries(ramdisk) {
        if !entry.is_regular_file() {
            continue;
        }
        let Some(stem) = entry.name.strip_suffix(ART_SUFFIX) else {
            continue;
        };
        if entry.data.len() != ART_BYTES {
            log::warn!(
                "playlist: skipping \"{}\": {} bytes, expected {}",
                entry.name,
                entry.data.len(),
                ART_BYTES
            );
            continue;
        }

        // Strip any directory part; the stem is the display name.
        let name = stem.rsplit('/').next().unwrap_or(stem);

        tracks.push(Arc::new(TrackFile {
            name: name.to_string(),
            art: entry.data.to_vec(),
            art_width: ART_WIDTH,
            art_height: ART_HEIGHT,
        }));
    }

    log::info!("playlist: {} track(s)", tracks.len());
    tracks
}
