//! "Now playing" overlay coordinator.
//!
//! Tracks the current song, the elapsed-time counter, and the transport
//! state, and drives the overlay drawing. Control operations (`load`,
//! `play_pause`, `skip`) may be invoked from a different context than the
//! render loop, so every piece of cross-context state is an atomic or
//! sits behind a lock; the counter and flags are never plain fields.
//!
//! Drawing happens only on the calls that receive the device: the
//! periodic [`Player::advance`] (invoked by the foreground loop on timer
//! ticks) and the explicitly animated transitions. `load` itself just
//! flips state and raises the new-song flag; the next tick paints it.

use alloc::sync::Arc;
use alloc::string::String;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use spin::Mutex;

use crate::device::VgaDevice;
use crate::draw::SlideDirection;
use crate::palette::colors;

/// A song and its album art.
///
/// Owned jointly (via `Arc`) by whatever loaded it (typically the boot
/// playlist) and by the player for as long as it is the current track,
/// so neither holder has to outlive the other.
pub struct TrackFile {
    /// Display name of the song.
    pub name: String,
    /// Packed 24-bit RGB art, `art_width * art_height` triples, rows top
    /// to bottom.
    pub art: Vec<u8>,
    pub art_width: usize,
    pub art_height: usize,
}

/// Transport state, derived from the loaded-track and playing flags.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlaybackState {
    /// No track loaded; every transport call is a no-op.
    Stopped,
    Playing,
    Paused,
}

// Overlay layout (graphics mode, 320×200).
const ART_X: i32 = 100;
const ART_Y: i32 = 16;
const NAME_X: i32 = 8;
const NAME_Y: i32 = 148;
const TIME_X: i32 = 8;
const TIME_Y: i32 = 162;
const BADGE_LEFT: i32 = 286;
const BADGE_TOP: i32 = 146;
const BADGE_RIGHT: i32 = 310;
const BADGE_BOTTOM: i32 = 168;

/// The playback coordinator.
pub struct Player {
    current: Mutex<Option<Arc<TrackFile>>>,
    /// Elapsed play time in milliseconds. Written on ticks, readable from
    /// any context without tearing.
    elapsed_ms: AtomicU32,
    playing: AtomicBool,
    /// Raised by `load`, consumed by the next `advance`, which repaints
    /// the whole overlay.
    new_song: AtomicBool,
    /// Seconds value currently on screen; the readout is only redrawn
    /// when the displayed second changes.
    shown_seconds: AtomicU32,
}

impl Player {
    pub const fn new() -> Self {
        Self {
            current: Mutex::new(None),
            elapsed_ms: AtomicU32::new(0),
            playing: AtomicBool::new(false),
            new_song: AtomicBool::new(false),
            shown_seconds: AtomicU32::new(0),
        }
    }

    /// Loads `track` as the current song, resets the elapsed time, and
    /// enters Playing or Paused per `play_now`.
    ///
    /// State-only: the overlay repaint happens on the next `advance`
    /// tick, which observes the raised new-song flag.
    pub fn load(&self, track: Arc<TrackFile>, play_now: bool) {
        log::info!("player: loading \"{}\"", track.name);
        *self.current.lock() = Some(track);
        self.elapsed_ms.store(0, Ordering::Relaxed);
        self.shown_seconds.store(0, Ordering::Relaxed);
        self.playing.store(play_now, Ordering::Release);
        self.new_song.store(true, Ordering::Release);
    }

    /// Switches to `track` with a slide transition: the outgoing art
    /// slides off (left when skipping forward, right when skipping back),
    /// then the incoming overlay is drawn immediately.
    pub fn skip(&self, vga: &mut VgaDevice, track: Arc<TrackFile>, play_now: bool, forward: bool) {
        let outgoing = self.current.lock().clone();
        if let Some(out) = outgoing {
            let direction = if forward {
                SlideDirection::Left
            } else {
                SlideDirection::Right
            };
            vga.move_out_pic(ART_X, ART_Y, &out, out.art_width, out.art_height, direction);
        }

        self.load(track.clone(), play_now);
        // The transition already has the device in hand; paint the new
        // song now instead of waiting for the next tick.
        self.new_song.store(false, Ordering::Release);
        self.draw_overlay(vga, &track);
    }

    /// Toggles Playing ↔ Paused and repaints the transport badge. The
    /// loaded track and elapsed time are untouched; with no track loaded
    /// this does nothing.
    pub fn play_pause(&self, vga: &mut VgaDevice) {
        if self.current.lock().is_none() {
            return;
        }
        let was_playing = self.playing.fetch_xor(true, Ordering::AcqRel);
        log::debug!(
            "player: {}",
            if was_playing { "paused" } else { "playing" }
        );
        self.draw_badge(vga);
    }

    /// Periodic update, called by the foreground loop with the elapsed
    /// wall time since the previous call.
    ///
    /// Paints the full overlay if a newly loaded song is pending. While
    /// Playing, advances the elapsed counter and redraws the time readout
    /// when the displayed second changes; while Paused (or with no track)
    /// ticks are accepted but change nothing.
    pub fn advance(&self, vga: &mut VgaDevice, delta_ms: u32) {
        let track = match self.current.lock().clone() {
            Some(track) => track,
            None => return,
        };

        if self.new_song.swap(false, Ordering::AcqRel) {
            self.draw_overlay(vga, &track);
        }

        if !self.playing.load(Ordering::Acquire) {
            return;
        }

        let total = self.elapsed_ms.fetch_add(delta_ms, Ordering::Relaxed) + delta_ms;
        let seconds = total / 1000;
        if self.shown_seconds.swap(seconds, Ordering::Relaxed) != seconds {
            self.draw_time(vga, seconds);
        }
    }

    /// Elapsed play time of the current song, in milliseconds.
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms.load(Ordering::Relaxed)
    }

    pub fn state(&self) -> PlaybackState {
        if self.current.lock().is_none() {
            PlaybackState::Stopped
        } else if self.playing.load(Ordering::Acquire) {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    /// The current track, if any.
    pub fn current(&self) -> Option<Arc<TrackFile>> {
        self.current.lock().clone()
    }

    fn draw_overlay(&self, vga: &mut VgaDevice, track: &TrackFile) {
        let bg = vga.background();
        vga.place_bmp(ART_X, ART_Y, track.art_width, track.art_height, &track.art);

        vga.draw_rect(NAME_X, NAME_Y, 319, NAME_Y + 7, bg, true);
        vga.draw_string(NAME_X, NAME_Y, &track.name, colors::WHITE);

        let seconds = self.elapsed_ms.load(Ordering::Relaxed) / 1000;
        self.shown_seconds.store(seconds, Ordering::Relaxed);
        self.draw_time(vga, seconds);
        self.draw_badge(vga);
    }

    fn draw_time(&self, vga: &mut VgaDevice, seconds: u32) {
        let text = alloc::format!("{:02}:{:02}", seconds / 60, seconds % 60);
        let bg = vga.background();
        vga.draw_rect(TIME_X, TIME_Y, TIME_X + 8 * 6, TIME_Y + 7, bg, true);
        vga.draw_string(TIME_X, TIME_Y, &text, colors::LIGHT_GRAY);
    }

    fn draw_badge(&self, vga: &mut VgaDevice) {
        let bg = vga.background();
        vga.draw_rect(BADGE_LEFT, BADGE_TOP, BADGE_RIGHT, BADGE_BOTTOM, bg, true);
        if self.playing.load(Ordering::Acquire) {
            vga.draw_triangle(BADGE_LEFT + 4, BADGE_TOP + 2, 18, colors::GREEN, false);
        } else {
            vga.draw_pause_circle(
                (BADGE_LEFT + BADGE_RIGHT) / 2,
                (BADGE_TOP + BADGE_BOTTOM) / 2,
                10,
                colors::ORANGE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::test_support::TestScreen;
    use crate::device::VideoMode;
    use crate::palette::PALETTE;
    use std::string::ToString;
    use std::vec;

    fn track(name: &str) -> Arc<TrackFile> {
        // Solid white 4×4 art: maps to palette index 63 everywhere.
        Arc::new(TrackFile {
            name: name.to_string(),
            art: vec![0xFF; 4 * 4 * 3],
            art_width: 4,
            art_height: 4,
        })
    }

    #[test]
    fn ticks_accumulate_only_while_playing() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        let player = Player::new();

        player.load(track("song"), true);
        player.advance(&mut vga, 500);
        player.advance(&mut vga, 500);
        assert_eq!(player.elapsed_ms(), 1000);
        assert_eq!(player.state(), PlaybackState::Playing);

        player.play_pause(&mut vga);
        player.advance(&mut vga, 500);
        assert_eq!(player.elapsed_ms(), 1000);
        assert_eq!(player.state(), PlaybackState::Paused);
    }

    #[test]
    fn transport_calls_without_a_track_are_no_ops() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        let player = Player::new();

        assert_eq!(player.state(), PlaybackState::Stopped);
        player.play_pause(&mut vga);
        player.advance(&mut vga, 250);
        assert_eq!(player.elapsed_ms(), 0);
        assert_eq!(player.state(), PlaybackState::Stopped);
    }

    #[test]
    fn loading_resets_elapsed_time() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        let player = Player::new();

        player.load(track("first"), true);
        player.advance(&mut vga, 3000);
        assert_eq!(player.elapsed_ms(), 3000);

        player.load(track("second"), true);
        assert_eq!(player.elapsed_ms(), 0);
        assert_eq!(player.current().unwrap().name, "second");
    }

    #[test]
    fn first_tick_after_load_paints_the_art() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        vga.initialize_screen(0);
        let player = Player::new();

        player.load(track("song"), false);
        assert_eq!(vga.pixel(ART_X, ART_Y), Some(0), "load alone must not draw");

        player.advance(&mut vga, 10);
        assert_eq!(vga.pixel(ART_X, ART_Y), Some(63));
        assert_eq!(vga.pixel(ART_X + 3, ART_Y + 3), Some(63));
        // Paused load still paints; time just does not advance.
        assert_eq!(player.elapsed_ms(), 0);
    }

    #[test]
    fn badge_follows_the_transport_state() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        vga.initialize_screen(0);
        let player = Player::new();

        player.load(track("song"), true);
        player.advance(&mut vga, 10);
        // Playing: the play triangle's vertical edge.
        assert_eq!(vga.pixel(BADGE_LEFT + 4, BADGE_TOP + 2), Some(colors::GREEN));

        player.play_pause(&mut vga);
        // Paused: the pause disc body at the badge center.
        let cx = (BADGE_LEFT + BADGE_RIGHT) / 2;
        let cy = (BADGE_TOP + BADGE_BOTTOM) / 2;
        assert_eq!(vga.pixel(cx, cy), Some(colors::ORANGE));
    }

    #[test]
    fn skip_replaces_the_track_and_draws_it() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        vga.initialize_screen(0);
        let player = Player::new();

        player.load(track("first"), true);
        player.advance(&mut vga, 10);

        // Red 4×4 art for the incoming track.
        let red = PALETTE[48];
        let incoming = Arc::new(TrackFile {
            name: "second".to_string(),
            art: vec![red.0, red.1, red.2].repeat(16),
            art_width: 4,
            art_height: 4,
        });
        player.skip(&mut vga, incoming, true, true);

        assert_eq!(player.current().unwrap().name, "second");
        assert_eq!(player.elapsed_ms(), 0);
        // The incoming art is on screen without waiting for a tick.
        assert_eq!(vga.pixel(ART_X, ART_Y), Some(48));
    }

    #[test]
    fn skip_with_nothing_loaded_behaves_like_load() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        vga.initialize_screen(0);
        let player = Player::new();

        player.skip(&mut vga, track("only"), true, false);
        assert_eq!(player.state(), PlaybackState::Playing);
        assert_eq!(vga.pixel(ART_X, ART_Y), Some(63));
    }
}
