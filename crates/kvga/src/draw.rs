//! Rasterization primitives.
//!
//! Everything here decomposes into [`VgaDevice::put_pixel`], so the
//! out-of-bounds policy (reject, never clamp) applies uniformly and
//! shapes may hang off any screen edge. Integer arithmetic throughout;
//! degenerate geometry (zero radius, zero height, short pixel buffers)
//! is absorbed as a no-op.

use crate::device::{VgaDevice, GRAPHICS_WIDTH};
use crate::palette::{colors, nearest_color};
use crate::player::TrackFile;

/// Direction of the album-art slide-out transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SlideDirection {
    Left,
    Right,
}

/// Horizontal pixels the slide transition advances per frame.
const SLIDE_STEP: i32 = 8;

impl VgaDevice {
    /// Draws a line with the integer Bresenham walk (all octants).
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u8) {
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x += sx;
            }
            if doubled <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draws a rectangle between two corners (any order, inclusive).
    ///
    /// `fill` switches between the full interior scan and the perimeter
    /// only; an outline never touches strictly-interior pixels.
    pub fn draw_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u8, fill: bool) {
        let (left, right) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (top, bottom) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };

        if fill {
            for y in top..=bottom {
                for x in left..=right {
                    self.put_pixel(x, y, color);
                }
            }
        } else {
            for x in left..=right {
                self.put_pixel(x, top, color);
                self.put_pixel(x, bottom, color);
            }
            for y in top..=bottom {
                self.put_pixel(left, y, color);
                self.put_pixel(right, y, color);
            }
        }
    }

    /// Draws a circle outline with the midpoint algorithm.
    ///
    /// A zero (or negative) radius draws nothing.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u8) {
        if radius <= 0 {
            return;
        }
        let mut x = radius;
        let mut y = 0;
        let mut err = 1 - radius;

        while x >= y {
            self.put_pixel(cx + x, cy + y, color);
            self.put_pixel(cx + y, cy + x, color);
            self.put_pixel(cx - y, cy + x, color);
            self.put_pixel(cx - x, cy + y, color);
            self.put_pixel(cx - x, cy - y, color);
            self.put_pixel(cx - y, cy - x, color);
            self.put_pixel(cx + y, cy - x, color);
            self.put_pixel(cx + x, cy - y, color);

            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    /// Draws the paused-state badge: a filled disc with two vertical
    /// background-colored pause bars punched through it.
    pub fn draw_pause_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u8) {
        if radius <= 0 {
            return;
        }
        for dy in -radius..=radius {
            let half = isqrt(radius * radius - dy * dy);
            self.draw_line(cx - half, cy + dy, cx + half, cy + dy, color);
        }

        let bg = self.background();
        let bar_half_height = radius / 2;
        let bar_width = (radius / 4).max(1);
        let offset = (radius / 3).max(1);
        self.draw_rect(
            cx - offset - bar_width + 1,
            cy - bar_half_height,
            cx - offset,
            cy + bar_half_height,
            bg,
            true,
        );
        self.draw_rect(
            cx + offset,
            cy - bar_half_height,
            cx + offset + bar_width - 1,
            cy + bar_half_height,
            bg,
            true,
        );
    }

    /// Draws a solid play-button triangle: vertical edge at `x`, apex
    /// pointing right (left when `flip`), `height` rows tall.
    pub fn draw_triangle(&mut self, x: i32, y: i32, height: i32, color: u8, flip: bool) {
        if height <= 0 {
            return;
        }
        for row in 0..height {
            let reach = row.min(height - 1 - row);
            if flip {
                self.draw_line(x - reach, y + row, x, y + row, color);
            } else {
                self.draw_line(x, y + row, x + reach, y + row, color);
            }
        }
    }

    /// Blits a packed 24-bit RGB buffer at the given top-left origin,
    /// mapping every texel to the nearest palette index.
    ///
    /// `rgb` holds `width * height` R,G,B triples, rows top to bottom. A
    /// buffer shorter than that draws nothing.
    pub fn place_bmp(&mut self, x: i32, y: i32, width: usize, height: usize, rgb: &[u8]) {
        if rgb.len() < width * height * 3 {
            return;
        }
        for row in 0..height {
            for col in 0..width {
                let at = (row * width + col) * 3;
                let color = nearest_color(rgb[at], rgb[at + 1], rgb[at + 2]);
                self.put_pixel(x + col as i32, y + row as i32, color);
            }
        }
    }

    /// Slides a track's art off-screen, one [`SLIDE_STEP`] per frame.
    ///
    /// Each frame re-blits the art at the shifted origin and wipes the
    /// strip it vacated with the background color; the final frame wipes
    /// the whole original footprint. This is a scripted multi-frame
    /// transition, not a single draw call.
    pub fn move_out_pic(
        &mut self,
        x: i32,
        y: i32,
        track: &TrackFile,
        width: usize,
        height: usize,
        direction: SlideDirection,
    ) {
        let w = width as i32;
        let h = height as i32;
        let bg = self.background();
        let travel = match direction {
            SlideDirection::Left => x + w,
            SlideDirection::Right => GRAPHICS_WIDTH as i32 - x,
        };

        let mut shift = SLIDE_STEP;
        while shift < travel {
            match direction {
                SlideDirection::Left => {
                    let nx = x - shift;
                    self.place_bmp(nx, y, width, height, &track.art);
                    self.draw_rect(nx + w, y, x + w - 1, y + h - 1, bg, true);
                }
                SlideDirection::Right => {
                    let nx = x + shift;
                    self.place_bmp(nx, y, width, height, &track.art);
                    self.draw_rect(x, y, nx - 1, y + h - 1, bg, true);
                }
            }
            shift += SLIDE_STEP;
        }

        // Final frame: the art is fully off-screen, wipe the whole band it
        // swept (the clipped writes handle the off-screen ends).
        match direction {
            SlideDirection::Left => {
                self.draw_rect(x - travel, y, x + w - 1, y + h - 1, bg, true);
            }
            SlideDirection::Right => {
                self.draw_rect(x, y, x + travel + w - 1, y + h - 1, bg, true);
            }
        }
    }

    /// Composes the fixed startup layout: double border, title, owner
    /// name, and a few decorative shapes. Pure scripting over the
    /// primitives above.
    pub fn home_screen(&mut self, name: &str) {
        self.initialize_screen(colors::BLACK);

        self.draw_rect(2, 2, 317, 197, colors::TEAL, false);
        self.draw_rect(5, 5, 314, 194, colors::TEAL, false);

        self.draw_string(centered(11), 40, "NOW PLAYING", colors::WHITE);
        self.draw_string(centered(name.chars().count()), 60, name, colors::ORANGE);

        self.draw_circle(48, 130, 18, colors::MAGENTA);
        self.draw_circle(272, 130, 18, colors::MAGENTA);
        self.draw_triangle(153, 116, 28, colors::GREEN, false);
    }
}

/// X origin that centers `chars` 8-pixel glyphs on the graphics screen.
fn centered(chars: usize) -> i32 {
    (GRAPHICS_WIDTH as i32 - (chars as i32) * 8) / 2
}

/// Integer square root, rounded down. Inputs here are at most a badge
/// radius squared, so the simple walk is fine.
fn isqrt(value: i32) -> i32 {
    let mut root = 0;
    while (root + 1) * (root + 1) <= value {
        root += 1;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::test_support::TestScreen;
    use crate::device::{VideoMode, GRAPHICS_HEIGHT};
    use crate::palette::PALETTE;
    use crate::player::TrackFile;
    use std::string::String;
    use std::vec;
    use std::vec::Vec;

    fn set_pixels(screen: &TestScreen) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..GRAPHICS_HEIGHT as i32 {
            for x in 0..GRAPHICS_WIDTH as i32 {
                if screen.graphics[y as usize * GRAPHICS_WIDTH + x as usize] != 0 {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn horizontal_line_sets_exactly_its_span() {
        let mut screen = TestScreen::new();
        {
            let mut vga = screen.device(VideoMode::Graphics);
            vga.draw_line(0, 0, 4, 0, 9);
        }
        assert_eq!(
            set_pixels(&screen),
            vec![(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]
        );
    }

    #[test]
    fn line_endpoints_are_always_drawn() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        vga.draw_line(10, 12, 37, 91, 4);
        assert_eq!(vga.pixel(10, 12), Some(4));
        assert_eq!(vga.pixel(37, 91), Some(4));
    }

    #[test]
    fn outline_rect_leaves_the_interior_untouched() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        vga.draw_rect(2, 2, 10, 8, 7, false);

        for y in 3..8 {
            for x in 3..10 {
                assert_eq!(vga.pixel(x, y), Some(0), "interior pixel ({x}, {y})");
            }
        }
        for x in 2..=10 {
            assert_eq!(vga.pixel(x, 2), Some(7));
            assert_eq!(vga.pixel(x, 8), Some(7));
        }
        for y in 2..=8 {
            assert_eq!(vga.pixel(2, y), Some(7));
            assert_eq!(vga.pixel(10, y), Some(7));
        }
    }

    #[test]
    fn filled_rect_covers_every_pixel_of_the_box() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        // Corners given in reverse order on purpose.
        vga.draw_rect(10, 8, 2, 2, 7, true);
        for y in 2..=8 {
            for x in 2..=10 {
                assert_eq!(vga.pixel(x, y), Some(7));
            }
        }
        assert_eq!(vga.pixel(1, 2), Some(0));
        assert_eq!(vga.pixel(11, 8), Some(0));
    }

    #[test]
    fn zero_radius_circle_draws_nothing() {
        let mut screen = TestScreen::new();
        {
            let mut vga = screen.device(VideoMode::Graphics);
            vga.draw_circle(50, 50, 0, 12);
        }
        assert!(set_pixels(&screen).is_empty());
    }

    #[test]
    fn circle_passes_through_its_cardinal_points() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        vga.draw_circle(100, 100, 20, 12);
        assert_eq!(vga.pixel(120, 100), Some(12));
        assert_eq!(vga.pixel(80, 100), Some(12));
        assert_eq!(vga.pixel(100, 120), Some(12));
        assert_eq!(vga.pixel(100, 80), Some(12));
        // Center stays clear: it is an outline.
        assert_eq!(vga.pixel(100, 100), Some(0));
    }

    #[test]
    fn pause_badge_is_a_disc_with_background_bars() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        vga.initialize_screen(0);
        vga.draw_pause_circle(60, 60, 12, 33);

        // Disc body present at the center and edges of the midline.
        assert_eq!(vga.pixel(60, 60), Some(33));
        assert_eq!(vga.pixel(71, 60), Some(33));
        // The bars punch back through to the background.
        assert_eq!(vga.pixel(56, 60), Some(0));
        assert_eq!(vga.pixel(64, 60), Some(0));
    }

    #[test]
    fn zero_height_triangle_draws_nothing() {
        let mut screen = TestScreen::new();
        {
            let mut vga = screen.device(VideoMode::Graphics);
            vga.draw_triangle(10, 10, 0, 5, false);
        }
        assert!(set_pixels(&screen).is_empty());
    }

    #[test]
    fn triangle_widens_toward_the_middle_row() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        vga.draw_triangle(10, 10, 9, 5, false);
        // First and last rows are a single pixel at the vertical edge.
        assert_eq!(vga.pixel(10, 10), Some(5));
        assert_eq!(vga.pixel(11, 10), Some(0));
        assert_eq!(vga.pixel(10, 18), Some(5));
        // The middle row reaches the apex.
        assert_eq!(vga.pixel(14, 14), Some(5));
        assert_eq!(vga.pixel(15, 14), Some(0));
    }

    #[test]
    fn blit_maps_exact_palette_colors_to_their_indices() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);

        let picks = [3u8, 12, 48, 63];
        let mut rgb = Vec::new();
        for &index in &picks {
            let entry = PALETTE[index as usize];
            rgb.extend_from_slice(&[entry.0, entry.1, entry.2]);
        }
        vga.place_bmp(5, 5, 2, 2, &rgb);

        assert_eq!(vga.pixel(5, 5), Some(3));
        assert_eq!(vga.pixel(6, 5), Some(12));
        assert_eq!(vga.pixel(5, 6), Some(48));
        assert_eq!(vga.pixel(6, 6), Some(63));
    }

    #[test]
    fn short_blit_buffer_is_absorbed() {
        let mut screen = TestScreen::new();
        {
            let mut vga = screen.device(VideoMode::Graphics);
            vga.place_bmp(0, 0, 4, 4, &[10, 20, 30]);
        }
        assert!(set_pixels(&screen).is_empty());
    }

    #[test]
    fn slide_out_clears_the_original_footprint() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        vga.initialize_screen(2);

        let track = TrackFile {
            name: String::from("t"),
            art: vec![0xFF; 16 * 16 * 3],
            art_width: 16,
            art_height: 16,
        };
        vga.place_bmp(100, 50, 16, 16, &track.art);
        assert_eq!(vga.pixel(100, 50), Some(63));

        // After sliding left, the entire band the art swept is background
        // again, including the columns left of the original footprint.
        vga.move_out_pic(100, 50, &track, 16, 16, SlideDirection::Left);
        for y in 50..66 {
            for x in 0..116 {
                assert_eq!(vga.pixel(x, y), Some(2), "pixel ({x}, {y})");
            }
        }

        vga.place_bmp(100, 50, 16, 16, &track.art);
        vga.move_out_pic(100, 50, &track, 16, 16, SlideDirection::Right);
        for y in 50..66 {
            for x in 100..320 {
                assert_eq!(vga.pixel(x, y), Some(2), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn home_screen_draws_the_border() {
        let mut screen = TestScreen::new();
        let mut vga = screen.device(VideoMode::Graphics);
        vga.home_screen("tester");
        assert_eq!(vga.pixel(2, 2), Some(crate::palette::colors::TEAL));
        assert_eq!(vga.pixel(317, 197), Some(crate::palette::colors::TEAL));
    }
}
