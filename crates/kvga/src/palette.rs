//! The 64-color DAC palette and nearest-color matching.
//!
//! The palette is a 4-level RGB cube: each channel takes one of
//! 0x00 / 0x55 / 0xAA / 0xFF, blue varying fastest, red slowest, so
//! `index = red_level * 16 + green_level * 4 + blue_level`. Index 0 is
//! black. The table is written to the DAC once per mode switch and never
//! changes afterwards.

/// One palette entry, 8-bit channels. The DAC itself takes 6-bit values;
/// the register layer scales on the way out.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The full 64-entry palette, in DAC slot order.
pub const PALETTE: [Rgb; 64] = [
    Rgb(0x00, 0x00, 0x00),
    Rgb(0x00, 0x00, 0x55),
    Rgb(0x00, 0x00, 0xAA),
    Rgb(0x00, 0x00, 0xFF),
    Rgb(0x00, 0x55, 0x00),
    Rgb(0x00, 0x55, 0x55),
    Rgb(0x00, 0x55, 0xAA),
    Rgb(0x00, 0x55, 0xFF),
    Rgb(0x00, 0xAA, 0x00),
    Rgb(0x00, 0xAA, 0x55),
    Rgb(0x00, 0xAA, 0xAA),
    Rgb(0x00, 0xAA, 0xFF),
    Rgb(0x00, 0xFF, 0x00),
    Rgb(0x00, 0xFF, 0x55),
    Rgb(0x00, 0xFF, 0xAA),
    Rgb(0x00, 0xFF, 0xFF),
    Rgb(0x55, 0x00, 0x00),
    Rgb(0x55, 0x00, 0x55),
    Rgb(0x55, 0x00, 0xAA),
    Rgb(0x55, 0x00, 0xFF),
    Rgb(0x55, 0x55, 0x00),
    Rgb(0x55, 0x55, 0x55),
    Rgb(0x55, 0x55, 0xAA),
    Rgb(0x55, 0x55, 0xFF),
    Rgb(0x55, 0xAA, 0x00),
    Rgb(0x55, 0xAA, 0x55),
    Rgb(0x55, 0xAA, 0xAA),
    Rgb(0x55, 0xAA, 0xFF),
    Rgb(0x55, 0xFF, 0x00),
    Rgb(0x55, 0xFF, 0x55),
    Rgb(0x55, 0xFF, 0xAA),
    Rgb(0x55, 0xFF, 0xFF),
    Rgb(0xAA, 0x00, 0x00),
    Rgb(0xAA, 0x00, 0x55),
    Rgb(0xAA, 0x00, 0xAA),
    Rgb(0xAA, 0x00, 0xFF),
    Rgb(0xAA, 0x55, 0x00),
    Rgb(0xAA, 0x55, 0x55),
    Rgb(0xAA, 0x55, 0xAA),
    Rgb(0xAA, 0x55, 0xFF),
    Rgb(0xAA, 0xAA, 0x00),
    Rgb(0xAA, 0xAA, 0x55),
    Rgb(0xAA, 0xAA, 0xAA),
    Rgb(0xAA, 0xAA, 0xFF),
    Rgb(0xAA, 0xFF, 0x00),
    Rgb(0xAA, 0xFF, 0x55),
    Rgb(0xAA, 0xFF, 0xAA),
    Rgb(0xAA, 0xFF, 0xFF),
    Rgb(0xFF, 0x00, 0x00),
    Rgb(0xFF, 0x00, 0x55),
    Rgb(0xFF, 0x00, 0xAA),
    Rgb(0xFF, 0x00, 0xFF),
    Rgb(0xFF, 0x55, 0x00),
    Rgb(0xFF, 0x55, 0x55),
    Rgb(0xFF, 0x55, 0xAA),
    Rgb(0xFF, 0x55, 0xFF),
    Rgb(0xFF, 0xAA, 0x00),
    Rgb(0xFF, 0xAA, 0x55),
    Rgb(0xFF, 0xAA, 0xAA),
    Rgb(0xFF, 0xAA, 0xFF),
    Rgb(0xFF, 0xFF, 0x00),
    Rgb(0xFF, 0xFF, 0x55),
    Rgb(0xFF, 0xFF, 0xAA),
    Rgb(0xFF, 0xFF, 0xFF),
];

/// Palette indices for the colors the built-in layouts use.
pub mod colors {
    pub const BLACK: u8 = 0;
    pub const NAVY: u8 = 2;
    pub const BLUE: u8 = 3;
    pub const TEAL: u8 = 10;
    pub const GREEN: u8 = 12;
    pub const CYAN: u8 = 15;
    pub const GRAY: u8 = 21;
    pub const LIGHT_GRAY: u8 = 42;
    pub const RED: u8 = 48;
    pub const MAGENTA: u8 = 51;
    pub const ORANGE: u8 = 56;
    pub const YELLOW: u8 = 60;
    pub const WHITE: u8 = 63;
}

/// Maps a 24-bit color to the nearest palette index.
///
/// Distance is the sum of squared channel differences. The scan keeps the
/// first minimum it sees, so exact ties resolve to the lowest palette
/// index; identical inputs always produce identical outputs.
pub fn nearest_color(r: u8, g: u8, b: u8) -> u8 {
    let mut best = 0u8;
    let mut best_dist = u32::MAX;
    for (index, entry) in PALETTE.iter().enumerate() {
        let dr = r as i32 - entry.0 as i32;
        let dg = g as i32 - entry.1 as i32;
        let db = b as i32 - entry.2 as i32;
        let dist = (dr * dr + dg * dg + db * db) as u32;
        if dist < best_dist {
            best_dist = dist;
            best = index as u8;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_palette_entry_round_trips_to_its_own_index() {
        for (index, entry) in PALETTE.iter().enumerate() {
            assert_eq!(
                nearest_color(entry.0, entry.1, entry.2),
                index as u8,
                "palette entry {index} did not round-trip"
            );
        }
    }

    #[test]
    fn nearest_color_is_deterministic() {
        let first = nearest_color(17, 130, 201);
        for _ in 0..10 {
            assert_eq!(nearest_color(17, 130, 201), first);
        }
    }

    #[test]
    fn off_palette_colors_snap_to_the_closest_level() {
        // (0x50, 0x50, 0x50) sits nearest the 0x55 gray.
        assert_eq!(nearest_color(0x50, 0x50, 0x50), colors::GRAY);
        // Almost-white maps to white.
        assert_eq!(nearest_color(0xF0, 0xF8, 0xEE), colors::WHITE);
    }

    #[test]
    fn named_colors_match_their_cube_slots() {
        assert_eq!(PALETTE[colors::WHITE as usize], Rgb(0xFF, 0xFF, 0xFF));
        assert_eq!(PALETTE[colors::GREEN as usize], Rgb(0x00, 0xFF, 0x00));
        assert_eq!(PALETTE[colors::RED as usize], Rgb(0xFF, 0x00, 0x00));
        assert_eq!(PALETTE[colors::BLUE as usize], Rgb(0x00, 0x00, 0xFF));
    }
}
