use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque `0xRRGGBB` color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const YELLOW: Rgb = Rgb::new(255, 235, 59);
    pub const GREEN: Rgb = Rgb::new(129, 199, 132);
    pub const BLUE: Rgb = Rgb::new(100, 181, 246);
    pub const PINK: Rgb = Rgb::new(244, 143, 177);
    pub const ORANGE: Rgb = Rgb::new(255, 183, 77);

    /// Highlighter colors offered when annotating a psalm.
    pub const HIGHLIGHTER_PALETTE: [Rgb; 5] =
        [Rgb::YELLOW, Rgb::GREEN, Rgb::BLUE, Rgb::PINK, Rgb::ORANGE];

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn red(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub const fn blue(self) -> u8 {
        (self.0 & 0xff) as u8
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0x00ff_ffff)
    }
}

/// A colored span of character offsets within one document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRange {
    pub start: usize,
    pub end: usize,
    pub color: Rgb,
}

impl HighlightRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn fits_within(&self, text_len: usize) -> bool {
        self.end <= text_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_out_of_the_packed_value() {
        let color = Rgb::new(0x12, 0x34, 0x56);
        assert_eq!(color.0, 0x123456);
        assert_eq!((color.red(), color.green(), color.blue()), (0x12, 0x34, 0x56));
        assert_eq!(color.to_string(), "#123456");
    }
}
