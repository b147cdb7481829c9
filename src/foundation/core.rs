pub use kurbo::{Point, Rect, Size};

/// Fixed frame rate of the medium. Timing rules are derived from it.
pub const FRAMES_PER_SECOND: i64 = 24;
/// Frames in half a second at [`FRAMES_PER_SECOND`].
pub const HALF_SECOND_FRAMES: i64 = FRAMES_PER_SECOND / 2;
/// Frames in a quarter second at [`FRAMES_PER_SECOND`].
pub const SIX_FRAMES: i64 = FRAMES_PER_SECOND / 4;

/// Canonical in-between symbol stored in place of any recognized alias.
pub const IN_BETWEEN_GLYPH: &str = "○";
/// Cell values (after trimming) that mean "in-between frame".
pub const IN_BETWEEN_ALIASES: [&str; 3] = ["中割", "·", "IB"];
/// Miss / hold marker. Stored verbatim, emphasized by renderers.
pub const HOLD_GLYPH: &str = "X";

/// Straight (non-premultiplied) opaque RGB8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`, as used in SVG attributes.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Palette shared by the layout and the renderers.
pub mod palette {
    use super::Rgb8;

    pub const SLATE_50: Rgb8 = Rgb8::new(0xf8, 0xfa, 0xfc);
    pub const SLATE_100: Rgb8 = Rgb8::new(0xf1, 0xf5, 0xf9);
    pub const SLATE_200: Rgb8 = Rgb8::new(0xe2, 0xe8, 0xf0);
    pub const SLATE_300: Rgb8 = Rgb8::new(0xcb, 0xd5, 0xe1);
    pub const SLATE_400: Rgb8 = Rgb8::new(0x94, 0xa3, 0xb8);
    pub const SLATE_500: Rgb8 = Rgb8::new(0x64, 0x74, 0x8b);
    pub const SLATE_800: Rgb8 = Rgb8::new(0x1e, 0x29, 0x3b);
    pub const SLATE_900: Rgb8 = Rgb8::new(0x0f, 0x17, 0x2a);
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
