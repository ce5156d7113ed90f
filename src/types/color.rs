/// Integer RGBA color as it appears in the decoded buffer, the palette and
/// override records. Channels are always clamped before storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Channel equality ignoring alpha. Group membership and the tint
    /// anchor comparisons work on the color channels only.
    pub fn same_rgb(&self, other: &Rgba) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }
}

/// HSL working values derived from RGB on demand. Never the source of
/// truth; `h` in degrees [0,360), `s` and `l` in [0,1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }
}

/// A unique color extracted from the loaded image: the original RGBA value
/// paired with its canonical lowercase `#rrggbb` key. Two palette entries
/// that differ only in alpha share one hex key for grouping purposes.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteColor {
    pub hex: String,
    pub original: Rgba,
}
