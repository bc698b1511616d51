//! Nesting-level colors for rainbow brackets.

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Create a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The six bracket colors, indexed by `level % 6`.
pub const BRACKET_PALETTE: [Color; 6] = [
    Color::rgb(0xff, 0xd7, 0x00), // gold
    Color::rgb(0xda, 0x70, 0xd6), // orchid
    Color::rgb(0x00, 0xbf, 0xff), // deep sky blue
    Color::rgb(0x32, 0xcd, 0x32), // lime green
    Color::rgb(0xff, 0x63, 0x47), // tomato
    Color::rgb(0x93, 0x70, 0xdb), // medium purple
];

/// Color for a bracket at nesting `level`.
pub fn color_for_level(level: usize) -> Color {
    BRACKET_PALETTE[level % BRACKET_PALETTE.len()]
}
