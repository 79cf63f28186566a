use crate::render::Color;

/// Fixed series palette: slate blue, sage, sand, brick, lilac, taupe.
pub const PALETTE: [Color; 6] = [
    Color::from_rgb8(0x90, 0xb1, 0xc0),
    Color::from_rgb8(0xc2, 0xcc, 0xa1),
    Color::from_rgb8(0xfd, 0xcd, 0x80),
    Color::from_rgb8(0xbf, 0x61, 0x51),
    Color::from_rgb8(0xcc, 0xb4, 0xc8),
    Color::from_rgb8(0xb5, 0x99, 0x7d),
];

/// Ordinal mapping from series name to palette entry.
///
/// The color of a series depends only on its position in the configured
/// column list; positions past the palette length wrap around.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    domain: Vec<String>,
}

impl ColorScale {
    #[must_use]
    pub fn new(columns: &[String]) -> Self {
        Self {
            domain: columns.to_vec(),
        }
    }

    #[must_use]
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    #[must_use]
    pub fn color_at(index: usize) -> Color {
        PALETTE[index % PALETTE.len()]
    }

    /// Color of a configured series, `None` for names outside the domain.
    #[must_use]
    pub fn color_for(&self, series_name: &str) -> Option<Color> {
        self.domain
            .iter()
            .position(|name| name == series_name)
            .map(Self::color_at)
    }
}
