use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const BLACK: Rgba = Rgba([0, 0, 0, 255]);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba([r, g, b, 255])
    }
}

const BUILTIN: [Rgba; 12] = [
    Rgba::opaque(213, 255, 0),
    Rgba::opaque(255, 0, 86),
    Rgba::opaque(158, 0, 142),
    Rgba::opaque(14, 76, 161),
    Rgba::opaque(255, 229, 2),
    Rgba::opaque(0, 95, 57),
    Rgba::opaque(0, 255, 0),
    Rgba::opaque(149, 0, 58),
    Rgba::opaque(255, 147, 126),
    Rgba::opaque(164, 36, 0),
    Rgba::opaque(0, 21, 68),
    Rgba::opaque(145, 208, 203),
];

/// Pure colour lookup: the list wraps around. `None` only for an empty list.
pub fn nth_color(colors: &[Rgba], index: usize) -> Option<Rgba> {
    if colors.is_empty() {
        return None;
    }
    Some(colors[index % colors.len()])
}

/// Non-empty list of satellite colours.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: BUILTIN.to_vec(),
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<Rgba>) -> Option<Self> {
        (!colors.is_empty()).then_some(Self { colors })
    }

    pub fn single(color: Rgba) -> Self {
        Self {
            colors: vec![color],
        }
    }

    /// Parse whitespace separated `r g b` lines; alpha is always 255.
    pub fn from_rgb_lines(text: &str) -> Result<Self, String> {
        let colors = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .enumerate()
            .map(|(i, line)| {
                let parts = line
                    .split_whitespace()
                    .map(|p| p.parse::<u8>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| format!("line {}: {}", i + 1, e))?;
                match parts.as_slice() {
                    [r, g, b] => Ok(Rgba::opaque(*r, *g, *b)),
                    _ => Err(format!("line {}: expected 3 components, got {}", i + 1, parts.len())),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(colors).ok_or_else(|| "palette is empty".to_string())
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn nth(&self, index: usize) -> Rgba {
        // Never empty, so the fallback is unreachable.
        nth_color(&self.colors, index).unwrap_or(Rgba::BLACK)
    }
}

/// Caller-owned position in a palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorCursor {
    index: usize,
}

impl ColorCursor {
    pub fn advance(&mut self, palette: &Palette) -> Rgba {
        let color = palette.nth(self.index);
        self.index = (self.index + 1) % palette.colors().len();
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nth_color_wraps() {
        let colors = [Rgba::opaque(1, 2, 3), Rgba::opaque(4, 5, 6)];
        assert_eq!(nth_color(&colors, 0), Some(colors[0]));
        assert_eq!(nth_color(&colors, 3), Some(colors[1]));
        assert_eq!(nth_color(&[], 3), None);
    }

    #[test]
    fn cursor_cycles_through_palette() {
        let palette = Palette::from_rgb_lines("255 0 0\n0 255 0\n\n0 0 255\n").unwrap();
        let mut cursor = ColorCursor::default();
        let seen: Vec<Rgba> = (0..4).map(|_| cursor.advance(&palette)).collect();
        assert_eq!(
            seen,
            vec![
                Rgba([255, 0, 0, 255]),
                Rgba([0, 255, 0, 255]),
                Rgba([0, 0, 255, 255]),
                Rgba([255, 0, 0, 255]),
            ]
        );
    }

    #[test]
    fn cursor_follows_nth_color() {
        let palette = Palette::default();
        let mut cursor = ColorCursor::default();
        for i in 0..30 {
            assert_eq!(Some(cursor.advance(&palette)), nth_color(palette.colors(), i));
        }
    }

    #[test]
    fn independent_cursors_do_not_interfere() {
        let palette = Palette::default();
        let mut a = ColorCursor::default();
        let mut b = ColorCursor::default();
        a.advance(&palette);
        a.advance(&palette);
        assert_eq!(b.advance(&palette), palette.nth(0));
    }

    #[test]
    fn rejects_bad_palette_text() {
        assert!(Palette::from_rgb_lines("").is_err());
        assert!(Palette::from_rgb_lines("1 2").is_err());
        assert!(Palette::from_rgb_lines("1 2 300").is_err());
        assert!(Palette::new(Vec::new()).is_none());
    }

    #[test]
    fn serializes_as_plain_array() {
        let json = serde_json::to_string(&Rgba::opaque(213, 255, 0)).unwrap();
        assert_eq!(json, "[213,255,0,255]");
    }
}
