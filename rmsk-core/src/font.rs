//! Text measurement used by extent and label placement.

/// Pixel metrics of the label font.
pub trait TextMeasure {
    fn string_width(&self, text: &str) -> i32;
    fn line_height(&self) -> i32;
}

/// Monospaced approximation of the browser's small label font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWidthFont {
    pub char_width: i32,
    pub line_height: i32,
}

impl FixedWidthFont {
    pub fn new(char_width: i32, line_height: i32) -> Self {
        Self { char_width, line_height }
    }
}

impl Default for FixedWidthFont {
    fn default() -> Self {
        Self {
            char_width: 7,
            line_height: 12,
        }
    }
}

impl TextMeasure for FixedWidthFont {
    fn string_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * self.char_width
    }

    fn line_height(&self) -> i32 {
        self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_metrics() {
        let font = FixedWidthFont::default();
        assert_eq!(font.string_width("AluY"), 28);
        assert_eq!(font.string_width(""), 0);
        assert_eq!(font.line_height(), 12);
    }
}
