//! Font metrics for text measurement

/// Metrics needed to measure script text
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// Line height in points
    pub line_height: f32,
    /// Width of ASCII characters (0-127)
    pub char_widths: Vec<f32>,
    /// Default width for non-ASCII characters
    pub default_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        // Courier 12pt: every advance is 0.6 em = 7.2pt, single-spaced at 12pt
        let default_width = 7.2;
        let char_widths = vec![default_width; 128];

        Self {
            line_height: 12.0,
            char_widths,
            default_width,
        }
    }
}

impl FontMetrics {
    pub fn new(line_height: f32, char_widths: Vec<f32>, default_width: f32) -> Self {
        Self {
            line_height,
            char_widths,
            default_width,
        }
    }

    /// Get width of a character
    pub fn width(&self, c: char) -> f32 {
        if c.is_ascii() {
            if let Some(w) = self.char_widths.get(c as usize) {
                return *w;
            }
        }
        self.default_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_courier_advances() {
        let metrics = FontMetrics::default();
        assert_eq!(metrics.width('a'), 7.2);
        assert_eq!(metrics.width('W'), 7.2);
        assert_eq!(metrics.width('é'), 7.2);
        assert_eq!(metrics.line_height, 12.0);
    }

    #[test]
    fn test_custom_widths() {
        let mut widths = vec![8.0; 128];
        widths['i' as usize] = 4.0;
        let metrics = FontMetrics::new(10.0, widths, 8.0);
        assert_eq!(metrics.width('i'), 4.0);
        assert_eq!(metrics.width('m'), 8.0);
    }
}
