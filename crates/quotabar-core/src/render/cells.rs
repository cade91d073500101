/// Glyphs for the marker-capable styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphSet {
    pub filled: char,
    pub empty: char,
    /// Marks how far into the window we are
    pub marker: char,
}

pub const ASCII_GLYPHS: GlyphSet = GlyphSet {
    filled: '#',
    empty: '-',
    marker: '|',
};

pub const UNICODE_GLYPHS: GlyphSet = GlyphSet {
    filled: '█',
    empty: '░',
    marker: '│',
};

/// `width` cells with fill and a time marker; the marker wins ties
pub fn marked_cells(fill: u8, time: u8, width: u16, glyphs: &GlyphSet) -> String {
    let width = width as usize;
    let filled = scaled(fill, width);
    let marker = scaled(time, width);

    (0..width)
        .map(|i| {
            if i == marker {
                glyphs.marker
            } else if i < filled {
                glyphs.filled
            } else {
                glyphs.empty
            }
        })
        .collect()
}

/// `floor(percent * width / 100)`, clamped to `width`
fn scaled(percent: u8, width: usize) -> usize {
    (percent.min(100) as usize * width / 100).min(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(s: &str, c: char) -> usize {
        s.chars().filter(|x| *x == c).count()
    }

    #[test]
    fn test_filled_count_is_floored() {
        // 45% of 8 = 3.6
        let cells = marked_cells(45, 100, 8, &UNICODE_GLYPHS);
        assert_eq!(cells, "███░░░░░");
        assert_eq!(count(&cells, '█'), 3);
    }

    #[test]
    fn test_filled_count_for_all_fills() {
        for width in [1usize, 5, 8, 13] {
            for fill in 0..=100u8 {
                // marker at width (time = 100) is never drawn
                let cells = marked_cells(fill, 100, width as u16, &ASCII_GLYPHS);
                assert_eq!(cells.chars().count(), width);
                assert_eq!(count(&cells, '#'), fill as usize * width / 100);
            }
        }
    }

    #[test]
    fn test_marker_wins_over_fill() {
        // filled = 2, marker = 2
        let cells = marked_cells(28, 28, 8, &UNICODE_GLYPHS);
        assert_eq!(cells, "██│░░░░░");

        // marker inside the filled region replaces a filled cell
        let cells = marked_cells(100, 50, 4, &ASCII_GLYPHS);
        assert_eq!(cells, "##|#");
    }

    #[test]
    fn test_marker_at_start() {
        assert_eq!(marked_cells(0, 0, 5, &ASCII_GLYPHS), "|----");
    }

    #[test]
    fn test_full_and_empty() {
        assert_eq!(marked_cells(100, 100, 4, &ASCII_GLYPHS), "####");
        assert_eq!(marked_cells(0, 100, 4, &ASCII_GLYPHS), "----");
    }

    #[test]
    fn test_zero_width() {
        assert_eq!(marked_cells(50, 50, 0, &ASCII_GLYPHS), "");
    }
}
