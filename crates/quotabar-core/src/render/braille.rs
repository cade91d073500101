/// Cell glyph by dot count (0-8); 7 and 8 share the full cell
pub const BRAILLE_LEVELS: [char; 9] = ['⠀', '⡀', '⣀', '⣄', '⣤', '⣦', '⣶', '⣿', '⣿'];

const DOTS_PER_CELL: i64 = 8;

/// `width` braille cells, 8 fill levels per cell. Has no time marker.
pub fn braille_cells(fill: u8, width: u16) -> String {
    let width = width as i64;
    let total = width * DOTS_PER_CELL;
    let dots = fill.min(100) as i64 * total / 100;

    (0..width)
        .map(|i| {
            let level = (dots - i * DOTS_PER_CELL).clamp(0, DOTS_PER_CELL);
            BRAILLE_LEVELS[level as usize]
        })
        .collect()
}
