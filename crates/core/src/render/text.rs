//! Text encoding and measurement for the built-in Helvetica fonts.

/// Suffix appended to truncated cell text.
pub const ELLIPSIS: &str = "...";

/// Helvetica advance widths for `' '..='~'`, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Width used for characters outside the ASCII table.
const FALLBACK_WIDTH: u16 = 556;

/// Bold glyphs run slightly wider than regular ones.
const BOLD_FACTOR: f32 = 1.06;

/// Encodes text as `WinAnsiEncoding` bytes.
///
/// Latin-1 maps one to one. A few typographic marks map to their Windows-1252
/// slots; everything else becomes `?`.
#[must_use]
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => u8::try_from(u32::from(c)).unwrap_or(b'?'),
            '\u{2014}' => 0x97,
            '\u{2013}' => 0x96,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{20ac}' => 0x80,
            _ => b'?',
        })
        .collect()
}

fn char_width(c: char) -> u16 {
    match c {
        '\u{2014}' | '\u{2026}' => 1000,
        ' '..='~' => HELVETICA_WIDTHS[(u32::from(c) - 0x20) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `text` in points at `size`.
#[must_use]
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    let width = units as f32 * size / 1000.0;
    if bold { width * BOLD_FACTOR } else { width }
}

/// Shortens `text` so it fits `max_width` points, appending [`ELLIPSIS`].
///
/// Text that already fits is returned unchanged. When not even the ellipsis
/// fits, the result is empty.
#[must_use]
pub fn truncate_to_width(text: &str, max_width: f32, size: f32, bold: bool) -> String {
    if text_width(text, size, bold) <= max_width {
        return text.to_string();
    }

    let budget = max_width - text_width(ELLIPSIS, size, bold);
    if budget < 0.0 {
        return String::new();
    }

    let mut kept = String::new();
    for c in text.chars() {
        kept.push(c);
        if text_width(&kept, size, bold) > budget {
            kept.pop();
            break;
        }
    }
    format!("{}{ELLIPSIS}", kept.trim_end())
}
