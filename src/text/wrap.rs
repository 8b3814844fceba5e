//! Greedy line wrapping against measured widths.

use super::font::FontHandle;

/// Split `text` into lines no wider than `max_width` when drawn in `font`.
///
/// Tokens are whitespace-separated words joined by single spaces. A word is
/// appended to the current line while the joined line still measures within
/// `max_width`; otherwise the line is closed and the word starts the next one.
/// A word that is wider than `max_width` on its own gets a line to itself
/// and overflows rather than being broken.
///
/// Empty (or all-whitespace) input yields a single empty line.
pub fn wrap(text: &str, font: &FontHandle, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", current, word);
        if font.measure(&candidate).0 <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}
