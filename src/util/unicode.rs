use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Width of `s` in terminal cells
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Emoji presentation sequences (`❤️`) and ZWJ sequences are one glyph
fn grapheme_width(g: &str) -> usize {
    if g.chars().count() > 1 && g.contains(['\u{fe0f}', '\u{200d}']) {
        return 2;
    }
    UnicodeWidthStr::width(g)
}

/// Cut `s` to at most `max_cells`, ending with `…` when shortened.
/// Never splits a grapheme.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut width = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let gw = grapheme_width(g);
        if width + gw > budget {
            break;
        }
        width += gw;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Right-pad with spaces to `cells` wide; longer strings are returned as is
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let w = display_width(s);
    let mut out = s.to_string();
    out.extend(std::iter::repeat_n(' ', cells.saturating_sub(w)));
    out
}
