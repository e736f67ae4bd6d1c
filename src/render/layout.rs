use ttf_parser::{Face, GlyphId};

use super::LetterStyle;

/// A letter laid out into its region.
#[derive(Debug, Clone)]
pub struct LetterLayout {
    pub lines: Vec<String>,
    pub style: LetterStyle,
}

impl LetterLayout {
    /// Region width in CSS pixels.
    pub fn width(&self) -> f32 {
        self.style.width
    }

    /// Natural content height in CSS pixels, padding included.
    pub fn height(&self) -> f32 {
        2.0 * self.style.padding + self.lines.len() as f32 * self.style.line_height_px()
    }
}

/// Advance of `text` in CSS pixels at `font_size`.
pub fn measure(face: &Face<'_>, text: &str, font_size: f32) -> f32 {
    let scale = font_size / face.units_per_em() as f32;
    text.chars()
        .map(|c| {
            let glyph = face.glyph_index(c).unwrap_or(GlyphId(0));
            face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * scale
        })
        .sum()
}

/// Wrap `text` into lines that fit the style's text width.
///
/// Newlines are kept, runs of spaces are kept, and words wider than a whole
/// line are broken between characters.
pub fn layout_text(face: &Face<'_>, text: &str, style: &LetterStyle) -> LetterLayout {
    let max_width = style.text_width();
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r').replace('\t', "    ");
        wrap_paragraph(face, &paragraph, style.font_size, max_width, &mut lines);
    }

    LetterLayout {
        lines,
        style: style.clone(),
    }
}

fn wrap_paragraph(
    face: &Face<'_>,
    paragraph: &str,
    font_size: f32,
    max_width: f32,
    lines: &mut Vec<String>,
) {
    let fits = |s: &str| measure(face, s, font_size) <= max_width;
    let mut current = String::new();

    for (i, word) in paragraph.split(' ').enumerate() {
        let candidate = if i == 0 {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if i > 0 && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if fits(word) {
            current = word.to_string();
            continue;
        }

        // Break an over-long word between characters.
        for c in word.chars() {
            current.push(c);
            if !fits(&current) && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }

    lines.push(current);
}
