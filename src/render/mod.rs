//! Letter rendering - text layout and bitmap capture.
//!
//! The letter is laid out the way it is presented on screen (fixed width,
//! generous padding, large script-like type, whitespace preserved) into a
//! region as tall as its content, then captured at 3x for print.

pub mod capture;
pub mod layout;

pub use capture::{capture, RenderedBitmap};
pub use layout::{layout_text, LetterLayout};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use ttf_parser::Face;

/// Upper bound on captured pixels (128 MiB of RGBA).
pub const MAX_CAPTURE_PIXELS: u64 = 32 * 1024 * 1024;

/// Most laid-out lines a letter may have; a 300-word letter is about 40.
pub const MAX_LETTER_LINES: usize = 80;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read font {path}: {source}")]
    FontIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse font: {0}")]
    FontParse(String),
    #[error("letter lays out to {lines} lines, more than the limit of {max}")]
    TooManyLines { lines: usize, max: usize },
    #[error("capture of {width}x{height} px exceeds the limit of {max} pixels")]
    TooLarge { width: u32, height: u32, max: u64 },
    #[error("failed to allocate a {width}x{height} px bitmap")]
    Allocation { width: u32, height: u32 },
    #[error("failed to encode PNG: {0}")]
    Png(String),
}

/// 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#fef3c7`, the amber paper the letter is shown on.
    pub const AMBER_100: Rgb = Rgb(0xfe, 0xf3, 0xc7);
    /// `#1f2937`
    pub const GRAY_800: Rgb = Rgb(0x1f, 0x29, 0x37);
}

/// Geometry of the rendered region, in CSS pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct LetterStyle {
    /// Full region width, padding included.
    pub width: f32,
    pub padding: f32,
    pub font_size: f32,
    /// Multiple of `font_size`.
    pub line_height: f32,
    pub text_color: Rgb,
    pub background: Rgb,
    /// Oversampling factor applied at capture.
    pub capture_scale: f32,
}

impl Default for LetterStyle {
    fn default() -> Self {
        Self {
            width: 736.0,
            padding: 48.0,
            font_size: 36.0,
            line_height: 1.625,
            text_color: Rgb::GRAY_800,
            background: Rgb::AMBER_100,
            capture_scale: 3.0,
        }
    }
}

impl LetterStyle {
    pub fn text_width(&self) -> f32 {
        (self.width - 2.0 * self.padding).max(0.0)
    }

    pub fn line_height_px(&self) -> f32 {
        self.font_size * self.line_height
    }
}

/// Location of the bundled letter typeface.
pub fn default_font_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("static/fonts/DejaVuSerif-Italic.ttf")
}

/// Lays out and captures letters with one typeface and style.
#[derive(Debug, Clone)]
pub struct LetterRenderer {
    font: Vec<u8>,
    style: LetterStyle,
}

impl LetterRenderer {
    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let font = fs::read(path).map_err(|source| RenderError::FontIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(font)
    }

    /// Fails unless `font` parses, so a renderer always has usable glyphs.
    pub fn from_bytes(font: Vec<u8>) -> Result<Self, RenderError> {
        Face::parse(&font, 0).map_err(|e| RenderError::FontParse(e.to_string()))?;
        Ok(Self {
            font,
            style: LetterStyle::default(),
        })
    }

    pub fn with_style(mut self, style: LetterStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &LetterStyle {
        &self.style
    }

    fn face(&self) -> Result<Face<'_>, RenderError> {
        Face::parse(&self.font, 0).map_err(|e| RenderError::FontParse(e.to_string()))
    }

    pub fn layout(&self, text: &str) -> Result<LetterLayout, RenderError> {
        let face = self.face()?;
        Ok(layout_text(&face, text, &self.style))
    }

    /// Lay out `text` and check it against [`MAX_LETTER_LINES`] without rasterizing.
    pub fn check_fits(&self, text: &str) -> Result<LetterLayout, RenderError> {
        let layout = self.layout(text)?;
        ensure_line_limit(&layout)?;
        Ok(layout)
    }

    /// Lay out `text` and capture it at the style's scale.
    pub fn render(&self, text: &str) -> Result<RenderedBitmap, RenderError> {
        let face = self.face()?;
        let layout = layout_text(&face, text, &self.style);
        ensure_line_limit(&layout)?;
        capture(&face, &layout, self.style.capture_scale)
    }
}

fn ensure_line_limit(layout: &LetterLayout) -> Result<(), RenderError> {
    if layout.lines.len() > MAX_LETTER_LINES {
        return Err(RenderError::TooManyLines {
            lines: layout.lines.len(),
            max: MAX_LETTER_LINES,
        });
    }
    Ok(())
}
