use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Transform};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use super::{LetterLayout, RenderError, Rgb, MAX_CAPTURE_PIXELS};

/// An opaque raster capture of a laid-out letter.
pub struct RenderedBitmap {
    pixmap: Pixmap,
    background: Rgb,
}

impl RenderedBitmap {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Pixel at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.pixmap
            .pixel(x, y)
            .map(|p| Rgb(p.red(), p.green(), p.blue()))
    }

    /// Packed 8-bit RGB samples, row-major, top row first.
    ///
    /// The capture is fully opaque, so premultiplied channels are the
    /// straight colour values.
    pub fn rgb_data(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixmap.data().len() / 4 * 3);
        for px in self.pixmap.data().chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
        }
        rgb
    }

    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Png(e.to_string()))
    }
}

impl std::fmt::Debug for RenderedBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedBitmap")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("background", &self.background)
            .finish()
    }
}

/// Rasterize `layout` at `scale` times its CSS size over the style background.
pub fn capture(
    face: &Face<'_>,
    layout: &LetterLayout,
    scale: f32,
) -> Result<RenderedBitmap, RenderError> {
    let style = &layout.style;
    let width = (layout.width() * scale).ceil() as u32;
    let height = (layout.height() * scale).ceil() as u32;

    if width as u64 * height as u64 > MAX_CAPTURE_PIXELS {
        return Err(RenderError::TooLarge {
            width,
            height,
            max: MAX_CAPTURE_PIXELS,
        });
    }

    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Allocation { width, height })?;
    let Rgb(r, g, b) = style.background;
    pixmap.fill(Color::from_rgba8(r, g, b, 255));

    let mut paint = Paint::default();
    let Rgb(r, g, b) = style.text_color;
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = true;

    let units_per_em = face.units_per_em() as f32;
    let font_px = style.font_size * scale;
    let glyph_scale = font_px / units_per_em;
    let line_px = style.line_height_px() * scale;
    let ascent = face.ascender() as f32 * glyph_scale;
    let descent = face.descender() as f32 * glyph_scale;
    // The glyph box is centred in the line box.
    let half_leading = (line_px - (ascent - descent)) / 2.0;
    let padding = style.padding * scale;

    for (i, line) in layout.lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let baseline = padding + i as f32 * line_px + half_leading + ascent;
        let mut builder = PathBuilder::new();
        let mut pen_x = padding;

        for c in line.chars() {
            let glyph = face.glyph_index(c).unwrap_or(GlyphId(0));
            let mut outline = GlyphOutline {
                builder: &mut builder,
                origin_x: pen_x,
                origin_y: baseline,
                scale: glyph_scale,
            };
            face.outline_glyph(glyph, &mut outline);
            pen_x += face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * glyph_scale;
        }

        if let Some(path) = builder.finish() {
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    Ok(RenderedBitmap {
        pixmap,
        background: style.background,
    })
}

/// Feeds font-unit outlines into a pixel-space path (y axis flipped).
struct GlyphOutline<'a> {
    builder: &'a mut PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl GlyphOutline<'_> {
    fn x(&self, x: f32) -> f32 {
        self.origin_x + x * self.scale
    }

    fn y(&self, y: f32) -> f32 {
        self.origin_y - y * self.scale
    }
}

impl OutlineBuilder for GlyphOutline<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.x(x), self.y(y));
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = (self.x(x), self.y(y));
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1, x, y) = (self.x(x1), self.y(y1), self.x(x), self.y(y));
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = (self.x(x1), self.y(y1));
        let (x2, y2) = (self.x(x2), self.y(y2));
        let (x, y) = (self.x(x), self.y(y));
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
