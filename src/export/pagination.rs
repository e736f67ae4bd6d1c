//! Page planning for a single tall image.
//!
//! The image is scaled to the content width of the page and drawn, whole, on
//! every page; each page shifts it up by one content height so the next
//! unseen band lines up with the top margin. All lengths are in inches and
//! offsets are measured from the top edge of the page.

use super::ExportError;

/// Remaining heights at or below this are treated as fully placed.
const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    /// Uniform margin on all four sides.
    pub margin: f64,
}

impl PageGeometry {
    /// US Letter, portrait, 1 inch margins.
    pub const US_LETTER: PageGeometry = PageGeometry {
        width: 8.5,
        height: 11.0,
        margin: 1.0,
    };

    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::US_LETTER
    }
}

/// Where the image goes on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page_index: usize,
    pub x: f64,
    /// Distance from the page top to the image top; negative once the image
    /// starts above the page.
    pub y_offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub geometry: PageGeometry,
    pub content_width: f64,
    pub content_height: f64,
    /// Image height once scaled to `content_width`.
    pub scaled_height: f64,
    pub placements: Vec<Placement>,
}

impl PagePlan {
    pub fn page_count(&self) -> usize {
        self.placements.len()
    }

    /// Band of the scaled image, `[start, end)` from its top, shown on `page_index`.
    pub fn visible_band(&self, page_index: usize) -> Option<(f64, f64)> {
        let placement = self.placements.get(page_index)?;
        let start = self.geometry.margin - placement.y_offset;
        let end = (start + self.content_height).min(self.scaled_height);
        Some((start, end))
    }
}

/// Plan the pages for an image of `image_width` x `image_height` pixels.
pub fn plan_pages(
    image_width: u32,
    image_height: u32,
    geometry: PageGeometry,
) -> Result<PagePlan, ExportError> {
    if image_width == 0 || image_height == 0 {
        return Err(ExportError::EmptyImage);
    }

    let content_width = geometry.content_width();
    let content_height = geometry.content_height();
    if content_width <= 0.0 || content_height <= 0.0 {
        return Err(ExportError::InvalidGeometry(geometry));
    }

    let scaled_height = image_height as f64 * content_width / image_width as f64;

    let mut position = geometry.margin;
    let mut placements = vec![Placement {
        page_index: 0,
        x: geometry.margin,
        y_offset: position,
    }];

    let mut remaining = scaled_height - content_height;
    while remaining > EPSILON {
        position -= content_height;
        placements.push(Placement {
            page_index: placements.len(),
            x: geometry.margin,
            y_offset: position,
        });
        remaining -= content_height;
    }

    Ok(PagePlan {
        geometry,
        content_width,
        content_height,
        scaled_height,
        placements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_letter_content_area() {
        let page = PageGeometry::US_LETTER;
        assert_eq!(page.content_width(), 6.5);
        assert_eq!(page.content_height(), 9.0);
    }

    #[test]
    fn test_short_image_fits_one_page() {
        let plan = plan_pages(650, 300, PageGeometry::US_LETTER).unwrap();
        assert_eq!(plan.page_count(), 1);
        assert_eq!(plan.scaled_height, 3.0);
        assert_eq!(plan.placements[0].y_offset, 1.0);
        assert_eq!(plan.placements[0].x, 1.0);
    }

    #[test]
    fn test_exact_multiple_adds_no_blank_page() {
        // 1800 px at 650 px per 6.5 in is exactly two content heights.
        let plan = plan_pages(650, 1800, PageGeometry::US_LETTER).unwrap();
        assert_eq!(plan.scaled_height, 18.0);
        assert_eq!(plan.page_count(), 2);
    }

    #[test]
    fn test_bands_tile_the_image() {
        let plan = plan_pages(2208, 7000, PageGeometry::US_LETTER).unwrap();
        let mut expected_start = 0.0;
        for i in 0..plan.page_count() {
            let (start, end) = plan.visible_band(i).unwrap();
            assert!((start - expected_start).abs() < 1e-9);
            assert!(end > start);
            expected_start = start + plan.content_height;
        }
        let (_, last_end) = plan.visible_band(plan.page_count() - 1).unwrap();
        assert!((last_end - plan.scaled_height).abs() < 1e-9);
        assert_eq!(plan.visible_band(plan.page_count()), None);
    }

    #[test]
    fn test_empty_image_is_rejected() {
        assert!(matches!(
            plan_pages(0, 100, PageGeometry::US_LETTER),
            Err(ExportError::EmptyImage)
        ));
        assert!(matches!(
            plan_pages(100, 0, PageGeometry::US_LETTER),
            Err(ExportError::EmptyImage)
        ));
    }

    #[test]
    fn test_margins_larger_than_page_are_rejected() {
        let geometry = PageGeometry {
            width: 2.0,
            height: 2.0,
            margin: 1.0,
        };
        assert!(matches!(
            plan_pages(100, 100, geometry),
            Err(ExportError::InvalidGeometry(_))
        ));
    }
}
