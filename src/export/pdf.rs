//! PDF assembly with `lopdf`.
//!
//! The captured bitmap is written once as an image XObject and referenced from
//! every page. Each page clips to its content area before drawing, so the
//! parts of the image that fall into the margins stay blank.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::pagination::{PagePlan, Placement};
use super::ExportError;
use crate::render::RenderedBitmap;

const POINTS_PER_INCH: f64 = 72.0;
const IMAGE_NAME: &str = "Im0";

fn pt(inches: f64) -> Object {
    Object::Real((inches * POINTS_PER_INCH) as f32)
}

/// Encode `bitmap` laid out according to `plan` as a PDF file.
pub fn write_pdf(bitmap: &RenderedBitmap, plan: &PagePlan) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => bitmap.width() as i64,
            "Height" => bitmap.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        bitmap.rgb_data(),
    );
    let image_id = doc.add_object(image);

    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! {
            IMAGE_NAME => image_id,
        },
    });

    let geometry = plan.geometry;
    let mut kids = Vec::with_capacity(plan.page_count());
    for placement in &plan.placements {
        let content = page_content(plan, placement);
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![pt(0.0), pt(0.0), pt(geometry.width), pt(geometry.height)],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id: ObjectId = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(buffer)
}

/// Clip to the content area, then draw the full image at its placement.
fn page_content(plan: &PagePlan, placement: &Placement) -> Content {
    let geometry = plan.geometry;
    // PDF space grows upward from the bottom edge.
    let image_bottom = geometry.height - placement.y_offset - plan.scaled_height;

    Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "re",
                vec![
                    pt(geometry.margin),
                    pt(geometry.margin),
                    pt(plan.content_width),
                    pt(plan.content_height),
                ],
            ),
            Operation::new("W", vec![]),
            Operation::new("n", vec![]),
            Operation::new(
                "cm",
                vec![
                    pt(plan.content_width),
                    pt(0.0),
                    pt(0.0),
                    pt(plan.scaled_height),
                    pt(placement.x),
                    pt(image_bottom),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    }
}
