//! PDF export of a generated letter.
//!
//! Capture the letter as a bitmap, plan the pages, write the PDF.

pub mod pagination;
pub mod pdf;

pub use pagination::{plan_pages, PageGeometry, PagePlan, Placement};
pub use pdf::write_pdf;

use thiserror::Error;

use crate::render::{LetterRenderer, RenderError};

/// The message a user sees when an export fails.
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to export the love letter as PDF.";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to capture letter: {0}")]
    Capture(#[from] RenderError),
    #[error("captured image is empty")]
    EmptyImage,
    #[error("page geometry {0:?} leaves no content area")]
    InvalidGeometry(PageGeometry),
    #[error("failed to write PDF: {0}")]
    Pdf(String),
}

/// Result of a successful export.
#[derive(Debug)]
pub struct ExportedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
    pub page_count: usize,
}

/// `love-letter-to-<recipient>.pdf`, with the name made safe for a file system.
pub fn download_filename(recipient_name: &str) -> String {
    let name = sanitize_filename::sanitize(recipient_name.trim());
    let name = if name.is_empty() { "you".to_string() } else { name };
    format!("love-letter-to-{}.pdf", name)
}

/// Render `letter` and lay it out on US Letter pages.
pub fn export_letter(
    renderer: &LetterRenderer,
    recipient_name: &str,
    letter: &str,
) -> Result<ExportedDocument, ExportError> {
    export_letter_with(renderer, recipient_name, letter, PageGeometry::US_LETTER)
}

pub fn export_letter_with(
    renderer: &LetterRenderer,
    recipient_name: &str,
    letter: &str,
    geometry: PageGeometry,
) -> Result<ExportedDocument, ExportError> {
    let bitmap = renderer.render(letter)?;
    let plan = plan_pages(bitmap.width(), bitmap.height(), geometry)?;
    log::debug!(
        "Exporting {}x{} px capture onto {} page(s)",
        bitmap.width(),
        bitmap.height(),
        plan.page_count()
    );

    let pdf = write_pdf(&bitmap, &plan)?;
    Ok(ExportedDocument {
        filename: download_filename(recipient_name),
        pdf,
        page_count: plan.page_count(),
    })
}
