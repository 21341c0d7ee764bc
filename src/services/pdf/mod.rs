/*!
 * PDF export rendering.
 *
 * All exports render onto A4 portrait pages with `printpdf`. Layout
 * coordinates in the drawing helpers run top-down in millimetres, the
 * way the print layouts were designed, and are flipped to the PDF's
 * bottom-left origin at draw time.
 */

pub mod checklist;
pub mod invoice;
pub mod name_tags;

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocumentReference, PdfLayerReference, Rect, Rgb,
};

use crate::errors::ServiceError;

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Average Helvetica glyph advance as a fraction of the font size.
/// Used to centre text without embedded font metrics.
const GLYPH_WIDTH_FACTOR: f32 = 0.5;
const PT_TO_MM: f32 = 0.352_78;

pub(crate) struct PdfFonts {
    pub regular: IndirectFontRef,
    pub bold: IndirectFontRef,
}

pub(crate) fn load_fonts(doc: &PdfDocumentReference) -> Result<PdfFonts, ServiceError> {
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ServiceError::ExportError(format!("font load failed: {}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ServiceError::ExportError(format!("font load failed: {}", e)))?;
    Ok(PdfFonts { regular, bold })
}

/// Converts a top-down y coordinate to the PDF's bottom-left origin.
pub(crate) fn from_top(y_mm: f32) -> Mm {
    Mm(A4_HEIGHT_MM - y_mm)
}

pub(crate) fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

/// Fills a rectangle given its top-left corner in top-down coordinates.
pub(crate) fn fill_rect(layer: &PdfLayerReference, x: f32, y_top: f32, w: f32, h: f32, color: Color) {
    layer.set_fill_color(color);
    let rect = Rect::new(Mm(x), from_top(y_top + h), Mm(x + w), from_top(y_top))
        .with_mode(PaintMode::Fill);
    layer.add_rect(rect);
}

/// Strokes a rectangle outline given its top-left corner.
pub(crate) fn stroke_rect(layer: &PdfLayerReference, x: f32, y_top: f32, w: f32, h: f32) {
    layer.set_outline_color(rgb(0, 0, 0));
    layer.set_outline_thickness(0.4);
    let rect = Rect::new(Mm(x), from_top(y_top + h), Mm(x + w), from_top(y_top))
        .with_mode(PaintMode::Stroke);
    layer.add_rect(rect);
}

/// Draws text at a top-down baseline position.
pub(crate) fn text_at(
    layer: &PdfLayerReference,
    text: &str,
    size_pt: f32,
    x: f32,
    y_top: f32,
    font: &IndirectFontRef,
) {
    layer.use_text(text, size_pt, Mm(x), from_top(y_top), font);
}

/// Estimated rendered width of `text` in millimetres.
pub(crate) fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * GLYPH_WIDTH_FACTOR * PT_TO_MM
}

pub(crate) fn finish_document(doc: PdfDocumentReference) -> Result<Vec<u8>, ServiceError> {
    doc.save_to_bytes()
        .map_err(|e| ServiceError::ExportError(format!("pdf serialization failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_down_flip_is_symmetric() {
        assert_eq!(from_top(0.0).0, A4_HEIGHT_MM);
        assert_eq!(from_top(A4_HEIGHT_MM).0, 0.0);
    }

    #[test]
    fn width_estimate_grows_with_text() {
        let short = text_width_mm("AB", 25.0);
        let long = text_width_mm("ABCD", 25.0);
        assert!(long > short);
        assert!((long - 2.0 * short).abs() < f32::EPSILON);
    }
}
