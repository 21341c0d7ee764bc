//! Buffet name tag sheets. Each distinct menu item becomes one
//! fixed-size label, packed left to right across A4 pages.

use printpdf::{Mm, PdfDocument};
use serde::Deserialize;
use utoipa::IntoParams;

use super::{fill_rect, rgb, text_at, text_width_mm, A4_HEIGHT_MM, A4_WIDTH_MM};
use crate::errors::ServiceError;

const MARGIN: f32 = 10.0;
const GAP: f32 = 10.0;

const DEFAULT_WIDTH_MM: f32 = 100.0;
const DEFAULT_HEIGHT_MM: f32 = 50.0;

// Font sizing baseline: a 120x60 mm label takes 25 pt text.
const BASE_WIDTH_MM: f32 = 120.0;
const BASE_HEIGHT_MM: f32 = 60.0;
const BASE_FONT_PT: f32 = 25.0;

/// Label sizing options, straight from the export query string.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LabelOptions {
    /// Label width in millimetres.
    pub width: Option<f32>,
    /// Label height in millimetres.
    pub height: Option<f32>,
    /// Fixed font size in points. Scaled from the label size when absent.
    pub font_size: Option<f32>,
}

impl LabelOptions {
    pub fn width_mm(&self) -> f32 {
        self.width.unwrap_or(DEFAULT_WIDTH_MM).max(10.0)
    }

    pub fn height_mm(&self) -> f32 {
        self.height.unwrap_or(DEFAULT_HEIGHT_MM).max(10.0)
    }

    pub fn font_size_pt(&self) -> f32 {
        match self.font_size {
            Some(size) if size > 0.0 => size,
            _ => label_font_size(self.width_mm(), self.height_mm()),
        }
    }
}

/// Largest font that fits the label, scaled from the 120x60 baseline.
pub fn label_font_size(width_mm: f32, height_mm: f32) -> f32 {
    let for_width = width_mm * (BASE_FONT_PT / BASE_WIDTH_MM);
    let for_height = height_mm * (BASE_FONT_PT / BASE_HEIGHT_MM);
    for_width.min(for_height)
}

/// A label placed on a page, positioned by its top-left corner in
/// top-down millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// Packs one uppercased label per distinct item name onto A4 pages.
///
/// Labels flow left to right from (10, 10) with 10 mm gaps, wrap to
/// the next row at the right edge, and spill onto a new page at the
/// bottom edge. Oversized labels still get one slot per row.
pub fn pack_labels(item_names: &[String], width_mm: f32, height_mm: f32) -> Vec<PlacedLabel> {
    let mut seen = std::collections::HashSet::new();
    let mut placed = Vec::new();

    let mut page = 0usize;
    let mut x = MARGIN;
    let mut y = MARGIN;

    for name in item_names {
        let text = name.trim().to_uppercase();
        if text.is_empty() || !seen.insert(text.clone()) {
            continue;
        }

        if x > MARGIN && x + width_mm > A4_WIDTH_MM {
            x = MARGIN;
            y += height_mm + GAP;
        }
        if y > MARGIN && y + height_mm > A4_HEIGHT_MM {
            page += 1;
            x = MARGIN;
            y = MARGIN;
        }

        placed.push(PlacedLabel { page, x, y, text });
        x += width_mm + GAP;
    }

    placed
}

pub fn render_name_tags_pdf(
    item_names: &[String],
    options: &LabelOptions,
) -> Result<Vec<u8>, ServiceError> {
    let width = options.width_mm();
    let height = options.height_mm();
    let font_size = options.font_size_pt();

    let labels = pack_labels(item_names, width, height);
    if labels.is_empty() {
        return Err(ServiceError::InvalidOperation(
            "Order has no menu items to print".to_string(),
        ));
    }

    let (doc, first_page, first_layer) =
        PdfDocument::new("Menu Name Tags", Mm(210.0), Mm(297.0), "Layer 1");
    let fonts = super::load_fonts(&doc)?;

    let mut layer_ref = doc.get_page(first_page).get_layer(first_layer);
    let mut current_page = 0usize;

    for label in &labels {
        while label.page > current_page {
            let (page, layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
            layer_ref = doc.get_page(page).get_layer(layer);
            current_page += 1;
        }

        fill_rect(&layer_ref, label.x, label.y, width, height, rgb(200, 200, 200));

        layer_ref.set_fill_color(rgb(0, 0, 0));
        let text_x = label.x + (width - text_width_mm(&label.text, font_size)).max(0.0) / 2.0;
        text_at(
            &layer_ref,
            &label.text,
            font_size,
            text_x,
            label.y + height / 2.0,
            &fonts.bold,
        );
    }

    super::finish_document(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_label_font_matches_baseline_scaling() {
        // min(100 * 25/120, 50 * 25/60) = min(20.83, 20.83)
        let size = label_font_size(100.0, 50.0);
        assert!((size - 20.833_334).abs() < 0.001);

        let size = label_font_size(120.0, 60.0);
        assert!((size - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn custom_font_size_wins_over_scaling() {
        let options = LabelOptions {
            width: Some(100.0),
            height: Some(50.0),
            font_size: Some(14.0),
        };
        assert!((options.font_size_pt() - 14.0).abs() < f32::EPSILON);
    }

    #[test]
    fn labels_start_at_the_margin_and_keep_gaps() {
        let labels = pack_labels(&names(&["Dal", "Rice"]), 80.0, 40.0);
        assert_eq!(labels[0].x, 10.0);
        assert_eq!(labels[0].y, 10.0);
        assert_eq!(labels[1].x, 100.0);
        assert_eq!(labels[1].y, 10.0);
    }

    #[test]
    fn rows_wrap_at_the_right_edge() {
        // 100 mm labels: the second one would end at 220 mm, past the
        // 210 mm page, so it wraps.
        let labels = pack_labels(&names(&["Dal", "Rice"]), 100.0, 50.0);
        assert_eq!(labels[1].x, 10.0);
        assert_eq!(labels[1].y, 70.0);
        assert_eq!(labels[1].page, 0);
    }

    #[test]
    fn pages_spill_at_the_bottom_edge() {
        // One 100x50 label per row, rows at y = 10, 70, 130, 190, 250.
        // The fifth row would end at 300 mm so it moves to page 1.
        let labels = pack_labels(
            &names(&["A", "B", "C", "D", "E"]),
            100.0,
            50.0,
        );
        assert_eq!(labels[3].page, 0);
        assert_eq!(labels[4].page, 1);
        assert_eq!(labels[4].x, 10.0);
        assert_eq!(labels[4].y, 10.0);
    }

    #[test]
    fn duplicate_items_get_one_label() {
        let labels = pack_labels(&names(&["Dal", "dal", "DAL", "Rice"]), 80.0, 40.0);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].text, "DAL");
        assert_eq!(labels[1].text, "RICE");
    }

    #[test]
    fn labels_are_uppercased() {
        let labels = pack_labels(&names(&["paneer tikka"]), 80.0, 40.0);
        assert_eq!(labels[0].text, "PANEER TIKKA");
    }
}
