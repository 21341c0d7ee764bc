//! Packing checklist export. A4 sheet with a coloured header band, an
//! order detail grid, and the supply table with tick boxes.

use printpdf::{Mm, PdfDocument};

use super::{fill_rect, rgb, stroke_rect, text_at, text_width_mm, PdfFonts, A4_WIDTH_MM};
use crate::errors::ServiceError;
use crate::services::checklist::Checklist;
use crate::services::orders::OrderResponse;

const MARGIN: f32 = 10.0;
const HEADER_HEIGHT: f32 = 20.0;
const DETAILS_START_Y: f32 = 25.0;
const TABLE_START_Y: f32 = 55.0;
const ROW_HEIGHT: f32 = 8.0;
const TABLE_BOTTOM: f32 = 275.0;
const COUNT_COL_X: f32 = 160.0;
const CHECKBOX_COL_X: f32 = 185.0;

pub fn render_checklist_pdf(
    order: &OrderResponse,
    checklist: &Checklist,
) -> Result<Vec<u8>, ServiceError> {
    let (doc, page, layer) = PdfDocument::new("Catering Checklist", Mm(210.0), Mm(297.0), "Layer 1");
    let fonts = super::load_fonts(&doc)?;

    // Rows per page, then render page by page so footers can carry
    // the final page count.
    let rows_per_page = ((TABLE_BOTTOM - TABLE_START_Y) / ROW_HEIGHT) as usize - 1;
    let chunks: Vec<_> = checklist.entries.chunks(rows_per_page.max(1)).collect();
    let page_count = chunks.len().max(1);

    let mut layer_ref = doc.get_page(page).get_layer(layer);
    for (page_no, rows) in chunks.iter().enumerate() {
        if page_no > 0 {
            let (new_page, new_layer) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
            layer_ref = doc.get_page(new_page).get_layer(new_layer);
        }

        draw_page_chrome(&layer_ref, &fonts, order, page_no + 1, page_count);
        draw_table(&layer_ref, &fonts, rows);
    }

    super::finish_document(doc)
}

fn draw_page_chrome(
    layer: &printpdf::PdfLayerReference,
    fonts: &PdfFonts,
    order: &OrderResponse,
    page_no: usize,
    page_count: usize,
) {
    fill_rect(layer, 0.0, 0.0, A4_WIDTH_MM, 297.0, rgb(250, 250, 250));
    fill_rect(layer, 0.0, 0.0, A4_WIDTH_MM, HEADER_HEIGHT, rgb(41, 128, 185));

    layer.set_fill_color(rgb(255, 255, 255));
    text_at(layer, "Catering Checklist", 16.0, MARGIN, 13.0, &fonts.bold);

    layer.set_fill_color(rgb(0, 0, 0));
    let column_width = A4_WIDTH_MM / 3.0;
    let detail = |label: &str, value: &str, x: f32, y: f32| {
        text_at(layer, label, 10.0, x, y, &fonts.regular);
        text_at(layer, value, 10.0, x, y + 5.0, &fonts.bold);
    };

    detail("Date:", &order.order_date.to_string(), MARGIN, DETAILS_START_Y);
    detail(
        "Time:",
        &order.order_time,
        MARGIN + column_width,
        DETAILS_START_Y,
    );
    detail(
        "Client:",
        &order.client_name,
        MARGIN + 2.0 * column_width,
        DETAILS_START_Y,
    );

    detail(
        "Location:",
        &order.order_location,
        MARGIN,
        DETAILS_START_Y + 15.0,
    );
    detail(
        "Occasion:",
        &order.order_occasion,
        MARGIN + column_width,
        DETAILS_START_Y + 15.0,
    );
    detail(
        "No. of People:",
        &order.people_count.to_string(),
        MARGIN + 2.0 * column_width,
        DETAILS_START_Y + 15.0,
    );

    let footer = format!("Page {} of {}", page_no, page_count);
    let footer_x = A4_WIDTH_MM - MARGIN - text_width_mm(&footer, 8.0);
    text_at(layer, &footer, 8.0, footer_x, 287.0, &fonts.regular);
}

fn draw_table(
    layer: &printpdf::PdfLayerReference,
    fonts: &PdfFonts,
    rows: &[crate::services::checklist::ChecklistEntry],
) {
    let table_width = A4_WIDTH_MM - 2.0 * MARGIN;

    fill_rect(layer, MARGIN, TABLE_START_Y, table_width, ROW_HEIGHT, rgb(52, 152, 219));
    layer.set_fill_color(rgb(255, 255, 255));
    text_at(layer, "Item", 9.0, MARGIN + 2.0, TABLE_START_Y + 5.5, &fonts.bold);
    text_at(layer, "Count", 9.0, COUNT_COL_X, TABLE_START_Y + 5.5, &fonts.bold);
    text_at(layer, "Packed", 9.0, CHECKBOX_COL_X, TABLE_START_Y + 5.5, &fonts.bold);

    layer.set_fill_color(rgb(0, 0, 0));
    for (i, entry) in rows.iter().enumerate() {
        let row_top = TABLE_START_Y + ROW_HEIGHT * (i + 1) as f32;
        if i % 2 == 0 {
            fill_rect(layer, MARGIN, row_top, table_width, ROW_HEIGHT, rgb(240, 240, 240));
            layer.set_fill_color(rgb(0, 0, 0));
        }

        text_at(layer, &entry.name, 9.0, MARGIN + 2.0, row_top + 5.5, &fonts.regular);
        let count = entry
            .count
            .map(|c| c.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        text_at(layer, &count, 9.0, COUNT_COL_X, row_top + 5.5, &fonts.regular);

        let dim = ROW_HEIGHT - 3.0;
        stroke_rect(layer, CHECKBOX_COL_X + 2.0, row_top + 1.5, dim, dim);
    }
}
