//! Invoice export. Order info block, menu line items, and the total
//! billed as headcount times the per-plate rate, inside a page border.

use chrono::Utc;
use printpdf::{Mm, PdfDocument};

use super::{fill_rect, rgb, stroke_rect, text_at, text_width_mm, PdfFonts, A4_WIDTH_MM};
use crate::errors::ServiceError;
use crate::services::orders::OrderResponse;

const MARGIN: f32 = 14.0;
const BORDER_INSET: f32 = 10.0;
const TABLE_START_Y: f32 = 80.0;
const ROW_HEIGHT: f32 = 8.0;
const TABLE_BOTTOM: f32 = 260.0;

pub fn render_invoice_pdf(
    order: &OrderResponse,
    per_plate_cost: f64,
) -> Result<Vec<u8>, ServiceError> {
    let (doc, page, layer) = PdfDocument::new("Invoice", Mm(210.0), Mm(297.0), "Layer 1");
    let fonts = super::load_fonts(&doc)?;
    let layer_ref = doc.get_page(page).get_layer(layer);

    layer_ref.set_fill_color(rgb(0, 0, 0));
    text_at(&layer_ref, "Invoice", 24.0, MARGIN, 22.0, &fonts.bold);

    let info = [
        format!("Number of People: {}", order.people_count),
        format!("Order Location: {}", order.order_location),
        format!("Client Name: {}", order.client_name),
        format!("Per Plate Cost: ${:.2}", per_plate_cost),
        format!("Event Date: {}", order.order_date),
        format!("Bill Date: {}", Utc::now().date_naive()),
    ];
    for (i, line) in info.iter().enumerate() {
        text_at(
            &layer_ref,
            line,
            12.0,
            MARGIN,
            40.0 + 6.0 * i as f32,
            &fonts.regular,
        );
    }

    let mut y = draw_items_table(&layer_ref, &fonts, order);

    let total = order.people_count as f64 * per_plate_cost;
    let total_line = format!("Total: ${:.2}", total);
    text_at(&layer_ref, &total_line, 12.0, 140.0, y + 10.0, &fonts.bold);
    y += 30.0;

    text_at(
        &layer_ref,
        "Thank you for choosing our catering service!",
        10.0,
        MARGIN,
        y,
        &fonts.regular,
    );

    stroke_rect(
        &layer_ref,
        BORDER_INSET,
        BORDER_INSET,
        A4_WIDTH_MM - 2.0 * BORDER_INSET,
        297.0 - 2.0 * BORDER_INSET,
    );

    super::finish_document(doc)
}

/// Draws the menu table and returns the y position below its last row.
fn draw_items_table(
    layer: &printpdf::PdfLayerReference,
    fonts: &PdfFonts,
    order: &OrderResponse,
) -> f32 {
    let table_width = A4_WIDTH_MM - 2.0 * MARGIN;
    let number_col_x = MARGIN + 2.0;
    let name_col_x = MARGIN + 20.0;

    fill_rect(layer, MARGIN, TABLE_START_Y, table_width, ROW_HEIGHT, rgb(52, 152, 219));
    layer.set_fill_color(rgb(255, 255, 255));
    text_at(layer, "#", 10.0, number_col_x, TABLE_START_Y + 5.5, &fonts.bold);
    text_at(layer, "Menu Item", 10.0, name_col_x, TABLE_START_Y + 5.5, &fonts.bold);

    layer.set_fill_color(rgb(0, 0, 0));
    let mut y = TABLE_START_Y;
    for (i, item) in order.items.iter().enumerate() {
        y = TABLE_START_Y + ROW_HEIGHT * (i + 1) as f32;
        if y > TABLE_BOTTOM {
            let note = format!("... and {} more items", order.items.len() - i);
            text_at(layer, &note, 9.0, name_col_x, y + 5.5, &fonts.regular);
            break;
        }

        text_at(
            layer,
            &(i + 1).to_string(),
            10.0,
            number_col_x,
            y + 5.5,
            &fonts.regular,
        );
        let name = truncate_to_width(&item.food_item_name, 10.0, table_width - 25.0);
        text_at(layer, &name, 10.0, name_col_x, y + 5.5, &fonts.regular);
    }

    y + ROW_HEIGHT
}

fn truncate_to_width(text: &str, size_pt: f32, max_mm: f32) -> String {
    if text_width_mm(text, size_pt) <= max_mm {
        return text.to_string();
    }
    let mut out: String = text.chars().take_while({
        let mut width = 0.0;
        move |c| {
            width += text_width_mm(&c.to_string(), size_pt);
            width <= max_mm - 5.0
        }
    }).collect();
    out.push_str("...");
    out
}
