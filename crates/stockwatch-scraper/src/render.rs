//! Payload renderer for the notification body.

use stockwatch_core::PayloadFormat;

use crate::types::StockSnapshot;

struct Layout {
    line_break: &'static str,
    separator: &'static str,
}

impl From<PayloadFormat> for Layout {
    fn from(format: PayloadFormat) -> Self {
        match format {
            PayloadFormat::Html => Layout {
                line_break: "<br>",
                separator: "<br>---<br><br>",
            },
            PayloadFormat::Text => Layout {
                line_break: "\n",
                separator: "\n---\n\n",
            },
        }
    }
}

/// Render a snapshot as a notification body.
///
/// Each product contributes its title line followed by one line per store.
/// Products are separated by a rule; nothing follows the last one.
#[must_use]
pub fn render_payload(snapshot: &StockSnapshot, format: PayloadFormat) -> String {
    let layout = Layout::from(format);
    let mut body = String::new();

    for (i, product) in snapshot.products().iter().enumerate() {
        if i > 0 {
            body.push_str(layout.separator);
        }
        body.push_str(&product.product_title);
        body.push_str(layout.line_break);
        for store in &product.store_data {
            let status = if store.in_stock {
                "In stock"
            } else {
                "Out of stock"
            };
            body.push_str("- ");
            body.push_str(&store.name);
            body.push_str(": ");
            body.push_str(status);
            body.push_str(layout.line_break);
        }
    }

    body
}
