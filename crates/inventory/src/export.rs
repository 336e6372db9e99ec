//! CSV export of the item list.
//!
//! Presentation-adjacent, but the format is part of the console's contract:
//! every field quoted, comma-separated, embedded quotes doubled.

use crate::item::StockItem;

const HEADER: &[&str] = &["name", "sku", "price", "quantity", "buffer", "description"];

/// Render the item list as CSV (with a header row), newline-terminated.
#[must_use]
pub fn items_to_csv(items: &[StockItem]) -> String {
    let mut out = String::new();
    push_row(&mut out, HEADER.iter().map(|s| (*s).to_string()));
    for item in items {
        push_row(
            &mut out,
            [
                item.name.clone(),
                item.sku.to_string(),
                item.price.to_string(),
                item.quantity.to_string(),
                item.buffer.to_string(),
                item.description.clone(),
            ]
            .into_iter(),
        );
    }
    out
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let row: Vec<String> = fields.map(|f| quote(&f)).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use backstock_core::{ItemId, Price, Sku};
    use rust_decimal::dec;

    fn item(name: &str, description: &str) -> StockItem {
        StockItem {
            id: ItemId::new("item-1"),
            name: name.to_string(),
            sku: Sku::parse("WIDGET-001").unwrap(),
            price: Price::new(dec!(19.99)).unwrap(),
            quantity: 10,
            buffer: 2,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_header_row() {
        let csv = items_to_csv(&[]);
        assert_eq!(
            csv,
            "\"name\",\"sku\",\"price\",\"quantity\",\"buffer\",\"description\"\n"
        );
    }

    #[test]
    fn test_all_fields_quoted() {
        let csv = items_to_csv(&[item("Widget", "plain")]);
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "\"Widget\",\"WIDGET-001\",\"19.99\",\"10\",\"2\",\"plain\""
        );
    }

    #[test]
    fn test_embedded_quotes_doubled() {
        let csv = items_to_csv(&[item("The \"Big\" Widget", "has, commas")]);
        let line = csv.lines().nth(1).unwrap();
        assert!(line.starts_with("\"The \"\"Big\"\" Widget\","));
        assert!(line.ends_with("\"has, commas\""));
    }

    #[test]
    fn test_one_line_per_item() {
        let csv = items_to_csv(&[item("A", ""), item("B", "")]);
        assert_eq!(csv.lines().count(), 3);
    }
}
