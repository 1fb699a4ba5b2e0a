//! # PDF Rendering
//!
//! Turns an [`InvoiceDocument`] into PDF bytes with `lopdf`.
//!
//! ## Object Graph
//! ```text
//! Trailer ─► Catalog ─► Pages ─┬─► Page 1 ─► Content stream (BT Tf Td Tj ET ...)
//!            Info               ├─► Page 2 ─► Content stream
//!                               │   ...
//!                               └─ Resources: F1 = Courier, F2 = Courier-Bold
//!                                  MediaBox:  [0 0 width height]
//! ```
//!
//! The base-14 Courier fonts need no embedding. Text is written as
//! WinAnsi bytes; characters outside Latin-1 print as `?`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::error::InvoiceResult;
use crate::layout::{InvoiceDocument, TextLine};

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Renders every page of `document`; nothing touches the file system.
pub fn render_pdf(document: &InvoiceDocument) -> InvoiceResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let content: Content<Vec<Operation>> = Content {
            operations: page.lines.iter().flat_map(text_operations).collect(),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => document.pages.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(document.page_width),
            Object::Integer(document.page_height),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_text(&document.title)),
        "Producer" => Object::string_literal("pahana-invoice"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn text_operations(line: &TextLine) -> Vec<Operation> {
    let font = if line.bold { BOLD_FONT } else { REGULAR_FONT };
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), line.size.into()]),
        Operation::new("Td", vec![line.x.into(), line.y.into()]),
        Operation::new("Tj", vec![Object::string_literal(encode_text(&line.text))]),
        Operation::new("ET", vec![]),
    ]
}

/// Latin-1 bytes for WinAnsiEncoding; anything else becomes `?`.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout_invoice, InvoiceLayout};
    use crate::test_support::{order_of, order_with, reference_order};
    use pahana_core::{Money, ShippingTier, MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};
    use proptest::prelude::*;

    /// Text of every `Tj` operand, per page.
    fn extract_text(bytes: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let data = doc.get_page_content(page_id).unwrap();
                let content = Content::decode(&data).unwrap();
                content
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| match op.operands.first() {
                        Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_pdf_contains_grand_total() {
        let document = layout_invoice(&reference_order(), &InvoiceLayout::default(), "Rs.").unwrap();
        let bytes = render_pdf(&document).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let pages = extract_text(&bytes);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].iter().any(|t| t.contains("Grand Total:") && t.ends_with("Rs.375.70")));
        assert!(pages[0].iter().any(|t| t == "Thank you for your purchase!"));
    }

    #[test]
    fn test_pdf_page_count_matches_layout() {
        let document = layout_invoice(&order_with(120, "Poems"), &InvoiceLayout::default(), "Rs.").unwrap();
        let pages = extract_text(&render_pdf(&document).unwrap());
        assert_eq!(pages.len(), document.page_count());

        let n = pages.len();
        for (i, texts) in pages.iter().enumerate() {
            assert_eq!(texts.last().unwrap(), &format!("Page {} of {}", i + 1, n));
        }
    }

    /// Amount printed on the `Grand Total:` row, read back as money.
    fn printed_grand_total(pages: &[Vec<String>], currency: &str) -> Option<Money> {
        let row = pages.iter().flatten().find(|t| t.contains("Grand Total:"))?;
        let amount = row.split_whitespace().last()?.strip_prefix(currency)?;
        Money::parse_decimal(amount).ok()
    }

    #[test]
    fn test_printed_grand_total_reads_back() {
        let order = reference_order();
        let document = layout_invoice(&order, &InvoiceLayout::default(), "Rs.").unwrap();
        let pages = extract_text(&render_pdf(&document).unwrap());
        assert_eq!(printed_grand_total(&pages, "Rs."), Some(Money::from_cents(37_570)));
    }

    fn tier_strategy() -> impl Strategy<Value = ShippingTier> {
        prop_oneof![
            Just(ShippingTier::Standard),
            Just(ShippingTier::Express),
            Just(ShippingTier::Overnight),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn rendered_grand_total_matches_order(
            lines in prop::collection::vec((0i64..=MAX_PRICE_CENTS, 1i64..=MAX_ITEM_QUANTITY), 1..40),
            tier in tier_strategy(),
        ) {
            let order = order_of(&lines, tier);
            let document = layout_invoice(&order, &InvoiceLayout::default(), "Rs.").unwrap();
            let pages = extract_text(&render_pdf(&document).unwrap());

            prop_assert_eq!(
                printed_grand_total(&pages, "Rs."),
                Some(order.totals.grand_total_display())
            );
        }
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(encode_text("Rs.10"), b"Rs.10".to_vec());
        assert_eq!(encode_text("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_text("මහා"), b"???".to_vec());
    }
}
