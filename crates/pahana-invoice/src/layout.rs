//! # Invoice Layout
//!
//! Places every piece of text of an invoice on a page before any PDF object
//! exists. The renderer only draws what this module decided.
//!
//! ## Page Anatomy
//! ```text
//! ┌──────────────────────────────────────────┐  ▲ margin_top
//! │            BOOKSTORE INVOICE             │
//! │ Order ID: ORD-1F3A9C0B                   │
//! │ Order Date: 2026-10-19                   │
//! │                                          │
//! │ Customer Information:                    │
//! │ Name: ...   Email: ...   Address: ...    │  long values wrap under
//! │                                          │  their label
//! │ Order Items:                             │
//! │ Item                  Qty   Price  Total │  header repeats on every
//! │ ---------------------------------------- │  page the table spans
//! │ A very long title     2  Rs.10.00  ...   │
//! │   that wraps                             │  rows never split across
//! │ ...                                      │  pages when they fit on one
//! │ ---------------------------------------- │
//! │                   Subtotal:   Rs.25.50   │  totals + thank-you line
//! │                   Grand Total: Rs.375.70 │  kept on one page
//! │       Thank you for your purchase!       │
//! │                                          │  ▼ margin_bottom
//! │               Page 1 of 1                │  footer
//! └──────────────────────────────────────────┘
//! ```
//!
//! Text is set in Courier, where every glyph is 0.6 em wide, so widths are
//! character counts and wrapping is exact.

use pahana_core::{Money, Order};

use crate::error::{InvoiceError, InvoiceResult};

/// Advance width of every Courier glyph, in em.
pub const COURIER_CHAR_WIDTH: f32 = 0.6;

const QTY_WIDTH: usize = 5;
const PRICE_WIDTH: usize = 15;
/// Fits the largest grand total a valid cart can reach (`Rs.` + 13 digits + cents).
const TOTAL_WIDTH: usize = 19;
const MIN_TITLE_WIDTH: usize = 10;

// =============================================================================
// Layout Parameters
// =============================================================================

/// Page geometry and type sizes, in PDF points (1/72 inch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceLayout {
    pub page_width: i64,
    pub page_height: i64,
    pub margin_left: i64,
    pub margin_right: i64,
    pub margin_top: i64,
    pub margin_bottom: i64,
    pub title_size: i64,
    pub heading_size: i64,
    pub body_size: i64,
    pub footer_size: i64,
    /// Upper bound on pages; larger orders fail instead of producing
    /// an unbounded document.
    pub max_pages: usize,
    /// Heading printed at the top of the first page.
    pub title: String,
}

impl Default for InvoiceLayout {
    /// A4 portrait.
    fn default() -> Self {
        InvoiceLayout {
            page_width: 595,
            page_height: 842,
            margin_left: 50,
            margin_right: 50,
            margin_top: 60,
            margin_bottom: 60,
            title_size: 18,
            heading_size: 12,
            body_size: 10,
            footer_size: 9,
            max_pages: 200,
            title: "BOOKSTORE INVOICE".to_string(),
        }
    }
}

impl InvoiceLayout {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Baseline-to-baseline distance for a font size.
    pub fn line_height(&self, size: i64) -> i64 {
        size + (size * 2 + 4) / 5
    }

    /// How many Courier characters of `size` fit between the margins.
    pub fn chars_per_line(&self, size: i64) -> usize {
        let usable = (self.page_width - self.margin_left - self.margin_right).max(0) as f32;
        let glyph = size.max(1) as f32 * COURIER_CHAR_WIDTH;
        ((usable / glyph).floor() as usize).max(1)
    }

    /// Width in points of `chars` characters at `size`.
    pub fn text_width(&self, chars: usize, size: i64) -> f32 {
        chars as f32 * size as f32 * COURIER_CHAR_WIDTH
    }

    fn columns(&self) -> InvoiceResult<Columns> {
        if self.max_pages == 0 {
            return Err(InvoiceError::InvalidLayout("max_pages must be at least 1".to_string()));
        }
        let line = self.chars_per_line(self.body_size);
        let fixed = QTY_WIDTH + PRICE_WIDTH + TOTAL_WIDTH + 3;
        if line < fixed + MIN_TITLE_WIDTH {
            return Err(InvoiceError::InvalidLayout(format!(
                "page fits {line} characters per line, need {}",
                fixed + MIN_TITLE_WIDTH
            )));
        }
        let printable = self.page_height - self.margin_top - self.margin_bottom;
        if printable < self.line_height(self.title_size) + 10 * self.line_height(self.body_size) {
            return Err(InvoiceError::InvalidLayout(
                "page is too short for the item table".to_string(),
            ));
        }
        Ok(Columns {
            line,
            title: line - fixed,
        })
    }
}

// =============================================================================
// Laid-out Document
// =============================================================================

/// One run of text with its baseline origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub x: i64,
    pub y: i64,
    pub size: i64,
    pub bold: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePage {
    /// 1-based.
    pub number: usize,
    pub lines: Vec<TextLine>,
}

/// A fully paginated invoice, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDocument {
    pub title: String,
    pub page_width: i64,
    pub page_height: i64,
    pub pages: Vec<InvoicePage>,
}

impl InvoiceDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every text run, page by page, top to bottom.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|page| page.lines.iter().map(|line| line.text.as_str()))
    }
}

// =============================================================================
// Text Wrapping
// =============================================================================

/// Greedy word wrap to at most `width` characters per line.
///
/// Words longer than `width` are split across lines. Nothing is dropped:
/// the non-whitespace characters of the output equal those of the input.
/// Empty or blank input yields a single empty line.
///
/// ```rust
/// use pahana_invoice::wrap_text;
///
/// assert_eq!(wrap_text("The Lord of the Rings", 10), vec!["The Lord", "of the", "Rings"]);
/// assert_eq!(wrap_text("", 10), vec![""]);
/// ```
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        if chars.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            while chars.len() > width {
                let rest = chars.split_off(width);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }
        }

        let needed = if current_len == 0 {
            chars.len()
        } else {
            current_len + 1 + chars.len()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars.iter());
        current_len += chars.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

// =============================================================================
// Item Table Columns
// =============================================================================

struct Columns {
    line: usize,
    title: usize,
}

impl Columns {
    fn row(&self, title: &str, qty: &str, price: &str, total: &str) -> String {
        format!(
            "{:<tw$} {:>qw$} {:>pw$} {:>lw$}",
            title,
            qty,
            price,
            total,
            tw = self.title,
            qw = QTY_WIDTH,
            pw = PRICE_WIDTH,
            lw = TOTAL_WIDTH,
        )
    }

    fn header(&self) -> String {
        self.row("Item", "Qty", "Price", "Total")
    }

    fn rule(&self) -> String {
        "-".repeat(self.line)
    }

    /// Label right-aligned against the total column.
    fn summary(&self, label: &str, amount: &str) -> String {
        format!(
            "{:>w$} {:>lw$}",
            label,
            amount,
            w = self.line - TOTAL_WIDTH - 1,
            lw = TOTAL_WIDTH,
        )
    }
}

// =============================================================================
// Page Builder
// =============================================================================

struct PageBuilder<'a> {
    layout: &'a InvoiceLayout,
    pages: Vec<Vec<TextLine>>,
    y: i64,
}

impl<'a> PageBuilder<'a> {
    fn new(layout: &'a InvoiceLayout) -> Self {
        PageBuilder {
            layout,
            pages: vec![Vec::new()],
            y: layout.page_height - layout.margin_top,
        }
    }

    fn top(&self) -> i64 {
        self.layout.page_height - self.layout.margin_top
    }

    fn bottom(&self) -> i64 {
        self.layout.margin_bottom
    }

    fn remaining(&self) -> i64 {
        self.y - self.bottom()
    }

    fn capacity(&self) -> i64 {
        self.top() - self.bottom()
    }

    fn new_page(&mut self) -> InvoiceResult<()> {
        if self.pages.len() >= self.layout.max_pages {
            return Err(InvoiceError::TooManyPages {
                max: self.layout.max_pages,
            });
        }
        self.pages.push(Vec::new());
        self.y = self.top();
        Ok(())
    }

    fn place(&mut self, x: i64, text: String, size: i64, bold: bool) -> InvoiceResult<()> {
        let height = self.layout.line_height(size);
        if self.remaining() < height {
            self.new_page()?;
        }
        self.y -= height;
        let y = self.y;
        if let Some(page) = self.pages.last_mut() {
            page.push(TextLine {
                x,
                y,
                size,
                bold,
                text,
            });
        }
        Ok(())
    }

    fn line(&mut self, text: &str, size: i64, bold: bool) -> InvoiceResult<()> {
        self.place(self.layout.margin_left, text.to_string(), size, bold)
    }

    fn centered(&mut self, text: &str, size: i64, bold: bool) -> InvoiceResult<()> {
        for piece in wrap_text(text, self.layout.chars_per_line(size)) {
            let x = centered_x(self.layout, piece.chars().count(), size);
            self.place(x, piece, size, bold)?;
        }
        Ok(())
    }

    /// `label` followed by `value`, with continuation lines indented to the
    /// value's column.
    fn labelled(&mut self, label: &str, value: &str) -> InvoiceResult<()> {
        let size = self.layout.body_size;
        let indent = label.chars().count();
        let width = self
            .layout
            .chars_per_line(size)
            .saturating_sub(indent)
            .max(MIN_TITLE_WIDTH);
        for (i, piece) in wrap_text(value, width).into_iter().enumerate() {
            let text = if i == 0 {
                format!("{label}{piece}")
            } else {
                format!("{}{piece}", " ".repeat(indent))
            };
            self.line(&text, size, false)?;
        }
        Ok(())
    }

    /// Vertical space of one line; swallowed at a page end.
    fn gap(&mut self, size: i64) {
        self.y = (self.y - self.layout.line_height(size)).max(self.bottom());
    }

    /// Starts a new page unless `height` fits in what is left. Blocks taller
    /// than a whole page just flow.
    fn keep_together(&mut self, height: i64) -> InvoiceResult<()> {
        if self.remaining() < height && height <= self.capacity() {
            self.new_page()?;
        }
        Ok(())
    }

    fn finish(self) -> Vec<Vec<TextLine>> {
        self.pages
    }
}

fn centered_x(layout: &InvoiceLayout, chars: usize, size: i64) -> i64 {
    let free = layout.page_width as f32 - layout.text_width(chars, size);
    ((free / 2.0).round() as i64).max(layout.margin_left)
}

// =============================================================================
// Invoice Layout
// =============================================================================

/// Lays out the invoice for `order`, formatting amounts with `currency`
/// (e.g. `"Rs."`).
pub fn layout_invoice(
    order: &Order,
    layout: &InvoiceLayout,
    currency: &str,
) -> InvoiceResult<InvoiceDocument> {
    let columns = layout.columns()?;
    let body = layout.body_size;
    let body_height = layout.line_height(body);
    let mut pages = PageBuilder::new(layout);

    // Header
    pages.centered(&layout.title, layout.title_size, true)?;
    pages.gap(body);
    pages.line(&format!("Order ID: {}", order.id), body, false)?;
    pages.line(
        &format!("Order Date: {}", order.date.format("%Y-%m-%d")),
        body,
        false,
    )?;
    pages.gap(body);

    // Customer block
    let shipping = &order.shipping;
    pages.line("Customer Information:", layout.heading_size, true)?;
    pages.labelled("Name: ", &shipping.name)?;
    pages.labelled("Email: ", &shipping.email)?;
    pages.labelled("Phone: ", &shipping.phone)?;
    pages.labelled("Address: ", &shipping.address)?;
    pages.labelled("Shipping Method: ", shipping.shipping_method.label())?;
    let payment = match &order.card_last_four {
        Some(last_four) => format!("{} (card ending {last_four})", shipping.payment_method.label()),
        None => shipping.payment_method.label().to_string(),
    };
    pages.labelled("Payment Method: ", &payment)?;
    pages.gap(body);

    // Item table
    let header = columns.header();
    let rule = columns.rule();
    let header_height = 2 * body_height;

    pages.keep_together(layout.line_height(layout.heading_size) + header_height + body_height)?;
    pages.line("Order Items:", layout.heading_size, true)?;
    pages.line(&header, body, true)?;
    pages.line(&rule, body, false)?;

    for item in &order.items {
        let title_lines = wrap_text(&item.title, columns.title);
        let row_height = body_height * title_lines.len() as i64;

        if pages.remaining() < row_height && row_height + header_height <= pages.capacity() {
            pages.new_page()?;
            pages.line(&header, body, true)?;
            pages.line(&rule, body, false)?;
        }

        let qty = item.quantity.to_string();
        let price = item.unit_price.format_with(currency);
        let total = item.line_total().format_with(currency);
        for (i, piece) in title_lines.iter().enumerate() {
            if i == 0 {
                pages.line(&columns.row(piece, &qty, &price, &total), body, false)?;
            } else {
                pages.line(piece, body, false)?;
            }
        }
    }

    // Totals block and thank-you line, kept on one page
    let totals = &order.totals;
    let tax_label = format!("Tax ({}%):", order.tax_rate.percentage());
    let summary: [(&str, Money); 3] = [
        ("Subtotal:", totals.subtotal),
        ("Shipping:", totals.shipping_cost),
        (tax_label.as_str(), totals.tax_display()),
    ];
    let block_height = body_height * (summary.len() as i64 + 2)
        + 2 * body_height
        + layout.line_height(body);
    pages.keep_together(block_height)?;

    pages.line(&rule, body, false)?;
    for (label, amount) in summary {
        pages.line(&columns.summary(label, &amount.format_with(currency)), body, false)?;
    }
    pages.line(
        &columns.summary(
            "Grand Total:",
            &totals.grand_total_display().format_with(currency),
        ),
        body,
        true,
    )?;
    pages.gap(body);
    pages.centered("Thank you for your purchase!", body, false)?;

    // Footers
    let raw_pages = pages.finish();
    let count = raw_pages.len();
    let footer_y = layout.margin_bottom / 2;
    let pages = raw_pages
        .into_iter()
        .enumerate()
        .map(|(i, mut lines)| {
            let text = format!("Page {} of {}", i + 1, count);
            lines.push(TextLine {
                x: centered_x(layout, text.chars().count(), layout.footer_size),
                y: footer_y,
                size: layout.footer_size,
                bold: false,
                text,
            });
            InvoicePage {
                number: i + 1,
                lines,
            }
        })
        .collect();

    Ok(InvoiceDocument {
        title: format!("Invoice {}", order.id),
        page_width: layout.page_width,
        page_height: layout.page_height,
        pages,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{order_with, reference_order};
    use proptest::prelude::*;

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(wrap_text("   ", 10), vec![""]);
        assert_eq!(wrap_text("Dune", 10), vec!["Dune"]);
        assert_eq!(wrap_text("War and Peace", 7), vec!["War and", "Peace"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a abcdefgh b", 4), vec!["a", "abcd", "efgh", "b"]);
    }

    #[test]
    fn test_reference_invoice_fits_one_page() {
        let document = layout_invoice(&reference_order(), &InvoiceLayout::default(), "Rs.").unwrap();
        assert_eq!(document.page_count(), 1);

        let texts: Vec<&str> = document.texts().collect();
        assert!(texts.contains(&"BOOKSTORE INVOICE"));
        assert!(texts.contains(&"Page 1 of 1"));
        assert!(texts.iter().any(|t| t.starts_with("Order ID: ORD-")));
        assert!(texts.iter().any(|t| t.contains("Grand Total:") && t.ends_with("Rs.375.70")));
        assert!(texts.iter().any(|t| t.contains("Subtotal:") && t.ends_with("Rs.25.50")));
        assert!(texts.iter().any(|t| t.contains("Tax (0.8%):") && t.ends_with("Rs.0.20")));
        assert!(texts.iter().any(|t| t.contains("Shipping:") && t.ends_with("Rs.350.00")));
        assert_eq!(texts.last(), Some(&"Page 1 of 1"));
    }

    #[test]
    fn test_lines_stay_inside_the_page() {
        let layout = InvoiceLayout::default();
        let document = layout_invoice(&order_with(150, "A Title"), &layout, "Rs.").unwrap();
        for page in &document.pages {
            for line in &page.lines {
                let right = line.x as f32 + layout.text_width(line.text.chars().count(), line.size);
                assert!(right <= (layout.page_width - layout.margin_right) as f32 + 0.5, "{line:?}");
                assert!(line.y > 0 && line.y < layout.page_height);
            }
        }
    }

    #[test]
    fn test_many_items_paginate_with_footers() {
        let order = order_with(150, "Collected Stories");
        let document = layout_invoice(&order, &InvoiceLayout::default(), "Rs.").unwrap();
        let n = document.page_count();
        assert!(n > 1);

        for page in &document.pages {
            let footer = &page.lines.last().unwrap().text;
            assert_eq!(footer, &format!("Page {} of {}", page.number, n));
            // table header repeated on every page that holds rows
            if page.lines.iter().any(|l| l.text.starts_with("Collected Stories")) {
                assert!(page.lines.iter().any(|l| l.text.starts_with("Item ")));
            }
        }

        let rows = document
            .texts()
            .filter(|t| t.starts_with("Collected Stories"))
            .count();
        assert_eq!(rows, order.items.len());
    }

    #[test]
    fn test_totals_block_is_kept_together() {
        for count in [20, 35, 36, 37, 38, 39, 40, 41, 45, 80] {
            let document =
                layout_invoice(&order_with(count, "T"), &InvoiceLayout::default(), "Rs.").unwrap();
            let page_of = |needle: &str| {
                document
                    .pages
                    .iter()
                    .position(|p| p.lines.iter().any(|l| l.text.contains(needle)))
                    .unwrap()
            };
            let subtotal = page_of("Subtotal:");
            assert_eq!(subtotal, page_of("Grand Total:"), "count {count}");
            assert_eq!(subtotal, page_of("Thank you for your purchase!"), "count {count}");
        }
    }

    #[test]
    fn test_long_title_is_wrapped_not_truncated() {
        let title = "An Extremely Long Title ".repeat(12);
        let order = order_with(1, title.trim());
        let document = layout_invoice(&order, &InvoiceLayout::default(), "Rs.").unwrap();

        let start = document
            .texts()
            .position(|t| t.starts_with("An Extremely"))
            .unwrap();
        let pieces: Vec<&str> = document.texts().skip(start).take_while(|t| !t.starts_with("---")).collect();
        assert!(pieces.len() > 1);

        let first_title: String = pieces[0].chars().take(pieces[0].len() - 42).collect();
        let mut rebuilt = vec![first_title.trim().to_string()];
        rebuilt.extend(pieces[1..].iter().map(|p| p.trim().to_string()));
        assert_eq!(rebuilt.join(" "), title.trim());
    }

    #[test]
    fn test_page_limit() {
        let layout = InvoiceLayout::default().with_max_pages(2);
        let err = layout_invoice(&order_with(100, "T"), &layout, "Rs.").unwrap_err();
        assert!(matches!(err, InvoiceError::TooManyPages { max: 2 }));
    }

    #[test]
    fn test_invalid_layout() {
        let layout = InvoiceLayout {
            page_width: 200,
            ..InvoiceLayout::default()
        };
        assert!(matches!(
            layout_invoice(&reference_order(), &layout, "Rs."),
            Err(InvoiceError::InvalidLayout(_))
        ));
    }

    proptest! {
        #[test]
        fn wrap_never_exceeds_width_or_drops_text(text in "[a-zA-Z ]{0,200}", width in 1usize..60) {
            let lines = wrap_text(&text, width);
            prop_assert!(!lines.is_empty());
            for line in &lines {
                prop_assert!(line.chars().count() <= width);
            }
            let expected: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            let wrapped: String = lines.concat().chars().filter(|c| !c.is_whitespace()).collect();
            prop_assert_eq!(expected, wrapped);
        }
    }
}
