//! Report and Invoice Export
//!
//! Two byte-stream serializations of the aggregated ledger: a tabular CSV
//! with the fixed columns (Type, Date, Category, Description, Amount) and a
//! paginated PDF document with a summary header. Also renders the
//! single-invoice document produced by the send action.

use crate::db::models::Invoice;
use chrono::{DateTime, NaiveDate, Utc};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};
use shared::models::{ActivityEntry, Report};
use shared::{AppError, AppResult, ErrorCode};
use std::fmt::Display;
use std::io::BufWriter;

/// Fixed spreadsheet columns; the header row is always written
pub const SPREADSHEET_HEADER: [&str; 5] = ["Type", "Date", "Category", "Description", "Amount"];

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 15.0;
const MARGIN_RIGHT: f32 = 195.0;
const TOP_Y: f32 = 282.0;
const BOTTOM_Y: f32 = 20.0;

/// Export metadata printed under the document title
#[derive(Debug, Clone)]
pub struct DocumentMeta {
    pub title: String,
    /// Human-readable description of the active filter/window
    pub filter_label: String,
    pub generated_at: DateTime<Utc>,
    pub currency_symbol: String,
}

// =============================================================================
// Filenames
// =============================================================================

pub fn report_spreadsheet_filename(entity: &str, date: NaiveDate) -> String {
    format!("{}-report-{}.csv", entity, date.format("%Y-%m-%d"))
}

pub fn report_document_filename(entity: &str, date: NaiveDate) -> String {
    format!("{}-report-{}.pdf", entity, date.format("%Y-%m-%d"))
}

pub fn invoice_document_filename(invoice_number: &str) -> String {
    format!("Invoice-{}.pdf", invoice_number)
}

// =============================================================================
// Spreadsheet (CSV)
// =============================================================================

/// Serialize ledger rows to CSV, one row per entry plus the header
pub fn spreadsheet(rows: &[ActivityEntry]) -> AppResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(SPREADSHEET_HEADER).map_err(export_err)?;
    for row in rows {
        let date = row.date.format("%Y-%m-%d").to_string();
        let amount = format!("{:.2}", row.amount);
        writer
            .write_record([
                row.kind.as_str(),
                date.as_str(),
                row.category.as_str(),
                row.description.as_str(),
                amount.as_str(),
            ])
            .map_err(export_err)?;
    }

    writer.flush().map_err(export_err)?;
    writer.into_inner().map_err(export_err)
}

// =============================================================================
// Currency formatting
// =============================================================================

/// Format an amount with the currency symbol and thousands separators
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let s = format!("{:.2}", amount.abs());
    let (int_part, dec_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    let mut count = 0;
    for i in (0..digits.len()).rev() {
        if count == 3 {
            grouped.push(',');
            count = 0;
        }
        grouped.push(digits[i]);
        count += 1;
    }
    let grouped: String = grouped.chars().rev().collect();

    format!("{}{}{}.{}", sign, symbol, grouped, dec_part)
}

// =============================================================================
// PDF primitives
// =============================================================================

fn push_line(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    font_size: f32,
    x: f32,
    y: f32,
) {
    layer.use_text(text, font_size, Mm(x), Mm(y), font);
}

fn divider(layer: &PdfLayerReference, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN_LEFT), Mm(y)), false),
            (Point::new(Mm(MARGIN_RIGHT), Mm(y)), false),
        ],
        is_closed: false,
    });
}

/// Tracks the write position and starts fresh pages as the table grows
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl<'a> PageCursor<'a> {
    fn new(doc: &'a PdfDocumentReference, layer: PdfLayerReference) -> Self {
        Self {
            doc,
            layer,
            y: TOP_Y,
        }
    }

    fn advance(&mut self, by: f32) {
        self.y -= by;
    }

    /// Start a new page when fewer than `needed` millimeters remain
    fn ensure_room(&mut self, needed: f32) -> bool {
        if self.y - needed >= BOTTOM_Y {
            return false;
        }
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP_Y;
        true
    }
}

fn save_to_bytes(doc: PdfDocumentReference) -> AppResult<Vec<u8>> {
    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer).map_err(export_err)?;
    writer.into_inner().map_err(export_err)
}

fn export_err(e: impl Display) -> AppError {
    AppError::with_message(ErrorCode::Internal, format!("Export failed: {}", e))
}

// =============================================================================
// Report document (PDF)
// =============================================================================

// Ledger table column positions (mm)
const COL_TYPE: f32 = MARGIN_LEFT;
const COL_DATE: f32 = 38.0;
const COL_CATEGORY: f32 = 64.0;
const COL_DESCRIPTION: f32 = 98.0;
const COL_AMOUNT: f32 = 168.0;

fn ledger_table_header(cursor: &mut PageCursor<'_>, font_bold: &IndirectFontRef) {
    push_line(&cursor.layer, font_bold, "Type", 10.0, COL_TYPE, cursor.y);
    push_line(&cursor.layer, font_bold, "Date", 10.0, COL_DATE, cursor.y);
    push_line(&cursor.layer, font_bold, "Category", 10.0, COL_CATEGORY, cursor.y);
    push_line(&cursor.layer, font_bold, "Description", 10.0, COL_DESCRIPTION, cursor.y);
    push_line(&cursor.layer, font_bold, "Amount", 10.0, COL_AMOUNT, cursor.y);
    cursor.advance(3.5);
    divider(&cursor.layer, cursor.y);
    cursor.advance(6.0);
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", head)
}

/// Render the paginated report document
///
/// Fixed layout: title, generation metadata, the three-line summary, then
/// the ledger table mirroring the spreadsheet columns. An empty row set
/// yields a valid document with an empty table body.
pub fn document(report: &Report, rows: &[ActivityEntry], meta: &DocumentMeta) -> AppResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        meta.title.clone(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(export_err)?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(export_err)?;

    let mut cursor = PageCursor::new(&doc, doc.get_page(page).get_layer(layer));

    // Title and generation metadata
    push_line(&cursor.layer, &font_bold, &meta.title, 18.0, MARGIN_LEFT, cursor.y);
    cursor.advance(8.0);
    push_line(
        &cursor.layer,
        &font,
        &format!("Generated: {}", meta.generated_at.format("%Y-%m-%d %H:%M UTC")),
        9.0,
        MARGIN_LEFT,
        cursor.y,
    );
    cursor.advance(5.0);
    push_line(
        &cursor.layer,
        &font,
        &format!("Filter: {}", meta.filter_label),
        9.0,
        MARGIN_LEFT,
        cursor.y,
    );
    cursor.advance(4.0);
    divider(&cursor.layer, cursor.y);
    cursor.advance(9.0);

    // Three-line summary
    let symbol = meta.currency_symbol.as_str();
    push_line(
        &cursor.layer,
        &font_bold,
        &format!("Income: {}", format_currency(report.total_revenue, symbol)),
        11.0,
        MARGIN_LEFT,
        cursor.y,
    );
    cursor.advance(6.0);
    push_line(
        &cursor.layer,
        &font_bold,
        &format!("Expenses: {}", format_currency(report.total_expenses, symbol)),
        11.0,
        MARGIN_LEFT,
        cursor.y,
    );
    cursor.advance(6.0);
    push_line(
        &cursor.layer,
        &font_bold,
        &format!("Net: {}", format_currency(report.net_profit, symbol)),
        11.0,
        MARGIN_LEFT,
        cursor.y,
    );
    cursor.advance(4.0);
    divider(&cursor.layer, cursor.y);
    cursor.advance(8.0);

    // Ledger table
    ledger_table_header(&mut cursor, &font_bold);
    for row in rows {
        if cursor.ensure_room(6.0) {
            ledger_table_header(&mut cursor, &font_bold);
        }
        push_line(&cursor.layer, &font, row.kind.as_str(), 9.0, COL_TYPE, cursor.y);
        push_line(
            &cursor.layer,
            &font,
            &row.date.format("%Y-%m-%d").to_string(),
            9.0,
            COL_DATE,
            cursor.y,
        );
        push_line(
            &cursor.layer,
            &font,
            &truncate(&row.category, 18),
            9.0,
            COL_CATEGORY,
            cursor.y,
        );
        push_line(
            &cursor.layer,
            &font,
            &truncate(&row.description, 38),
            9.0,
            COL_DESCRIPTION,
            cursor.y,
        );
        push_line(
            &cursor.layer,
            &font,
            &format_currency(row.amount, symbol),
            9.0,
            COL_AMOUNT,
            cursor.y,
        );
        cursor.advance(5.5);
    }

    save_to_bytes(doc)
}

// =============================================================================
// Invoice document (PDF)
// =============================================================================

// Invoice items table column positions (mm)
const COL_ITEM_DESC: f32 = MARGIN_LEFT;
const COL_ITEM_QTY: f32 = 120.0;
const COL_ITEM_RATE: f32 = 140.0;
const COL_ITEM_AMOUNT: f32 = 170.0;

fn item_table_header(cursor: &mut PageCursor<'_>, font_bold: &IndirectFontRef) {
    push_line(&cursor.layer, font_bold, "Description", 10.0, COL_ITEM_DESC, cursor.y);
    push_line(&cursor.layer, font_bold, "Qty", 10.0, COL_ITEM_QTY, cursor.y);
    push_line(&cursor.layer, font_bold, "Rate", 10.0, COL_ITEM_RATE, cursor.y);
    push_line(&cursor.layer, font_bold, "Amount", 10.0, COL_ITEM_AMOUNT, cursor.y);
    cursor.advance(3.5);
    divider(&cursor.layer, cursor.y);
    cursor.advance(6.5);
}

/// Render the printable document for one invoice
pub fn invoice_document(invoice: &Invoice, currency_symbol: &str) -> AppResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Invoice {}", invoice.invoice_number),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(export_err)?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(export_err)?;

    let mut cursor = PageCursor::new(&doc, doc.get_page(page).get_layer(layer));

    // Header
    push_line(&cursor.layer, &font_bold, "INVOICE", 22.0, MARGIN_LEFT, cursor.y);
    push_line(&cursor.layer, &font_bold, &invoice.invoice_number, 12.0, 140.0, cursor.y);
    cursor.advance(6.0);
    push_line(&cursor.layer, &font, invoice.status.as_str(), 10.0, 140.0, cursor.y);
    cursor.advance(4.0);
    divider(&cursor.layer, cursor.y);
    cursor.advance(9.0);

    // Bill-to and dates
    push_line(&cursor.layer, &font_bold, "Bill to:", 11.0, MARGIN_LEFT, cursor.y);
    push_line(
        &cursor.layer,
        &font,
        &format!("Issued: {}", invoice.created_at.format("%Y-%m-%d")),
        10.0,
        120.0,
        cursor.y,
    );
    cursor.advance(5.5);
    push_line(&cursor.layer, &font, &invoice.client_name, 10.0, MARGIN_LEFT, cursor.y);
    push_line(
        &cursor.layer,
        &font,
        &format!("Due: {}", invoice.due_date.format("%Y-%m-%d")),
        10.0,
        120.0,
        cursor.y,
    );
    cursor.advance(5.0);
    push_line(&cursor.layer, &font, &invoice.client_email, 10.0, MARGIN_LEFT, cursor.y);
    cursor.advance(5.0);
    if let Some(phone) = &invoice.client_phone {
        push_line(&cursor.layer, &font, phone, 10.0, MARGIN_LEFT, cursor.y);
        cursor.advance(5.0);
    }
    if let Some(address) = &invoice.client_address {
        push_line(&cursor.layer, &font, address, 10.0, MARGIN_LEFT, cursor.y);
        cursor.advance(5.0);
    }
    cursor.advance(6.0);

    // Items table; bridged invoices have no items and show the notes line
    item_table_header(&mut cursor, &font_bold);
    if invoice.items.is_empty() {
        let description = invoice.notes.as_deref().unwrap_or("Services rendered");
        push_line(
            &cursor.layer,
            &font,
            &truncate(description, 60),
            10.0,
            COL_ITEM_DESC,
            cursor.y,
        );
        push_line(&cursor.layer, &font, "1", 10.0, COL_ITEM_QTY, cursor.y);
        push_line(
            &cursor.layer,
            &font,
            &format_currency(invoice.subtotal, currency_symbol),
            10.0,
            COL_ITEM_RATE,
            cursor.y,
        );
        push_line(
            &cursor.layer,
            &font_bold,
            &format_currency(invoice.subtotal, currency_symbol),
            10.0,
            COL_ITEM_AMOUNT,
            cursor.y,
        );
        cursor.advance(6.0);
    } else {
        for item in &invoice.items {
            if cursor.ensure_room(6.0) {
                item_table_header(&mut cursor, &font_bold);
            }
            push_line(
                &cursor.layer,
                &font,
                &truncate(&item.description, 55),
                10.0,
                COL_ITEM_DESC,
                cursor.y,
            );
            push_line(
                &cursor.layer,
                &font,
                &item.quantity.to_string(),
                10.0,
                COL_ITEM_QTY,
                cursor.y,
            );
            push_line(
                &cursor.layer,
                &font,
                &format_currency(item.unit_rate, currency_symbol),
                10.0,
                COL_ITEM_RATE,
                cursor.y,
            );
            push_line(
                &cursor.layer,
                &font_bold,
                &format_currency(item.amount, currency_symbol),
                10.0,
                COL_ITEM_AMOUNT,
                cursor.y,
            );
            cursor.advance(6.0);
        }
    }
    cursor.advance(2.0);
    divider(&cursor.layer, cursor.y);
    cursor.advance(8.0);

    // Totals
    cursor.ensure_room(30.0);
    push_line(&cursor.layer, &font, "Subtotal:", 11.0, 140.0, cursor.y);
    push_line(
        &cursor.layer,
        &font,
        &format_currency(invoice.subtotal, currency_symbol),
        11.0,
        COL_ITEM_AMOUNT,
        cursor.y,
    );
    cursor.advance(6.0);
    push_line(&cursor.layer, &font, "Tax:", 11.0, 140.0, cursor.y);
    push_line(
        &cursor.layer,
        &font,
        &format_currency(invoice.tax_amount, currency_symbol),
        11.0,
        COL_ITEM_AMOUNT,
        cursor.y,
    );
    cursor.advance(7.0);
    push_line(&cursor.layer, &font_bold, "TOTAL:", 13.0, 140.0, cursor.y);
    push_line(
        &cursor.layer,
        &font_bold,
        &format_currency(invoice.total_amount, currency_symbol),
        13.0,
        COL_ITEM_AMOUNT,
        cursor.y,
    );
    cursor.advance(12.0);

    if !invoice.payment_terms.trim().is_empty() {
        push_line(
            &cursor.layer,
            &font,
            &format!("Payment terms: {}", invoice.payment_terms),
            9.0,
            MARGIN_LEFT,
            cursor.y,
        );
        cursor.advance(5.0);
    }
    if !invoice.items.is_empty()
        && let Some(notes) = &invoice.notes
        && !notes.trim().is_empty()
    {
        push_line(&cursor.layer, &font_bold, "Notes:", 9.0, MARGIN_LEFT, cursor.y);
        cursor.advance(4.5);
        for line in notes.lines().take(8) {
            push_line(&cursor.layer, &font, &truncate(line, 90), 9.0, MARGIN_LEFT, cursor.y);
            cursor.advance(4.5);
        }
    }

    save_to_bytes(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_formatting_groups_thousands() {
        assert_eq!(format_currency(0.0, "$"), "$0.00");
        assert_eq!(format_currency(999.5, "$"), "$999.50");
        assert_eq!(format_currency(1234.5, "$"), "$1,234.50");
        assert_eq!(format_currency(1_234_567.89, "$"), "$1,234,567.89");
        assert_eq!(format_currency(-1234.5, "$"), "-$1,234.50");
    }

    #[test]
    fn filenames_follow_the_export_contract() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(
            report_spreadsheet_filename("finance", date),
            "finance-report-2026-08-07.csv"
        );
        assert_eq!(
            report_document_filename("finance", date),
            "finance-report-2026-08-07.pdf"
        );
        assert_eq!(
            invoice_document_filename("INV-202608-001"),
            "Invoice-INV-202608-001.pdf"
        );
    }

    #[test]
    fn truncate_keeps_short_strings_intact() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer string", 10), "a much ...");
    }
}
