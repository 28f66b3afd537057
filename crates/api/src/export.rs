//! Spreadsheet rendering for the export endpoints.
//!
//! Both sheets share one look: a bold white header row on blue, thin
//! borders on every cell and columns autofitted to their content.

use biblio_core::status::{BookStatus, MovementDirection};
use biblio_core::types::Timestamp;
use biblio_db::models::book::Book;
use biblio_db::models::movement::MovementWithBook;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

/// MIME type of an `.xlsx` workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const HEADER_BACKGROUND: u32 = 0x0D47A1;
const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Attachment name for an export, e.g. `export_books_2026-10-16_142501.xlsx`.
pub fn export_filename(kind: &str, at: Timestamp) -> String {
    format!("export_{kind}_{}.xlsx", at.format("%Y-%m-%d_%H%M%S"))
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_BACKGROUND))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
}

fn cell_format() -> Format {
    Format::new().set_border(FormatBorder::Thin)
}

fn write_header(sheet: &mut Worksheet, headers: &[&str]) -> Result<(), XlsxError> {
    let format = header_format();
    for (col, title) in (0u16..).zip(headers) {
        sheet.write_string_with_format(0, col, *title, &format)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn status_label(status: BookStatus) -> &'static str {
    match status {
        BookStatus::Active => "Active",
        BookStatus::Retired => "Retired",
    }
}

fn direction_label(direction: MovementDirection) -> &'static str {
    match direction {
        MovementDirection::CheckIn => "Check-in",
        MovementDirection::Checkout => "Checkout",
    }
}

/// Render the book catalogue. The status column is only added for admins.
pub fn books_xlsx(books: &[Book], include_status: bool) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Books")?;

    let mut headers = vec!["ISBN", "Title", "Author", "Genre", "Stock"];
    if include_status {
        headers.push("Status");
    }
    write_header(sheet, &headers)?;

    let cell = cell_format();
    for (row, book) in (1u32..).zip(books) {
        sheet.write_string_with_format(row, 0, &book.isbn, &cell)?;
        sheet.write_string_with_format(row, 1, &book.title, &cell)?;
        sheet.write_string_with_format(row, 2, &book.author, &cell)?;
        sheet.write_string_with_format(row, 3, book.genre.as_deref().unwrap_or(""), &cell)?;
        sheet.write_number_with_format(row, 4, f64::from(book.stock), &cell)?;
        if include_status {
            sheet.write_string_with_format(row, 5, status_label(book.status), &cell)?;
        }
    }

    sheet.autofit();
    workbook.save_to_buffer()
}

/// Render a movement log, one row per movement in the given order.
pub fn movements_xlsx(rows: &[MovementWithBook]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Movements")?;

    write_header(
        sheet,
        &["ISBN", "Title", "Author", "Direction", "Date/Time", "Operator"],
    )?;

    let cell = cell_format();
    for (row, entry) in (1u32..).zip(rows) {
        let movement = &entry.movement;
        let occurred_at = movement.occurred_at.format(DATE_TIME_FORMAT).to_string();

        sheet.write_string_with_format(row, 0, &entry.book_isbn, &cell)?;
        sheet.write_string_with_format(row, 1, &entry.book_title, &cell)?;
        sheet.write_string_with_format(row, 2, &entry.book_author, &cell)?;
        sheet.write_string_with_format(row, 3, direction_label(movement.direction), &cell)?;
        sheet.write_string_with_format(row, 4, &occurred_at, &cell)?;
        sheet.write_string_with_format(row, 5, &movement.operator_name, &cell)?;
    }

    sheet.autofit();
    workbook.save_to_buffer()
}
