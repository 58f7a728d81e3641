//! Spreadsheet-friendly CSV: `;` separated, UTF-8 with BOM, CRLF rows.

use axum::http::header;
use axum::response::{IntoResponse, Response};

const DELIMITER: char = ';';
const BOM: &str = "\u{feff}";

/// Escapes a string value for safe inclusion in a CSV field.
/// Fields containing the delimiter, quotes or line breaks are quoted.
pub fn csv_escape(value: &str) -> String {
    if value.contains(DELIMITER) || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Accumulates rows into a complete CSV document.
pub struct CsvWriter {
    buf: String,
}

impl CsvWriter {
    /// Start a document with the BOM and a header row.
    pub fn new(headers: &[&str]) -> Self {
        let mut writer = Self {
            buf: String::from(BOM),
        };
        writer.row(headers.iter().copied());
        writer
    }

    pub fn row<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.buf.push(DELIMITER);
            }
            self.buf.push_str(&csv_escape(field.as_ref()));
        }
        self.buf.push_str("\r\n");
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Serve `body` as a CSV attachment named `filename`.
pub fn csv_response(filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
