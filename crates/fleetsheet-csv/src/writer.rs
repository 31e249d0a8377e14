//! CSV writer

use std::io::Write;

use crate::error::CsvResult;
use crate::options::{CsvOptions, LineTerminator};

/// Write `rows` as records, keeping their lengths.
pub fn write_rows<W: Write>(writer: W, rows: &[Vec<String>], options: &CsvOptions) -> CsvResult<()> {
    let terminator = match options.line_terminator {
        LineTerminator::LF => csv::Terminator::Any(b'\n'),
        LineTerminator::CRLF => csv::Terminator::CRLF,
    };

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .terminator(terminator)
        .flexible(true)
        .from_writer(writer);

    for row in rows {
        if row.is_empty() {
            // A lone empty field keeps a blank row from collapsing into nothing
            csv_writer.write_record([""])?;
        } else {
            csv_writer.write_record(row)?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}
