//! CSV reader

use std::io::Read;

use crate::error::CsvResult;
use crate::options::CsvOptions;

/// Read every record as a row of text.
///
/// There is no header handling; row 1 of the sheet is the first record.
/// Records may have different lengths.
pub fn read_rows<R: Read>(reader: R, options: &CsvOptions) -> CsvResult<Vec<Vec<String>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}
