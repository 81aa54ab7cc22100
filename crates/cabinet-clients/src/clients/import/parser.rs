use std::io::Read;

use serde::Serialize;

/// Row that could not be read, with its 1-based line in the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub line: u64,
    pub message: String,
}

#[derive(Debug, Default)]
pub(crate) struct CsvTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
    pub(crate) errors: Vec<RowError>,
}

/// Read headers and every row; unreadable rows are collected, not fatal.
pub(crate) fn parse_table<R: Read>(reader: R) -> Result<CsvTable, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(index, header)| display_header(index, header))
        .collect::<Vec<_>>();

    let mut table = CsvTable {
        headers,
        ..CsvTable::default()
    };

    for record in csv_reader.records() {
        match record {
            Ok(record) => table
                .rows
                .push(record.iter().map(str::to_string).collect()),
            Err(err) => table.errors.push(RowError {
                line: err.position().map(|position| position.line()).unwrap_or_default(),
                message: err.to_string(),
            }),
        }
    }

    Ok(table)
}

fn display_header(index: usize, header: &str) -> String {
    let cleaned = header.replace(['\u{feff}', '\u{200b}'], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        format!("Colonne {}", index + 1)
    } else {
        cleaned.to_string()
    }
}
