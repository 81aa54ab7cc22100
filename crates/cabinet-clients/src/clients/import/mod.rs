//! Client list import from CSV exports.
//!
//! A file is first read into a preview (headers, leading rows, unreadable
//! rows). Columns whose header matches a known client field are then mapped
//! onto fresh client records; unknown columns are reported and skipped.

mod columns;
mod parser;

use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::domain::{Client, ClientId};

pub use columns::ClientColumn;
pub use parser::RowError;

/// Rows shown in a preview when the caller does not say otherwise.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug)]
pub enum ClientImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ClientImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientImportError::Io(err) => write!(f, "failed to read client import file: {}", err),
            ClientImportError::Csv(err) => write!(f, "invalid client CSV data: {}", err),
        }
    }
}

impl std::error::Error for ClientImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientImportError::Io(err) => Some(err),
            ClientImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ClientImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ClientImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Header recognised as a client field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedColumn {
    pub header: String,
    pub column: ClientColumn,
    pub label: &'static str,
}

/// What the import dialog shows before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub errors: Vec<RowError>,
    pub total_rows: usize,
    pub mapped: Vec<MappedColumn>,
    pub unmapped: Vec<String>,
}

/// Preview plus the client records mapped from every readable row.
#[derive(Debug, Clone)]
pub struct ClientImport {
    pub preview: ImportPreview,
    pub clients: Vec<Client>,
}

pub struct ClientCsvImporter;

impl ClientCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        preview_rows: usize,
    ) -> Result<ClientImport, ClientImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, preview_rows)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        preview_rows: usize,
    ) -> Result<ClientImport, ClientImportError> {
        let table = parser::parse_table(reader)?;

        let mut mapped = Vec::new();
        let mut unmapped = Vec::new();
        let mut bindings = Vec::new();
        for (index, header) in table.headers.iter().enumerate() {
            match ClientColumn::from_header(header) {
                Some(column) if !bindings.iter().any(|(_, bound)| *bound == column) => {
                    bindings.push((index, column));
                    mapped.push(MappedColumn {
                        header: header.clone(),
                        column,
                        label: column.label(),
                    });
                }
                _ => unmapped.push(header.clone()),
            }
        }

        let clients = if bindings.is_empty() {
            Vec::new()
        } else {
            table
                .rows
                .iter()
                .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
                .map(|row| map_row(row, &bindings))
                .collect()
        };

        let preview = ImportPreview {
            total_rows: table.rows.len(),
            rows: table.rows.iter().take(preview_rows).cloned().collect(),
            headers: table.headers,
            errors: table.errors,
            mapped,
            unmapped,
        };

        Ok(ClientImport { preview, clients })
    }
}

fn map_row(row: &[String], bindings: &[(usize, ClientColumn)]) -> Client {
    let mut client = Client::empty(ClientId::generate());
    for (index, column) in bindings {
        if let Some(value) = row.get(*index) {
            column.apply(&mut client, value);
        }
    }
    client
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EXPORT: &str = "Identifiant interne,Raison sociale,SIREN,Régime de TVA,Typologie de clientèle,Contact principal,Chiffre d'affaires\n\
CLI-001,Smith Enterprises,123456789,Encaissement,B to C,Emma Martin emma@example.com,120000\n\
CLI-002,Brown Industries,987654321,Débit,B to B,,80000\n\
,,,,,,\n\
CLI-003,Green Ltd,555444333,,,,\n";

    #[test]
    fn preview_limits_rows_and_lists_mappings() {
        let import = ClientCsvImporter::from_reader(Cursor::new(EXPORT), 2).expect("import");

        assert_eq!(import.preview.headers.len(), 7);
        assert_eq!(import.preview.rows.len(), 2);
        assert_eq!(import.preview.total_rows, 4);
        assert_eq!(import.preview.mapped.len(), 6);
        assert_eq!(import.preview.unmapped, vec!["Chiffre d'affaires"]);
        assert!(import.preview.errors.is_empty());
    }

    #[test]
    fn rows_become_clients_and_blank_rows_are_skipped() {
        let import = ClientCsvImporter::from_reader(Cursor::new(EXPORT), 5).expect("import");

        assert_eq!(import.clients.len(), 3);
        let smith = &import.clients[0];
        assert_eq!(smith.identifiant_interne, "CLI-001");
        assert_eq!(smith.raison_sociale, "Smith Enterprises");
        assert_eq!(smith.activites.regime_tva, "Encaissement");
        assert_eq!(smith.contact_principal.email, "emma@example.com");

        let green = &import.clients[2];
        assert!(green.activites.regime_tva.is_empty());
        assert!(green.regime_tva().is_none());
        assert_ne!(import.clients[0].id, import.clients[1].id);
    }

    #[test]
    fn file_without_known_columns_maps_nothing() {
        let import =
            ClientCsvImporter::from_reader(Cursor::new("Foo,Bar\n1,2\n"), 5).expect("import");
        assert!(import.clients.is_empty());
        assert_eq!(import.preview.unmapped, vec!["Foo", "Bar"]);
        assert_eq!(import.preview.rows.len(), 1);
    }

    #[test]
    fn duplicate_headers_keep_the_first_binding() {
        let import = ClientCsvImporter::from_reader(
            Cursor::new("SIREN,siren\n111,222\n"),
            5,
        )
        .expect("import");
        assert_eq!(import.clients[0].siren, "111");
        assert_eq!(import.preview.unmapped, vec!["siren"]);
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = ClientCsvImporter::from_path("./does-not-exist.csv", 5)
            .expect_err("expected io error");

        match error {
            ClientImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
