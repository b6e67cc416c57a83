//! Reading raw quote tables from delimited text and spreadsheets.

use crate::encoding;
use crate::error::{LoadError, Result};
use calamine::{Data, Reader, open_workbook_auto};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File extensions read as spreadsheets.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// File extensions offered by [`find_data_files`].
pub const DATA_FILE_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];

const DELIMITER_CANDIDATES: [u8; 4] = [b',', b'\t', b';', b'|'];

/// An untyped table: a header row and string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Header cells, as found in the source.
    pub headers: Vec<String>,
    /// Data rows. Rows may be shorter than the header.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Cell at `row`, `col`, or `None` when the row is short.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
    }
}

/// Read a quote table, choosing the parser from the file extension.
pub fn read_table(path: &Path) -> Result<RawTable> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let table = if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        read_spreadsheet(path)?
    } else {
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = encoding::decode(&bytes)?;
        parse_delimited(&text)?
    };

    info!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "Read quote table"
    );
    Ok(table)
}

/// Parse decoded delimited text. The delimiter is sniffed from the header line.
pub fn parse_delimited(text: &str) -> Result<RawTable> {
    let header_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if header_line.is_empty() {
        return Err(LoadError::Empty);
    }
    let delimiter = sniff_delimiter(header_line);
    debug!(delimiter = %(delimiter as char).escape_default(), "Sniffed delimiter");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(ToString::to_string).collect());
    }

    Ok(RawTable::new(headers, rows))
}

/// Pick the candidate delimiter that occurs most often in the header line.
///
/// Falls back to a comma when none occurs.
pub fn sniff_delimiter(header_line: &str) -> u8 {
    DELIMITER_CANDIDATES
        .into_iter()
        .map(|d| (d, header_line.bytes().filter(|b| *b == d).count()))
        .filter(|(_, count)| *count > 0)
        .max_by_key(|(_, count)| *count)
        .map_or(b',', |(d, _)| d)
}

/// Read the first worksheet of a spreadsheet; its first row is the header.
pub fn read_spreadsheet(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::Empty)?
        .map_err(LoadError::from)?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let headers = rows.next().ok_or(LoadError::Empty)?;
    let rows = rows
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect();

    Ok(RawTable::new(headers, rows))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// List quote files in `dir` with a supported extension, sorted by name.
///
/// A missing directory yields an empty list.
pub fn find_data_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| DATA_FILE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("code,name,change", b',')]
    #[case("code\tname\tchange", b'\t')]
    #[case("code;name;change", b';')]
    #[case("code|name", b'|')]
    #[case("code", b',')]
    fn test_sniff_delimiter(#[case] line: &str, #[case] expected: u8) {
        assert_eq!(sniff_delimiter(line), expected);
    }

    #[test]
    fn test_parse_delimited_skips_blank_rows() {
        let table = parse_delimited("code,name\n001, Tech \n,\n002,Gold\n").unwrap();
        assert_eq!(table.headers, vec!["code", "name"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(0, 1), Some("Tech"));
        assert_eq!(table.cell(1, 0), Some("002"));
    }

    #[test]
    fn test_parse_delimited_short_rows() {
        let table = parse_delimited("code\tname\tchange\n001\tTech\n").unwrap();
        assert_eq!(table.cell(0, 2), None);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(parse_delimited(""), Err(LoadError::Empty)));
        assert!(matches!(parse_delimited("\n\n"), Err(LoadError::Empty)));
    }

    #[test]
    fn test_find_data_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.csv", "a.XLSX", "notes.txt"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        let files = find_data_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.XLSX", "b.csv"]);
        assert!(find_data_files(&dir.path().join("missing")).is_empty());
    }
}
