use std::fs;
use std::path::{Path, PathBuf};

use super::{RecordStore, StoreError};

/// A directory of CSV files standing in for a spreadsheet: every `*.csv` file
/// is one worksheet titled after its file stem.
#[derive(Debug, Clone)]
pub struct CsvWorkbook {
    directory: PathBuf,
}

impl CsvWorkbook {
    pub fn open<P: AsRef<Path>>(directory: P) -> Result<Self, StoreError> {
        let directory = directory.as_ref().to_path_buf();
        if !directory.is_dir() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("workbook directory {} does not exist", directory.display()),
            )));
        }
        Ok(Self { directory })
    }

    fn worksheet_path(&self, title: &str) -> Result<PathBuf, StoreError> {
        let path = self.directory.join(format!("{title}.csv"));
        if path.is_file() {
            Ok(path)
        } else {
            Err(StoreError::WorksheetNotFound(title.to_string()))
        }
    }
}

impl RecordStore for CsvWorkbook {
    fn worksheet_titles(&self) -> Result<Vec<String>, StoreError> {
        let mut titles = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if !is_csv || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                titles.push(stem.to_string());
            }
        }
        titles.sort();
        Ok(titles)
    }

    fn read_rows(&self, title: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let path = self.worksheet_path(title)?;
        read_csv(&path)
    }

    fn write_cell(
        &self,
        title: &str,
        row: usize,
        column: usize,
        value: &str,
    ) -> Result<(), StoreError> {
        if row == 0 || column == 0 {
            return Err(StoreError::InvalidAddress { row, column });
        }

        let path = self.worksheet_path(title)?;
        let mut rows = read_csv(&path)?;
        if rows.len() < row {
            rows.resize_with(row, Vec::new);
        }
        let cells = &mut rows[row - 1];
        if cells.len() < column {
            cells.resize(column, String::new());
        }
        cells[column - 1] = value.to_string();

        write_csv(&path, &rows)
    }
}

fn read_csv(path: &Path) -> Result<Vec<Vec<String>>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Rewrites the worksheet through a sibling temp file so a crash never leaves
/// a half-written sheet behind.
fn write_csv(path: &Path, rows: &[Vec<String>]) -> Result<(), StoreError> {
    let staging = path.with_extension("csv.tmp");
    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&staging)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    fs::rename(&staging, path)?;
    Ok(())
}
