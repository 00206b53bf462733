use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use thiserror::Error;
use tracing::{debug, info};

use super::data::Record;

/// Errors raised while loading or saving a listing file
#[derive(Debug, Error)]
pub enum TableError {
    #[error("cannot open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: data file column count should be one of {{3, 4}}, found {found}", path.display())]
    ColumnCount { path: PathBuf, found: usize },

    #[error("{}: line {line} has {found} columns, expected {expected}", path.display())]
    Ragged {
        path: PathBuf,
        line: u64,
        found: usize,
        expected: usize,
    },
}

/// Field separator, inferred from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    /// `.csv` files are comma separated, everything else is tab separated
    pub fn for_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.to_string_lossy().eq_ignore_ascii_case("csv") => Delimiter::Comma,
            _ => Delimiter::Tab,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

/// Which columns are written for each record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// filename, prediction, score
    Untagged,
    /// filename, prediction, tag, score
    Tagged,
}

/// The record table backing one listing file.
///
/// Holds the rows in file order together with the path and delimiter
/// they were read with, so every save goes back to the same place in
/// the same format.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
    path: PathBuf,
    delimiter: Delimiter,
    records: Vec<Record>,
}

impl RecordTable {
    /// Load a headerless 3- or 4-column listing and normalize it to the
    /// canonical 4-column form.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, TableError> {
        let path = path.into();
        let delimiter = Delimiter::for_path(&path);
        let file = File::open(&path).map_err(|source| TableError::Io {
            path: path.clone(),
            source,
        })?;

        let table = Self::parse(file, path, delimiter)?;
        info!(
            "Loaded {} records from {} ({}-separated)",
            table.len(),
            table.path.display(),
            match table.delimiter {
                Delimiter::Comma => "comma",
                Delimiter::Tab => "tab",
            }
        );
        Ok(table)
    }

    /// Parse listing rows from any reader. `path` is remembered as the
    /// save target.
    pub fn parse<R: Read>(reader: R, path: PathBuf, delimiter: Delimiter) -> Result<Self, TableError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter.as_byte())
            .from_reader(reader);

        let mut records = Vec::new();
        let mut width: Option<usize> = None;

        for result in reader.records() {
            let row = result.map_err(|source| TableError::Csv {
                path: path.clone(),
                source,
            })?;

            let expected = *width.get_or_insert(row.len());
            if expected != 3 && expected != 4 {
                return Err(TableError::ColumnCount { path, found: expected });
            }
            if row.len() != expected {
                return Err(TableError::Ragged {
                    line: row.position().map(|p| p.line()).unwrap_or(0),
                    path,
                    found: row.len(),
                    expected,
                });
            }

            let record = if expected == 3 {
                Record::new(&row[0], &row[1], &row[2])
            } else {
                Record {
                    filename: row[0].to_string(),
                    prediction: row[1].to_string(),
                    tag: Some(row[2].to_string()).filter(|tag| !tag.is_empty()),
                    score: row[3].to_string(),
                }
            };
            records.push(record);
        }

        Ok(Self {
            path,
            delimiter,
            records,
        })
    }

    /// Overwrite the source file with the whole table in canonical form
    pub fn save(&self) -> Result<(), TableError> {
        write_records(&self.path, &self.records, self.delimiter, Layout::Tagged)?;
        debug!("Saved {} records to {}", self.records.len(), self.path.display());
        Ok(())
    }

    /// Write the canonical form to any writer
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        write_rows(writer, &self.records, self.delimiter, Layout::Tagged)
    }

    /// Replace the tag cell of one row. Returns false when `index` is out of range.
    pub fn set_tag(&mut self, index: usize, tag: String) -> bool {
        match self.records.get_mut(index) {
            Some(record) => {
                record.tag = Some(tag);
                true
            }
            None => false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Write records as headerless delimited text, overwriting `path`
pub fn write_records(
    path: &Path,
    records: &[Record],
    delimiter: Delimiter,
    layout: Layout,
) -> Result<(), TableError> {
    let file = File::create(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    write_rows(file, records, delimiter, layout).map_err(|source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn write_rows<W: Write>(
    writer: W,
    records: &[Record],
    delimiter: Delimiter,
    layout: Layout,
) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter.as_byte())
        .from_writer(writer);

    for record in records {
        match layout {
            Layout::Untagged => {
                writer.write_record([&record.filename, &record.prediction, &record.score])?
            }
            Layout::Tagged => writer.write_record([
                record.filename.as_str(),
                record.prediction.as_str(),
                record.tag_text(),
                record.score.as_str(),
            ])?,
        }
    }

    writer.flush()?;
    Ok(())
}
