// Primitives for reading and writing the record file.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use csv::StringRecord;
use log::{debug, info};
use snafu::prelude::*;

use crate::survey::{io_common::display_path, *};

/// The append-only file holding the survey answers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

// What is already on disk before an append.
#[derive(Debug, Clone)]
enum StoreState {
    /// Missing, empty, or only whitespace.
    Blank,
    Started {
        header: StringRecord,
        /// The last row was left without its line terminator.
        needs_newline: bool,
    },
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> RecordStore {
        RecordStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validates an entry and appends it as one row.
    ///
    /// Nothing is written if the entry is rejected or if the existing header
    /// lacks one of the record columns. A blank file gets the header first.
    /// The row follows the column order of the existing header. Returns the
    /// entry as it was stored, with its text fields trimmed.
    pub fn append(&self, entry: &SurveyEntry) -> BSurveyResult<SurveyEntry> {
        let entry = validate_entry(entry)?;
        let path = display_path(&self.path);

        let state = self.read_state()?;
        debug!("append: {} state: {:?}", path, state);

        // Everything goes out in a single write.
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        let mut bytes: Vec<u8> = Vec::new();
        let blank = match &state {
            StoreState::Blank => {
                wtr.write_record(RECORD_HEADER)
                    .context(CsvWriteSnafu { path: path.clone() })?;
                let header = StringRecord::from(RECORD_HEADER.to_vec());
                wtr.write_record(&row_for_header(&entry, &header))
                    .context(CsvWriteSnafu { path: path.clone() })?;
                true
            }
            StoreState::Started {
                header,
                needs_newline,
            } => {
                check_header(header, &path)?;
                if *needs_newline {
                    bytes.push(b'\n');
                }
                wtr.write_record(&row_for_header(&entry, header))
                    .context(CsvWriteSnafu { path: path.clone() })?;
                false
            }
        };
        wtr.flush().context(FileIoSnafu { path: path.clone() })?;
        bytes.extend_from_slice(wtr.get_ref());

        // A blank file only holds whitespace, it is replaced.
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(!blank)
            .truncate(blank)
            .open(&self.path)
            .context(CsvOpenSnafu { path: path.clone() })?;
        file.write_all(&bytes)
            .context(FileIoSnafu { path: path.clone() })?;
        file.sync_data().context(FileIoSnafu { path: path.clone() })?;
        info!("Appended entry for {:?} to {}", entry.coffee_shop, path);
        Ok(entry)
    }

    /// Reads all the rows, in file order.
    ///
    /// A missing file, or one holding only whitespace, has no entries.
    pub fn load_all(&self) -> BSurveyResult<Vec<SurveyEntry>> {
        let path = display_path(&self.path);
        let contents = match self.read_bytes()? {
            Some(c) if !is_blank(&c) => c,
            _ => {
                debug!("load_all: {} is missing or blank", path);
                return Ok(Vec::new());
            }
        };

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(contents.as_slice());
        let headers = rdr
            .headers()
            .context(CsvHeaderSnafu { path: path.clone() })?
            .clone();
        debug!("load_all: header: {:?}", headers);
        check_header(&headers, &path)?;

        let mut res: Vec<SurveyEntry> = Vec::new();
        for (idx, record_r) in rdr.records().enumerate() {
            // The header is line 1.
            let lineno = idx as u64 + 2;
            let record = record_r.context(CsvLineParseSnafu {
                path: path.clone(),
                lineno,
            })?;
            let entry: SurveyEntry =
                record
                    .deserialize(Some(&headers))
                    .context(CsvLineParseSnafu {
                        path: path.clone(),
                        lineno,
                    })?;
            res.push(entry);
        }
        info!("Read {} entries from {}", res.len(), path);
        Ok(res)
    }

    fn read_bytes(&self) -> BSurveyResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(c) => Ok(Some(c)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Box::new(SurveyError::CsvOpen {
                source: e,
                path: display_path(&self.path),
            })),
        }
    }

    fn read_state(&self) -> BSurveyResult<StoreState> {
        let contents = match self.read_bytes()? {
            Some(c) if !is_blank(&c) => c,
            _ => return Ok(StoreState::Blank),
        };
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(contents.as_slice());
        let header = rdr
            .headers()
            .context(CsvHeaderSnafu {
                path: display_path(&self.path),
            })?
            .clone();
        Ok(StoreState::Started {
            header,
            needs_newline: contents.last() != Some(&b'\n'),
        })
    }
}

fn is_blank(contents: &[u8]) -> bool {
    contents.iter().all(|b| b.is_ascii_whitespace())
}

fn check_header(header: &StringRecord, path: &str) -> SurveyResult<()> {
    for column in RECORD_HEADER.iter() {
        ensure!(
            header.iter().any(|h| h == *column),
            CsvMissingColumnSnafu {
                column: *column,
                path
            }
        );
    }
    Ok(())
}

// The fields of an entry laid out along a header. Columns that are not
// record columns stay empty.
fn row_for_header(entry: &SurveyEntry, header: &StringRecord) -> StringRecord {
    let visits = entry.visits_per_week.to_string();
    header
        .iter()
        .map(|column| match column {
            "timestamp" => entry.timestamp.as_str(),
            "coffee_shop" => entry.coffee_shop.as_str(),
            "favdrink" => entry.favorite_drink.as_str(),
            "visit_time" => entry.visit_time.as_str(),
            "visits_per_week" => visits.as_str(),
            _ => "",
        })
        .collect()
}
