use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::LoadError;
use crate::models::RouteRecord;

/// Anything able to deliver raw route/zone rows for one delivery date
pub trait RecordSource {
    fn fetch(&self) -> Result<Vec<RouteRecord>, LoadError>;
}

/// Records kept in memory, mostly for tests and embedding callers
impl RecordSource for Vec<RouteRecord> {
    fn fetch(&self) -> Result<Vec<RouteRecord>, LoadError> {
        Ok(self.clone())
    }
}

/// CSV export with a header row (`route_id,zone_id,dispatch_deadline,item_count`)
pub struct CsvRecordSource {
    path: PathBuf,
}

impl CsvRecordSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvRecordSource {
    fn fetch(&self) -> Result<Vec<RouteRecord>, LoadError> {
        let file = open(&self.path)?;
        let records = read_csv_records(file)?;
        info!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

/// JSON array of records
pub struct JsonRecordSource {
    path: PathBuf,
}

impl JsonRecordSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for JsonRecordSource {
    fn fetch(&self) -> Result<Vec<RouteRecord>, LoadError> {
        let file = open(&self.path)?;
        let records = read_json_records(file)?;
        info!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

/// Picks the source by file extension; anything not `.json` is read as CSV
pub fn source_for_path(path: &Path) -> Box<dyn RecordSource> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Box::new(JsonRecordSource::new(path)),
        _ => Box::new(CsvRecordSource::new(path)),
    }
}

pub fn read_csv_records<R: Read>(reader: R) -> Result<Vec<RouteRecord>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

pub fn read_json_records<R: Read>(reader: R) -> Result<Vec<RouteRecord>, LoadError> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn write_csv_records<W: Write>(writer: W, records: &[RouteRecord]) -> Result<(), LoadError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush().map_err(|source| LoadError::Io {
        path: "<csv writer>".to_string(),
        source,
    })?;
    Ok(())
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}
