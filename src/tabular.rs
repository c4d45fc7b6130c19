//! CSV input and output around the matcher
//!
//! Survey exports are read as a header row followed by data rows; each row
//! becomes a [`ParticipantRecord`] keyed by header name. The combined match
//! table is written back out the same way.

use csv::{ReaderBuilder, Writer};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{ParticipantRecord, Role};

/// A header row plus data rows, ready to be written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read every data row of a survey export
///
/// Short rows only carry the columns they have; cells past the last header
/// are dropped.
pub fn read_records<R: Read>(reader: R, role: Role) -> Result<Vec<ParticipantRecord>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut records = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let row_data = result?;
        if row_data.len() != headers.len() {
            warn!(
                %role,
                row = row + 2,
                cells = row_data.len(),
                columns = headers.len(),
                "Row length does not match header"
            );
        }

        records.push(ParticipantRecord::from_pairs(
            headers.iter().zip(row_data.iter()),
        ));
    }

    Ok(records)
}

pub fn read_records_from_path(path: &Path, role: Role) -> Result<Vec<ParticipantRecord>> {
    let records = read_records(File::open(path)?, role)?;
    info!(%role, path = %path.display(), rows = records.len(), "Loaded survey export");
    Ok(records)
}

pub fn write_table<W: Write>(writer: W, table: &Table) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);

    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }

    // Flush to ensure all data is written
    wtr.flush()?;
    Ok(())
}

pub fn write_table_to_path(path: &Path, table: &Table) -> Result<()> {
    write_table(File::create(path)?, table)?;
    info!(path = %path.display(), rows = table.rows.len(), "Wrote match table");
    Ok(())
}
