/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! CSV position logs.
//!
//! We keep two kinds of files with the same format: an append-only history of every position fix
//! we received, and a "current" file that holds the latest position of each aircraft and is
//! periodically replaced as a whole. The format is
//! ```text
//! timestamp_utc,icao,flight,lat,lon,altitude_ft,speed_kts,heading_deg,squawk
//! 2025-12-07T17:01:58.200000Z,3C5EF2,EWG4TV,45.63,8.936,38000,376.0,158.0,
//! ```
//! Unknown values are empty fields

use std::{fs::File, io::{self,Read,Write}, path::{Path,PathBuf}};
use serde::Deserialize;
use tracing::{debug,warn};
use odin_common::{csv_fields::CsvReadable, datetime::parse_datetime, fs::{append_open,ensure_parent_dir,is_missing_or_empty,replace_file_contents}};

use crate::PositionRecord;
use crate::adsb::{normalize_icao24, Position};
use crate::errors::Result;

pub const COLUMNS: [&str; 9] = [
    "timestamp_utc", "icao", "flight", "lat", "lon", "altitude_ft", "speed_kts", "heading_deg", "squawk"
];

/// what we get from the CSV reader before validation. Everything is optional text so that
/// a single bad value does not abort reading the file
#[derive(Debug,Default,Deserialize)]
#[serde(default)]
struct RawPositionRow {
    timestamp_utc: Option<String>,
    icao: Option<String>,
    flight: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
    altitude_ft: Option<String>,
    speed_kts: Option<String>,
    heading_deg: Option<String>,
    squawk: Option<String>,
}

enum RowRejection {
    Incomplete, // no icao or position - skipped silently
    Invalid(String),
}

fn non_empty (s: &Option<String>)->Option<&str> {
    s.as_deref().map( str::trim).filter( |s| !s.is_empty())
}

fn optional_value<T: CsvReadable> (name: &str, s: &Option<String>)->std::result::Result<Option<T>,RowRejection> {
    match non_empty(s) {
        Some(v) => T::from_field(v).map( Some).ok_or_else( || RowRejection::Invalid( format!("invalid {name} '{v}'"))),
        None => Ok(None)
    }
}

fn to_position_record (raw: &RawPositionRow)->std::result::Result<PositionRecord,RowRejection> {
    let icao24 = non_empty(&raw.icao).ok_or( RowRejection::Incomplete)?;
    let lat: f64 = optional_value( "lat", &raw.lat)?.ok_or( RowRejection::Incomplete)?;
    let lon: f64 = optional_value( "lon", &raw.lon)?.ok_or( RowRejection::Incomplete)?;
    let pos = Position::new( lat, lon)
        .ok_or_else( || RowRejection::Invalid( format!("position out of range ({lat},{lon})")))?;

    let altitude_ft = optional_value::<f64>( "altitude_ft", &raw.altitude_ft)?.map( |alt| alt.trunc() as i64);

    Ok( PositionRecord {
        timestamp: non_empty(&raw.timestamp_utc).and_then( parse_datetime),
        icao24: normalize_icao24( icao24),
        callsign: non_empty(&raw.flight).unwrap_or_default().to_string(),
        latitude: pos.latitude(),
        longitude: pos.longitude(),
        altitude_ft,
        speed_kts: optional_value( "speed_kts", &raw.speed_kts)?,
        heading_deg: optional_value( "heading_deg", &raw.heading_deg)?,
        squawk: non_empty(&raw.squawk).map( str::to_string),
    })
}

/// read position records from a CSV source with header line. Rows without icao or position are
/// skipped, rows with invalid values are skipped with a warning. Missing or invalid timestamps
/// do not disqualify a row
pub fn read_positions<R: Read> (reader: R)->Result<Vec<PositionRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true) // short rows are just missing trailing values
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut positions: Vec<PositionRecord> = Vec::new();

    for (i, res) in csv_reader.records().enumerate() {
        let record = match res {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => { // e.g. invalid UTF-8 - the reader is already past this row
                let line = e.position().map( |p| p.line()).unwrap_or( i as u64 + 2);
                warn!("skipping row {line}: {e}");
                continue
            }
        };
        let line = record.position().map( |p| p.line()).unwrap_or( i as u64 + 2);

        let raw: RawPositionRow = match record.deserialize( Some(&headers)) {
            Ok(raw) => raw,
            Err(e) => { warn!("skipping row {line}: {e}"); continue }
        };

        match to_position_record( &raw) {
            Ok(pr) => positions.push( pr),
            Err(RowRejection::Incomplete) => {}
            Err(RowRejection::Invalid(msg)) => warn!("skipping row {line}: {msg}")
        }
    }

    Ok(positions)
}

/// read positions from a file. A file that does not exist (yet) has no positions
pub fn read_positions_from_path (path: impl AsRef<Path>)->Result<Vec<PositionRecord>> {
    let path = path.as_ref();
    match File::open( path) {
        Ok(file) => {
            let positions = read_positions( file)?;
            debug!("read {} positions from {:?}", positions.len(), path);
            Ok(positions)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("position file not found: {:?}", path);
            Ok(Vec::new())
        }
        Err(e) => Err(e.into())
    }
}

/// write header and `records` as CSV
pub fn write_positions<'a,W,I> (writer: W, records: I)->Result<()>
    where W: Write, I: IntoIterator<Item=&'a PositionRecord>
{
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record( COLUMNS)?;
    for pr in records {
        csv_writer.serialize( pr)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// replace the file at `path` with the given snapshot records. Readers of `path` either see the
/// old or the new contents
pub fn write_current_snapshot<'a,I> (path: impl AsRef<Path>, records: I)->Result<()>
    where I: IntoIterator<Item=&'a PositionRecord>
{
    replace_file_contents( path, |w| write_positions( w, records))
}

/// append-only history log. The header is only written if the file is new or empty
pub struct PositionLogWriter {
    path: PathBuf,
    csv_writer: csv::Writer<File>,
    n_written: usize,
}

impl PositionLogWriter {
    pub fn open (path: impl AsRef<Path>)->Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir( &path)?;
        let needs_header = is_missing_or_empty( &path);

        let file = append_open( &path)?;
        let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if needs_header {
            csv_writer.write_record( COLUMNS)?;
            csv_writer.flush()?;
        }

        Ok( PositionLogWriter { path, csv_writer, n_written: 0 } )
    }

    pub fn path (&self)->&Path { self.path.as_path() }

    /// number of records appended through this writer
    pub fn n_written (&self)->usize { self.n_written }

    /// append and flush, i.e. the record is in the file when this returns
    pub fn append (&mut self, pr: &PositionRecord)->Result<()> {
        self.csv_writer.serialize( pr)?;
        self.csv_writer.flush()?;
        self.n_written += 1;
        Ok(())
    }
}
