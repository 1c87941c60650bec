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

//! field access for single lines of comma separated feeds such as SBS (BaseStation) sockets.
//!
//! Unlike a full CSV reader this does not handle quoting - feed lines are flat, fixed order records
//! where a missing value is just an empty field. Field boundaries are located once upon construction,
//! values are only parsed when requested:
//! ```
//! use odin_common::csv_fields::CsvFields;
//!
//! let csv = CsvFields::new("MSG,4,1,1,AC1FCC,1,,,,,,,316,106,,,1536,,,,,0");
//! let icao24: Option<&str> = csv.str_field(4);
//! let speed: Option<f64> = csv.field(12);
//! let lat: Option<f64> = csv.field(14); // empty -> None
//! ```

/// a value type that can be read from a single (already trimmed, non-empty) field.
/// Implementations return None for anything that is not a valid representation - a bad
/// field is never an error for the whole line
pub trait CsvReadable: Sized {
    fn from_field (s: &str)->Option<Self>;
}

impl CsvReadable for f64 {
    fn from_field (s: &str)->Option<f64> {
        // Rust also parses "inf" and "NaN" - those are not values we want to propagate
        s.parse::<f64>().ok().filter( |v| v.is_finite())
    }
}

impl CsvReadable for f32 {
    fn from_field (s: &str)->Option<f32> {
        s.parse::<f32>().ok().filter( |v| v.is_finite())
    }
}

impl CsvReadable for i64 {
    fn from_field (s: &str)->Option<i64> { s.parse().ok() }
}

impl CsvReadable for u64 {
    fn from_field (s: &str)->Option<u64> { s.parse().ok() }
}

impl CsvReadable for u8 {
    fn from_field (s: &str)->Option<u8> { s.parse().ok() }
}

impl CsvReadable for String {
    fn from_field (s: &str)->Option<String> { Some(s.to_string()) }
}

pub struct CsvFields<'a> {
    line: &'a str,
    fields: Vec<&'a str>,
}

impl<'a> CsvFields<'a> {
    pub fn new (line: &'a str)->Self {
        let line = line.trim_end_matches( ['\r','\n']);
        let fields = if line.is_empty() { Vec::new() } else { line.split(',').collect() };
        CsvFields { line, fields }
    }

    /// the (line-terminator stripped) input line, mostly for error reporting
    pub fn line (&self)->&'a str { self.line }

    pub fn len (&self)->usize { self.fields.len() }

    pub fn is_empty (&self)->bool { self.fields.is_empty() }

    /// the untrimmed field text, None if the line does not have that many fields
    pub fn raw (&self, idx: usize)->Option<&'a str> {
        self.fields.get(idx).copied()
    }

    /// trimmed field text - empty fields are reported as None
    pub fn str_field (&self, idx: usize)->Option<&'a str> {
        self.raw(idx).map( |s| s.trim()).filter( |s| !s.is_empty())
    }

    /// parsed field value. Returns None if the field is missing, empty or does not parse as T
    pub fn field<T: CsvReadable> (&self, idx: usize)->Option<T> {
        self.str_field(idx).and_then( T::from_field)
    }
}
