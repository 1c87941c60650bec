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

use std::fmt;
use serde::{Serialize,Deserialize};

/// SBS "MSG" transmission type (field 1), i.e. which kind of Mode S / ADS-B message the
/// receiver decoded. This is informational - the parser does not dispatch on it since
/// receivers are not consistent about which fields they fill for each type
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
#[repr(u8)]
pub enum TransmissionType {
    AircraftIdentification = 1, // callsign
    SurfacePosition = 2,
    AirbornePosition = 3, // altitude, lat, lon
    AirborneVelocity = 4, // groundspeed, track, vertical rate
    SurveillanceAltitudeReply = 5,
    SurveillanceId = 6, // squawk
    AirToAir = 7,
    AllCallReply = 8,
}

impl TransmissionType {
    pub fn from_code (code: u8)->Option<Self> {
        use TransmissionType::*;
        match code {
            1 => Some(AircraftIdentification),
            2 => Some(SurfacePosition),
            3 => Some(AirbornePosition),
            4 => Some(AirborneVelocity),
            5 => Some(SurveillanceAltitudeReply),
            6 => Some(SurveillanceId),
            7 => Some(AirToAir),
            8 => Some(AllCallReply),
            _ => None
        }
    }

    pub fn code (&self)->u8 { *self as u8 }
}

/// a validated WGS84 position in degrees. We only create these through `Position::new` so
/// that there is no way to end up with just one coordinate or out-of-range values
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct Position { latitude: f64, longitude: f64 }

impl Position {
    /// returns None unless latitude is within [-90,90] and longitude within [-180,180] (inclusive)
    pub fn new (latitude: f64, longitude: f64)->Option<Position> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Some( Position{ latitude, longitude } )
        } else {
            None
        }
    }

    pub fn latitude (&self)->f64 { self.latitude }
    pub fn longitude (&self)->f64 { self.longitude }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "({:.5},{:.5})", self.latitude, self.longitude)
    }
}

/// normalized aircraft identity (upper case ICAO 24bit hex address)
pub fn normalize_icao24 (icao24: &str)->String {
    icao24.trim().to_ascii_uppercase()
}

/// a single, partially populated observation for an aircraft. Fields that were not reported
/// (or did not parse) are None - they mean "unknown", not "cleared"
#[derive(Debug,Clone,Default,PartialEq)]
pub struct ParsedRecord {
    pub icao24: String,
    pub transmission: Option<TransmissionType>,
    pub callsign: Option<String>,
    pub position: Option<Position>,
    pub altitude_ft: Option<i64>,
    pub speed_kts: Option<f64>,
    pub heading_deg: Option<f64>,
    pub squawk: Option<String>,
}

impl ParsedRecord {
    pub fn new (icao24: &str)->Self {
        ParsedRecord { icao24: normalize_icao24(icao24), ..Default::default() }
    }

    pub fn has_position (&self)->bool { self.position.is_some() }

    /// true if the record does not carry any data besides the identity
    pub fn is_empty (&self)->bool {
        self.callsign.is_none() && self.position.is_none() && self.altitude_ft.is_none()
            && self.speed_kts.is_none() && self.heading_deg.is_none() && self.squawk.is_none()
    }
}

impl fmt::Display for ParsedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "ParsedRecord( icao24: {}", self.icao24)?;
        if let Some(tt) = self.transmission { write!( f, ", msg: {}", tt.code())?; }
        if let Some(cs) = &self.callsign { write!( f, ", cs: \"{cs}\"")?; }
        if let Some(pos) = &self.position { write!( f, ", pos: {pos}")?; }
        if let Some(alt) = self.altitude_ft { write!( f, ", alt: {alt}")?; }
        if let Some(spd) = self.speed_kts { write!( f, ", spd: {spd:.1}")?; }
        if let Some(hdg) = self.heading_deg { write!( f, ", hdg: {hdg:.0}")?; }
        if let Some(sqk) = &self.squawk { write!( f, ", sqk: {sqk}")?; }
        write!( f, " )")
    }
}
