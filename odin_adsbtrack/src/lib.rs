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

//! ADS-B tracking from SBS (BaseStation) feeds.
//!
//! The data flow is
//! ```text
//!   SBS line ──parse_sbs_line──▶ ParsedRecord ──AircraftTracker::update──▶ PositionRecord ──▶ position log
//!
//!   current log ─┐
//!                ├──reconcile──▶ per-aircraft chronological trajectories (deduplicated)
//!   history log ─┘
//! ```
//! Parser, tracker and reconciler do not perform any I/O. Reading feeds (`feed`), persisting
//! positions (`position_log`) and the tools in `src/bin` are built on top of them.

use std::fmt;
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use odin_common::datetime::{ser_optional_iso, de_optional_iso, to_iso_utc_string};

pub mod adsb;
use adsb::Position;

pub mod sbs;
pub mod tracker;
pub mod trajectory;
pub mod position_log;
pub mod feed;
pub mod snapshot;
pub mod config;
pub mod errors;

pub use adsb::ParsedRecord;
pub use sbs::parse_sbs_line;
pub use tracker::{AircraftState, AircraftTracker, SharedTracker};
pub use trajectory::{reconcile, TrajectoryReconciler};

/// the read-only projection of an aircraft with a known position at a given time. This is what
/// we exchange with storage and display clients.
/// Serialized field names are the column names of the position log
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct PositionRecord {
    #[serde(rename="timestamp_utc", serialize_with="ser_optional_iso", deserialize_with="de_optional_iso", default)]
    pub timestamp: Option<DateTime<Utc>>, // None if a stored record had no valid time

    #[serde(rename="icao")]
    pub icao24: String,

    #[serde(rename="flight")]
    pub callsign: String, // empty if not (yet) known

    #[serde(rename="lat")]
    pub latitude: f64,

    #[serde(rename="lon")]
    pub longitude: f64,

    pub altitude_ft: Option<i64>,
    pub speed_kts: Option<f64>,
    pub heading_deg: Option<f64>,
    pub squawk: Option<String>,
}

impl PositionRecord {
    pub fn position (&self)->Option<Position> { Position::new( self.latitude, self.longitude) }

    /// normalized aircraft identity, i.e. records of the same aircraft compare equal regardless of case
    pub fn identity (&self)->String { adsb::normalize_icao24( &self.icao24) }

    pub fn is_same_aircraft (&self, other: &PositionRecord)->bool {
        self.icao24.trim().eq_ignore_ascii_case( other.icao24.trim())
    }

    /// same aircraft and both coordinate differences strictly below `tolerance_deg`
    pub fn is_near_duplicate (&self, other: &PositionRecord, tolerance_deg: f64)->bool {
        self.is_same_aircraft( other)
            && odin_common::is_within( self.latitude, other.latitude, tolerance_deg)
            && odin_common::is_within( self.longitude, other.longitude, tolerance_deg)
    }

    /// speed and heading are both known
    pub fn has_full_kinematics (&self)->bool {
        self.speed_kts.is_some() && self.heading_deg.is_some()
    }
}

impl fmt::Display for PositionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "PositionRecord( icao24: {}", self.icao24)?;
        if !self.callsign.is_empty() { write!( f, ", cs: \"{}\"", self.callsign)?; }
        write!( f, ", pos: ({:.5},{:.5})", self.latitude, self.longitude)?;
        if let Some(alt) = self.altitude_ft { write!( f, ", alt: {alt}")?; }
        if let Some(spd) = self.speed_kts { write!( f, ", spd: {spd:.1}")?; }
        if let Some(hdg) = self.heading_deg { write!( f, ", hdg: {hdg:.0}")?; }
        if let Some(sqk) = &self.squawk { write!( f, ", sqk: {sqk}")?; }
        match &self.timestamp {
            Some(date) => write!( f, ", time: {}", to_iso_utc_string(date))?,
            None => write!( f, ", time: -")?
        }
        write!( f, " )")
    }
}
