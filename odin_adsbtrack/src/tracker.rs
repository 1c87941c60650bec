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

use std::{collections::{BTreeMap,HashMap}, fmt, sync::{Arc,RwLock,RwLockReadGuard,RwLockWriteGuard}, time::Duration};
use chrono::{DateTime,Utc};
use tracing::debug;
use odin_common::datetime::{self,duration_since};

use crate::PositionRecord;
use crate::adsb::{normalize_icao24, ParsedRecord, Position};

/// the merged, last-known state of a tracked aircraft
#[derive(Debug,Clone,PartialEq)]
pub struct AircraftState {
    pub icao24: String,
    pub callsign: String, // empty until we get an identification message
    pub position: Option<Position>,
    pub altitude_ft: Option<i64>,
    pub speed_kts: Option<f64>,
    pub heading_deg: Option<f64>,
    pub squawk: Option<String>,
    pub last_update: DateTime<Utc>, // updated by every merge, not just position updates
}

impl AircraftState {
    pub fn new (icao24: String, last_update: DateTime<Utc>)->Self {
        AircraftState {
            icao24,
            callsign: String::new(),
            position: None,
            altitude_ft: None,
            speed_kts: None,
            heading_deg: None,
            squawk: None,
            last_update,
        }
    }

    /// last-known-value-wins merge. Unknown values in `rec` never clear what we already have
    fn merge (&mut self, rec: &ParsedRecord, timestamp: DateTime<Utc>) {
        if let Some(cs) = rec.callsign.as_deref().map( str::trim).filter( |s| !s.is_empty()) {
            self.callsign = cs.to_string();
        }
        if rec.position.is_some() { self.position = rec.position; }
        if rec.altitude_ft.is_some() { self.altitude_ft = rec.altitude_ft; }
        if rec.speed_kts.is_some() { self.speed_kts = rec.speed_kts; }
        if rec.heading_deg.is_some() { self.heading_deg = rec.heading_deg; }
        if let Some(sqk) = rec.squawk.as_deref().map( str::trim).filter( |s| !s.is_empty()) {
            self.squawk = Some(sqk.to_string());
        }

        self.last_update = timestamp;
    }

    pub fn has_full_kinematics (&self)->bool {
        self.speed_kts.is_some() && self.heading_deg.is_some()
    }

    /// None if we don't know where the aircraft is yet
    pub fn position_record (&self)->Option<PositionRecord> {
        self.position.map( |pos| PositionRecord {
            timestamp: Some(self.last_update),
            icao24: self.icao24.clone(),
            callsign: self.callsign.clone(),
            latitude: pos.latitude(),
            longitude: pos.longitude(),
            altitude_ft: self.altitude_ft,
            speed_kts: self.speed_kts,
            heading_deg: self.heading_deg,
            squawk: self.squawk.clone(),
        })
    }
}

impl fmt::Display for AircraftState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "AircraftState( icao24: {}", self.icao24)?;
        if !self.callsign.is_empty() { write!( f, ", cs: \"{}\"", self.callsign)?; }
        if let Some(pos) = &self.position { write!( f, ", pos: {pos}")?; }
        if let Some(alt) = self.altitude_ft { write!( f, ", alt: {alt}")?; }
        if let Some(spd) = self.speed_kts { write!( f, ", spd: {spd:.1}")?; }
        if let Some(hdg) = self.heading_deg { write!( f, ", hdg: {hdg:.0}")?; }
        if let Some(sqk) = &self.squawk { write!( f, ", sqk: {sqk}")?; }
        write!( f, ", time: {} )", datetime::to_iso_utc_string( &self.last_update))
    }
}

/// keeps the merged state of all aircraft we have seen so far.
/// The tracker does not drop aircraft on its own - retention is up to the owner (see `remove_stale`)
#[derive(Debug,Default)]
pub struct AircraftTracker {
    aircraft: HashMap<String,AircraftState>,
}

impl AircraftTracker {
    pub fn new ()->Self {
        AircraftTracker { aircraft: HashMap::new() }
    }

    /// merge `rec` at the current time. See `update_at`
    pub fn update (&mut self, rec: &ParsedRecord)->(Option<PositionRecord>,bool) {
        self.update_at( rec, datetime::utc_now())
    }

    /// merge `rec` into the state of its aircraft (creating it if this is the first time we see it).
    /// Returns the resulting position record if the aircraft has a known position, plus a flag
    /// that tells us if that record has both speed and heading
    pub fn update_at (&mut self, rec: &ParsedRecord, timestamp: DateTime<Utc>)->(Option<PositionRecord>,bool) {
        let icao24 = normalize_icao24( &rec.icao24);
        if icao24.is_empty() {
            return (None,false) // parser does not produce these but ParsedRecord fields are public
        }

        let state = self.aircraft.entry( icao24).or_insert_with_key( |k| {
            debug!("new aircraft {k}");
            AircraftState::new( k.clone(), timestamp)
        });
        state.merge( rec, timestamp);

        match state.position_record() {
            Some(pr) => {
                let is_full = pr.has_full_kinematics();
                (Some(pr), is_full)
            }
            None => (None,false)
        }
    }

    /// an owned copy of the position records of all aircraft that have a known position
    pub fn snapshot (&self)->BTreeMap<String,PositionRecord> {
        self.aircraft.iter()
            .filter_map( |(k,state)| state.position_record().map( |pr| (k.clone(), pr)))
            .collect()
    }

    pub fn get (&self, icao24: &str)->Option<&AircraftState> {
        self.aircraft.get( &normalize_icao24(icao24))
    }

    pub fn len (&self)->usize { self.aircraft.len() }

    pub fn is_empty (&self)->bool { self.aircraft.is_empty() }

    /// remove all aircraft that have not been updated within `max_age` before `now`.
    /// Returns the sorted identities of the removed aircraft
    pub fn remove_stale (&mut self, max_age: Duration, now: DateTime<Utc>)->Vec<String> {
        let mut dropped: Vec<String> = self.aircraft.values()
            .filter( |state| duration_since( &now, &state.last_update) > max_age)
            .map( |state| state.icao24.clone())
            .collect();
        dropped.sort();

        for icao24 in &dropped {
            self.aircraft.remove( icao24);
        }
        if !dropped.is_empty() {
            debug!("dropped {} stale aircraft", dropped.len());
        }

        dropped
    }
}

/// a cloneable handle for a tracker that is updated and read from different tasks.
/// Each operation holds the lock for its whole duration, i.e. snapshots are consistent across
/// all aircraft and never see a partially merged record
#[derive(Debug,Clone,Default)]
pub struct SharedTracker {
    tracker: Arc<RwLock<AircraftTracker>>,
}

impl SharedTracker {
    pub fn new ()->Self {
        SharedTracker { tracker: Arc::new( RwLock::new( AircraftTracker::new())) }
    }

    // merge does not panic, poisoned locks can be recovered

    fn read (&self)->RwLockReadGuard<'_,AircraftTracker> {
        self.tracker.read().unwrap_or_else( |e| e.into_inner())
    }

    fn write (&self)->RwLockWriteGuard<'_,AircraftTracker> {
        self.tracker.write().unwrap_or_else( |e| e.into_inner())
    }

    pub fn update (&self, rec: &ParsedRecord)->(Option<PositionRecord>,bool) {
        self.write().update( rec)
    }

    pub fn update_at (&self, rec: &ParsedRecord, timestamp: DateTime<Utc>)->(Option<PositionRecord>,bool) {
        self.write().update_at( rec, timestamp)
    }

    pub fn snapshot (&self)->BTreeMap<String,PositionRecord> {
        self.read().snapshot()
    }

    pub fn len (&self)->usize { self.read().len() }

    pub fn is_empty (&self)->bool { self.read().is_empty() }

    pub fn get (&self, icao24: &str)->Option<AircraftState> {
        self.read().get( icao24).cloned()
    }

    pub fn remove_stale (&self, max_age: Duration, now: DateTime<Utc>)->Vec<String> {
        self.write().remove_stale( max_age, now)
    }
}
