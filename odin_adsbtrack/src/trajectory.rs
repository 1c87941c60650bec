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

//! combining live and logged positions into per-aircraft trajectories.
//!
//! The live ("current") set holds the latest fixes of each aircraft, the historical log holds
//! everything we recorded before. Once a live fix gets logged we have the same physical fix in
//! both sets, possibly with some formatting jitter in the coordinates. [`reconcile`] merges both
//! sets while dropping such near-duplicates, and orders the result chronologically per aircraft

use std::{collections::{BTreeMap,BTreeSet,HashMap}, time::Duration};
use chrono::{DateTime,Utc};
use odin_common::datetime::duration_since;

use crate::PositionRecord;
use crate::adsb::normalize_icao24;

/// about 11m at the equator
pub const DEFAULT_DUPLICATE_TOLERANCE_DEG: f64 = 0.0001;

/// aircraft without a position record within this time are not current anymore
pub const DEFAULT_CURRENT_MAX_AGE: Duration = Duration::from_secs(120);

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct TrajectoryReconciler {
    tolerance_deg: f64,
}

impl Default for TrajectoryReconciler {
    fn default()->Self { TrajectoryReconciler::new( DEFAULT_DUPLICATE_TOLERANCE_DEG) }
}

impl TrajectoryReconciler {
    pub fn new (tolerance_deg: f64)->Self {
        TrajectoryReconciler { tolerance_deg }
    }

    pub fn tolerance_deg (&self)->f64 { self.tolerance_deg }

    /// all `current` records plus the `historical` records that are not near-duplicates of a `current`
    /// record for the same aircraft. Historical records of aircraft that are not in `current` are
    /// all kept. The result is grouped by aircraft and sorted by time (oldest first, records without
    /// timestamp first). Inputs are not modified
    pub fn reconcile (&self, current: &[PositionRecord], historical: &[PositionRecord])->Vec<PositionRecord> {
        let mut current_by_id: HashMap<String,Vec<&PositionRecord>> = HashMap::new();
        for pr in current {
            current_by_id.entry( pr.identity()).or_default().push( pr);
        }

        let mut merged: Vec<PositionRecord> = Vec::with_capacity( current.len() + historical.len());
        merged.extend_from_slice( current);

        for pr in historical {
            let is_duplicate = match current_by_id.get( &pr.identity()) {
                Some(live) => live.iter().any( |c| c.is_near_duplicate( pr, self.tolerance_deg)),
                None => false
            };
            if !is_duplicate {
                merged.push( pr.clone());
            }
        }

        sort_chronologically( &mut merged);
        merged
    }
}

/// [`TrajectoryReconciler::reconcile`] with the default duplicate tolerance
pub fn reconcile (current: &[PositionRecord], historical: &[PositionRecord])->Vec<PositionRecord> {
    TrajectoryReconciler::default().reconcile( current, historical)
}

/// stable sort by (identity, timestamp). Option ordering puts records without timestamp first
pub fn sort_chronologically (records: &mut [PositionRecord]) {
    records.sort_by_cached_key( |pr| (pr.identity(), pr.timestamp));
}

/// identities that have at least one record which is less than `max_age` older than `now`.
/// Records without timestamp are never current, records with timestamps after `now` always are
pub fn current_identities (records: &[PositionRecord], now: DateTime<Utc>, max_age: Duration)->BTreeSet<String> {
    records.iter()
        .filter( |pr| match &pr.timestamp {
            Some(t) => duration_since( &now, t) < max_age,
            None => false
        })
        .map( |pr| pr.identity())
        .collect()
}

/// aircraft that are considered current: every identity with a record in the `live` set. If there
/// is no live set we fall back to [`current_identities`] of the merged `records`
pub fn current_aircraft (live: &[PositionRecord], records: &[PositionRecord], now: DateTime<Utc>, max_age: Duration)->BTreeSet<String> {
    if live.is_empty() {
        current_identities( records, now, max_age)
    } else {
        live.iter().map( |pr| pr.identity()).collect()
    }
}

/// the records of aircraft `icao24` (case insensitive)
pub fn filter_identity (records: &[PositionRecord], icao24: &str)->Vec<PositionRecord> {
    let icao24 = normalize_icao24( icao24);
    records.iter()
        .filter( |pr| pr.icao24.trim().eq_ignore_ascii_case( &icao24))
        .cloned()
        .collect()
}

/// per-aircraft trajectories in chronological order, keyed by normalized identity
pub fn group_trajectories (records: &[PositionRecord])->BTreeMap<String,Vec<PositionRecord>> {
    let mut trajectories: BTreeMap<String,Vec<PositionRecord>> = BTreeMap::new();
    for pr in records {
        trajectories.entry( pr.identity()).or_default().push( pr.clone());
    }
    for track in trajectories.values_mut() {
        sort_chronologically( track);
    }
    trajectories
}

/// the most recent record of each aircraft. For equal timestamps the later record wins
pub fn latest_positions (records: &[PositionRecord])->BTreeMap<String,PositionRecord> {
    let mut latest: BTreeMap<String,PositionRecord> = BTreeMap::new();
    for pr in records {
        let id = pr.identity();
        match latest.get( &id) {
            Some(last) if last.timestamp > pr.timestamp => {}
            _ => { latest.insert( id, pr.clone()); }
        }
    }
    latest
}
