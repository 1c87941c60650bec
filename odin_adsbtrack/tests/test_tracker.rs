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

#![allow(unused)]

use std::{thread, time::Duration};
use chrono::{DateTime, TimeZone, Utc};
use odin_adsbtrack::{AircraftTracker, ParsedRecord, SharedTracker, adsb::Position, parse_sbs_line};

fn t (secs: i64)->DateTime<Utc> {
    Utc.with_ymd_and_hms( 2025, 12, 7, 17, 0, 0).unwrap() + chrono::Duration::seconds(secs)
}

fn position_update (icao24: &str, lat: f64, lon: f64, altitude_ft: i64)->ParsedRecord {
    let mut rec = ParsedRecord::new( icao24);
    rec.position = Position::new( lat, lon);
    rec.altitude_ft = Some(altitude_ft);
    rec
}

fn velocity_update (icao24: &str, speed_kts: f64, heading_deg: f64)->ParsedRecord {
    let mut rec = ParsedRecord::new( icao24);
    rec.speed_kts = Some(speed_kts);
    rec.heading_deg = Some(heading_deg);
    rec
}

// run with "cargo test --test test_tracker -- --nocapture"

#[test]
fn test_merge_partial_records() {
    println!("\n--- test_merge_partial_records");
    let mut tracker = AircraftTracker::new();

    let mut rec = position_update( "ABC123", 40.0, -3.0, 10000);
    rec.callsign = Some("TEST123".to_string());
    let (pr, is_full) = tracker.update_at( &rec, t(0));
    let pr = pr.expect("position record");
    println!("{pr}");
    assert!( !is_full);
    assert_eq!( pr.heading_deg, None);
    assert_eq!( pr.callsign, "TEST123");

    let (pr, is_full) = tracker.update_at( &velocity_update( "ABC123", 250.0, 90.0), t(1));
    let pr = pr.expect("position record");
    println!("{pr}");
    assert!( is_full);
    assert_eq!( pr.latitude, 40.0);
    assert_eq!( pr.longitude, -3.0);
    assert_eq!( pr.altitude_ft, Some(10000));
    assert_eq!( pr.speed_kts, Some(250.0));
    assert_eq!( pr.heading_deg, Some(90.0));
    assert_eq!( pr.callsign, "TEST123");
    assert_eq!( pr.timestamp, Some(t(1)));

    let snapshot = tracker.snapshot();
    assert_eq!( snapshot.len(), 1);
    let snap = &snapshot["ABC123"];
    assert!( snap.has_full_kinematics());
    assert_eq!( snap, &pr);
}

#[test]
fn test_position_gating() {
    println!("\n--- test_position_gating");
    let mut tracker = AircraftTracker::new();

    let (pr, is_full) = tracker.update_at( &velocity_update( "4840D6", 451.0, 270.0), t(0));
    assert!( pr.is_none());
    assert!( !is_full); // speed and heading without position do not count
    assert_eq!( tracker.len(), 1);
    assert!( tracker.snapshot().is_empty());

    let mut rec = ParsedRecord::new("4840D6");
    rec.callsign = Some("KLM1023".into());
    let (pr, _) = tracker.update_at( &rec, t(1));
    assert!( pr.is_none());

    let state = tracker.get("4840d6").unwrap();
    println!("{state}");
    assert_eq!( state.callsign, "KLM1023");
    assert_eq!( state.last_update, t(1));
}

#[test]
fn test_merge_monotonicity() {
    println!("\n--- test_merge_monotonicity");
    let mut tracker = AircraftTracker::new();

    let mut rec = position_update( "3C5EF2", 45.63, 8.936, 38000);
    rec.callsign = Some("EWG4TV".into());
    rec.squawk = Some("1000".into());
    rec.speed_kts = Some(376.0);
    rec.heading_deg = Some(158.0);
    tracker.update_at( &rec, t(0));

    // nothing defined: nothing changes except the timestamp
    let (pr, is_full) = tracker.update_at( &ParsedRecord::new("3C5EF2"), t(5));
    let pr = pr.unwrap();
    assert!( is_full);
    assert_eq!( pr.callsign, "EWG4TV");
    assert_eq!( pr.squawk.as_deref(), Some("1000"));
    assert_eq!( pr.altitude_ft, Some(38000));
    assert_eq!( pr.timestamp, Some(t(5)));

    // empty strings are not values
    let mut rec = ParsedRecord::new("3C5EF2");
    rec.callsign = Some("  ".into());
    rec.squawk = Some(String::new());
    let (pr, _) = tracker.update_at( &rec, t(6));
    let pr = pr.unwrap();
    assert_eq!( pr.callsign, "EWG4TV");
    assert_eq!( pr.squawk.as_deref(), Some("1000"));

    // defined values overwrite
    let (pr, _) = tracker.update_at( &position_update( "3C5EF2", 45.7, 8.9, 37000), t(7));
    let pr = pr.unwrap();
    println!("{pr}");
    assert_eq!( (pr.latitude, pr.longitude), (45.7, 8.9));
    assert_eq!( pr.altitude_ft, Some(37000));
    assert_eq!( pr.speed_kts, Some(376.0));
}

#[test]
fn test_identity_normalization() {
    let mut tracker = AircraftTracker::new();
    tracker.update_at( &position_update( "abc123", 1.0, 2.0, 100), t(0));
    tracker.update_at( &velocity_update( "ABC123", 100.0, 10.0), t(1));

    assert_eq!( tracker.len(), 1);
    assert!( tracker.get("AbC123").is_some());
    assert!( tracker.snapshot()["ABC123"].has_full_kinematics());
}

#[test]
fn test_sbs_sequence() {
    println!("\n--- test_sbs_sequence");
    let lines = [
        "MSG,1,111,11111,A04424,111111,2016/03/11,13:07:05.100,2016/03/11,13:07:05.100,SWA1234 ,,,,,,,,,,,0",
        "MSG,4,111,11111,A04424,111111,2016/03/11,13:07:05.200,2016/03/11,13:07:05.200,,,412,271,,,-64,,,,,0",
        "MSG,3,111,11111,A04424,111111,2016/03/11,13:07:05.343,2016/03/11,13:07:05.288,,11025,,,37.17274,-122.03935,,,,,,0",
        "MSG,3,111,11111,AC1FCC,111111,2016/03/11,13:07:05.400,2016/03/11,13:07:05.400,,5000,,,37.5,-122.2,,,,,,0",
    ];

    let mut tracker = AircraftTracker::new();
    for (i,line) in lines.iter().enumerate() {
        let rec = parse_sbs_line( line).unwrap();
        let (pr, is_full) = tracker.update_at( &rec, t(i as i64));
        println!("{rec} -> {pr:?} {is_full}");
    }

    let snapshot = tracker.snapshot();
    assert_eq!( snapshot.len(), 2);
    let a = &snapshot["A04424"];
    assert_eq!( a.callsign, "SWA1234");
    assert_eq!( a.altitude_ft, Some(11025));
    assert!( a.has_full_kinematics());
    assert_eq!( a.timestamp, Some(t(2)));

    let b = &snapshot["AC1FCC"];
    assert!( !b.has_full_kinematics());
    assert_eq!( b.callsign, "");
}

#[test]
fn test_snapshot_is_a_copy() {
    let mut tracker = AircraftTracker::new();
    tracker.update_at( &position_update( "ABC123", 1.0, 2.0, 100), t(0));

    let snapshot = tracker.snapshot();
    tracker.update_at( &position_update( "ABC123", 3.0, 4.0, 200), t(1));

    assert_eq!( snapshot["ABC123"].latitude, 1.0);
    assert_eq!( tracker.snapshot()["ABC123"].latitude, 3.0);
}

#[test]
fn test_remove_stale() {
    println!("\n--- test_remove_stale");
    let mut tracker = AircraftTracker::new();
    tracker.update_at( &position_update( "AAAAAA", 1.0, 2.0, 100), t(0));
    tracker.update_at( &position_update( "BBBBBB", 1.0, 2.0, 100), t(50));
    tracker.update_at( &velocity_update( "CCCCCC", 100.0, 10.0), t(100)); // no position, still tracked

    let dropped = tracker.remove_stale( Duration::from_secs(60), t(100));
    println!("dropped: {dropped:?}");
    assert_eq!( dropped, vec!["AAAAAA".to_string()]);
    assert_eq!( tracker.len(), 2);

    // exactly max_age old is not stale yet
    let dropped = tracker.remove_stale( Duration::from_secs(50), t(100));
    assert!( dropped.is_empty());

    let dropped = tracker.remove_stale( Duration::from_secs(10), t(200));
    assert_eq!( dropped, vec!["BBBBBB".to_string(), "CCCCCC".to_string()]);
    assert!( tracker.is_empty());
}

#[test]
fn test_shared_tracker() {
    println!("\n--- test_shared_tracker");
    let tracker = SharedTracker::new();

    let handles: Vec<_> = (0..4).map( |i| {
        let tracker = tracker.clone();
        thread::spawn( move || {
            for j in 0..100 {
                let icao24 = format!("A0000{i}");
                tracker.update( &position_update( &icao24, 10.0 + j as f64 * 0.01, 20.0, 1000 + j));
                tracker.update( &velocity_update( &icao24, 200.0, 45.0));
            }
        })
    }).collect();

    for h in handles { h.join().unwrap(); }

    let snapshot = tracker.snapshot();
    println!("{} aircraft", snapshot.len());
    assert_eq!( snapshot.len(), 4);
    assert_eq!( tracker.len(), 4);
    for pr in snapshot.values() {
        assert!( pr.has_full_kinematics());
        assert_eq!( pr.altitude_ft, Some(1099));
    }
}
