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

use std::{collections::BTreeMap, fs};
use chrono::{DateTime, TimeZone, Utc};
use odin_adsbtrack::{
    PositionRecord,
    position_log::{read_positions, read_positions_from_path, write_current_snapshot, write_positions, PositionLogWriter, COLUMNS}
};

const LOG: &'static str = "\
timestamp_utc,icao,flight,lat,lon,altitude_ft,speed_kts,heading_deg,squawk
2025-12-07T17:01:58.200000Z,3C5EF2,EWG4TV,45.63,8.936,38000,376.0,158.0,1000
2025-12-07T17:02:03.200000Z,3c5ef2,EWG4TV ,45.64,8.93,37999.7,,,
,4840D6,,52.1,4.7,,,,
2025-12-07T17:02:04Z,,KLM1023,52.1,4.7,,,,
2025-12-07T17:02:05Z,4840D6,KLM1023,,4.7,,,,
2025-12-07T17:02:06Z,4840D6,KLM1023,abc,4.7,,,,
2025-12-07T17:02:07Z,4840D6,KLM1023,52.2,4.8,high,,,
2025-12-07T17:02:08Z,4840D6,KLM1023,95.0,4.8,,,,
not-a-time,4840D6,KLM1023,52.3,4.9,,,,
2025-12-07T17:02:09Z,4840D6
2025-12-07T17:02:10+01:00,4840D6,KLM1023,52.4,5.0,1200,210.5,90,7000
";

fn t (secs: i64)->DateTime<Utc> {
    Utc.with_ymd_and_hms( 2025, 12, 7, 17, 0, 0).unwrap() + chrono::Duration::seconds(secs)
}

fn record (icao24: &str, secs: Option<i64>, lat: f64, lon: f64)->PositionRecord {
    PositionRecord {
        timestamp: secs.map( t),
        icao24: icao24.to_string(),
        callsign: String::new(),
        latitude: lat,
        longitude: lon,
        altitude_ft: None,
        speed_kts: None,
        heading_deg: None,
        squawk: None,
    }
}

// run with "cargo test --test test_position_log -- --nocapture"

#[test]
fn test_read_positions() {
    println!("\n--- test_read_positions");
    let positions = read_positions( LOG.as_bytes()).unwrap();
    for pr in &positions { println!("  {pr}"); }

    assert_eq!( positions.len(), 5);

    let p = &positions[0];
    assert_eq!( p.icao24, "3C5EF2");
    assert_eq!( p.callsign, "EWG4TV");
    assert_eq!( p.altitude_ft, Some(38000));
    assert_eq!( p.speed_kts, Some(376.0));
    assert_eq!( p.heading_deg, Some(158.0));
    assert_eq!( p.squawk.as_deref(), Some("1000"));
    assert!( p.timestamp.is_some());

    let p = &positions[1];
    assert_eq!( p.icao24, "3C5EF2"); // normalized
    assert_eq!( p.callsign, "EWG4TV");
    assert_eq!( p.altitude_ft, Some(37999)); // truncated
    assert_eq!( p.speed_kts, None);
    assert_eq!( p.squawk, None);

    let p = &positions[2]; // row without timestamp is still a position
    assert_eq!( p.icao24, "4840D6");
    assert_eq!( p.timestamp, None);

    let p = &positions[3]; // unparseable timestamp
    assert_eq!( p.timestamp, None);
    assert_eq!( p.latitude, 52.3);

    let p = &positions[4];
    assert_eq!( p.timestamp, Some(t(130) - chrono::Duration::hours(1)));
    assert_eq!( p.squawk.as_deref(), Some("7000"));
    assert_eq!( p.heading_deg, Some(90.0));
}

#[test]
fn test_read_empty() {
    assert!( read_positions( "".as_bytes()).unwrap().is_empty());
    assert!( read_positions( "timestamp_utc,icao,flight,lat,lon\n".as_bytes()).unwrap().is_empty());
}

#[test]
fn test_read_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let positions = read_positions_from_path( dir.path().join("does_not_exist.csv")).unwrap();
    assert!( positions.is_empty());
}

#[test]
fn test_write_read_roundtrip() {
    println!("\n--- test_write_read_roundtrip");
    let mut full = record( "3C5EF2", Some(1), 45.63, 8.936);
    full.callsign = "EWG4TV".into();
    full.altitude_ft = Some(38000);
    full.speed_kts = Some(376.5);
    full.heading_deg = Some(158.0);
    full.squawk = Some("1000".into());
    let sparse = record( "4840D6", None, -33.9, 151.2);

    let mut buf: Vec<u8> = Vec::new();
    write_positions( &mut buf, [&full, &sparse]).unwrap();
    let text = String::from_utf8( buf.clone()).unwrap();
    println!("{text}");

    assert!( text.starts_with( &COLUMNS.join(",")));
    assert!( text.contains("2025-12-07T17:00:01.000000Z,3C5EF2,EWG4TV,45.63,8.936,38000,376.5,158.0,1000"));
    assert!( text.contains(",4840D6,,-33.9,151.2,,,,"));

    let positions = read_positions( buf.as_slice()).unwrap();
    assert_eq!( positions, vec![full, sparse]); // unknown values stay unknown
}

#[test]
fn test_history_writer() {
    println!("\n--- test_history_writer");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("history.csv");

    {
        let mut w = PositionLogWriter::open( &path).unwrap();
        w.append( &record( "AAAAAA", Some(1), 1.0, 1.0)).unwrap();
        w.append( &record( "BBBBBB", Some(2), 2.0, 2.0)).unwrap();
        assert_eq!( w.n_written(), 2);
    }
    {
        // re-open appends without another header
        let mut w = PositionLogWriter::open( &path).unwrap();
        w.append( &record( "AAAAAA", Some(3), 1.5, 1.5)).unwrap();
    }

    let text = fs::read_to_string( &path).unwrap();
    println!("{text}");
    assert_eq!( text.lines().count(), 4);
    assert_eq!( text.matches("timestamp_utc").count(), 1);

    let positions = read_positions_from_path( &path).unwrap();
    assert_eq!( positions.len(), 3);
    assert_eq!( positions[2].latitude, 1.5);
}

#[test]
fn test_current_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("current.csv");

    let mut snapshot: BTreeMap<String,PositionRecord> = BTreeMap::new();
    snapshot.insert( "AAAAAA".into(), record( "AAAAAA", Some(1), 1.0, 1.0));
    snapshot.insert( "BBBBBB".into(), record( "BBBBBB", Some(1), 2.0, 2.0));
    write_current_snapshot( &path, snapshot.values()).unwrap();
    assert_eq!( read_positions_from_path( &path).unwrap().len(), 2);

    snapshot.remove("AAAAAA");
    write_current_snapshot( &path, snapshot.values()).unwrap();
    let positions = read_positions_from_path( &path).unwrap();
    assert_eq!( positions.len(), 1);
    assert_eq!( positions[0].icao24, "BBBBBB");

    // empty snapshots still have a header
    write_current_snapshot( &path, &Vec::<PositionRecord>::new()).unwrap();
    assert_eq!( fs::read_to_string( &path).unwrap().trim(), COLUMNS.join(","));
}

#[test]
fn test_skip_non_utf8_row() {
    println!("\n--- test_skip_non_utf8_row");
    let mut input: Vec<u8> = Vec::new();
    input.extend_from_slice( b"timestamp_utc,icao,flight,lat,lon,altitude_ft,speed_kts,heading_deg,squawk\n");
    input.extend_from_slice( b"2025-12-07T17:00:01Z,AAAAAA,ONE,45.0,8.0,,,,\n");
    input.extend_from_slice( b"2025-12-07T17:00:02Z,BBBBBB,\xff\xfe,46.0,9.0,,,,\n");
    input.extend_from_slice( b"2025-12-07T17:00:03Z,CCCCCC,THREE,47.0,10.0,,,,\n");

    let positions = read_positions( input.as_slice()).unwrap();
    for pr in &positions { println!("  {pr}"); }

    let ids: Vec<&str> = positions.iter().map( |pr| pr.icao24.as_str()).collect();
    assert_eq!( ids, vec!["AAAAAA", "CCCCCC"]);
    assert_eq!( positions[1].timestamp, Some(t(3)));
}
