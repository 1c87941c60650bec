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

use odin_common::csv_fields::CsvFields;
use crate::adsb::{ParsedRecord, Position, TransmissionType};

//--- SBS field indices
const MSG_TYPE: usize = 0;
const TRANSMISSION_TYPE: usize = 1;
const ICAO24: usize = 4;
const CALLSIGN: usize = 10;
const ALTITUDE: usize = 11;
const GROUND_SPEED: usize = 12;
const TRACK: usize = 13;
const LATITUDE: usize = 14;
const LONGITUDE: usize = 15;
const SQUAWK: usize = 17;

const MIN_FIELDS: usize = ICAO24 + 1;

/// SBS as documented on http://woodair.net/SBS/Article/Barebones42_Socket_Data.htm
///
/// Message examples:
///  MSG,1,111,11111,AA2BC2,111111,2016/03/11,13:07:16.663,2016/03/11,13:07:16.626,UAL814  ,,,,,,,,,,,0
///  MSG,3,111,11111,A04424,111111,2016/03/11,13:07:05.343,2016/03/11,13:07:05.288,,11025,,,37.17274,-122.03935,,,,,,0
///  MSG,4,111,11111,AC1FCC,111111,2016/03/11,13:07:07.777,2016/03/11,13:07:07.713,,,316,106,,,1536,,,,,0
///
/// fields:
///   0: message type (MSG, SEL, ID, AIR, STA, CLK)
///   1: transmission type (MSG only: 1-8, 3: ES Airborne Position Message)
///   2: DB session id   - '111' for dump1090 generated SBS
///   3: DB aircraft id  - '11111' for dump1090 generated SBS
///   4: ICAO 24 bit id (mode S transponder code)
///   5: DB flight id - '111111' for dump1090 generated SBS
///   6: date generated
///   7: time generated
///   8: date logged
///   9: time logged
///  10: callsign
///  11: mode-C altitude (relative to 1013.2mb (Flight Level), *not* AMSL)
///  12: ground speed
///  13: track (from vx,vy, *not* heading)
///  14: latitude
///  15: longitude
///  16: vertical rate (ft/min - 64ft resolution)
///  17: squawk (mode-A squawk code)
///  18: alert (flag indicating squawk has changed)
///  19: emergency (flag)
///  20: spi (flag, transponder ident activated)
///  21: on ground (flag)
///
/// Only MSG lines with a non-empty ICAO id produce a record, everything else returns None.
/// Individual fields that do not parse are just left as unknown - one bad field does not
/// invalidate the rest of the line
pub fn parse_sbs_line (line: &str)->Option<ParsedRecord> {
    let csv = CsvFields::new( line.trim());

    if csv.len() < MIN_FIELDS || csv.raw(MSG_TYPE) != Some("MSG") {
        return None
    }

    let mut rec = ParsedRecord::new( csv.str_field(ICAO24)?);

    rec.transmission = csv.field::<u8>(TRANSMISSION_TYPE).and_then( TransmissionType::from_code);
    rec.callsign = csv.str_field(CALLSIGN).map( str::to_string);
    rec.altitude_ft = csv.field::<f64>(ALTITUDE).map( |alt| alt.trunc() as i64); // some feeds report fractional altitudes
    rec.speed_kts = csv.field(GROUND_SPEED);
    rec.heading_deg = csv.field(TRACK);
    rec.position = parse_position( &csv);
    rec.squawk = csv.str_field(SQUAWK).map( str::to_string);

    Some(rec)
}

// both coordinates have to parse *and* be in range, otherwise we don't have a position
fn parse_position (csv: &CsvFields)->Option<Position> {
    let lat = csv.field::<f64>(LATITUDE)?;
    let lon = csv.field::<f64>(LONGITUDE)?;
    Position::new( lat, lon)
}
