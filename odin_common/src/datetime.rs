/*
 * Copyright © 2024, United States Government, as represented by the Administrator of
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

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;
use parse_duration::parse;

/// this should be used wherever we might have to use sim clock instead of wall clock
#[inline]
pub fn utc_now()->DateTime<Utc> {
    Utc::now()
}

/// positive duration between two dates, ZERO if `dt_later` is not after `dt_earlier`
pub fn duration_since (dt_later: &DateTime<Utc>, dt_earlier: &DateTime<Utc>)->Duration {
    (*dt_later - *dt_earlier).to_std().unwrap_or( Duration::ZERO)
}

/* #region ISO-8601 timestamps ***********************************************************************************/

const NAIVE_FORMATS: [&'static str; 2] = [ "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f" ];

/// parse ISO-8601 / RFC 3339 like timestamps into UTC.
/// Accepts 'Z' and numeric offsets ("2025-12-07T17:01:58.200+00:00") and offset-less timestamps,
/// which are taken to be UTC. Returns None for empty or unparseable input
pub fn parse_datetime (s: &str)->Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() { return None }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.to_utc())
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%+") {
        return Some(dt.to_utc())
    }
    NAIVE_FORMATS.iter()
        .find_map( |fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map( |ndt| ndt.and_utc())
}

/// fixed width RFC 3339 UTC representation (microsecond resolution, 'Z' suffix). Strings produced
/// by this function sort lexicographically in chronological order
pub fn to_iso_utc_string (dt: &DateTime<Utc>)->String {
    dt.to_rfc3339_opts( SecondsFormat::Micros, true)
}

/// serde serializer for optional timestamps - None becomes an empty string (CSV friendly)
pub fn ser_optional_iso<S: Serializer> (opt: &Option<DateTime<Utc>>, s: S)->Result<S::Ok, S::Error> {
    match opt {
        Some(dt) => s.serialize_str( &to_iso_utc_string(dt)),
        None => s.serialize_str("")
    }
}

/// permissive serde deserializer for optional timestamps - missing, empty or malformed values
/// are all mapped to None
pub fn de_optional_iso<'a,D> (deserializer: D)->Result<Option<DateTime<Utc>>, D::Error> where D: Deserializer<'a> {
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok( s.as_deref().and_then( parse_datetime) )
}

/* #endregion ISO-8601 timestamps */

//--- config support

pub fn deserialize_duration <'a,D>(deserializer: D) -> Result<Duration,D::Error>
    where D: Deserializer<'a>
{
    String::deserialize(deserializer).and_then( |string| {
        parse(string.as_str())
            .map_err( |e| serde::de::Error::custom(format!("{:?}",e)))
    })
}

pub fn deserialize_optional_duration <'a,D>(deserializer: D) -> Result<Option<Duration>,D::Error>
    where D: Deserializer<'a>
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    if let Some(s) = s {
        let d =  parse(s.as_str()).map_err( |e| serde::de::Error::custom(format!("{:?}",e)))?;
        return Ok( Some(d) )
    }

    Ok(None)
}
