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

use std::{fs, path::{Path,PathBuf}, time::Duration};
use serde::Deserialize;
use tracing::info;
use odin_common::datetime::{deserialize_duration,deserialize_optional_duration};

use crate::errors::{OdinAdsbTrackError,Result};
use crate::trajectory::{DEFAULT_CURRENT_MAX_AGE,DEFAULT_DUPLICATE_TOLERANCE_DEG};

/// configuration for the tracking tools. All fields have defaults, e.g.
/// ```text
/// AdsbTrackConfig(
///     source: "local-dump1090",
///     history_path: "data/adsb_history.csv",
///     current_path: "data/adsb_current.csv",
///     snapshot_interval: "5s",
///     drop_after: Some("10m"),
///     current_max_age: "2m",
/// )
/// ```
#[derive(Deserialize,Debug,Clone)]
#[serde(default)]
pub struct AdsbTrackConfig {
    pub source: String, // name of the receiver station, only used for logging

    pub history_path: PathBuf, // append-only log of all position fixes
    pub current_path: PathBuf, // latest position per aircraft, replaced every snapshot_interval

    #[serde(deserialize_with="deserialize_duration")]
    pub snapshot_interval: Duration,

    #[serde(deserialize_with="deserialize_optional_duration")]
    pub drop_after: Option<Duration>, // None: never drop aircraft from tracker

    #[serde(deserialize_with="deserialize_duration")]
    pub current_max_age: Duration,

    pub duplicate_tolerance_deg: f64,

    pub log_full_kinematics_only: bool, // only log fixes for which we know speed and heading
}

impl Default for AdsbTrackConfig {
    fn default()->Self {
        AdsbTrackConfig {
            source: "sbs".to_string(),
            history_path: PathBuf::from("adsb_history.csv"),
            current_path: PathBuf::from("adsb_current.csv"),
            snapshot_interval: Duration::from_secs(5),
            drop_after: None,
            current_max_age: DEFAULT_CURRENT_MAX_AGE,
            duplicate_tolerance_deg: DEFAULT_DUPLICATE_TOLERANCE_DEG,
            log_full_kinematics_only: false,
        }
    }
}

impl AdsbTrackConfig {
    pub fn check (&self)->Result<()> {
        if self.snapshot_interval.is_zero() {
            return Err( OdinAdsbTrackError::ConfigError("snapshot_interval has to be > 0".into()))
        }
        if self.current_max_age.is_zero() {
            return Err( OdinAdsbTrackError::ConfigError("current_max_age has to be > 0".into()))
        }
        if !(self.duplicate_tolerance_deg.is_finite() && self.duplicate_tolerance_deg > 0.0) {
            return Err( OdinAdsbTrackError::ConfigError( format!("invalid duplicate_tolerance_deg: {}", self.duplicate_tolerance_deg)))
        }
        Ok(())
    }
}

pub fn parse_config (input: &str)->Result<AdsbTrackConfig> {
    let config: AdsbTrackConfig = ron::from_str( input)?;
    config.check()?;
    Ok(config)
}

pub fn load_config (path: impl AsRef<Path>)->Result<AdsbTrackConfig> {
    let path = path.as_ref();
    let input = fs::read_to_string( path)?;
    let config = parse_config( &input)?;
    info!("loaded config {:?}", path);
    Ok(config)
}

/// the config at `path` if there is one, defaults otherwise
pub fn load_config_or_default (path: Option<&Path>)->Result<AdsbTrackConfig> {
    match path {
        Some(path) => load_config( path),
        None => Ok( AdsbTrackConfig::default())
    }
}
