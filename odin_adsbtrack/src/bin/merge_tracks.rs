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

use std::{collections::BTreeSet, io, path::{Path,PathBuf}, time::Duration};
use anyhow::Result;
use serde::Serialize;
use tracing::{debug,info};
use tracing_subscriber::EnvFilter;
use odin_common::{define_cli,check_cli,datetime::utc_now,fs::{file_length,replace_file_contents}};
use odin_adsbtrack::{
    PositionRecord, TrajectoryReconciler,
    config::{load_config_or_default,AdsbTrackConfig},
    position_log::{read_positions_from_path,write_current_snapshot,write_positions},
    trajectory::{current_aircraft,filter_identity,group_trajectories},
};

define_cli! { ARGS [about="merge current and historical ADS-B position logs into per-aircraft trajectories"] =
    current: Option<String> [help="current positions file (default from config)", long],
    history: Option<String> [help="position history file (default from config)", long],
    no_history: bool [help="only use current positions", long],
    icao: Option<String> [help="only output positions of this aircraft (ICAO 24bit hex id)", long],
    json: bool [help="write JSON trajectories instead of CSV positions", long],
    output: Option<String> [help="output file (default is stdout)", short, long],
    watch: bool [help="re-run whenever the current positions file changes", short, long],
    interval: u64 [help="watch interval in seconds", long, default_value="2"],
    config: Option<String> [help="pathname of RON config file", short, long]
}

#[derive(Serialize)]
struct Trajectory {
    icao24: String,
    is_current: bool,
    positions: Vec<PositionRecord>,
}

struct Paths {
    current: PathBuf,
    history: Option<PathBuf>,
}

struct Merged {
    records: Vec<PositionRecord>,
    current: BTreeSet<String>, // identities of aircraft that are current
}

fn merge (config: &AdsbTrackConfig, paths: &Paths)->Result<Merged> {
    let current = read_positions_from_path( &paths.current)?;
    let historical = match &paths.history {
        Some(path) => read_positions_from_path( path)?,
        None => Vec::new()
    };

    let merged = TrajectoryReconciler::new( config.duplicate_tolerance_deg).reconcile( &current, &historical);
    debug!("merged {} current and {} historical positions into {}", current.len(), historical.len(), merged.len());

    let current_ids = current_aircraft( &current, &merged, utc_now(), config.current_max_age);
    let records = match &ARGS.icao {
        Some(icao24) => filter_identity( &merged, icao24),
        None => merged
    };
    Ok( Merged { records, current: current_ids })
}

fn trajectories (merged: &Merged)->Vec<Trajectory> {
    group_trajectories( &merged.records).into_iter()
        .map( |(icao24, positions)| Trajectory { is_current: merged.current.contains( &icao24), icao24, positions })
        .collect()
}

fn write_output (merged: &Merged)->Result<()> {
    match (&ARGS.output, ARGS.json) {
        (Some(path), false) => write_current_snapshot( path, &merged.records)?,
        (Some(path), true) => {
            let trajectories = trajectories( merged);
            replace_file_contents( path, |w| serde_json::to_writer_pretty( w, &trajectories).map_err( io::Error::from))?
        }
        (None, false) => write_positions( io::stdout().lock(), &merged.records)?,
        (None, true) => {
            serde_json::to_writer_pretty( io::stdout().lock(), &trajectories( merged))?;
            println!();
        }
    }
    Ok(())
}

fn run (config: &AdsbTrackConfig, paths: &Paths)->Result<()> {
    let merged = merge( config, paths)?;
    write_output( &merged)?;
    info!("{} positions written, {} current aircraft", merged.records.len(), merged.current.len());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    check_cli!(ARGS);
    let _ = tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).with_writer( io::stderr).try_init();

    let config = load_config_or_default( ARGS.config.as_deref().map( Path::new))?;
    let paths = Paths {
        current: ARGS.current.as_ref().map( PathBuf::from).unwrap_or_else( || config.current_path.clone()),
        history: if ARGS.no_history {
            None
        } else {
            Some( ARGS.history.as_ref().map( PathBuf::from).unwrap_or_else( || config.history_path.clone()))
        },
    };

    run( &config, &paths)?;

    if ARGS.watch {
        // the current file is replaced as a whole, i.e. a size change means new content
        let mut last_len = file_length( &paths.current);
        let mut interval = tokio::time::interval( Duration::from_secs( ARGS.interval.max(1)));
        info!("watching {:?}", paths.current);

        loop {
            interval.tick().await;
            let len = file_length( &paths.current);
            if len != last_len {
                last_len = len;
                run( &config, &paths)?;
            }
        }
    }

    Ok(())
}
