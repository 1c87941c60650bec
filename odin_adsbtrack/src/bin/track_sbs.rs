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

use std::{path::Path, sync::Arc};
use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;
use odin_common::{define_cli,check_cli};
use odin_adsbtrack::{
    SharedTracker,
    config::load_config_or_default,
    feed::{self,FeedUpdate},
    position_log::PositionLogWriter,
    snapshot::SnapshotTask,
};

define_cli! { ARGS [about="ADS-B SBS position logger"] =
    socket: bool [help="source is a host:port SBS socket address (e.g. localhost:30003)", short, long],
    config: Option<String> [help="pathname of RON config file", short, long],
    source: String [help="SBS file or socket address from where to read messages"]
}

/// append new fixes to the history log
fn log_fix (history: &mut PositionLogWriter, full_kinematics_only: bool, u: &FeedUpdate)->odin_adsbtrack::errors::Result<()> {
    if u.is_new_fix() && (u.is_full || !full_kinematics_only) {
        if let Some(pr) = u.position {
            history.append( pr)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    check_cli!(ARGS);
    let _ = tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).try_init();

    let config = Arc::new( load_config_or_default( ARGS.config.as_deref().map( Path::new))?);
    info!("{}: logging {} to {:?}", config.source, ARGS.source, config.history_path);

    let tracker = SharedTracker::new();
    let mut history = PositionLogWriter::open( &config.history_path)?;
    let full_only = config.log_full_kinematics_only;

    let snapshots = SnapshotTask::spawn( config.clone(), tracker.clone());

    let res = if ARGS.socket {
        feed::process_socket( ARGS.source.as_str(), &tracker, |u| log_fix( &mut history, full_only, u)).await
    } else {
        feed::process_file( &ARGS.source, &tracker, |u| log_fix( &mut history, full_only, u)).await
    };

    snapshots.shutdown().await; // writes the final state, also if the feed terminated with an error

    let stats = res?;
    info!("{}: {stats}, {} fixes logged", config.source, history.n_written());
    Ok(())
}
