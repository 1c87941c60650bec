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

//! periodic snapshots of the tracker state into the current positions file

use std::sync::Arc;
use tokio::{task::JoinHandle, time::{self,MissedTickBehavior}};
use tracing::{debug,error,info};
use odin_common::datetime::utc_now;

use crate::{config::AdsbTrackConfig, position_log::write_current_snapshot, tracker::SharedTracker};

/// replace the current positions file with the tracker snapshot. Failures are logged, the next
/// snapshot will try again
pub fn write_snapshot (config: &AdsbTrackConfig, tracker: &SharedTracker) {
    let snapshot = tracker.snapshot();
    match write_current_snapshot( &config.current_path, snapshot.values()) {
        Ok(()) => info!("{}: {} aircraft positions written to {:?}", config.source, snapshot.len(), config.current_path),
        Err(e) => error!("failed to write current snapshot {:?}: {e}", config.current_path)
    }
}

async fn run_snapshots (config: Arc<AdsbTrackConfig>, tracker: SharedTracker) {
    let mut interval = time::interval( config.snapshot_interval);
    interval.set_missed_tick_behavior( MissedTickBehavior::Delay);
    interval.tick().await; // the first tick completes immediately

    loop {
        interval.tick().await;
        if let Some(drop_after) = config.drop_after {
            let dropped = tracker.remove_stale( drop_after, utc_now());
            if !dropped.is_empty() {
                info!("{}: dropped stale aircraft {:?}", config.source, dropped);
            }
        }
        write_snapshot( &config, &tracker);
    }
}

/// background task that writes a snapshot every `config.snapshot_interval`
pub struct SnapshotTask {
    config: Arc<AdsbTrackConfig>,
    tracker: SharedTracker,
    task: JoinHandle<()>,
}

impl SnapshotTask {
    /// needs to be called from within a tokio runtime
    pub fn spawn (config: Arc<AdsbTrackConfig>, tracker: SharedTracker)->Self {
        let task = tokio::spawn( run_snapshots( config.clone(), tracker.clone()));
        SnapshotTask { config, tracker, task }
    }

    /// stop the periodic writes and write the final tracker state. The final write only starts
    /// after the task has terminated so that we never have two writers of the same file
    pub async fn shutdown (self) {
        self.task.abort();
        if let Err(e) = self.task.await {
            if !e.is_cancelled() { error!("snapshot task failed: {e}"); }
        }
        debug!("snapshot task terminated");
        write_snapshot( &self.config, &self.tracker);
    }
}
