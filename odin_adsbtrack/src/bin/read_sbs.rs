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

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use odin_common::{define_cli,check_cli};
use odin_adsbtrack::{SharedTracker, feed::{self,FeedUpdate}};

define_cli! { ARGS [about="ADS-B SBS monitoring tool"] =
    socket: bool [help="source is a host:port SBS socket address (e.g. localhost:30003)", short, long],
    source: String [help="SBS file or socket address from where to read messages"]
}

fn print_update (u: &FeedUpdate)->odin_adsbtrack::errors::Result<()> {
    println!("{}", u.parsed);
    if u.is_new_fix() {
        if let Some(pr) = u.position { println!("  -> {pr}"); }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    check_cli!(ARGS);
    let _ = tracing_subscriber::fmt().with_env_filter( EnvFilter::from_default_env()).try_init();

    let tracker = SharedTracker::new();
    let stats = if ARGS.socket {
        feed::process_socket( ARGS.source.as_str(), &tracker, print_update).await?
    } else {
        feed::process_file( &ARGS.source, &tracker, print_update).await?
    };

    println!("{stats}, aircraft: {}", tracker.len());
    Ok(())
}
