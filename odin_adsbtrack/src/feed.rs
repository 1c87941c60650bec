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

//! drivers that pump newline separated SBS text through the parser into a tracker

use std::{fmt, io::BufRead, path::Path};
use tokio::{fs::File, net::{TcpStream,ToSocketAddrs}, io::{AsyncBufRead,AsyncBufReadExt,BufReader}};
use tracing::{debug,info,trace};

use crate::{PositionRecord, adsb::ParsedRecord, sbs::parse_sbs_line, tracker::{AircraftTracker,SharedTracker}};
use crate::errors::Result;

const READ_BUF_SIZE: usize = 8192;

/// what the feed callback gets for each accepted line
#[derive(Debug)]
pub struct FeedUpdate<'a> {
    pub parsed: &'a ParsedRecord,
    pub position: Option<&'a PositionRecord>, // None until we know the position of this aircraft
    pub is_full: bool, // position record has speed and heading
}

impl<'a> FeedUpdate<'a> {
    /// the line reported a position, i.e. `position` is a new fix and not just a re-emitted one
    pub fn is_new_fix (&self)->bool {
        self.parsed.has_position() && self.position.is_some()
    }
}

#[derive(Debug,Default,Clone,Copy,PartialEq,Eq)]
pub struct FeedStats {
    pub lines: usize,
    pub accepted: usize,
    pub rejected: usize, // not a MSG line, no identity or garbage
    pub positions: usize, // new position fixes
}

impl fmt::Display for FeedStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "lines: {}, accepted: {}, rejected: {}, positions: {}", self.lines, self.accepted, self.rejected, self.positions)
    }
}

fn process_line<U,F> (line: &str, update: U, stats: &mut FeedStats, on_update: &mut F)->Result<()>
    where U: FnOnce(&ParsedRecord)->(Option<PositionRecord>,bool), F: FnMut(&FeedUpdate)->Result<()>
{
    stats.lines += 1;
    let Some(parsed) = parse_sbs_line( line) else {
        if !line.trim().is_empty() { trace!("rejected SBS line: {line}"); }
        stats.rejected += 1;
        return Ok(())
    };
    stats.accepted += 1;

    let (position, is_full) = update( &parsed);
    let feed_update = FeedUpdate { parsed: &parsed, position: position.as_ref(), is_full };
    if feed_update.is_new_fix() {
        stats.positions += 1;
    }
    on_update( &feed_update)
}

/// synchronous driver for a single-owner tracker. Processes lines until end of input and returns
/// the number of lines/records we have seen. Errors returned by `on_update` terminate processing
pub fn process_lines<R,F> (reader: R, tracker: &mut AircraftTracker, mut on_update: F)->Result<FeedStats>
    where R: BufRead, F: FnMut(&FeedUpdate)->Result<()>
{
    let mut stats = FeedStats::default();
    for line in reader.lines() {
        let line = line?;
        process_line( &line, |rec| tracker.update(rec), &mut stats, &mut on_update)?;
    }
    debug!("end of input: {stats}");
    Ok(stats)
}

/// async driver for a shared tracker
pub async fn process_async_lines<R,F> (reader: R, tracker: &SharedTracker, mut on_update: F)->Result<FeedStats>
    where R: AsyncBufRead + Unpin, F: FnMut(&FeedUpdate)->Result<()>
{
    let mut stats = FeedStats::default();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        process_line( &line, |rec| tracker.update(rec), &mut stats, &mut on_update)?;
    }
    debug!("end of input: {stats}");
    Ok(stats)
}

/// process a recorded SBS file
pub async fn process_file<F> (path: impl AsRef<Path>, tracker: &SharedTracker, on_update: F)->Result<FeedStats>
    where F: FnMut(&FeedUpdate)->Result<()>
{
    let path = path.as_ref();
    let file = File::open( path).await?;
    info!("reading SBS file {:?}", path);
    process_async_lines( BufReader::with_capacity( READ_BUF_SIZE, file), tracker, on_update).await
}

/// process a live SBS socket (e.g. dump1090 port 30003) until the server closes the connection
pub async fn process_socket<A,F> (addr: A, tracker: &SharedTracker, on_update: F)->Result<FeedStats>
    where A: ToSocketAddrs + fmt::Debug, F: FnMut(&FeedUpdate)->Result<()>
{
    let stream = TcpStream::connect( &addr).await?;
    info!("connected to SBS socket {:?}", addr);
    process_async_lines( BufReader::with_capacity( READ_BUF_SIZE, stream), tracker, on_update).await
}
