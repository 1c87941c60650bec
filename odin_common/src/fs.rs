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

use std::fs::{self,File,OpenOptions};
use std::io::{self,Write,BufWriter};
use std::path::{Path,PathBuf};

type Result<T> = std::result::Result<T,std::io::Error>;

pub fn ensure_dir (path: impl AsRef<Path>)->io::Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// make sure the directory a file is going to be created in exists
pub fn ensure_parent_dir (path: impl AsRef<Path>)->io::Result<()> {
    match path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => ensure_dir(dir),
        _ => Ok(())
    }
}

pub fn file_length <P: AsRef<Path>> (path: P) -> Option<u64> {
    fs::metadata(path).ok().map( |meta| meta.len() )
}

/// true if there is no file at `path` or the file has no content yet
pub fn is_missing_or_empty <P: AsRef<Path>> (path: P) -> bool {
    file_length(path).map( |len| len == 0).unwrap_or(true)
}

pub fn append_open (path: impl AsRef<Path>)->Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .append(true)
        .open(path.as_ref())
}

fn tmp_path (path: &Path)->PathBuf {
    let mut name = path.file_name().map( |n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// replace the contents of `path` so that readers never see a partially written file.
/// The new contents are produced by `write_fn` into a sibling `<name>.tmp` file which is then
/// renamed to `path`. Errors of `write_fn` are passed through unchanged
pub fn replace_file_contents<F,E> (path: impl AsRef<Path>, write_fn: F) -> std::result::Result<(),E>
    where F: FnOnce(&mut BufWriter<File>)->std::result::Result<(),E>, E: From<io::Error>
{
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let tmp = tmp_path(path);
    {
        let mut w = BufWriter::new( File::create(&tmp)?);
        write_fn( &mut w)?;
        w.flush()?;
    }
    Ok( fs::rename( &tmp, path)? )
}
