/*
 * Copyright © 2025, Servicio Nacional de Meteorología e Hidrología (SENAMHI).
 * All rights reserved.
 *
 * The “geosat” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! concurrent download of selected catalog entries with idempotent resume semantics

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::warn;

use geosat_common::fs::{ensure_writable_dir, file_length};
use geosat_common::s3::{download_s3_object, get_s3_object_size, S3Client};

use crate::catalog::CatalogEntry;
use crate::errors::Result;

pub const DEFAULT_WORKERS: usize = 6;

#[derive(Debug,Clone,PartialEq,Serialize)]
pub enum FetchStatus {
    /// the object was transferred
    Fetched,
    /// a complete local copy already existed, no transfer took place
    SkippedComplete,
    /// the transfer failed; the batch continues and the caller decides on a re-request
    Failed(String),
}

/// one result per requested entry
#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct FetchResult {
    pub key: String,
    pub path: Option<PathBuf>,
    pub status: FetchStatus,
}

impl FetchResult {
    pub fn is_fetched (&self)->bool { self.status == FetchStatus::Fetched }
    pub fn is_skipped (&self)->bool { self.status == FetchStatus::SkippedComplete }
    pub fn is_failed (&self)->bool { matches!( self.status, FetchStatus::Failed(_)) }
}

/// a local file counts as complete if it exists and is at least as large as the remote
/// object. With no reported remote size an existing file counts as complete
pub fn is_complete (local_len: Option<u64>, remote_size: Option<i64>, force: bool)->bool {
    if force { return false }

    match local_len {
        Some(len) => match remote_size {
            Some(size) => size <= len as i64,
            None => true
        },
        None => false
    }
}

/// fetch one entry, mapping every transfer error into a per-entry Failed status
pub async fn fetch_object (client: &S3Client, bucket: &str, entry: &CatalogEntry, dir: &Path, force: bool)->FetchResult {
    let local_path = dir.join( entry.base_name());
    let local_len = file_length( &local_path);

    if local_len.is_some() && !force {
        let remote_size = match entry.size {
            Some(size) => Some(size),
            None => match get_s3_object_size( client, bucket, &entry.key).await {
                Ok(size) => size,
                Err(e) => {
                    warn!("size query failed for {} ({}), assuming local copy is complete", entry.key, e);
                    None
                }
            }
        };

        if is_complete( local_len, remote_size, force) {
            return FetchResult{ key: entry.key.clone(), path: Some(local_path), status: FetchStatus::SkippedComplete }
        }
    }

    match download_s3_object( client, bucket, &entry.key, dir).await {
        Ok(path) => FetchResult{ key: entry.key.clone(), path: Some(path), status: FetchStatus::Fetched },
        Err(e) => FetchResult{ key: entry.key.clone(), path: None, status: FetchStatus::Failed( e.to_string()) }
    }
}

/// download all entries into `dir` with a bounded pool of `workers` concurrent transfers.
/// Every entry yields exactly one result, collected in completion order. Only failure to
/// provide the destination directory fails the whole call
pub async fn fetch_all (client: &S3Client, bucket: &str, entries: &[CatalogEntry], dir: &Path, workers: usize, force: bool)->Result<Vec<FetchResult>> {
    ensure_writable_dir(dir)?;
    let workers = if workers == 0 { DEFAULT_WORKERS } else { workers };

    let results = stream::iter( entries.iter().map( |e| fetch_object( client, bucket, e, dir, force)))
        .buffer_unordered( workers)
        .collect::<Vec<_>>()
        .await;

    Ok(results)
}
