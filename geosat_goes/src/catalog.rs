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

//! listing and filtering of candidate objects on the public GOES buckets

use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};
use tracing::warn;

use geosat_common::datetime::{full_hour, is_between_inclusive, minute_of_day};
use geosat_common::fs::base_name;
use geosat_common::s3::{get_s3_objects, S3Client};

use crate::errors::{GeosatGoesError, Result};
use crate::scan_start_of_key;
use crate::window::TimeWindow;

/// default alignment of kept scan start times
pub const DEFAULT_SAMPLING_INTERVAL_MINUTES: u32 = 10;

/// a remote object key plus the size the listing reported for it
#[derive(Debug,Clone,PartialEq)]
pub struct CatalogEntry {
    pub key: String,
    pub size: Option<i64>,
}

impl CatalogEntry {
    pub fn new (key: impl ToString)->Self {
        CatalogEntry{ key: key.to_string(), size: None }
    }

    /// the scan start time embedded in the key, if the key has a parseable `_s…` stamp
    pub fn scan_start (&self)->Option<DateTime<Utc>> {
        scan_start_of_key( &self.key)
    }

    pub fn base_name (&self)->&str {
        base_name( &self.key)
    }
}

/// the object prefix for one hour of a product, e.g. `ABI-L2-CMIPF/2024/138/05/`
pub fn hour_prefix (source: &str, dt: &DateTime<Utc>)->String {
    format!("{}/{}/{:03}/{:02}/", source, dt.year(), dt.ordinal(), dt.hour())
}

/// one prefix per hour boundary from the start hour through the window end, inclusive.
/// A single-instant window still lists the hour that contains it
pub fn hour_prefixes (source: &str, window: &TimeWindow)->Vec<String> {
    let mut prefixes = Vec::new();
    let mut dt = full_hour( &window.start);

    while dt <= window.end {
        prefixes.push( hour_prefix( source, &dt));
        dt = dt + TimeDelta::hours(1);
    }
    prefixes
}

/// hard error if the window starts in the future - checked before any remote call
pub fn check_not_future (window: &TimeWindow, now: DateTime<Utc>)->Result<()> {
    if window.start.naive_utc() > now.naive_utc() {
        Err( GeosatGoesError::FutureDate( window.start))
    } else {
        Ok(())
    }
}

/// list all candidate objects of the window, issuing one sequential listing call per hour
/// prefix. An unreachable or empty prefix only reduces the result, it never fails the call
pub async fn list_window_objects (client: &S3Client, bucket: &str, source: &str, window: &TimeWindow, now: DateTime<Utc>)->Result<Vec<CatalogEntry>> {
    check_not_future( window, now)?;

    let mut entries: Vec<CatalogEntry> = Vec::new();
    for prefix in hour_prefixes( source, window) {
        match get_s3_objects( client, bucket, &prefix, None).await {
            Ok(objs) => {
                for o in &objs {
                    if let Some(key) = o.key_str() {
                        entries.push( CatalogEntry{ key: key.to_string(), size: o.size() });
                    }
                }
            }
            Err(e) => warn!("no objects for prefix {}/{}: {}", bucket, prefix, e)
        }
    }

    Ok(entries)
}

/// keep entries that contain at least one of the patterns (if any are given), carry a
/// parseable scan stamp within the window, and align with the sampling interval. Keys
/// without a parseable stamp are dropped, not errored. Listing order is preserved and
/// the operation is idempotent
pub fn filter_entries (entries: Vec<CatalogEntry>, patterns: Option<&[String]>, sampling_interval_minutes: u32, window: &TimeWindow)->Vec<CatalogEntry> {
    let interval = sampling_interval_minutes.max(1);

    entries.into_iter()
        .filter( |e| match patterns {
            Some(ps) => ps.iter().any( |p| e.key.contains( p.as_str())),
            None => true
        })
        .filter( |e| match e.scan_start() {
            Some(dt) => is_between_inclusive( &dt, &window.start, &window.end)
                            && minute_of_day( &dt) % interval == 0,
            None => false
        })
        .collect()
}
