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

//! acquisition and reprojection of GOES-R ABI satellite imagery.
//!
//! The crate covers two independent pipelines that only compose through the filesystem:
//!
//! 1. acquisition: resolve a (possibly fuzzy) date input into a UTC time window, list the
//!    matching objects on the public `noaa-goes*` S3 buckets, filter them by name pattern
//!    and scan start alignment, and download the selection with a bounded worker pool
//!    ([`window`], [`catalog`], [`fetch`])
//! 2. reprojection: re-sample a downloaded fixed grid scene onto an equirectangular grid,
//!    dequantize and apply band dependent radiometric correction, and optionally export
//!    the result ([`reproject`], [`calibrate`], [`solar`])

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

mod errors;
pub use errors::*;

pub mod window;
pub use window::*;

pub mod catalog;
pub use catalog::*;

pub mod fetch;
pub use fetch::*;

pub mod solar;

pub mod calibrate;
pub use calibrate::*;

pub mod reproject;
pub use reproject::*;

/* #region GOES-R filename encoding ***********************************************************************/

lazy_static! {
    static ref FILENAME_RE: Regex = Regex::new(
        r"(?:.*/)?([A-Z0-9]+)_([A-Za-z0-9]+)-(L[12][A-Za-z0-9]*)-([A-Za-z0-9]+)-(M[0-9A-Z]+)_G(\d+)_s(\d+)_e(\d+)_c(\d+)\.nc").unwrap();
    static ref SCAN_DTG_RE: Regex = Regex::new(
        r"_s(\d{4})(\d{3})(\d{2})(\d{2})(\d{2})").unwrap();
}

/// file info as encoded in ABI object keys and the files downloaded from them.
///
/// schema:
///        «sys_env» _ «instrument» - «level» - «product» - «mode» _G «satellite» _s «start» _e «end» _c «create» .nc
///
/// with times given as `yyyydddHHMMSSs` (day-of-year based, UTC, trailing tenths of seconds).
///
/// example: `OR_ABI-L2-CMIPF-M6C02_G16_s20241380550205_e20241380559513_c20241380559581.nc`
#[derive(Debug,Clone)]
pub struct GoesFileInfo {
    pub system_env: String, // e.g. "OR": operational realtime
    pub instrument: String, // e.g. "ABI"
    pub level: String,      // "L1b" or "L2"
    pub product: String,    // e.g. "CMIPF"
    pub mode: String,       // scan mode plus optional channel, e.g. "M6C02"
    pub satellite: u8,      // 16 or 18
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub create_time: DateTime<Utc>,
}

/// parse GoesFileInfo from given pathname or object key
pub fn parse_filename (path: impl AsRef<Path>)->Option<GoesFileInfo> {
    let filename = path.as_ref().file_name()?.to_str()?;
    let cap = FILENAME_RE.captures(filename)?;

    Some( GoesFileInfo {
        system_env: cap[1].to_string(),
        instrument: cap[2].to_string(),
        level: cap[3].to_string(),
        product: cap[4].to_string(),
        mode: cap[5].to_string(),
        satellite: cap[6].parse().ok()?,
        start_time: parse_scan_dtg( &cap[7])?,
        end_time: parse_scan_dtg( &cap[8])?,
        create_time: parse_scan_dtg( &cap[9])?,
    })
}

/// parse a `yyyydddHHMMSS[s]` date/time group. Calendar consistency is checked, so a
/// day-of-year that does not exist in the given year yields None
pub fn parse_scan_dtg (s: &str)->Option<DateTime<Utc>> {
    if s.len() < 13 { return None }

    let year = s[0..4].parse::<i32>().ok()?;
    let doy = s[4..7].parse::<u32>().ok()?;
    let hour = s[7..9].parse::<u32>().ok()?;
    let minute = s[9..11].parse::<u32>().ok()?;
    let second = s[11..13].parse::<u32>().ok()?;

    let nd = NaiveDate::from_yo_opt( year, doy)?;
    let nt = NaiveTime::from_hms_opt( hour, minute, second)?;
    Some( NaiveDateTime::new( nd, nt).and_utc() )
}

/// scan start time embedded in an object key (the `_s…` group), if there is one
pub fn scan_start_of_key (key: &str)->Option<DateTime<Utc>> {
    let m = SCAN_DTG_RE.find(key)?;
    parse_scan_dtg( &key[m.start()+2..m.end()])
}

/// the ABI processing level encoded in the S3 path. Radiances are the only L1b products
pub fn abi_level_for (product: &str)->&'static str {
    if product.starts_with("Rad") { "L1b" } else { "L2" }
}

/* #endregion GOES-R filename encoding */

/* #region geographic extent ******************************************************************************/

/// geographic target extent in degrees: `[lon_min, lon_max, lat_min, lat_max]`
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct GeoExtent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl GeoExtent {
    pub fn new (lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64)->Self {
        GeoExtent{ lon_min, lon_max, lat_min, lat_max }
    }

    #[inline] pub fn width_deg (&self)->f64 { self.lon_max - self.lon_min }

    #[inline] pub fn height_deg (&self)->f64 { self.lat_max - self.lat_min }

    pub fn as_array (&self)->[f64;4] {
        [self.lon_min, self.lon_max, self.lat_min, self.lat_max]
    }
}

/* #endregion geographic extent */

/* #region configuration **********************************************************************************/

/// RON-serializable specification of a GOES data source on the public AWS buckets
#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct GoesSourceConfig {
    pub satellite: u8,                 // 16 or 18
    pub s3_region: String,             // e.g. "us-east-1"
    pub product: String,               // e.g. "CMIPF"
    pub patterns: Option<Vec<String>>, // e.g. channel selectors such as "C02"
    pub sampling_interval: u32,        // minutes between kept scan starts
    pub workers: usize,                // concurrent downloads
    pub data_dir: String,              // where downloaded scenes are stored
}

impl GoesSourceConfig {
    pub fn bucket (&self)->String {
        format!("noaa-goes{}", self.satellite)
    }

    /// the toplevel S3 path of this product, e.g. "ABI-L2-CMIPF"
    pub fn source (&self)->String {
        format!("ABI-{}-{}", abi_level_for(&self.product), self.product)
    }
}

/// read a RON config of given type from a file
pub fn load_config<C: DeserializeOwned> (path: impl AsRef<Path>)->Result<C> {
    let input = std::fs::read_to_string( path.as_ref())?;
    ron::from_str( &input).map_err(|e| GeosatGoesError::ConfigParseError( e.to_string()))
}

/* #endregion configuration */
