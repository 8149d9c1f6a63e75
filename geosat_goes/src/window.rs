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

//! resolution of user provided date inputs into concrete acquisition time windows

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

use geosat_common::datetime::floor_to_minute_interval;

use crate::errors::{GeosatGoesError, Result};

/// minutes between a scan start and the object showing up on the public bucket
pub const ACQUISITION_LATENCY_MINUTES: i64 = 12;

/// scan start times on the full disk products fall on this boundary
const LATEST_FLOOR_MINUTES: u32 = 10;

/// what the user asked for, before resolution
#[derive(Debug,Clone,PartialEq)]
pub enum DateSpec {
    /// the most recent scan that can be expected to be complete
    Latest,
    /// a single point in time (`YYYYMMDDhhmm`, `YYYYMMDDhh` or `YYYYMMDD`)
    At(String),
    /// a closed interval between two such points
    Between(String, String),
}

impl DateSpec {
    /// map 0..2 positional date arguments onto a DateSpec
    pub fn from_args (dates: &[String])->Result<DateSpec> {
        match dates.len() {
            0 => Ok( DateSpec::Latest ),
            1 => Ok( DateSpec::At( dates[0].clone()) ),
            2 => Ok( DateSpec::Between( dates[0].clone(), dates[1].clone()) ),
            _ => Err( GeosatGoesError::InvalidDateFormat("at most two date values allowed".into()))
        }
    }
}

/// a closed `[start,end]` UTC interval. `coarse` records that the input had less than
/// minute precision, which relaxes downstream sampling filters
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub coarse: bool,
}

impl TimeWindow {
    /// resolve a DateSpec against the provided current time. This is a pure function -
    /// `now` is injected so that callers (and tests) control the clock
    pub fn resolve (spec: &DateSpec, now: DateTime<Utc>)->Result<TimeWindow> {
        match spec {
            DateSpec::Latest => {
                let dt = floor_to_minute_interval(
                    &(now - TimeDelta::minutes(ACQUISITION_LATENCY_MINUTES)), LATEST_FLOOR_MINUTES);
                Ok( TimeWindow{ start: dt, end: dt, coarse: false } )
            }
            DateSpec::At(s) => {
                let (dt, coarse) = parse_date_value(s)?;
                Ok( TimeWindow{ start: dt, end: dt, coarse } )
            }
            DateSpec::Between(s0, s1) => {
                let (start, coarse0) = parse_date_value(s0)?;
                let (end, coarse1) = parse_date_value(s1)?;
                if start > end {
                    return Err( GeosatGoesError::InvalidDateRange( format!("{} > {}", s0, s1)))
                }
                Ok( TimeWindow{ start, end, coarse: coarse0 || coarse1 } )
            }
        }
    }

    #[inline] pub fn is_instant (&self)->bool { self.start == self.end }
}

/// parse a `YYYYMMDDhhmm`, `YYYYMMDDhh` or `YYYYMMDD` value. The truncated forms report
/// the coarse flag, any other length is an InvalidDateFormat error
fn parse_date_value (s: &str)->Result<(DateTime<Utc>,bool)> {
    let bad = || GeosatGoesError::InvalidDateFormat(
        format!("'{}' (use YYYYMMDDhhmm, YYYYMMDDhh or YYYYMMDD)", s));

    match s.len() {
        12 => {
            let ndt = NaiveDateTime::parse_from_str( s, "%Y%m%d%H%M").map_err(|_| bad())?;
            Ok( (ndt.and_utc(), false) )
        }
        10 => {
            let nd = NaiveDate::parse_from_str( &s[..8], "%Y%m%d").map_err(|_| bad())?;
            let hour = s[8..10].parse::<u32>().map_err(|_| bad())?;
            let nt = NaiveTime::from_hms_opt( hour, 0, 0).ok_or_else(bad)?;
            Ok( (NaiveDateTime::new( nd, nt).and_utc(), true) )
        }
        8 => {
            let nd = NaiveDate::parse_from_str( s, "%Y%m%d").map_err(|_| bad())?;
            let ndt = nd.and_hms_opt(0, 0, 0).ok_or_else(bad)?;
            Ok( (ndt.and_utc(), true) )
        }
        _ => Err( bad() )
    }
}
