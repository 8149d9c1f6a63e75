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

//! chrono based date/time support functions

use chrono::{DateTime, TimeDelta, TimeZone, Timelike, Utc};

/// something that has a single associated point in time
pub trait Dated {
    fn date (&self)->DateTime<Utc>;
}

#[inline]
pub fn utc_now ()->DateTime<Utc> {
    Utc::now()
}

/// return the full hour for given DateTime (minutes, seconds and nanos all zeroed)
pub fn full_hour<Tz:TimeZone> (dt: &DateTime<Tz>)->DateTime<Tz> {
    dt.with_minute(0).unwrap().with_second(0).unwrap().with_nanosecond(0).unwrap()
}

/// floor given DateTime to the enclosing `interval_min` minute boundary of its hour
/// (seconds and nanos zeroed). An interval of 0 is treated as 1
pub fn floor_to_minute_interval (dt: &DateTime<Utc>, interval_min: u32)->DateTime<Utc> {
    let interval = interval_min.max(1);
    let m = dt.minute() % interval;
    *dt - TimeDelta::minutes(m as i64)
        - TimeDelta::seconds(dt.second() as i64)
        - TimeDelta::nanoseconds(dt.nanosecond() as i64)
}

pub fn is_between_inclusive (dt: &DateTime<Utc>, dt_start: &DateTime<Utc>, dt_end: &DateTime<Utc>)->bool {
    dt >= dt_start && dt <= dt_end
}

/// minutes into the day (hour*60 + minute)
#[inline]
pub fn minute_of_day<Tz:TimeZone> (dt: &DateTime<Tz>)->u32 {
    dt.hour() * 60 + dt.minute()
}
