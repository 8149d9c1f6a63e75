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
#![allow(unused)]

use chrono::{DateTime, Datelike, Timelike, Utc};
use geosat_goes::{DateSpec, GeosatGoesError, TimeWindow};

// run with "cargo test --test test_window -- --nocapture"

fn dt (s: &str)->DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn now ()->DateTime<Utc> {
    dt("2024-05-17T12:05:30Z")
}

#[test]
fn test_minute_precision() {
    let w = TimeWindow::resolve( &DateSpec::At("202405170556".into()), now()).unwrap();

    assert!( w.is_instant());
    assert!( !w.coarse);
    assert_eq!( (w.start.year(), w.start.month(), w.start.day()), (2024, 5, 17));
    assert_eq!( (w.start.hour(), w.start.minute(), w.start.second()), (5, 56, 0));
}

#[test]
fn test_hour_precision() {
    let w = TimeWindow::resolve( &DateSpec::At("2024051705".into()), now()).unwrap();

    assert!( w.is_instant());
    assert!( w.coarse);
    assert_eq!( (w.start.hour(), w.start.minute()), (5, 0));
}

#[test]
fn test_day_precision() {
    let w = TimeWindow::resolve( &DateSpec::At("20240517".into()), now()).unwrap();

    assert!( w.is_instant());
    assert!( w.coarse);
    assert_eq!( (w.start.hour(), w.start.minute(), w.start.second()), (0, 0, 0));
}

#[test]
fn test_latest() {
    // 12:05:30 minus the 12 min acquisition latency is 11:53:30, floored to 11:50:00
    let w = TimeWindow::resolve( &DateSpec::Latest, now()).unwrap();

    assert!( w.is_instant());
    assert!( !w.coarse);
    assert_eq!( w.start, dt("2024-05-17T11:50:00Z"));
}

#[test]
fn test_range() {
    let w = TimeWindow::resolve(
        &DateSpec::Between("2024051705".into(), "202405170650".into()), now()).unwrap();

    assert_eq!( w.start, dt("2024-05-17T05:00:00Z"));
    assert_eq!( w.end, dt("2024-05-17T06:50:00Z"));
    assert!( w.coarse); // one truncated endpoint is enough
}

#[test]
fn test_invalid_format() {
    for input in ["20240517055", "2024", "2024051x0556", "20241301", ""] {
        let res = TimeWindow::resolve( &DateSpec::At(input.into()), now());
        assert!( matches!( res, Err(GeosatGoesError::InvalidDateFormat(_))), "accepted '{}'", input);
    }
}

#[test]
fn test_invalid_range() {
    let res = TimeWindow::resolve(
        &DateSpec::Between("202405170600".into(), "202405170500".into()), now());
    assert!( matches!( res, Err(GeosatGoesError::InvalidDateRange(_))));
}

#[test]
fn test_from_args() {
    assert_eq!( DateSpec::from_args(&[]).unwrap(), DateSpec::Latest);
    assert_eq!( DateSpec::from_args(&["20240517".into()]).unwrap(), DateSpec::At("20240517".into()));

    let too_many: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
    assert!( DateSpec::from_args(&too_many).is_err());
}
