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

use chrono::{DateTime, Utc};
use geosat_goes::{
    check_not_future, filter_entries, hour_prefix, hour_prefixes, CatalogEntry, DateSpec,
    GeosatGoesError, TimeWindow,
};

// run with "cargo test --test test_catalog -- --nocapture"

fn dt (s: &str)->DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn window (s0: &str, s1: &str)->TimeWindow {
    TimeWindow::resolve( &DateSpec::Between(s0.into(), s1.into()), dt("2025-01-01T00:00:00Z")).unwrap()
}

fn entry (channel: &str, stamp: &str)->CatalogEntry {
    CatalogEntry::new( format!(
        "ABI-L2-CMIPF/2024/001/12/OR_ABI-L2-CMIPF-M6{}_G16_s{}_e{}_c{}.nc", channel, stamp, stamp, stamp))
}

#[test]
fn test_hour_prefix() {
    assert_eq!( hour_prefix("ABI-L2-CMIPF", &dt("2024-05-17T05:56:00Z")), "ABI-L2-CMIPF/2024/138/05/");
}

#[test]
fn test_hour_prefixes() {
    let w = window("2024051705", "202405170712");
    let ps = hour_prefixes("ABI-L2-CMIPF", &w);

    assert_eq!( ps, vec![
        "ABI-L2-CMIPF/2024/138/05/",
        "ABI-L2-CMIPF/2024/138/06/",
        "ABI-L2-CMIPF/2024/138/07/",
    ]);
}

#[test]
fn test_hour_prefixes_instant() {
    // a single instant still lists the hour that contains it
    let w = TimeWindow::resolve( &DateSpec::At("202405170556".into()), dt("2025-01-01T00:00:00Z")).unwrap();
    let ps = hour_prefixes("ABI-L2-CMIPF", &w);

    assert_eq!( ps, vec!["ABI-L2-CMIPF/2024/138/05/"]);
}

#[test]
fn test_check_not_future() {
    let w = TimeWindow::resolve( &DateSpec::At("202405170556".into()), dt("2025-01-01T00:00:00Z")).unwrap();
    assert!( check_not_future( &w, dt("2025-01-01T00:00:00Z")).is_ok());
    assert!( matches!( check_not_future( &w, dt("2024-05-17T05:00:00Z")), Err(GeosatGoesError::FutureDate(_))));
}

#[test]
fn test_filter_sampling_interval() {
    let w = window("202401011150", "202401011310");
    let entries = vec![
        entry("C02", "20240011200000"), // minute 00 - kept
        entry("C02", "20240011205000"), // minute 05 - dropped
        entry("C02", "20240011210000"), // minute 10 - kept
        entry("C02", "20240011250000"), // minute 50 - kept
    ];

    let kept = filter_entries( entries, None, 10, &w);
    assert_eq!( kept.len(), 3);
    assert!( kept.iter().all(|e| !e.key.contains("_s20240011205000")));
}

#[test]
fn test_filter_window_bounds() {
    let w = window("202401011200", "202401011210");
    let entries = vec![
        entry("C02", "20240011150000"), // before the window
        entry("C02", "20240011200000"), // on the start boundary - kept
        entry("C02", "20240011210000"), // on the end boundary - kept
        entry("C02", "20240011220000"), // after the window
    ];

    assert_eq!( filter_entries( entries, None, 10, &w).len(), 2);
}

#[test]
fn test_filter_patterns_or() {
    let w = window("202401011150", "202401011310");
    let entries = vec![
        entry("C02", "20240011200000"),
        entry("C03", "20240011200000"),
        entry("C13", "20240011200000"),
    ];
    let patterns = vec!["C02".to_string(), "C13".to_string()];

    let kept = filter_entries( entries, Some(&patterns), 10, &w);
    assert_eq!( kept.len(), 2);
    assert!( kept[0].key.contains("C02"));
    assert!( kept[1].key.contains("C13"));
}

#[test]
fn test_filter_drops_unparseable_keys() {
    let w = window("202401011150", "202401011310");
    let entries = vec![
        CatalogEntry::new("ABI-L2-CMIPF/2024/001/12/no_scan_stamp.nc"),
        entry("C02", "20240011200000"),
        CatalogEntry::new("ABI-L2-CMIPF/2023/366/12/OR_ABI-L2-CMIPF-M6C02_G16_s20233661200000_e1_c1.nc"), // day 366 of a non leap year
    ];

    let kept = filter_entries( entries, None, 10, &w);
    assert_eq!( kept.len(), 1);
}

#[test]
fn test_filter_idempotent() {
    let w = window("202401011150", "202401011310");
    let entries = vec![
        entry("C02", "20240011200000"),
        entry("C02", "20240011205000"),
        entry("C13", "20240011210000"),
    ];
    let patterns = vec!["C02".to_string()];

    let once = filter_entries( entries, Some(&patterns), 10, &w);
    let twice = filter_entries( once.clone(), Some(&patterns), 10, &w);
    assert_eq!( once, twice);
}

#[test]
fn test_filter_preserves_order() {
    let w = window("202401011150", "202401011310");
    let entries = vec![
        entry("C02", "20240011210000"),
        entry("C02", "20240011200000"), // listing order is kept, no sorting
    ];

    let kept = filter_entries( entries.clone(), None, 10, &w);
    assert_eq!( kept, entries);
}
