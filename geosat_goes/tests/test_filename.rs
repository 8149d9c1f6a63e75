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

use chrono::{Datelike, Timelike};
use geosat_goes::{abi_level_for, parse_filename, parse_scan_dtg, scan_start_of_key};

// run with "cargo test --test test_filename -- --nocapture"

#[test]
fn test_parse_filename() {
    let info = parse_filename("OR_ABI-L2-CMIPF-M6C02_G16_s20241380550205_e20241380559513_c20241380559581.nc").unwrap();

    assert_eq!( info.system_env, "OR");
    assert_eq!( info.instrument, "ABI");
    assert_eq!( info.level, "L2");
    assert_eq!( info.product, "CMIPF");
    assert_eq!( info.mode, "M6C02");
    assert_eq!( info.satellite, 16);

    // day 138 of 2024 is May 17
    assert_eq!( (info.start_time.year(), info.start_time.month(), info.start_time.day()), (2024, 5, 17));
    assert_eq!( (info.start_time.hour(), info.start_time.minute(), info.start_time.second()), (5, 50, 20));
    assert!( info.end_time > info.start_time);
    assert!( info.create_time > info.end_time);
}

#[test]
fn test_parse_filename_with_path() {
    let info = parse_filename("data/goes16/OR_ABI-L1b-RadF-M6C07_G18_s20241380550205_e20241380559513_c20241380559581.nc").unwrap();

    assert_eq!( info.level, "L1b");
    assert_eq!( info.product, "RadF");
    assert_eq!( info.satellite, 18);
}

#[test]
fn test_parse_filename_rejects_foreign_names() {
    assert!( parse_filename("CMIPF_202405170550.tif").is_none());
    assert!( parse_filename("").is_none());
}

#[test]
fn test_scan_dtg_calendar_validation() {
    assert!( parse_scan_dtg("20241380550205").is_some());
    assert!( parse_scan_dtg("20243660000000").is_some()); // 2024 is a leap year
    assert!( parse_scan_dtg("20233660000000").is_none()); // 2023 is not
    assert!( parse_scan_dtg("20240002400000").is_none()); // day 000 / hour 24
    assert!( parse_scan_dtg("2024").is_none());
}

#[test]
fn test_scan_start_of_key() {
    let dt = scan_start_of_key("ABI-L2-CMIPF/2024/138/05/OR_ABI-L2-CMIPF-M6C02_G16_s20241380550205_e20241380559513_c20241380559581.nc").unwrap();
    assert_eq!( (dt.ordinal(), dt.hour(), dt.minute()), (138, 5, 50));

    assert!( scan_start_of_key("ABI-L2-CMIPF/2024/138/05/no_stamp.nc").is_none());
}

#[test]
fn test_abi_level() {
    assert_eq!( abi_level_for("RadF"), "L1b");
    assert_eq!( abi_level_for("RadC"), "L1b");
    assert_eq!( abi_level_for("CMIPF"), "L2");
    assert_eq!( abi_level_for("FDCC"), "L2");
}
