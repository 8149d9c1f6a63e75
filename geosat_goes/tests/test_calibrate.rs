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
use ndarray::arr2;

use geosat_goes::{
    apply_correction, assign_no_data, dequantize, radiance_to_brightness_temperature,
    radiance_to_reflectance, cmi_to_reflectance_percent, BandKind, CalibrationCoefficients,
    GeoExtent, PhysicalUnit, PlanckCoefficients, NO_DATA_VALUE,
};

// run with "cargo test --test test_calibrate -- --nocapture"

fn dt (s: &str)->DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn coeffs (band_id: u32)->CalibrationCoefficients {
    CalibrationCoefficients {
        band_id,
        kind: BandKind::of(band_id),
        kappa0: Some(0.0019),
        planck: Some( PlanckCoefficients{ fk1: 8510.22, fk2: 1289.2, bc1: 0.4827, bc2: 0.9992 }),
    }
}

#[test]
fn test_band_kind_dispatch() {
    assert_eq!( BandKind::of(1), BandKind::Reflective);
    assert_eq!( BandKind::of(6), BandKind::Reflective);
    assert_eq!( BandKind::of(7), BandKind::Emissive);
    assert_eq!( BandKind::of(16), BandKind::Emissive);
    assert_eq!( BandKind::of(0), BandKind::Other);
    assert_eq!( BandKind::of(17), BandKind::Other);
}

#[test]
fn test_dequantize() {
    let mut data = arr2( &[[10.0f32, 20.0], [30.0, 40.0]]);
    dequantize( &mut data, 2.0, 1.0);

    assert_eq!( data, arr2( &[[21.0f32, 41.0], [61.0, 81.0]]));
}

#[test]
fn test_dequantize_unity_is_identity() {
    // the DQF quality flag variable is stored unscaled (scale 1, offset 0)
    let mut data = arr2( &[[10.0f32, 20.0], [30.0, 40.0]]);
    dequantize( &mut data, 1.0, 0.0);

    assert_eq!( data, arr2( &[[10.0f32, 20.0], [30.0, 40.0]]));
}

#[test]
fn test_planck_inversion_closed_form() {
    let p = PlanckCoefficients{ fk1: 8510.22, fk2: 1289.2, bc1: 0.4827, bc2: 0.9992 };
    let data = arr2( &[[50.0f32, 100.0], [25.0, 75.0]]);
    let bt = radiance_to_brightness_temperature( &data, &p);

    for (v, t) in data.iter().zip( bt.iter()) {
        let l = *v as f64;
        let expected = ((p.fk2 / (p.fk1 / l + 1.0).ln()) - p.bc1) / p.bc2;
        assert!( ((*t as f64) - expected).abs() < 1e-3, "{} != {}", t, expected);
        assert!( *t > 200.0 && *t < 400.0, "implausible brightness temperature {}", t);
    }
}

#[test]
fn test_night_side_reflectance_is_all_sentinel() {
    // 12Z puts the whole 170E..180E strip into deep night, every pixel ends up undefined
    let date = dt("2024-03-20T12:00:00Z");
    let extent = GeoExtent::new( 170.0, 180.0, -10.0, 10.0);
    let data = arr2( &[[100.0f32, 200.0], [300.0, 400.0]]);

    let mut refl = radiance_to_reflectance( &data, 0.0019, &date, &extent);
    assert!( refl.iter().all( |v| v.is_nan()));

    assign_no_data( &mut refl, NO_DATA_VALUE);
    assert!( refl.iter().all( |v| *v == NO_DATA_VALUE));
}

#[test]
fn test_day_side_reflectance_percent() {
    // near the subsolar point cos zenith is ~1, so reflectance is ~kappa0 * L * 100
    let date = dt("2024-03-20T12:00:00Z");
    let extent = GeoExtent::new( -2.0, 2.0, -2.0, 2.0);
    let data = arr2( &[[100.0f32, 200.0], [300.0, 400.0]]);

    let refl = radiance_to_reflectance( &data, 0.0019, &date, &extent);

    for v in refl.iter() {
        assert!( v.is_finite());
        assert!( *v >= 0.0 && *v <= 100.0);
        assert_eq!( v.fract(), 0.0); // whole percent steps
    }
    // 400 * 0.0019 = 0.76 -> 76% at cos zenith 1, slightly more after the correction
    assert!( refl[[1,1]] >= 75.0);
}

#[test]
fn test_reflectance_is_clipped() {
    let date = dt("2024-03-20T12:00:00Z");
    let extent = GeoExtent::new( -2.0, 2.0, -2.0, 2.0);
    let data = arr2( &[[1000.0f32]]); // kappa0 * 1000 = 1.9, well above the ratio clip

    let refl = radiance_to_reflectance( &data, 0.0019, &date, &extent);
    assert_eq!( refl[[0,0]], 100.0);
}

#[test]
fn test_cmi_reflectance_percent() {
    let data = arr2( &[[0.0f32, 0.5], [1.0, f32::NAN]]);
    let out = cmi_to_reflectance_percent( &data);

    assert_eq!( out[[0,0]], 0.0);
    assert_eq!( out[[0,1]], 50.0);
    assert_eq!( out[[1,0]], 100.0);
    assert!( out[[1,1]].is_nan());
}

#[test]
fn test_apply_correction_units() {
    let date = dt("2024-03-20T12:00:00Z");
    let extent = GeoExtent::new( -2.0, 2.0, -2.0, 2.0);
    let data = arr2( &[[250.0f32, 260.0], [270.0, 280.0]]);

    let (_, unit) = apply_correction( "Rad", data.clone(), &coeffs(2), &date, &extent).unwrap();
    assert_eq!( unit, PhysicalUnit::ReflectancePercent);

    let (_, unit) = apply_correction( "Rad", data.clone(), &coeffs(13), &date, &extent).unwrap();
    assert_eq!( unit, PhysicalUnit::BrightnessTemperatureK);

    let (out, unit) = apply_correction( "CMI", data.clone(), &coeffs(13), &date, &extent).unwrap();
    assert_eq!( unit, PhysicalUnit::BrightnessTemperatureK);
    assert_eq!( out, data); // pre-calibrated emissive CMI passes through

    // band ids outside 1-16 pass through unmodified, and are not an error
    let (out, unit) = apply_correction( "Rad", data.clone(), &coeffs(0), &date, &extent).unwrap();
    assert_eq!( unit, PhysicalUnit::Radiance);
    assert_eq!( out, data);
}

#[test]
fn test_assign_no_data() {
    let mut data = arr2( &[[1.0f32, f32::NAN], [f32::INFINITY, 4.0]]);
    assign_no_data( &mut data, NO_DATA_VALUE);

    assert_eq!( data, arr2( &[[1.0f32, -1.0], [-1.0, 4.0]]));
}
