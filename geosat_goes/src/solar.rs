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

//! solar geometry for the reflective band correction. Declination and equation of time
//! use the Spencer (1971) fourier series, which is accurate to well below the ABI pixel
//! scale for terminator masking

use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Timelike, Utc};
use ndarray::Array2;

use crate::GeoExtent;

/// cos of the solar zenith angle below which reflectance is undefined (terminator region)
pub const MIN_COS_ZENITH: f64 = 0.019;

/// fractional year in radians
fn fractional_year (date: &DateTime<Utc>)->f64 {
    let doy = date.ordinal() as f64;
    let hour = date.hour() as f64;
    (2.0 * PI / 365.0) * (doy - 1.0 + (hour - 12.0) / 24.0)
}

/// solar declination in radians for a fractional year
pub fn solar_declination (g: f64)->f64 {
    0.006918
        - 0.399912 * g.cos() + 0.070257 * g.sin()
        - 0.006758 * (2.0*g).cos() + 0.000907 * (2.0*g).sin()
        - 0.002697 * (3.0*g).cos() + 0.001480 * (3.0*g).sin()
}

/// equation of time in minutes for a fractional year
pub fn equation_of_time (g: f64)->f64 {
    229.18 * (0.000075
        + 0.001868 * g.cos() - 0.032077 * g.sin()
        - 0.014615 * (2.0*g).cos() - 0.040849 * (2.0*g).sin())
}

/// cosine of the solar zenith angle at the given position and UTC time
pub fn cos_solar_zenith (date: &DateTime<Utc>, lat_deg: f64, lon_deg: f64)->f64 {
    let g = fractional_year(date);
    let decl = solar_declination(g);

    let utc_minutes = (date.hour() * 60 + date.minute()) as f64 + (date.second() as f64) / 60.0;
    let true_solar_minutes = utc_minutes + equation_of_time(g) + 4.0 * lon_deg;
    let hour_angle = (true_solar_minutes / 4.0 - 180.0).to_radians();

    let lat = lat_deg.to_radians();
    lat.sin() * decl.sin() + lat.cos() * decl.cos() * hour_angle.cos()
}

/// per-pixel cos zenith over an extent: latitude rows from extent top to bottom, longitude
/// columns from left to right, both endpoints included, same shape as the data grid
pub fn cos_zenith_grid (date: &DateTime<Utc>, extent: &GeoExtent, rows: usize, cols: usize)->Array2<f64> {
    let lat_step = if rows > 1 { (extent.lat_min - extent.lat_max) / ((rows - 1) as f64) } else { 0.0 };
    let lon_step = if cols > 1 { (extent.lon_max - extent.lon_min) / ((cols - 1) as f64) } else { 0.0 };

    Array2::from_shape_fn( (rows, cols), |(j,i)| {
        let lat = extent.lat_max + lat_step * (j as f64);
        let lon = extent.lon_min + lon_step * (i as f64);
        cos_solar_zenith( date, lat, lon)
    })
}
