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

//! band dependent radiometric correction of reprojected ABI data

use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::Serialize;

use geosat_gdal::read_nc_scalar;

use crate::errors::{GeosatGoesError, Result};
use crate::solar::{cos_zenith_grid, MIN_COS_ZENITH};
use crate::GeoExtent;

/// the sentinel marking pixels without defined physical meaning in output grids
pub const NO_DATA_VALUE: f32 = -1.0;

/// physical meaning of the values in a calibrated raster
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize)]
pub enum PhysicalUnit {
    ReflectancePercent,
    BrightnessTemperatureK,
    Radiance,
    Dimensionless,
}

/// correction branch of an ABI band. This is the one place where band ids map to their
/// correction; everything else dispatches over the kind
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum BandKind {
    /// visible and near infrared bands, corrected into reflectance
    Reflective,
    /// infrared bands, inverted into brightness temperature
    Emissive,
    /// band ids outside 1-16 pass through unmodified
    Other,
}

impl BandKind {
    pub fn of (band_id: u32)->BandKind {
        match band_id {
            1..=6 => BandKind::Reflective,
            7..=16 => BandKind::Emissive,
            _ => BandKind::Other
        }
    }
}

#[derive(Debug,Clone,Copy)]
pub struct PlanckCoefficients {
    pub fk1: f64,
    pub fk2: f64,
    pub bc1: f64,
    pub bc2: f64,
}

/// per-scene calibration constants, read from the scalar variables of the scene file
#[derive(Debug,Clone,Copy)]
pub struct CalibrationCoefficients {
    pub band_id: u32,
    pub kind: BandKind,
    pub kappa0: Option<f64>,
    pub planck: Option<PlanckCoefficients>,
}

impl CalibrationCoefficients {
    /// read the coefficients the band correction needs. Only the variables required by
    /// the band kind are touched
    pub fn from_scene_file (path: impl AsRef<Path>)->Result<CalibrationCoefficients> {
        let path = path.as_ref();
        let band_id = read_cal_scalar( path, "band_id")? as u32;
        let kind = BandKind::of( band_id);

        let mut kappa0: Option<f64> = None;
        let mut planck: Option<PlanckCoefficients> = None;

        match kind {
            BandKind::Reflective => {
                kappa0 = Some( read_cal_scalar( path, "kappa0")? );
            }
            BandKind::Emissive => {
                planck = Some( PlanckCoefficients {
                    fk1: read_cal_scalar( path, "planck_fk1")?,
                    fk2: read_cal_scalar( path, "planck_fk2")?,
                    bc1: read_cal_scalar( path, "planck_bc1")?,
                    bc2: read_cal_scalar( path, "planck_bc2")?,
                });
            }
            BandKind::Other => {}
        }

        Ok( CalibrationCoefficients{ band_id, kind, kappa0, planck } )
    }
}

fn read_cal_scalar (path: &Path, var_name: &str)->Result<f64> {
    read_nc_scalar( path, var_name)
        .map_err(|_| GeosatGoesError::MissingCalibrationMetadata( var_name.to_string()))
}

/// the variables that undergo radiometric correction
pub fn needs_correction (variable: &str)->bool {
    variable == "Rad" || variable == "CMI"
}

/// linear transform from stored sample values into physical units
pub fn dequantize (data: &mut Array2<f32>, scale: f64, offset: f64) {
    data.mapv_inplace( |v| ((v as f64) * scale + offset) as f32);
}

/// kappa scaling plus solar zenith correction into percent reflectance (bands 1-6).
/// Pixels on the night side of the terminator become non-finite; the result is held in
/// whole percent steps (i16 value range)
pub fn radiance_to_reflectance (data: &Array2<f32>, kappa0: f64, date: &DateTime<Utc>, extent: &GeoExtent)->Array2<f32> {
    let (rows, cols) = data.dim();
    let cos_zenith = cos_zenith_grid( date, extent, rows, cols);

    Array2::from_shape_fn( (rows, cols), |idx| {
        let l = data[idx] as f64;
        let cz = cos_zenith[idx];
        if !l.is_finite() || cz < MIN_COS_ZENITH {
            return f32::NAN
        }
        let refl = (l * kappa0 / cz).clamp(0.0, 1.0) * 100.0;
        (refl as i16) as f32
    })
}

/// Planck inversion into brightness temperature in Kelvin (bands 7-16)
pub fn radiance_to_brightness_temperature (data: &Array2<f32>, p: &PlanckCoefficients)->Array2<f32> {
    data.mapv( |v| {
        let l = v as f64;
        (((p.fk2 / (p.fk1 / l + 1.0).ln()) - p.bc1) / p.bc2) as f32
    })
}

/// pre-calibrated CMI reflectance scaled to percent (u8 value range)
pub fn cmi_to_reflectance_percent (data: &Array2<f32>)->Array2<f32> {
    data.mapv( |v| if v.is_finite() { ((v * 100.0) as u8) as f32 } else { f32::NAN })
}

/// apply the band dependent correction for a `Rad` or `CMI` variable. Band ids outside
/// 1-16 pass through unmodified, which is a fallback and not an error
pub fn apply_correction (variable: &str, data: Array2<f32>, coeffs: &CalibrationCoefficients,
                         date: &DateTime<Utc>, extent: &GeoExtent)->Result<(Array2<f32>,PhysicalUnit)> {
    match variable {
        "Rad" => match coeffs.kind {
            BandKind::Reflective => {
                let kappa0 = coeffs.kappa0.ok_or_else(|| GeosatGoesError::MissingCalibrationMetadata("kappa0".into()))?;
                Ok( (radiance_to_reflectance( &data, kappa0, date, extent), PhysicalUnit::ReflectancePercent) )
            }
            BandKind::Emissive => {
                let planck = coeffs.planck.ok_or_else(|| GeosatGoesError::MissingCalibrationMetadata("planck_fk1".into()))?;
                Ok( (radiance_to_brightness_temperature( &data, &planck), PhysicalUnit::BrightnessTemperatureK) )
            }
            BandKind::Other => Ok( (data, PhysicalUnit::Radiance) )
        },
        "CMI" => match coeffs.kind {
            BandKind::Reflective => Ok( (cmi_to_reflectance_percent( &data), PhysicalUnit::ReflectancePercent) ),
            BandKind::Emissive => Ok( (data, PhysicalUnit::BrightnessTemperatureK) ),
            BandKind::Other => Ok( (data, PhysicalUnit::Dimensionless) )
        },
        _ => Ok( (data, PhysicalUnit::Dimensionless) )
    }
}

/// replace all non-finite values with the no-data sentinel. After this every value of the
/// grid is either finite or equal to `no_data`
pub fn assign_no_data (data: &mut Array2<f32>, no_data: f32) {
    data.mapv_inplace( |v| if v.is_finite() { v } else { no_data });
}
