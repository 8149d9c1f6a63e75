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

use chrono::{DateTime, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeosatGoesError>;

#[derive(Error,Debug)]
pub enum GeosatGoesError {
    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("config parse error {0}")]
    ConfigParseError( String ),

    #[error("invalid date format {0}")]
    InvalidDateFormat( String ),

    #[error("invalid date range {0}")]
    InvalidDateRange( String ),

    #[error("requested start time {0} is in the future")]
    FutureDate( DateTime<Utc> ),

    #[error("missing projection metadata {0}")]
    MissingProjectionMetadata( String ),

    #[error("missing calibration metadata {0}")]
    MissingCalibrationMetadata( String ),

    #[error("unsupported output format {0}")]
    UnsupportedOutputFormat( String ),

    #[error("No object key error")]
    NoObjectKeyError(),

    #[error("S3 error {0}")]
    S3Error( #[from] geosat_common::s3::GeosatS3Error),

    // pass through for errors in our gdal support crate
    #[error("gdal support error {0}")]
    GeosatGdalError( #[from] geosat_gdal::errors::GeosatGdalError),

    // pass through for errors in the gdal crate itself
    #[error("gdal error {0}")]
    GdalError( #[from] geosat_gdal::GdalError),

    #[error("String to float conversion error {0}")]
    FloatConversionError( #[from] std::num::ParseFloatError),

    #[error("date/time parse error {0}")]
    DateParseError( #[from] chrono::ParseError),

    #[error("Misc error {0}")]
    MiscError( String ),
}

pub fn misc_error (msg: impl ToString)->GeosatGoesError {
    GeosatGoesError::MiscError( msg.to_string())
}
