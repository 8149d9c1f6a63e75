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

use thiserror::Error;

use crate::pc_char_to_string;

pub type Result<T> = std::result::Result<T, GeosatGdalError>;

#[derive(Error,Debug)]
pub enum GeosatGdalError {
    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    // pass through for errors in the gdal crate
    #[error("gdal error {0}")]
    GdalError( #[from] gdal::errors::GdalError),

    #[error("GDAL function error {0}")]
    GdalFunctionError( String ),

    #[error("misc error {0}")]
    MiscError( String ),
}

pub fn misc_error (msg: impl ToString)->GeosatGdalError {
    GeosatGdalError::MiscError( msg.to_string())
}

/// retrieve the last error GDAL recorded on this thread
pub fn last_gdal_error ()->GeosatGdalError {
    let msg = pc_char_to_string( unsafe { gdal_sys::CPLGetLastErrorMsg() });
    GeosatGdalError::GdalFunctionError( msg)
}
