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

//! minimal warp support: re-sample a georeferenced source dataset into an already
//! georeferenced target grid (usually a MEM dataset the caller post-processes)

use std::ffi::CString;
use std::ptr::{null, null_mut};

use gdal::Dataset;
use gdal_sys::{self, GDALResampleAlg};

use crate::errors::Result;
use crate::ok_ce_none;

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum ResampleAlg {
    NearestNeighbour,
    Bilinear,
    Cubic,
    CubicSpline,
    Lanczos,
    Average,
    Mode
}

impl ResampleAlg {
    fn to_gdal (&self)->GDALResampleAlg::Type {
        match self {
            ResampleAlg::NearestNeighbour => GDALResampleAlg::GRA_NearestNeighbour,
            ResampleAlg::Bilinear => GDALResampleAlg::GRA_Bilinear,
            ResampleAlg::Cubic => GDALResampleAlg::GRA_Cubic,
            ResampleAlg::CubicSpline => GDALResampleAlg::GRA_CubicSpline,
            ResampleAlg::Lanczos => GDALResampleAlg::GRA_Lanczos,
            ResampleAlg::Average => GDALResampleAlg::GRA_Average,
            ResampleAlg::Mode => GDALResampleAlg::GRA_Mode,
        }
    }
}

/// builder style wrapper around `GDALReprojectImage`. Source and target SRS/geotransforms
/// are taken from the respective datasets, so the target has to be fully georeferenced
/// before exec() is called
pub struct GridWarper<'a> {
    src_ds: &'a Dataset,
    tgt_ds: &'a Dataset,
    resample_alg: ResampleAlg,
    max_error: f64,
    warp_options: Vec<(String,String)>,
}

impl<'a> GridWarper<'a> {
    pub fn new (src_ds: &'a Dataset, tgt_ds: &'a Dataset)->Self {
        GridWarper {
            src_ds,
            tgt_ds,
            resample_alg: ResampleAlg::NearestNeighbour,
            max_error: 0.0,
            warp_options: Vec::new(),
        }
    }

    pub fn set_resample_alg (&mut self, alg: ResampleAlg)->&mut Self {
        self.resample_alg = alg;
        self
    }

    pub fn set_max_error (&mut self, max_error: f64)->&mut Self {
        self.max_error = max_error;
        self
    }

    pub fn set_warp_option (&mut self, key: &str, value: &str)->&mut Self {
        self.warp_options.push( (key.to_string(), value.to_string()));
        self
    }

    /// distribute warp chunks over all available cores
    pub fn set_all_cpus (&mut self)->&mut Self {
        self.set_warp_option("NUM_THREADS", "ALL_CPUS")
    }

    pub fn exec (&self)->Result<()> {
        unsafe {
            let warp_opts = gdal_sys::GDALCreateWarpOptions();

            for (key, value) in &self.warp_options {
                let c_key = CString::new( key.as_str()).unwrap(); // no interior NULs in option keys
                let c_value = CString::new( value.as_str()).unwrap();
                (*warp_opts).papszWarpOptions =
                    gdal_sys::CSLSetNameValue( (*warp_opts).papszWarpOptions, c_key.as_ptr(), c_value.as_ptr());
            }

            let res = gdal_sys::GDALReprojectImage(
                self.src_ds.c_dataset(), null(),
                self.tgt_ds.c_dataset(), null(),
                self.resample_alg.to_gdal(),
                0.0, self.max_error,
                None, null_mut(),
                warp_opts
            );

            gdal_sys::GDALDestroyWarpOptions( warp_opts);
            ok_ce_none( res)
        }
    }
}
