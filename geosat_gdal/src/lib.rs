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

//! thin GDAL support layer for the geosat crates: quiet NetCDF sub-dataset access,
//! driver/format selection, geotransforms, grid creation and Float32 grid I/O

pub mod errors;
pub mod warp;

use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::path::Path;
use std::sync::Mutex;

use gdal::errors::CplErrType;
use lazy_static::lazy_static;
use libc::{c_char, c_int};
use static_init::constructor;

// we re-export these so that other crates don't have to use a direct gdal dependency to import
pub use gdal::{self, Dataset, Driver, DriverManager, GeoTransform, Metadata, MetadataEntry, cpl::CslStringList, errors::GdalError};
pub use gdal::raster::{Buffer, GdalDataType, GdalType, RasterBand, RasterCreationOptions};
pub use gdal::spatial_ref::SpatialRef;

use gdal_sys::CPLErr;

use geosat_common::fs::get_filename_extension;
use geosat_common::ranges::LinearRange;

use crate::errors::{last_gdal_error, misc_error, GeosatGdalError, Result};

lazy_static! {
    // note that we can't automatically populate this by iterating over DriverManager since some
    // drivers use the same file extension
    static ref EXT_MAP: HashMap<&'static str, &'static str> = HashMap::from( [ // file extension -> driver short name
        ("tif", "GTiff"),
        ("tiff", "GTiff"),
        ("nc", "netCDF"),
    ]);
}

/// use this to protect non-threadsafe GDAL operations
static GLOB_GDAL_MUTEX: Mutex<usize> = Mutex::new(0);

#[constructor(0)]
extern "C" fn _initialize_gdal() {
    gdal::config::set_error_handler( no_error_output);
}

fn no_error_output (cpl_et: CplErrType, ec: i32, msg: &str) {}

/// Note that filename extension has to be lower case
pub fn get_driver_name_from_filename (filename: &str)->Option<&'static str> {
    get_filename_extension(filename).and_then( |ext| EXT_MAP.get(ext)).map(|v| &**v)
}

/// Note that filename extension has to be lowercase
pub fn get_driver_name_for_extension (ext: &str)->Option<&'static str> {
    EXT_MAP.get(ext).map(|v| &**v)
}

pub fn pc_char_to_string (pc_char: *const c_char)->String {
    let cstr = unsafe { CStr::from_ptr(pc_char) };
    String::from_utf8_lossy( cstr.to_bytes()).to_string()
}

pub fn ok_ce_none (res: CPLErr::Type)->Result<()> {
    if res == CPLErr::CE_None { Ok(()) } else { Err( last_gdal_error()) }
}

/// run the provided closure with the global GDAL error handler disabled. Note this does not
/// change the return value but prevents GDAL from printing errors and warnings to the console
pub fn run_quiet<T,F> (f: F)->Result<T> where F: Fn()->Result<T> {
    let lock = GLOB_GDAL_MUTEX.lock().unwrap();
    unsafe { gdal_sys::CPLPushErrorHandler( Some(gdal_sys::CPLQuietErrorHandler)); }
    let result = f();
    unsafe { gdal_sys::CPLPopErrorHandler(); }
    result
}

// GOES-R NetCDF data sets cause error messages printed to the console if the SRS does not
// conform to CF-1. The data still opens correctly, so use this function to avoid the output
pub fn quiet_nc_dataset (nc_path: impl AsRef<Path>, var_name: &str)->Result<Dataset> {
    let path = format!("NETCDF:{:?}:{:?}", nc_path.as_ref(), var_name);
    run_quiet( move || Ok( Dataset::open(&path)? ) )
}

pub fn nc_dataset (nc_path: impl AsRef<Path>, var_name: &str)->Result<Dataset> {
    let path = format!("NETCDF:{:?}:{:?}", nc_path.as_ref(), var_name);
    Ok( Dataset::open(&path)? )
}

/// open the container dataset of a NetCDF file without console noise
pub fn quiet_dataset (path: impl AsRef<Path>)->Result<Dataset> {
    let path = path.as_ref().to_path_buf();
    run_quiet( move || Ok( Dataset::open(&path)? ) )
}

/// first metadata value whose key ends with the given suffix, over all metadata domains.
/// NetCDF attributes show up with `«var»#«attr»` keys, so this finds attributes without
/// having to know the grid mapping variable name
pub fn find_meta_value (ds: &Dataset, key_suffix: &str)->Option<String> {
    for MetadataEntry{ domain:_, key, value } in ds.metadata() {
        if key.ends_with(key_suffix) { return Some(value) }
    }
    None
}

pub fn get_meta_f64 (ds: &Dataset, key_suffix: &str)->Option<f64> {
    find_meta_value(ds, key_suffix).and_then(|v| v.parse::<f64>().ok())
}

pub fn new_geotransform (x_upper_left: f64, x_resolution: f64, row_rotation: f64,
                         y_upper_left: f64, col_rotation: f64, y_resolution: f64)->GeoTransform {
    [x_upper_left, x_resolution, row_rotation, y_upper_left, col_rotation, y_resolution]
}

pub fn srs_epsg_4326 ()->SpatialRef { SpatialRef::from_epsg(4326).unwrap() }

/// linear coordinate axis of a 1-dim NetCDF variable, with band scale/offset applied
pub fn get_linear_range<T> (ds: &Dataset, band_index: usize)->Result<LinearRange<f64>>
    where T: GdalType + Copy + From<u8> + Into<f64>
{
    let band = ds.rasterband(band_index)?;
    let n = band.x_size();
    let scale = if let Some(v) = band.scale() { v } else { 1.0 };
    let offset = if let Some(v) = band.offset() { v } else { 0.0 };
    let mut data = [T::from(0u8); 1];

    // base the increment on the whole range to minimize truncation errors
    band.read_into_slice( (0isize, 0isize), (1,1), (1,1), &mut data, None)?;
    let first = data[0].into() * scale + offset;

    band.read_into_slice( ((n-1) as isize, 0isize), (1,1), (1,1), &mut data, None)?;
    let last = data[0].into() * scale + offset;

    let inc = (last - first) / (n as f64);

    Ok( LinearRange::new( first, inc, n) )
}

/// single value of a scalar (1-element) NetCDF variable, with band scale/offset applied.
/// GOES-R calibration coefficients (kappa0, planck_*) are stored this way
pub fn read_nc_scalar (nc_path: impl AsRef<Path>, var_name: &str)->Result<f64> {
    let ds = quiet_nc_dataset( nc_path, var_name)?;
    let band = ds.rasterband(1)?;
    let scale = if let Some(v) = band.scale() { v } else { 1.0 };
    let offset = if let Some(v) = band.offset() { v } else { 0.0 };
    let mut data = [0f64; 1];

    band.read_into_slice( (0isize, 0isize), (1,1), (1,1), &mut data, None)?;
    Ok( data[0] * scale + offset )
}

/// create a single band Float32 dataset, the only grid type the geosat pipeline produces
pub fn create_grid_dataset<P> (driver: &Driver, path: P, width: usize, height: usize, co: Option<&RasterCreationOptions>)->Result<Dataset>
    where P: AsRef<Path>
{
    if let Some(co) = co {
        Ok( driver.create_with_band_type_with_options::<f32,P>( path, width, height, 1, co)? )
    } else {
        Ok( driver.create_with_band_type::<f32,P>( path, width, height, 1)? )
    }
}

pub fn mem_driver ()->Result<Driver> {
    Ok( DriverManager::get_driver_by_name("MEM")? )
}

pub fn compress_create_opts ()->RasterCreationOptions {
    let mut co = RasterCreationOptions::new();
    co.add_name_value("COMPRESS", "DEFLATE");
    co
}

/// creation options for NetCDF4 classic model output
pub fn nc4_create_opts ()->RasterCreationOptions {
    let mut co = RasterCreationOptions::new();
    co.add_name_value("FORMAT", "NC4C");
    co.add_name_value("COMPRESS", "DEFLATE");
    co
}

/// read a full Float32 band as (width, height, row-major values)
pub fn read_grid_f32 (ds: &Dataset, band_index: usize)->Result<(usize,usize,Vec<f32>)> {
    let band = ds.rasterband(band_index)?;
    let (w,h) = band.size();
    let buf: Buffer<f32> = band.read_as( (0,0), (w,h), (w,h), None)?;
    Ok( (w, h, buf.data().to_vec()) )
}

/// overwrite a full Float32 band with row-major values
pub fn write_grid_f32 (ds: &Dataset, band_index: usize, width: usize, height: usize, values: Vec<f32>)->Result<()> {
    if values.len() != width * height {
        return Err( misc_error( format!("grid value buffer length {} does not match {}x{}", values.len(), width, height)))
    }
    let mut band = ds.rasterband(band_index)?;
    let mut buf: Buffer<f32> = Buffer::new( (width,height), values);
    band.write( (0,0), (width,height), &mut buf)?;
    Ok(())
}
