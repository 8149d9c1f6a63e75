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

//! re-sampling of fixed grid ABI scenes onto equirectangular (PlateCarree) grids

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use ndarray::Array2;
use tracing::{debug, info};

use geosat_common::fs::ensure_writable_dir;
use geosat_gdal::warp::{GridWarper, ResampleAlg};
use geosat_gdal::{
    compress_create_opts, create_grid_dataset, find_meta_value, get_linear_range, get_meta_f64,
    mem_driver, nc4_create_opts, new_geotransform, quiet_dataset, quiet_nc_dataset, read_grid_f32,
    srs_epsg_4326, write_grid_f32, Dataset, DriverManager, Metadata, MetadataEntry,
    RasterCreationOptions,
};

use crate::calibrate::{
    apply_correction, assign_no_data, dequantize, needs_correction, CalibrationCoefficients,
    PhysicalUnit, NO_DATA_VALUE,
};
use crate::errors::{GeosatGoesError, Result};
use crate::{parse_filename, GeoExtent};

/// mean km per degree of latitude, used to derive grid dimensions from a target resolution
pub const KM_PER_DEGREE: f64 = 111.32;

/* #region scene handling *********************************************************************************/

/// an opened ABI NetCDF scene file plus the global attributes the pipeline needs.
/// Scene handles are cheap - each reprojection call opens its own sub-datasets and
/// releases them on completion
#[derive(Debug,Clone)]
pub struct GoesScene {
    path: PathBuf,
    product: String,
    date: DateTime<Utc>,
    resolution_km: Option<f64>,
}

impl GoesScene {
    pub fn open (path: impl AsRef<Path>)->Result<GoesScene> {
        let path = path.as_ref().to_path_buf();
        let ds = quiet_dataset( &path)?;

        let tcs = find_meta_value( &ds, "#time_coverage_start")
            .ok_or_else(|| GeosatGoesError::MiscError( format!("scene {:?} without time_coverage_start", path)))?;
        let date = NaiveDateTime::parse_from_str( &tcs, "%Y-%m-%dT%H:%M:%S%.fZ")?.and_utc();

        let resolution_km = find_meta_value( &ds, "#spatial_resolution")  // e.g. "2km at nadir"
            .and_then( |v| v.split("km").next().map( |s| s.trim().to_string()))
            .and_then( |s| s.parse::<f64>().ok());

        let product = parse_filename( &path)
            .map( |info| info.product)
            .unwrap_or_else( || "GOES".to_string());

        Ok( GoesScene{ path, product, date, resolution_km } )
    }

    #[inline] pub fn path (&self)->&Path { &self.path }

    #[inline] pub fn product (&self)->&str { &self.product }

    /// scan start time (`time_coverage_start` global attribute)
    #[inline] pub fn date (&self)->DateTime<Utc> { self.date }

    /// nadir resolution from the `spatial_resolution` global attribute
    #[inline] pub fn resolution_km (&self)->Option<f64> { self.resolution_km }

    /// open one variable of the scene as a GDAL sub-dataset
    pub fn open_variable (&self, variable: &str)->Result<Dataset> {
        Ok( quiet_nc_dataset( &self.path, variable)? )
    }
}

/// fixed grid projection parameters and native extent of one scene. Scan geometry can
/// differ between scenes, so this is extracted per reprojection call and not shared
#[derive(Debug,Clone)]
pub struct SceneProjection {
    pub semi_major_axis: f64,
    pub semi_minor_axis: f64,
    pub inverse_flattening: f64,
    pub perspective_point_height: f64,
    pub longitude_of_projection_origin: f64,
    pub sweep_angle_axis: String,
    /// scan angle axis bounds scaled by the perspective height: `[x_min·h, x_max·h, y_min·h, y_max·h]`
    pub native_extent: [f64;4],
}

impl SceneProjection {
    /// extract the fixed grid parameters from a variable sub-dataset plus the x/y scan
    /// angle axes of the scene
    pub fn extract (scene: &GoesScene, var_ds: &Dataset)->Result<SceneProjection> {
        // GRS80 defaults, overridden by whatever the projection variable carries
        let mut semi_major_axis: f64 = 6378137.0;
        let mut semi_minor_axis: f64 = 6356752.31414;
        let mut inverse_flattening: f64 = 298.257222096;
        let mut perspective_point_height: f64 = f64::NAN;
        let mut longitude_of_projection_origin: f64 = f64::NAN;
        let mut sweep_angle_axis = "x".to_string();

        for MetadataEntry{ domain:_, key, value } in var_ds.metadata() {
            if key.ends_with("#semi_major_axis") { semi_major_axis = value.parse()? }
            else if key.ends_with("#semi_minor_axis") { semi_minor_axis = value.parse()? }
            else if key.ends_with("#inverse_flattening") { inverse_flattening = value.parse()? }
            else if key.ends_with("#perspective_point_height") { perspective_point_height = value.parse()? }
            else if key.ends_with("#longitude_of_projection_origin") { longitude_of_projection_origin = value.parse()? }
            else if key.ends_with("#sweep_angle_axis") { sweep_angle_axis = value }
        }
        if perspective_point_height.is_nan() || longitude_of_projection_origin.is_nan() {
            return Err( GeosatGoesError::MissingProjectionMetadata(
                "perspective_point_height / longitude_of_projection_origin".into()))
        }

        let x_ds = quiet_nc_dataset( scene.path(), "x").map_err(|_| missing_proj("x axis variable"))?;
        let y_ds = quiet_nc_dataset( scene.path(), "y").map_err(|_| missing_proj("y axis variable"))?;
        let x_range = get_linear_range::<f64>( &x_ds, 1).map_err(|_| missing_proj("x axis values"))?;
        let y_range = get_linear_range::<f64>( &y_ds, 1).map_err(|_| missing_proj("y axis values"))?;

        let h = perspective_point_height;
        let (x0, x1) = (x_range.first(), x_range.last());
        let (y0, y1) = (y_range.first(), y_range.last());
        let native_extent = [ x0.min(x1)*h, x0.max(x1)*h, y0.min(y1)*h, y0.max(y1)*h ];

        Ok( SceneProjection {
            semi_major_axis, semi_minor_axis, inverse_flattening,
            perspective_point_height, longitude_of_projection_origin,
            sweep_angle_axis, native_extent
        })
    }
}

fn missing_proj (what: &str)->GeosatGoesError {
    GeosatGoesError::MissingProjectionMetadata( what.to_string())
}

/* #endregion scene handling */

/* #region reprojection ***********************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum OutputFormat {
    GTiff,
    NetCdf,
}

impl OutputFormat {
    pub fn driver_name (&self)->&'static str {
        match self {
            OutputFormat::GTiff => "GTiff",
            OutputFormat::NetCdf => "netCDF",
        }
    }

    fn create_opts (&self)->RasterCreationOptions {
        match self {
            OutputFormat::GTiff => compress_create_opts(),
            OutputFormat::NetCdf => nc4_create_opts(),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = GeosatGoesError;

    fn from_str (s: &str)->Result<OutputFormat> {
        match s {
            "GTiff" | "gtiff" | "tif" => Ok( OutputFormat::GTiff ),
            "NETCDF" | "netcdf" | "nc" => Ok( OutputFormat::NetCdf ),
            other => Err( GeosatGoesError::UnsupportedOutputFormat( other.to_string()))
        }
    }
}

/// the reprojected output grid: the 2-dim value array plus its geographic extent, which
/// is exactly the interface a downstream renderer consumes
#[derive(Debug,Clone)]
pub struct CalibratedRaster {
    pub data: Array2<f32>,
    pub extent: GeoExtent,
    pub unit: PhysicalUnit,
    pub no_data: f32,
}

#[derive(Debug,Clone)]
pub struct ReprojectedScene {
    pub raster: CalibratedRaster,
    /// pathname of the exported file, None if no output format was requested
    pub file: Option<PathBuf>,
}

/// builder for one scene/variable reprojection onto an equirectangular target grid.
///
/// The execution is a single linear pass: open the variable raster, resolve scale/offset,
/// size the output grid, warp, dequantize, correct, assign the no-data sentinel and
/// optionally export. Any stage failure aborts the call
pub struct SceneReprojector<'a> {
    scene: &'a GoesScene,
    variable: String,
    extent: GeoExtent,
    resolution_km: Option<f64>,
    resample_alg: ResampleAlg,
    output_format: Option<OutputFormat>,
    output_dir: PathBuf,
    filename: Option<String>,
}

impl<'a> SceneReprojector<'a> {
    pub fn new (scene: &'a GoesScene, variable: impl ToString, extent: GeoExtent)->Self {
        SceneReprojector {
            scene,
            variable: variable.to_string(),
            extent,
            resolution_km: None,
            resample_alg: ResampleAlg::NearestNeighbour,
            output_format: None,
            output_dir: PathBuf::from("./"),
            filename: None,
        }
    }

    /// target resolution in km. Without it the output grid gets the source raster shape
    pub fn set_resolution_km (&mut self, res: f64)->&mut Self {
        self.resolution_km = Some(res);
        self
    }

    pub fn set_resample_alg (&mut self, alg: ResampleAlg)->&mut Self {
        self.resample_alg = alg;
        self
    }

    pub fn set_output_format (&mut self, format: OutputFormat)->&mut Self {
        self.output_format = Some(format);
        self
    }

    pub fn set_output_dir (&mut self, dir: impl AsRef<Path>)->&mut Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn set_filename (&mut self, filename: impl ToString)->&mut Self {
        self.filename = Some( filename.to_string());
        self
    }

    /// run the reprojection. This parallelizes internally across cores during the warp
    /// but is otherwise one synchronous call per scene/variable
    pub fn exec (&self)->Result<ReprojectedScene> {
        let src_ds = self.scene.open_variable( &self.variable)?;

        // fail early if this is not a well-formed fixed grid scene
        let projection = SceneProjection::extract( self.scene, &src_ds)?;
        debug!("source projection {:?}", projection);

        let (scale, offset) = self.scale_offset( &src_ds)?;
        let (size_x, size_y) = self.grid_size( &src_ds);

        let driver = mem_driver()?;
        let mut grid = create_grid_dataset( &driver, "grid", size_x, size_y, None)?;
        grid.set_spatial_ref( &srs_epsg_4326())?;

        let res_x = self.extent.width_deg() / (size_x as f64);
        let res_y = self.extent.height_deg() / (size_y as f64);
        grid.set_geo_transform( &new_geotransform( self.extent.lon_min, res_x, 0.0,
                                                   self.extent.lat_max, 0.0, -res_y))?;

        let mut warper = GridWarper::new( &src_ds, &grid);
        warper.set_resample_alg( self.resample_alg).set_all_cpus();
        warper.exec()?;

        let (w, h, values) = read_grid_f32( &grid, 1)?;
        let mut data = Array2::from_shape_vec( (h, w), values)
            .map_err( |e| GeosatGoesError::MiscError( e.to_string()))?;

        dequantize( &mut data, scale, offset);

        let unit = if needs_correction( &self.variable) {
            let coeffs = CalibrationCoefficients::from_scene_file( self.scene.path())?;
            let (corrected, unit) = apply_correction( &self.variable, data, &coeffs, &self.scene.date(), &self.extent)?;
            data = corrected;
            unit
        } else {
            PhysicalUnit::Dimensionless
        };

        assign_no_data( &mut data, NO_DATA_VALUE);

        // write the corrected values back so that exports carry them
        {
            let mut band = grid.rasterband(1)?;
            band.set_no_data_value( Some(NO_DATA_VALUE as f64))?;
        }
        write_grid_f32( &grid, 1, w, h, data.iter().cloned().collect())?;

        let file = match self.output_format {
            Some(format) => Some( self.export( &grid, format)? ),
            None => None
        };

        Ok( ReprojectedScene {
            raster: CalibratedRaster{ data, extent: self.extent, unit, no_data: NO_DATA_VALUE },
            file
        })
    }

    /// dequantization coefficients of the variable. The quality flag variable is stored
    /// unscaled; everything else has to carry scale/offset attributes
    fn scale_offset (&self, src_ds: &Dataset)->Result<(f64,f64)> {
        if self.variable == "DQF" {
            return Ok( (1.0, 0.0) )
        }

        let scale = get_meta_f64( src_ds, &format!("{}#scale_factor", self.variable))
            .ok_or_else( || GeosatGoesError::MissingCalibrationMetadata( format!("{}#scale_factor", self.variable)))?;
        let offset = get_meta_f64( src_ds, &format!("{}#add_offset", self.variable))
            .ok_or_else( || GeosatGoesError::MissingCalibrationMetadata( format!("{}#add_offset", self.variable)))?;

        Ok( (scale, offset) )
    }

    /// output grid dimensions: derived from the target resolution, or the source shape
    fn grid_size (&self, src_ds: &Dataset)->(usize,usize) {
        match self.resolution_km {
            Some(res) => {
                let size_x = ((self.extent.width_deg() * KM_PER_DEGREE / res) as usize).max(1);
                let size_y = ((self.extent.height_deg() * KM_PER_DEGREE / res) as usize).max(1);
                (size_x, size_y)
            }
            None => src_ds.raster_size()
        }
    }

    fn export (&self, grid: &Dataset, format: OutputFormat)->Result<PathBuf> {
        ensure_writable_dir( &self.output_dir)?;

        let filename = match &self.filename {
            Some(name) => name.clone(),
            None => format!("{}_{}", self.scene.product(), self.scene.date().format("%Y%m%d%H%M"))
        };
        let out_path = self.output_dir.join( filename);

        let driver = DriverManager::get_driver_by_name( format.driver_name())?;
        let co = format.create_opts();
        grid.create_copy( &driver, &out_path, &co)?;

        info!("exported {} as {:?}", format.driver_name(), out_path);
        Ok(out_path)
    }
}

/* #endregion reprojection */
