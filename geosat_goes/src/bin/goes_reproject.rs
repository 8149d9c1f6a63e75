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

//! tool to reproject a variable of a downloaded ABI scene onto an equirectangular grid
//! and optionally export it as compressed GTiff or NetCDF

use anyhow::Result;
use lazy_static::lazy_static;
use structopt::StructOpt;

use geosat_goes::{GeoExtent, GoesScene, OutputFormat, SceneReprojector};

#[derive(StructOpt,Debug)]
#[structopt(about = "GOES ABI scene reprojection tool")]
struct CliOpts {
    /// target extent lon_min, lon_max, lat_min, lat_max (degrees)
    #[structopt(long, allow_hyphen_values = true, number_of_values = 4, required = true)]
    te: Vec<f64>,

    /// variable to reproject (e.g. Rad, CMI or DQF)
    #[structopt(short, long, default_value = "CMI")]
    variable: String,

    /// target resolution in km (without it the output keeps the source shape)
    #[structopt(short, long)]
    resolution: Option<f64>,

    /// output format, GTiff or NETCDF (without it nothing is written)
    #[structopt(short, long)]
    format: Option<OutputFormat>,

    /// output directory
    #[structopt(long, default_value = "./")]
    output_path: String,

    /// output filename (default is «product»_«YYYYMMDDhhmm»)
    #[structopt(long)]
    filename: Option<String>,

    /// input scene pathname
    src: String,
}

lazy_static! {
    static ref ARGS: CliOpts = CliOpts::from_args();
}

fn main ()->Result<()> {
    tracing_subscriber::fmt().init();

    let scene = GoesScene::open( &ARGS.src)?;
    let extent = GeoExtent::new( ARGS.te[0], ARGS.te[1], ARGS.te[2], ARGS.te[3]);

    let mut reprojector = SceneReprojector::new( &scene, &ARGS.variable, extent);
    if let Some(res) = ARGS.resolution { reprojector.set_resolution_km( res); }
    if let Some(format) = ARGS.format { reprojector.set_output_format( format); }
    if let Some(filename) = &ARGS.filename { reprojector.set_filename( filename); }
    reprojector.set_output_dir( &ARGS.output_path);

    let result = reprojector.exec()?;
    let raster = &result.raster;
    let (rows, cols) = raster.data.dim();

    println!("reprojected {} of {:?}", ARGS.variable, scene.path());
    println!("  extent: {:?}", raster.extent.as_array());
    println!("  grid:   {} x {} ({:?})", cols, rows, raster.unit);
    if let Some(file) = &result.file { println!("  file:   {:?}", file); }

    Ok(())
}
