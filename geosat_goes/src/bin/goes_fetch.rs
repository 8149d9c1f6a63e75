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

//! tool to download GOES ABI data from the public AWS buckets. The source (satellite,
//! product, patterns, worker count) comes from a RON config, the time window from the
//! optional --date arguments. Re-running on the same destination only transfers what is
//! missing or incomplete

use std::path::PathBuf;

use anyhow::Result;
use lazy_static::lazy_static;
use structopt::StructOpt;

use geosat_common::datetime::utc_now;
use geosat_common::s3::create_s3_client;
use geosat_goes::{
    fetch_all, filter_entries, list_window_objects, load_config, DateSpec, FetchStatus,
    GoesSourceConfig, TimeWindow,
};

#[derive(StructOpt,Debug)]
#[structopt(about = "GOES ABI file download tool")]
struct CliOpts {
    /// date or date range (YYYYMMDDhhmm, YYYYMMDDhh or YYYYMMDD, up to two values;
    /// none means the most recent complete scan)
    #[structopt(long, number_of_values = 1)]
    date: Vec<String>,

    /// re-download files that already exist locally
    #[structopt(long)]
    force: bool,

    /// print the per-entry results as JSON instead of the human readable report
    #[structopt(long)]
    json: bool,

    /// override the configured destination directory
    #[structopt(long)]
    dir: Option<String>,

    /// pathname of the GoesSourceConfig RON file
    config: String,
}

lazy_static! {
    static ref ARGS: CliOpts = CliOpts::from_args();
}

#[tokio::main]
async fn main ()->Result<()> {
    tracing_subscriber::fmt().init();

    let config: GoesSourceConfig = load_config( &ARGS.config)?;
    let data_dir = PathBuf::from( ARGS.dir.clone().unwrap_or_else( || config.data_dir.clone()));

    let now = utc_now();
    let spec = DateSpec::from_args( &ARGS.date)?;
    let window = TimeWindow::resolve( &spec, now)?;
    if !ARGS.json {
        println!("retrieving GOES-{} {} data for {} .. {}", config.satellite, config.product, window.start, window.end);
    }

    let client = create_s3_client( config.s3_region.clone()).await?;
    let entries = list_window_objects( &client, &config.bucket(), &config.source(), &window, now).await?;
    let selected = filter_entries( entries, config.patterns.as_deref(), config.sampling_interval, &window);
    if !ARGS.json {
        println!("{} objects selected", selected.len());
    }

    let results = fetch_all( &client, &config.bucket(), &selected, &data_dir, config.workers, ARGS.force).await?;

    if ARGS.json {
        println!("{}", serde_json::to_string_pretty( &results)?);
        return Ok(())
    }

    let mut n_fetched = 0;
    let mut n_skipped = 0;
    let mut n_failed = 0;
    for r in &results {
        match &r.status {
            FetchStatus::Fetched => { n_fetched += 1; println!("  [ NEW      ] {}", r.key); }
            FetchStatus::SkippedComplete => { n_skipped += 1; println!("  [ COMPLETE ] {}", r.key); }
            FetchStatus::Failed(e) => { n_failed += 1; eprintln!("  [ FAILED   ] {}: {}", r.key, e); }
        }
    }
    println!("downloaded {}, skipped {}, failed {} (of {})", n_fetched, n_skipped, n_failed, results.len());

    Ok(())
}
