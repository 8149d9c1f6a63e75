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

//! support functions for anonymous read access to AWS S3 objects.
//! Only the operations the acquisition pipeline needs: list a prefix,
//! query an object size and download an object into a local directory

use std::fs::File;
use std::io::Write;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use aws_config::{meta::region::RegionProviderChain, Region};
use aws_sdk_s3::{types::Object, Client};
use aws_smithy_types_convert::date_time::DateTimeExt;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::datetime::Dated;
use crate::fs::base_name;

pub type S3Client = Client;

pub type Result<T> = std::result::Result<T, GeosatS3Error>;

#[derive(Error,Debug)]
pub enum GeosatS3Error {
    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("AWS S3 get object error {0}")]
    AWSS3ObjectError( #[from] aws_smithy_runtime_api::client::result::SdkError<aws_sdk_s3::operation::get_object::GetObjectError, aws_smithy_runtime_api::http::Response>),

    #[error("AWS S3 list object error {0}")]
    AWSS3ListObjectError( #[from] aws_smithy_runtime_api::client::result::SdkError<aws_sdk_s3::operation::list_objects::ListObjectsError, aws_smithy_runtime_api::http::Response>),

    #[error("AWS S3 head object error {0}")]
    AWSS3HeadObjectError( #[from] aws_smithy_runtime_api::client::result::SdkError<aws_sdk_s3::operation::head_object::HeadObjectError, aws_smithy_runtime_api::http::Response>),

    #[error("AWS byte stream download error {0}")]
    AWSByteStreamError( #[from] aws_smithy_types::byte_stream::error::Error),

    #[error("No object key error")]
    NoObjectKeyError(),
}

/// newtype to allow extending the S3 Object interface
#[derive(Clone,Debug)]
pub struct S3Object(Object);

impl S3Object {
    pub fn key_str (&self)->Option<&str> {
        self.0.key.as_deref()
    }

    pub fn is_dated (&self)->bool {
        self.last_modified.is_some()
    }
}

impl Deref for S3Object {
    type Target = Object;
    fn deref (&self)->&Self::Target { &self.0 }
}

impl Dated for S3Object {
    /// note this panics if object.last_modified() == None
    /// it should only be used after verifying the object has a proper date set
    fn date (&self)->DateTime<Utc> {
        self.last_modified().unwrap().to_chrono_utc().unwrap()
    }
}

/// create an anonymous S3 Client for given region
pub async fn create_s3_client (region: String)->Result<Client> {
    let region_provider = RegionProviderChain::first_try( Region::new( region));
    let aws_config = aws_config::from_env().no_credentials().region(region_provider).load().await;
    Ok( Client::new( &aws_config) )
}

/// retrieve all objects (from optional marker) for given bucket/prefix. If there is no error this
/// always returns a `Vec<S3Object>` but it might be empty (if there were no matching objects)
pub async fn get_s3_objects (client: &Client, bucket: &str, prefix: &str, prev_key: Option<&str>)->Result<Vec<S3Object>> {
    let mut builder = client.list_objects().bucket(bucket).prefix(prefix);
    if let Some(key) = prev_key {
        builder = builder.marker(key);
    }
    let result = builder.send().await?;

    Ok( result.contents().to_vec().into_iter().map(|o| S3Object(o)).collect() )
}

/// reported size in bytes of a single object (HeadObject). Returns None if the
/// object exists but carries no content length
pub async fn get_s3_object_size (client: &Client, bucket: &str, key: &str)->Result<Option<i64>> {
    let result = client.head_object().bucket(bucket).key(key).send().await?;
    Ok( result.content_length() )
}

/// download a given object key and store it under its base name within the given directory.
/// Returns the path of the downloaded file
pub async fn download_s3_object (client: &Client, bucket: &str, key: &str, dir: &Path)->Result<PathBuf> {
    let file_path = dir.join( base_name(key));
    let mut file = File::create( &file_path)?;

    let mut object = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await?;

    while let Some(bytes) = object.body.try_next().await? {
        file.write_all( &bytes)?;
    }
    Ok(file_path)
}
