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

//! filesystem support functions

use std::fs;
use std::io;
use std::path::Path;

pub fn filename<'a,T: AsRef<Path>> (path: &'a T)->Option<&'a str> {
    path.as_ref().file_name().and_then(|oss| oss.to_str())
}

pub fn extension<'a,T: AsRef<Path>> (path: &'a T)->Option<&'a str> {
    path.as_ref().extension().and_then(|oss| oss.to_str())
}

pub fn get_filename_extension<'a> (path: &'a str)->Option<&'a str> {
    Path::new(path).extension().and_then(|oss| oss.to_str())
}

/// the last path segment of a (possibly '/'-separated) key or pathname
pub fn base_name (key: &str)->&str {
    key.rsplit('/').next().unwrap_or(key)
}

pub fn ensure_dir (path: impl AsRef<Path>)->io::Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        fs::create_dir_all(path)?
    }
    Ok(())
}

pub fn ensure_writable_dir (path: impl AsRef<Path>)->io::Result<()> {
    let path = path.as_ref();
    ensure_dir(path)?;

    let md = fs::metadata(path)?;
    if md.permissions().readonly() {
        Err( io::Error::new( io::ErrorKind::PermissionDenied, format!("directory {:?} not writable", path)) )
    } else {
        Ok(())
    }
}

/// length in bytes of an existing file, None if it does not exist or is not accessible
pub fn file_length<P: AsRef<Path>> (path: P)->Option<u64> {
    fs::metadata(path).ok().map(|md| md.len())
}
