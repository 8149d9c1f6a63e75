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

use std::fmt::{Debug, Display};
use std::ops::{Add, Mul};

use trait_set::trait_set;

/// scalar ops with usize counts, to keep LinearRange element types generic
pub trait UsizeOps {
    fn mul_usize (self, n: usize)->Self;
    fn div_usize (self, n: usize)->Self;
}

impl UsizeOps for f64 {
    #[inline] fn mul_usize (self, n: usize)->f64 { self * (n as f64) }
    #[inline] fn div_usize (self, n: usize)->f64 { self / (n as f64) }
}

impl UsizeOps for f32 {
    #[inline] fn mul_usize (self, n: usize)->f32 { self * (n as f32) }
    #[inline] fn div_usize (self, n: usize)->f32 { self / (n as f32) }
}

trait_set! {
    pub trait RangeElem = Debug + Display + Copy + Add<Output=Self> + Mul<Output=Self> + UsizeOps;
}

/// a bounded linear range of values with a fixed increment.
/// This is the 1-dim coordinate axis abstraction used for raster grids
#[derive(Debug,Clone)]
pub struct LinearRange<T> where T: RangeElem {
    first: T,
    inc: T,
    n: usize
}

impl<T> LinearRange<T> where T: RangeElem {

    pub fn new (first: T, inc: T, n: usize)->Self {
        LinearRange{ first, inc, n }
    }

    #[inline] pub fn at (&self, idx: usize)->T {
        if idx >= self.n { panic!("index {} out of bounds 0..{}", idx, self.n) }
        self.first + self.inc.mul_usize(idx)
    }

    #[inline] pub fn first (&self)->T { self.first }

    #[inline] pub fn last (&self)->T { self.first + self.inc.mul_usize(self.n) }

    #[inline] pub fn inc (&self)->T { self.inc }

    #[inline] pub fn len (&self)->usize { self.n }

    #[inline] pub fn is_empty (&self)->bool { self.n == 0 }

    pub fn iter (&self)->LinearRangeIterator<T> {
        LinearRangeIterator{ src: self.clone(), idx: 0 }
    }
}

pub struct LinearRangeIterator<T> where T: RangeElem {
    src: LinearRange<T>,
    idx: usize
}

impl<T> Iterator for LinearRangeIterator<T> where T: RangeElem {
    type Item = T;

    fn next (&mut self)->Option<Self::Item> {
        let src = &self.src;
        let idx = self.idx;
        if idx < src.n {
            self.idx += 1;
            Some( src.first + src.inc.mul_usize(idx) )
        } else {
            None
        }
    }
}

impl<T> IntoIterator for LinearRange<T> where T: RangeElem {
    type Item = T;
    type IntoIter = LinearRangeIterator<T>;

    fn into_iter (self)->Self::IntoIter {
        LinearRangeIterator{ src: self, idx: 0 }
    }
}
