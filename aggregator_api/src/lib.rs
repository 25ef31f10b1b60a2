/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Types exchanged between frame producers (clients) and the surface
//! aggregator of the display compositor.

#![deny(missing_debug_implementations)]

extern crate euclid;
#[cfg(any(feature = "serialize", feature = "deserialize"))]
extern crate serde;
extern crate smallvec;

mod frame;
mod ids;
mod offset_tag;
mod resources;
pub mod units;

pub use crate::frame::*;
pub use crate::ids::*;
pub use crate::offset_tag::*;
pub use crate::resources::*;
