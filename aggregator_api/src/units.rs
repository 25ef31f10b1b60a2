/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Typed geometry used on both sides of the client/compositor boundary.
//!
//! Device space is integer pixels of a render pass target. Layout space is
//! the float space quads are authored in before `quad_to_target_transform`.

use euclid::{Point2D, Rect, Size2D, Transform3D, Vector2D};
#[cfg(any(feature = "serialize", feature = "deserialize"))]
use serde::{Deserialize, Serialize};

#[derive(Hash, Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct DevicePixel;

pub type DeviceIntRect = Rect<i32, DevicePixel>;
pub type DeviceIntPoint = Point2D<i32, DevicePixel>;
pub type DeviceIntSize = Size2D<i32, DevicePixel>;

#[derive(Hash, Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct LayoutPixel;

pub type LayoutRect = Rect<f32, LayoutPixel>;
pub type LayoutPoint = Point2D<f32, LayoutPixel>;
pub type LayoutSize = Size2D<f32, LayoutPixel>;
pub type LayoutVector2D = Vector2D<f32, LayoutPixel>;

/// Maps a quad's own space onto the render pass it is drawn into.
pub type LayoutTransform = Transform3D<f32, LayoutPixel, LayoutPixel>;
