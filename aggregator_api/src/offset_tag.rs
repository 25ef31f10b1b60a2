/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::ids::{OffsetTag, SurfaceId};
use crate::units::LayoutVector2D;
#[cfg(any(feature = "serialize", feature = "deserialize"))]
use serde::{Deserialize, Serialize};

/// The range an offset tag's value may take.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct OffsetTagConstraints {
    pub min_offset: LayoutVector2D,
    pub max_offset: LayoutVector2D,
}

impl OffsetTagConstraints {
    pub fn new(min_offset: LayoutVector2D, max_offset: LayoutVector2D) -> Self {
        OffsetTagConstraints {
            min_offset,
            max_offset,
        }
    }

    /// Unbounded in both directions.
    pub fn unconstrained() -> Self {
        OffsetTagConstraints {
            min_offset: LayoutVector2D::new(f32::MIN, f32::MIN),
            max_offset: LayoutVector2D::new(f32::MAX, f32::MAX),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min_offset.x <= self.max_offset.x && self.min_offset.y <= self.max_offset.y
    }

    /// Clamps each axis independently.
    pub fn clamp(&self, value: LayoutVector2D) -> LayoutVector2D {
        LayoutVector2D::new(
            value.x.max(self.min_offset.x).min(self.max_offset.x),
            value.y.max(self.min_offset.y).min(self.max_offset.y),
        )
    }
}

/// Declared by a frame that contains quads tagged with `tag`. The value is
/// provided at aggregation time by whoever owns `provider`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct OffsetTagDefinition {
    pub tag: OffsetTag,
    pub provider: SurfaceId,
    pub constraints: OffsetTagConstraints,
}
