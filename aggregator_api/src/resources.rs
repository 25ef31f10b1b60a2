/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::units::DeviceIntSize;
#[cfg(any(feature = "serialize", feature = "deserialize"))]
use serde::{Deserialize, Serialize};

/// A resource id in the namespace of the client that submitted it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct ResourceId(pub u32);

impl ResourceId {
    /// Fills unused resource slots of a quad. Never declared, never remapped.
    pub const INVALID: ResourceId = ResourceId(0);

    pub fn is_valid(&self) -> bool {
        *self != ResourceId::INVALID
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub enum ResourceFormat {
    RGBA8,
    BGRA8,
    R8,
    RG8,
    RGBAF16,
}

/// A resource the client hands over with a frame.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct TransferableResource {
    pub id: ResourceId,
    pub size: DeviceIntSize,
    pub format: ResourceFormat,
    pub is_software: bool,
    pub is_overlay_candidate: bool,
}

impl TransferableResource {
    pub fn new(id: ResourceId, size: DeviceIntSize, format: ResourceFormat) -> Self {
        TransferableResource {
            id,
            size,
            format,
            is_software: false,
            is_overlay_candidate: false,
        }
    }
}

/// A resource given back to the client. `count` is the number of times the
/// client sent it since it was last returned.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct ReturnedResource {
    pub id: ResourceId,
    pub count: u32,
    pub lost: bool,
}
