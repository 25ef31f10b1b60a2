/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

#[cfg(any(feature = "serialize", feature = "deserialize"))]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one frame producer (a client). Stable across surfaces the
/// client creates.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct FrameSinkId(pub u32, pub u32);

/// Changes whenever the client changes size or scale of its surface.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct LocalSurfaceId(pub u32);

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct SurfaceId {
    pub frame_sink_id: FrameSinkId,
    pub local_surface_id: LocalSurfaceId,
}

impl SurfaceId {
    pub fn new(frame_sink_id: FrameSinkId, local_surface_id: LocalSurfaceId) -> Self {
        SurfaceId {
            frame_sink_id,
            local_surface_id,
        }
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "SurfaceId({}, {}, {})",
            self.frame_sink_id.0,
            self.frame_sink_id.1,
            self.local_surface_id.0,
        )
    }
}

/// A render pass id chosen by the client. Only unique within one frame of
/// one surface.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct CompositorRenderPassId(pub u64);

/// A render pass id unique across every surface aggregated together.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct AggregatedRenderPassId(pub u64);

/// Names a runtime displacement the compositor applies to tagged quads.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct OffsetTag(pub u64);

impl OffsetTag {
    pub const NULL: OffsetTag = OffsetTag(0);

    pub fn is_null(&self) -> bool {
        *self == OffsetTag::NULL
    }
}
