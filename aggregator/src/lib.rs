/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

/*!
The per-surface half of a display compositor's surface aggregator.

Every surface that takes part in an aggregation gets a [`ResolvedFrameData`].
When the surface activates a frame, the resolved frame data validates it and
maps it into the aggregator's namespaces: render pass ids of every surface
are replaced by [`AggregatedRenderPassId`]s from one shared
[`AggregatedRenderPassIdGenerator`], and resources are imported into a
[`ResourceProvider`]. The aggregator then walks the resolved passes, asks for
damage with [`ResolvedFrameData::surface_damage`], and calls
[`ResolvedFrameData::reset_after_aggregation`] once it is done.

[`AggregatedRenderPassId`]: api::AggregatedRenderPassId
*/

#[macro_use]
extern crate log;

#[macro_use]
mod index_vec;

#[cfg(feature = "capture")]
mod capture;
mod config;
mod internal_types;
mod offset_tags;
mod resolved_frame;
mod resolved_pass;
mod resource_provider;
mod surface;
#[cfg(test)]
mod test_support;

#[cfg(feature = "capture")]
pub use crate::capture::{CaptureConfig, CapturedFrameData, CapturedPass};
pub use crate::config::ResolvedFrameConfig;
pub use crate::internal_types::{FastHashMap, FastHashSet};
pub use crate::resolved_frame::{FrameDamageType, FrameValidationError, ResolvedFrameData};
pub use crate::resolved_pass::{AggregatedRenderPassIdGenerator, AggregationPassData};
pub use crate::resolved_pass::{FixedPassData, MergeState, PersistentPassData};
pub use crate::resolved_pass::{RenderPassSource, ResolvedPassData, ResolvedPassIndex, ResolvedQuadData};
pub use crate::resource_provider::{ChildId, DisplayResourceId, DisplayResourceProvider};
pub use crate::resource_provider::{ResourceIdMap, ResourceProvider, ReturnCallback};
pub use crate::resource_provider::SharedResourceProvider;
pub use crate::surface::{Surface, SurfaceClient};
