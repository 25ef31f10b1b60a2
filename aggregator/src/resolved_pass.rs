/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Per render pass state kept by `ResolvedFrameData`.
//!
//! The state is split by lifetime:
//!
//! * `FixedPassData` is computed once when a frame becomes active and does
//!   not change while that frame stays active.
//! * `AggregationPassData` is scratch space for one aggregation and is reset
//!   at the end of each.
//! * `PersistentPassData` must survive into the next frame. It is kept in
//!   two generations: `current` is written during this aggregation, and
//!   `previous` holds what the last aggregation wrote. When a new frame
//!   arrives, the `previous` generation moves to the pass with the same
//!   client id in the new frame.

use api::{AggregatedRenderPassId, CompositorRenderPassId, MAX_QUAD_RESOURCES};
use api::units::DeviceIntRect;
use crate::resource_provider::DisplayResourceId;
use smallvec::SmallVec;

define_index!(
    /// Position of a `ResolvedPassData` in its frame, in submission order.
    ResolvedPassIndex
);

/// Hands out aggregated render pass ids. One generator is shared by all the
/// surfaces of an aggregation so ids never collide across surfaces.
#[derive(Debug, Default)]
pub struct AggregatedRenderPassIdGenerator {
    last_id: u64,
}

impl AggregatedRenderPassIdGenerator {
    pub fn new() -> Self {
        AggregatedRenderPassIdGenerator { last_id: 0 }
    }

    pub fn generate_next_id(&mut self) -> AggregatedRenderPassId {
        self.last_id += 1;
        AggregatedRenderPassId(self.last_id)
    }
}

/// A quad of the active frame with its resources already remapped.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedQuadData {
    /// Index into the render pass's `quad_list`. Identical for the original
    /// pass and its offset tag copy.
    pub quad_index: usize,
    pub remapped_resources: SmallVec<[DisplayResourceId; MAX_QUAD_RESOURCES]>,
    /// Set for quads that embed another pass of the same frame.
    pub embedded_pass: Option<ResolvedPassIndex>,
}

/// Which render pass a `ResolvedPassData` currently reads from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "capture", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderPassSource {
    /// The pass as submitted in the active frame.
    Original,
    /// A copy with offset tags applied, owned by `ResolvedFrameData`.
    OffsetTagCopy(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FixedPassData {
    pub render_pass_id: CompositorRenderPassId,
    pub remapped_id: AggregatedRenderPassId,
    pub is_root: bool,
    /// Index of the pass in the active frame's render pass list.
    pub frame_pass_index: usize,
    pub render_pass_source: RenderPassSource,
    pub draw_quads: Vec<ResolvedQuadData>,
    /// How many quads of this frame embed this pass.
    pub embed_count: u32,
    /// Passes embedded by this pass's quads, in quad order. May repeat.
    pub embedded_passes: SmallVec<[ResolvedPassIndex; 2]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AggregationPassData {
    /// The pass contributes to the aggregated frame.
    pub will_draw: bool,
    /// The pass is drawn to fulfil a copy request of an ancestor.
    pub in_copy_request_pass: bool,
    pub in_cached_render_pass: bool,
    /// Some ancestor applies a filter that moves pixels.
    pub in_pixel_moving_filter_pass: bool,
    /// Damage from embedded content, in this pass's space.
    pub added_damage: DeviceIntRect,
}

impl Default for AggregationPassData {
    fn default() -> Self {
        AggregationPassData {
            will_draw: false,
            in_copy_request_pass: false,
            in_cached_render_pass: false,
            in_pixel_moving_filter_pass: false,
            added_damage: DeviceIntRect::zero(),
        }
    }
}

impl AggregationPassData {
    pub fn reset(&mut self) {
        *self = AggregationPassData::default();
    }
}

/// Whether a pass has been merged into its embedder across aggregations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "capture", derive(serde::Serialize, serde::Deserialize))]
pub enum MergeState {
    Init,
    NotMerged,
    AlwaysMerged,
    SomeTimesMerged,
}

impl MergeState {
    pub fn record(self, merged: bool) -> MergeState {
        match (self, merged) {
            (MergeState::Init, true) => MergeState::AlwaysMerged,
            (MergeState::Init, false) => MergeState::NotMerged,
            (MergeState::NotMerged, true) |
            (MergeState::AlwaysMerged, false) => MergeState::SomeTimesMerged,
            (state, _) => state,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PersistentPassData {
    pub merge_state: MergeState,
    /// Clip applied by the embedder last time the pass was drawn.
    pub parent_clip_rect: DeviceIntRect,
}

impl Default for PersistentPassData {
    fn default() -> Self {
        PersistentPassData {
            merge_state: MergeState::Init,
            parent_clip_rect: DeviceIntRect::zero(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPassData {
    fixed: FixedPassData,
    aggregation: AggregationPassData,
    current_persistent_data: PersistentPassData,
    previous_persistent_data: PersistentPassData,
}

impl ResolvedPassData {
    pub fn new(fixed: FixedPassData) -> Self {
        ResolvedPassData {
            fixed,
            aggregation: AggregationPassData::default(),
            current_persistent_data: PersistentPassData::default(),
            previous_persistent_data: PersistentPassData::default(),
        }
    }

    pub fn render_pass_id(&self) -> CompositorRenderPassId {
        self.fixed.render_pass_id
    }

    pub fn remapped_id(&self) -> AggregatedRenderPassId {
        self.fixed.remapped_id
    }

    pub fn is_root(&self) -> bool {
        self.fixed.is_root
    }

    pub fn frame_pass_index(&self) -> usize {
        self.fixed.frame_pass_index
    }

    pub fn render_pass_source(&self) -> RenderPassSource {
        self.fixed.render_pass_source
    }

    pub fn draw_quads(&self) -> &[ResolvedQuadData] {
        &self.fixed.draw_quads
    }

    pub fn embed_count(&self) -> u32 {
        self.fixed.embed_count
    }

    pub fn embedded_passes(&self) -> &[ResolvedPassIndex] {
        &self.fixed.embedded_passes
    }

    pub fn fixed(&self) -> &FixedPassData {
        &self.fixed
    }

    pub fn aggregation(&self) -> &AggregationPassData {
        &self.aggregation
    }

    pub fn aggregation_mut(&mut self) -> &mut AggregationPassData {
        &mut self.aggregation
    }

    pub fn current_persistent_data(&self) -> &PersistentPassData {
        &self.current_persistent_data
    }

    pub fn current_persistent_data_mut(&mut self) -> &mut PersistentPassData {
        &mut self.current_persistent_data
    }

    pub fn previous_persistent_data(&self) -> &PersistentPassData {
        &self.previous_persistent_data
    }

    /// Rotates persistent data at the end of an aggregation.
    pub fn copy_and_reset_persistent_pass_data(&mut self) {
        self.previous_persistent_data = std::mem::replace(
            &mut self.current_persistent_data,
            PersistentPassData::default(),
        );
    }

    pub(crate) fn set_previous_persistent_data(&mut self, data: PersistentPassData) {
        self.previous_persistent_data = data;
    }

    pub(crate) fn add_embedder(&mut self) {
        self.fixed.embed_count += 1;
    }

    pub(crate) fn set_render_pass_source(&mut self, source: RenderPassSource) {
        self.fixed.render_pass_source = source;
    }
}
