/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Offset tags move tagged quads by a value known only at aggregation time,
//! such as a scroll offset, without the client resubmitting its frame.
//!
//! The active frame is shared and never modified. When any tag has a non-zero
//! value, every pass is deep copied, tagged shared quad states in the copies
//! are translated, and each `ResolvedPassData` is pointed at its copy. The
//! copies are kept and reused until a tag value or the active frame changes.

use api::OffsetTagDefinition;
use api::units::LayoutVector2D;
use crate::index_vec::Idx;
use crate::internal_types::FastHashMap;
use crate::resolved_frame::ResolvedFrameData;
use crate::resolved_pass::RenderPassSource;
use std::sync::Arc;

impl ResolvedFrameData {
    /// Queries the current value of every tag the active frame defines and
    /// points the passes at matching tag adjusted copies.
    pub fn update_offset_tags<F>(&mut self, mut get_offset: F)
    where
        F: FnMut(&OffsetTagDefinition) -> LayoutVector2D,
    {
        if !self.config.enable_offset_tags || !self.is_valid() {
            return;
        }

        let frame = Arc::clone(&self.frame);
        let mut tag_values = FastHashMap::default();
        for definition in &frame.metadata.offset_tag_definitions {
            let value = definition.constraints.clamp(get_offset(definition));
            tag_values.insert(definition.tag, value);
        }

        if tag_values == self.offset_tag_values {
            if !self.offset_tag_render_passes.is_empty() {
                for (index, pass) in self.resolved_passes.iter_enumerated_mut() {
                    pass.set_render_pass_source(RenderPassSource::OffsetTagCopy(index.index()));
                }
                return;
            }
        } else {
            self.offset_tag_values_changed_from_last_frame = true;
            self.offset_tag_values = tag_values;
        }

        self.rebuild_render_passes_for_offset_tags();
    }

    /// Drops any tag adjusted copies and, if some tag value is non-zero,
    /// builds new ones from the active frame.
    pub fn rebuild_render_passes_for_offset_tags(&mut self) {
        self.clear_offset_tag_render_passes();

        if self.offset_tag_values.values().all(|value| *value == LayoutVector2D::zero()) {
            return;
        }

        let frame = Arc::clone(&self.frame);
        for pass in self.resolved_passes.iter_mut() {
            // Copy requests stay on the original pass.
            let mut render_pass = frame.render_pass_list[pass.frame_pass_index()].deep_copy();

            for sqs in &mut render_pass.shared_quad_state_list {
                if sqs.offset_tag.is_null() {
                    continue;
                }
                if let Some(offset) = self.offset_tag_values.get(&sqs.offset_tag) {
                    sqs.quad_to_target_transform =
                        sqs.quad_to_target_transform.then_translate(offset.to_3d());
                }
            }

            let copy_index = self.offset_tag_render_passes.len();
            self.offset_tag_render_passes.push(render_pass);
            pass.set_render_pass_source(RenderPassSource::OffsetTagCopy(copy_index));
        }

        trace!(
            "{} copied {} passes for {} offset tags",
            self.surface_id(),
            self.offset_tag_render_passes.len(),
            self.offset_tag_values.len(),
        );
    }

    pub fn has_offset_tag_render_passes(&self) -> bool {
        !self.offset_tag_render_passes.is_empty()
    }

    pub fn offset_tag_values_changed(&self) -> bool {
        self.offset_tag_values_changed_from_last_frame
    }

    pub(crate) fn clear_offset_tag_render_passes(&mut self) {
        self.offset_tag_render_passes.clear();
        for pass in self.resolved_passes.iter_mut() {
            pass.set_render_pass_source(RenderPassSource::Original);
        }
    }
}
