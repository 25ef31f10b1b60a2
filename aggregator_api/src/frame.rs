/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! What a client submits: a list of render passes, each a list of quads
//! drawn into the pass's output rect, plus the resources those quads read.
//!
//! The last render pass of a frame is the root pass. A pass may embed an
//! earlier pass of the same frame through a `CompositorRenderPass` quad.

use crate::ids::{CompositorRenderPassId, OffsetTag, SurfaceId};
use crate::offset_tag::OffsetTagDefinition;
use crate::resources::{ResourceId, TransferableResource};
use crate::units::{DeviceIntRect, DeviceIntSize, LayoutRect, LayoutTransform};
#[cfg(any(feature = "serialize", feature = "deserialize"))]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Upper bound on the resources one quad can reference.
pub const MAX_QUAD_RESOURCES: usize = 4;

pub type QuadResources = SmallVec<[ResourceId; MAX_QUAD_RESOURCES]>;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub enum BlendMode {
    SrcOver,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
}

impl Default for BlendMode {
    fn default() -> Self {
        BlendMode::SrcOver
    }
}

/// State shared by a run of consecutive quads in a render pass.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct SharedQuadState {
    pub quad_to_target_transform: LayoutTransform,
    pub quad_layer_rect: LayoutRect,
    pub visible_quad_layer_rect: LayoutRect,
    pub clip_rect: Option<DeviceIntRect>,
    pub opacity: f32,
    pub blend_mode: BlendMode,
    /// Quads under this state move with the tag's value at aggregation time.
    pub offset_tag: OffsetTag,
}

impl SharedQuadState {
    pub fn new(quad_layer_rect: LayoutRect) -> Self {
        SharedQuadState {
            quad_to_target_transform: LayoutTransform::identity(),
            quad_layer_rect,
            visible_quad_layer_rect: quad_layer_rect,
            clip_rect: None,
            opacity: 1.0,
            blend_mode: BlendMode::default(),
            offset_tag: OffsetTag::NULL,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub enum DrawQuadMaterial {
    SolidColor {
        color: [f32; 4],
    },
    Texture {
        resource_id: ResourceId,
        premultiplied_alpha: bool,
    },
    Tile {
        resource_id: ResourceId,
    },
    YuvVideo {
        y_plane: ResourceId,
        u_plane: ResourceId,
        v_plane: ResourceId,
        a_plane: ResourceId,
    },
    /// Draws the output of an earlier render pass of the same frame.
    CompositorRenderPass {
        render_pass_id: CompositorRenderPassId,
        mask_resource_id: ResourceId,
    },
    /// Embeds another surface. Resolved by the aggregator, not here.
    SurfaceContent {
        surface_id: SurfaceId,
    },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct DrawQuad {
    pub rect: LayoutRect,
    pub visible_rect: LayoutRect,
    pub needs_blending: bool,
    /// Index into the owning pass's `shared_quad_state_list`.
    pub shared_quad_state: usize,
    pub material: DrawQuadMaterial,
}

impl DrawQuad {
    pub fn new(rect: LayoutRect, shared_quad_state: usize, material: DrawQuadMaterial) -> Self {
        DrawQuad {
            rect,
            visible_rect: rect,
            needs_blending: false,
            shared_quad_state,
            material,
        }
    }

    /// The valid resource ids this quad reads, in slot order.
    pub fn resources(&self) -> QuadResources {
        let mut resources = QuadResources::new();
        match self.material {
            DrawQuadMaterial::SolidColor { .. } |
            DrawQuadMaterial::SurfaceContent { .. } => {}
            DrawQuadMaterial::Texture { resource_id, .. } |
            DrawQuadMaterial::Tile { resource_id } => {
                resources.push(resource_id);
            }
            DrawQuadMaterial::YuvVideo { y_plane, u_plane, v_plane, a_plane } => {
                resources.extend_from_slice(&[y_plane, u_plane, v_plane, a_plane]);
            }
            DrawQuadMaterial::CompositorRenderPass { mask_resource_id, .. } => {
                resources.push(mask_resource_id);
            }
        }
        resources.retain(|id| id.is_valid());
        resources
    }

    /// The embedded pass, for `CompositorRenderPass` quads.
    pub fn embedded_render_pass_id(&self) -> Option<CompositorRenderPassId> {
        match self.material {
            DrawQuadMaterial::CompositorRenderPass { render_pass_id, .. } => Some(render_pass_id),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CopyOutputResult {
    pub size: DeviceIntSize,
    pub is_empty: bool,
}

pub type CopyOutputCallback = Box<dyn FnOnce(CopyOutputResult) + Send>;

/// A one-shot request for a readback of a render pass. Never cloned: each
/// request is answered exactly once. Dropping an unanswered request answers
/// it with an empty result.
pub struct CopyOutputRequest {
    pub result_selection: Option<DeviceIntRect>,
    callback: Option<CopyOutputCallback>,
}

impl CopyOutputRequest {
    pub fn new(callback: CopyOutputCallback) -> Self {
        CopyOutputRequest {
            result_selection: None,
            callback: Some(callback),
        }
    }

    pub fn send_result(mut self, result: CopyOutputResult) {
        if let Some(callback) = self.callback.take() {
            callback(result);
        }
    }
}

impl Drop for CopyOutputRequest {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            callback(CopyOutputResult {
                size: DeviceIntSize::zero(),
                is_empty: true,
            });
        }
    }
}

impl fmt::Debug for CopyOutputRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CopyOutputRequest")
            .field("result_selection", &self.result_selection)
            .field("answered", &self.callback.is_none())
            .finish()
    }
}

#[derive(Debug)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct CompositorRenderPass {
    pub id: CompositorRenderPassId,
    pub output_rect: DeviceIntRect,
    pub damage_rect: DeviceIntRect,
    pub transform_to_root_target: LayoutTransform,
    pub shared_quad_state_list: Vec<SharedQuadState>,
    pub quad_list: Vec<DrawQuad>,
    #[cfg_attr(any(feature = "serialize", feature = "deserialize"), serde(skip))]
    pub copy_requests: Vec<CopyOutputRequest>,
    pub has_transparent_background: bool,
    pub cache_render_pass: bool,
    pub has_damage_from_contributing_content: bool,
}

impl CompositorRenderPass {
    pub fn new(
        id: CompositorRenderPassId,
        output_rect: DeviceIntRect,
        damage_rect: DeviceIntRect,
    ) -> Self {
        CompositorRenderPass {
            id,
            output_rect,
            damage_rect,
            transform_to_root_target: LayoutTransform::identity(),
            shared_quad_state_list: Vec::new(),
            quad_list: Vec::new(),
            copy_requests: Vec::new(),
            has_transparent_background: true,
            cache_render_pass: false,
            has_damage_from_contributing_content: false,
        }
    }

    /// Appends a shared quad state, returning its index for new quads.
    pub fn push_shared_quad_state(&mut self, state: SharedQuadState) -> usize {
        self.shared_quad_state_list.push(state);
        self.shared_quad_state_list.len() - 1
    }

    pub fn push_quad(&mut self, quad: DrawQuad) {
        debug_assert!(quad.shared_quad_state < self.shared_quad_state_list.len());
        self.quad_list.push(quad);
    }

    pub fn shared_quad_state(&self, quad: &DrawQuad) -> Option<&SharedQuadState> {
        self.shared_quad_state_list.get(quad.shared_quad_state)
    }

    /// A copy of everything except the copy requests, which stay with `self`.
    pub fn deep_copy(&self) -> CompositorRenderPass {
        CompositorRenderPass {
            id: self.id,
            output_rect: self.output_rect,
            damage_rect: self.damage_rect,
            transform_to_root_target: self.transform_to_root_target,
            shared_quad_state_list: self.shared_quad_state_list.clone(),
            quad_list: self.quad_list.clone(),
            copy_requests: Vec::new(),
            has_transparent_background: self.has_transparent_background,
            cache_render_pass: self.cache_render_pass,
            has_damage_from_contributing_content: self.has_damage_from_contributing_content,
        }
    }

    pub fn take_copy_requests(&mut self) -> Vec<CopyOutputRequest> {
        std::mem::replace(&mut self.copy_requests, Vec::new())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct CompositorFrameMetadata {
    pub device_scale_factor: f32,
    pub frame_token: u32,
    pub offset_tag_definitions: Vec<OffsetTagDefinition>,
}

#[derive(Debug, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize))]
#[cfg_attr(feature = "deserialize", derive(Deserialize))]
pub struct CompositorFrame {
    pub metadata: CompositorFrameMetadata,
    pub resource_list: Vec<TransferableResource>,
    pub render_pass_list: Vec<CompositorRenderPass>,
}

impl CompositorFrame {
    pub fn root_render_pass(&self) -> Option<&CompositorRenderPass> {
        self.render_pass_list.last()
    }

    pub fn size_in_pixels(&self) -> DeviceIntSize {
        self.root_render_pass()
            .map_or(DeviceIntSize::zero(), |pass| pass.output_rect.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::LayoutRect;
    use euclid::rect;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn pass_with_request(answered: &Arc<AtomicUsize>) -> CompositorRenderPass {
        let mut pass = CompositorRenderPass::new(
            CompositorRenderPassId(1),
            rect(0, 0, 10, 10),
            rect(0, 0, 10, 10),
        );
        let sqs = pass.push_shared_quad_state(SharedQuadState::new(LayoutRect::zero()));
        pass.push_quad(DrawQuad::new(
            rect(0.0, 0.0, 10.0, 10.0),
            sqs,
            DrawQuadMaterial::SolidColor { color: [1.0, 0.0, 0.0, 1.0] },
        ));
        let answered = Arc::clone(answered);
        pass.copy_requests.push(CopyOutputRequest::new(Box::new(move |_| {
            answered.fetch_add(1, Ordering::SeqCst);
        })));
        pass
    }

    #[test]
    fn deep_copy_leaves_copy_requests_on_original() {
        let answered = Arc::new(AtomicUsize::new(0));
        let mut pass = pass_with_request(&answered);
        let copy = pass.deep_copy();
        assert!(copy.copy_requests.is_empty());
        assert_eq!(copy.quad_list, pass.quad_list);
        assert_eq!(pass.copy_requests.len(), 1);

        drop(copy);
        assert_eq!(answered.load(Ordering::SeqCst), 0);

        let requests = pass.take_copy_requests();
        assert!(pass.copy_requests.is_empty());
        drop(requests);
        assert_eq!(answered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn quad_resources_skip_invalid_slots() {
        let quad = DrawQuad::new(
            rect(0.0, 0.0, 1.0, 1.0),
            0,
            DrawQuadMaterial::YuvVideo {
                y_plane: ResourceId(3),
                u_plane: ResourceId(4),
                v_plane: ResourceId(5),
                a_plane: ResourceId::INVALID,
            },
        );
        assert_eq!(&quad.resources()[..], &[ResourceId(3), ResourceId(4), ResourceId(5)]);

        let embed = DrawQuad::new(
            rect(0.0, 0.0, 1.0, 1.0),
            0,
            DrawQuadMaterial::CompositorRenderPass {
                render_pass_id: CompositorRenderPassId(7),
                mask_resource_id: ResourceId::INVALID,
            },
        );
        assert!(embed.resources().is_empty());
        assert_eq!(embed.embedded_render_pass_id(), Some(CompositorRenderPassId(7)));
    }
}
