/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Per-surface state derived from the surface's active frame.
//!
//! `ResolvedFrameData` is created the first time a surface is aggregated and
//! lives as long as the aggregator keeps drawing that surface. Every time the
//! surface activates a new frame, `update_for_active_frame` validates it and
//! rebuilds the per-pass data:
//!
//! * client render pass ids are mapped to aggregated ids, keeping the same
//!   aggregated id for as long as the client keeps using a pass id,
//! * embedded pass quads are resolved to the passes they draw, which must
//!   come earlier in the frame,
//! * quad resources are remapped into the display resource namespace.
//!
//! A frame that fails any of these checks makes the whole object invalid
//! until the next frame arrives. Frames come from untrusted clients, so none
//! of these failures panic.

use api::{AggregatedRenderPassId, CompositorFrame, CompositorRenderPass, CompositorRenderPassId};
use api::{DrawQuad, OffsetTag, ResourceId, SharedQuadState, SurfaceId};
use api::units::{DeviceIntRect, LayoutVector2D};
use crate::config::ResolvedFrameConfig;
use crate::index_vec::IndexVec;
use crate::internal_types::{FastHashMap, FastHashSet};
use crate::resolved_pass::{AggregatedRenderPassIdGenerator, FixedPassData, RenderPassSource};
use crate::resolved_pass::{ResolvedPassData, ResolvedPassIndex, ResolvedQuadData};
use crate::resource_provider::{ChildId, ResourceIdMap, ReturnCallback, SharedResourceProvider};
use crate::surface::{Surface, SurfaceClient};
use smallvec::SmallVec;
use std::collections::hash_map::Entry;
use std::error::Error;
use std::rc::Rc;
use std::sync::Arc;
use std::{fmt, mem};

/// Why a frame was rejected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FrameValidationError {
    /// The surface had no active frame to resolve.
    NoActiveFrame,
    /// The frame had no render passes, so no root pass.
    EmptyRenderPassList,
    /// A quad embeds a pass that is not declared earlier in the frame.
    UnknownEmbeddedPass {
        render_pass_id: CompositorRenderPassId,
        embedded_id: CompositorRenderPassId,
    },
    /// A quad reads a resource the frame did not provide.
    UndeclaredResource {
        render_pass_id: CompositorRenderPassId,
        resource_id: ResourceId,
    },
    /// Two passes of the frame share an id.
    DuplicatePassId(CompositorRenderPassId),
    /// A quad points past its pass's shared quad states.
    SharedQuadStateOutOfRange {
        render_pass_id: CompositorRenderPassId,
        index: usize,
    },
}

impl fmt::Display for FrameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FrameValidationError::NoActiveFrame => write!(f, "surface has no active frame"),
            FrameValidationError::EmptyRenderPassList => write!(f, "frame has no render passes"),
            FrameValidationError::UnknownEmbeddedPass { render_pass_id, embedded_id } => write!(
                f,
                "render pass {:?} embeds unknown or later render pass {:?}",
                render_pass_id, embedded_id,
            ),
            FrameValidationError::UndeclaredResource { render_pass_id, resource_id } => write!(
                f,
                "render pass {:?} uses undeclared resource {:?}",
                render_pass_id, resource_id,
            ),
            FrameValidationError::DuplicatePassId(id) => {
                write!(f, "duplicate render pass id {:?}", id)
            }
            FrameValidationError::SharedQuadStateOutOfRange { render_pass_id, index } => write!(
                f,
                "render pass {:?} has a quad with shared quad state {} out of range",
                render_pass_id, index,
            ),
        }
    }
}

impl Error for FrameValidationError {}

/// How the active frame relates to the one used by the previous aggregation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameDamageType {
    /// Same frame as last time: nothing changed.
    None,
    /// The next frame after last time: the root pass damage is exact.
    Frame,
    /// Frames were skipped, or there was no previous frame.
    Full,
}

/// The outcome of resolving one frame, committed only once complete.
struct ResolvedPasses {
    passes: IndexVec<ResolvedPassIndex, ResolvedPassData>,
    pass_id_map: FastHashMap<CompositorRenderPassId, ResolvedPassIndex>,
    aggregated_id_map: FastHashMap<CompositorRenderPassId, AggregatedRenderPassId>,
    referenced_resources: FastHashSet<ResourceId>,
}

pub struct ResolvedFrameData {
    pub(crate) config: ResolvedFrameConfig,
    resource_provider: SharedResourceProvider,
    surface_id: SurfaceId,
    client: Option<Rc<dyn SurfaceClient>>,
    child_id: ChildId,

    valid: bool,
    // Empty until the first valid frame, and after an invalid one.
    pub(crate) frame: Arc<CompositorFrame>,
    frame_index: Option<u64>,
    previous_frame_index: Option<u64>,

    pub(crate) resolved_passes: IndexVec<ResolvedPassIndex, ResolvedPassData>,
    render_pass_id_map: FastHashMap<CompositorRenderPassId, ResolvedPassIndex>,
    // Outlives `resolved_passes`: kept across invalid frames, pruned to the
    // passes of each valid frame.
    aggregated_id_map: FastHashMap<CompositorRenderPassId, AggregatedRenderPassId>,
    prev_root_pass_id: Option<AggregatedRenderPassId>,
    used_in_aggregation: bool,

    pub(crate) offset_tag_values: FastHashMap<OffsetTag, LayoutVector2D>,
    pub(crate) offset_tag_values_changed_from_last_frame: bool,
    pub(crate) offset_tag_render_passes: Vec<CompositorRenderPass>,
}

impl ResolvedFrameData {
    /// `previous_frame_index` and `prev_root_pass_id` carry state over from
    /// an earlier surface of the same client, when there is one, so that
    /// switching surfaces does not force full damage or a new root id.
    pub fn new(
        config: ResolvedFrameConfig,
        resource_provider: SharedResourceProvider,
        surface: &dyn Surface,
        previous_frame_index: Option<u64>,
        prev_root_pass_id: Option<AggregatedRenderPassId>,
    ) -> Self {
        let surface_id = surface.surface_id();
        let client = surface.client();
        let child_id = register_with_resource_provider(&resource_provider, surface_id, &client);

        ResolvedFrameData {
            config,
            resource_provider,
            surface_id,
            client,
            child_id,
            valid: false,
            frame: Arc::new(CompositorFrame::default()),
            frame_index: None,
            previous_frame_index,
            resolved_passes: IndexVec::default(),
            render_pass_id_map: FastHashMap::default(),
            aggregated_id_map: FastHashMap::default(),
            prev_root_pass_id,
            used_in_aggregation: false,
            offset_tag_values: FastHashMap::default(),
            offset_tag_values_changed_from_last_frame: false,
            offset_tag_render_passes: Vec::new(),
        }
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    pub fn child_id(&self) -> ChildId {
        self.child_id
    }

    pub fn config(&self) -> &ResolvedFrameConfig {
        &self.config
    }

    /// Queries other than the frame indices are only meaningful while valid.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn frame_index(&self) -> Option<u64> {
        self.frame_index
    }

    pub fn previous_frame_index(&self) -> Option<u64> {
        self.previous_frame_index
    }

    /// The frame the resolved passes were built from.
    pub fn active_frame(&self) -> &CompositorFrame {
        &self.frame
    }

    /// Rebuilds all per-pass data from the surface's active frame.
    ///
    /// On error the object is invalid until a later frame resolves, and the
    /// caller must not read any pass data from it.
    pub fn update_for_active_frame(
        &mut self,
        surface: &dyn Surface,
        id_generator: &mut AggregatedRenderPassIdGenerator,
    ) -> Result<(), FrameValidationError> {
        debug_assert_eq!(surface.surface_id(), self.surface_id);

        self.mark_as_used_in_aggregation();

        let frame_index = surface.active_frame_index();
        let frame = match surface.active_frame() {
            Some(frame) => frame,
            None => {
                debug!("{} has no active frame", self.surface_id);
                self.set_invalid(frame_index);
                return Err(FrameValidationError::NoActiveFrame);
            }
        };
        if frame.render_pass_list.is_empty() {
            debug!("{} has a frame without render passes", self.surface_id);
            self.set_invalid(frame_index);
            return Err(FrameValidationError::EmptyRenderPassList);
        }

        if let Some(ref client) = self.client {
            client.ref_resources(&frame.resource_list);
        }
        self.resource_provider
            .borrow_mut()
            .receive_from_child(self.child_id, &frame.resource_list);

        // The old passes only feed persistent data into the new ones now.
        let previous_passes = mem::replace(&mut self.resolved_passes, IndexVec::default());
        self.render_pass_id_map.clear();
        self.clear_offset_tag_render_passes();

        let provider = Rc::clone(&self.resource_provider);
        let result = self.resolve_render_passes(
            &frame,
            provider.borrow().child_to_parent_map(self.child_id),
            id_generator,
        );

        let mut resolved = match result {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!("rejecting frame {} from {}: {}", frame_index, self.surface_id, err);
                self.set_invalid(frame_index);
                return Err(err);
            }
        };

        for old_pass in previous_passes.iter() {
            if let Some(&index) = resolved.pass_id_map.get(&old_pass.render_pass_id()) {
                resolved.passes[index]
                    .set_previous_persistent_data(old_pass.previous_persistent_data().clone());
            }
        }

        // Anything received but not referenced goes back to the client.
        self.resource_provider
            .borrow_mut()
            .declare_used_resources_from_child(self.child_id, &resolved.referenced_resources);

        self.prev_root_pass_id = resolved.passes.last().map(|pass| pass.remapped_id());
        self.resolved_passes = resolved.passes;
        self.render_pass_id_map = resolved.pass_id_map;
        self.aggregated_id_map = resolved.aggregated_id_map;
        self.frame = frame;
        self.frame_index = Some(frame_index);
        self.valid = true;

        debug!(
            "resolved frame {} of {}: {} passes, {:?} damage",
            frame_index,
            self.surface_id,
            self.resolved_passes.len(),
            self.frame_damage_type(),
        );

        Ok(())
    }

    fn resolve_render_passes(
        &self,
        frame: &CompositorFrame,
        child_to_parent_map: Option<&ResourceIdMap>,
        id_generator: &mut AggregatedRenderPassIdGenerator,
    ) -> Result<ResolvedPasses, FrameValidationError> {
        let num_render_passes = frame.render_pass_list.len();
        // Resources kept alive for earlier frames are not available to this one.
        let declared_resources: FastHashSet<ResourceId> = frame
            .resource_list
            .iter()
            .map(|resource| resource.id)
            .collect();
        let mut resolved = ResolvedPasses {
            passes: IndexVec::with_capacity(num_render_passes),
            pass_id_map: FastHashMap::default(),
            aggregated_id_map: FastHashMap::default(),
            referenced_resources: FastHashSet::default(),
        };

        for (frame_pass_index, render_pass) in frame.render_pass_list.iter().enumerate() {
            let is_root = frame_pass_index + 1 == num_render_passes;
            let remapped_id = self.remapped_id_for(
                render_pass.id,
                is_root,
                &resolved.aggregated_id_map,
                id_generator,
            );
            resolved.aggregated_id_map.insert(render_pass.id, remapped_id);

            let mut draw_quads = Vec::with_capacity(render_pass.quad_list.len());
            let mut embedded_passes = SmallVec::new();

            for (quad_index, quad) in render_pass.quad_list.iter().enumerate() {
                if quad.shared_quad_state >= render_pass.shared_quad_state_list.len() {
                    return Err(FrameValidationError::SharedQuadStateOutOfRange {
                        render_pass_id: render_pass.id,
                        index: quad.shared_quad_state,
                    });
                }

                // Only passes inserted so far can be embedded, which rules
                // out cycles.
                let embedded_pass = match quad.embedded_render_pass_id() {
                    Some(embedded_id) => {
                        let index = match resolved.pass_id_map.get(&embedded_id) {
                            Some(&index) => index,
                            None => {
                                return Err(FrameValidationError::UnknownEmbeddedPass {
                                    render_pass_id: render_pass.id,
                                    embedded_id,
                                });
                            }
                        };
                        resolved.passes[index].add_embedder();
                        embedded_passes.push(index);
                        Some(index)
                    }
                    None => None,
                };

                let mut remapped_resources = SmallVec::new();
                for resource_id in quad.resources() {
                    let display_id = if declared_resources.contains(&resource_id) {
                        child_to_parent_map
                            .and_then(|map| map.get(&resource_id))
                            .cloned()
                    } else {
                        None
                    };
                    match display_id {
                        Some(display_id) => remapped_resources.push(display_id),
                        None => {
                            return Err(FrameValidationError::UndeclaredResource {
                                render_pass_id: render_pass.id,
                                resource_id,
                            });
                        }
                    }
                    resolved.referenced_resources.insert(resource_id);
                }

                draw_quads.push(ResolvedQuadData {
                    quad_index,
                    remapped_resources,
                    embedded_pass,
                });
            }

            match resolved.pass_id_map.entry(render_pass.id) {
                Entry::Occupied(..) => {
                    return Err(FrameValidationError::DuplicatePassId(render_pass.id));
                }
                Entry::Vacant(entry) => {
                    let index = resolved.passes.push(ResolvedPassData::new(FixedPassData {
                        render_pass_id: render_pass.id,
                        remapped_id,
                        is_root,
                        frame_pass_index,
                        render_pass_source: RenderPassSource::Original,
                        draw_quads,
                        embed_count: 0,
                        embedded_passes,
                    }));
                    entry.insert(index);
                }
            }
        }

        Ok(resolved)
    }

    fn remapped_id_for(
        &self,
        render_pass_id: CompositorRenderPassId,
        is_root: bool,
        assigned_this_frame: &FastHashMap<CompositorRenderPassId, AggregatedRenderPassId>,
        id_generator: &mut AggregatedRenderPassIdGenerator,
    ) -> AggregatedRenderPassId {
        if let Some(&id) = assigned_this_frame.get(&render_pass_id) {
            return id;
        }
        if let Some(&id) = self.aggregated_id_map.get(&render_pass_id) {
            return id;
        }

        // A root pass with a new client id keeps the old root's aggregated
        // id, unless an earlier pass of this frame already holds it.
        if is_root && self.config.reuse_root_pass_id {
            if let Some(prev_root_id) = self.prev_root_pass_id {
                if !assigned_this_frame.values().any(|&id| id == prev_root_id) {
                    trace!("{:?} takes over root id {:?}", render_pass_id, prev_root_id);
                    return prev_root_id;
                }
            }
        }

        let id = id_generator.generate_next_id();
        trace!("{:?} of {} is now {:?}", render_pass_id, self.surface_id, id);
        id
    }

    fn set_invalid(&mut self, frame_index: u64) {
        self.frame_index = Some(frame_index);
        self.resolved_passes.clear();
        self.render_pass_id_map.clear();
        self.offset_tag_render_passes.clear();
        self.offset_tag_values.clear();
        self.offset_tag_values_changed_from_last_frame = false;
        self.frame = Arc::new(CompositorFrame::default());
        self.valid = false;
    }

    /// Makes the next `surface_damage` report full damage.
    pub fn set_full_damage_for_next_aggregation(&mut self) {
        self.previous_frame_index = None;
    }

    /// Hands every resource back to the client. Resources of later frames
    /// are held under a fresh child registration.
    pub fn force_release_resource(&mut self) {
        self.resource_provider.borrow_mut().destroy_child(self.child_id);
        self.child_id =
            register_with_resource_provider(&self.resource_provider, self.surface_id, &self.client);
    }

    pub fn mark_as_used_in_aggregation(&mut self) {
        self.used_in_aggregation = true;
    }

    pub fn was_used_in_aggregation(&self) -> bool {
        self.used_in_aggregation
    }

    /// Ends the aggregation that used this frame.
    pub fn reset_after_aggregation(&mut self) {
        for pass in self.resolved_passes.iter_mut() {
            pass.aggregation_mut().reset();
            pass.copy_and_reset_persistent_pass_data();
        }
        self.previous_frame_index = self.frame_index;
        self.used_in_aggregation = false;
        self.offset_tag_values_changed_from_last_frame = false;
    }

    pub fn frame_damage_type(&self) -> FrameDamageType {
        debug_assert!(self.valid);
        match (self.previous_frame_index, self.frame_index) {
            (Some(previous), Some(current)) if previous == current => FrameDamageType::None,
            (Some(previous), Some(current)) if previous.checked_add(1) == Some(current) => {
                FrameDamageType::Frame
            }
            _ => FrameDamageType::Full,
        }
    }

    /// The part of the output that changed since the previous aggregation.
    pub fn surface_damage(&self) -> DeviceIntRect {
        if !self.valid {
            return DeviceIntRect::zero();
        }

        // Damage from moved tagged quads is not tracked. Redraw everything.
        if self.offset_tag_values_changed_from_last_frame ||
           !self.offset_tag_render_passes.is_empty() {
            return self.output_rect();
        }

        match self.frame_damage_type() {
            FrameDamageType::None => DeviceIntRect::zero(),
            FrameDamageType::Frame => self.render_pass(self.root_render_pass_data()).damage_rect,
            FrameDamageType::Full => self.output_rect(),
        }
    }

    pub fn output_rect(&self) -> DeviceIntRect {
        if !self.valid {
            return DeviceIntRect::zero();
        }
        self.render_pass(self.root_render_pass_data()).output_rect
    }

    pub fn will_draw(&self) -> bool {
        self.valid && self.root_render_pass_data().aggregation().will_draw
    }

    /// # Panics
    /// If the object is not valid.
    pub fn root_render_pass_data(&self) -> &ResolvedPassData {
        debug_assert!(self.valid);
        match self.resolved_passes.last() {
            Some(pass) => pass,
            None => panic!("bug: root render pass of invalid frame for {}", self.surface_id),
        }
    }

    pub fn root_render_pass_data_mut(&mut self) -> &mut ResolvedPassData {
        debug_assert!(self.valid);
        let surface_id = self.surface_id;
        match self.resolved_passes.last_mut() {
            Some(pass) => pass,
            None => panic!("bug: root render pass of invalid frame for {}", surface_id),
        }
    }

    pub fn render_pass_data_by_id(&self, id: CompositorRenderPassId) -> Option<&ResolvedPassData> {
        debug_assert!(self.valid);
        let index = *self.render_pass_id_map.get(&id)?;
        self.resolved_passes.get(index)
    }

    pub fn render_pass_data_by_id_mut(
        &mut self,
        id: CompositorRenderPassId,
    ) -> Option<&mut ResolvedPassData> {
        debug_assert!(self.valid);
        let index = *self.render_pass_id_map.get(&id)?;
        self.resolved_passes.get_mut(index)
    }

    /// Follows the indices in `ResolvedQuadData::embedded_pass` and
    /// `ResolvedPassData::embedded_passes`.
    pub fn resolved_pass(&self, index: ResolvedPassIndex) -> &ResolvedPassData {
        &self.resolved_passes[index]
    }

    /// In submission order, root last.
    pub fn resolved_passes(&self) -> impl Iterator<Item = &ResolvedPassData> {
        self.resolved_passes.iter()
    }

    pub fn resolved_passes_mut(&mut self) -> impl Iterator<Item = &mut ResolvedPassData> {
        self.resolved_passes.iter_mut()
    }

    pub fn num_resolved_passes(&self) -> usize {
        self.resolved_passes.len()
    }

    /// The aggregated id the client pass id currently maps to, even while
    /// the object is invalid.
    pub fn aggregated_id_for(&self, id: CompositorRenderPassId) -> Option<AggregatedRenderPassId> {
        self.aggregated_id_map.get(&id).cloned()
    }

    /// The render pass `pass` currently draws: the submitted pass, or its
    /// offset tag copy.
    pub fn render_pass(&self, pass: &ResolvedPassData) -> &CompositorRenderPass {
        match pass.render_pass_source() {
            RenderPassSource::Original => &self.frame.render_pass_list[pass.frame_pass_index()],
            RenderPassSource::OffsetTagCopy(index) => &self.offset_tag_render_passes[index],
        }
    }

    pub fn quad(&self, pass: &ResolvedPassData, quad: &ResolvedQuadData) -> &DrawQuad {
        &self.render_pass(pass).quad_list[quad.quad_index]
    }

    pub fn shared_quad_state(
        &self,
        pass: &ResolvedPassData,
        quad: &ResolvedQuadData,
    ) -> &SharedQuadState {
        let render_pass = self.render_pass(pass);
        &render_pass.shared_quad_state_list[render_pass.quad_list[quad.quad_index].shared_quad_state]
    }
}

impl Drop for ResolvedFrameData {
    fn drop(&mut self) {
        match self.resource_provider.try_borrow_mut() {
            Ok(mut provider) => provider.destroy_child(self.child_id),
            Err(..) => warn!("resource provider busy, leaking child {:?}", self.child_id),
        }
    }
}

impl fmt::Debug for ResolvedFrameData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ResolvedFrameData")
            .field("surface_id", &self.surface_id)
            .field("child_id", &self.child_id)
            .field("valid", &self.valid)
            .field("frame_index", &self.frame_index)
            .field("previous_frame_index", &self.previous_frame_index)
            .field("passes", &self.resolved_passes.len())
            .field("offset_tag_render_passes", &self.offset_tag_render_passes.len())
            .finish()
    }
}

fn register_with_resource_provider(
    resource_provider: &SharedResourceProvider,
    surface_id: SurfaceId,
    client: &Option<Rc<dyn SurfaceClient>>,
) -> ChildId {
    let client = client.clone();
    let return_callback: ReturnCallback = Box::new(move |resources| {
        if let Some(ref client) = client {
            client.unref_resources(resources);
        }
    });
    resource_provider.borrow_mut().create_child(return_callback, surface_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use euclid::rect;

    #[test]
    fn first_frame_is_full_damage() {
        let provider = provider();
        let surface = TestSurface::new();
        surface.submit(frame(vec![render_pass(1, rect(0, 0, 50, 50))]));

        let mut frame = resolved_frame(&surface, &provider);
        let mut id_generator = AggregatedRenderPassIdGenerator::new();
        assert_eq!(frame.update_for_active_frame(&surface, &mut id_generator), Ok(()));
        assert!(frame.is_valid());
        assert_eq!(frame.num_resolved_passes(), 1);
        assert!(frame.root_render_pass_data().is_root());
        assert_eq!(frame.frame_damage_type(), FrameDamageType::Full);
        assert_eq!(frame.surface_damage(), rect(0, 0, 100, 100));
    }

    #[test]
    fn damage_follows_frame_indices() {
        let provider = provider();
        let surface = TestSurface::new();
        let mut id_generator = AggregatedRenderPassIdGenerator::new();
        surface.submit(frame(vec![render_pass(1, rect(0, 0, 50, 50))]));
        let mut frame = resolved_frame(&surface, &provider);
        frame.update_for_active_frame(&surface, &mut id_generator).unwrap();
        frame.reset_after_aggregation();

        frame.update_for_active_frame(&surface, &mut id_generator).unwrap();
        assert_eq!(frame.frame_damage_type(), FrameDamageType::None);
        assert!(frame.surface_damage().is_empty());
        frame.reset_after_aggregation();

        surface.submit(single_pass(rect(10, 10, 20, 20)));
        frame.update_for_active_frame(&surface, &mut id_generator).unwrap();
        assert_eq!(frame.frame_damage_type(), FrameDamageType::Frame);
        assert_eq!(frame.surface_damage(), rect(10, 10, 20, 20));

        frame.set_full_damage_for_next_aggregation();
        assert_eq!(frame.surface_damage(), rect(0, 0, 100, 100));
    }

    fn single_pass(damage_rect: DeviceIntRect) -> CompositorFrame {
        frame(vec![render_pass(1, damage_rect)])
    }

    #[test]
    fn self_embedding_pass_is_rejected() {
        let provider = provider();
        let surface = TestSurface::new();
        let mut root = render_pass(1, rect(0, 0, 10, 10));
        embed(&mut root, 1);
        surface.submit(frame(vec![root]));

        let mut frame = resolved_frame(&surface, &provider);
        let result = frame.update_for_active_frame(&surface, &mut AggregatedRenderPassIdGenerator::new());
        assert_eq!(
            result,
            Err(FrameValidationError::UnknownEmbeddedPass {
                render_pass_id: CompositorRenderPassId(1),
                embedded_id: CompositorRenderPassId(1),
            }),
        );
        assert!(!frame.is_valid());
        assert_eq!(frame.num_resolved_passes(), 0);
        assert_eq!(frame.frame_index(), Some(1));
    }

    #[test]
    fn out_of_range_shared_quad_state_is_rejected() {
        let provider = provider();
        let surface = TestSurface::new();
        let mut root = render_pass(1, rect(0, 0, 10, 10));
        root.quad_list[0].shared_quad_state = 4;
        surface.submit(frame(vec![root]));

        let mut frame = resolved_frame(&surface, &provider);
        let result = frame.update_for_active_frame(&surface, &mut AggregatedRenderPassIdGenerator::new());
        assert_eq!(
            result,
            Err(FrameValidationError::SharedQuadStateOutOfRange {
                render_pass_id: CompositorRenderPassId(1),
                index: 4,
            }),
        );
    }

    #[test]
    fn missing_frame_is_invalid() {
        let provider = provider();
        let surface = TestSurface::new();
        let mut frame = resolved_frame(&surface, &provider);
        let result = frame.update_for_active_frame(&surface, &mut AggregatedRenderPassIdGenerator::new());
        assert_eq!(result, Err(FrameValidationError::NoActiveFrame));
        assert!(frame.was_used_in_aggregation());
        assert!(!frame.will_draw());
        assert_eq!(frame.output_rect(), DeviceIntRect::zero());
        assert_eq!(frame.surface_damage(), DeviceIntRect::zero());

        surface.submit(frame_with_no_passes());
        let result = frame.update_for_active_frame(&surface, &mut AggregatedRenderPassIdGenerator::new());
        assert_eq!(result, Err(FrameValidationError::EmptyRenderPassList));
    }

    fn frame_with_no_passes() -> CompositorFrame {
        frame(Vec::new())
    }

    #[test]
    fn errors_name_the_offending_ids() {
        let err = FrameValidationError::UndeclaredResource {
            render_pass_id: CompositorRenderPassId(3),
            resource_id: ResourceId(9),
        };
        let message = err.to_string();
        assert!(message.contains("CompositorRenderPassId(3)"));
        assert!(message.contains("ResourceId(9)"));
    }

    #[test]
    fn drop_destroys_child() {
        let provider = provider();
        let surface = TestSurface::new();
        let mut root = render_pass(1, rect(0, 0, 10, 10));
        texture(&mut root, 5);
        let mut submitted = frame(vec![root]);
        submitted.resource_list.push(resource(5));
        surface.submit(submitted);

        let mut frame = resolved_frame(&surface, &provider);
        frame.update_for_active_frame(&surface, &mut AggregatedRenderPassIdGenerator::new()).unwrap();
        assert!(surface.client.returned.borrow().is_empty());

        drop(frame);
        assert_eq!(surface.client.returned.borrow().len(), 1);
        assert_eq!(surface.client.returned.borrow()[0].id, ResourceId(5));
    }
}
