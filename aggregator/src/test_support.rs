/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Fake surfaces and frames shared by the unit tests.

use api::{CompositorFrame, CompositorRenderPass, CompositorRenderPassId, DrawQuad};
use api::{DrawQuadMaterial, FrameSinkId, LocalSurfaceId, ResourceFormat, ResourceId};
use api::{ReturnedResource, SharedQuadState, SurfaceId, TransferableResource};
use api::units::{DeviceIntRect, DeviceIntSize};
use crate::config::ResolvedFrameConfig;
use crate::resolved_frame::ResolvedFrameData;
use crate::resource_provider::{DisplayResourceProvider, SharedResourceProvider};
use crate::surface::{Surface, SurfaceClient};
use euclid::{rect, size2};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

#[derive(Default)]
pub struct TestClient {
    pub returned: RefCell<Vec<ReturnedResource>>,
}

impl SurfaceClient for TestClient {
    fn ref_resources(&self, _: &[TransferableResource]) {}

    fn unref_resources(&self, resources: Vec<ReturnedResource>) {
        self.returned.borrow_mut().extend(resources);
    }
}

pub struct TestSurface {
    pub frame: RefCell<Option<Arc<CompositorFrame>>>,
    pub frame_index: Cell<u64>,
    pub client: Rc<TestClient>,
}

impl TestSurface {
    pub fn new() -> Self {
        TestSurface {
            frame: RefCell::new(None),
            frame_index: Cell::new(0),
            client: Rc::new(TestClient::default()),
        }
    }

    pub fn submit(&self, frame: CompositorFrame) {
        *self.frame.borrow_mut() = Some(Arc::new(frame));
        self.frame_index.set(self.frame_index.get() + 1);
    }
}

impl Surface for TestSurface {
    fn surface_id(&self) -> SurfaceId {
        surface_id()
    }

    fn active_frame(&self) -> Option<Arc<CompositorFrame>> {
        self.frame.borrow().clone()
    }

    fn active_frame_index(&self) -> u64 {
        self.frame_index.get()
    }

    fn size_in_pixels(&self) -> DeviceIntSize {
        size2(100, 100)
    }

    fn device_scale_factor(&self) -> f32 {
        1.0
    }

    fn client(&self) -> Option<Rc<dyn SurfaceClient>> {
        let client: Rc<dyn SurfaceClient> = self.client.clone();
        Some(client)
    }
}

pub fn surface_id() -> SurfaceId {
    SurfaceId::new(FrameSinkId(1, 1), LocalSurfaceId(1))
}

pub fn provider() -> SharedResourceProvider {
    DisplayResourceProvider::new().into_shared()
}

pub fn resolved_frame(surface: &TestSurface, provider: &SharedResourceProvider) -> ResolvedFrameData {
    ResolvedFrameData::new(
        ResolvedFrameConfig::default(),
        Rc::clone(provider),
        surface,
        None,
        None,
    )
}

pub fn resource(id: u32) -> TransferableResource {
    TransferableResource::new(ResourceId(id), size2(8, 8), ResourceFormat::RGBA8)
}

/// A 100x100 pass with one solid color quad.
pub fn render_pass(id: u64, damage_rect: DeviceIntRect) -> CompositorRenderPass {
    let mut pass = CompositorRenderPass::new(
        CompositorRenderPassId(id),
        rect(0, 0, 100, 100),
        damage_rect,
    );
    let sqs = pass.push_shared_quad_state(SharedQuadState::new(rect(0.0, 0.0, 100.0, 100.0)));
    pass.push_quad(DrawQuad::new(
        rect(0.0, 0.0, 100.0, 100.0),
        sqs,
        DrawQuadMaterial::SolidColor { color: [1.0, 0.0, 0.0, 1.0] },
    ));
    pass
}

pub fn embed(pass: &mut CompositorRenderPass, embedded: u64) {
    let sqs = pass.push_shared_quad_state(SharedQuadState::new(rect(0.0, 0.0, 50.0, 50.0)));
    pass.push_quad(DrawQuad::new(
        rect(0.0, 0.0, 50.0, 50.0),
        sqs,
        DrawQuadMaterial::CompositorRenderPass {
            render_pass_id: CompositorRenderPassId(embedded),
            mask_resource_id: ResourceId::INVALID,
        },
    ));
}

pub fn texture(pass: &mut CompositorRenderPass, resource_id: u32) {
    let sqs = pass.push_shared_quad_state(SharedQuadState::new(rect(0.0, 0.0, 10.0, 10.0)));
    pass.push_quad(DrawQuad::new(
        rect(0.0, 0.0, 10.0, 10.0),
        sqs,
        DrawQuadMaterial::Texture {
            resource_id: ResourceId(resource_id),
            premultiplied_alpha: true,
        },
    ));
}

pub fn frame(render_pass_list: Vec<CompositorRenderPass>) -> CompositorFrame {
    CompositorFrame {
        render_pass_list,
        ..CompositorFrame::default()
    }
}
