/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use api::{CompositorFrame, ReturnedResource, SurfaceId, TransferableResource};
use api::units::DeviceIntSize;
use std::rc::Rc;
use std::sync::Arc;

/// The frame producer behind a surface, as seen by the display compositor.
pub trait SurfaceClient {
    /// Keeps `resources` alive on the client side while they are in use by
    /// the display compositor.
    fn ref_resources(&self, resources: &[TransferableResource]);

    fn unref_resources(&self, resources: Vec<ReturnedResource>);
}

/// One independently submitted stream of frames. Owned elsewhere.
pub trait Surface {
    fn surface_id(&self) -> SurfaceId;

    fn active_frame(&self) -> Option<Arc<CompositorFrame>>;

    /// Increases by one for every frame that becomes active.
    fn active_frame_index(&self) -> u64;

    fn size_in_pixels(&self) -> DeviceIntSize;

    fn device_scale_factor(&self) -> f32;

    fn client(&self) -> Option<Rc<dyn SurfaceClient>>;
}
