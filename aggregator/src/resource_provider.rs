/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Remapping of client resources into the display compositor's namespace.
//!
//! Each frame producer is registered as a *child*. Resources received from a
//! child are given a `DisplayResourceId`, unique across all children, and
//! stay alive until the child stops declaring them as used (or the child is
//! destroyed). A resource that is locked for read by the display compositor
//! outlives its last declaration and is returned when the lock is released.

use api::{ResourceId, ReturnedResource, SurfaceId, TransferableResource};
use crate::internal_types::{FastHashMap, FastHashSet};
use std::cell::RefCell;
#[cfg(feature = "capture")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// A child registration with a resource provider.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "capture", derive(Serialize, Deserialize))]
pub struct ChildId(pub u32);

/// A resource id in the display compositor's namespace.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "capture", derive(Serialize, Deserialize))]
pub struct DisplayResourceId(pub u32);

pub type ResourceIdMap = FastHashMap<ResourceId, DisplayResourceId>;

/// Invoked with the resources handed back to a child. Called while the
/// provider is borrowed, so it must not call back into the provider.
pub type ReturnCallback = Box<dyn FnMut(Vec<ReturnedResource>)>;

/// Shared by every `ResolvedFrameData` of one display compositor. Access is
/// single threaded.
pub type SharedResourceProvider = Rc<RefCell<dyn ResourceProvider>>;

pub trait ResourceProvider {
    fn create_child(&mut self, return_callback: ReturnCallback, surface_id: SurfaceId) -> ChildId;

    /// Returns every resource still held for `child` and forgets it.
    fn destroy_child(&mut self, child: ChildId);

    fn receive_from_child(&mut self, child: ChildId, resources: &[TransferableResource]);

    /// Any resource of `child` that is not in `resources_from_child` is no
    /// longer referenced by the child's frames and may be returned.
    fn declare_used_resources_from_child(
        &mut self,
        child: ChildId,
        resources_from_child: &FastHashSet<ResourceId>,
    );

    fn child_to_parent_map(&self, child: ChildId) -> Option<&ResourceIdMap>;
}

struct ChildResource {
    child: ChildId,
    id_in_child: ResourceId,
    transferable: TransferableResource,
    imported_count: u32,
    lock_for_read_count: u32,
    marked_for_deletion: bool,
}

struct Child {
    surface_id: SurfaceId,
    return_callback: ReturnCallback,
    child_to_parent_map: ResourceIdMap,
    // Set by `destroy_child` while some resources are still locked.
    marked_for_deletion: bool,
}

/// The in-process resource provider of the display compositor.
pub struct DisplayResourceProvider {
    resources: FastHashMap<DisplayResourceId, ChildResource>,
    children: FastHashMap<ChildId, Child>,
    next_child: u32,
    next_resource: u32,
}

impl DisplayResourceProvider {
    pub fn new() -> Self {
        DisplayResourceProvider {
            resources: FastHashMap::default(),
            children: FastHashMap::default(),
            next_child: 1,
            next_resource: 1,
        }
    }

    pub fn into_shared(self) -> SharedResourceProvider {
        Rc::new(RefCell::new(self))
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn num_resources(&self) -> usize {
        self.resources.len()
    }

    pub fn resource(&self, id: DisplayResourceId) -> Option<&TransferableResource> {
        self.resources.get(&id).map(|resource| &resource.transferable)
    }

    pub fn surface_id_for_child(&self, child: ChildId) -> Option<SurfaceId> {
        self.children.get(&child).map(|child| child.surface_id)
    }

    /// Keeps `id` alive while the display compositor reads from it, even if
    /// the child stops using it. Returns false for unknown resources.
    pub fn lock_for_read(&mut self, id: DisplayResourceId) -> bool {
        match self.resources.get_mut(&id) {
            Some(resource) => {
                resource.lock_for_read_count += 1;
                true
            }
            None => {
                warn!("lock_for_read of unknown resource {:?}", id);
                false
            }
        }
    }

    pub fn unlock_for_read(&mut self, id: DisplayResourceId) {
        let (child, release) = match self.resources.get_mut(&id) {
            Some(resource) => {
                debug_assert!(resource.lock_for_read_count > 0);
                resource.lock_for_read_count = resource.lock_for_read_count.saturating_sub(1);
                (
                    resource.child,
                    resource.lock_for_read_count == 0 && resource.marked_for_deletion,
                )
            }
            None => {
                warn!("unlock_for_read of unknown resource {:?}", id);
                return;
            }
        };

        if release {
            self.delete_and_return_resources(child, vec![id]);
        }
    }

    pub fn in_use(&self, id: DisplayResourceId) -> bool {
        self.resources
            .get(&id)
            .map_or(false, |resource| resource.lock_for_read_count > 0)
    }

    fn delete_and_return_resources(&mut self, child: ChildId, unused: Vec<DisplayResourceId>) {
        let mut returned = Vec::with_capacity(unused.len());

        for id in unused {
            let locked = match self.resources.get_mut(&id) {
                Some(resource) if resource.lock_for_read_count > 0 => {
                    resource.marked_for_deletion = true;
                    true
                }
                Some(_) => false,
                None => continue,
            };
            if locked {
                continue;
            }
            if let Some(resource) = self.resources.remove(&id) {
                if let Some(child_info) = self.children.get_mut(&child) {
                    child_info.child_to_parent_map.remove(&resource.id_in_child);
                }
                returned.push(ReturnedResource {
                    id: resource.id_in_child,
                    count: resource.imported_count,
                    lost: false,
                });
            }
        }

        let remove_child = match self.children.get_mut(&child) {
            Some(child_info) => {
                if !returned.is_empty() {
                    (child_info.return_callback)(returned);
                }
                child_info.marked_for_deletion && child_info.child_to_parent_map.is_empty()
            }
            None => {
                debug_assert!(returned.is_empty());
                false
            }
        };

        if remove_child {
            debug!("removing child {:?} after last locked resource", child);
            self.children.remove(&child);
        }
    }
}

impl Default for DisplayResourceProvider {
    fn default() -> Self {
        DisplayResourceProvider::new()
    }
}

impl fmt::Debug for DisplayResourceProvider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DisplayResourceProvider")
            .field("children", &self.children.len())
            .field("resources", &self.resources.len())
            .finish()
    }
}

impl ResourceProvider for DisplayResourceProvider {
    fn create_child(&mut self, return_callback: ReturnCallback, surface_id: SurfaceId) -> ChildId {
        let child = ChildId(self.next_child);
        self.next_child += 1;
        self.children.insert(child, Child {
            surface_id,
            return_callback,
            child_to_parent_map: ResourceIdMap::default(),
            marked_for_deletion: false,
        });
        trace!("created child {:?} for {}", child, surface_id);
        child
    }

    fn destroy_child(&mut self, child: ChildId) {
        let held: Vec<DisplayResourceId> = match self.children.get_mut(&child) {
            Some(child_info) => {
                child_info.marked_for_deletion = true;
                child_info.child_to_parent_map.values().cloned().collect()
            }
            None => {
                warn!("destroy_child for unknown child {:?}", child);
                return;
            }
        };

        self.delete_and_return_resources(child, held);

        // Nothing was locked, so nothing kept the child alive.
        if self.children.get(&child).map_or(false, |info| info.child_to_parent_map.is_empty()) {
            self.children.remove(&child);
        }
    }

    fn receive_from_child(&mut self, child: ChildId, resources: &[TransferableResource]) {
        let child_info = match self.children.get_mut(&child) {
            Some(child_info) if !child_info.marked_for_deletion => child_info,
            _ => {
                warn!("receive_from_child for unknown child {:?}", child);
                return;
            }
        };

        for transferable in resources {
            if !transferable.id.is_valid() {
                continue;
            }
            if let Some(id) = child_info.child_to_parent_map.get(&transferable.id) {
                if let Some(resource) = self.resources.get_mut(id) {
                    resource.imported_count += 1;
                    resource.marked_for_deletion = false;
                }
                continue;
            }

            let id = DisplayResourceId(self.next_resource);
            self.next_resource += 1;
            self.resources.insert(id, ChildResource {
                child,
                id_in_child: transferable.id,
                transferable: transferable.clone(),
                imported_count: 1,
                lock_for_read_count: 0,
                marked_for_deletion: false,
            });
            child_info.child_to_parent_map.insert(transferable.id, id);
        }
    }

    fn declare_used_resources_from_child(
        &mut self,
        child: ChildId,
        resources_from_child: &FastHashSet<ResourceId>,
    ) {
        let unused: Vec<DisplayResourceId> = match self.children.get(&child) {
            Some(child_info) => child_info
                .child_to_parent_map
                .iter()
                .filter(|(id_in_child, _)| !resources_from_child.contains(id_in_child))
                .map(|(_, id)| *id)
                .collect(),
            None => {
                warn!("declare_used_resources_from_child for unknown child {:?}", child);
                return;
            }
        };

        if !unused.is_empty() {
            self.delete_and_return_resources(child, unused);
        }
    }

    fn child_to_parent_map(&self, child: ChildId) -> Option<&ResourceIdMap> {
        self.children.get(&child).map(|child_info| &child_info.child_to_parent_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{FrameSinkId, LocalSurfaceId, ResourceFormat};
    use euclid::size2;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn surface_id() -> SurfaceId {
        SurfaceId::new(FrameSinkId(1, 1), LocalSurfaceId(1))
    }

    fn resource(id: u32) -> TransferableResource {
        TransferableResource::new(ResourceId(id), size2(16, 16), ResourceFormat::RGBA8)
    }

    fn child_with_log(
        provider: &mut DisplayResourceProvider,
    ) -> (ChildId, Rc<RefCell<Vec<ReturnedResource>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let child = provider.create_child(
            Box::new(move |returned| sink.borrow_mut().extend(returned)),
            surface_id(),
        );
        (child, log)
    }

    fn used(ids: &[u32]) -> FastHashSet<ResourceId> {
        ids.iter().map(|id| ResourceId(*id)).collect()
    }

    #[test]
    fn remaps_into_shared_namespace() {
        let mut provider = DisplayResourceProvider::new();
        let (a, _) = child_with_log(&mut provider);
        let (b, _) = child_with_log(&mut provider);
        provider.receive_from_child(a, &[resource(1), resource(2)]);
        provider.receive_from_child(b, &[resource(1)]);

        let map_a = provider.child_to_parent_map(a).unwrap().clone();
        let map_b = provider.child_to_parent_map(b).unwrap().clone();
        assert_eq!(map_a.len(), 2);
        assert_eq!(map_b.len(), 1);
        assert_ne!(map_a[&ResourceId(1)], map_b[&ResourceId(1)]);
        assert_eq!(provider.num_resources(), 3);
    }

    #[test]
    fn unused_resources_are_returned_with_import_count() {
        let mut provider = DisplayResourceProvider::new();
        let (child, log) = child_with_log(&mut provider);
        provider.receive_from_child(child, &[resource(1), resource(2)]);
        provider.receive_from_child(child, &[resource(2)]);

        provider.declare_used_resources_from_child(child, &used(&[1]));
        assert_eq!(
            *log.borrow(),
            vec![ReturnedResource { id: ResourceId(2), count: 2, lost: false }],
        );
        assert_eq!(provider.num_resources(), 1);

        // Declaring the same set again returns nothing new.
        provider.declare_used_resources_from_child(child, &used(&[1]));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn locked_resources_are_returned_on_unlock() {
        let mut provider = DisplayResourceProvider::new();
        let (child, log) = child_with_log(&mut provider);
        provider.receive_from_child(child, &[resource(7)]);
        let display_id = provider.child_to_parent_map(child).unwrap()[&ResourceId(7)];

        assert!(provider.lock_for_read(display_id));
        provider.declare_used_resources_from_child(child, &used(&[]));
        assert!(log.borrow().is_empty());
        assert!(provider.in_use(display_id));

        provider.unlock_for_read(display_id);
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow()[0].id, ResourceId(7));
        assert!(provider.resource(display_id).is_none());
    }

    #[test]
    fn destroy_child_returns_everything() {
        let mut provider = DisplayResourceProvider::new();
        let (child, log) = child_with_log(&mut provider);
        provider.receive_from_child(child, &[resource(1), resource(2), resource(3)]);

        provider.destroy_child(child);
        let mut returned: Vec<u32> = log.borrow().iter().map(|r| r.id.0).collect();
        returned.sort();
        assert_eq!(returned, vec![1, 2, 3]);
        assert_eq!(provider.num_children(), 0);
        assert!(provider.child_to_parent_map(child).is_none());
    }

    #[test]
    fn destroyed_child_lingers_until_last_unlock() {
        let mut provider = DisplayResourceProvider::new();
        let (child, log) = child_with_log(&mut provider);
        provider.receive_from_child(child, &[resource(1), resource(2)]);
        let locked = provider.child_to_parent_map(child).unwrap()[&ResourceId(2)];
        provider.lock_for_read(locked);

        provider.destroy_child(child);
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(provider.num_children(), 1);

        // A marked child accepts nothing new.
        provider.receive_from_child(child, &[resource(9)]);
        assert_eq!(provider.num_resources(), 1);

        provider.unlock_for_read(locked);
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(provider.num_children(), 0);
        assert_eq!(provider.num_resources(), 0);
    }
}
