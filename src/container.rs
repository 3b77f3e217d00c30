//! Shared render membership for every live sphere.
//!
//! Streams insert one [`SphereInstance`] per particle during `init` and
//! remove them again during `clean`. The renderer only reads: it re-uploads
//! the instance buffer whenever [`RenderContainer::revision`] changes.

use std::collections::HashMap;

use crate::particle::SphereInstance;

/// Opaque membership handle returned by [`RenderContainer::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceHandle(u64);

/// Dense instance storage with handle lookup.
#[derive(Debug, Default)]
pub struct RenderContainer {
    /// Packed instance data, in upload order.
    instances: Vec<SphereInstance>,
    /// Handle owning each slot of `instances`.
    handles: Vec<InstanceHandle>,
    /// Quick lookup by handle.
    indices: HashMap<InstanceHandle, usize>,
    next_id: u64,
    revision: u64,
}

impl RenderContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance and return its handle.
    pub fn insert(&mut self, instance: SphereInstance) -> InstanceHandle {
        let handle = InstanceHandle(self.next_id);
        self.next_id += 1;

        self.indices.insert(handle, self.instances.len());
        self.instances.push(instance);
        self.handles.push(handle);
        self.revision += 1;
        handle
    }

    /// Remove an instance. Returns `false` if the handle is not a member.
    pub fn remove(&mut self, handle: InstanceHandle) -> bool {
        let Some(idx) = self.indices.remove(&handle) else {
            return false;
        };

        self.instances.swap_remove(idx);
        self.handles.swap_remove(idx);
        // The former last element now lives at `idx`.
        if let Some(&moved) = self.handles.get(idx) {
            self.indices.insert(moved, idx);
        }
        self.revision += 1;
        true
    }

    pub fn contains(&self, handle: InstanceHandle) -> bool {
        self.indices.contains_key(&handle)
    }

    pub fn get(&self, handle: InstanceHandle) -> Option<&SphereInstance> {
        self.indices.get(&handle).map(|&idx| &self.instances[idx])
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Packed instance data for upload.
    pub fn instances(&self) -> &[SphereInstance] {
        &self.instances
    }

    /// Bumped on every membership change.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
