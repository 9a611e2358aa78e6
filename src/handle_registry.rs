//! Handle bookkeeping for one document.
//!
//! The registry maps handles to arena ids and back, hands out fresh handles,
//! and after a read pass turns the raw handles stored in pointer fields into
//! arena references.

use ahash::AHashMap;
use indexmap::IndexMap;
use tracing::warn;

use crate::error::{DxfError, Result};
use crate::notification::{NotificationCollection, NotificationKind};
use crate::objects::{CadObject, ObjectId};
use crate::types::Handle;

/// Handle ↔ object map plus the handle allocator.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleRegistry {
    by_handle: AHashMap<Handle, ObjectId>,
    by_object: AHashMap<ObjectId, Handle>,
    /// Lowest handle never handed out; only grows
    next: u64,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self {
            by_handle: AHashMap::new(),
            by_object: AHashMap::new(),
            next: 1,
        }
    }

    /// Register `object` under `handle`, or under a fresh handle when
    /// `handle` is null.
    ///
    /// Registering an object twice returns the handle it already has. A
    /// handle already owned by another object is an error.
    pub fn register(&mut self, object: ObjectId, handle: Handle) -> Result<Handle> {
        if let Some(existing) = self.by_object.get(&object) {
            return Ok(*existing);
        }
        let handle = if handle.is_null() {
            self.allocate()
        } else {
            if self.by_handle.contains_key(&handle) {
                return Err(DxfError::DuplicateHandle(handle));
            }
            self.reserve(handle);
            handle
        };
        self.by_handle.insert(handle, object);
        self.by_object.insert(object, handle);
        Ok(handle)
    }

    pub fn lookup(&self, handle: Handle) -> Option<ObjectId> {
        self.by_handle.get(&handle).copied()
    }

    pub fn handle_of(&self, object: ObjectId) -> Option<Handle> {
        self.by_object.get(&object).copied()
    }

    /// Forget an object. Its handle is not handed out again.
    pub fn unregister(&mut self, object: ObjectId) -> Option<Handle> {
        let handle = self.by_object.remove(&object)?;
        self.by_handle.remove(&handle);
        Some(handle)
    }

    /// A fresh handle above every handle seen so far.
    pub fn allocate(&mut self) -> Handle {
        let handle = Handle::new(self.next);
        self.next += 1;
        handle
    }

    /// Keep `handle` and everything below it out of future allocations.
    pub fn reserve(&mut self, handle: Handle) {
        self.next = self.next.max(handle.value().saturating_add(1));
    }

    /// The handle the next allocation returns (the `$HANDSEED` value).
    pub fn next_handle(&self) -> Handle {
        Handle::new(self.next)
    }

    pub fn len(&self) -> usize {
        self.by_handle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_handle.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_handle.clear();
        self.by_object.clear();
        self.next = 1;
    }

    /// Point every unresolved pointer with a non-null handle at the object
    /// registered under it.
    ///
    /// Pointers whose handle matches nothing stay unresolved and are reported
    /// once each as dangling references.
    pub fn resolve_pending(&self, objects: &mut IndexMap<ObjectId, CadObject>) -> NotificationCollection {
        let mut notes = NotificationCollection::new();
        for object in objects.values_mut() {
            let owner = object.header.handle;
            let object_type = object.type_name().to_string();
            let by_handle = &self.by_handle;
            object.visit_pointers_mut(&mut |field, code, pointer| {
                if pointer.target.is_some() || pointer.handle.is_null() {
                    return;
                }
                match by_handle.get(&pointer.handle) {
                    Some(target) => pointer.target = Some(*target),
                    None => {
                        warn!(
                            object = %object_type,
                            field,
                            handle = %pointer.handle,
                            "dangling reference"
                        );
                        notes.notify(NotificationKind::DanglingReference {
                            object_type: object_type.clone(),
                            owner,
                            field,
                            code,
                            missing: pointer.handle,
                        });
                    }
                }
            });
        }
        notes
    }
}

impl Default for HandleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Line;
    use crate::notification::NotificationType;
    use crate::objects::{Group, Pointer};

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = HandleRegistry::new();
        let first = registry.register(ObjectId(0), Handle::new(0x10)).unwrap();
        let again = registry.register(ObjectId(0), Handle::new(0x99)).unwrap();
        assert_eq!(first, Handle::new(0x10));
        assert_eq!(again, first);
        assert_eq!(registry.lookup(Handle::new(0x10)), Some(ObjectId(0)));
        assert_eq!(registry.handle_of(ObjectId(0)), Some(first));
    }

    #[test]
    fn test_duplicate_handle_is_rejected() {
        let mut registry = HandleRegistry::new();
        registry.register(ObjectId(0), Handle::new(0x10)).unwrap();
        let err = registry.register(ObjectId(1), Handle::new(0x10)).unwrap_err();
        assert!(matches!(err, DxfError::DuplicateHandle(h) if h == Handle::new(0x10)));
    }

    #[test]
    fn test_allocation_skips_explicit_handles() {
        let mut registry = HandleRegistry::new();
        registry.register(ObjectId(0), Handle::new(0x20)).unwrap();
        let fresh = registry.register(ObjectId(1), Handle::NULL).unwrap();
        assert_eq!(fresh, Handle::new(0x21));
        assert_eq!(registry.next_handle(), Handle::new(0x22));
    }

    #[test]
    fn test_unregistered_handles_are_not_reused() {
        let mut registry = HandleRegistry::new();
        let handle = registry.register(ObjectId(0), Handle::NULL).unwrap();
        assert_eq!(registry.unregister(ObjectId(0)), Some(handle));
        assert_eq!(registry.lookup(handle), None);
        assert_ne!(registry.allocate(), handle);
    }

    #[test]
    fn test_resolve_pending() {
        let mut registry = HandleRegistry::new();
        let mut objects = IndexMap::new();

        let mut group = Group::new();
        group.add_entity(Handle::new(0x31));
        group.add_entity(Handle::new(0x77));
        objects.insert(ObjectId(0), CadObject::new(group).with_handle(Handle::new(0x30)));
        objects.insert(
            ObjectId(1),
            CadObject::new(Line::new())
                .with_handle(Handle::new(0x31))
                .with_owner(Pointer::from_handle(Handle::new(0x30))),
        );
        for (id, object) in &objects {
            registry.register(*id, object.handle()).unwrap();
        }

        let notes = registry.resolve_pending(&mut objects);
        assert_eq!(notes.len(), 1);
        let dangling = notes.of_type(NotificationType::DanglingReference);
        assert!(matches!(
            &dangling[0].kind,
            NotificationKind::DanglingReference { field: "entities", code: 340, missing, .. }
                if *missing == Handle::new(0x77)
        ));

        let line = &objects[&ObjectId(1)];
        assert_eq!(line.header.owner.target, Some(ObjectId(0)));
        let crate::objects::ObjectData::Group(group) = &objects[&ObjectId(0)].data else {
            panic!("expected a group");
        };
        assert_eq!(group.entities[0].target, Some(ObjectId(1)));
        assert!(!group.entities[1].is_resolved());
    }
}
