//! References between drawing objects

use std::fmt;

use crate::types::Handle;

/// Key of an object in a document's arena.
///
/// Ids are stable for the lifetime of the document and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u32);

impl ObjectId {
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A non-owning reference to another object.
///
/// While reading, only `handle` is known. After the document resolves its
/// pending references, `target` names the object in the arena. Objects built
/// in memory may point at a target that has no handle yet.
///
/// Two pointers are equal when they carry the same handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pointer {
    /// Raw handle as read or last assigned
    pub handle: Handle,
    /// Resolved target
    pub target: Option<ObjectId>,
}

impl Pointer {
    /// The unset pointer, written as handle 0
    pub const NULL: Pointer = Pointer {
        handle: Handle::NULL,
        target: None,
    };

    /// Unresolved pointer carrying a raw handle.
    pub fn from_handle(handle: Handle) -> Self {
        Self {
            handle,
            target: None,
        }
    }

    /// Pointer to an object in the arena.
    pub fn to(target: ObjectId) -> Self {
        Self {
            handle: Handle::NULL,
            target: Some(target),
        }
    }

    /// Whether the pointer refers to nothing at all.
    pub fn is_null(&self) -> bool {
        self.handle.is_null() && self.target.is_none()
    }

    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

impl PartialEq for Pointer {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl From<Handle> for Pointer {
    fn from(handle: Handle) -> Self {
        Pointer::from_handle(handle)
    }
}

impl From<ObjectId> for Pointer {
    fn from(target: ObjectId) -> Self {
        Pointer::to(target)
    }
}

/// A keyed pointer, as held by dictionaries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamedPointer {
    pub name: String,
    pub pointer: Pointer,
}

impl NamedPointer {
    pub fn new(name: impl Into<String>, pointer: Pointer) -> Self {
        Self {
            name: name.into(),
            pointer,
        }
    }
}
