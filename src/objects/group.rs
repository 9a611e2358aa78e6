//! Group object - Named collection of entities

use once_cell::sync::Lazy;

use super::{DxfKind, ObjectCategory, Pointer};
use crate::schema::{Cardinality, ObjectSchema, SchemaBuilder};

/// Group object - represents a collection of entities
///
/// The group's name is its key in the owning `ACAD_GROUP` dictionary; the
/// object itself only carries the description and the member list.
///
/// # DXF Object Type
/// GROUP
///
/// # Example
/// ```ignore
/// use dxf_codec::objects::{Group, Pointer};
///
/// let mut group = Group::new();
/// group.description = "A collection of related entities".to_string();
/// group.add_entity(Pointer::to(line_id));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Group description (DXF code 300)
    pub description: String,
    /// Unnamed flag (DXF code 70)
    pub unnamed: bool,
    /// Group is selectable (DXF code 71, default: true)
    pub selectable: bool,
    /// Member entities (DXF code 340, hard-pointer)
    pub entities: Vec<Pointer>,
}

impl Group {
    /// Create a new empty group
    pub fn new() -> Self {
        Self {
            description: String::new(),
            unnamed: false,
            selectable: true,
            entities: Vec::new(),
        }
    }

    /// Create a group with description
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::new()
        }
    }

    /// Add an entity to the group
    pub fn add_entity(&mut self, entity: impl Into<Pointer>) {
        let entity = entity.into();
        if entity.is_null() {
            return;
        }
        let duplicate = self.entities.iter().any(|existing| match (existing.target, entity.target) {
            (Some(a), Some(b)) => a == b,
            _ => !entity.handle.is_null() && existing.handle == entity.handle,
        });
        if !duplicate {
            self.entities.push(entity);
        }
    }

    /// Get the number of entities in the group
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the group is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

static SCHEMA: Lazy<ObjectSchema<Group>> = Lazy::new(|| {
    SchemaBuilder::<Group>::new("GROUP")
        .subclass("AcDbGroup")
        .value(
            "description",
            300,
            |g| g.description.as_str().into(),
            |g, v| g.description = v.into_string(),
        )
        .value("unnamed", 70, |g| i16::from(g.unnamed).into(), |g, v| g.unnamed = v.to_bool())
        .value(
            "selectable",
            71,
            |g| i16::from(g.selectable).into(),
            |g, v| g.selectable = v.to_bool(),
        )
        .pointers("entities", 340, Cardinality::Repeated, |g| &g.entities, |g| &mut g.entities)
        .build()
});

impl DxfKind for Group {
    const TYPE_NAME: &'static str = "GROUP";
    const CATEGORY: ObjectCategory = ObjectCategory::Object;

    fn schema() -> &'static ObjectSchema<Self> {
        &SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectId;
    use crate::types::Handle;

    #[test]
    fn test_group_creation() {
        let group = Group::with_description("This is a test group");
        assert_eq!(group.description, "This is a test group");
        assert!(group.is_empty());
        assert!(group.selectable);
    }

    #[test]
    fn test_group_add_entity() {
        let mut group = Group::new();
        group.add_entity(Handle::new(100));
        group.add_entity(Handle::new(101));
        group.add_entity(Handle::new(100));
        group.add_entity(ObjectId(4));
        group.add_entity(ObjectId(4));
        group.add_entity(Pointer::NULL);
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn test_schema_codes() {
        let codes: Vec<i32> = Group::schema().fields().iter().map(|f| f.leading_code()).collect();
        assert_eq!(codes, vec![100, 300, 70, 71, 340]);
    }
}
