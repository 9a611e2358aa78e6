//! Declarative field tables for object kinds.
//!
//! Every kind describes its pair layout once as an [`ObjectSchema`]: an
//! ordered list of [`FieldSpec`]s, each naming its group codes, cardinality,
//! version range and emission predicate, plus accessors into the typed
//! payload. The generic [`projector`] consumes these tables in both
//! directions, so no kind carries its own read or write routine.
//!
//! ```rust,ignore
//! static SCHEMA: Lazy<ObjectSchema<Circle>> = Lazy::new(|| {
//!     SchemaBuilder::<Circle>::new("CIRCLE")
//!         .subclass("AcDbCircle")
//!         .point("center", &[10, 20, 30], |c| c.center, |c, v| c.center = v)
//!         .value("radius", 40, |c| c.radius.into(), |c, v| c.radius = v.to_f64())
//!         .build()
//! });
//! ```

pub mod projector;

pub use projector::{FieldReader, FieldWriter, PointerHandles, RawHandles, Trailing};

use crate::io::dxf::{CodePair, CodeValue, GroupCodeValueType};
use crate::objects::{NamedPointer, Pointer};
use crate::types::{DxfVersion, Vector3};

/// One element of a field: the values of its tuple codes, in code order.
pub type Element = Vec<CodeValue>;

/// Subclass markers only exist from R13 on.
const SUBCLASS_SINCE: DxfVersion = DxfVersion::AC1012;

/// How many elements a field holds and how they are delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly one element
    Single,
    /// Up to `n` consecutive elements
    Fixed(usize),
    /// A count pair at `count_code`, then that many elements
    CountPrefixed { count_code: i32 },
    /// Elements bracketed by `code open` and `code close` pairs
    Sentinel {
        code: i32,
        open: &'static str,
        close: &'static str,
    },
    /// Consecutive elements for as long as the leading code repeats
    Repeated,
}

pub(crate) type Getter<T> = Box<dyn Fn(&T) -> Vec<Element> + Send + Sync>;
pub(crate) type Setter<T> = Box<dyn Fn(&mut T, Vec<Element>) + Send + Sync>;

pub(crate) enum FieldAccess<T> {
    Subclass(&'static str),
    Values {
        get: Getter<T>,
        set: Setter<T>,
    },
    Pointer {
        get: fn(&T) -> &Pointer,
        get_mut: fn(&mut T) -> &mut Pointer,
    },
    Pointers {
        get: fn(&T) -> &Vec<Pointer>,
        get_mut: fn(&mut T) -> &mut Vec<Pointer>,
    },
    NamedPointers {
        get: fn(&T) -> &Vec<NamedPointer>,
        get_mut: fn(&mut T) -> &mut Vec<NamedPointer>,
        write_code: fn(&T) -> i32,
    },
}

/// A field of an object kind.
pub struct FieldSpec<T> {
    pub name: &'static str,
    /// Group codes of one element, in emission order. For named pointers
    /// the name code comes first, followed by every accepted pointer code.
    pub codes: Vec<i32>,
    pub cardinality: Cardinality,
    pub min_version: Option<DxfVersion>,
    pub max_version: Option<DxfVersion>,
    /// A required field cannot be stepped over while reading.
    pub required: bool,
    /// Only written when handle output is enabled.
    pub handles_only: bool,
    pub(crate) condition: Option<fn(&T) -> bool>,
    pub(crate) access: FieldAccess<T>,
}

impl<T: 'static> FieldSpec<T> {
    fn new(name: &'static str, codes: Vec<i32>, cardinality: Cardinality, access: FieldAccess<T>) -> Self {
        Self {
            name,
            codes,
            cardinality,
            min_version: None,
            max_version: None,
            required: false,
            handles_only: false,
            condition: None,
            access,
        }
    }

    /// `100 <marker>` subclass marker, written from R13 on.
    pub fn subclass(marker: &'static str) -> Self {
        let mut spec = Self::new(marker, vec![100], Cardinality::Single, FieldAccess::Subclass(marker));
        spec.min_version = Some(SUBCLASS_SINCE);
        spec
    }

    /// Scalar field at one group code.
    pub fn value(
        name: &'static str,
        code: i32,
        get: fn(&T) -> CodeValue,
        set: fn(&mut T, CodeValue),
    ) -> Self {
        let access = FieldAccess::Values {
            get: Box::new(move |item: &T| vec![vec![get(item)]]),
            set: Box::new(move |item: &mut T, elements: Vec<Element>| {
                if let Some(value) = elements.into_iter().next().and_then(|e| e.into_iter().next()) {
                    set(item, value);
                }
            }),
        };
        Self::new(name, vec![code], Cardinality::Single, access)
    }

    /// Coordinate triple at `codes` (x, y, z). A missing z reads as zero.
    pub fn point(
        name: &'static str,
        codes: [i32; 3],
        get: fn(&T) -> Vector3,
        set: fn(&mut T, Vector3),
    ) -> Self {
        let access = FieldAccess::Values {
            get: Box::new(move |item: &T| {
                let point = get(item);
                vec![vec![point.x.into(), point.y.into(), point.z.into()]]
            }),
            set: Box::new(move |item: &mut T, elements: Vec<Element>| {
                if let Some(element) = elements.first() {
                    set(item, element_point(element));
                }
            }),
        };
        Self::new(name, codes.to_vec(), Cardinality::Single, access)
    }

    /// Collection of tuples.
    pub fn list(
        name: &'static str,
        codes: &[i32],
        cardinality: Cardinality,
        get: fn(&T) -> Vec<Element>,
        set: fn(&mut T, Vec<Element>),
    ) -> Self {
        let access = FieldAccess::Values {
            get: Box::new(get),
            set: Box::new(set),
        };
        Self::new(name, codes.to_vec(), cardinality, access)
    }

    /// Reference to one other object.
    pub fn pointer(
        name: &'static str,
        code: i32,
        get: fn(&T) -> &Pointer,
        get_mut: fn(&mut T) -> &mut Pointer,
    ) -> Self {
        Self::new(name, vec![code], Cardinality::Single, FieldAccess::Pointer { get, get_mut })
    }

    /// Ordered references, one pair each.
    pub fn pointers(
        name: &'static str,
        code: i32,
        cardinality: Cardinality,
        get: fn(&T) -> &Vec<Pointer>,
        get_mut: fn(&mut T) -> &mut Vec<Pointer>,
    ) -> Self {
        Self::new(name, vec![code], cardinality, FieldAccess::Pointers { get, get_mut })
    }

    /// `name code` / `pointer code` entries; the first pointer code is the
    /// default, `write_code` picks the one emitted.
    pub fn named_pointers(
        name: &'static str,
        codes: &[i32],
        get: fn(&T) -> &Vec<NamedPointer>,
        get_mut: fn(&mut T) -> &mut Vec<NamedPointer>,
        write_code: fn(&T) -> i32,
    ) -> Self {
        Self::new(
            name,
            codes.to_vec(),
            Cardinality::Repeated,
            FieldAccess::NamedPointers {
                get,
                get_mut,
                write_code,
            },
        )
    }

    /// Whether the field exists at `version`.
    pub fn applies_to(&self, version: DxfVersion) -> bool {
        version.within(self.min_version, self.max_version)
    }

    /// The code a field's first pair carries.
    pub fn leading_code(&self) -> i32 {
        match self.cardinality {
            Cardinality::CountPrefixed { count_code } => count_code,
            Cardinality::Sentinel { code, .. } => code,
            _ => self.codes.first().copied().unwrap_or(0),
        }
    }

    /// Whether `pair` can start this field.
    pub fn accepts(&self, pair: &CodePair) -> bool {
        match (&self.access, self.cardinality) {
            (FieldAccess::Subclass(marker), _) => pair.is(100, marker),
            (_, Cardinality::Sentinel { code, open, .. }) => pair.is(code, open),
            _ => pair.code == self.leading_code(),
        }
    }

    pub fn is_subclass(&self) -> bool {
        matches!(self.access, FieldAccess::Subclass(_))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(
            self.access,
            FieldAccess::Pointer { .. } | FieldAccess::Pointers { .. } | FieldAccess::NamedPointers { .. }
        )
    }

    /// Value kind of each element code.
    pub fn value_kinds(&self) -> Vec<GroupCodeValueType> {
        self.codes
            .iter()
            .map(|code| GroupCodeValueType::from_raw_code(*code))
            .collect()
    }

    /// Whether the emission predicate admits `item`.
    pub fn should_emit(&self, item: &T) -> bool {
        self.condition.map_or(true, |condition| condition(item))
    }

    /// Whether `item` holds something this field would write.
    pub(crate) fn carries_data(&self, item: &T) -> bool {
        if !self.should_emit(item) {
            return false;
        }
        match &self.access {
            FieldAccess::Subclass(_) => false,
            FieldAccess::Values { get, .. } => {
                let elements = get(item);
                match self.cardinality {
                    Cardinality::Single => elements.iter().flatten().any(|v| !v.is_default()),
                    _ => !elements.is_empty(),
                }
            }
            FieldAccess::Pointer { get, .. } => !get(item).is_null(),
            FieldAccess::Pointers { get, .. } => !get(item).is_empty(),
            FieldAccess::NamedPointers { get, .. } => !get(item).is_empty(),
        }
    }

    /// Visit every pointer the field holds with its field name and code.
    pub fn visit_pointers(&self, item: &T, visit: &mut dyn FnMut(&'static str, i32, &Pointer)) {
        match &self.access {
            FieldAccess::Pointer { get, .. } => visit(self.name, self.codes[0], get(item)),
            FieldAccess::Pointers { get, .. } => {
                for pointer in get(item) {
                    visit(self.name, self.codes[0], pointer);
                }
            }
            FieldAccess::NamedPointers { get, write_code, .. } => {
                let code = write_code(item);
                for entry in get(item) {
                    visit(self.name, code, &entry.pointer);
                }
            }
            FieldAccess::Subclass(_) | FieldAccess::Values { .. } => {}
        }
    }

    pub fn visit_pointers_mut(&self, item: &mut T, visit: &mut dyn FnMut(&'static str, i32, &mut Pointer)) {
        match &self.access {
            FieldAccess::Pointer { get_mut, .. } => visit(self.name, self.codes[0], get_mut(item)),
            FieldAccess::Pointers { get_mut, .. } => {
                for pointer in get_mut(item) {
                    visit(self.name, self.codes[0], pointer);
                }
            }
            FieldAccess::NamedPointers { get_mut, write_code, .. } => {
                let code = write_code(item);
                for entry in get_mut(item) {
                    visit(self.name, code, &mut entry.pointer);
                }
            }
            FieldAccess::Subclass(_) | FieldAccess::Values { .. } => {}
        }
    }
}

fn element_point(element: &[CodeValue]) -> Vector3 {
    let axis = |i: usize| element.get(i).map_or(0.0, CodeValue::to_f64);
    Vector3::new(axis(0), axis(1), axis(2))
}

/// Ordered field table of one object kind.
pub struct ObjectSchema<T> {
    pub type_name: &'static str,
    pub min_version: Option<DxfVersion>,
    pub max_version: Option<DxfVersion>,
    fields: Vec<FieldSpec<T>>,
}

impl<T: 'static> ObjectSchema<T> {
    /// Whether the kind exists at `version`.
    pub fn applies_to(&self, version: DxfVersion) -> bool {
        version.within(self.min_version, self.max_version)
    }

    pub fn fields(&self) -> &[FieldSpec<T>] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a field called `name` is written at `version`. A field may
    /// have one variant per version range under the same name.
    pub fn has_field_at(&self, name: &str, version: DxfVersion) -> bool {
        self.fields.iter().any(|f| f.name == name && f.applies_to(version))
    }

    /// Visit every pointer held by `item`, in field order.
    pub fn visit_pointers(&self, item: &T, visit: &mut dyn FnMut(&'static str, i32, &Pointer)) {
        for field in &self.fields {
            field.visit_pointers(item, visit);
        }
    }

    pub fn visit_pointers_mut(&self, item: &mut T, visit: &mut dyn FnMut(&'static str, i32, &mut Pointer)) {
        for field in &self.fields {
            field.visit_pointers_mut(item, visit);
        }
    }
}

/// Fluent construction of an [`ObjectSchema`].
///
/// Modifiers such as [`since`](Self::since) and [`when`](Self::when) apply to
/// the most recently added field.
pub struct SchemaBuilder<T> {
    schema: ObjectSchema<T>,
}

impl<T: 'static> SchemaBuilder<T> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            schema: ObjectSchema {
                type_name,
                min_version: None,
                max_version: None,
                fields: Vec::new(),
            },
        }
    }

    /// First version the kind exists in.
    pub fn kind_since(mut self, version: DxfVersion) -> Self {
        self.schema.min_version = Some(version);
        self
    }

    /// Last version the kind exists in.
    pub fn kind_until(mut self, version: DxfVersion) -> Self {
        self.schema.max_version = Some(version);
        self
    }

    pub fn field(mut self, spec: FieldSpec<T>) -> Self {
        self.schema.fields.push(spec);
        self
    }

    pub fn fields(mut self, specs: impl IntoIterator<Item = FieldSpec<T>>) -> Self {
        self.schema.fields.extend(specs);
        self
    }

    pub fn subclass(self, marker: &'static str) -> Self {
        self.field(FieldSpec::subclass(marker))
    }

    pub fn value(
        self,
        name: &'static str,
        code: i32,
        get: fn(&T) -> CodeValue,
        set: fn(&mut T, CodeValue),
    ) -> Self {
        self.field(FieldSpec::value(name, code, get, set))
    }

    pub fn point(
        self,
        name: &'static str,
        codes: [i32; 3],
        get: fn(&T) -> Vector3,
        set: fn(&mut T, Vector3),
    ) -> Self {
        self.field(FieldSpec::point(name, codes, get, set))
    }

    pub fn list(
        self,
        name: &'static str,
        codes: &[i32],
        cardinality: Cardinality,
        get: fn(&T) -> Vec<Element>,
        set: fn(&mut T, Vec<Element>),
    ) -> Self {
        self.field(FieldSpec::list(name, codes, cardinality, get, set))
    }

    pub fn pointer(
        self,
        name: &'static str,
        code: i32,
        get: fn(&T) -> &Pointer,
        get_mut: fn(&mut T) -> &mut Pointer,
    ) -> Self {
        self.field(FieldSpec::pointer(name, code, get, get_mut))
    }

    pub fn pointers(
        self,
        name: &'static str,
        code: i32,
        cardinality: Cardinality,
        get: fn(&T) -> &Vec<Pointer>,
        get_mut: fn(&mut T) -> &mut Vec<Pointer>,
    ) -> Self {
        self.field(FieldSpec::pointers(name, code, cardinality, get, get_mut))
    }

    pub fn named_pointers(
        self,
        name: &'static str,
        codes: &[i32],
        get: fn(&T) -> &Vec<NamedPointer>,
        get_mut: fn(&mut T) -> &mut Vec<NamedPointer>,
        write_code: fn(&T) -> i32,
    ) -> Self {
        self.field(FieldSpec::named_pointers(name, codes, get, get_mut, write_code))
    }

    fn modify_last(mut self, f: impl FnOnce(&mut FieldSpec<T>)) -> Self {
        if let Some(last) = self.schema.fields.last_mut() {
            f(last);
        }
        self
    }

    /// First version the last field is written in.
    pub fn since(self, version: DxfVersion) -> Self {
        self.modify_last(|f| f.min_version = Some(version))
    }

    /// Last version the last field is written in.
    pub fn until(self, version: DxfVersion) -> Self {
        self.modify_last(|f| f.max_version = Some(version))
    }

    /// Emission predicate for the last field.
    pub fn when(self, condition: fn(&T) -> bool) -> Self {
        self.modify_last(|f| f.condition = Some(condition))
    }

    /// Replace the cardinality of the last field.
    pub fn cardinality(self, cardinality: Cardinality) -> Self {
        self.modify_last(|f| f.cardinality = cardinality)
    }

    pub fn required(self) -> Self {
        self.modify_last(|f| f.required = true)
    }

    pub fn handles_only(self) -> Self {
        self.modify_last(|f| f.handles_only = true)
    }

    pub fn build(self) -> ObjectSchema<T> {
        self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        radius: f64,
        hours: Vec<i16>,
        owner: Pointer,
    }

    fn schema() -> ObjectSchema<Sample> {
        SchemaBuilder::<Sample>::new("SAMPLE")
            .kind_until(DxfVersion::AC1027)
            .subclass("AcDbSample")
            .value("radius", 40, |s| s.radius.into(), |s, v| s.radius = v.to_f64())
            .required()
            .list(
                "hours",
                &[290],
                Cardinality::CountPrefixed { count_code: 73 },
                |s| s.hours.iter().map(|h| vec![CodeValue::from(*h)]).collect(),
                |s, elements| s.hours = elements.iter().map(|e| e[0].to_i16()).collect(),
            )
            .since(DxfVersion::AC1018)
            .pointer("owner", 330, |s| &s.owner, |s| &mut s.owner)
            .when(|s| !s.owner.is_null())
            .build()
    }

    #[test]
    fn test_builder_modifiers() {
        let schema = schema();
        assert_eq!(schema.fields().len(), 4);
        assert!(schema.applies_to(DxfVersion::AC1009));
        assert!(!schema.applies_to(DxfVersion::AC1032));

        let subclass = &schema.fields()[0];
        assert!(subclass.is_subclass());
        assert!(!subclass.applies_to(DxfVersion::AC1009));
        assert!(subclass.accepts(&CodePair::new(100, "AcDbSample")));
        assert!(!subclass.accepts(&CodePair::new(100, "AcDbEntity")));

        let radius = schema.field("radius").unwrap();
        assert!(radius.required);
        assert_eq!(radius.value_kinds(), vec![GroupCodeValueType::Double]);

        let hours = schema.field("hours").unwrap();
        assert_eq!(hours.leading_code(), 73);
        assert!(hours.accepts(&CodePair::new(73, 0i16)));
        assert!(!hours.accepts(&CodePair::new(290, true)));
        assert!(!hours.applies_to(DxfVersion::AC1015));
    }

    #[test]
    fn test_carries_data() {
        let schema = schema();
        let mut sample = Sample::default();
        let hours = schema.field("hours").unwrap();
        let owner = schema.field("owner").unwrap();
        assert!(!hours.carries_data(&sample));
        assert!(!owner.carries_data(&sample));
        sample.hours.push(9);
        assert!(hours.carries_data(&sample));
        assert!(!schema.field("radius").unwrap().carries_data(&sample));
    }

    #[test]
    fn test_sentinel_accepts_only_its_group() {
        let spec = FieldSpec::<Sample>::pointer("xdict", 360, |s| &s.owner, |s| &mut s.owner);
        let spec = FieldSpec {
            cardinality: Cardinality::Sentinel {
                code: 102,
                open: "{ACAD_XDICTIONARY",
                close: "}",
            },
            ..spec
        };
        assert!(spec.accepts(&CodePair::new(102, "{ACAD_XDICTIONARY")));
        assert!(!spec.accepts(&CodePair::new(102, "{ACAD_REACTORS")));
    }
}
