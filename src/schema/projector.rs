//! The generic engine that projects typed payloads to pairs and back.

use tracing::trace;

use super::{Cardinality, Element, FieldAccess, FieldSpec, ObjectSchema};
use crate::error::{DxfError, Result};
use crate::io::dxf::reader::PairStream;
use crate::io::dxf::{CodePair, CodeValue};
use crate::notification::{NotificationCollection, NotificationKind};
use crate::objects::{NamedPointer, Pointer};
use crate::types::{DxfVersion, Handle};

/// What a read does with a pair no field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trailing {
    /// Leave it in the stream for the next schema.
    Stop,
    /// Keep it and every following pair of the object as extension data.
    Capture,
}

/// Consumes an object's pairs against its schema.
pub struct FieldReader {
    version: DxfVersion,
}

impl FieldReader {
    pub fn new(version: DxfVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> DxfVersion {
        self.version
    }

    /// Read fields of `item` until the next `0` pair or the end of stream.
    ///
    /// Pairs no unmatched field accepts are returned as extension pairs in
    /// stream order (always empty with [`Trailing::Stop`]); known fields
    /// after them are still read.
    pub fn read<T: 'static>(
        &self,
        schema: &ObjectSchema<T>,
        item: &mut T,
        stream: &mut PairStream<'_>,
        trailing: Trailing,
    ) -> Result<Vec<CodePair>> {
        let fields = schema.fields();
        let mut matched = vec![false; fields.len()];
        let mut cursor = 0;
        let mut extension = Vec::new();

        loop {
            let pair = match stream.peek()? {
                Some(pair) if pair.code != 0 => pair.clone(),
                _ => break,
            };

            match self.find_field(fields, cursor, &matched, &pair) {
                Some(index) => {
                    self.read_field(&fields[index], item, stream)?;
                    matched[index] = true;
                    cursor = cursor.max(index + 1);
                }
                None => {
                    if let Some(missing) = self.first_missing(fields, &matched, cursor) {
                        return Err(DxfError::UnexpectedPair {
                            expected: format!(
                                "{} field {} (group code {})",
                                schema.type_name,
                                missing.name,
                                missing.leading_code()
                            ),
                            code: pair.code,
                            value: pair.value.to_string(),
                            offset: pair.offset,
                        });
                    }
                    match trailing {
                        Trailing::Stop => break,
                        Trailing::Capture => {
                            trace!(code = pair.code, object = schema.type_name, "capturing extension pair");
                            capture_group(stream, &mut extension)?;
                        }
                    }
                }
            }
        }

        if let Some(missing) = self.first_missing(fields, &matched, 0) {
            return Err(DxfError::MissingRequiredField {
                object_type: schema.type_name.to_string(),
                field: missing.name,
                code: missing.leading_code(),
                offset: stream.position(),
            });
        }
        Ok(extension)
    }

    /// First field at or after `cursor` accepting `pair`, never stepping over
    /// an unmatched required field. Failing that, an optional field before
    /// the cursor that has not been read yet, for writers that order common
    /// fields differently. Fields valid at the read version win; out-of-range
    /// fields are a fallback for files mislabelled by version.
    fn find_field<T: 'static>(
        &self,
        fields: &[FieldSpec<T>],
        cursor: usize,
        matched: &[bool],
        pair: &CodePair,
    ) -> Option<usize> {
        for versioned in [true, false] {
            for (index, field) in fields.iter().enumerate().skip(cursor) {
                let applicable = field.applies_to(self.version);
                if (applicable || !versioned) && field.accepts(pair) {
                    return Some(index);
                }
                if field.required && applicable && !matched[index] {
                    break;
                }
            }
        }
        for versioned in [true, false] {
            let earlier = fields.iter().enumerate().take(cursor).find(|(index, field)| {
                !matched[*index]
                    && !field.required
                    && (!versioned || field.applies_to(self.version))
                    && field.accepts(pair)
            });
            if let Some((index, _)) = earlier {
                return Some(index);
            }
        }
        None
    }

    fn first_missing<'s, T: 'static>(
        &self,
        fields: &'s [FieldSpec<T>],
        matched: &[bool],
        from: usize,
    ) -> Option<&'s FieldSpec<T>> {
        fields
            .iter()
            .enumerate()
            .skip(from)
            .find(|(index, field)| field.required && field.applies_to(self.version) && !matched[*index])
            .map(|(_, field)| field)
    }

    fn read_field<T: 'static>(&self, field: &FieldSpec<T>, item: &mut T, stream: &mut PairStream<'_>) -> Result<()> {
        match &field.access {
            FieldAccess::Subclass(_) => {
                stream.advance()?;
            }
            FieldAccess::Values { set, .. } => {
                let elements = read_elements(field, stream, read_tuple)?;
                set(item, elements);
            }
            FieldAccess::Pointer { get_mut, .. } => {
                let elements = read_elements(field, stream, read_tuple)?;
                let handle = elements
                    .first()
                    .and_then(|e| e.first())
                    .map_or(Handle::NULL, CodeValue::to_handle);
                *get_mut(item) = Pointer::from_handle(handle);
            }
            FieldAccess::Pointers { get_mut, .. } => {
                let elements = read_elements(field, stream, read_tuple)?;
                *get_mut(item) = elements
                    .iter()
                    .filter_map(|e| e.first())
                    .map(|value| Pointer::from_handle(value.to_handle()))
                    .collect();
            }
            FieldAccess::NamedPointers { get_mut, .. } => {
                let elements = read_elements(field, stream, read_named)?;
                *get_mut(item) = elements
                    .into_iter()
                    .map(|mut e| {
                        let handle = e.pop().map_or(Handle::NULL, |v| v.to_handle());
                        let name = e.pop().map(CodeValue::into_string).unwrap_or_default();
                        NamedPointer::new(name, Pointer::from_handle(handle))
                    })
                    .collect();
            }
        }
        Ok(())
    }

    /// Capture every pair up to the next `0` pair, for kinds without a schema.
    pub fn capture_rest(&self, stream: &mut PairStream<'_>) -> Result<Vec<CodePair>> {
        let mut pairs = Vec::new();
        while let Some(code) = stream.peek_code()? {
            if code == 0 {
                break;
            }
            pairs.extend(stream.advance()?);
        }
        Ok(pairs)
    }
}

/// Move one unrecognized pair into `extension`. An opening `102 {NAME`
/// takes its whole group up to `102 }`.
fn capture_group(stream: &mut PairStream<'_>, extension: &mut Vec<CodePair>) -> Result<()> {
    let Some(first) = stream.advance()? else {
        return Ok(());
    };
    let opens_group = first.code == 102 && first.value.as_str().starts_with('{');
    extension.push(first);
    if !opens_group {
        return Ok(());
    }
    loop {
        let closes = match stream.peek()? {
            Some(pair) if pair.code != 0 => pair.is(102, "}"),
            _ => break,
        };
        extension.extend(stream.advance()?);
        if closes {
            break;
        }
    }
    Ok(())
}

type TupleReader = fn(&[i32], &mut PairStream<'_>) -> Result<Element>;

fn read_elements<T: 'static>(field: &FieldSpec<T>, stream: &mut PairStream<'_>, tuple: TupleReader) -> Result<Vec<Element>> {
    let lead = field.codes.first().copied().unwrap_or(0);
    let mut elements = Vec::new();
    match field.cardinality {
        Cardinality::Single => elements.push(tuple(&field.codes, stream)?),
        Cardinality::Fixed(count) => {
            while elements.len() < count && stream.peek_code()? == Some(lead) {
                elements.push(tuple(&field.codes, stream)?);
            }
        }
        Cardinality::CountPrefixed { .. } => {
            let count = stream.expect_pair(field.name)?.value.to_i64().max(0) as usize;
            while elements.len() < count && stream.peek_code()? == Some(lead) {
                elements.push(tuple(&field.codes, stream)?);
            }
        }
        Cardinality::Sentinel { code, close, .. } => {
            stream.advance()?;
            loop {
                let pair = match stream.peek()? {
                    Some(pair) => pair.clone(),
                    None => {
                        return Err(DxfError::UnexpectedEndOfStream {
                            expected: format!("{} {} closing {}", code, close, field.name),
                            offset: stream.position(),
                        })
                    }
                };
                if pair.is(code, close) {
                    stream.advance()?;
                    break;
                }
                if pair.code != lead {
                    return Err(DxfError::UnexpectedPair {
                        expected: format!("{} element or {} {}", field.name, code, close),
                        code: pair.code,
                        value: pair.value.to_string(),
                        offset: pair.offset,
                    });
                }
                elements.push(tuple(&field.codes, stream)?);
            }
        }
        Cardinality::Repeated => {
            while stream.peek_code()? == Some(lead) {
                elements.push(tuple(&field.codes, stream)?);
            }
        }
    }
    Ok(elements)
}

/// Leading pair plus each following member present in code order; absent
/// members take their kind's zero value.
fn read_tuple(codes: &[i32], stream: &mut PairStream<'_>) -> Result<Element> {
    let mut element = Vec::with_capacity(codes.len());
    let first = stream.expect_pair("field value")?;
    element.push(first.value);
    for &code in codes.iter().skip(1) {
        if stream.peek_code()? == Some(code) {
            element.extend(stream.advance()?.map(|pair| pair.value));
        } else {
            element.push(CodeValue::default_for_code(code));
        }
    }
    Ok(element)
}

/// Name pair, then one pair at any of the accepted pointer codes.
fn read_named(codes: &[i32], stream: &mut PairStream<'_>) -> Result<Element> {
    let name = stream.expect_pair("entry name")?;
    let pointer_codes = codes.get(1..).unwrap_or_default();
    let handle = match stream.peek_code()? {
        Some(code) if pointer_codes.contains(&code) => stream
            .advance()?
            .map_or(CodeValue::Handle(Handle::NULL), |pair| pair.value),
        _ => CodeValue::Handle(Handle::NULL),
    };
    Ok(vec![name.value, handle])
}

/// Maps pointers to the handle written for them.
pub trait PointerHandles {
    fn handle_for(&self, pointer: &Pointer) -> Handle;
}

/// Writes each pointer's stored handle.
pub struct RawHandles;

impl PointerHandles for RawHandles {
    fn handle_for(&self, pointer: &Pointer) -> Handle {
        pointer.handle
    }
}

/// Produces an object's pairs from its schema.
pub struct FieldWriter<'a> {
    version: DxfVersion,
    include_handles: bool,
    handles: &'a dyn PointerHandles,
}

impl<'a> FieldWriter<'a> {
    pub fn new(version: DxfVersion, include_handles: bool, handles: &'a dyn PointerHandles) -> Self {
        Self {
            version,
            include_handles,
            handles,
        }
    }

    pub fn version(&self) -> DxfVersion {
        self.version
    }

    pub fn include_handles(&self) -> bool {
        self.include_handles
    }

    /// Append `item`'s pairs to `out` in schema order.
    pub fn write<T: 'static>(
        &self,
        schema: &ObjectSchema<T>,
        item: &T,
        out: &mut Vec<CodePair>,
        notifications: &mut NotificationCollection,
    ) {
        for field in schema.fields() {
            if !field.applies_to(self.version) {
                if field.carries_data(item) && !schema.has_field_at(field.name, self.version) {
                    notifications.notify(NotificationKind::UnsupportedVersion {
                        object_type: schema.type_name.to_string(),
                        field: Some(field.name),
                        version: self.version,
                    });
                }
                continue;
            }
            if field.handles_only && !self.include_handles {
                continue;
            }
            if !field.should_emit(item) {
                continue;
            }
            self.write_field(field, item, out);
        }
    }

    fn write_field<T: 'static>(&self, field: &FieldSpec<T>, item: &T, out: &mut Vec<CodePair>) {
        match &field.access {
            FieldAccess::Subclass(marker) => out.push(CodePair::new(100, *marker)),
            FieldAccess::Values { get, .. } => {
                write_elements(field, &field.codes, get(item), out);
            }
            FieldAccess::Pointer { get, .. } => {
                let handle = self.handles.handle_for(get(item));
                write_elements(field, &field.codes, vec![vec![CodeValue::Handle(handle)]], out);
            }
            FieldAccess::Pointers { get, .. } => {
                let elements = get(item)
                    .iter()
                    .map(|pointer| vec![CodeValue::Handle(self.handles.handle_for(pointer))])
                    .collect();
                write_elements(field, &field.codes, elements, out);
            }
            FieldAccess::NamedPointers { get, write_code, .. } => {
                let codes = [field.codes.first().copied().unwrap_or(3), write_code(item)];
                let elements = get(item)
                    .iter()
                    .map(|entry| {
                        vec![
                            CodeValue::Str(entry.name.clone()),
                            CodeValue::Handle(self.handles.handle_for(&entry.pointer)),
                        ]
                    })
                    .collect();
                write_elements(field, &codes, elements, out);
            }
        }
    }
}

fn write_elements<T: 'static>(field: &FieldSpec<T>, codes: &[i32], elements: Vec<Element>, out: &mut Vec<CodePair>) {
    match field.cardinality {
        Cardinality::CountPrefixed { count_code } => {
            out.push(CodePair::new(count_code, elements.len() as i64));
        }
        Cardinality::Sentinel { code, open, .. } => out.push(CodePair::new(code, open)),
        _ => {}
    }
    for element in elements {
        out.extend(codes.iter().zip(element).map(|(code, value)| CodePair::new(*code, value)));
    }
    if let Cardinality::Sentinel { code, close, .. } = field.cardinality {
        out.push(CodePair::new(code, close));
    }
}
