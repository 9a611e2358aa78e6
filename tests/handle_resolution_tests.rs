//! Handle registry behavior seen through loading and saving

mod common;

use common::{eof, load_text, section, section_body, written_pairs};
use dxf_codec::io::dxf::DxfSection;
use dxf_codec::{
    CadDocument, CodePair, DxfError, DxfVersion, Group, Handle, Line, NotificationKind, NotificationType,
    ObjectData, Pointer,
};

fn header_with_seed(seed: &str) -> String {
    section("HEADER", &[(9, "$ACADVER"), (1, "AC1015"), (9, "$HANDSEED"), (5, seed)])
}

fn line_pairs(handle: &'static str) -> Vec<(i32, &'static str)> {
    vec![
        (0, "LINE"),
        (5, handle),
        (100, "AcDbEntity"),
        (8, "0"),
        (100, "AcDbLine"),
        (10, "0"),
        (20, "0"),
        (30, "0"),
        (11, "1"),
        (21, "0"),
        (31, "0"),
    ]
}

/// A dictionary pointing forward at a group that points back at its owner
/// and at two entities plus one handle nothing owns.
fn linked_drawing() -> String {
    let entities: Vec<(i32, &str)> = [line_pairs("20"), line_pairs("21")].concat();
    [
        header_with_seed("200"),
        section("ENTITIES", &entities),
        section(
            "OBJECTS",
            &[
                (0, "DICTIONARY"),
                (5, "A0"),
                (100, "AcDbDictionary"),
                (281, "1"),
                (3, "DOORS"),
                (350, "A1"),
                (0, "GROUP"),
                (5, "A1"),
                (102, "{ACAD_REACTORS"),
                (330, "A0"),
                (102, "}"),
                (330, "A0"),
                (100, "AcDbGroup"),
                (300, "doors"),
                (70, "0"),
                (71, "1"),
                (340, "20"),
                (340, "21"),
                (340, "99"),
            ],
        ),
        eof(),
    ]
    .concat()
}

fn group(doc: &CadDocument) -> &Group {
    let object = doc.object_by_handle(Handle::new(0xA1)).expect("group");
    let ObjectData::Group(group) = &object.data else {
        panic!("expected a GROUP, found {}", object.type_name());
    };
    group
}

#[test]
fn test_forward_and_backward_references_resolve() {
    let doc = load_text(&linked_drawing()).unwrap();
    let dictionary_id = doc.id_by_handle(Handle::new(0xA0)).unwrap();
    let group_id = doc.id_by_handle(Handle::new(0xA1)).unwrap();

    let dictionary = doc.get(dictionary_id).unwrap();
    let ObjectData::Dictionary(entries) = &dictionary.data else {
        panic!("expected a DICTIONARY");
    };
    assert_eq!(entries.get("DOORS").and_then(|p| p.target), Some(group_id));

    let group_object = doc.get(group_id).unwrap();
    assert_eq!(group_object.header.owner.target, Some(dictionary_id));
    assert_eq!(group_object.header.reactors.len(), 1);
    assert_eq!(group_object.header.reactors[0].target, Some(dictionary_id));

    let group = group(&doc);
    assert_eq!(group.description, "doors");
    assert_eq!(group.entities.len(), 3);
    assert_eq!(group.entities[0].target, doc.id_by_handle(Handle::new(0x20)));
    assert_eq!(group.entities[1].target, doc.id_by_handle(Handle::new(0x21)));
    assert!(!group.entities[2].is_resolved());
}

#[test]
fn test_dangling_reference_is_reported() {
    let doc = load_text(&linked_drawing()).unwrap();
    let dangling = doc.notifications().of_type(NotificationType::DanglingReference);
    assert_eq!(dangling.len(), 1);
    match &dangling[0].kind {
        NotificationKind::DanglingReference {
            object_type,
            owner,
            field,
            code,
            missing,
        } => {
            assert_eq!(object_type, "GROUP");
            assert_eq!(*owner, Handle::new(0xA1));
            assert_eq!(*field, "entities");
            assert_eq!(*code, 340);
            assert_eq!(*missing, Handle::new(0x99));
        }
        other => panic!("unexpected notification {:?}", other),
    }

    // the raw handle is written back unchanged
    let pairs = written_pairs(&doc, DxfVersion::AC1015, true);
    let objects = section_body(&pairs, DxfSection::Objects);
    assert!(objects.contains(&CodePair::new(340, Handle::new(0x99))));
    assert!(objects.contains(&CodePair::new(350, Handle::new(0xA1))));
}

#[test]
fn test_resolve_follows_pointers() {
    let doc = load_text(&linked_drawing()).unwrap();
    let group = group(&doc);

    let line = doc.resolve(&group.entities[0]).unwrap();
    assert_eq!(line.type_name(), "LINE");
    assert_eq!(line.handle(), Handle::new(0x20));
    assert!(doc.resolve(&group.entities[2]).is_none());

    let raw = Pointer::from_handle(Handle::new(0x21));
    assert_eq!(doc.resolve(&raw).map(|o| o.handle()), Some(Handle::new(0x21)));
    assert!(doc.resolve(&Pointer::NULL).is_none());
}

#[test]
fn test_cleared_targets_stop_resolving() {
    let mut doc = load_text(&linked_drawing()).unwrap();
    doc.clear_section(DxfSection::Entities);
    assert_eq!(doc.entities().count(), 0);
    assert!(doc.object_by_handle(Handle::new(0x20)).is_none());

    let group = group(&doc);
    assert!(group.entities[0].is_resolved());
    assert!(doc.resolve(&group.entities[0]).is_none());
}

#[test]
fn test_duplicate_handle_keeps_first_owner() {
    let entities: Vec<(i32, &str)> = [line_pairs("30"), line_pairs("30")].concat();
    let text = [header_with_seed("40"), section("ENTITIES", &entities), eof()].concat();
    let doc = load_text(&text).unwrap();

    assert_eq!(doc.entities().count(), 2);
    assert!(doc.notifications().has_type(NotificationType::Warning));
    let first = doc.entity_ids()[0];
    let second = doc.entity_ids()[1];
    assert_eq!(doc.id_by_handle(Handle::new(0x30)), Some(first));
    assert_eq!(doc.handle_of(second), None);

    let pairs = written_pairs(&doc, DxfVersion::AC1015, true);
    let handles: Vec<Handle> = section_body(&pairs, DxfSection::Entities)
        .iter()
        .filter(|p| p.code == 5)
        .map(|p| p.value.to_handle())
        .collect();
    assert_eq!(handles.len(), 2);
    assert_eq!(handles[0], Handle::new(0x30));
    assert_eq!(handles[1], Handle::new(0x40));
}

#[test]
fn test_handle_seed_bounds_fresh_handles() {
    let mut doc = load_text(&linked_drawing()).unwrap();
    assert_eq!(doc.next_handle(), Handle::new(0x200));

    let line = doc.add_entity(Line::new()).unwrap();
    assert_eq!(doc.handle_of(line), None);
    doc.assign_missing_handles().unwrap();
    assert_eq!(doc.handle_of(line), Some(Handle::new(0x200)));
    assert_eq!(doc.next_handle(), Handle::new(0x201));

    let pairs = written_pairs(&doc, DxfVersion::AC1015, true);
    let header = section_body(&pairs, DxfSection::Header);
    let seed = header
        .windows(2)
        .find(|w| w[0].is(9, "$HANDSEED"))
        .map(|w| w[1].clone())
        .unwrap();
    assert_eq!(seed, CodePair::new(5, "201"));
}

#[test]
fn test_assign_missing_handles() {
    let mut doc = CadDocument::new();
    let line = doc.add_entity(Line::new()).unwrap();
    let mut group = Group::new();
    group.add_entity(Pointer::to(line));
    let group_id = doc.add_object(group).unwrap();

    assert!(doc.handle_of(line).is_none());
    doc.assign_missing_handles().unwrap();

    let line_handle = doc.handle_of(line).unwrap();
    assert_eq!(doc.get(line).map(|o| o.handle()), Some(line_handle));
    let ObjectData::Group(group) = &doc.get(group_id).unwrap().data else {
        panic!("expected a GROUP");
    };
    assert_eq!(group.entities[0].handle, line_handle);
    assert_eq!(group.entities[0].target, Some(line));
}

#[test]
fn test_set_handle_rejects_taken_handles() {
    let mut doc = CadDocument::new();
    let first = doc.add_entity(Line::new()).unwrap();
    let second = doc.add_entity(Line::new()).unwrap();

    let taken = doc.set_handle(first, Handle::new(0x500)).unwrap();
    assert_eq!(taken, Handle::new(0x500));
    assert!(matches!(
        doc.set_handle(second, Handle::new(0x500)),
        Err(DxfError::DuplicateHandle(h)) if h == Handle::new(0x500)
    ));
    assert_eq!(doc.object_by_handle(Handle::new(0x500)).map(|o| o.handle()), Some(Handle::new(0x500)));
    assert!(doc.next_handle() > Handle::new(0x500));
}
