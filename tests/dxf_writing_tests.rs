//! Integration tests for DXF writing

mod common;

use common::{header, load_text, section, section_body, written_pairs, eof};
use dxf_codec::io::dxf::DxfSection;
use dxf_codec::{
    CadDocument, CodePair, Color, DxfVersion, DxfWriter, Entity, Layer, Line, LwPolyline, LwVertex,
    NotificationKind, NotificationType, SunStudy, Text, Vector3,
};

fn sample_document() -> CadDocument {
    let mut doc = CadDocument::with_defaults();
    doc.add_table_record(Layer::with_color("WALLS", Color::RED)).unwrap();

    let mut line = Line::from_coords(0.0, 0.0, 0.0, 10.0, 5.0, 0.0);
    line.set_layer("WALLS");
    doc.add_entity(line).unwrap();
    doc.add_entity(Text::with_value("Label", Vector3::new(1.0, 1.0, 0.0)).with_height(2.5))
        .unwrap();
    doc
}

fn as_text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).expect("utf-8 output")
}

#[test]
fn test_saving_twice_gives_identical_bytes() {
    let doc = sample_document();
    for binary in [false, true] {
        let first = DxfWriter::new(&doc).binary(binary).write_to_vec().unwrap();
        let second = DxfWriter::new(&doc).binary(binary).write_to_vec().unwrap();
        assert_eq!(first, second);
    }

    let mut out = Vec::new();
    doc.save(&mut out, DxfVersion::AC1015, true).unwrap();
    assert_eq!(out, DxfWriter::new(&doc).write_to_vec().unwrap());
}

#[test]
fn test_fields_follow_declaration_order() {
    let mut doc = CadDocument::new();
    let mut text = Text::with_value("Hi", Vector3::new(1.0, 2.0, 0.0)).with_height(2.5);
    text.rotation = 30.0;
    text.style = "ROMAN".into();
    text.set_color(Color::BLUE);
    doc.add_entity(text).unwrap();

    let pairs = written_pairs(&doc, DxfVersion::AC1015, true);
    let body = section_body(&pairs, DxfSection::Entities);
    let codes: Vec<i32> = body.iter().map(|p| p.code).collect();
    assert_eq!(
        codes,
        vec![0, 5, 100, 8, 62, 100, 10, 20, 30, 40, 1, 50, 7, 100]
    );
    assert_eq!(body[0], CodePair::new(0, "TEXT"));
    assert_eq!(body[2], CodePair::new(100, "AcDbEntity"));
    assert_eq!(body[4], CodePair::new(62, 5i16));
    assert_eq!(body[10], CodePair::new(1, "Hi"));
    assert_eq!(body[12], CodePair::new(7, "ROMAN"));
    assert_eq!(body[13], CodePair::new(100, "AcDbText"));
}

#[test]
fn test_r12_without_handles() {
    let doc = sample_document();
    let pairs = written_pairs(&doc, DxfVersion::AC1009, false);

    assert!(pairs.iter().all(|p| p.code != 5 && p.code != 100 && p.code != 330));
    assert!(!pairs.iter().any(|p| p.is(9, "$HANDSEED")));
    assert!(!pairs.iter().any(|p| p.is(9, "$HANDLING")));

    let header = section_body(&pairs, DxfSection::Header);
    assert_eq!(header[0], CodePair::new(9, "$ACADVER"));
    assert_eq!(header[1], CodePair::new(1, "AC1009"));

    let entities = section_body(&pairs, DxfSection::Entities);
    assert_eq!(
        entities[..3],
        [CodePair::new(0, "LINE"), CodePair::new(8, "WALLS"), CodePair::new(10, 0.0)]
    );
}

#[test]
fn test_r12_with_handles_declares_handling() {
    let doc = sample_document();
    let pairs = written_pairs(&doc, DxfVersion::AC1009, true);

    let header = section_body(&pairs, DxfSection::Header);
    let handling = header.iter().position(|p| p.is(9, "$HANDLING")).unwrap();
    assert_eq!(header[handling + 1], CodePair::new(70, 1i16));
    assert!(header.iter().any(|p| p.is(9, "$HANDSEED")));

    let entities = section_body(&pairs, DxfSection::Entities);
    assert_eq!(entities.iter().filter(|p| p.code == 5).count(), 2);
    assert!(entities.iter().all(|p| p.code != 100));
}

#[test]
fn test_field_newer_than_target_is_reported() {
    let mut doc = CadDocument::new();
    let mut line = Line::new();
    line.common.line_weight = 35;
    doc.add_entity(line).unwrap();

    let mut out = Vec::new();
    let notes = doc.save(&mut out, DxfVersion::AC1012, true).unwrap();
    assert!(notes.iter().any(|n| matches!(
        &n.kind,
        NotificationKind::UnsupportedVersion { object_type, field: Some("line_weight"), version: DxfVersion::AC1012 }
            if object_type == "LINE"
    )));
    assert!(!as_text(&out).contains("\n370\n"));

    let notes = doc.save(Vec::new(), DxfVersion::AC1015, true).unwrap();
    assert!(!notes.has_type(NotificationType::UnsupportedVersion));
}

#[test]
fn test_kind_newer_than_target_is_skipped() {
    let mut doc = CadDocument::new();
    let mut polyline = LwPolyline::new();
    polyline.add_vertex(LwVertex::new(0.0, 0.0));
    polyline.add_vertex(LwVertex::new(1.0, 1.0));
    doc.add_entity(polyline).unwrap();
    doc.add_entity(Line::new()).unwrap();

    let pairs = written_pairs(&doc, DxfVersion::AC1009, false);
    let entities = section_body(&pairs, DxfSection::Entities);
    assert!(!entities.iter().any(|p| p.is(0, "LWPOLYLINE")));
    assert!(entities.iter().any(|p| p.is(0, "LINE")));

    let notes = DxfWriter::new(&doc).version(DxfVersion::AC1009).pairs().1;
    let skipped = notes.of_type(NotificationType::UnsupportedVersion);
    assert_eq!(skipped.len(), 1);
    assert!(matches!(
        &skipped[0].kind,
        NotificationKind::UnsupportedVersion { object_type, field: None, .. } if object_type == "LWPOLYLINE"
    ));
}

#[test]
fn test_retired_kind_is_skipped() {
    let mut doc = CadDocument::new();
    doc.add_object(SunStudy::new()).unwrap();

    let (pairs, notes) = DxfWriter::new(&doc).version(DxfVersion::AC1032).pairs();
    let objects = section_body(&pairs, DxfSection::Objects);
    assert!(objects.is_empty());
    assert!(notes.has_type(NotificationType::UnsupportedVersion));

    let pairs = written_pairs(&doc, DxfVersion::AC1027, true);
    assert!(section_body(&pairs, DxfSection::Objects).iter().any(|p| p.is(0, "SUNSTUDY")));
}

#[test]
fn test_version_is_rewritten() {
    let text = [
        header("AC1015"),
        section("ENTITIES", &[(0, "LINE"), (8, "0"), (10, "1"), (20, "2"), (30, "0")]),
        eof(),
    ]
    .concat();
    let doc = load_text(&text).unwrap();
    assert_eq!(doc.version, DxfVersion::AC1015);

    let mut out = Vec::new();
    doc.save(&mut out, DxfVersion::AC1009, false).unwrap();
    let written = as_text(&out);
    assert!(written.starts_with("  0\nSECTION\n  2\nHEADER\n  9\n$ACADVER\n  1\nAC1009\n"));
    assert_eq!(written.matches("$ACADVER").count(), 1);
    assert!(!written.contains("AC1015"));
}

#[test]
fn test_control_characters_are_escaped() {
    let mut doc = CadDocument::new();
    doc.add_entity(Text::with_value("up^down\nnext", Vector3::ZERO)).unwrap();

    let written = as_text(&DxfWriter::new(&doc).write_to_vec().unwrap());
    assert!(written.contains("\n  1\nup^ down^Jnext\n"));

    let back = CadDocument::load(written.as_bytes()).unwrap();
    let text = back.entities().next().unwrap();
    assert!(matches!(&text.data, dxf_codec::ObjectData::Text(t) if t.value == "up^down\nnext"));
}

#[test]
fn test_save_file_writes_to_disk() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("dxf_codec_save_{}.dxf", std::process::id()));
    let doc = sample_document();
    let notes = doc.save_file(&path, DxfVersion::AC1015, true)?;
    assert!(notes.is_empty());

    let back = CadDocument::load_file(&path)?;
    assert_eq!(back.entities().count(), 2);
    assert!(back.table_records("LAYER").any(|layer| matches!(
        &layer.data,
        dxf_codec::ObjectData::Layer(l) if l.name == "WALLS" && l.color == Color::RED
    )));
    std::fs::remove_file(&path)?;
    Ok(())
}
