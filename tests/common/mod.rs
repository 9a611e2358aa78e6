//! Shared test utilities for dxf-codec integration tests.
//!
//! Builds small ASCII DXF files from `(code, value)` lines and slices
//! written pair sequences by section.

#![allow(dead_code)]

use std::io::{self, Read};

use dxf_codec::io::dxf::reader::{DxfStreamReader, DxfTextReader};
use dxf_codec::io::dxf::DxfSection;
use dxf_codec::{CadDocument, CodePair, DxfVersion, DxfWriter, Result};

// ===========================================================================
// Building input files
// ===========================================================================

/// Render `(code, value)` lines as ASCII DXF text.
pub fn dxf_text(lines: &[(i32, &str)]) -> String {
    lines
        .iter()
        .map(|(code, value)| format!("{:>3}\n{}\n", code, value))
        .collect()
}

/// A complete section: `0 SECTION / 2 <name>`, the body, `0 ENDSEC`.
pub fn section(name: &str, body: &[(i32, &str)]) -> String {
    let mut text = dxf_text(&[(0, "SECTION"), (2, name)]);
    text.push_str(&dxf_text(body));
    text.push_str(&dxf_text(&[(0, "ENDSEC")]));
    text
}

/// A HEADER section declaring `$ACADVER`.
pub fn header(version: &str) -> String {
    section("HEADER", &[(9, "$ACADVER"), (1, version)])
}

pub fn eof() -> String {
    dxf_text(&[(0, "EOF")])
}

pub fn load_text(text: &str) -> Result<CadDocument> {
    CadDocument::load(text.as_bytes())
}

/// A source that hands out one byte per `read`, like a slow pipe.
pub struct Trickle<'a>(pub &'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match (self.0.split_first(), buf.first_mut()) {
            (Some((byte, rest)), Some(slot)) => {
                *slot = *byte;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

// ===========================================================================
// Inspecting output
// ===========================================================================

/// The pairs a save at `version` would produce.
pub fn written_pairs(doc: &CadDocument, version: DxfVersion, include_handles: bool) -> Vec<CodePair> {
    DxfWriter::new(doc)
        .version(version)
        .include_handles(include_handles)
        .pairs()
        .0
}

/// Pairs between `0 SECTION / 2 <section>` and the matching `0 ENDSEC`.
pub fn section_body(pairs: &[CodePair], section: DxfSection) -> Vec<CodePair> {
    let start = pairs
        .windows(2)
        .position(|w| w[0].is(0, "SECTION") && w[1].is(2, section.name()));
    let Some(start) = start else {
        return Vec::new();
    };
    pairs[start + 2..]
        .iter()
        .take_while(|p| !p.is(0, "ENDSEC"))
        .cloned()
        .collect()
}

/// Decode ASCII DXF bytes into pairs without interpreting sections.
pub fn parse_pairs(bytes: &[u8]) -> Vec<CodePair> {
    let mut reader = DxfTextReader::new(bytes);
    let mut pairs = Vec::new();
    while let Some(pair) = reader.read_pair().expect("well-formed pair") {
        pairs.push(pair);
    }
    pairs
}

/// Save, then load the bytes back.
pub fn reload(doc: &CadDocument, version: DxfVersion, binary: bool) -> CadDocument {
    let bytes = DxfWriter::new(doc)
        .version(version)
        .binary(binary)
        .write_to_vec()
        .expect("save");
    CadDocument::load(bytes.as_slice()).expect("load")
}
