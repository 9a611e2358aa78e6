//! # dxf-codec
//!
//! A bidirectional codec between a typed CAD drawing model and the DXF
//! group-code/value stream, in both the ASCII and the binary encoding, from
//! R10 (AC1006) through R2018 (AC1032).
//!
//! ## Layers
//!
//! - **Pair stream** ([`io::dxf::reader::PairStream`], [`io::dxf::writer`]):
//!   ordered `(code, value)` pairs over either encoding.
//! - **Section dispatcher**: `0 SECTION / 2 <name> ... 0 ENDSEC` framing,
//!   routing each section body to its reader; unknown sections are skipped.
//! - **Field projector** ([`schema`]): one declarative, version-aware field
//!   table per object kind, read and written by a single generic engine.
//! - **Handle registry** ([`handle_registry`]): handles in the stream,
//!   arena ids in memory, with deferred resolution of forward references.
//! - **Document** ([`CadDocument`]): the container tying them together.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dxf_codec::{CadDocument, DxfVersion, Line, Vector3};
//!
//! let mut doc = CadDocument::load_file("sample.dxf")?;
//! for warning in doc.notifications().iter() {
//!     eprintln!("{}", warning);
//! }
//!
//! doc.add_entity(Line::from_points(Vector3::ZERO, Vector3::new(10.0, 0.0, 0.0)))?;
//! let notes = doc.save_file("output.dxf", DxfVersion::AC1009, false)?;
//! println!("{} notifications", notes.len());
//! # Ok::<(), dxf_codec::DxfError>(())
//! ```

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod classes;
pub mod document;
pub mod entities;
pub mod error;
pub mod handle_registry;
pub mod header;
pub mod io;
pub mod notification;
pub mod objects;
pub mod schema;
pub mod tables;
pub mod thumbnail;
pub mod types;

// Re-export commonly used types
pub use error::{DxfError, Result};
pub use types::{Color, DxfVersion, Handle, Vector3};

// Re-export entity types
pub use entities::{Block, BlockEnd, Circle, Entity, EntityCommon, Line, LwPolyline, LwVertex, Text};

// Re-export table types
pub use tables::{AppId, BlockRecord, Layer, LineType, SymbolTable, TableEntry, TextStyle};

// Re-export object types
pub use objects::{CadObject, Dictionary, Group, ObjectData, ObjectId, Pointer, SunStudy};

// Re-export document
pub use classes::{DxfClass, DxfClassCollection};
pub use document::CadDocument;
pub use header::HeaderSection;
pub use notification::{Notification, NotificationCollection, NotificationKind, NotificationType};

// Re-export I/O types
pub use io::dxf::{CodePair, CodeValue, DxfReader, DxfReaderConfiguration, DxfWriter};
pub use io::read_files;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
