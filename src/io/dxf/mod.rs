//! DXF (Drawing Exchange Format) reading and writing
//!
//! Both physical encodings reduce to the same ordered stream of
//! [`CodePair`]s; everything above the stream readers and writers is
//! encoding-agnostic.

pub mod code_page;
mod code_pair;
mod group_code_value;
pub mod reader;
pub mod section;
pub mod value_parser;
pub mod writer;

pub use code_pair::{CodePair, CodeValue, PairOffset};
pub use group_code_value::GroupCodeValueType;
pub use reader::{DxfReader, DxfReaderConfiguration};
pub use section::DxfSection;
pub use writer::DxfWriter;
