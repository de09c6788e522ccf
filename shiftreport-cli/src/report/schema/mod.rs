//! Schema detection and per-type column mapping

mod detect;
mod mapping;

pub use detect::{DEFAULT_SCAN_ROWS, HeaderMatch, HeaderSignature, SIGNATURES, classify};
pub use mapping::{
    Binding, BoundSchema, Fallback, Field, FieldRule, GETNET_MAPPING, PREMIOS_MAPPING,
    SchemaMapping,
};
