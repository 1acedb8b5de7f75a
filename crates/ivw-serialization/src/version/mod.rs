//! Module versioning and converters for documents written by older versions.

pub mod converter;
pub mod identifiers;

pub use converter::{ConverterRegistry, ModuleUpgrade, VersionConverter};
pub use identifiers::{IdentifierReplacement, Kind, change_identifiers};
