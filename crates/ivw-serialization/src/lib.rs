//! Attribute-based XML serialization for Inviwo workspaces.
//!
//! A [`Serializer`] builds a [`Document`] tree from in-memory values and writes
//! it as XML; a [`Deserializer`] parses XML back into a tree and reads values
//! into existing objects, reporting whether anything changed.
//!
//! # Document shape
//!
//! ```text
//! <InviwoWorkspace version="2">
//!   <fov content="38.5"/>              primitive: content attribute
//!   <position x="1" y="2" z="3"/>      vector: one attribute per component
//!   <tint r="255" g="128" b="0"/>      color vector: integer components
//!   <transform>                        matrix: one child per column
//!     <col0 x="1" y="0"/>
//!     <col1 x="0" y="1"/>
//!   </transform>
//!   <Camera identifier="camera">       object: own node, own fields
//!     ...
//!   </Camera>
//! </InviwoWorkspace>
//! ```
//!
//! Missing nodes and attributes are never errors: the target keeps its value,
//! so documents from other versions load as far as they can. Structural
//! upgrades go through [`ConverterRegistry`] before values are read.
//!
//! # Example
//!
//! ```
//! use ivw_serialization::{Deserializer, Serializer};
//!
//! let mut s = Serializer::new();
//! s.serialize("count", &3);
//! let xml = s.to_xml_string()?;
//!
//! let mut d = Deserializer::parse(&xml)?;
//! let mut count = 0;
//! assert!(d.deserialize("count", &mut count)?);
//! assert_eq!(count, 3);
//! # Ok::<(), ivw_serialization::SerializationError>(())
//! ```

pub mod codec;
pub mod constants;
pub mod deserializer;
pub mod document;
pub mod error;
pub mod options;
pub mod scope;
pub mod serializer;
pub mod traits;
pub mod version;

pub use codec::{MatrixColumns, Primitive, Scalar, VectorComponents};
pub use deserializer::Deserializer;
pub use document::{Attribute, Document, NodeId};
pub use error::{Result, SerializationError};
pub use options::SerializerOptions;
pub use scope::{NodeStack, NodeSwitch};
pub use serializer::Serializer;
pub use traits::{DeserializeValue, Serializable, SerializeValue};
pub use version::{
    ConverterRegistry, IdentifierReplacement, Kind, ModuleUpgrade, VersionConverter,
    change_identifiers,
};
