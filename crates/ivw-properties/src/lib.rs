//! Typed properties persisted through `ivw-serialization`.
//!
//! A property is a named, observable value owned by a processor. Its state is
//! made of [`ValueWrapper`]s, each remembering a default so that saved
//! documents can stay minimal and the UI can reset to defaults.
//!
//! [`OrdinalProperty`] is the bounded numeric property: scalars, vectors,
//! matrices and quaternions with a component-wise `[min, max]` range and an
//! increment.

pub mod ordinal;
pub mod property;
pub mod value_wrapper;

pub use ordinal::{
    DoubleMat2Property, DoubleMat3Property, DoubleMat4Property, DoubleProperty,
    DoubleQuaternionProperty, DoubleVec2Property, DoubleVec3Property, DoubleVec4Property,
    FloatMat2Property, FloatMat3Property, FloatMat4Property, FloatProperty,
    FloatQuaternionProperty, FloatVec2Property, FloatVec3Property, FloatVec4Property,
    Int64Property, IntProperty, IntSize2Property, IntSize3Property, IntSize4Property,
    IntSizeTProperty, IntVec2Property, IntVec3Property, IntVec4Property, OrdinalProperty,
    OrdinalValue,
};
pub use property::{ChangeObserver, Property, PropertyBase, PropertySemantics, SerializationMode};
pub use value_wrapper::ValueWrapper;
