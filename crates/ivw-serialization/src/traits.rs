//! Capability traits and the static shape classification.
//!
//! Every serializable value falls into exactly one shape, decided at compile
//! time by which impl applies:
//!
//! - primitive: one `content` attribute on its own node
//! - vector/quaternion: one attribute per component
//! - matrix: one child per column
//! - object: anything implementing [`Serializable`], written into its own node
//!
//! Sequences of any of these go through `serialize_seq`/`deserialize_seq`.

use glam::{
    DMat2, DMat3, DMat4, DQuat, DVec2, DVec3, DVec4, I64Vec2, I64Vec3, I64Vec4, IVec2, IVec3,
    IVec4, Mat2, Mat3, Mat4, Quat, U64Vec2, U64Vec3, U64Vec4, UVec2, UVec3, UVec4, Vec2, Vec3,
    Vec4,
};

use crate::codec::{Primitive, read_matrix, read_vector, write_matrix, write_vector};
use crate::constants::CONTENT_ATTRIBUTE;
use crate::deserializer::Deserializer;
use crate::document::{Document, NodeId};
use crate::error::{Result, SerializationError};
use crate::serializer::Serializer;

/// An object that writes and reads its own fields.
///
/// The serializer gives the object a fresh node as current node; the object
/// delegates to its fields with the `serialize`/`deserialize` primitives.
pub trait Serializable {
    fn serialize(&self, s: &mut Serializer);

    /// Read fields from the current node. Returns whether anything changed.
    fn deserialize(&mut self, d: &mut Deserializer) -> Result<bool>;
}

/// Writes a value into a node the serializer already created for it.
pub trait SerializeValue {
    fn serialize_into(&self, s: &mut Serializer, node: NodeId);
}

/// Reads a value from the node found for its key.
pub trait DeserializeValue {
    /// Returns whether the value differs from what it held before the call.
    fn deserialize_from(&mut self, d: &mut Deserializer, node: NodeId) -> Result<bool>;
}

impl<T: Serializable + ?Sized> SerializeValue for T {
    fn serialize_into(&self, s: &mut Serializer, node: NodeId) {
        let mut scope = s.switch_to(node);
        self.serialize(&mut scope);
    }
}

impl<T: Serializable + ?Sized> DeserializeValue for T {
    fn deserialize_from(&mut self, d: &mut Deserializer, node: NodeId) -> Result<bool> {
        let mut scope = d.switch_to(node);
        self.deserialize(&mut scope)
    }
}

/// Read the `content` attribute of `node` as `T`, `None` when absent.
pub(crate) fn read_content<T: Primitive>(document: &Document, node: NodeId) -> Result<Option<T>> {
    let Some(text) = document.attribute(node, CONTENT_ATTRIBUTE) else {
        return Ok(None);
    };
    T::from_text(text)
        .map(Some)
        .ok_or_else(|| SerializationError::invalid_value(document.name(node), text, T::TYPE_NAME))
}

macro_rules! primitive_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SerializeValue for $ty {
                fn serialize_into(&self, s: &mut Serializer, node: NodeId) {
                    s.document_mut()
                        .set_attribute(node, CONTENT_ATTRIBUTE, self.to_text());
                }
            }

            impl DeserializeValue for $ty {
                fn deserialize_from(&mut self, d: &mut Deserializer, node: NodeId) -> Result<bool> {
                    match read_content::<$ty>(d.document(), node)? {
                        Some(value) => {
                            let changed = *self != value;
                            *self = value;
                            Ok(changed)
                        }
                        None => Ok(false),
                    }
                }
            }
        )*
    };
}

primitive_value!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String
);

impl SerializeValue for str {
    fn serialize_into(&self, s: &mut Serializer, node: NodeId) {
        s.document_mut().set_attribute(node, CONTENT_ATTRIBUTE, self);
    }
}

macro_rules! vector_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SerializeValue for $ty {
                fn serialize_into(&self, s: &mut Serializer, node: NodeId) {
                    write_vector(s.document_mut(), node, self, false);
                }
            }

            impl DeserializeValue for $ty {
                fn deserialize_from(&mut self, d: &mut Deserializer, node: NodeId) -> Result<bool> {
                    read_vector(d.document(), node, self, false)
                }
            }
        )*
    };
}

vector_value!(
    Vec2, Vec3, Vec4, DVec2, DVec3, DVec4, IVec2, IVec3, IVec4, UVec2, UVec3, UVec4, I64Vec2,
    I64Vec3, I64Vec4, U64Vec2, U64Vec3, U64Vec4, Quat, DQuat,
);

macro_rules! matrix_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SerializeValue for $ty {
                fn serialize_into(&self, s: &mut Serializer, node: NodeId) {
                    write_matrix(s.document_mut(), node, self);
                }
            }

            impl DeserializeValue for $ty {
                fn deserialize_from(&mut self, d: &mut Deserializer, node: NodeId) -> Result<bool> {
                    read_matrix(d.document(), node, self)
                }
            }
        )*
    };
}

matrix_value!(Mat2, Mat3, Mat4, DMat2, DMat3, DMat4);
