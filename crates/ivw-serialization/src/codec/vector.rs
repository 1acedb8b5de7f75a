//! Per-component attribute encoding of small fixed-size vectors.
//!
//! A vector node carries one attribute per component. Coordinates use
//! `x/y/z/w`; colors use `r/g/b/a` and are written as truncated integers.

use glam::{
    DQuat, DVec2, DVec3, DVec4, I64Vec2, I64Vec3, I64Vec4, IVec2, IVec3, IVec4, Quat, U64Vec2,
    U64Vec3, U64Vec4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4,
};

use super::primitive::{Primitive, Scalar};
use crate::constants::{COLOR_ATTRIBUTES, VECTOR_ATTRIBUTES};
use crate::document::{Document, NodeId};
use crate::error::{Result, SerializationError};

/// Indexed access to the components of a 2 to 4 element vector.
pub trait VectorComponents: Copy + PartialEq {
    type Scalar: Scalar;

    /// Number of components, between 2 and 4.
    const LEN: usize;

    fn component(&self, index: usize) -> Self::Scalar;

    fn set_component(&mut self, index: usize, value: Self::Scalar);
}

macro_rules! vector_components {
    ($($vec:ty => $scalar:ty, $len:literal;)*) => {
        $(
            impl VectorComponents for $vec {
                type Scalar = $scalar;
                const LEN: usize = $len;

                #[inline]
                fn component(&self, index: usize) -> $scalar {
                    self.to_array()[index]
                }

                #[inline]
                fn set_component(&mut self, index: usize, value: $scalar) {
                    let mut components = self.to_array();
                    components[index] = value;
                    *self = <$vec>::from_array(components);
                }
            }
        )*
    };
}

vector_components! {
    Vec2 => f32, 2;
    Vec3 => f32, 3;
    Vec4 => f32, 4;
    DVec2 => f64, 2;
    DVec3 => f64, 3;
    DVec4 => f64, 4;
    IVec2 => i32, 2;
    IVec3 => i32, 3;
    IVec4 => i32, 4;
    UVec2 => u32, 2;
    UVec3 => u32, 3;
    UVec4 => u32, 4;
    I64Vec2 => i64, 2;
    I64Vec3 => i64, 3;
    I64Vec4 => i64, 4;
    U64Vec2 => u64, 2;
    U64Vec3 => u64, 3;
    U64Vec4 => u64, 4;
    Quat => f32, 4;
    DQuat => f64, 4;
}

fn attribute_names(color: bool) -> &'static [&'static str; 4] {
    if color {
        &COLOR_ATTRIBUTES
    } else {
        &VECTOR_ATTRIBUTES
    }
}

/// Write the components of `vector` as attributes of `node`.
pub fn write_vector<V: VectorComponents>(
    document: &mut Document,
    node: NodeId,
    vector: &V,
    color: bool,
) {
    let names = attribute_names(color);
    for (index, name) in names.iter().enumerate().take(V::LEN) {
        let component = vector.component(index);
        let text = if color {
            component.truncated_text()
        } else {
            component.to_text()
        };
        document.set_attribute(node, name, text);
    }
}

/// Overwrite the components of `vector` present on `node`.
///
/// Components without an attribute keep their prior value. Returns whether
/// any component changed.
pub fn read_vector<V: VectorComponents>(
    document: &Document,
    node: NodeId,
    vector: &mut V,
    color: bool,
) -> Result<bool> {
    let names = attribute_names(color);
    let before = *vector;
    for (index, name) in names.iter().enumerate().take(V::LEN) {
        let Some(text) = document.attribute(node, name) else {
            continue;
        };
        let value = V::Scalar::from_text(text).ok_or_else(|| {
            SerializationError::invalid_value(
                format!("{}.{name}", document.name(node)),
                text,
                <V::Scalar as Primitive>::TYPE_NAME,
            )
        })?;
        vector.set_component(index, value);
    }
    Ok(*vector != before)
}
