//! Numeric value types an ordinal property can hold.
//!
//! Each type carries its property type name and its default value, range and
//! increment. Comparisons are component-wise for vectors, matrices and
//! quaternions.

use std::fmt::Debug;

use glam::{
    DMat2, DMat3, DMat4, DQuat, DVec2, DVec3, DVec4, IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, Quat,
    U64Vec2, U64Vec3, U64Vec4, Vec2, Vec3, Vec4,
};
use ivw_serialization::{DeserializeValue, SerializeValue};

/// A bounded numeric value type.
pub trait OrdinalValue:
    Copy + PartialEq + Debug + SerializeValue + DeserializeValue + 'static
{
    /// Type name used in the class identifier, e.g. `FloatVec3`.
    const NAME: &'static str;

    /// Columns and rows; `(1, 1)` for scalars, `(n, 1)` for vectors.
    const DIM: (usize, usize);

    fn default_value() -> Self;

    fn default_min() -> Self;

    fn default_max() -> Self;

    fn default_increment() -> Self;

    /// Component-wise minimum.
    fn min_components(self, other: Self) -> Self;

    /// Component-wise maximum.
    fn max_components(self, other: Self) -> Self;

    /// Whether any component of `self` is greater than the one in `other`.
    fn any_greater(self, other: Self) -> bool;

    fn clamp_components(self, min: Self, max: Self) -> Self {
        self.max_components(min).min_components(max)
    }

    /// Whether any component is NaN.
    ///
    /// NaN is the only value not equal to itself, and component-wise equality
    /// carries that over to vectors, matrices and quaternions.
    #[allow(clippy::eq_op)]
    fn has_nan(self) -> bool {
        self != self
    }
}

macro_rules! ordinal_scalar {
    ($($ty:ty => $name:literal, [$value:expr, $min:expr, $max:expr, $inc:expr];)*) => {
        $(
            impl OrdinalValue for $ty {
                const NAME: &'static str = $name;
                const DIM: (usize, usize) = (1, 1);

                fn default_value() -> Self { $value }
                fn default_min() -> Self { $min }
                fn default_max() -> Self { $max }
                fn default_increment() -> Self { $inc }

                fn min_components(self, other: Self) -> Self {
                    if other < self { other } else { self }
                }

                fn max_components(self, other: Self) -> Self {
                    if other > self { other } else { self }
                }

                fn any_greater(self, other: Self) -> bool {
                    self > other
                }
            }
        )*
    };
}

ordinal_scalar! {
    f32 => "Float", [0.0, 0.0, 1.0, 0.01];
    f64 => "Double", [0.0, 0.0, 1.0, 0.01];
    i32 => "Int", [0, -100, 100, 1];
    usize => "IntSizeT", [0, 0, 100, 1];
    i64 => "Int64", [0, 0, 1024, 1];
}

macro_rules! ordinal_vector {
    ($($ty:ty => $name:literal, $n:literal, [$value:expr, $min:expr, $max:expr, $inc:expr];)*) => {
        $(
            impl OrdinalValue for $ty {
                const NAME: &'static str = $name;
                const DIM: (usize, usize) = ($n, 1);

                fn default_value() -> Self { <$ty>::splat($value) }
                fn default_min() -> Self { <$ty>::splat($min) }
                fn default_max() -> Self { <$ty>::splat($max) }
                fn default_increment() -> Self { <$ty>::splat($inc) }

                fn min_components(self, other: Self) -> Self {
                    self.min(other)
                }

                fn max_components(self, other: Self) -> Self {
                    self.max(other)
                }

                fn any_greater(self, other: Self) -> bool {
                    self.cmpgt(other).any()
                }
            }
        )*
    };
}

ordinal_vector! {
    Vec2 => "FloatVec2", 2, [0.0, 0.0, 1.0, 0.01];
    Vec3 => "FloatVec3", 3, [0.0, 0.0, 1.0, 0.01];
    Vec4 => "FloatVec4", 4, [0.0, 0.0, 1.0, 0.01];
    DVec2 => "DoubleVec2", 2, [0.0, 0.0, 1.0, 0.01];
    DVec3 => "DoubleVec3", 3, [0.0, 0.0, 1.0, 0.01];
    DVec4 => "DoubleVec4", 4, [0.0, 0.0, 1.0, 0.01];
    IVec2 => "IntVec2", 2, [0, -100, 100, 1];
    IVec3 => "IntVec3", 3, [0, -100, 100, 1];
    IVec4 => "IntVec4", 4, [0, -100, 100, 1];
    U64Vec2 => "IntSize2", 2, [0, 0, 10, 1];
    U64Vec3 => "IntSize3", 3, [0, 0, 10, 1];
    U64Vec4 => "IntSize4", 4, [0, 0, 10, 1];
}

/// Apply `f` to matching components of two flat arrays.
fn zip_with<S: Copy, const N: usize>(a: [S; N], b: [S; N], f: impl Fn(S, S) -> S) -> [S; N] {
    std::array::from_fn(|i| f(a[i], b[i]))
}

// Matrices default to a zero value in [0, identity]; the increment is a
// scaled identity.
macro_rules! ordinal_matrix {
    ($($ty:ty => $name:literal, $n:literal, $scalar:ty;)*) => {
        $(
            impl OrdinalValue for $ty {
                const NAME: &'static str = $name;
                const DIM: (usize, usize) = ($n, $n);

                fn default_value() -> Self { <$ty>::ZERO }
                fn default_min() -> Self { <$ty>::ZERO }
                fn default_max() -> Self { <$ty>::IDENTITY }
                fn default_increment() -> Self { <$ty>::IDENTITY * 0.01 }

                fn min_components(self, other: Self) -> Self {
                    <$ty>::from_cols_array(&zip_with(
                        self.to_cols_array(),
                        other.to_cols_array(),
                        <$scalar>::min,
                    ))
                }

                fn max_components(self, other: Self) -> Self {
                    <$ty>::from_cols_array(&zip_with(
                        self.to_cols_array(),
                        other.to_cols_array(),
                        <$scalar>::max,
                    ))
                }

                fn any_greater(self, other: Self) -> bool {
                    let (a, b) = (self.to_cols_array(), other.to_cols_array());
                    a.iter().zip(b.iter()).any(|(x, y)| x > y)
                }
            }
        )*
    };
}

ordinal_matrix! {
    Mat2 => "FloatMat2", 2, f32;
    Mat3 => "FloatMat3", 3, f32;
    Mat4 => "FloatMat4", 4, f32;
    DMat2 => "DoubleMat2", 2, f64;
    DMat3 => "DoubleMat3", 3, f64;
    DMat4 => "DoubleMat4", 4, f64;
}

macro_rules! ordinal_quat {
    ($($ty:ty => $name:literal, $scalar:ty;)*) => {
        $(
            impl OrdinalValue for $ty {
                const NAME: &'static str = $name;
                const DIM: (usize, usize) = (4, 1);

                fn default_value() -> Self { <$ty>::IDENTITY }
                fn default_min() -> Self { <$ty>::from_array([-1.0; 4]) }
                fn default_max() -> Self { <$ty>::from_array([1.0; 4]) }
                fn default_increment() -> Self { <$ty>::from_array([0.01; 4]) }

                fn min_components(self, other: Self) -> Self {
                    <$ty>::from_array(zip_with(self.to_array(), other.to_array(), <$scalar>::min))
                }

                fn max_components(self, other: Self) -> Self {
                    <$ty>::from_array(zip_with(self.to_array(), other.to_array(), <$scalar>::max))
                }

                fn any_greater(self, other: Self) -> bool {
                    let (a, b) = (self.to_array(), other.to_array());
                    a.iter().zip(b.iter()).any(|(x, y)| x > y)
                }
            }
        )*
    };
}

ordinal_quat! {
    Quat => "FloatQuaternion", f32;
    DQuat => "DoubleQuaternion", f64;
}
