//! Text representation of primitive values.
//!
//! Floating-point values use Rust's shortest round-trip formatting, so
//! `from_text(to_text(v)) == v` holds for every finite value, infinities and
//! the sign of zero.

/// A value stored as a single attribute string.
pub trait Primitive: Sized {
    /// Type name used in error messages.
    const TYPE_NAME: &'static str;

    fn to_text(&self) -> String;

    /// Parse the textual form, `None` if the text is not a valid value.
    fn from_text(text: &str) -> Option<Self>;
}

/// A numeric primitive usable as a vector component.
pub trait Scalar: Primitive + Copy + PartialEq {
    /// Text of the value truncated toward zero, used for color components.
    fn truncated_text(self) -> String;
}

impl Primitive for bool {
    const TYPE_NAME: &'static str = "bool";

    fn to_text(&self) -> String {
        if *self { "1" } else { "0" }.to_string()
    }

    fn from_text(text: &str) -> Option<Self> {
        match text.trim() {
            "1" => Some(true),
            "0" => Some(false),
            other if other.eq_ignore_ascii_case("true") => Some(true),
            other if other.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }
}

impl Primitive for String {
    const TYPE_NAME: &'static str = "string";

    fn to_text(&self) -> String {
        self.clone()
    }

    fn from_text(text: &str) -> Option<Self> {
        Some(text.to_string())
    }
}

macro_rules! integer_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn to_text(&self) -> String {
                    self.to_string()
                }

                fn from_text(text: &str) -> Option<Self> {
                    text.trim().parse().ok()
                }
            }

            impl Scalar for $ty {
                fn truncated_text(self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_primitive!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn to_text(&self) -> String {
                    self.to_string()
                }

                fn from_text(text: &str) -> Option<Self> {
                    text.trim().parse().ok()
                }
            }

            impl Scalar for $ty {
                fn truncated_text(self) -> String {
                    // Saturating cast; NaN becomes 0.
                    (self.trunc() as i64).to_string()
                }
            }
        )*
    };
}

float_primitive!(f32, f64);
