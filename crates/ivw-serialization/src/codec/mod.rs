//! Value codecs: primitives, vectors (coordinate and color), and matrices.

pub mod matrix;
pub mod primitive;
pub mod vector;

pub use matrix::{MatrixColumns, read_matrix, write_matrix};
pub use primitive::{Primitive, Scalar};
pub use vector::{VectorComponents, read_vector, write_vector};
