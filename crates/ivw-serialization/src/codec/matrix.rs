//! Column-wise encoding of square matrices.
//!
//! A matrix node has one child per column (`col0`, `col1`, ...), each written
//! with the vector codec.

use glam::{DMat2, DMat3, DMat4, DVec2, DVec3, DVec4, Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

use super::vector::{VectorComponents, read_vector, write_vector};
use crate::constants::MATRIX_COLUMN_PREFIX;
use crate::document::{Document, NodeId};
use crate::error::Result;

/// Column access for square matrices.
pub trait MatrixColumns: Copy + PartialEq {
    type Column: VectorComponents;

    const COLUMNS: usize;

    fn column(&self, index: usize) -> Self::Column;

    fn set_column(&mut self, index: usize, column: Self::Column);
}

macro_rules! matrix_columns {
    ($($mat:ty => $col:ty, $n:literal;)*) => {
        $(
            impl MatrixColumns for $mat {
                type Column = $col;
                const COLUMNS: usize = $n;

                #[inline]
                fn column(&self, index: usize) -> $col {
                    self.col(index)
                }

                #[inline]
                fn set_column(&mut self, index: usize, column: $col) {
                    *self.col_mut(index) = column;
                }
            }
        )*
    };
}

matrix_columns! {
    Mat2 => Vec2, 2;
    Mat3 => Vec3, 3;
    Mat4 => Vec4, 4;
    DMat2 => DVec2, 2;
    DMat3 => DVec3, 3;
    DMat4 => DVec4, 4;
}

fn column_name(index: usize) -> String {
    format!("{MATRIX_COLUMN_PREFIX}{index}")
}

/// Write `matrix` as column children of `node`.
pub fn write_matrix<M: MatrixColumns>(document: &mut Document, node: NodeId, matrix: &M) {
    for index in 0..M::COLUMNS {
        let column = document.append_child(node, column_name(index));
        write_vector(document, column, &matrix.column(index), false);
    }
}

/// Read the columns present under `node`; missing columns keep their values.
pub fn read_matrix<M: MatrixColumns>(
    document: &Document,
    node: NodeId,
    matrix: &mut M,
) -> Result<bool> {
    let mut changed = false;
    for index in 0..M::COLUMNS {
        let Some(column_node) = document.find_child(node, &column_name(index)) else {
            continue;
        };
        let mut column = matrix.column(index);
        if read_vector(document, column_node, &mut column, false)? {
            matrix.set_column(index, column);
            changed = true;
        }
    }
    Ok(changed)
}
